//! Command table and line parsing.
//!
//! A submitted line becomes a [`ParsedCommand`] (name plus whitespace-split
//! arguments), which is then resolved into a typed [`Command`] for dispatch.

use std::fmt::Write as _;

/// Separator between an echoed prompt and the command typed after it.
pub const PROMPT_DELIMITER: &str = "> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCategory {
    General,
    FileManagement,
    Utility,
}

impl CommandCategory {
    pub const ALL: [Self; 3] = [Self::General, Self::FileManagement, Self::Utility];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::General => "General Commands",
            Self::FileManagement => "File Management Commands",
            Self::Utility => "Utility Commands",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    /// Every name that resolves to this command; the first is canonical.
    pub names: &'static [&'static str],
    pub help_label: &'static str,
    pub description: &'static str,
    pub detail: &'static str,
    pub category: CommandCategory,
}

const COMMAND_SPECS: &[CommandSpec] = &[
    CommandSpec {
        names: &["help"],
        help_label: "help [command]",
        description: "Show this help message",
        detail: "Show this help message or detailed help for a specific command.",
        category: CommandCategory::General,
    },
    CommandSpec {
        names: &["date"],
        help_label: "date",
        description: "Display the current date and time",
        detail: "Display the current date and time.",
        category: CommandCategory::General,
    },
    CommandSpec {
        names: &["exit"],
        help_label: "exit",
        description: "Return to the home directory",
        detail: "Leave the current directory and return to the home directory.",
        category: CommandCategory::General,
    },
    CommandSpec {
        names: &["go"],
        help_label: "go <path>",
        description: "Navigate to a directory",
        detail: "Navigate to the specified directory path. Relative paths resolve against \
                 the current directory and ~ expands to the home directory.",
        category: CommandCategory::General,
    },
    CommandSpec {
        names: &["cls", "clear"],
        help_label: "cls, clear",
        description: "Clear the terminal screen",
        detail: "Clear the terminal screen.",
        category: CommandCategory::General,
    },
    CommandSpec {
        names: &["dir"],
        help_label: "dir",
        description: "List every file below the current directory",
        detail: "List all files below the current directory, recursively.",
        category: CommandCategory::FileManagement,
    },
    CommandSpec {
        names: &["edit"],
        help_label: "edit <file>",
        description: "Open and display the contents of a file",
        detail: "Open and display the contents of the specified file.",
        category: CommandCategory::FileManagement,
    },
    CommandSpec {
        names: &["mkdir"],
        help_label: "mkdir <directory_name>",
        description: "Create a new directory",
        detail: "Create a new directory with the specified name, including missing parents.",
        category: CommandCategory::FileManagement,
    },
    CommandSpec {
        names: &["open"],
        help_label: "open",
        description: "Open the current directory in the system's default file manager",
        detail: "Open the current directory in the system's default file manager.",
        category: CommandCategory::FileManagement,
    },
    CommandSpec {
        names: &["openfile"],
        help_label: "openfile <file_path>",
        description: "Open and display the contents of a file",
        detail: "Open and display the contents of the specified file.",
        category: CommandCategory::FileManagement,
    },
    CommandSpec {
        names: &["rename"],
        help_label: "rename <old_file_path> <new_file_path>",
        description: "Rename a file or directory",
        detail: "Rename a file or directory.",
        category: CommandCategory::FileManagement,
    },
    CommandSpec {
        names: &["diff"],
        help_label: "diff <file1> <file2>",
        description: "Compare the contents of two files",
        detail: "Compare the contents of two files as a unified diff.",
        category: CommandCategory::FileManagement,
    },
    CommandSpec {
        names: &["code"],
        help_label: "code",
        description: "Open the current directory in Visual Studio Code",
        detail: "Open the current directory in Visual Studio Code.",
        category: CommandCategory::Utility,
    },
    CommandSpec {
        names: &["echo"],
        help_label: "echo <text>",
        description: "Print the specified text",
        detail: "Print the specified text to the terminal.",
        category: CommandCategory::Utility,
    },
    CommandSpec {
        names: &["settings"],
        help_label: "settings -<setting> <value>",
        description: "Change the specified setting",
        detail: "Change the specified setting to the given value. Run without \
                 arguments to list every setting.",
        category: CommandCategory::Utility,
    },
    CommandSpec {
        names: &["tasklist"],
        help_label: "tasklist",
        description: "Display all running processes",
        detail: "Display all currently running processes.",
        category: CommandCategory::Utility,
    },
    CommandSpec {
        names: &["systeminfo"],
        help_label: "systeminfo",
        description: "Display system information",
        detail: "Display detailed system information.",
        category: CommandCategory::Utility,
    },
    CommandSpec {
        names: &["diskusage"],
        help_label: "diskusage",
        description: "Display disk usage of the root volume",
        detail: "Display total, used and free space of the root volume.",
        category: CommandCategory::Utility,
    },
    CommandSpec {
        names: &["issue"],
        help_label: "issue <issue_text>",
        description: "Submit an issue to the Nebula Terminal Development Community",
        detail: "Submit an issue to the Nebula Terminal Development Community.",
        category: CommandCategory::Utility,
    },
    CommandSpec {
        names: &["ping"],
        help_label: "ping <target>",
        description: "Ping the specified target",
        detail: "Ping the specified target.",
        category: CommandCategory::Utility,
    },
    CommandSpec {
        names: &["ssh"],
        help_label: "ssh <target>",
        description: "Establish an SSH connection to the specified target",
        detail: "Establish an SSH connection to the specified target.",
        category: CommandCategory::Utility,
    },
    CommandSpec {
        names: &["listports"],
        help_label: "listports",
        description: "List all open ports on the system",
        detail: "List all open TCP ports between 1 and 1024 on this machine.",
        category: CommandCategory::Utility,
    },
    CommandSpec {
        names: &["git"],
        help_label: "git clone <repository-url>",
        description: "Clone a git repository into the current directory",
        detail: "Clone a git repository into the current directory.",
        category: CommandCategory::Utility,
    },
];

#[must_use]
pub fn command_specs() -> &'static [CommandSpec] {
    COMMAND_SPECS
}

/// Every recognised command name, aliases included, in table order.
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMAND_SPECS.iter().flat_map(|spec| spec.names.iter().copied())
}

#[must_use]
pub fn find_spec(name: &str) -> Option<&'static CommandSpec> {
    COMMAND_SPECS.iter().find(|spec| spec.names.contains(&name))
}

/// Help text grouped by category.
#[must_use]
pub fn general_help() -> String {
    let mut out = String::new();
    for (i, category) in CommandCategory::ALL.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}:", category.title());
        for spec in COMMAND_SPECS.iter().filter(|s| s.category == category) {
            let _ = writeln!(out, "  {}: {}", spec.help_label, spec.description);
        }
    }
    out.truncate(out.trim_end().len());
    out
}

/// Detailed help for one command, or `None` when the name is unknown.
#[must_use]
pub fn detailed_help(name: &str) -> Option<String> {
    find_spec(name).map(|spec| format!("{}: {}", spec.help_label, spec.detail))
}

/// A submitted line split into a command name and its arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    name: String,
    args: Vec<String>,
}

impl ParsedCommand {
    /// Split a raw line. Anything up to and including the last occurrence of
    /// `prompt` (the `<dir>> ` the shell shows) is an echoed prompt and is
    /// dropped; a bare `> ` elsewhere in the line is ordinary text.
    #[must_use]
    pub fn parse(raw: &str, prompt: &str) -> Self {
        let line = match raw.rfind(prompt).filter(|_| !prompt.is_empty()) {
            Some(idx) => &raw[idx + prompt.len()..],
            None => raw,
        };
        let mut tokens = line.split_whitespace().map(str::to_string);
        let name = tokens.next().unwrap_or_default();
        Self {
            name,
            args: tokens.collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Arguments from `index` on, joined with single spaces.
    #[must_use]
    pub fn rest_from(&self, index: usize) -> Option<String> {
        let rest = self.args.get(index..)?;
        if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        }
    }
}

/// Parsed command with typed arguments.
///
/// A missing required argument is kept as `None` so the handler can answer
/// with its usage line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command<'a> {
    Exit,
    Go(Option<String>),
    Clear,
    Help(Option<&'a str>),
    Edit(Option<String>),
    OpenFile(Option<String>),
    Code,
    Dir,
    Echo(String),
    Mkdir(Option<String>),
    Settings {
        key: Option<&'a str>,
        value: Option<String>,
    },
    TaskList,
    SystemInfo,
    Open,
    Issue(Option<String>),
    Ping(Option<&'a str>),
    Ssh(Option<&'a str>),
    Date,
    DiskUsage,
    Diff(Option<&'a str>, Option<&'a str>),
    ListPorts,
    Rename(Option<&'a str>, Option<&'a str>),
    Git {
        subcommand: Option<&'a str>,
        url: Option<&'a str>,
    },
    Unknown(&'a str),
    Empty,
}

impl<'a> Command<'a> {
    pub(crate) fn resolve(parsed: &'a ParsedCommand) -> Self {
        match parsed.name() {
            "" => Command::Empty,
            "exit" => Command::Exit,
            "go" => Command::Go(parsed.rest_from(0)),
            "cls" | "clear" => Command::Clear,
            "help" => Command::Help(parsed.arg(0)),
            "edit" => Command::Edit(parsed.rest_from(0)),
            "openfile" => Command::OpenFile(parsed.rest_from(0)),
            "code" => Command::Code,
            "dir" => Command::Dir,
            "echo" => Command::Echo(parsed.rest_from(0).unwrap_or_default()),
            "mkdir" => Command::Mkdir(parsed.rest_from(0)),
            "settings" => Command::Settings {
                key: parsed.arg(0),
                value: parsed.rest_from(1),
            },
            "tasklist" => Command::TaskList,
            "systeminfo" => Command::SystemInfo,
            "open" => Command::Open,
            "issue" => Command::Issue(parsed.rest_from(0)),
            "ping" => Command::Ping(parsed.arg(0)),
            "ssh" => Command::Ssh(parsed.arg(0)),
            "date" => Command::Date,
            "diskusage" => Command::DiskUsage,
            "diff" => Command::Diff(parsed.arg(0), parsed.arg(1)),
            "listports" => Command::ListPorts,
            "rename" => Command::Rename(parsed.arg(0), parsed.arg(1)),
            "git" => Command::Git {
                subcommand: parsed.arg(0),
                url: parsed.arg(1),
            },
            other => Command::Unknown(other),
        }
    }
}
