//! Command dispatch.
//!
//! [`Dispatcher::dispatch`] runs one parsed line against the session and the
//! settings store. Handlers push output onto a [`Dispatch`] and return
//! `Result<(), CommandError>`; errors are rendered here, so a failing command
//! never ends the session.

use std::ops::RangeInclusive;
use std::path::Path;

use nebula_tools::{
    Filesystem, IssueNotifier, PortProbe, ProcessOutput, ProcessRunner, RunError, SystemCommand,
};
use nebula_types::{OutputEvent, OutputStyle};
use nebula_utils::{compute_diff_stats, unified_diff};

use crate::commands::{Command, ParsedCommand, command_names, detailed_help, general_help};
use crate::error::CommandError;
use crate::session::SessionState;
use crate::settings::SettingsStore;
use crate::suggest::suggest;

/// Most files `dir` will list.
pub const DIR_LISTING_LIMIT: usize = 10_000;

/// Ports checked by `listports`.
pub const PROBED_PORTS: RangeInclusive<u16> = 1..=1024;

/// The external collaborators handlers may call.
pub struct Collaborators {
    pub runner: Box<dyn ProcessRunner>,
    pub fs: Box<dyn Filesystem>,
    pub notifier: Box<dyn IssueNotifier>,
    pub ports: Box<dyn PortProbe>,
}

/// Side effects the front-end must apply after a command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    pub clear_screen: bool,
    pub settings_changed: bool,
}

/// Everything one command produced.
#[derive(Debug, Default)]
pub struct Dispatch {
    pub events: Vec<OutputEvent>,
    pub effects: Effects,
}

impl Dispatch {
    fn push(&mut self, event: OutputEvent) {
        self.events.push(event);
    }
}

pub struct Dispatcher {
    tools: Collaborators,
}

impl Dispatcher {
    #[must_use]
    pub fn new(tools: Collaborators) -> Self {
        Self { tools }
    }

    #[must_use]
    pub fn filesystem(&self) -> &dyn Filesystem {
        self.tools.fs.as_ref()
    }

    pub async fn dispatch(
        &self,
        parsed: &ParsedCommand,
        session: &mut SessionState,
        settings: &mut SettingsStore,
    ) -> Dispatch {
        let mut out = Dispatch::default();
        let command = Command::resolve(parsed);
        tracing::debug!(command = parsed.name(), args = parsed.args().len(), "Dispatching");

        let result = match command {
            Command::Empty => Ok(()),
            Command::Unknown(name) => {
                self.unknown(name, session, &mut out);
                Ok(())
            }
            Command::Exit => self.exit(session),
            Command::Go(path) => self.go(path.as_deref(), session),
            Command::Clear => {
                out.effects.clear_screen = true;
                Ok(())
            }
            Command::Help(topic) => {
                help(topic, &mut out);
                Ok(())
            }
            Command::Echo(text) => {
                out.push(OutputEvent::plain(text));
                Ok(())
            }
            Command::Date => {
                let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                out.push(OutputEvent::plain(format!("Current date and time: {now}")));
                Ok(())
            }
            Command::Dir => self.dir(session, &mut out),
            Command::Edit(path) => self.show_file(path.as_deref(), false, session, &mut out),
            Command::OpenFile(path) => self.show_file(path.as_deref(), true, session, &mut out),
            Command::Mkdir(name) => self.mkdir(name.as_deref(), session, &mut out),
            Command::Rename(from, to) => self.rename(from, to, session, &mut out),
            Command::Diff(a, b) => self.diff(a, b, session, &mut out),
            Command::Settings { key, value } => {
                settings_command(key, value.as_deref(), settings, &mut out)
            }
            Command::Issue(text) => self.issue(text.as_deref(), session, &mut out).await,
            Command::ListPorts => {
                self.list_ports(&mut out).await;
                Ok(())
            }
            Command::TaskList => {
                self.captured(&SystemCommand::TaskList, "Failed to retrieve task list", session, &mut out)
                    .await
            }
            Command::SystemInfo => {
                self.captured(
                    &SystemCommand::SystemInfo,
                    "Failed to retrieve system information",
                    session,
                    &mut out,
                )
                .await
            }
            Command::DiskUsage => self.disk_usage(session, &mut out).await,
            Command::Ping(target) => self.ping(target, session, &mut out).await,
            Command::Ssh(target) => self.ssh(target, session, &mut out).await,
            Command::Open => self.open(session, &mut out).await,
            Command::Code => self.code(session, &mut out).await,
            Command::Git { subcommand, url } => self.git(subcommand, url, session, &mut out).await,
        };

        if let Err(err) = result {
            tracing::warn!(command = parsed.name(), kind = err.kind(), error = %err, "Command failed");
            out.push(err.to_event());
        }
        out
    }

    fn unknown(&self, name: &str, session: &SessionState, out: &mut Dispatch) {
        out.push(CommandError::UnknownCommand(name.to_string()).to_event());

        let entries = self
            .tools
            .fs
            .list_dir(session.working_dir())
            .unwrap_or_else(|err| {
                tracing::debug!(error = %err, "Suggestions without directory entries");
                Vec::new()
            });
        let dirs = entries.iter().filter(|e| e.is_dir).map(|e| e.name.as_str());
        let files = entries.iter().filter(|e| !e.is_dir).map(|e| e.name.as_str());
        let result = suggest(name, command_names(), dirs, files);
        out.push(OutputEvent::bold(result.render()));
    }

    fn exit(&self, session: &mut SessionState) -> Result<(), CommandError> {
        if !self.tools.fs.is_dir(session.home_dir()) {
            return Err(CommandError::DirectoryNotFound(session.home_dir().to_path_buf()));
        }
        session.go_home();
        Ok(())
    }

    fn go(&self, path: Option<&str>, session: &mut SessionState) -> Result<(), CommandError> {
        let raw = path.ok_or(CommandError::Usage("go <path>"))?;
        let target = session.resolve(raw);
        if !self.tools.fs.is_dir(&target) {
            return Err(CommandError::DirectoryNotFound(target));
        }
        session.set_working_dir(target);
        Ok(())
    }

    fn dir(&self, session: &SessionState, out: &mut Dispatch) -> Result<(), CommandError> {
        let walk = self
            .tools
            .fs
            .walk_files(session.working_dir(), DIR_LISTING_LIMIT)
            .map_err(|e| CommandError::os("listing directory contents", e))?;
        if walk.files.is_empty() {
            out.push(OutputEvent::plain("No files found."));
            return Ok(());
        }
        let listing: Vec<String> = walk.files.iter().map(|p| p.display().to_string()).collect();
        out.push(OutputEvent::untrusted(&listing.join("\n"), OutputStyle::Path));
        if walk.truncated {
            out.push(OutputEvent::plain(format!(
                "Listing stopped after {DIR_LISTING_LIMIT} files."
            )));
        }
        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<String, CommandError> {
        self.tools.fs.read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CommandError::FileNotFound(path.to_path_buf())
            } else {
                CommandError::os("opening file", e)
            }
        })
    }

    fn show_file(
        &self,
        path: Option<&str>,
        with_header: bool,
        session: &SessionState,
        out: &mut Dispatch,
    ) -> Result<(), CommandError> {
        let usage = if with_header {
            "openfile <file_path>"
        } else {
            "edit <file>"
        };
        let path = session.resolve(path.ok_or(CommandError::Usage(usage))?);
        let content = self.read_file(&path)?;
        if with_header {
            out.push(OutputEvent::path(format!("Contents of {}:", path.display())));
        }
        out.push(OutputEvent::untrusted(&content, OutputStyle::Plain));
        Ok(())
    }

    fn mkdir(
        &self,
        name: Option<&str>,
        session: &SessionState,
        out: &mut Dispatch,
    ) -> Result<(), CommandError> {
        let name = name.ok_or(CommandError::Usage("mkdir <directory_name>"))?;
        self.tools
            .fs
            .create_dir_all(&session.resolve(name))
            .map_err(|e| CommandError::os("creating directory", e))?;
        out.push(OutputEvent::success(format!("Directory created: {name}")));
        Ok(())
    }

    fn rename(
        &self,
        from: Option<&str>,
        to: Option<&str>,
        session: &SessionState,
        out: &mut Dispatch,
    ) -> Result<(), CommandError> {
        let (Some(from), Some(to)) = (from, to) else {
            return Err(CommandError::Usage("rename <old_file_path> <new_file_path>"));
        };
        let old_path = session.resolve(from);
        if !self.tools.fs.exists(&old_path) {
            return Err(CommandError::FileNotFound(old_path));
        }
        self.tools
            .fs
            .rename(&old_path, &session.resolve(to))
            .map_err(|e| CommandError::os("renaming file", e))?;
        out.push(OutputEvent::success(format!("File renamed from {from} to {to}")));
        Ok(())
    }

    fn diff(
        &self,
        a: Option<&str>,
        b: Option<&str>,
        session: &SessionState,
        out: &mut Dispatch,
    ) -> Result<(), CommandError> {
        let (Some(a), Some(b)) = (a, b) else {
            return Err(CommandError::Usage("diff <file1> <file2>"));
        };
        let (path_a, path_b) = (session.resolve(a), session.resolve(b));
        let old = self.read_file(&path_a)?;
        let new = self.read_file(&path_b)?;
        let (label_a, label_b) = (path_a.display().to_string(), path_b.display().to_string());

        match unified_diff(&old, &new, &label_a, &label_b) {
            Some(body) => {
                let stats = compute_diff_stats(&old, &new);
                out.push(OutputEvent::bold(format!(
                    "Differences between {label_a} and {label_b} (+{} -{}):",
                    stats.additions, stats.deletions
                )));
                out.push(OutputEvent::untrusted(&body, OutputStyle::Plain));
            }
            None => out.push(OutputEvent::plain(format!(
                "No differences found between {label_a} and {label_b}."
            ))),
        }
        Ok(())
    }

    async fn issue(
        &self,
        text: Option<&str>,
        session: &mut SessionState,
        out: &mut Dispatch,
    ) -> Result<(), CommandError> {
        let text = text.ok_or(CommandError::Usage("issue <issue_text>"))?;
        let number = session.next_issue_number();
        let content = format!("**Community Issue #{number}**:\n```{text}```");
        self.tools
            .notifier
            .submit(&content)
            .await
            .map_err(|e| CommandError::from_notify(&e))?;
        session.commit_issue();
        out.push(OutputEvent::success(format!(
            "Issue #{number} submitted. Thank you!"
        )));
        Ok(())
    }

    async fn list_ports(&self, out: &mut Dispatch) {
        let open = self.tools.ports.open_ports(PROBED_PORTS).await;
        if open.is_empty() {
            out.push(OutputEvent::plain("No open ports found."));
        } else {
            let joined: Vec<String> = open.iter().map(u16::to_string).collect();
            out.push(OutputEvent::plain(format!("Open ports: {}", joined.join(", "))));
        }
    }

    /// Run `command` and fail with `context` unless it exits cleanly.
    async fn run_checked(
        &self,
        command: &SystemCommand,
        context: &str,
        session: &SessionState,
    ) -> Result<ProcessOutput, CommandError> {
        let output = self
            .tools
            .runner
            .run(command, session.working_dir())
            .await
            .map_err(|e| CommandError::from_run(context, e))?;
        if output.success() || command.ignores_exit_status() {
            Ok(output)
        } else {
            Err(CommandError::collaborator(context, failure_detail(&output)))
        }
    }

    async fn captured(
        &self,
        command: &SystemCommand,
        context: &str,
        session: &SessionState,
        out: &mut Dispatch,
    ) -> Result<(), CommandError> {
        let output = self.run_checked(command, context, session).await?;
        out.push(OutputEvent::untrusted(&output.stdout, OutputStyle::Plain));
        Ok(())
    }

    async fn disk_usage(
        &self,
        session: &SessionState,
        out: &mut Dispatch,
    ) -> Result<(), CommandError> {
        let output = self
            .run_checked(&SystemCommand::DiskUsage, "Failed to get disk usage", session)
            .await?;
        match parse_df_kilobytes(&output.stdout) {
            Some((total, used, free)) => out.push(OutputEvent::plain(format!(
                "Disk Usage: Total: {total} bytes, Used: {used} bytes, Free: {free} bytes"
            ))),
            None => out.push(OutputEvent::untrusted(&output.stdout, OutputStyle::Plain)),
        }
        Ok(())
    }

    async fn ping(
        &self,
        target: Option<&str>,
        session: &SessionState,
        out: &mut Dispatch,
    ) -> Result<(), CommandError> {
        let target = target.ok_or(CommandError::Usage("ping <target>"))?;
        let command = SystemCommand::Ping {
            target: target.to_string(),
        };
        let output = self
            .run_checked(&command, &format!("Failed to ping {target}"), session)
            .await?;
        out.push(OutputEvent::untrusted(
            &format!("Ping results for {target}:\n{}", output.stdout),
            OutputStyle::Plain,
        ));
        Ok(())
    }

    async fn ssh(
        &self,
        target: Option<&str>,
        session: &SessionState,
        out: &mut Dispatch,
    ) -> Result<(), CommandError> {
        let target = target.ok_or(CommandError::Usage("ssh <target>"))?;
        let command = SystemCommand::Ssh {
            target: target.to_string(),
        };
        let output = self
            .tools
            .runner
            .run(&command, session.working_dir())
            .await
            .map_err(|e| {
                CommandError::from_run(format!("Failed to establish SSH connection to {target}"), e)
            })?;
        if !output.success() {
            let code = output
                .exit_code
                .map_or_else(|| "none".to_string(), |c| c.to_string());
            return Err(CommandError::collaborator(
                format!("SSH connection to {target} failed with error code {code}"),
                failure_detail(&output),
            ));
        }
        out.push(OutputEvent::untrusted(
            &format!("SSH connection to {target} established:\n{}", output.stdout),
            OutputStyle::Plain,
        ));
        Ok(())
    }

    async fn open(&self, session: &SessionState, out: &mut Dispatch) -> Result<(), CommandError> {
        let dir = session.working_dir().to_path_buf();
        let command = SystemCommand::OpenFileManager { dir: dir.clone() };
        self.run_checked(&command, "Failed to open directory", session)
            .await?;
        out.push(OutputEvent::success(format!(
            "Opened directory: {}",
            dir.display()
        )));
        Ok(())
    }

    async fn code(&self, session: &SessionState, out: &mut Dispatch) -> Result<(), CommandError> {
        let dir = session.working_dir().to_path_buf();
        let command = SystemCommand::OpenEditor { dir: dir.clone() };
        match self.tools.runner.run(&command, &dir).await {
            Err(RunError::NotFound { .. }) => Err(CommandError::collaborator(
                "Visual Studio Code is not installed or not found in PATH",
                "install it or check your PATH settings",
            )),
            Err(err) => Err(CommandError::from_run("Failed to open Visual Studio Code", err)),
            Ok(output) if !output.success() => Err(CommandError::collaborator(
                "Failed to open Visual Studio Code",
                failure_detail(&output),
            )),
            Ok(_) => {
                out.push(OutputEvent::success(format!(
                    "Opened {} in Visual Studio Code",
                    dir.display()
                )));
                Ok(())
            }
        }
    }

    async fn git(
        &self,
        subcommand: Option<&str>,
        url: Option<&str>,
        session: &SessionState,
        out: &mut Dispatch,
    ) -> Result<(), CommandError> {
        const USAGE: &str = "git clone <repository-url>";
        if subcommand != Some("clone") {
            return Err(CommandError::Usage(USAGE));
        }
        let url = url.ok_or(CommandError::Usage(USAGE))?;
        let command = SystemCommand::GitClone {
            url: url.to_string(),
        };
        self.run_checked(&command, "Failed to clone repository", session)
            .await?;
        out.push(OutputEvent::success(format!(
            "Successfully cloned {url} into {}",
            session.working_dir().display()
        )));
        Ok(())
    }
}

fn help(topic: Option<&str>, out: &mut Dispatch) {
    let text = match topic {
        None => general_help(),
        Some(name) => detailed_help(name)
            .unwrap_or_else(|| format!("No detailed help available for: {name}")),
    };
    out.push(OutputEvent::plain(text));
}

fn settings_command(
    key: Option<&str>,
    value: Option<&str>,
    settings: &mut SettingsStore,
    out: &mut Dispatch,
) -> Result<(), CommandError> {
    let Some(key) = key else {
        out.push(OutputEvent::plain(settings.listing()));
        return Ok(());
    };
    let value = value.ok_or(CommandError::Usage("settings -<setting> <value>"))?;
    let bare = key.strip_prefix('-').unwrap_or(key);
    let stored = settings
        .update(bare, value)
        .map_err(|source| CommandError::Validation {
            key: bare.to_string(),
            source,
        })?;
    out.push(OutputEvent::success(format!(
        "Setting updated: {bare} = {stored}"
    )));
    out.effects.settings_changed = true;
    Ok(())
}

/// Most useful text explaining a non-zero exit.
fn failure_detail(output: &ProcessOutput) -> String {
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    if let Some(line) = output.stdout.lines().rev().find(|l| !l.trim().is_empty()) {
        return line.trim().to_string();
    }
    match output.exit_code {
        Some(code) => format!("exited with status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Total, used and free bytes from `df -k` output.
fn parse_df_kilobytes(stdout: &str) -> Option<(u64, u64, u64)> {
    let row = stdout.lines().nth(1)?;
    let mut fields = row.split_whitespace().skip(1).map(str::parse::<u64>);
    let total = fields.next()?.ok()?;
    let used = fields.next()?.ok()?;
    let free = fields.next()?.ok()?;
    Some((total * 1024, used * 1024, free * 1024))
}
