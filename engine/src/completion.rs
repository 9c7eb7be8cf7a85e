//! Tab completion for the input line.
//!
//! The first token completes against command names; any later token completes
//! against directory entries, resolved like `go` resolves paths.

use nebula_tools::Filesystem;

use crate::commands::command_names;
use crate::session::SessionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Nothing matched.
    None,
    /// The line to show after completing.
    Line(String),
    /// Several matches. `line` holds their common prefix.
    Candidates { line: String, candidates: Vec<String> },
}

/// Complete the last token of `line` (text before the cursor).
pub fn complete(line: &str, session: &SessionState, fs: &dyn Filesystem) -> Completion {
    let token_start = line
        .rfind(char::is_whitespace)
        .map_or(0, |idx| idx + line[idx..].chars().next().map_or(1, char::len_utf8));
    let (head, token) = line.split_at(token_start);

    if head.trim().is_empty() {
        let matches: Vec<String> = command_names()
            .filter(|name| name.starts_with(token))
            .map(str::to_string)
            .collect();
        return finish(head, token, matches, " ");
    }
    complete_path(head, token, session, fs)
}

fn complete_path(head: &str, token: &str, session: &SessionState, fs: &dyn Filesystem) -> Completion {
    let split = token.rfind(['/', '\\']).map_or(0, |idx| idx + 1);
    let (dir_part, prefix) = token.split_at(split);
    let dir = if dir_part.is_empty() {
        session.working_dir().to_path_buf()
    } else {
        session.resolve(dir_part)
    };

    let Ok(entries) = fs.list_dir(&dir) else {
        return Completion::None;
    };
    let show_hidden = prefix.starts_with('.');
    let matches: Vec<(String, bool)> = entries
        .into_iter()
        .filter(|e| e.name.starts_with(prefix) && (show_hidden || !e.name.starts_with('.')))
        .map(|e| (format!("{dir_part}{}", e.name), e.is_dir))
        .collect();

    if let [(only, is_dir)] = matches.as_slice() {
        let suffix = if *is_dir { "/" } else { " " };
        return Completion::Line(format!("{head}{only}{suffix}"));
    }
    let names = matches.into_iter().map(|(name, _)| name).collect();
    finish(head, token, names, "")
}

fn finish(head: &str, token: &str, mut matches: Vec<String>, single_suffix: &str) -> Completion {
    match matches.len() {
        0 => Completion::None,
        1 => Completion::Line(format!("{head}{}{single_suffix}", matches.remove(0))),
        _ => {
            let common = common_prefix(&matches);
            let completed = if common.len() > token.len() { common } else { token };
            Completion::Candidates {
                line: format!("{head}{completed}"),
                candidates: matches,
            }
        }
    }
}

fn common_prefix(items: &[String]) -> &str {
    let Some(first) = items.first() else {
        return "";
    };
    let mut end = first.len();
    for item in &items[1..] {
        end = first
            .char_indices()
            .zip(item.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map_or(0, |((i, c), _)| i + c.len_utf8())
            .min(end);
    }
    &first[..end]
}
