//! Stripping of terminal control sequences from foreign text.
//!
//! Child process output and file contents are shown verbatim in the transcript.
//! Escape sequences inside them would otherwise reach the real terminal through
//! the renderer, so they are removed before an event is built. No sequence is
//! interpreted; everything from ESC to the sequence terminator is dropped.

use std::borrow::Cow;
use std::iter::Peekable;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const C1_CSI: char = '\u{009b}';

/// Remove ANSI escape sequences and control characters, keeping `\n`, `\t`
/// and `\r`. Clean input is returned borrowed.
///
/// ```
/// use nebula_types::sanitize_terminal_text;
///
/// assert_eq!(sanitize_terminal_text("plain"), "plain");
/// assert_eq!(sanitize_terminal_text("a\x1b[2Jb"), "ab");
/// ```
#[must_use]
pub fn sanitize_terminal_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(is_stripped) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ESC => skip_escape(&mut chars),
            C1_CSI => skip_csi(&mut chars),
            c if is_stripped(c) => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn is_stripped(c: char) -> bool {
    let c0 = c <= '\x1f' && !matches!(c, '\n' | '\t' | '\r');
    let c1 = ('\u{0080}'..='\u{009f}').contains(&c);
    c0 || c1 || c == '\x7f'
}

fn skip_escape<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    match chars.peek().copied() {
        Some('[') => {
            chars.next();
            skip_csi(chars);
        }
        Some(']' | 'P' | '^' | '_') => {
            chars.next();
            skip_string(chars);
        }
        Some('(' | ')' | '*' | '+' | '#') => {
            chars.next();
            chars.next();
        }
        Some(_) => {
            chars.next();
        }
        None => {}
    }
}

/// CSI: parameter/intermediate bytes up to a final byte in `0x40..=0x7e`.
fn skip_csi<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    while let Some(&c) = chars.peek() {
        if ('\x40'..='\x7e').contains(&c) {
            chars.next();
            return;
        }
        if !('\x20'..='\x3f').contains(&c) {
            return;
        }
        chars.next();
    }
}

/// OSC/DCS/PM/APC payload terminated by BEL or ST (`ESC \`).
fn skip_string<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    while let Some(c) = chars.next() {
        if c == BEL {
            return;
        }
        if c == ESC && chars.peek() == Some(&'\\') {
            chars.next();
            return;
        }
    }
}
