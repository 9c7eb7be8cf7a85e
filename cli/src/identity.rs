//! Who is at the keyboard, for the first-run greeting.

use std::env;

const UNKNOWN_USER: &str = "user";
const UNKNOWN_HOST: &str = "localhost";

/// Login name from the environment.
pub fn username() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .find_map(|var| env::var(var).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| UNKNOWN_USER.to_string())
}

/// Token recorded in the known-identities file.
pub fn identity(user: &str, host: Option<&str>) -> String {
    format!("{user}@{}", host.unwrap_or(UNKNOWN_HOST))
}

#[cfg(unix)]
pub fn hostname() -> Option<String> {
    let mut buf = [0u8; 256];
    // SAFETY: the pointer and length describe `buf`, which outlives the call.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        return None;
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8(buf[..end].to_vec())
        .ok()
        .filter(|h| !h.is_empty())
}

#[cfg(not(unix))]
pub fn hostname() -> Option<String> {
    env::var("COMPUTERNAME").ok().filter(|h| !h.is_empty())
}
