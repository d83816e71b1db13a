// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

//! Parsers for the raw data the platforms hand out.
//!
//! They live outside the platform modules so they can be tested on any host.

#![cfg_attr(not(test), allow(dead_code))]

use std::path::PathBuf;

/// Longest name the kernel keeps for a task, `TASK_COMM_LEN` minus the NUL.
pub const COMM_MAX_LEN: usize = 15;

fn status_field<'a>(status: &'a str, key: &str) -> Option<&'a str> {
    status
        .lines()
        .filter_map(|it| it.split_once(':'))
        .find(|it| it.0 == key)
        .map(|it| it.1.trim_start_matches([' ', '\t']))
}

/// Extract the `Name:` field of `/proc/<pid>/status`.
///
/// The kernel escapes `\n` and `\\` inside the name, everything else is
/// copied verbatim.
///
/// - [The /proc Filesystem: Table 1-2](https://docs.kernel.org/filesystems/proc.html#id7)
pub fn parse_status_name(status: &str) -> Option<String> {
    let raw = status_field(status, "Name")?;

    let mut name = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            name.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => name.push('\n'),
            Some('\\') => name.push('\\'),
            Some(other) => {
                name.push('\\');
                name.push(other);
            }
            None => name.push('\\'),
        }
    }

    Some(name)
}

/// Thread group id from `/proc/<pid>/status`, the pid of the owning process.
pub fn parse_status_tgid(status: &str) -> Option<u32> {
    status_field(status, "Tgid")?.trim().parse().ok()
}

/// Undo the kernel's cut of a task name at [`COMM_MAX_LEN`] bytes.
///
/// `candidates` are full base names (executable, then argv[0]); the first one
/// that extends `comm` wins. Names the kernel kept whole come back unchanged.
pub fn untruncated_name<I>(comm: String, candidates: I) -> String
where
    I: IntoIterator<Item = String>,
{
    if comm.len() < COMM_MAX_LEN {
        return comm;
    }
    candidates
        .into_iter()
        .find(|full| full.len() > comm.len() && full.starts_with(&comm))
        .unwrap_or(comm)
}

/// Split a NUL separated argument block such as `/proc/<pid>/cmdline`.
///
/// Trailing NUL padding left behind by processes that rewrite their own
/// arguments is dropped.
pub fn parse_nul_separated(bytes: &[u8]) -> Vec<String> {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);
    if end == 0 {
        return Vec::new();
    }

    bytes[..end]
        .split(|&b| b == 0)
        .map(|arg| String::from_utf8_lossy(arg).into_owned())
        .collect()
}

/// Target of `/proc/<pid>/exe`, unless the binary has been deleted.
pub fn live_executable_path(link_target: PathBuf) -> Option<PathBuf> {
    const DELETED_MARKER: &str = " (deleted)";

    match link_target.to_str() {
        Some(path) if path.ends_with(DELETED_MARKER) => None,
        _ => Some(link_target),
    }
}

/// Parse the `KERN_PROCARGS2` sysctl buffer.
///
/// Layout: native `int argc`, the NUL terminated exec path, NUL padding up to
/// the next word, then `argc` NUL terminated arguments followed by the
/// environment (ignored here).
pub fn parse_procargs2(buffer: &[u8]) -> Result<Vec<String>, String> {
    const ARGC_SIZE: usize = std::mem::size_of::<i32>();

    let Some(argc_bytes) = buffer.get(..ARGC_SIZE) else {
        return Err(format!("argument buffer too short ({} bytes)", buffer.len()));
    };
    let argc = i32::from_ne_bytes([argc_bytes[0], argc_bytes[1], argc_bytes[2], argc_bytes[3]]);
    let argc = usize::try_from(argc).map_err(|_| format!("negative argument count {argc}"))?;

    let mut cursor = ARGC_SIZE;
    let exec_path_len = buffer[cursor..]
        .iter()
        .position(|&b| b == 0)
        .ok_or("unterminated executable path")?;
    cursor += exec_path_len + 1;

    while cursor < buffer.len() && buffer[cursor] == 0 {
        cursor += 1;
    }

    // Every argument takes at least its terminating NUL
    let remaining = buffer.len().saturating_sub(cursor);
    if argc > remaining {
        return Err(format!(
            "argument count {argc} exceeds the {remaining} bytes left"
        ));
    }

    let mut args = Vec::with_capacity(argc);
    for index in 0..argc {
        let rest = buffer.get(cursor..).unwrap_or_default();
        let Some(len) = rest.iter().position(|&b| b == 0) else {
            return Err(format!("argument {index} of {argc} is truncated"));
        };
        args.push(String::from_utf8_lossy(&rest[..len]).into_owned());
        cursor += len + 1;
    }

    Ok(args)
}

/// Decode little-endian UTF-16 bytes, dropping anything after a NUL.
pub fn utf16_le_to_string(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect::<Vec<_>>();
    String::from_utf16_lossy(&units)
}
