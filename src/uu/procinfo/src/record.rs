// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use serde::{Serialize, Serializer};

/// Process identifier as handed out by the OS.
///
/// Only unique among processes alive at the same instant; the OS recycles
/// identifiers after a process exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Pid(u32);

impl Pid {
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for Pid {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Pid> for u32 {
    fn from(value: Pid) -> Self {
        value.0
    }
}

impl Display for Pid {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-in-time snapshot of a single process.
///
/// Built fresh for every query and never updated afterwards. Fields the
/// platform refused to hand out are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRecord {
    pid: Pid,
    name: String,
    #[serde(serialize_with = "serialize_lossy_path")]
    executable_path: Option<PathBuf>,
    cmdline: Option<String>,
}

/// Paths are plain strings on the wire, bytes that are not UTF-8 included.
fn serialize_lossy_path<S: Serializer>(
    path: &Option<PathBuf>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match path {
        Some(path) => serializer.serialize_some(&path.to_string_lossy()),
        None => serializer.serialize_none(),
    }
}

impl ProcessRecord {
    pub(crate) fn new(
        pid: Pid,
        name: String,
        executable_path: Option<PathBuf>,
        cmdline: Option<String>,
    ) -> Self {
        Self {
            pid,
            name,
            executable_path,
            cmdline,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Executable base name, with the platform's executable suffix removed.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn executable_path(&self) -> Option<&PathBuf> {
        self.executable_path.as_ref()
    }

    /// Arguments the process was started with, argv[0] first, joined by spaces.
    pub fn cmdline(&self) -> Option<&str> {
        self.cmdline.as_deref()
    }

    pub fn into_cmdline(self) -> Option<String> {
        self.cmdline
    }
}

/// Strip `suffix` from the end of `name`, ignoring ASCII case.
///
/// A name that consists of nothing but the suffix is left alone.
pub fn strip_executable_suffix<'a>(name: &'a str, suffix: Option<&str>) -> &'a str {
    let Some(suffix) = suffix else {
        return name;
    };
    if name.len() <= suffix.len() {
        return name;
    }

    let split = name.len() - suffix.len();
    match (name.get(..split), name.get(split..)) {
        (Some(stem), Some(tail)) if tail.eq_ignore_ascii_case(suffix) => stem,
        _ => name,
    }
}

/// Join an argument vector the way the command line is presented.
///
/// An empty vector (kernel threads, zombies) has no command line at all.
pub fn join_cmdline<S: AsRef<str>>(args: &[S]) -> Option<String> {
    if args.is_empty() {
        return None;
    }
    let joined = args
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    Some(joined)
}
