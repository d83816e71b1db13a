// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

//! Cross-platform process lookup
//!
//! This crate answers three questions about the running system: which live
//! processes carry a given name, what a given pid looks like, and what
//! command line started it. Linux, macOS and Windows are supported; other
//! platforms get a source that reports enumeration as unsupported.
//!
//! # Example
//!
//! ```no_run
//! use uu_procinfo::{find_processes_by_name, get_process_cmdline};
//!
//! for process in find_processes_by_name("sshd")? {
//!     let cmdline = get_process_cmdline(process.pid().as_u32())?;
//!     println!("{} {}", process.pid(), cmdline.unwrap_or_default());
//! }
//! # Ok::<(), uu_procinfo::ProcessError>(())
//! ```

mod builder;
pub mod error;
pub mod matcher;
mod parse;
pub mod platform;
mod query;
pub mod record;

pub use builder::build_record;
pub use error::ProcessError;
pub use matcher::{MatchSettings, NameMatcher};
pub use platform::{NativeProcessSource, ProcessEntry, ProcessSource};
pub use query::{
    find_process_by_pid, find_processes_by_name, get_process_cmdline, list_process_ids,
    ProcessQuery,
};
pub use record::{Pid, ProcessRecord};
