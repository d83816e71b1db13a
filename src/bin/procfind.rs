// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use clap::Command;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

type Utility<T> = (&'static str, fn(T) -> i32, fn() -> Command);

fn utilities<T: uucore::Args>() -> Vec<Utility<T>> {
    vec![
        #[cfg(feature = "findproc")]
        ("findproc", findproc::uumain, findproc::uu_app),
    ]
}

fn find<T: uucore::Args>(utils: &[Utility<T>], name: &str) -> Option<fn(T) -> i32> {
    utils
        .iter()
        .find(|(util, _, _)| *util == name)
        .map(|&(_, uumain, _)| uumain)
}

fn usage<T>(utils: &[Utility<T>], name: &str) {
    println!("{name} {VERSION} (multi-call binary)\n");
    println!("Usage: {name} [function [arguments...]]\n");
    println!("Currently defined functions:\n");
    let names = utils.iter().map(|(util, _, _)| *util).collect::<Vec<_>>();
    println!("    {}", names.join(", "));
}

fn binary_path(args: &mut impl Iterator<Item = OsString>) -> PathBuf {
    match args.next() {
        Some(ref s) if !s.is_empty() => PathBuf::from(s),
        _ => std::env::current_exe().unwrap_or_default(),
    }
}

fn name(binary_path: &Path) -> Option<&str> {
    binary_path.file_stem()?.to_str()
}

fn main() {
    uucore::panic::mute_sigpipe_panic();

    let utils = utilities();
    let mut args = uucore::args_os();

    let binary = binary_path(&mut args);
    let Some(binary_as_util) = name(&binary) else {
        usage(&utils, "<unknown binary name>");
        process::exit(0);
    };

    // binary name equals util name?
    if let Some(uumain) = find(&utils, binary_as_util) {
        process::exit(uumain(vec![binary.into_os_string()].into_iter().chain(args)));
    }

    // otherwise the util name is the first argument
    uucore::set_utility_is_second_arg();
    let Some(util_os) = args.next() else {
        usage(&utils, binary_as_util);
        process::exit(0);
    };

    let util = util_os.to_string_lossy().into_owned();
    match find(&utils, &util) {
        Some(uumain) => process::exit(uumain(vec![util_os].into_iter().chain(args))),
        None if util == "--help" || util == "-h" => {
            usage(&utils, binary_as_util);
            process::exit(0);
        }
        None if util == "--version" || util == "-V" => {
            println!("{binary_as_util} {VERSION} (multi-call binary)");
            process::exit(0);
        }
        None => {
            println!("{util}: function/utility not found");
            process::exit(1);
        }
    }
}
