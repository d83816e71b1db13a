// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use clap::{crate_version, Arg, ArgAction, ArgMatches, Command};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uu_procinfo::{MatchSettings, Pid, ProcessError, ProcessQuery, ProcessRecord};
use uucore::error::{set_exit_code, UResult, USimpleError};

/// Environment variable holding the log filter, e.g. `FINDPROC_LOG=debug`.
const LOG_ENV: &str = "FINDPROC_LOG";

mod options {
    pub const NAME: &str = "name";
    pub const PID: &str = "pid";
    pub const CMDLINE: &str = "cmdline";
    pub const LIST_FULL: &str = "list-full";
    pub const JSON: &str = "json";
    pub const SEPARATOR: &str = "separator";
    pub const OMIT_PID: &str = "omit-pid";
    pub const CASE_SENSITIVE: &str = "case-sensitive";
    pub const QUIET: &str = "quiet";
}

#[uucore::main]
pub fn uumain(args: impl uucore::Args) -> UResult<()> {
    let matches = uu_app().try_get_matches_from(args)?;
    init_logging();

    let settings = MatchSettings {
        case_sensitive: matches.get_flag(options::CASE_SENSITIVE),
    };
    let query = ProcessQuery::native().with_settings(settings);
    let quiet = matches.get_flag(options::QUIET);

    if let Some(&pid) = matches.get_one::<u32>(options::CMDLINE) {
        match query.get_process_cmdline(pid).map_err(to_uerror)? {
            Some(cmdline) if !quiet => println!("{cmdline}"),
            Some(_) => {}
            None => set_exit_code(1),
        }
        return Ok(());
    }

    let records = collect_records(&query, &matches).map_err(to_uerror)?;
    debug!(count = records.len(), "collected records");

    if records.is_empty() {
        set_exit_code(1);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    if matches.get_flag(options::JSON) {
        let json = serde_json::to_string_pretty(&records)
            .map_err(|err| USimpleError::new(1, err.to_string()))?;
        println!("{json}");
    } else if matches.get_flag(options::LIST_FULL) {
        for record in &records {
            println!("{}", format_full(record));
        }
    } else {
        let separator = matches
            .get_one::<String>(options::SEPARATOR)
            .map_or(" ", String::as_str);
        let output = records
            .iter()
            .map(|it| it.pid().to_string())
            .collect::<Vec<_>>()
            .join(separator);
        println!("{output}");
    }

    Ok(())
}

fn to_uerror(err: ProcessError) -> Box<dyn uucore::error::UError> {
    USimpleError::new(1, err.to_string())
}

/// Logs go to stderr and stay silent unless `FINDPROC_LOG` asks for them.
///
/// An embedding program (or the unit tests) may have installed a global
/// subscriber already; that one is kept.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if let Err(err) = installed {
        debug!(error = %err, "keeping the existing subscriber");
    }
}

fn collect_records(
    query: &ProcessQuery,
    matches: &ArgMatches,
) -> Result<Vec<ProcessRecord>, ProcessError> {
    let omitted = matches
        .get_many::<u32>(options::OMIT_PID)
        .unwrap_or_default()
        .map(|&pid| Pid::from(pid))
        .collect::<Vec<_>>();

    let mut records = Vec::new();
    for name in matches.get_many::<String>(options::NAME).unwrap_or_default() {
        records.extend(query.find_processes_by_name(name)?);
    }
    for &pid in matches.get_many::<u32>(options::PID).unwrap_or_default() {
        records.extend(query.find_process_by_pid(pid)?);
    }

    records.retain(|it| !omitted.contains(&it.pid()));
    Ok(records)
}

/// One `pid name path cmdline` line, `-` standing in for unknown fields.
fn format_full(record: &ProcessRecord) -> String {
    let path = record
        .executable_path()
        .map_or_else(|| "-".to_string(), |it| it.display().to_string());
    format!(
        "{} {} {} {}",
        record.pid(),
        record.name(),
        path,
        record.cmdline().unwrap_or("-")
    )
}

pub fn uu_app() -> Command {
    Command::new(uucore::util_name())
        .version(crate_version!())
        .about("Look up running processes by name or pid")
        .override_usage("findproc [options] [name [...]]")
        .infer_long_args(true)
        .arg(
            Arg::new(options::NAME)
                .help("Process name to look for, with or without .exe")
                .index(1)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new(options::PID)
                .short('p')
                .long("pid")
                .help("Look up the process with this PID")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(u32))
                .value_name("PID"),
        )
        .arg(
            Arg::new(options::CMDLINE)
                .short('c')
                .long("cmdline")
                .help("Print the command line of PID")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(u32))
                .value_name("PID")
                .conflicts_with_all([options::NAME, options::PID]),
        )
        .arg(
            Arg::new(options::LIST_FULL)
                .short('l')
                .long("list-full")
                .help("List PID, name, executable path and command line")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(options::JSON)
                .short('j')
                .long("json")
                .help("Print matching processes as JSON")
                .action(ArgAction::SetTrue)
                .conflicts_with(options::LIST_FULL),
        )
        .arg(
            Arg::new(options::SEPARATOR)
                .short('S')
                .long("separator")
                .help("Use SEP as separator between PIDs")
                .action(ArgAction::Set)
                .value_name("SEP")
                .default_value(" ")
                .hide_default_value(true),
        )
        .arg(
            Arg::new(options::OMIT_PID)
                .short('o')
                .long("omit-pid")
                .help("Omit results with a given PID")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(u32))
                .value_name("PID"),
        )
        .arg(
            Arg::new(options::CASE_SENSITIVE)
                .short('C')
                .long("case-sensitive")
                .help("Match names with exact case")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(options::QUIET)
                .short('q')
                .long("quiet")
                .help("Quiet mode. Do not display output")
                .action(ArgAction::SetTrue),
        )
}
