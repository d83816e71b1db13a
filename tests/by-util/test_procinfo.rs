// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

#![cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]

use procinfo::{
    find_process_by_pid, find_processes_by_name, get_process_cmdline, list_process_ids,
    MatchSettings, Pid, ProcessQuery,
};

/// Larger than any pid_max in use, still a positive C int.
const MISSING_PID: u32 = 999_999_999;

fn own_pid() -> u32 {
    std::process::id()
}

// ============================================================================
// Lookup by pid
// ============================================================================

#[test]
fn test_every_listed_pid_resolves_to_itself() {
    let pids = list_process_ids().unwrap();
    assert!(!pids.is_empty());

    for pid in pids {
        // Processes may exit between listing and lookup
        if let Some(record) = find_process_by_pid(pid.as_u32()).unwrap() {
            assert_eq!(record.pid(), pid);
        }
    }
}

#[test]
fn test_missing_pid_is_none() {
    assert_eq!(find_process_by_pid(MISSING_PID).unwrap(), None);
    assert_eq!(get_process_cmdline(MISSING_PID).unwrap(), None);
}

#[test]
fn test_self_lookup_is_stable() {
    let first = find_process_by_pid(own_pid()).unwrap().unwrap();
    let second = find_process_by_pid(own_pid()).unwrap().unwrap();

    assert_eq!(first.pid(), second.pid());
    assert_eq!(first.name(), second.name());
    assert!(!first.name().is_empty());
}

#[test]
fn test_self_cmdline() {
    let cmdline = get_process_cmdline(own_pid()).unwrap().unwrap();
    assert!(!cmdline.is_empty());
}

#[test]
fn test_self_executable_path() {
    let record = find_process_by_pid(own_pid()).unwrap().unwrap();
    let path = record.executable_path().unwrap();
    assert!(path.is_absolute(), "{}", path.display());
}

// ============================================================================
// Lookup by name
// ============================================================================

#[test]
fn test_find_self_by_name() {
    let own = find_process_by_pid(own_pid()).unwrap().unwrap();
    let found = find_processes_by_name(own.name()).unwrap();

    assert!(found.iter().any(|it| it.pid() == own.pid()));
    assert!(found.iter().all(|it| it.name().eq_ignore_ascii_case(own.name())));
}

#[test]
fn test_find_self_by_name_in_other_case() {
    let own = find_process_by_pid(own_pid()).unwrap().unwrap();
    let found = find_processes_by_name(&own.name().to_uppercase()).unwrap();
    assert!(found.iter().any(|it| it.pid() == own.pid()));
}

#[test]
fn test_case_sensitive_query() {
    let own = find_process_by_pid(own_pid()).unwrap().unwrap();
    let query = ProcessQuery::native().with_settings(MatchSettings {
        case_sensitive: true,
    });

    assert!(query
        .find_processes_by_name(own.name())
        .unwrap()
        .iter()
        .any(|it| it.pid() == own.pid()));
}

#[test]
fn test_unknown_name_is_empty() {
    assert!(find_processes_by_name("no-such-process-name-here")
        .unwrap()
        .is_empty());
}

#[test]
#[cfg(target_os = "windows")]
fn test_exe_suffix_is_optional() {
    let own = find_process_by_pid(own_pid()).unwrap().unwrap();
    let plain = find_processes_by_name(own.name()).unwrap();
    let suffixed = find_processes_by_name(&format!("{}.exe", own.name())).unwrap();

    let pids = |records: &[procinfo::ProcessRecord]| {
        records.iter().map(|it| it.pid()).collect::<Vec<_>>()
    };
    assert!(pids(&suffixed).contains(&own.pid()));
    assert!(pids(&plain).contains(&own.pid()));
}

// ============================================================================
// Child processes
// ============================================================================

#[test]
#[cfg(unix)]
fn test_spawned_child_lifecycle() {
    use std::process::Command;
    use std::thread::sleep;
    use std::time::Duration;

    let mut child = Command::new("sleep").arg("31337").spawn().unwrap();
    let pid = Pid::from(child.id());

    // The child shows up under its own name only once exec is done
    let mut record = None;
    for _ in 0..50 {
        record = find_processes_by_name("sleep")
            .unwrap()
            .into_iter()
            .find(|it| it.pid() == pid);
        if record.is_some() {
            break;
        }
        sleep(Duration::from_millis(20));
    }
    let record = record.unwrap();
    assert!(record.cmdline().unwrap().contains("31337"));

    child.kill().unwrap();
    child.wait().unwrap();

    assert_eq!(find_process_by_pid(pid.as_u32()).unwrap(), None);
}

#[test]
#[cfg(target_os = "linux")]
fn test_child_with_long_name() {
    use std::process::Command;
    use std::thread::sleep;
    use std::time::Duration;

    // The kernel keeps only the first 15 bytes of this as comm
    let name = "a-very-long-sleeper-name";
    let dir = tempfile::tempdir().unwrap();
    let link = dir.path().join(name);
    std::os::unix::fs::symlink("/bin/sleep", &link).unwrap();

    let mut child = Command::new(&link).arg("31337").spawn().unwrap();
    let pid = Pid::from(child.id());

    let mut record = None;
    for _ in 0..50 {
        record = find_processes_by_name(name)
            .unwrap()
            .into_iter()
            .find(|it| it.pid() == pid);
        if record.is_some() {
            break;
        }
        sleep(Duration::from_millis(20));
    }

    child.kill().unwrap();
    child.wait().unwrap();

    assert_eq!(record.unwrap().name(), name);
}

// ============================================================================
// Cross-check against sysinfo
// ============================================================================

#[test]
fn test_agrees_with_sysinfo() {
    let sys = sysinfo::System::new_all();
    let theirs = sys.process(sysinfo::Pid::from_u32(own_pid())).unwrap();
    let ours = find_process_by_pid(own_pid()).unwrap().unwrap();

    assert_eq!(
        ours.executable_path().map(|it| it.as_path()),
        theirs.exe()
    );

    #[cfg(unix)]
    {
        let their_cmdline = theirs
            .cmd()
            .iter()
            .map(|it| it.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(ours.cmdline(), Some(their_cmdline.as_str()));
    }

    #[cfg(target_os = "linux")]
    assert_eq!(ours.name(), theirs.name().to_string_lossy());
}

#[test]
fn test_pid_list_covers_sysinfo_snapshot() {
    let sys = sysinfo::System::new_all();
    let ours = list_process_ids().unwrap();

    // Processes started after the sysinfo snapshot are fine, our own must be there
    assert!(ours.contains(&Pid::from(own_pid())));
    let missing = sys
        .processes()
        .iter()
        .filter(|(_, process)| process.thread_kind().is_none())
        .map(|(pid, _)| Pid::from(pid.as_u32()))
        .filter(|pid| !ours.contains(pid))
        .count();
    // A handful may have exited in between
    assert!(missing <= sys.processes().len() / 10 + 5, "{missing} missing");
}

#[test]
fn test_record_json_shape() {
    let record = find_process_by_pid(own_pid()).unwrap().unwrap();
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["pid"], own_pid());
    assert_eq!(json["name"], record.name());
    assert!(json["executablePath"].is_string());
    assert!(json["cmdline"].is_string());
}
