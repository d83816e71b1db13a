// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use uutests::new_ucmd;
use uutests::util::TestScenario;
use uutests::util_name;

#[test]
fn test_no_args() {
    new_ucmd!().fails().code_is(1).no_output();
}

#[test]
fn test_invalid_arg() {
    new_ucmd!().arg("--definitely-invalid").fails().code_is(1);
}

#[test]
fn test_help() {
    new_ucmd!()
        .arg("--help")
        .succeeds()
        .stdout_contains("--cmdline");
}

#[test]
fn test_no_match() {
    new_ucmd!()
        .arg("no-such-process-name-here")
        .fails()
        .code_is(1)
        .no_output();
}

#[test]
fn test_invalid_pid() {
    new_ucmd!().args(&["-p", "abc"]).fails().code_is(1);
}

#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
mod live {
    use super::*;
    use pretty_assertions::assert_eq;

    fn own_pid() -> String {
        std::process::id().to_string()
    }

    #[test]
    fn test_pid() {
        let pid = own_pid();
        new_ucmd!()
            .args(&["-p", pid.as_str()])
            .succeeds()
            .stdout_is(format!("{pid}\n"));
    }

    #[test]
    fn test_pid_list() {
        let pid = own_pid();
        new_ucmd!()
            .arg(format!("--pid={pid},{pid}"))
            .succeeds()
            .stdout_is(format!("{pid} {pid}\n"));
    }

    #[test]
    fn test_missing_pid() {
        new_ucmd!()
            .args(&["-p", "999999999"])
            .fails()
            .code_is(1)
            .no_output();
    }

    #[test]
    fn test_separator() {
        let pid = own_pid();
        new_ucmd!()
            .args(&["-p", pid.as_str(), "-p", pid.as_str(), "-S", ","])
            .succeeds()
            .stdout_is(format!("{pid},{pid}\n"));
    }

    #[test]
    fn test_omit_pid() {
        let pid = own_pid();
        new_ucmd!()
            .args(&["-p", pid.as_str(), "-o", pid.as_str()])
            .fails()
            .code_is(1)
            .no_output();
    }

    #[test]
    fn test_quiet() {
        new_ucmd!()
            .args(&["-q", "-p", own_pid().as_str()])
            .succeeds()
            .no_output();
    }

    #[test]
    fn test_list_full() {
        let pid = own_pid();
        let result = new_ucmd!().args(&["-l", "-p", pid.as_str()]).succeeds();
        let fields = result
            .stdout_str()
            .trim_end()
            .splitn(4, ' ')
            .collect::<Vec<_>>();

        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], pid);
    }

    #[test]
    fn test_json() {
        let result = new_ucmd!().args(&["--json", "-p", own_pid().as_str()]).succeeds();

        let json: serde_json::Value = serde_json::from_str(result.stdout_str()).unwrap();
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["pid"], std::process::id());
        assert!(records[0]["executablePath"].is_string());
    }

    #[test]
    fn test_cmdline() {
        let result = new_ucmd!().args(&["-c", own_pid().as_str()]).succeeds();
        assert!(!result.stdout_str().trim().is_empty());
    }

    #[test]
    fn test_cmdline_missing_pid() {
        new_ucmd!()
            .args(&["-c", "999999999"])
            .fails()
            .code_is(1)
            .no_output();
    }

    #[test]
    fn test_find_by_name() {
        // Look up the name this test runner is known by
        let result = new_ucmd!().args(&["-j", "-p", own_pid().as_str()]).succeeds();
        let json: serde_json::Value = serde_json::from_str(result.stdout_str()).unwrap();
        let name = json[0]["name"].as_str().unwrap().to_string();

        let pid = own_pid();
        let result = new_ucmd!().arg(&name).succeeds();
        assert!(result.stdout_str().split_whitespace().any(|it| it == pid));
    }

    #[test]
    fn test_log_filter() {
        new_ucmd!()
            .args(&["-p", own_pid().as_str()])
            .env("FINDPROC_LOG", "debug")
            .succeeds()
            .stderr_contains("collected records");
    }
}
