//! CLI command tests

use super::*;
use crate::cli::LogLevel;
use crate::config::*;
use crate::io::TrialLog;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a fast run specification against the analytic oracle
fn create_test_config(dir: &TempDir, extra: &str) -> PathBuf {
    let config_path = dir.path().join("study.yaml");
    let config = format!(
        r#"
model:
  noise: fixed
acquisition:
  num_restarts: 4
  raw_samples: 64
stopping:
  max_iterations: 3
design:
  strategy: uniform
  initial_points: 3
  seed: 9
domain:
  upper: 30
output:
  dir: {}
  grid_points: 40
{extra}
"#,
        dir.path().join("out").display()
    );
    std::fs::write(&config_path, config).unwrap();
    config_path
}

fn run_args(config: PathBuf) -> RunArgs {
    RunArgs {
        config,
        output_dir: None,
        seed: None,
        max_iterations: None,
        interactive: false,
        no_visualize: true,
        dry_run: false,
    }
}

fn trial_logs(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("BayesOpt_outputs"))
            })
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[test]
fn test_run_command_writes_log_and_registry() {
    let dir = TempDir::new().unwrap();
    let config_path = create_test_config(&dir, "");

    run::run_run(run_args(config_path), LogLevel::Quiet).unwrap();

    let out = dir.path().join("out");
    let logs = trial_logs(&out);
    assert_eq!(logs.len(), 1);
    assert!(logs[0].to_string_lossy().ends_with("_EI_stopping_y.csv"));
    let logged = TrialLog::read(&logs[0]).unwrap();
    assert!(logged.trials.len() >= 4 && logged.trials.len() <= 6);
    assert!(logged.summary.is_some());
    assert!(out.join("BayesOpt_global_individuality_parameters.csv").exists());
}

#[test]
fn test_run_command_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut args = run_args(create_test_config(&dir, ""));
    args.dry_run = true;

    run::run_run(args, LogLevel::Quiet).unwrap();
    assert!(trial_logs(&dir.path().join("out")).is_empty());
}

#[test]
fn test_run_command_output_dir_override() {
    let dir = TempDir::new().unwrap();
    let mut args = run_args(create_test_config(&dir, ""));
    args.output_dir = Some(dir.path().join("elsewhere"));
    args.max_iterations = Some(1);

    run::run_run(args, LogLevel::Quiet).unwrap();
    let logs = trial_logs(&dir.path().join("elsewhere"));
    assert_eq!(logs.len(), 1);
    assert_eq!(TrialLog::read(&logs[0]).unwrap().trials.len(), 4);
}

#[test]
fn test_run_command_missing_file() {
    let result = run::run_run(
        run_args(PathBuf::from("/nonexistent/study.yaml")),
        LogLevel::Quiet,
    );
    assert!(result.unwrap_err().contains("Config error"));
}

#[test]
fn test_validate_command_basic() {
    let dir = TempDir::new().unwrap();
    let args = ValidateArgs {
        config: create_test_config(&dir, ""),
        detailed: false,
    };
    assert!(validate::run_validate(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_validate_command_detailed() {
    let dir = TempDir::new().unwrap();
    let args = ValidateArgs {
        config: create_test_config(&dir, ""),
        detailed: true,
    };
    assert!(validate::run_validate(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_validate_command_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("bad.yaml");
    std::fs::write(&config_path, "design:\n  initial_points: 0\n").unwrap();
    let args = ValidateArgs {
        config: config_path,
        detailed: false,
    };
    assert!(validate::run_validate(args, LogLevel::Quiet).is_err());
}

#[test]
fn test_identity_command() {
    let dir = TempDir::new().unwrap();
    let args = ConfigArgs {
        config: create_test_config(&dir, ""),
    };
    assert!(identity::run_identity(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_calibrate_command_with_analytic_oracle() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("calibrate.yaml");
    std::fs::write(&config_path, "domain:\n  ratio_min: 2.5\n  ratio_max: 3.2\n").unwrap();
    let args = ConfigArgs {
        config: config_path,
    };
    assert!(calibrate::run_calibrate(args, LogLevel::Verbose).is_ok());
}

#[test]
fn test_calibrate_command_fixed_upper() {
    let dir = TempDir::new().unwrap();
    let args = ConfigArgs {
        config: create_test_config(&dir, ""),
    };
    assert!(calibrate::run_calibrate(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_summary_command_text_and_json() {
    let dir = TempDir::new().unwrap();
    run::run_run(run_args(create_test_config(&dir, "")), LogLevel::Quiet).unwrap();
    let log = trial_logs(&dir.path().join("out")).remove(0);

    let text = summary::format_summary(&TrialLog::read(&log).unwrap());
    assert!(text.contains("Maximizer"));
    assert!(text.contains("Posterior mean over [0, 30]"));

    for format in [OutputFormat::Text, OutputFormat::Json] {
        let args = SummaryArgs {
            log: log.clone(),
            format,
        };
        assert!(summary::run_summary(args, LogLevel::Quiet).is_ok());
    }
}

#[test]
fn test_summary_of_incomplete_log() {
    let run = crate::io::LoggedRun {
        trials: vec![(1.0, 2.0), (3.0, 4.0)],
        summary: None,
    };
    assert!(summary::format_summary(&run).starts_with("2 trials, no summary"));
}

#[test]
fn test_run_command_dispatch() {
    let dir = TempDir::new().unwrap();
    let config_path = create_test_config(&dir, "");
    let cli = parse_args([
        "ensayo",
        "-q",
        "identity",
        config_path.to_str().unwrap(),
    ])
    .unwrap();
    assert!(run_command(cli).is_ok());
}
