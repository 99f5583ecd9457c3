use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use trip_solver::config::{load_config, load_config_or_default, PlannerConfig, WORKERS_ENV};
use trip_solver::feasibility::Side;
use trip_solver::SolverError;

fn unique_temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    env::temp_dir().join(format!("trip_solver_{name}_{}_{nanos}.yaml", std::process::id()))
}

#[test]
fn workers_env_overrides_config_and_ignores_garbage() {
    // The only test in this binary that touches the variable.
    env::set_var(WORKERS_ENV, "3");
    assert_eq!(PlannerConfig::default().with_env_overrides().workers, 3);

    env::set_var(WORKERS_ENV, " 5 ");
    assert_eq!(PlannerConfig::default().with_env_overrides().workers, 5);

    let configured = PlannerConfig {
        workers: 2,
        ..PlannerConfig::default()
    };
    env::set_var(WORKERS_ENV, "many");
    assert_eq!(configured.clone().with_env_overrides().workers, 2);

    env::remove_var(WORKERS_ENV);
    assert_eq!(configured.with_env_overrides().workers, 2);
}

#[test]
fn load_config_reads_yaml_file() {
    let path = unique_temp_path("load");
    fs::write(&path, "side: home\nmax_hours: 10\n").expect("write config");

    let config = load_config(&path).expect("valid config");
    assert_eq!(config.side, Side::Home);
    assert_eq!(config.max_hours, 10);
    assert_eq!(config.min_hours, 1);

    let _ = fs::remove_file(&path);
}

#[test]
fn load_config_reports_missing_and_invalid_files() {
    let missing = unique_temp_path("missing");
    assert!(matches!(load_config(&missing), Err(SolverError::Io { .. })));

    let invalid = unique_temp_path("invalid");
    fs::write(&invalid, "max_hours: 30\n").expect("write config");
    assert!(matches!(load_config(&invalid), Err(SolverError::InvalidConfig(_))));
    assert!(matches!(
        load_config_or_default(&invalid),
        Err(SolverError::InvalidConfig(_))
    ));
    let _ = fs::remove_file(&invalid);
}

#[test]
fn load_config_or_default_falls_back_without_a_file() {
    let config = load_config_or_default(unique_temp_path("absent")).expect("defaults");
    let defaults = PlannerConfig::default();
    assert_eq!(config.solver, defaults.solver);
    assert_eq!(config.schedule, defaults.schedule);
    assert_eq!((config.min_hours, config.max_hours), (1, 24));

    let path = unique_temp_path("present");
    fs::write(&path, "min_hours: 4\n").expect("write config");
    let config = load_config_or_default(&path).expect("valid config");
    assert_eq!(config.min_hours, 4);
    let _ = fs::remove_file(&path);
}
