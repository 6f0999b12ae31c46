//! Integration tests for the persisted registry

use packrat::backup::ArchiveServiceConfig;
use packrat::cli::{Cli, RunContext};
use packrat::config::{ConfigLoader, PackratConfig};
use packrat::error::BackupError;
use packrat::report::{ReportSinkConfig, Verbosity};
use clap::Parser;
use tempfile::TempDir;

fn execute(ctx: &mut RunContext, args: &[&str]) -> Result<String, BackupError> {
    let mut argv = vec!["packrat"];
    argv.extend_from_slice(args);
    ctx.execute(&Cli::try_parse_from(argv).unwrap().command)
}

fn reload(path: &std::path::Path) -> PackratConfig {
    ConfigLoader::load_with_env(path, Some(config::Map::new())).unwrap()
}

#[test]
fn test_registry_survives_reload() {
    let temp_dir = TempDir::new().unwrap();
    let registry = temp_dir.path().join("packrat.toml");
    let data = temp_dir.path().join("data");
    std::fs::create_dir(&data).unwrap();

    let mut ctx = RunContext::from_parts(registry.clone(), PackratConfig::default());
    execute(&mut ctx, &["add", data.to_str().unwrap()]).unwrap();
    execute(
        &mut ctx,
        &["service", "add", "daily", "bundle", "--location", "/srv/{date.yyyy}.pack"],
    )
    .unwrap();
    execute(&mut ctx, &["report", "add", "out", "console", "--level", "warn"]).unwrap();

    let loaded = reload(&registry);
    assert_eq!(&loaded, ctx.config());
    assert!(loaded.files.contains(&data));
    assert_eq!(
        loaded.archives["daily"],
        ArchiveServiceConfig::Bundle {
            location: "/srv/{date.yyyy}.pack".to_string()
        }
    );
    assert_eq!(
        loaded.reporters["out"],
        ReportSinkConfig::Console {
            level: Verbosity::Warn
        }
    );
}

#[test]
fn test_remove_unknown_service_fails_and_keeps_file() {
    let temp_dir = TempDir::new().unwrap();
    let registry = temp_dir.path().join("packrat.toml");
    let mut ctx = RunContext::from_parts(registry.clone(), PackratConfig::default());

    let err = execute(&mut ctx, &["service", "remove", "ghost"]).unwrap_err();
    assert!(matches!(err, BackupError::UnknownService(name) if name == "ghost"));
    assert!(!registry.exists());
}

#[test]
fn test_run_context_loads_existing_registry() {
    let temp_dir = TempDir::new().unwrap();
    let registry = temp_dir.path().join("packrat.toml");
    std::fs::write(
        &registry,
        r#"files = ["/home/me/notes"]

[archives.weekly]
type = "tar"
location = "/srv/weekly.tar"

[reporters.log]
type = "log_file"
path = "/var/log/packrat.log"
level = "verbose"
"#,
    )
    .unwrap();

    let ctx = RunContext::new(Some(registry)).unwrap();
    let config = ctx.config();
    assert_eq!(config.files.len(), 1);
    assert_eq!(config.archives["weekly"].type_name(), "tar");
    assert_eq!(config.reporters["log"].level(), Verbosity::Verbose);
}

#[test]
fn test_status_json_reflects_registry() {
    let temp_dir = TempDir::new().unwrap();
    let registry = temp_dir.path().join("packrat.toml");
    let mut ctx = RunContext::from_parts(registry, PackratConfig::default());
    execute(
        &mut ctx,
        &["service", "add", "daily", "tar", "--location", "/srv/a.tar"],
    )
    .unwrap();

    let out = execute(&mut ctx, &["status", "--format", "json"]).unwrap();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["archives"][0]["name"], "daily");
    assert_eq!(json["archives"][0]["type"], "tar");
}
