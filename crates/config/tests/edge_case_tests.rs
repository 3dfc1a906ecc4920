//! Edge case and error scenario tests

use stagecast_config::{Config, ConfigManager};
use std::fs;
use tempfile::TempDir;

fn setup_test_manager() -> Result<(TempDir, ConfigManager), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;
    Ok((temp_dir, manager))
}

#[test]
fn test_corrupted_config_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(manager.config_path(), "this is not valid TOML {{{")?;

    assert!(manager.load().is_err());
    assert_eq!(manager.load_or_default(), Config::default());
    Ok(())
}

#[test]
fn test_save_creates_parent_directories() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().join("a").join("b"))?;

    manager.save(&Config::default())?;
    assert!(manager.config_path().exists());

    let mut store = manager.presets()?;
    store.set_active(None)?;
    assert!(manager.presets_path().exists());
    Ok(())
}

#[test]
fn test_unknown_keys_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(
        manager.config_path(),
        "version = 1\n\n[player]\ndefault_volume = 80\n\n[sync]\nsnap_tolerance_secs = 1.5\n",
    )?;

    let config = manager.load()?;
    assert_eq!(config.sync.snap_tolerance_secs, 1.5);
    Ok(())
}

#[test]
fn test_unknown_transition_is_a_parse_error() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(manager.config_path(), "[slideshow]\ndefault_transition = \"wipe\"\n")?;

    assert!(manager.load().is_err());
    Ok(())
}

#[test]
fn test_newer_version_still_loads() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(manager.config_path(), "version = 99\n")?;

    let config = manager.load()?;
    assert_eq!(config.version, 99);
    assert_eq!(config.scripture, Config::default().scripture);
    Ok(())
}

#[test]
fn test_update_on_corrupted_file_fails_without_overwriting() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(manager.config_path(), "[[[")?;

    assert!(manager.update(|c| c.sync.snap_tolerance_secs = 1.0).is_err());
    assert_eq!(fs::read_to_string(manager.config_path())?, "[[[");
    Ok(())
}
