//! Configuration loading and production wiring.

use super::helpers::create_temp_dir;
use bibwarden::config::{CONFIG_FILE, ConfigError, CuratorConfig};
use bibwarden::curator::{Production, WiringError};
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use eyre::{Result, ensure};
use rstest::rstest;

#[rstest]
fn missing_file_loads_defaults() -> Result<()> {
    let root = create_temp_dir("bibwarden_config_missing")?;
    let config = CuratorConfig::load(&root, Utf8Path::new(CONFIG_FILE))?;
    ensure!(config == CuratorConfig::default());
    Ok(())
}

#[rstest]
fn file_values_are_used() -> Result<()> {
    let root = create_temp_dir("bibwarden_config_file")?;
    Dir::open_ambient_dir(&root, ambient_authority())?.write(
        CONFIG_FILE,
        "repository = \"acme/papers\"\nmaintainer = \"curator\"\nbib_dir = \"refs\"\n",
    )?;

    let config = CuratorConfig::load(&root, Utf8Path::new(CONFIG_FILE))?;

    ensure!(config.repository()?.as_str() == "acme/papers");
    ensure!(config.ledger_path() == "refs/unresolved.json");
    Ok(())
}

#[rstest]
fn production_wiring_requires_a_maintainer() -> Result<()> {
    let root = create_temp_dir("bibwarden_config_wiring")?;
    let config = CuratorConfig {
        repository: Some("acme/papers".to_owned()),
        ..CuratorConfig::default()
    };

    let result = Production::build(&config, &root, "token");

    ensure!(matches!(
        result,
        Err(WiringError::Config(ConfigError::Missing("maintainer")))
    ));
    Ok(())
}
