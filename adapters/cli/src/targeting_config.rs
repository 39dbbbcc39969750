use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_chase_ghost_ai::TargetingConfig;

/// Loads ghost targeting tunables from a TOML file.
pub(crate) fn load(path: &Path) -> Result<TargetingConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&contents)
        .with_context(|| format!("failed to load {}", path.display()))
}

fn parse(contents: &str) -> Result<TargetingConfig> {
    toml::from_str(contents).context("invalid targeting toml")
}
