//! Config Command
//!
//! Usage:
//!   gradlemeta config show [-g] [-f json|yaml|toml]
//!   gradlemeta config path
//!   gradlemeta config init [-g] [--force]

use crate::cli::ui::Output;
use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Show the effective configuration, or the raw global file with `global`
pub fn show(config: &Config, global: bool, format: &str) -> Result<()> {
    if !global {
        println!("{}", ConfigLoader::render(config, format)?);
        return Ok(());
    }

    match ConfigLoader::global_config_path() {
        Some(path) if path.exists() => {
            println!("# Global Config: {}\n", path.display());
            println!("{}", std::fs::read_to_string(&path)?);
        }
        Some(_) => {
            println!("No global config found.");
            println!("Run 'gradlemeta config init --global' to create one.");
        }
        None => println!("Cannot determine global config directory."),
    }
    Ok(())
}

pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

pub fn init(global: bool, force: bool) -> Result<()> {
    let path = ConfigLoader::init(global, force)?;
    let scope = if global { "global" } else { "project" };
    Output::new().success(&format!("Initialized {} configuration", scope));
    println!("  Config: {}", path.display());
    Ok(())
}
