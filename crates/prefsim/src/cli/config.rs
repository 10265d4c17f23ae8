//! The `prefsim config` command for configuration management.

use clap::{Args, Subcommand};
use prefsim_core::Config;
use std::path::{Path, PathBuf};

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Show config file path
    Path,

    /// Check the config file and report the first problem found
    Validate,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command against `explicit` or the default path.
pub fn execute(args: ConfigArgs, explicit: Option<&Path>) -> anyhow::Result<()> {
    let path: PathBuf = explicit.map(Path::to_path_buf).unwrap_or_else(Config::default_path);

    match args.command {
        ConfigCommand::Show => {
            let config = load(&path)?;
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", path.display());
        }

        ConfigCommand::Validate => {
            if !path.exists() {
                anyhow::bail!("No config file at: {}", path.display());
            }
            Config::load_from(&path)?;
            println!("Configuration at {} is valid.", path.display());
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = Config::default().to_toml()?;
            std::fs::write(&path, toml)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        Ok(Config::load_from(path)?)
    } else {
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_validate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let init = ConfigArgs {
            command: ConfigCommand::Init { force: false },
        };
        execute(init, Some(&path)).unwrap();
        assert!(path.exists());

        let validate = ConfigArgs {
            command: ConfigCommand::Validate,
        };
        execute(validate, Some(&path)).unwrap();
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let init = ConfigArgs {
            command: ConfigCommand::Init { force: false },
        };
        let err = execute(init, Some(&path)).unwrap_err();
        assert!(err.to_string().contains("--force"));

        let forced = ConfigArgs {
            command: ConfigCommand::Init { force: true },
        };
        execute(forced, Some(&path)).unwrap();
    }

    #[test]
    fn test_validate_reports_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[simulation]\nburnin = 2\n").unwrap();

        let validate = ConfigArgs {
            command: ConfigCommand::Validate,
        };
        assert!(execute(validate, Some(&path)).is_err());
    }
}
