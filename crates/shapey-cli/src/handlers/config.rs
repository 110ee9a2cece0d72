//! Configuration command handlers

use crate::cli::{ConfigArgs, ConfigCommand, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use std::path::PathBuf;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.command {
        ConfigCommand::Show(show_args) => handle_config_show(show_args, config, output),
        ConfigCommand::Init(init_args) => handle_config_init(init_args, output),
    }
}

/// Handle config show subcommand
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.section("Effective configuration")?;
    let rendered = match args.format {
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)? + "\n",
    };
    output.write(&rendered)?;

    output.section("Search paths")?;
    let rows = Config::default_config_paths()
        .into_iter()
        .map(|path| {
            let found = if path.exists() { "yes" } else { "no" };
            vec![path.display().to_string(), found.to_string()]
        })
        .collect();
    output.table(&["path", "found"], rows)
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let path = args.path.unwrap_or_else(|| match args.format {
        ConfigFormat::Yaml => PathBuf::from(".shapey.yaml"),
        ConfigFormat::Json => PathBuf::from(".shapey.json"),
    });

    if !matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("json") | Some("yaml") | Some("yml")
    ) {
        return Err(Error::invalid_args(format!(
            "config file {} must end in .json, .yaml or .yml",
            path.display()
        )));
    }

    if path.exists() && !args.force {
        return Err(Error::config(format!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        )));
    }

    Config::template().save(&path)?;
    output.success(&format!("✓ Created config at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use shapey_core::Mode;
    use tempfile::TempDir;

    fn sink() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Human, false, false, 0, Box::new(std::io::sink()))
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shapey.json");
        let args = ConfigInitArgs {
            path: Some(path.clone()),
            format: ConfigFormat::Yaml,
            force: false,
        };
        handle_config_init(args, &mut sink()).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.defaults.mode().unwrap(), Some(Mode::Loose));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".shapey.yaml");
        std::fs::write(&path, "output:\n  color: false\n").unwrap();

        let args = ConfigInitArgs {
            path: Some(path.clone()),
            format: ConfigFormat::Yaml,
            force: false,
        };
        let err = handle_config_init(args, &mut sink()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(!Config::from_file(&path).unwrap().output.color);

        let args = ConfigInitArgs {
            path: Some(path.clone()),
            format: ConfigFormat::Yaml,
            force: true,
        };
        handle_config_init(args, &mut sink()).unwrap();
        assert!(Config::from_file(&path).unwrap().output.color);
    }

    #[test]
    fn test_init_rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let args = ConfigInitArgs {
            path: Some(dir.path().join("shapey.toml")),
            format: ConfigFormat::Yaml,
            force: false,
        };
        let err = handle_config_init(args, &mut sink()).unwrap_err();
        assert!(err.should_show_help());
    }

    #[test]
    fn test_show_renders_config() {
        let args = ConfigArgs {
            command: ConfigCommand::Show(ConfigShowArgs {
                format: ConfigFormat::Json,
            }),
        };
        handle_config(args, &Config::template(), &mut sink()).unwrap();
    }
}
