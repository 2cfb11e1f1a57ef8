use crate::cli::args::{ConfigArgs, ConfigCommand};
use crate::config::Config;
use crate::error::Result;

/// Execute config command
pub fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("✅ Configuration updated: {} = {}", key, display_value(&key, &value));
            Ok(())
        }
        ConfigCommand::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{}: {}", key, display_value(&key, &value)),
                None => println!("Configuration key '{}' not set", key),
            }
            Ok(())
        }
        ConfigCommand::Path => {
            let path = Config::config_file_path()?;
            println!("Configuration file: {}", path.display());
            Ok(())
        }
        ConfigCommand::Init => {
            Config::initialize()?;
            println!("✅ Configuration initialized");
            println!();
            println!("To set your API key, run:");
            println!("  kolex config set law.key YOUR_OC");
            println!();
            println!("Get your API key from: https://open.law.go.kr");
            Ok(())
        }
    }
}

fn display_value(key: &str, value: &str) -> String {
    if key.ends_with(".key") {
        mask_value(value)
    } else {
        value.to_string()
    }
}

/// Mask sensitive values for display
fn mask_value(value: &str) -> String {
    let count = value.chars().count();
    if count > 4 {
        let visible: String = value.chars().take(4).collect();
        format!("{}...({} characters)", visible, count)
    } else {
        "*".repeat(count)
    }
}
