//! Config command handler.

use unitsplit::config::UnitsplitConfig;

/// Config command.
pub fn cmd_config(config: &UnitsplitConfig, show: bool) -> anyhow::Result<()> {
    if !show {
        println!("Use --show to display the effective configuration.");
        return Ok(());
    }

    println!("Current Configuration");
    println!("=====================");
    println!();

    println!("Config File Loaded:");
    match &config.source {
        Some(source) => println!("  - {}", source.display()),
        None => println!("  (none - using defaults)"),
    }
    println!();

    print!("{}", config.to_toml()?);
    Ok(())
}
