//! `parley config` - show the resolved configuration.

use std::path::Path;

use parley_types::config::AppConfig;

/// Print the configuration after file loading and environment overrides.
pub fn show_config(config: &AppConfig, data_dir: &Path, json: bool) -> anyhow::Result<()> {
    let database_url = config.storage.database_url_or_default(data_dir);

    if json {
        let out = serde_json::json!({
            "data_dir": data_dir.display().to_string(),
            "database_url": database_url,
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        console::style("Data directory:").bold(),
        console::style(data_dir.display()).cyan()
    );
    println!(
        "  {} {}",
        console::style("Database:").bold(),
        console::style(&database_url).cyan()
    );
    println!();
    for line in toml::to_string_pretty(config)?.lines() {
        println!("  {line}");
    }
    println!();
    Ok(())
}
