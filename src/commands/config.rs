use anyhow::{Context, Result};

use course_selection::config::ClientConfig;

use super::utils::AppContext;

/// Write a config file with the given overrides
pub fn init(ctx: &AppContext, api_url: Option<String>, timeout: Option<u64>, force: bool) -> Result<()> {
    if ctx.config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {} (use --force to overwrite)",
            ctx.config_path.display()
        );
    }

    let mut config = ClientConfig::default();
    if let Some(url) = api_url {
        config.api.base_url = url;
    }
    if let Some(timeout) = timeout {
        config.api.timeout_secs = timeout;
    }

    config.validate().context("Invalid configuration")?;
    config.save(&ctx.config_path)?;

    println!("✓ Configuration saved to: {}", ctx.config_path.display());
    println!("  API: {}", config.api.base_url);
    Ok(())
}

/// Print the effective configuration
pub fn show(ctx: &AppContext) -> Result<()> {
    println!("Course Selection Configuration");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Data directory: {}", ctx.data_dir.display());
    println!(
        "Config file:    {}{}",
        ctx.config_path.display(),
        if ctx.config_path.exists() { "" } else { " (not present, using defaults)" }
    );
    println!();

    let toml = toml::to_string_pretty(&ctx.config).context("Failed to serialize config")?;
    print!("{}", toml);
    Ok(())
}
