//! Config command handler.

use anyhow::{Context, Result};
use gitaide_core::{Settings, SettingsUpdate, load_settings, save_settings};

use crate::bootstrap::CliContext;
use crate::commands::ConfigCommand;
use crate::presentation::{format_optional, print_separator};

/// Execute the config command.
pub fn execute(ctx: &CliContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show { json: false } => {
            print_settings(&ctx.settings);
            Ok(())
        }
        ConfigCommand::Show { json: true } => {
            println!("{}", serde_json::to_string_pretty(&ctx.settings)?);
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", ctx.settings_path.display());
            Ok(())
        }
        ConfigCommand::Set { key, value } => {
            let saved = set_value(ctx, &key, &value)?;
            println!("✓ {key} updated in {}", ctx.settings_path.display());
            print_settings(&saved);
            Ok(())
        }
    }
}

/// Apply one `key value` pair to the stored settings file.
///
/// Only the file is changed; flags and environment overrides of the current
/// invocation are not persisted.
pub fn set_value(ctx: &CliContext, key: &str, value: &str) -> Result<Settings> {
    let update = SettingsUpdate::from_key_value(key, value)?;
    let mut stored = load_settings(&ctx.settings_path)?;
    stored.merge(&update);
    save_settings(&ctx.settings_path, &stored)
        .with_context(|| format!("Failed to save {key}"))?;
    Ok(stored)
}

fn print_settings(settings: &Settings) {
    let defaults = Settings::with_defaults();
    let settings = settings.clone().or(&defaults);

    println!("Settings:");
    print_separator(48);
    println!("  provider:         {}", settings.effective_provider());
    println!(
        "  provider_program: {}",
        format_optional(settings.provider_program.as_ref(), "(provider default)")
    );
    println!(
        "  model:            {}",
        format_optional(settings.model.as_ref(), "(assistant default)")
    );
    println!("  timeout_secs:     {}", settings.effective_timeout().as_secs());
    println!("  exit_command:     {}", settings.effective_exit_command());
    println!("  streaming:        {}", settings.effective_streaming());
    println!("  base_branch:      {}", settings.effective_base_branch());
}
