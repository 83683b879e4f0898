use anyhow::{Context, Result};
use omnitalk_infrastructure::StoreSet;
use serde_json::json;

pub fn show(stores: &StoreSet) -> Result<()> {
    let state = stores.config.snapshot();
    let token = if state.token.is_empty() {
        "(none)".to_string()
    } else {
        "(set)".to_string()
    };

    let output = json!({
        "username": state.username,
        "mode": state.mode,
        "token": token,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn set_mode(stores: &StoreSet, mode: &str) -> Result<()> {
    stores
        .config
        .update_mode_str(mode)
        .with_context(|| format!("Failed to set mode to '{}'", mode))?;
    println!("Mode set to {}", stores.config.mode());
    Ok(())
}
