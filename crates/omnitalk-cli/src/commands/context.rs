use anyhow::{Context, Result};
use omnitalk_core::group::ContextMessage;
use omnitalk_infrastructure::StoreSet;

pub fn show(stores: &StoreSet, group_id: &str) -> Result<()> {
    let context = stores
        .catalog
        .contexts()
        .get(group_id)
        .with_context(|| format!("Failed to read context of '{}'", group_id))?;
    println!("{}", serde_json::to_string_pretty(&context.bots)?);
    Ok(())
}

pub fn add(stores: &StoreSet, group_id: &str, bot: &str, role: &str, content: &str) -> Result<()> {
    if stores.catalog.get_group(group_id).is_none() {
        eprintln!("Warning: no catalog group has id '{}'", group_id);
    }
    stores
        .catalog
        .contexts()
        .append(group_id, bot, ContextMessage::new(role, content))
        .with_context(|| format!("Failed to append to context of '{}'", group_id))?;
    println!("Added {} message for {} in {}", role, bot, group_id);
    Ok(())
}

pub fn clear(stores: &StoreSet, group_id: &str, bot: Option<&str>) -> Result<()> {
    let contexts = stores.catalog.contexts();
    match bot {
        Some(bot) => {
            contexts
                .clear_bot(group_id, bot)
                .with_context(|| format!("Failed to clear {} in '{}'", bot, group_id))?;
            println!("Cleared {} in {}", bot, group_id);
        }
        None => {
            contexts
                .clear(group_id)
                .with_context(|| format!("Failed to clear context of '{}'", group_id))?;
            println!("Cleared context of {}", group_id);
        }
    }
    Ok(())
}

pub fn collect(stores: &StoreSet, bots: &[String]) -> Result<()> {
    let collected = stores.catalog.bots_context(bots)?;
    println!("{}", serde_json::to_string_pretty(&collected)?);
    Ok(())
}
