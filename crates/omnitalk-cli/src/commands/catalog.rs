use anyhow::{Context, Result};
use omnitalk_infrastructure::StoreSet;

use super::format_group;
use super::group::report;

pub fn list(stores: &StoreSet) -> Result<()> {
    for group in stores.catalog.list() {
        println!("{}", format_group(&group, false));
    }
    Ok(())
}

pub fn create(stores: &StoreSet, name: &str, bots: Vec<String>) -> Result<()> {
    let group = stores
        .catalog
        .create_group(name, bots)
        .with_context(|| format!("Failed to create group '{}'", name))?;
    println!("Created {}", format_group(&group, false));
    report(stores.sync_groups()?);
    Ok(())
}

pub fn update(stores: &StoreSet, group_id: &str, name: &str, bots: Vec<String>) -> Result<()> {
    let group = stores
        .catalog
        .update_group(group_id, name, bots)
        .with_context(|| format!("Failed to update group '{}'", group_id))?;
    println!("Updated {}", format_group(&group, false));
    report(stores.sync_groups()?);
    Ok(())
}

pub fn delete(stores: &StoreSet, group_id: &str) -> Result<()> {
    let group = stores
        .catalog
        .delete_group(group_id)
        .with_context(|| format!("Failed to delete group '{}'", group_id))?;
    println!("Deleted {} ({})", group.id, group.name);
    report(stores.sync_groups()?);
    Ok(())
}
