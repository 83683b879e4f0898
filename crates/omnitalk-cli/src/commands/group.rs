use anyhow::Result;
use omnitalk_core::group::SelectionOutcome;
use omnitalk_infrastructure::StoreSet;

use super::format_group;

pub fn list(stores: &StoreSet) -> Result<()> {
    let current_id = stores.groups.current_group_id();
    let groups = stores.groups.groups();

    if groups.is_empty() {
        println!("No groups. Run `omnitalk group sync` to load the catalog.");
        return Ok(());
    }
    for group in &groups {
        println!("{}", format_group(group, group.id == current_id));
    }
    Ok(())
}

pub fn current(stores: &StoreSet) -> Result<()> {
    match stores.groups.current_group() {
        Some(group) => println!("{}", format_group(&group, true)),
        None => println!(
            "No group matches the selection '{}'",
            stores.groups.current_group_id()
        ),
    }
    Ok(())
}

pub fn bots(stores: &StoreSet) -> Result<()> {
    for bot in stores.groups.group_bots() {
        println!("{}", bot);
    }
    Ok(())
}

pub fn select(stores: &StoreSet, group_id: &str) -> Result<()> {
    stores.groups.set_current_group_id(group_id)?;
    if !stores.groups.has_valid_selection() {
        eprintln!("Warning: no known group has id '{}'", group_id);
    }
    println!("Selected {}", group_id);
    Ok(())
}

pub fn sync(stores: &StoreSet) -> Result<()> {
    report(stores.sync_groups()?);
    Ok(())
}

pub(crate) fn report(outcome: SelectionOutcome) {
    match outcome {
        SelectionOutcome::Retained => {}
        SelectionOutcome::Defaulted(id) => println!("Selection moved to default group {}", id),
        SelectionOutcome::Dangling(id) => {
            eprintln!("Warning: selected group '{}' no longer exists", id)
        }
    }
}
