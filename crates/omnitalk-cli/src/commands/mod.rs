pub mod catalog;
pub mod config;
pub mod context;
pub mod group;

use omnitalk_core::group::GroupInfo;

/// One-line summary of a group: `id  name  [bot, bot]`.
pub(crate) fn format_group(group: &GroupInfo, selected: bool) -> String {
    let marker = if selected { "*" } else { " " };
    let default_tag = if group.is_default { " (default)" } else { "" };
    format!(
        "{} {:<20} {}{}  [{}]",
        marker,
        group.id,
        group.name,
        default_tag,
        group.bot_names.join(", ")
    )
}
