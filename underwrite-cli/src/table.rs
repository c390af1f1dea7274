//! Shared table styling.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

/// Maximum width of free-text cells before truncation.
pub const MAX_CELL_LENGTH: usize = 40;

/// A table with the house style.
pub fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Truncate a cell to `max_len` characters with an ellipsis.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}
