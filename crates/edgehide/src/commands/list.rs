use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

use edgehide_core::Command;

use super::client;

/// Prints the tracked windows as a table.
pub fn execute() {
    let windows = client::request(&Command::List).windows;

    if windows.is_empty() {
        println!("No windows are being edge-hidden. Run 'edgehide pick' to add one.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("HWND"),
            Cell::new("Title"),
            Cell::new("State"),
        ]);

    for window in &windows {
        let state = match window.edge {
            Some(edge) if window.hidden => format!("hidden ({edge:?})").to_lowercase(),
            _ => "visible".to_string(),
        };
        table.add_row(vec![
            Cell::new(format!("0x{:X}", window.hwnd)),
            Cell::new(&window.title),
            Cell::new(state),
        ]);
    }

    println!("{table}");
    println!("\n{} windows tracked", windows.len());
}
