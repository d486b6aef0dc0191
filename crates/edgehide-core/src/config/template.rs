/// Generates the default `config.toml` contents with explanatory comments.
///
/// This is used by `edgehide init` to create a starter config file that
/// users can immediately edit.
pub fn generate_config() -> String {
    r##"# edgehide configuration
# Location: ~/.config/edgehide/config.toml

[edge]
# How close (px) a window's right or top edge must be to the screen
# edge before it counts as docked and slides away.
sensitivity = 5
# Width (px) of the strip along the screen edge that brings a hidden
# window back when the cursor enters it.
trigger_width = 5
# How much (px) of a hidden window stays visible.
sliver = 5

[timing]
# Milliseconds between two checks of the tracked windows.
tick_ms = 100
# Milliseconds a revealed window stays above all others before it
# returns to the normal stacking order.
topmost_revert_ms = 100

[logging]
# Enable file logging to ~/.config/edgehide/logs/edgehide.log.
enabled = false
# Minimum log level: "debug", "info", "warn", or "error".
level = "info"
# Maximum log file size in MB before rotation.
max_file_mb = 10
"##
    .to_string()
}
