mod loader;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::log::LogConfig;

pub use loader::{ConfigError, config_dir, config_path, load, try_load};

/// Top-level configuration for edgehide.
///
/// Loaded from `~/.config/edgehide/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Docking and reveal distances.
    pub edge: EdgeConfig,
    /// Timer periods.
    pub timing: TimingConfig,
    /// File logging.
    pub logging: LogConfig,
}

/// Distances, in pixels, that control docking and reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// How close a window edge must be to the screen edge to count as docked.
    pub sensitivity: i32,
    /// Width of the strip along the screen edge that reveals a hidden window.
    pub trigger_width: i32,
    /// How much of a hidden window stays on screen.
    pub sliver: i32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            sensitivity: 5,
            trigger_width: 5,
            sliver: 5,
        }
    }
}

/// Timer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Milliseconds between two monitoring passes.
    pub tick_ms: u32,
    /// Milliseconds a revealed window stays topmost.
    pub topmost_revert_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            topmost_revert_ms: 100,
        }
    }
}

impl Config {
    /// Clamps distances and timer periods to safe ranges.
    ///
    /// Prevents negative bands, slivers too thin to grab, and timer
    /// periods that would either spin the CPU or feel unresponsive.
    pub fn validate(&mut self) {
        self.edge.sensitivity = self.edge.sensitivity.clamp(0, 100);
        self.edge.trigger_width = self.edge.trigger_width.clamp(1, 100);
        self.edge.sliver = self.edge.sliver.clamp(1, 200);
        self.timing.tick_ms = self.timing.tick_ms.clamp(16, 2000);
        self.timing.topmost_revert_ms = self.timing.topmost_revert_ms.clamp(0, 5000);
    }
}
