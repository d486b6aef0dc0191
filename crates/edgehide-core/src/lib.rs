pub mod config;
pub mod desktop;
pub mod engine;
pub mod error;
pub mod ipc;
pub mod license;
pub mod log;
pub mod picker;
pub mod pid;
pub mod rect;

mod deferred;

#[cfg(test)]
mod fake;

pub use desktop::Desktop;
pub use engine::{Edge, EdgeHideEngine, TickReport, TrackedEntry, WindowState};
pub use error::{PlatformError, WindowResult};
pub use ipc::{Command, PIPE_NAME, Response};
pub use license::LicenseGate;
pub use picker::{PickOutcome, WindowPicker};
pub use rect::{Point, Rect, ScreenSize};
