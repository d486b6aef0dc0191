mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "edgehide",
    version,
    about = "Slide docked windows off the screen edge and reveal them on hover"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Start the edgehide daemon with its tray icon
    Start,
    /// Stop the daemon, restoring any hidden windows
    Stop,
    /// Show whether the daemon is running
    Status,
    /// Select a window to edge-hide by clicking on it
    Pick {
        /// Abandon a selection that is waiting for a click
        #[arg(long)]
        cancel: bool,
    },
    /// List the windows being edge-hidden
    List,
    /// Stop edge-hiding one window
    Remove {
        /// Window handle as shown by `edgehide list` (hex with 0x, or decimal)
        #[arg(value_parser = commands::parse_hwnd)]
        hwnd: usize,
    },
    /// Stop edge-hiding every window
    Clear,
    /// Show the activation state, or activate with a code
    License {
        /// Activation code for this machine
        code: Option<String>,
    },
    /// Run the daemon (internal, not for direct use)
    #[command(hide = true)]
    Daemon,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::License { code } => commands::license::execute(code.as_deref()),
        #[cfg(windows)]
        Commands::Start => commands::start::execute(),
        #[cfg(windows)]
        Commands::Stop => commands::stop::execute(),
        #[cfg(windows)]
        Commands::Status => commands::status::execute(),
        #[cfg(windows)]
        Commands::Pick { cancel } => commands::pick::execute(cancel),
        #[cfg(windows)]
        Commands::List => commands::list::execute(),
        #[cfg(windows)]
        Commands::Remove { hwnd } => commands::window::remove(hwnd),
        #[cfg(windows)]
        Commands::Clear => commands::window::clear(),
        #[cfg(windows)]
        Commands::Daemon => commands::daemon::execute(),
        #[cfg(not(windows))]
        _ => commands::unsupported(),
    }
}
