//! Local music to Spotify playlist sync library
//!
//! This library scans a directory of tagged audio files, looks every track up
//! in the Spotify catalog and asserts the matches onto a Spotify playlist.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `library` - Local directory scanning and tag extraction
//! - `management` - Cached credential management
//! - `spotify` - Spotify Web API client and the remote seams it implements
//! - `sync` - Catalog resolution, playlist inspection and reconciliation
//! - `types` - Data structures and type definitions
//!
//! # Example
//!
//! ```
//! use spotsync::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> spotsync::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod library;
pub mod management;
pub mod spotify;
pub mod sync;
pub mod types;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the command plumbing where several error types meet. The
/// components themselves return their own typed errors.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Scanning {}", directory.display());
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist updated");
/// success!("Resolved {} of {} tracks", found, total);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for fatal errors in the command layer, such as missing
/// credentials. Component code reports failures through return values.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Error reading metadata for {}: {}", file_name, reason);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
