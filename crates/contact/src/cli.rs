use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "contact", version, about = "Contact form renderer and driver")]
pub struct Cli {
    /// Locale to render in; unknown locales fall back to the default locale
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// RON file with the texts of every locale (built-in texts when omitted)
    #[arg(long, global = true)]
    pub texts: Option<PathBuf>,

    /// RON list of country names (built-in list when omitted)
    #[arg(long, global = true)]
    pub countries: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `form=trace` (RUST_LOG wins when set)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Render the empty form
    Show,
    /// Load a JSON value tree, submit it and print the outcome
    Submit {
        /// JSON file shaped like the submitted values
        values: PathBuf,
    },
    /// Replay a RON list of user actions, rendering after each submit
    Script {
        script: PathBuf,
    },
}
