//! Command-line and environment configuration for the `wschat` binary.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use clap::Parser;

use crate::ui::OutputFormat;

pub const DEFAULT_PAGE_URL: &str = "http://127.0.0.1:3000/";

#[derive(Parser, Debug, Clone)]
#[command(name = "wschat", about = "Minimal websocket chat client")]
pub struct Config {
    /// URL of the page hosting the chat; the websocket endpoint is derived from it.
    #[arg(long, env = "WSCHAT_PAGE_URL", default_value = DEFAULT_PAGE_URL)]
    pub page_url: String,

    /// Connect immediately instead of waiting for `/connect`.
    #[arg(long, env = "WSCHAT_AUTOCONNECT", default_value_t = false)]
    pub connect: bool,

    /// Write one JSON object per event instead of timestamped text.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl Config {
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        if self.json { OutputFormat::Json } else { OutputFormat::Text }
    }
}
