//! Configuration and CLI argument handling

use clap::Parser;

use crate::presets::Preset;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "minimal-pomodoro")]
#[command(about = "A Pomodoro work/rest phase timer served over HTTP")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20525")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Initial work / rest lengths in minutes, e.g. "50 / 10"
    #[arg(long, default_value = "25 / 5")]
    pub preset: Preset,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
