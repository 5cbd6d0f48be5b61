//! CLI module for SupportBot
//!
//! Command-line parsing for the supportbot-server binary. Uses clap for
//! argument parsing and owo-colors for colored terminal output.

pub mod check;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SupportBot - knowledge-grounded customer support server
#[derive(Parser, Debug)]
#[command(
    name = "supportbot-server",
    version,
    about = "SupportBot - answers customer questions from a knowledge document",
    long_about = "SupportBot loads a knowledge document, indexes it with hosted embeddings and answers\n\
                  questions on POST /process-message using a hosted LLM.\n\n\
                  Run without arguments to start the server, or use 'check' to validate the setup.",
    after_help = "EXAMPLES:\n    \
                  supportbot-server                          # Start the server (reads supportbot.toml)\n    \
                  supportbot-server --config prod.toml       # Use a custom config file\n    \
                  supportbot-server check                    # Validate config and knowledge file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = crate::utils::toml_config::DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Validate configuration and the knowledge file without contacting the provider
    Check,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether the configuration path was left at its default
    pub fn uses_default_config(&self) -> bool {
        self.config.as_os_str() == crate::utils::toml_config::DEFAULT_CONFIG_PATH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["supportbot-server"]).unwrap();
        assert!(cli.uses_default_config());
        assert!(!cli.verbose);
        assert!(!cli.no_color);
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_check_with_global_flags() {
        let cli = Cli::try_parse_from([
            "supportbot-server",
            "check",
            "--config",
            "prod.toml",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Commands::Check));
        assert_eq!(cli.config, PathBuf::from("prod.toml"));
        assert!(!cli.uses_default_config());
        assert!(cli.no_color);
    }

    #[test]
    fn test_long_help_names_the_product() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("SupportBot"));
        assert!(help.contains("/process-message"));
    }
}
