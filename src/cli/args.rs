//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;

use clap::{Parser, ValueEnum};

use gradient_inference::config::{Config, ConfigColorMode};

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "gradient")]
#[command(about = "Models, completions and pricing for the Gradient inference API", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// API key (defaults to $GRADIENT_API_KEY)
    #[arg(long, global = true, value_name = "KEY")]
    pub(crate) api_key: Option<String>,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if !self.no_color && config.no_color {
            self.no_color = true;
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        self.command = self.command.with_config(config);
        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::Commands;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gradient").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["models", "--api-key", "k-123", "--no-color"]);
        assert_eq!(cli.api_key.as_deref(), Some("k-123"));
        assert!(!cli.use_color());
    }

    #[test]
    fn color_always_wins_without_tty() {
        let cli = parse(&["--color", "always", "pricing"]);
        assert!(cli.use_color());
    }

    #[test]
    fn config_color_applies_only_at_default() {
        let config = Config::parse(r#"color = "always""#).unwrap();
        let cli = parse(&["pricing"]).with_config(&config);
        assert_eq!(cli.color, ColorMode::Always);

        let cli = parse(&["--color", "never", "pricing"]).with_config(&config);
        assert_eq!(cli.color, ColorMode::Never);
    }

    #[test]
    fn config_offline_applies_to_pricing() {
        let config = Config::parse("offline = true").unwrap();
        let cli = parse(&["pricing"]).with_config(&config);
        assert!(matches!(cli.command, Commands::Pricing { offline: true, .. }));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["gradient"]).is_err());
    }
}
