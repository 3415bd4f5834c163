//! CLI subcommand definitions

use clap::Subcommand;

use gradient_inference::config::Config;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List models available to the API key
    Models {
        /// Only show models whose id or name contains this text
        #[arg(short, long, value_name = "QUERY")]
        filter: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Send one message and print the reply
    Chat {
        /// Message text
        message: String,

        /// System prompt (chat-completions only)
        #[arg(short, long)]
        system: Option<String>,

        /// Model id (defaults to the configured default model)
        #[arg(short, long)]
        model: Option<String>,

        /// Sampling temperature, 0.0 to 2.0
        #[arg(short, long)]
        temperature: Option<f64>,

        /// Maximum tokens in the reply
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Use the responses API instead of chat-completions
        #[arg(short, long)]
        responses: bool,

        /// Ask the responses API to store the response (implies --responses)
        #[arg(long)]
        store: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Show per-model token pricing
    Pricing {
        /// Only show rows whose model or provider contains this text
        #[arg(short, long, value_name = "QUERY")]
        filter: Option<String>,

        /// Ignore the cache and fetch the pricing page
        #[arg(long)]
        no_cache: bool,

        /// Never touch the network: use the cache at any age, then the bundled snapshot
        #[arg(short = 'O', long, conflicts_with = "no_cache")]
        offline: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

impl Commands {
    pub(crate) fn with_config(self, config: &Config) -> Self {
        match self {
            Commands::Pricing {
                filter,
                no_cache,
                offline,
                json,
            } => Commands::Pricing {
                filter,
                no_cache,
                // --no-cache asks for a live fetch, which offline would forbid
                offline: offline || (config.offline && !no_cache),
                json,
            },
            other => other,
        }
    }
}
