//! Utils

use clap::Parser;

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Arguments for the checkout example
#[derive(Debug, Parser)]
pub struct ExampleCheckoutArgs {
    /// Number of items to add to the basket
    #[clap(short, long)]
    pub n: Option<usize>,

    /// Fixture set to use for the basket & deals
    #[clap(short, long, default_value = "meal_deal")]
    pub fixture: String,

    /// Log level (trace, debug, info, warn, error)
    #[clap(short, long, default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[clap(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
