use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "pair-converter")]
#[command(about = "Two linked currency amount fields kept in sync through a rate-quote service")]
pub struct CliConfig {
    /// Path to a TOML pair configuration; the built-in RUB/USDT pair is used otherwise
    /// (its client key can be overridden with PAIR_CONVERTER_SERIAL)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
