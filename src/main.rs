use clap::Parser;
use log::warn;
use parley::core::config::{self, CliOverrides, ParleyConfig};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "parley", about = "Terminal chat with a conversation sidebar")]
struct Args {
    /// Message count that fills a row's progress bar (0 disables it)
    #[arg(long)]
    max_chat_messages: Option<u32>,

    /// Hide the purpose symbol next to each conversation
    #[arg(long)]
    no_symbols: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to parley.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("parley.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Ignoring config file: {}", e);
        ParleyConfig::default()
    });
    let cli = CliOverrides {
        max_chat_messages: args.max_chat_messages,
        no_symbols: args.no_symbols,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!("Parley starting up with {:?}", resolved);

    parley::tui::run(resolved)
}
