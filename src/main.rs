use clap::Parser;
use pair_converter::config::SERIAL_ENV_VAR;
use pair_converter::core::SystemClock;
use pair_converter::domain::model::FieldProps;
use pair_converter::utils::{logger, validation::Validate};
use pair_converter::{
    CliConfig, HttpRateQuoteService, PairConfig, PairEvent, PairSession, PairSnapshot, Side,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

enum Command {
    Event(PairEvent),
    Show,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, arg) = line.split_once(' ').unwrap_or((line, ""));

    match verb {
        "focus" => match arg.trim() {
            "left" => Ok(Command::Event(PairEvent::Focus(Side::Left))),
            "right" => Ok(Command::Event(PairEvent::Focus(Side::Right))),
            other => Err(format!("unknown side '{}', expected left or right", other)),
        },
        // Everything after "type " is the raw field text, spaces included
        "type" => Ok(Command::Event(PairEvent::Edit(arg.to_string()))),
        "pick" => arg
            .trim()
            .trim_end_matches('%')
            .parse::<f64>()
            .map(|bucket| Command::Event(PairEvent::QuickPick(bucket)))
            .map_err(|_| format!("'{}' is not a bucket percentage", arg)),
        "show" => Ok(Command::Show),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err("empty command".to_string()),
        other => Err(format!(
            "unknown command '{}' (focus <side> | type <text> | pick <bucket> | show | quit)",
            other
        )),
    }
}

fn render_field(field: &FieldProps, driving: bool) -> String {
    let picks: Vec<String> = field
        .quick_picks
        .iter()
        .map(|p| format!("{}%[{:>3.0}]", p.bucket_percent, p.fill_width_percent))
        .collect();
    format!(
        "{} {:>20} {:<5} (label @ {}px)  {}",
        if driving { "▶" } else { " " },
        field.raw_text,
        field.currency_label,
        field.label_offset,
        picks.join(" ")
    )
}

fn print_snapshot(snapshot: &PairSnapshot) {
    for side in [Side::Left, Side::Right] {
        println!("{}", render_field(snapshot.field(side), snapshot.driving == side));
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting pair-converter console");

    let config = match &cli.config {
        Some(path) => match PairConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => PairConfig::default(),
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        match &cli.config {
            Some(path) => tracing::error!("💡 Suggestion: {} ({})", e.recovery_suggestion(), path),
            None => tracing::error!(
                "💡 Suggestion: check {} or pass --config with a pair file",
                SERIAL_ENV_VAR
            ),
        }
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let service = Arc::new(HttpRateQuoteService::new(&config.quote)?);
    let session = PairSession::from_config(&config, service, SystemClock)?;

    let (events_tx, events_rx) = mpsc::channel(32);
    let (snapshots_tx, snapshots_rx) = watch::channel(session.snapshot());
    print_snapshot(&snapshots_rx.borrow());

    let session_task = tokio::spawn(session.run(events_rx, snapshots_tx));

    let mut printer_rx = snapshots_rx.clone();
    let printer = tokio::spawn(async move {
        while printer_rx.changed().await.is_ok() {
            let snapshot = printer_rx.borrow_and_update().clone();
            print_snapshot(&snapshot);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Command::Event(event)) => {
                if events_tx.send(event).await.is_err() {
                    break;
                }
            }
            Ok(Command::Show) => print_snapshot(&snapshots_rx.borrow()),
            Ok(Command::Quit) => break,
            Err(message) => eprintln!("❌ {}", message),
        }
    }

    // The session drops the snapshot sender on exit, which lets the printer
    // drain the last snapshot and stop.
    drop(events_tx);
    let stats = session_task.await?;
    printer.await?;

    tracing::info!(
        "✅ Done: {} applied, {} stale, {} failed",
        stats.responses_applied,
        stats.responses_stale,
        stats.failures
    );
    Ok(())
}
