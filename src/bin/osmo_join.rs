use anyhow::Result;
use clap::Parser;
use console::style;
use log::error;
use osmo_prepare::component::ChunkJoiner;
use osmo_prepare::component::chunk_joiner::{JoinError, is_cancellation};
use osmo_prepare::config::Config;
use osmo_prepare::signal::setup_shutdown_signal;
use osmo_prepare::{init, print_banner};
use rust_i18n::t;
use std::process::ExitCode;

rust_i18n::i18n!("locales", fallback = "en-US");

const EXIT_CANCELLED: u8 = 130;

/// Join 2 or more video files in the staging directory together
#[derive(Debug, Parser)]
#[command(name = "osmo_join", version)]
struct JoinArgs {
    /// Output base name; the joined file is written as <OUTPUT>.MP4
    output: String,

    /// Files to join, in order, relative to the staging directory
    #[arg(required = true, num_args = 2..)]
    files: Vec<String>,
}

fn main() -> Result<ExitCode> {
    let args = JoinArgs::parse();

    init::init();
    let shutdown_signal = setup_shutdown_signal()?;

    let config = Config::new();
    rust_i18n::set_locale(config.settings.language.as_str());

    print_banner();

    let joiner = ChunkJoiner::new(config.settings.joiner, shutdown_signal);

    match joiner.join_files(&args.output, &args.files) {
        Ok(_) => {
            println!("\n{}", style(t!("join.all_done")).green().bold());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if is_cancellation(&e) => {
            eprintln!("\n{}", style(t!("main.cancelled")).yellow().bold());
            Ok(ExitCode::from(EXIT_CANCELLED))
        }
        Err(e) => {
            error!("合併失敗: {e:#}");
            eprintln!("{} {e:#}", style(t!("main.error_prefix")).red().bold());
            if let Some(JoinError::ToolExecution { diagnostics, .. }) = e.downcast_ref() {
                eprintln!("{}", style(diagnostics).dim());
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
