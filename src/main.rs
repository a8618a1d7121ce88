use anyhow::Result;
use console::style;
use log::{error, info};
use osmo_prepare::component::ChunkJoiner;
use osmo_prepare::component::chunk_joiner::{RunOutcome, is_cancellation};
use osmo_prepare::config::Config;
use osmo_prepare::signal::setup_shutdown_signal;
use osmo_prepare::{init, print_banner};
use rust_i18n::t;
use std::process::ExitCode;

rust_i18n::i18n!("locales", fallback = "en-US");

/// 使用者中斷時的結束碼
const EXIT_CANCELLED: u8 = 130;

fn main() -> Result<ExitCode> {
    init::init();
    let shutdown_signal = setup_shutdown_signal()?;

    let config = Config::new();
    rust_i18n::set_locale(config.settings.language.as_str());

    print_banner();

    let joiner = ChunkJoiner::new(config.settings.joiner, shutdown_signal);

    let code = match joiner.run() {
        Ok(RunOutcome::Completed(stats)) => {
            stats.print();
            info!(
                "程式結束 - 成功: {}, 失敗: {}",
                stats.groups_succeeded,
                stats.groups_failed()
            );
            if stats.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Ok(RunOutcome::NoGroups { .. }) => ExitCode::SUCCESS,
        Ok(RunOutcome::NoInput) => ExitCode::FAILURE,
        Err(e) if is_cancellation(&e) => {
            eprintln!("\n{}", style(t!("main.cancelled")).yellow().bold());
            ExitCode::from(EXIT_CANCELLED)
        }
        Err(e) => {
            error!("執行失敗: {e:#}");
            eprintln!("{} {e:#}", style(t!("main.error_prefix")).red().bold());
            ExitCode::FAILURE
        }
    };

    Ok(code)
}
