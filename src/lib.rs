pub mod component;
pub mod config;
pub mod init;
pub mod signal;
pub mod tools;

rust_i18n::i18n!("locales", fallback = "en-US");

use console::style;
use rust_i18n::t;

/// 程式啟動時顯示的橫幅
pub fn print_banner() {
    println!("{}", style(t!("banner.title")).cyan().bold());
    println!("{}", style(t!("banner.subtitle")).dim());
    println!();
}

/// 區段標題，與其底線
pub fn print_section_header(title: &str) {
    println!();
    println!("{}", style(title).cyan().bold());
    println!("{}", style("─".repeat(title.chars().count())).dim());
}
