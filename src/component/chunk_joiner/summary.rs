use crate::print_section_header;
use crate::tools::{format_duration, format_file_size, format_signed_size};
use console::style;
use rust_i18n::t;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    JoinFailed,
    ToolNotFound,
    ListWriteFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::JoinFailed => t!("error_kind.join_failed"),
            Self::ToolNotFound => t!("error_kind.tool_not_found"),
            Self::ListWriteFailed => t!("error_kind.list_write_failed"),
        };
        f.write_str(&label)
    }
}

/// 單一分組的錯誤記錄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
    pub detail: String,
}

/// 整次執行的統計
#[derive(Debug, Default, Clone)]
pub struct RunStatistics {
    pub groups_total: usize,
    pub groups_succeeded: usize,
    pub files_copied: usize,
    pub files_joined: usize,
    pub skipped: usize,
    /// 所有分組分段的總大小
    pub total_input_size: u64,
    pub total_output_size: u64,
    pub elapsed: Duration,
    pub errors: Vec<ErrorRecord>,
}

impl RunStatistics {
    #[must_use]
    pub const fn groups_failed(&self) -> usize {
        self.groups_total.saturating_sub(self.groups_succeeded)
    }

    /// 輸入減去輸出；未計入略過的已合併檔案，結果可能為負
    #[must_use]
    pub fn space_saved(&self) -> i64 {
        self.total_input_size as i64 - self.total_output_size as i64
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.groups_succeeded == self.groups_total && self.errors.is_empty()
    }

    pub fn record_error(
        &mut self,
        kind: ErrorKind,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.errors.push(ErrorRecord {
            kind,
            message: message.into(),
            detail: detail.into(),
        });
    }

    pub fn print(&self) {
        print_section_header(&t!("summary.title"));

        let rows = [
            (
                t!("summary.groups_processed"),
                format!("{}/{}", self.groups_succeeded, self.groups_total),
            ),
            (t!("summary.files_copied"), self.files_copied.to_string()),
            (t!("summary.files_joined"), self.files_joined.to_string()),
            (t!("summary.files_skipped"), self.skipped.to_string()),
            (
                t!("summary.input_size"),
                format_file_size(self.total_input_size),
            ),
            (
                t!("summary.output_size"),
                format_file_size(self.total_output_size),
            ),
            (
                t!("summary.space_saved"),
                format_signed_size(self.space_saved()),
            ),
            (t!("summary.elapsed"), format_duration(self.elapsed)),
        ];

        for (label, value) in &rows {
            println!("  {:<24} {}", style(label).cyan(), value);
        }
        println!();

        if self.is_success() {
            println!("{} {}", style("✓").green(), t!("summary.all_done"));
            return;
        }

        if self.groups_succeeded < self.groups_total {
            println!(
                "{} {}",
                style("⚠").yellow(),
                t!(
                    "summary.partial",
                    done = self.groups_succeeded,
                    total = self.groups_total
                )
            );
        }

        if !self.errors.is_empty() {
            println!(
                "{} {}",
                style("✗").red(),
                t!("summary.error_count", count = self.errors.len())
            );
            for record in &self.errors {
                print_error_record(record);
            }
        }
    }
}

fn print_error_record(record: &ErrorRecord) {
    println!();
    println!("{}", style(record.kind).red().bold());
    println!("  {}", record.message);
    if !record.detail.is_empty() {
        println!("  {}", style(t!("summary.details")).yellow().bold());
        for line in record.detail.lines() {
            println!("    {}", style(line).dim());
        }
    }
}
