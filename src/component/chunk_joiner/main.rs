use super::concat_list::write_concat_list;
use super::error::JoinError;
use super::ffmpeg_concat::ConcatRunner;
use super::grouper::{Grouping, group_related_videos};
use super::progress::{ProgressTracker, ProgressUpdate};
use super::summary::{ErrorKind, RunStatistics};
use crate::config::JoinerSettings;
use crate::print_section_header;
use crate::tools::{
    available_space, clear_directory, copy_files, delete_files, ensure_directory_exists,
    file_size, format_duration, format_file_size, list_video_files, validate_directory_exists,
};
use anyhow::{Context, Result, bail};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// 一次完整執行的結果
#[derive(Debug)]
pub enum RunOutcome {
    /// 來源資料夾沒有影片
    NoInput,
    /// 只有已合併的影片，沒有需要合併的分組
    NoGroups { files_copied: usize, skipped: usize },
    Completed(RunStatistics),
}

pub struct ChunkJoiner {
    settings: JoinerSettings,
    shutdown_signal: Arc<AtomicBool>,
    runner: ConcatRunner,
}

impl ChunkJoiner {
    #[must_use]
    pub fn new(settings: JoinerSettings, shutdown_signal: Arc<AtomicBool>) -> Self {
        let runner = ConcatRunner::new(settings.tool_path.clone(), Arc::clone(&shutdown_signal));
        Self {
            settings,
            shutdown_signal,
            runner,
        }
    }

    /// 複製、分組、合併、清理
    pub fn run(&self) -> Result<RunOutcome> {
        let started = Instant::now();
        let source_dir = self.settings.source_dir.as_path();
        let staging_dir = self.settings.staging_dir.as_path();

        print_section_header(&t!("run.section_init"));
        self.prepare_directories()?;

        let source_files = list_video_files(source_dir)?;
        if source_files.is_empty() {
            warn!("來源資料夾沒有影片: {}", source_dir.display());
            print_warning(&t!("run.no_videos", dir = source_dir.display()));
            return Ok(RunOutcome::NoInput);
        }
        print_info(&t!(
            "run.found_videos",
            count = source_files.len(),
            dir = source_dir.display()
        ));

        let copied_bytes = self.copy_to_staging(&source_files)?;
        print_success(&t!(
            "run.copied",
            count = source_files.len(),
            size = format_file_size(copied_bytes)
        ));

        let staged_files = list_video_files(staging_dir)?;
        let grouping = group_related_videos(&staged_files);
        let input_size = self.print_groups(&grouping);

        self.check_disk_space(input_size);

        if grouping.is_empty() {
            warn!("沒有需要合併的分組");
            print_warning(&t!("run.no_groups"));
            return Ok(RunOutcome::NoGroups {
                files_copied: source_files.len(),
                skipped: grouping.skipped,
            });
        }

        let mut stats = RunStatistics {
            groups_total: grouping.groups.len(),
            files_copied: source_files.len(),
            skipped: grouping.skipped,
            total_input_size: input_size,
            ..Default::default()
        };

        print_section_header(&t!("run.section_join"));
        for (index, (key, members)) in grouping.groups.iter().enumerate() {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                return Err(JoinError::Cancelled.into());
            }

            println!();
            println!(
                "[{}/{}] {}",
                index + 1,
                stats.groups_total,
                t!("run.processing_group", group = style(key).cyan(), count = members.len())
            );
            self.join_group(key, members, &mut stats)?;
        }

        stats.elapsed = started.elapsed();
        info!(
            "執行完成 - 成功: {}, 失敗: {}, 耗時 {}",
            stats.groups_succeeded,
            stats.groups_failed(),
            format_duration(stats.elapsed)
        );

        Ok(RunOutcome::Completed(stats))
    }

    /// 合併使用者指定的檔案，不分組也不刪除輸入檔，回傳輸出大小
    pub fn join_files(&self, output_base: &str, files: &[String]) -> Result<u64> {
        let staging_dir = self.settings.staging_dir.as_path();
        validate_directory_exists(staging_dir)?;

        let mut input_size = 0;
        for name in files {
            let path = staging_dir.join(name);
            if !path.is_file() {
                bail!("找不到輸入檔案: {}", path.display());
            }
            input_size += file_size(&path);
        }

        self.check_disk_space(input_size);

        write_concat_list(staging_dir, files)?;
        print_processing(&t!("join.joining", count = files.len(), output = output_base));

        let output_size = self
            .concat_with_progress(output_base)
            .with_context(|| format!("合併失敗: {output_base}"))?;

        print_success(&t!(
            "join.joined",
            output = output_base,
            size = format_file_size(output_size)
        ));
        Ok(output_size)
    }

    fn prepare_directories(&self) -> Result<()> {
        let source_dir = self.settings.source_dir.as_path();
        let staging_dir = self.settings.staging_dir.as_path();

        validate_directory_exists(source_dir)?;

        if ensure_directory_exists(staging_dir)? {
            print_success(&t!("run.created_dir", dir = staging_dir.display()));
            return Ok(());
        }

        match clear_directory(staging_dir) {
            Ok(result) if result.deleted > 0 || result.failed > 0 => {
                print_success(&t!(
                    "run.cleared",
                    count = result.deleted,
                    dir = staging_dir.display()
                ));
                if result.failed > 0 {
                    print_warning(&t!("run.clear_failed_items", count = result.failed));
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("無法清空暫存資料夾: {e:#}");
                print_warning(&t!("run.clear_failed", error = format!("{e:#}")));
            }
        }

        Ok(())
    }

    fn copy_to_staging(&self, names: &[String]) -> Result<u64> {
        let source_dir = self.settings.source_dir.as_path();
        let staging_dir = self.settings.staging_dir.as_path();

        let total_bytes: u64 = names.iter().map(|n| file_size(&source_dir.join(n))).sum();
        print_info(&t!("run.copying", count = names.len(), dir = source_dir.display()));

        let progress_bar = ProgressBar::new(total_bytes);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );

        let mut copied_bytes = 0;
        for name in names {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                progress_bar.abandon();
                return Err(JoinError::Cancelled.into());
            }

            progress_bar.set_message(name.clone());
            let result = copy_files(
                source_dir,
                staging_dir,
                std::slice::from_ref(name),
                |_, bytes| progress_bar.set_position(copied_bytes + bytes),
            );

            match result {
                Ok(bytes) => copied_bytes += bytes,
                Err(e) => {
                    progress_bar.abandon();
                    error!("{e:#}");
                    print_error(&t!("run.copy_failed", file = name, error = format!("{e:#}")));
                    return Err(e);
                }
            }
        }

        progress_bar.finish_and_clear();
        Ok(copied_bytes)
    }

    /// 顯示分組表並回傳所有分段的總大小
    fn print_groups(&self, grouping: &Grouping) -> u64 {
        let staging_dir = self.settings.staging_dir.as_path();

        print_section_header(&t!("run.section_groups"));
        println!(
            "  {:<16} {:>8} {:>12}",
            style(t!("run.col_group")).bold(),
            style(t!("run.col_chunks")).bold(),
            style(t!("run.col_size")).bold()
        );

        let mut total = 0;
        for (key, members) in &grouping.groups {
            let size: u64 = members.iter().map(|m| file_size(&staging_dir.join(m))).sum();
            total += size;
            println!(
                "  {:<16} {:>8} {:>12}",
                style(key).cyan(),
                members.len(),
                format_file_size(size)
            );
        }

        if grouping.skipped > 0 {
            print_info(&t!("run.skipped", count = grouping.skipped));
        }

        total
    }

    /// 空間不足只顯示警告，不中止
    fn check_disk_space(&self, required: u64) {
        let staging_dir = self.settings.staging_dir.as_path();

        let Some(available) = available_space(staging_dir) else {
            warn!("無法取得磁碟空間: {}", staging_dir.display());
            print_warning(&t!("run.disk_unknown"));
            return;
        };

        if available < required {
            warn!("磁碟空間不足: 可用 {available}, 需要 {required}");
            print_warning(&t!(
                "run.disk_low",
                available = format_file_size(available),
                required = format_file_size(required)
            ));
            return;
        }

        print_info(&t!("run.disk_ok", available = format_file_size(available)));
    }

    /// 合併單一分組；只有使用者中斷會回傳錯誤
    fn join_group(&self, key: &str, members: &[String], stats: &mut RunStatistics) -> Result<()> {
        let staging_dir = self.settings.staging_dir.as_path();

        if let Err(e) = write_concat_list(staging_dir, members) {
            error!("{e:#}");
            print_error(&t!("run.join_failed", group = key));
            stats.record_error(
                ErrorKind::ListWriteFailed,
                t!("run.join_failed", group = key),
                format!("{e:#}"),
            );
            return Ok(());
        }

        match self.concat_with_progress(key) {
            Ok(output_size) => {
                print_success(&t!(
                    "run.joined",
                    group = key,
                    size = format_file_size(output_size)
                ));

                let deleted = delete_files(staging_dir, members);
                if deleted > 0 {
                    print_success(&t!("run.cleaned_chunks", count = deleted));
                }
                if deleted < members.len() {
                    print_warning(&t!(
                        "run.clean_failed",
                        count = members.len() - deleted
                    ));
                }

                stats.groups_succeeded += 1;
                stats.files_joined += 1;
                stats.total_output_size += output_size;
            }
            Err(JoinError::Cancelled) => return Err(JoinError::Cancelled.into()),
            Err(e) => {
                error!("合併失敗 [{key}]: {e}");
                print_error(&t!("run.join_failed", group = key));
                let kind = match e {
                    JoinError::ToolNotFound { .. } => ErrorKind::ToolNotFound,
                    _ => ErrorKind::JoinFailed,
                };
                stats.record_error(kind, t!("run.join_failed", group = key), e.detail());
            }
        }

        Ok(())
    }

    /// 執行合併並以 spinner 顯示媒體時間與輸出大小
    fn concat_with_progress(&self, output_base: &str) -> Result<u64, JoinError> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress bar template"),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner.set_message(t!("run.joining_spinner", group = output_base).to_string());

        let mut media_seconds = 0.0;
        let mut output_bytes = 0;
        let mut tracker = ProgressTracker::new(|update: ProgressUpdate| {
            media_seconds = update.media_seconds.unwrap_or(media_seconds);
            output_bytes = update.output_bytes.unwrap_or(output_bytes);
            spinner.set_message(format!(
                "{output_base}  time {}  size {}",
                format_duration(Duration::from_secs_f64(media_seconds)),
                format_file_size(output_bytes)
            ));
        });

        let result = self
            .runner
            .run(&self.settings.staging_dir, output_base, &mut tracker);
        spinner.finish_and_clear();
        result
    }
}

fn print_success(message: &str) {
    println!("{} {message}", style("✓").green());
}

fn print_error(message: &str) {
    println!("{} {message}", style("✗").red());
}

fn print_warning(message: &str) {
    println!("{} {message}", style("⚠").yellow());
}

fn print_info(message: &str) {
    println!("{} {message}", style("ℹ").cyan());
}

fn print_processing(message: &str) {
    println!("{} {message}", style("⏳").blue());
}
