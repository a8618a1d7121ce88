//! 從 ffmpeg 診斷輸出擷取進度
//!
//! ffmpeg 的 stderr 格式沒有文件且隨版本變動，
//! 只依賴 `time=HH:MM:SS.ff` 與 `size=NNNkB` 兩個欄位

use regex::Regex;
use std::sync::LazyLock;

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"time=(\d{2}):(\d{2}):(\d{2}\.\d{2})").expect("時間樣式無效")
});

static SIZE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"size=\s*(\d+)kB").expect("大小樣式無效"));

/// 單行診斷輸出中解析出的進度
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    /// 已處理的媒體時間（秒）
    pub media_seconds: Option<f64>,
    /// 目前輸出大小（位元組）
    pub output_bytes: Option<u64>,
}

impl ProgressUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.media_seconds.is_none() && self.output_bytes.is_none()
    }
}

fn parse_media_seconds(line: &str) -> Option<f64> {
    let caps = TIME_PATTERN.captures(line)?;
    let h = caps[1].parse::<u64>().ok()?;
    let m = caps[2].parse::<u64>().ok()?;
    let s = caps[3].parse::<f64>().ok()?;
    Some((h * 3600 + m * 60) as f64 + s)
}

fn parse_output_bytes(line: &str) -> Option<u64> {
    let caps = SIZE_PATTERN.captures(line)?;
    caps[1].parse::<u64>().ok()?.checked_mul(1024)
}

/// 解析一行診斷輸出，兩個欄位各自獨立
#[must_use]
pub fn parse_progress_line(line: &str) -> ProgressUpdate {
    ProgressUpdate {
        media_seconds: parse_media_seconds(line),
        output_bytes: parse_output_bytes(line),
    }
}

/// 接收 ffmpeg 的每一行診斷輸出
pub trait ProgressObserver {
    fn on_line(&mut self, line: &str);
}

/// 不追蹤進度
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_line(&mut self, _line: &str) {}
}

/// 解析進度並回報給 callback，同時記錄輸出大小的最大值
pub struct ProgressTracker<F> {
    on_update: F,
    max_output_bytes: u64,
}

impl<F> ProgressTracker<F>
where
    F: FnMut(ProgressUpdate),
{
    pub const fn new(on_update: F) -> Self {
        Self {
            on_update,
            max_output_bytes: 0,
        }
    }

    /// 目前觀察到的最大輸出大小
    #[must_use]
    pub const fn max_output_bytes(&self) -> u64 {
        self.max_output_bytes
    }
}

impl<F> ProgressObserver for ProgressTracker<F>
where
    F: FnMut(ProgressUpdate),
{
    fn on_line(&mut self, line: &str) {
        let mut update = parse_progress_line(line);
        if update.is_empty() {
            return;
        }

        // 只回報遞增的輸出大小
        match update.output_bytes {
            Some(bytes) if bytes > self.max_output_bytes => self.max_output_bytes = bytes,
            Some(_) => update.output_bytes = None,
            None => {}
        }

        if !update.is_empty() {
            (self.on_update)(update);
        }
    }
}
