use anyhow::{Context, Result};
use log::warn;
use std::path::Path;
use walkdir::WalkDir;

/// 相機輸出與合併後影片的副檔名
pub const VIDEO_EXTENSION: &str = "MP4";

/// 檔名是否以影片副檔名結尾（不分大小寫）
#[must_use]
pub fn is_video_file_name(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case(VIDEO_EXTENSION))
}

/// 列出資料夾第一層的影片檔名（不遞迴），依檔名排序
pub fn list_video_files(directory: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry =
            entry.with_context(|| format!("無法列出資料夾內容: {}", directory.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            warn!("略過無法解析的檔名: {}", entry.path().display());
            continue;
        };
        if is_video_file_name(name) {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}

/// 查詢檔案大小，查詢失敗時視為 0
#[must_use]
pub fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
