//! ffmpeg concat demuxer 的清單檔

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// 清單檔名稱，位於暫存資料夾
pub const CONCAT_LIST_NAME: &str = "filelist.txt";

/// 清單內容：每行 `file '<name>'`
///
/// 檔名中的單引號不跳脫
#[must_use]
pub fn render_concat_list<S: AsRef<str>>(filenames: &[S]) -> String {
    filenames
        .iter()
        .map(|name| format!("file '{}'\n", name.as_ref()))
        .collect()
}

/// 寫入（覆寫）清單檔，回傳其路徑
pub fn write_concat_list<S: AsRef<str>>(directory: &Path, filenames: &[S]) -> Result<PathBuf> {
    let path = directory.join(CONCAT_LIST_NAME);
    fs::write(&path, render_concat_list(filenames))
        .with_context(|| format!("無法寫入清單檔: {}", path.display()))?;
    Ok(path)
}
