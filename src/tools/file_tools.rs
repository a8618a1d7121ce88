use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// 清空資料夾的結果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClearResult {
    pub deleted: usize,
    pub failed: usize,
}

/// 清空資料夾內所有項目（檔案、連結、子資料夾）
///
/// 無法列出資料夾時回傳錯誤；個別項目刪除失敗只記錄警告
pub fn clear_directory(directory: &Path) -> Result<ClearResult> {
    let entries = fs::read_dir(directory)
        .with_context(|| format!("無法讀取目錄: {}", directory.display()))?;

    let mut result = ClearResult::default();

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("讀取目錄項目失敗: {e}");
                result.failed += 1;
                continue;
            }
        };

        let path = entry.path();
        let removal = match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
            Err(e) => Err(e),
        };

        match removal {
            Ok(()) => {
                debug!("已刪除: {}", path.display());
                result.deleted += 1;
            }
            Err(e) => {
                warn!("無法刪除 {}: {e}", path.display());
                result.failed += 1;
            }
        }
    }

    Ok(result)
}

/// 依序複製檔案，任一檔案失敗即中止
///
/// 每複製完一個檔案以累計位元組數呼叫 `on_progress`，回傳總複製位元組數
pub fn copy_files<F>(
    source_dir: &Path,
    dest_dir: &Path,
    names: &[String],
    mut on_progress: F,
) -> Result<u64>
where
    F: FnMut(&str, u64),
{
    let mut copied_bytes = 0;

    for name in names {
        let source = source_dir.join(name);
        let dest = dest_dir.join(name);

        let bytes = fs::copy(&source, &dest).with_context(|| {
            format!("複製檔案失敗: {} -> {}", source.display(), dest.display())
        })?;

        copied_bytes += bytes;
        debug!("已複製 {} ({bytes} bytes)", source.display());
        on_progress(name, copied_bytes);
    }

    Ok(copied_bytes)
}

/// 刪除資料夾中的指定檔案，回傳成功刪除的數量；失敗只記錄警告
pub fn delete_files(directory: &Path, names: &[String]) -> usize {
    let mut deleted = 0;

    for name in names {
        let path = directory.join(name);
        match fs::remove_file(&path) {
            Ok(()) => deleted += 1,
            Err(e) => warn!("無法刪除 {}: {e}", path.display()),
        }
    }

    deleted
}
