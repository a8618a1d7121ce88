//! 分段影片分組器
//!
//! 相機因檔案大小限制將一段錄影切成多個分段，
//! 同一段錄影的分段檔名前 8 個字元相同

use log::debug;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// 分組鍵的長度（字元數）
pub const GROUP_KEY_LEN: usize = 8;

/// 已合併（未分段）的檔名，例如 `DJI_0001.MP4`
static UNCHUNKED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^DJI_\d{4}\.MP4$").expect("未分段檔名樣式無效"));

/// 分組結果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Grouping {
    /// 分組鍵 -> 依檔名排序的分段，同時也是合併順序
    pub groups: BTreeMap<String, Vec<String>>,
    /// 符合未分段樣式而略過的檔案數
    pub skipped: usize,
}

impl Grouping {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// 所有分組的分段總數
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

#[must_use]
pub fn is_unchunked(filename: &str) -> bool {
    UNCHUNKED_PATTERN.is_match(filename)
}

/// 檔名的前 8 個字元；較短的檔名以整個檔名為鍵
#[must_use]
pub fn group_key(filename: &str) -> &str {
    match filename.char_indices().nth(GROUP_KEY_LEN) {
        Some((end, _)) => &filename[..end],
        None => filename,
    }
}

/// 將影片檔名依前綴分組，略過已合併的檔案
#[must_use]
pub fn group_related_videos<S: AsRef<str>>(filenames: &[S]) -> Grouping {
    let mut grouping = Grouping::default();

    for filename in filenames {
        let filename = filename.as_ref();
        if is_unchunked(filename) {
            debug!("略過已合併的檔案: {filename}");
            grouping.skipped += 1;
            continue;
        }

        grouping
            .groups
            .entry(group_key(filename).to_string())
            .or_default()
            .push(filename.to_string());
    }

    for members in grouping.groups.values_mut() {
        members.sort();
    }

    grouping
}
