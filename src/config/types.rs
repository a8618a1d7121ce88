use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 相機記憶卡上的預設影片資料夾
pub const DEFAULT_SOURCE_DIR: &str = "/media/benedict/disk/DCIM/100MEDIA";
/// 預設的暫存（輸出）資料夾
pub const DEFAULT_STAGING_DIR: &str = "./processed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

/// 單次執行所需的路徑設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinerSettings {
    /// 要掃描的來源資料夾
    pub source_dir: PathBuf,
    /// 複製、清單檔與輸出影片所在的暫存資料夾
    pub staging_dir: PathBuf,
    /// 指定 ffmpeg 執行檔；未設定時從 PATH 尋找
    pub tool_path: Option<PathBuf>,
}

impl Default for JoinerSettings {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            tool_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub joiner: JoinerSettings,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: UserSettings,
}
