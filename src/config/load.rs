use crate::config::types::{Config, UserSettings};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// 預設設定檔，位於目前工作目錄
pub const SETTINGS_FILE: &str = "settings.json";

impl Config {
    /// 從目前工作目錄的 `settings.json` 載入設定
    ///
    /// 檔案不存在時使用預設值；檔案損壞時記錄警告並使用預設值
    pub fn new() -> Self {
        let path = Path::new(SETTINGS_FILE);
        if !path.exists() {
            debug!("找不到 {SETTINGS_FILE}，使用預設設定");
            return Self {
                settings: UserSettings::default(),
            };
        }

        let settings = Self::load_settings(path).unwrap_or_else(|e| {
            warn!("設定檔載入失敗，使用預設設定: {e:#}");
            UserSettings::default()
        });

        Self { settings }
    }

    /// 從指定的設定檔載入，讀取或解析失敗時回傳錯誤
    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(Self {
            settings: Self::load_settings(path)?,
        })
    }

    fn load_settings(path: &Path) -> Result<UserSettings> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_STAGING_DIR, JoinerSettings, Language};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_load_partial_settings_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "joiner": { "source_dir": "/mnt/card/DCIM/100MEDIA" } }"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.settings.joiner.source_dir,
            PathBuf::from("/mnt/card/DCIM/100MEDIA")
        );
        assert_eq!(
            config.settings.joiner.staging_dir,
            PathBuf::from(DEFAULT_STAGING_DIR)
        );
        assert_eq!(config.settings.joiner.tool_path, None);
        assert_eq!(config.settings.language, Language::EnUs);
    }

    #[test]
    fn test_load_full_settings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{
                "language": "zh-TW",
                "joiner": {
                    "source_dir": "/a",
                    "staging_dir": "/b",
                    "tool_path": "/opt/ffmpeg/bin/ffmpeg"
                }
            }"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings.language, Language::ZhTw);
        assert_eq!(
            config.settings.joiner,
            JoinerSettings {
                source_dir: PathBuf::from("/a"),
                staging_dir: PathBuf::from("/b"),
                tool_path: Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")),
            }
        );
    }

    #[test]
    fn test_load_malformed_settings_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
