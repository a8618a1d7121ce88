use std::path::PathBuf;
use thiserror::Error;

/// 單次合併的失敗原因
#[derive(Debug, Error)]
pub enum JoinError {
    /// 找不到 ffmpeg，未嘗試執行
    #[error("找不到 {tool}，請先安裝 FFmpeg")]
    ToolNotFound { tool: PathBuf },

    /// ffmpeg 以非零結束碼結束，`diagnostics` 為未經處理的 stderr 內容
    #[error("ffmpeg 執行失敗 (結束碼: {})", exit_code_label(.code))]
    ToolExecution {
        code: Option<i32>,
        diagnostics: String,
    },

    /// 無法啟動 ffmpeg 或等待其結束
    #[error("{0}")]
    Invocation(String),

    /// 使用者中斷
    #[error("操作已被使用者中斷")]
    Cancelled,
}

impl JoinError {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// 錯誤記錄中的詳細內容
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::ToolExecution { diagnostics, .. } => diagnostics.clone(),
            other => other.to_string(),
        }
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "無".to_string(), |c| c.to_string())
}

/// 成功時為輸出檔案的實際大小
pub type JoinResult = Result<u64, JoinError>;

/// 執行是否因使用者中斷而結束
#[must_use]
pub fn is_cancellation(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<JoinError>()
        .is_some_and(JoinError::is_cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_keeps_raw_diagnostics() {
        let error = JoinError::ToolExecution {
            code: Some(1),
            diagnostics: "filelist.txt: Invalid data found when processing input".to_string(),
        };
        assert_eq!(
            error.detail(),
            "filelist.txt: Invalid data found when processing input"
        );
        assert!(!error.is_cancelled());
    }

    #[test]
    fn test_cancellation_survives_anyhow_context() {
        let error = anyhow::Error::from(JoinError::Cancelled).context("合併 DJI_0801 時中斷");
        assert!(is_cancellation(&error));
        assert!(!is_cancellation(&anyhow::anyhow!("其他錯誤")));
    }
}
