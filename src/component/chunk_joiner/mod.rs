//! 分段影片合併元件
//!
//! 流程：
//! A. 驗證來源並清空暫存資料夾
//! B. 複製影片到暫存資料夾
//! C. 依檔名前綴分組
//! D. 逐組寫入清單檔並以 ffmpeg 合併
//! E. 刪除已合併的分段並顯示摘要

mod concat_list;
mod error;
mod ffmpeg_concat;
mod grouper;
mod main;
mod progress;
mod summary;

pub use concat_list::{CONCAT_LIST_NAME, render_concat_list, write_concat_list};
pub use error::{JoinError, JoinResult, is_cancellation};
pub use ffmpeg_concat::{ConcatRunner, DEFAULT_TOOL, FfmpegConcat, split_diagnostic_lines};
pub use grouper::{GROUP_KEY_LEN, Grouping, group_key, group_related_videos, is_unchunked};
pub use main::{ChunkJoiner, RunOutcome};
pub use progress::{
    NoProgress, ProgressObserver, ProgressTracker, ProgressUpdate, parse_progress_line,
};
pub use summary::{ErrorKind, ErrorRecord, RunStatistics};
