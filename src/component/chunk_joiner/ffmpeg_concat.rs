//! 以 ffmpeg concat demuxer 合併分段影片
//!
//! stdout 與 stderr 各由一個執行緒讀取，避免任一管線塞滿造成死結；
//! 呼叫端執行緒逐行處理 stderr 並定期檢查中斷信號

use super::concat_list::CONCAT_LIST_NAME;
use super::error::{JoinError, JoinResult};
use super::progress::ProgressObserver;
use crate::tools::{VIDEO_EXTENSION, file_size};
use log::{debug, info, warn};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// 預設的 ffmpeg 執行檔名稱
pub const DEFAULT_TOOL: &str = "ffmpeg";

/// 檢查中斷信號與程序狀態的間隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct FfmpegConcat {
    list_path: PathBuf,
    destination_path: PathBuf,
}

impl FfmpegConcat {
    #[must_use]
    pub fn new(working_dir: &Path, output_base: &str) -> Self {
        Self {
            list_path: working_dir.join(CONCAT_LIST_NAME),
            destination_path: Self::generate_destination_path(working_dir, output_base),
        }
    }

    fn generate_destination_path(working_dir: &Path, output_base: &str) -> PathBuf {
        working_dir.join(format!("{output_base}.{VIDEO_EXTENSION}"))
    }

    #[must_use]
    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    #[must_use]
    pub fn build_command(&self, tool: &Path) -> Command {
        let mut cmd = Command::new(tool);

        cmd.args([
            "-hide_banner",
            "-nostdin",
            "-y",
            "-f", "concat",
            "-safe", "0",
        ]);
        cmd.arg("-i").arg(&self.list_path);
        cmd.args(["-c", "copy"]);
        cmd.arg(&self.destination_path);

        cmd
    }
}

/// 執行 ffmpeg 合併並回報結果
pub struct ConcatRunner {
    tool_path: Option<PathBuf>,
    shutdown_signal: Arc<AtomicBool>,
}

impl ConcatRunner {
    #[must_use]
    pub const fn new(tool_path: Option<PathBuf>, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            tool_path,
            shutdown_signal,
        }
    }

    /// 找出 ffmpeg 執行檔的絕對路徑
    pub fn locate_tool(&self) -> Result<PathBuf, JoinError> {
        let requested = self
            .tool_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOOL));

        let found = which::which(&requested).map_err(|e| {
            debug!("找不到 {}: {e}", requested.display());
            JoinError::ToolNotFound {
                tool: requested.clone(),
            }
        })?;

        Ok(std::path::absolute(&found).unwrap_or(found))
    }

    /// 合併 `working_dir` 中清單檔列出的影片，輸出為 `<output_base>.MP4`
    ///
    /// 除了使用者中斷外，所有失敗都以 `JoinError` 回傳
    pub fn run(
        &self,
        working_dir: &Path,
        output_base: &str,
        observer: &mut dyn ProgressObserver,
    ) -> JoinResult {
        let tool = self.locate_tool()?;

        let working_dir =
            std::path::absolute(working_dir).map_err(|e| JoinError::Invocation(e.to_string()))?;
        let ffmpeg_cmd = FfmpegConcat::new(&working_dir, output_base);

        let mut command = ffmpeg_cmd.build_command(&tool);
        command
            .current_dir(&working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command
            .spawn()
            .map_err(|e| JoinError::Invocation(e.to_string()))?;

        info!(
            "啟動合併 [{}]: {} -> {}",
            child.id(),
            working_dir.join(CONCAT_LIST_NAME).display(),
            ffmpeg_cmd.destination_path().display()
        );

        let stdout_reader = child.stdout.take().map(|mut stdout| {
            thread::spawn(move || {
                let mut buffer = Vec::new();
                let _ = stdout.read_to_end(&mut buffer);
                buffer
            })
        });

        let (line_tx, line_rx) = mpsc::channel::<String>();
        let stderr_reader = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                let mut recorder = RecordingReader::new(stderr);
                let _ = split_diagnostic_lines(&mut recorder, |line| line_tx.send(line).is_ok());
                recorder.into_raw()
            })
        });

        // 中斷或等待失敗時不等讀取執行緒，子程序衍生的程序可能仍握著管線
        let status = self.wait_for_exit(&mut child, &line_rx, observer)?;

        let raw_stderr = join_reader(stderr_reader).unwrap_or_default();
        for line in line_rx.try_iter() {
            observer.on_line(&line);
        }
        if let Some(stdout) = join_reader(stdout_reader) {
            debug!("ffmpeg stdout: {} bytes", stdout.len());
        }

        if status.success() {
            let output_size = file_size(ffmpeg_cmd.destination_path());
            info!(
                "合併完成: {} ({output_size} bytes)",
                ffmpeg_cmd.destination_path().display()
            );
            Ok(output_size)
        } else {
            warn!("合併失敗 ({status}): {}", ffmpeg_cmd.destination_path().display());
            Err(JoinError::ToolExecution {
                code: status.code(),
                diagnostics: String::from_utf8_lossy(&raw_stderr).into_owned(),
            })
        }
    }

    /// 逐行處理 stderr 直到程序結束，期間收到中斷信號即終止程序
    fn wait_for_exit(
        &self,
        child: &mut Child,
        line_rx: &mpsc::Receiver<String>,
        observer: &mut dyn ProgressObserver,
    ) -> Result<ExitStatus, JoinError> {
        loop {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷信號，終止 ffmpeg [{}]", child.id());
                terminate(child);
                return Err(JoinError::Cancelled);
            }

            match line_rx.recv_timeout(POLL_INTERVAL) {
                Ok(line) => {
                    observer.on_line(&line);
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
                // stderr 已關閉，改為定時輪詢
                Err(RecvTimeoutError::Disconnected) => thread::sleep(POLL_INTERVAL),
            }

            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {}
                Err(e) => {
                    terminate(child);
                    return Err(JoinError::Invocation(e.to_string()));
                }
            }
        }
    }
}

fn terminate(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// 讀取時保留原始位元組，失敗時回報未經切行的 stderr
struct RecordingReader<R> {
    inner: R,
    raw: Vec<u8>,
}

impl<R: Read> RecordingReader<R> {
    const fn new(inner: R) -> Self {
        Self {
            inner,
            raw: Vec::new(),
        }
    }

    fn into_raw(self) -> Vec<u8> {
        self.raw
    }
}

impl<R: Read> Read for RecordingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.raw.extend_from_slice(&buf[..read]);
        Ok(read)
    }
}

fn join_reader<T>(handle: Option<JoinHandle<T>>) -> Option<T> {
    handle.and_then(|h| h.join().ok())
}

/// 將 ffmpeg 診斷輸出切成行
///
/// ffmpeg 以 `\r` 覆寫狀態列，因此 `\r` 與 `\n` 都視為行尾；空行略過。
/// `on_line` 回傳 `false` 時停止讀取
pub fn split_diagnostic_lines<R, F>(reader: R, mut on_line: F) -> io::Result<()>
where
    R: Read,
    F: FnMut(String) -> bool,
{
    let mut reader = BufReader::new(reader);
    let mut pending = Vec::new();

    loop {
        let buffer = match reader.fill_buf() {
            Ok(buffer) => buffer,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if buffer.is_empty() {
            break;
        }

        let consumed = buffer.len();
        for &byte in buffer {
            if byte == b'\n' || byte == b'\r' {
                if !pending.is_empty() {
                    let line = String::from_utf8_lossy(&pending).into_owned();
                    pending.clear();
                    if !on_line(line) {
                        return Ok(());
                    }
                }
            } else {
                pending.push(byte);
            }
        }
        reader.consume(consumed);
    }

    if !pending.is_empty() {
        on_line(String::from_utf8_lossy(&pending).into_owned());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::chunk_joiner::progress::NoProgress;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn collect_lines(input: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        split_diagnostic_lines(Cursor::new(input.to_vec()), |line| {
            lines.push(line);
            true
        })
        .unwrap();
        lines
    }

    #[test]
    fn test_destination_path_uses_fixed_extension() {
        let cmd = FfmpegConcat::new(Path::new("/staging"), "DJI_0801");
        assert_eq!(cmd.destination_path(), Path::new("/staging/DJI_0801.MP4"));
    }

    #[test]
    fn test_build_command_arguments() {
        let cmd = FfmpegConcat::new(Path::new("/staging"), "DJI_0801");
        let command = cmd.build_command(Path::new("/usr/bin/ffmpeg"));
        let args: Vec<String> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(command.get_program(), "/usr/bin/ffmpeg");
        assert_eq!(
            args,
            vec![
                "-hide_banner",
                "-nostdin",
                "-y",
                "-f",
                "concat",
                "-safe",
                "0",
                "-i",
                "/staging/filelist.txt",
                "-c",
                "copy",
                "/staging/DJI_0801.MP4",
            ]
        );
    }

    #[test]
    fn test_split_on_carriage_return_and_newline() {
        let lines = collect_lines(
            b"Input #0\nframe=1 size=1kB time=00:00:01.00\rframe=2 size=2kB time=00:00:02.00\r\nlast",
        );
        assert_eq!(
            lines,
            vec![
                "Input #0",
                "frame=1 size=1kB time=00:00:01.00",
                "frame=2 size=2kB time=00:00:02.00",
                "last",
            ]
        );
    }

    #[test]
    fn test_split_stops_when_receiver_declines() {
        let mut count = 0;
        split_diagnostic_lines(Cursor::new(b"a\nb\nc\n".to_vec()), |_| {
            count += 1;
            false
        })
        .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_split_keeps_invalid_utf8_lossy() {
        let lines = collect_lines(b"bad \xff byte\n");
        assert_eq!(lines, vec!["bad \u{fffd} byte"]);
    }

    #[test]
    fn test_recording_reader_keeps_raw_bytes() {
        let mut recorder = RecordingReader::new(Cursor::new(b"a\r\rb\n\nc".to_vec()));
        let mut lines = Vec::new();
        split_diagnostic_lines(&mut recorder, |line| {
            lines.push(line);
            true
        })
        .unwrap();

        assert_eq!(lines, vec!["a", "b", "c"]);
        assert_eq!(recorder.into_raw(), b"a\r\rb\n\nc");
    }

    #[test]
    fn test_missing_tool_is_reported_without_running() {
        let temp_dir = TempDir::new().unwrap();
        let runner = ConcatRunner::new(
            Some(temp_dir.path().join("no-such-ffmpeg")),
            Arc::new(AtomicBool::new(false)),
        );

        let result = runner.run(temp_dir.path(), "DJI_0801", &mut NoProgress);
        assert!(matches!(result, Err(JoinError::ToolNotFound { .. })));
        assert!(!temp_dir.path().join("DJI_0801.MP4").exists());
    }
}
