use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use crate::cli::StreamArgs;
use crate::services::load_media;

lazy_static! {
    /// ffmpeg 统计行，例如 `frame=  240 fps= 24 q=23.0 size=...` 或 `frame=N/A ...`
    static ref PROGRESS_LINE: Regex = Regex::new("frame=").unwrap();
}

pub fn is_progress_line(line: &str) -> bool {
    PROGRESS_LINE.is_match(line)
}

/// 生成 ffmpeg 参数：视频和音频都无限循环，按低码率直播配置编码后推到 RTMP
#[rustfmt::skip]
pub fn ffmpeg_args(video: &Path, audio: &Path, rtmp_url: &str) -> Vec<String> {
    let video = video.to_string_lossy().into_owned();
    let audio = audio.to_string_lossy().into_owned();

    [
        "-loglevel", "warning",
        "-re",
        "-stream_loop", "-1",
        "-i", video.as_str(),
        "-stream_loop", "-1",
        "-i", audio.as_str(),
        "-map", "0:v:0",
        "-map", "1:a:0",
        "-c:v", "libx264",
        "-preset", "ultrafast",
        "-b:v", "1800k",
        "-maxrate", "2000k",
        "-bufsize", "4000k",
        "-pix_fmt", "yuv420p",
        "-g", "48",
        "-r", "24",
        "-c:a", "aac",
        "-b:a", "96k",
        "-ar", "22050",
        "-ac", "1",
        "-f", "flv",
        rtmp_url,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// 逐行读取 ffmpeg 输出（`\r` 和 `\n` 都视为换行），只记录统计行
///
/// 返回记录的统计行数量
pub async fn log_progress<R: AsyncRead + Unpin>(reader: R) -> std::io::Result<usize> {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    let mut logged = 0;

    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            break;
        }

        let len = buf.len();
        for &byte in buf {
            if byte == b'\n' || byte == b'\r' {
                logged += emit_line(&line);
                line.clear();
            } else {
                line.push(byte);
            }
        }
        reader.consume(len);
    }

    logged += emit_line(&line);
    Ok(logged)
}

fn emit_line(raw: &[u8]) -> usize {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim();
    if is_progress_line(text) {
        log::info!("{}", text);
        1
    } else {
        0
    }
}

/// 启动一次 ffmpeg 并等待其退出，非零退出码视为失败
pub async fn run_once(ffmpeg_bin: &Path, video: &Path, audio: &Path, rtmp_url: &str) -> Result<()> {
    let args = ffmpeg_args(video, audio, rtmp_url);

    let mut child = Command::new(ffmpeg_bin)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("Failed to spawn {}", ffmpeg_bin.display()))?;

    let stdout = child.stdout.take().context("ffmpeg stdout was not captured")?;
    let stderr = child.stderr.take().context("ffmpeg stderr was not captured")?;

    let (stdout_result, stderr_result) = tokio::join!(log_progress(stdout), log_progress(stderr));
    let status = child
        .wait()
        .await
        .with_context(|| format!("Failed to wait for {}", ffmpeg_bin.display()))?;

    stdout_result.context("Failed to read ffmpeg stdout")?;
    stderr_result.context("Failed to read ffmpeg stderr")?;

    if !status.success() {
        bail!(
            "ffmpeg exited with {}: {} {}",
            status,
            ffmpeg_bin.display(),
            args.join(" ")
        );
    }

    Ok(())
}

/// 推流主循环：媒体目录为空时直接失败，之后每次失败都等待重试间隔再换一组媒体
pub async fn run_forever(args: &StreamArgs) -> Result<()> {
    let library = load_media(&args.video_dir, &args.audio_dir)?;
    let retry_delay = args.retry_delay();

    loop {
        let picked = library.pick(&mut rand::rng());
        let result = match picked {
            Some((video, audio)) => {
                log::info!(
                    "🚀 Starting stream:\nVideo: {}\nAudio: {}",
                    video.display(),
                    audio.display()
                );
                run_once(&args.ffmpeg_bin, &video, &audio, &args.rtmp_url).await
            }
            None => Err(anyhow::anyhow!("Media library is empty")),
        };

        match result {
            Ok(()) => log::warn!("⚠️  ffmpeg finished, starting the next stream"),
            Err(e) => {
                log::error!("❌ Error: {:#}", e);
                log::info!("🕒 Retrying in {} seconds...", retry_delay.as_secs());
                tokio::time::sleep(retry_delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_ffmpeg_args() {
        let args = ffmpeg_args(
            Path::new("videos/a.mp4"),
            Path::new("musica_jazz/x.mp3"),
            "rtmp://localhost/live/key",
        );

        assert_eq!(args.len(), 42);
        assert_eq!(&args[..3], ["-loglevel", "warning", "-re"]);
        assert_eq!(&args[3..7], ["-stream_loop", "-1", "-i", "videos/a.mp4"]);
        assert_eq!(&args[7..11], ["-stream_loop", "-1", "-i", "musica_jazz/x.mp3"]);
        assert_eq!(&args[11..15], ["-map", "0:v:0", "-map", "1:a:0"]);
        assert_eq!(&args[37..], ["-ac", "1", "-f", "flv", "rtmp://localhost/live/key"]);

        let pos = args.iter().position(|a| a == "-b:v").unwrap();
        assert_eq!(args[pos + 1], "1800k");
        let pos = args.iter().position(|a| a == "-ar").unwrap();
        assert_eq!(args[pos + 1], "22050");
    }

    #[test]
    fn test_progress_line_detection() {
        assert!(is_progress_line(
            "frame=  240 fps= 24 q=23.0 size=    1024kB time=00:00:10.00 bitrate= 838.9kbits/s"
        ));
        assert!(is_progress_line("frame=1"));
        assert!(is_progress_line(
            "frame=N/A fps=0.0 q=-0.0 size=N/A time=00:00:01.00 bitrate=N/A speed=1x"
        ));
        assert!(is_progress_line("frame="));
        assert!(!is_progress_line("Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'videos/a.mp4':"));
        assert!(!is_progress_line("size=N/A time=00:00:01.00"));
    }

    #[tokio::test]
    async fn test_log_progress_splits_carriage_returns() {
        let output: &[u8] =
            b"warning: something\nframe=  1 fps=0.0\rframe=  2 fps=24\rframe=  3 fps=24\nend";
        let logged = log_progress(output).await.unwrap();
        assert_eq!(logged, 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_once_success() {
        let result = run_once(
            Path::new("true"),
            Path::new("a.mp4"),
            Path::new("b.mp3"),
            "rtmp://localhost/live/key",
        )
        .await;
        assert!(result.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_once_nonzero_exit() {
        let err = run_once(
            Path::new("false"),
            Path::new("a.mp4"),
            Path::new("b.mp3"),
            "rtmp://localhost/live/key",
        )
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("ffmpeg exited with"));
    }

    #[tokio::test]
    async fn test_run_once_missing_binary() {
        let bin = PathBuf::from("/nonexistent/ffmpeg");
        let err = run_once(&bin, Path::new("a.mp4"), Path::new("b.mp3"), "rtmp://x")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to spawn"));
    }

    #[tokio::test]
    async fn test_run_forever_fails_without_media() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = StreamArgs {
            rtmp_url: "rtmp://localhost/live/key".to_string(),
            video_dir: dir.path().to_path_buf(),
            audio_dir: dir.path().to_path_buf(),
            retry_delay_secs: 0,
            ffmpeg_bin: PathBuf::from("true"),
        };

        let err = run_forever(&args).await.unwrap_err();
        assert!(err.to_string().starts_with("No videos in"));
    }
}
