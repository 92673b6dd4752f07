use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::models::MediaLibrary;

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "aac"];

/// 扫描视频和音频目录，任一目录没有可用文件时报错
pub fn load_media(video_dir: &Path, audio_dir: &Path) -> Result<MediaLibrary> {
    let videos = list_files(video_dir, VIDEO_EXTENSIONS)?;
    let audios = list_files(audio_dir, AUDIO_EXTENSIONS)?;

    if videos.is_empty() {
        bail!("No videos in {}", video_dir.display());
    }
    if audios.is_empty() {
        bail!("No audios in {}", audio_dir.display());
    }

    log::info!(
        "📂 Loaded {} videos from {} and {} audios from {}",
        videos.len(),
        video_dir.display(),
        audios.len(),
        audio_dir.display()
    );

    Ok(MediaLibrary { videos, audios })
}

/// 非递归列出目录下扩展名匹配的文件（按路径排序）
fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read media directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list media directory {}", dir.display()))?
            .path();

        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| extensions.contains(&ext))
            .unwrap_or(false);

        if matches && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
