use rand::seq::IndexedRandom;
use rand::Rng;
use std::path::PathBuf;

/// 可用于推流的媒体文件
#[derive(Debug, Clone)]
pub struct MediaLibrary {
    /// 视频文件（.mp4 / .mkv）
    pub videos: Vec<PathBuf>,
    /// 音频文件（.mp3 / .aac）
    pub audios: Vec<PathBuf>,
}

impl MediaLibrary {
    /// 随机挑选一组视频和音频，任一列表为空时返回 None
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(PathBuf, PathBuf)> {
        let video = self.videos.choose(rng)?;
        let audio = self.audios.choose(rng)?;
        Some((video.clone(), audio.clone()))
    }
}
