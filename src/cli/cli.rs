use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::{Preset, RootResponse, DEFAULT_MESSAGE, DEFAULT_STATIC_FILE};

/// Stream Manager - 推流机器人、HTTP 响应器与 pm2 描述文件
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 启动 HTTP 响应器（/ 与 /health）
    Serve(ServeArgs),
    /// 启动推流机器人（随机视频 + 随机音频 -> RTMP）
    Stream(StreamArgs),
    /// 校验并输出 pm2 描述文件
    Ecosystem(EcosystemArgs),
}

/// 根路由的部署形态
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// 返回固定文本，默认端口 3000
    Text,
    /// 返回静态 HTML 文件，默认端口 10000
    Static,
}

impl Variant {
    pub fn default_port(self) -> u16 {
        match self {
            Variant::Text => 3000,
            Variant::Static => 10000,
        }
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// 监听端口（未设置时使用部署形态的默认端口）
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// 监听地址
    #[arg(short = 'a', long, env = "ADDRESS", default_value = "0.0.0.0")]
    pub address: String,

    /// 部署形态
    #[arg(long, value_enum, default_value_t = Variant::Text)]
    pub variant: Variant,

    /// text 形态下根路由返回的文本
    #[arg(long, default_value = DEFAULT_MESSAGE)]
    pub message: String,

    /// static 形态下根路由返回的文件
    #[arg(long, default_value = DEFAULT_STATIC_FILE)]
    pub static_file: PathBuf,
}

impl ServeArgs {
    /// 实际监听端口：PORT 优先，否则取部署形态默认值
    pub fn resolved_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.variant.default_port())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.resolved_port())
    }

    pub fn root_response(&self) -> RootResponse {
        match self.variant {
            Variant::Text => RootResponse::Text(self.message.clone()),
            Variant::Static => RootResponse::StaticFile(self.static_file.clone()),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct StreamArgs {
    /// RTMP 推流地址（包含推流密钥）
    #[arg(long, env = "STREAM_RTMP_URL")]
    pub rtmp_url: String,

    /// 视频目录
    #[arg(long, env = "STREAM_VIDEO_DIR", default_value = "videos")]
    pub video_dir: PathBuf,

    /// 音频目录
    #[arg(long, env = "STREAM_AUDIO_DIR", default_value = "musica_jazz")]
    pub audio_dir: PathBuf,

    /// 推流失败后的重试间隔（秒）
    #[arg(long, env = "STREAM_RETRY_DELAY_SECS", default_value_t = 30)]
    pub retry_delay_secs: u64,

    /// ffmpeg 可执行文件
    #[arg(long, env = "FFMPEG_BIN", default_value = "ffmpeg")]
    pub ffmpeg_bin: PathBuf,
}

impl StreamArgs {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

#[derive(Args, Debug)]
pub struct EcosystemArgs {
    /// 从文件读取描述（.json 或 .toml）
    #[arg(short, long, conflicts_with = "preset")]
    pub file: Option<PathBuf>,

    /// 使用内置描述
    #[arg(long, value_enum, default_value_t = Preset::Local)]
    pub preset: Preset,

    /// 写入文件而不是标准输出
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
