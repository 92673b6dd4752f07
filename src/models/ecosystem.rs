use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// pm2 描述文件中的单个应用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    /// 应用名称（文件内唯一）
    pub name: String,
    /// 启动命令
    pub script: String,
    /// 文件变化时是否重启
    #[serde(default)]
    pub watch: bool,
    /// 不触发重启的路径
    #[serde(default)]
    pub ignore_watch: Vec<String>,
    /// 进程退出后是否自动重启（pm2 默认开启）
    #[serde(default = "default_autorestart")]
    pub autorestart: bool,
    /// 覆盖的环境变量
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

fn default_autorestart() -> bool {
    true
}

/// pm2 描述文件：`{ "apps": [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ecosystem {
    #[serde(default)]
    pub apps: Vec<AppDescriptor>,
}

/// 内置的两种部署
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// 本机部署：推流机器人 + 文本响应器，开启文件监听
    Local,
    /// 托管部署：静态页面响应器，PORT=10000
    Render,
}
