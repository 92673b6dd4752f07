use std::path::PathBuf;

/// 根路由默认返回的文本
pub const DEFAULT_MESSAGE: &str = "Stream Manager Running";

/// 根路由默认返回的静态文件（相对工作目录）
pub const DEFAULT_STATIC_FILE: &str = "public/index.html";

/// 根路由的响应内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootResponse {
    /// 固定的纯文本
    Text(String),
    /// 单个静态 HTML 文件
    StaticFile(PathBuf),
}

impl Default for RootResponse {
    fn default() -> Self {
        RootResponse::Text(DEFAULT_MESSAGE.to_string())
    }
}
