use crate::models::RootResponse;
use std::sync::Arc;

pub struct AppStateInner {
    pub root: RootResponse,
}

/// 请求之间只读共享
pub type AppState = Arc<AppStateInner>;

pub fn new_state(root: RootResponse) -> AppState {
    Arc::new(AppStateInner { root })
}
