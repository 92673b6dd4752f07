pub mod root;

pub use root::index;

use actix_web::{web, HttpResponse, Responder};

/// 存活探针：空响应体，状态 200
pub async fn health() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// 注册全部路由，未定义的路径交给 actix-web 默认的 404
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health));
}
