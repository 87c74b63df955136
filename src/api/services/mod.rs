pub mod generate_api;
pub mod health;
pub mod helpers;
pub mod pages;
pub mod state;
pub mod templates;

pub use generate_api::{GenerateApiService, generate_api_routes};
pub use health::{HealthService, health_routes};
pub use pages::{PageService, page_routes};
pub use state::AppState;

use actix_web::web;

/// 注册全部路由
///
/// 页面 scope 为空前缀，必须最后注册。
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").service(health_routes()))
        .service(web::scope("/api").service(generate_api_routes()))
        .service(page_routes());
}
