pub mod lottery;
pub mod participant;
pub mod prize;
pub mod tenant;

pub use lottery::lottery_config;
pub use participant::participant_config;
pub use prize::prize_config;
pub use tenant::tenant_config;

use crate::error::AppError;
use crate::middlewares::TenantMiddleware;
use crate::services::LotteryService;
use actix_web::web;

/// JSON 解析失败时也返回统一的错误结构
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

/// 注册 `/api/v1` 下的全部路由；租户识别中间件只作用于该 scope
pub fn api_config(
    lottery_service: LotteryService,
    cookie_name: impl Into<String>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    let tenant_middleware = TenantMiddleware::new(lottery_service, cookie_name);
    move |cfg: &mut web::ServiceConfig| {
        cfg.service(
            web::scope("/api/v1")
                .configure(tenant_config)
                .configure(prize_config)
                .configure(participant_config)
                .configure(lottery_config)
                .wrap(tenant_middleware),
        );
    }
}
