use crate::config::TenantConfig;
use crate::middlewares::{CurrentTenant, client_ip, current_tenant};
use crate::models::*;
use crate::services::LotteryService;
use actix_web::cookie::{Cookie, time::Duration as CookieDuration};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn tenant_response(tenant: CurrentTenant) -> TenantResponse {
    TenantResponse {
        tenant_name: tenant.tenant_name,
        tenant_id: tenant.tenant_id,
    }
}

#[utoipa::path(
    get,
    path = "/tenant",
    tag = "tenant",
    security(
        ("tenant_cookie" = [])
    ),
    responses(
        (status = 200, description = "获取当前租户成功", body = TenantResponse)
    )
)]
/// 当前请求对应的租户
pub async fn get_tenant(req: HttpRequest) -> Result<HttpResponse> {
    match current_tenant(&req) {
        Ok(tenant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": tenant_response(tenant)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/tenant",
    tag = "tenant",
    request_body = SetTenantRequest,
    responses(
        (status = 200, description = "设置租户名成功（名称为空时不修改 cookie）", body = TenantResponse)
    )
)]
/// 设置租户名 cookie（有效期一年）
pub async fn set_tenant(
    tenant_config: web::Data<TenantConfig>,
    req: HttpRequest,
    request: web::Json<SetTenantRequest>,
) -> Result<HttpResponse> {
    let ip = client_ip(&req.connection_info());
    let tenant_name = request.into_inner().tenant_name.trim().to_string();

    if tenant_name.is_empty() {
        let existing = req
            .cookie(&tenant_config.cookie_name)
            .map(|c| c.value().to_string());
        let tenant = CurrentTenant::resolve(existing, &ip);
        return Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": tenant_response(tenant)
        })));
    }

    let cookie = Cookie::build(tenant_config.cookie_name.clone(), tenant_name.clone())
        .path("/")
        .max_age(CookieDuration::seconds(tenant_config.cookie_max_age_secs))
        .http_only(true)
        .finish();
    let tenant = CurrentTenant::resolve(Some(tenant_name), &ip);
    log::info!("Tenant switched to: {}", tenant.tenant_id);

    Ok(HttpResponse::Ok().cookie(cookie).json(json!({
        "success": true,
        "data": tenant_response(tenant)
    })))
}

#[utoipa::path(
    delete,
    path = "/tenant",
    tag = "tenant",
    responses(
        (status = 200, description = "已清除租户数据与 cookie")
    )
)]
/// 清除租户的全部抽奖数据并删除 cookie
pub async fn clear_tenant(
    service: web::Data<LotteryService>,
    tenant_config: web::Data<TenantConfig>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let mut cleared = false;
    if let Some(cookie) = req.cookie(&tenant_config.cookie_name)
        && !cookie.value().trim().is_empty()
    {
        let ip = client_ip(&req.connection_info());
        let tenant = CurrentTenant::resolve(Some(cookie.value().to_string()), &ip);
        cleared = service.clear_session(&tenant.tenant_id);
    }

    let mut removal = Cookie::build(tenant_config.cookie_name.clone(), "")
        .path("/")
        .finish();
    removal.make_removal();

    Ok(HttpResponse::Ok().cookie(removal).json(json!({
        "success": true,
        "data": { "cleared": cleared }
    })))
}

pub fn tenant_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/tenant")
            .route(web::get().to(get_tenant))
            .route(web::post().to(set_tenant))
            .route(web::delete().to(clear_tenant)),
    );
}
