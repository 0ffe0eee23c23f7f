use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::TenantConfig;
use crate::handlers;
use crate::models::*;

/// 租户 cookie 鉴权方案；默认名称，实际名称由 [`openapi_doc`] 按配置覆盖
struct TenantCookieAddon;

impl Modify for TenantCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        set_tenant_cookie(openapi, &TenantConfig::default().cookie_name);
    }
}

fn set_tenant_cookie(openapi: &mut utoipa::openapi::OpenApi, cookie_name: &str) {
    if let Some(components) = openapi.components.as_mut() {
        components.add_security_scheme(
            "tenant_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(cookie_name))),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::tenant::get_tenant,
        handlers::tenant::set_tenant,
        handlers::tenant::clear_tenant,
        handlers::prize::get_prizes,
        handlers::prize::add_prize,
        handlers::prize::upload_prizes_csv,
        handlers::prize::get_eligible,
        handlers::participant::get_participants,
        handlers::participant::add_participant,
        handlers::participant::upload_participants_csv,
        handlers::lottery::get_overview,
        handlers::lottery::draw,
        handlers::lottery::get_results,
        handlers::lottery::export_results_csv,
    ),
    components(
        schemas(
            Prize,
            Participant,
            DrawResult,
            AddPrizeRequest,
            AddParticipantRequest,
            DrawRequest,
            DrawResponse,
            LotteryOverview,
            PrizeImportResponse,
            ParticipantImportResponse,
            TenantId,
            SetTenantRequest,
            TenantResponse,
            ApiError,
        )
    ),
    modifiers(&TenantCookieAddon),
    tags(
        (name = "tenant", description = "Tenant identification API"),
        (name = "prize", description = "Prize management API"),
        (name = "participant", description = "Participant management API"),
        (name = "lottery", description = "Draw and results API"),
    ),
    info(
        title = "Lottery Backend API",
        version = "0.1.0",
        description = "Multi-tenant prize draw REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

/// OpenAPI 文档，安全方案使用实际配置的租户 cookie 名
pub fn openapi_doc(cookie_name: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    set_tenant_cookie(&mut doc, cookie_name);
    doc
}

pub fn swagger_config(cookie_name: &str) -> impl FnOnce(&mut web::ServiceConfig) {
    let doc = openapi_doc(cookie_name);
    move |cfg: &mut web::ServiceConfig| {
        cfg.service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", doc))
            .route(
                "/swagger-ui",
                web::get().to(|| async {
                    actix_web::HttpResponse::Found()
                        .append_header(("Location", "/swagger-ui/"))
                        .finish()
                }),
            );
    }
}
