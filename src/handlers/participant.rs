use crate::error::AppError;
use crate::middlewares::current_tenant;
use crate::models::*;
use crate::services::LotteryService;
use crate::utils::parse_participants;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/participants",
    tag = "participant",
    security(
        ("tenant_cookie" = [])
    ),
    responses(
        (status = 200, description = "获取参与者列表成功", body = [Participant])
    )
)]
pub async fn get_participants(
    service: web::Data<LotteryService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    match current_tenant(&req) {
        Ok(tenant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": service.get_participants(&tenant.tenant_id)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/participants",
    tag = "participant",
    request_body = AddParticipantRequest,
    security(
        ("tenant_cookie" = [])
    ),
    responses(
        (status = 200, description = "新增参与者成功（编号重复时忽略），返回最新列表", body = [Participant]),
        (status = 400, description = "编号或姓名为空")
    )
)]
/// 新增参与者；编号已存在时静默忽略
pub async fn add_participant(
    service: web::Data<LotteryService>,
    req: HttpRequest,
    request: web::Json<AddParticipantRequest>,
) -> Result<HttpResponse> {
    let tenant = match current_tenant(&req) {
        Ok(t) => t,
        Err(e) => return Ok(e.error_response()),
    };
    let request = request.into_inner();
    let (id, name) = (request.id.trim(), request.name.trim());
    if id.is_empty() || name.is_empty() {
        return Ok(AppError::ValidationError(
            "Participant ID and Name cannot be empty".into(),
        )
        .error_response());
    }

    service.add_participant(&tenant.tenant_id, id, name);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": service.get_participants(&tenant.tenant_id)
    })))
}

#[utoipa::path(
    post,
    path = "/participants/csv",
    tag = "participant",
    request_body(content = String, content_type = "text/csv", description = "每行: 员工编号,姓名"),
    security(
        ("tenant_cookie" = [])
    ),
    responses(
        (status = 200, description = "导入成功", body = ParticipantImportResponse),
        (status = 400, description = "CSV 无法解析")
    )
)]
/// 以 CSV 批量导入参与者
pub async fn upload_participants_csv(
    service: web::Data<LotteryService>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let tenant = match current_tenant(&req) {
        Ok(t) => t,
        Err(e) => return Ok(e.error_response()),
    };
    let parsed = match parse_participants(&body) {
        Ok(p) => p,
        Err(e) => return Ok(AppError::from(e).error_response()),
    };

    let imported = parsed.rows.len();
    for row in parsed.rows {
        service.add_participant(&tenant.tenant_id, &row.id, &row.name);
    }
    log::info!(
        "Tenant {} imported {imported} participants ({} skipped)",
        tenant.tenant_id,
        parsed.skipped
    );

    let response = CsvImportResponse {
        imported,
        skipped: parsed.skipped,
        items: service.get_participants(&tenant.tenant_id),
    };
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": response })))
}

pub fn participant_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/participants")
            .route("", web::get().to(get_participants))
            .route("", web::post().to(add_participant))
            .route("/csv", web::post().to(upload_participants_csv)),
    );
}
