use crate::error::AppError;
use crate::middlewares::current_tenant;
use crate::models::*;
use crate::services::LotteryService;
use crate::utils::parse_prizes;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/prizes",
    tag = "prize",
    security(
        ("tenant_cookie" = [])
    ),
    responses(
        (status = 200, description = "获取奖项列表成功", body = [Prize])
    )
)]
/// 当前租户的全部奖项（含剩余数量）
pub async fn get_prizes(
    service: web::Data<LotteryService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    match current_tenant(&req) {
        Ok(tenant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": service.get_prizes(&tenant.tenant_id)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/prizes",
    tag = "prize",
    request_body = AddPrizeRequest,
    security(
        ("tenant_cookie" = [])
    ),
    responses(
        (status = 200, description = "新增奖项成功，返回最新列表", body = [Prize]),
        (status = 400, description = "请求参数错误")
    )
)]
/// 新增奖项；同名奖项允许重复新增，抽奖时以第一个为准
pub async fn add_prize(
    service: web::Data<LotteryService>,
    req: HttpRequest,
    request: web::Json<AddPrizeRequest>,
) -> Result<HttpResponse> {
    let tenant = match current_tenant(&req) {
        Ok(t) => t,
        Err(e) => return Ok(e.error_response()),
    };
    let request = request.into_inner();
    let name = request.name.trim();
    if name.is_empty() {
        return Ok(AppError::ValidationError("Prize name cannot be empty".into()).error_response());
    }

    service.add_prize(
        &tenant.tenant_id,
        name,
        request.item.trim(),
        request.quantity,
        request.draw_from_all,
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": service.get_prizes(&tenant.tenant_id)
    })))
}

#[utoipa::path(
    post,
    path = "/prizes/csv",
    tag = "prize",
    request_body(content = String, content_type = "text/csv", description = "每行: 奖项名称,奖品,数量,是否全员可抽"),
    security(
        ("tenant_cookie" = [])
    ),
    responses(
        (status = 200, description = "导入成功", body = PrizeImportResponse),
        (status = 400, description = "CSV 无法解析")
    )
)]
/// 以 CSV 批量导入奖项；字段数不符的行会被跳过
pub async fn upload_prizes_csv(
    service: web::Data<LotteryService>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let tenant = match current_tenant(&req) {
        Ok(t) => t,
        Err(e) => return Ok(e.error_response()),
    };
    let parsed = match parse_prizes(&body) {
        Ok(p) => p,
        Err(e) => return Ok(AppError::from(e).error_response()),
    };

    let imported = parsed.rows.len();
    for row in parsed.rows {
        service.add_prize(
            &tenant.tenant_id,
            &row.name,
            &row.item,
            row.quantity,
            row.draw_from_all,
        );
    }
    log::info!(
        "Tenant {} imported {imported} prizes ({} skipped)",
        tenant.tenant_id,
        parsed.skipped
    );

    let response = CsvImportResponse {
        imported,
        skipped: parsed.skipped,
        items: service.get_prizes(&tenant.tenant_id),
    };
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": response })))
}

#[utoipa::path(
    get,
    path = "/prizes/{name}/eligible",
    tag = "prize",
    params(
        ("name" = String, Path, description = "奖项名称")
    ),
    security(
        ("tenant_cookie" = [])
    ),
    responses(
        (status = 200, description = "当前可参与该奖项抽奖的参与者", body = [Participant]),
        (status = 404, description = "奖项不存在"),
        (status = 409, description = "奖项已抽完或无合格参与者")
    )
)]
/// 查看某奖项当前的合格参与者（不会抽奖）
pub async fn get_eligible(
    service: web::Data<LotteryService>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let tenant = match current_tenant(&req) {
        Ok(t) => t,
        Err(e) => return Ok(e.error_response()),
    };
    match service.get_eligible_participants(&tenant.tenant_id, path.into_inner().trim()) {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(AppError::from(e).error_response()),
    }
}

pub fn prize_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prizes")
            .route("", web::get().to(get_prizes))
            .route("", web::post().to(add_prize))
            .route("/csv", web::post().to(upload_prizes_csv))
            .route("/{name}/eligible", web::get().to(get_eligible)),
    );
}
