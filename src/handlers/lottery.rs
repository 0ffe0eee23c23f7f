use crate::error::AppError;
use crate::middlewares::current_tenant;
use crate::models::*;
use crate::services::LotteryService;
use crate::utils::export_results;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/lottery",
    tag = "lottery",
    security(
        ("tenant_cookie" = [])
    ),
    responses(
        (status = 200, description = "抽奖界面所需的全部数据", body = LotteryOverview)
    )
)]
/// 奖项、参与者与已抽出的结果
pub async fn get_overview(
    service: web::Data<LotteryService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let tenant = match current_tenant(&req) {
        Ok(t) => t,
        Err(e) => return Ok(e.error_response()),
    };
    let overview = service.get_overview(&tenant.tenant_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(overview)))
}

#[utoipa::path(
    post,
    path = "/draw",
    tag = "lottery",
    request_body = DrawRequest,
    security(
        ("tenant_cookie" = [])
    ),
    responses(
        (status = 200, description = "抽奖成功", body = DrawResponse),
        (status = 400, description = "未选择奖项"),
        (status = 404, description = "奖项不存在"),
        (status = 409, description = "奖项已抽完或无合格参与者")
    )
)]
/// 抽奖:
/// 1. 按名称找到奖项并检查剩余数量
/// 2. 按奖项规则筛选合格参与者
/// 3. 均匀随机抽出一人，扣减数量并记录结果
pub async fn draw(
    service: web::Data<LotteryService>,
    req: HttpRequest,
    request: web::Json<DrawRequest>,
) -> Result<HttpResponse> {
    let tenant = match current_tenant(&req) {
        Ok(t) => t,
        Err(e) => return Ok(e.error_response()),
    };
    // 与新增奖项时一致，名称去除首尾空白
    let request = request.into_inner();
    let prize_name = request.prize_name.trim();
    if prize_name.is_empty() {
        return Ok(AppError::ValidationError("Please select a prize.".into()).error_response());
    }

    match service.draw(&tenant.tenant_id, prize_name) {
        Ok(result) => {
            let response = DrawResponse {
                result,
                prizes: service.get_prizes(&tenant.tenant_id),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
        }
        Err(e) => Ok(AppError::from(e).error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/results",
    tag = "lottery",
    security(
        ("tenant_cookie" = [])
    ),
    responses(
        (status = 200, description = "按抽奖顺序排列的结果", body = [DrawResult])
    )
)]
pub async fn get_results(
    service: web::Data<LotteryService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    match current_tenant(&req) {
        Ok(tenant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": service.get_results(&tenant.tenant_id)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/results/csv",
    tag = "lottery",
    security(
        ("tenant_cookie" = [])
    ),
    responses(
        (status = 200, description = "抽奖结果 CSV 文件", content_type = "text/csv", body = String)
    )
)]
/// 下载抽奖结果 CSV（UTF-8 BOM，Excel 可直接打开）
pub async fn export_results_csv(
    service: web::Data<LotteryService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let tenant = match current_tenant(&req) {
        Ok(t) => t,
        Err(e) => return Ok(e.error_response()),
    };
    match export_results(&service.get_results(&tenant.tenant_id)) {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                "attachment;filename=lottery_results.csv",
            ))
            .body(bytes)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn lottery_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/lottery", web::get().to(get_overview))
        .route("/draw", web::post().to(draw))
        .route("/results", web::get().to(get_results))
        .route("/results/csv", web::get().to(export_results_csv));
}
