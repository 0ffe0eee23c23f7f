use crate::error::{AppError, AppResult};
use crate::models::TenantId;
use crate::services::LotteryService;
use actix_web::dev::ConnectionInfo;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// 由中间件解析出的当前租户，存放在请求扩展中
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentTenant {
    /// cookie 中的租户名
    pub tenant_name: Option<String>,
    pub tenant_id: TenantId,
}

impl CurrentTenant {
    pub fn resolve(tenant_name: Option<String>, client_ip: &str) -> Self {
        let tenant_name = tenant_name.filter(|n| !n.trim().is_empty());
        let tenant_id = TenantId::resolve(tenant_name.as_deref(), client_ip);
        Self {
            tenant_name,
            tenant_id,
        }
    }
}

/// 客户端IP（优先 Forwarded / X-Forwarded-For）
pub fn client_ip(info: &ConnectionInfo) -> String {
    info.realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// 从请求扩展中取当前租户
pub fn current_tenant(req: &HttpRequest) -> AppResult<CurrentTenant> {
    req.extensions()
        .get::<CurrentTenant>()
        .cloned()
        .ok_or_else(|| AppError::TenantError("Tenant could not be identified".to_string()))
}

// 不需要识别租户的路径（中间件只挂在 /api/v1 下）
struct PublicPaths {
    // 仅 GET 需要租户，其余方法公开
    write_only_public: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            write_only_public: vec!["/api/v1/tenant"],
        }
    }

    fn is_public_path(&self, method: &Method, path: &str) -> bool {
        self.write_only_public.contains(&path) && method != Method::GET
    }
}

/// 租户识别中间件
///
/// 以 cookie 中的租户名 + 客户端IP 组成租户ID，确保会话存在并刷新活动时间。
pub struct TenantMiddleware {
    lottery_service: LotteryService,
    cookie_name: String,
}

impl TenantMiddleware {
    pub fn new(lottery_service: LotteryService, cookie_name: impl Into<String>) -> Self {
        Self {
            lottery_service,
            cookie_name: cookie_name.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TenantMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TenantMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TenantMiddlewareService {
            service,
            lottery_service: self.lottery_service.clone(),
            cookie_name: self.cookie_name.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct TenantMiddlewareService<S> {
    service: S,
    lottery_service: LotteryService,
    cookie_name: String,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for TenantMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行 CORS 预检请求
        if req.method() == Method::OPTIONS
            || self.public_paths.is_public_path(req.method(), req.path())
        {
            return Box::pin(self.service.call(req));
        }

        let tenant_name = req
            .cookie(&self.cookie_name)
            .map(|c| c.value().to_string());
        let ip = client_ip(&req.connection_info());
        let tenant = CurrentTenant::resolve(tenant_name, &ip);

        // 每次请求都会刷新会话的活动时间
        self.lottery_service.get_session(&tenant.tenant_id);
        req.extensions_mut().insert(tenant);

        Box::pin(self.service.call(req))
    }
}
