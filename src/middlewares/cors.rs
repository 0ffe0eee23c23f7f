use actix_cors::Cors;

pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| true)
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allow_any_header()
        // 租户靠 cookie 识别，跨域请求必须携带凭据
        .supports_credentials()
        .expose_headers(vec!["Content-Disposition"])
        .max_age(3600)
}
