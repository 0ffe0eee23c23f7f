use actix_web::{App, HttpServer, middleware::Logger, web};
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use chrono::Local;  // timestamp in log lines

use lottery_backend::{
    config::Config,
    handlers,
    middlewares::create_cors,
    services::LotteryService,
    swagger::swagger_config,
    tasks,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        std::io::Error::other(e.to_string())
    })?;

    // 抽奖服务（进程内共享，随机数源在此时以当前时间为种子）
    let lottery_service = LotteryService::new(&config.session);

    tasks::spawn_all(lottery_service.clone(), &config.session);

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let tenant_config = config.tenant.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(handlers::json_config())
            .app_data(web::Data::new(lottery_service.clone()))
            .app_data(web::Data::new(tenant_config.clone()))
            .configure(swagger_config(&tenant_config.cookie_name))
            .configure(handlers::api_config(
                lottery_service.clone(),
                tenant_config.cookie_name.clone(),
            ))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
