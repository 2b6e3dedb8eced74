use axum::{
    routing::{get, post},
    Router,
};
use nota_fiscal_rust::{api, create_pool, db, AppConfig, NotaService, WebDriverFetcher};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置 (DATABASE_URL / SECRET_API_KEY 缺失直接退出)
    let config = AppConfig::from_env()?;
    info!(
        "Starting server on {}:{}, webdriver at {}",
        config.server.host, config.server.port, config.webdriver.url
    );

    // 创建数据库连接池并建表
    let pool = create_pool(&config.database.url).await?;
    info!("Database pool created");
    db::init_schema(&pool).await?;

    // 组装处理服务
    let fetcher = Arc::new(WebDriverFetcher::new(config.webdriver.url.clone()));
    let service = Arc::new(NotaService::new(pool, fetcher));
    let state = api::AppState {
        service,
        api_key: Arc::new(config.auth.api_key.clone()),
    };

    // 构建路由
    let app = Router::new()
        .route("/", get(api::root))
        .route("/processar-nota", post(api::processar_nota))
        .with_state(state)
        .layer(ServiceBuilder::new());

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /               - liveness");
    info!("  POST /processar-nota - process a nota fiscal URL");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
