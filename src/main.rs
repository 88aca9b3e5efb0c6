use ai_gallery_api::{
    create_app,
    logging::{init_logging, log_server_ready, log_shutdown, log_startup_info},
    services::search::client::MeilisearchClient,
    AppState,
};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let app_state = AppState::new().await?;

    log_startup_info(&app_state.config);

    tracing::info!("启动搜索引擎...");
    if let Err(e) = MeilisearchClient::init(
        app_state.config.meilisearch.url.clone(),
        app_state.config.meilisearch.api_key.clone(),
    )
    .await
    {
        tracing::error!("Meilisearch 初始化失败: {}", e);
        return Err(e);
    }
    let client = MeilisearchClient::instance()?;

    let db = app_state.db.clone();
    let sync_interval = app_state.config.meilisearch.sync_interval_secs;
    tokio::spawn(async move {
        client.sync_loop(&db, sync_interval).await;
    });

    tracing::info!("创建应用程序...");
    let app = create_app(app_state.clone());

    let addr: SocketAddr = format!(
        "{}:{}",
        app_state.config.server.host, app_state.config.server.port
    )
    .parse()?;

    tracing::info!("启动 HTTP 服务器...");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    log_server_ready(&addr);

    let result = axum::serve(listener, app).await;

    log_shutdown();
    result.map_err(Into::into)
}
