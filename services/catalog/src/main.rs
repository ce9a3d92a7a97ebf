//! Catalog Service - 商品目录服务入口
//!
//! 进程启动时装配一次：仓储 → 服务 → RPC 观察者 → HTTP 服务器

use std::net::SocketAddr;
use std::sync::Arc;

use catalog::api::http::{self, AppState};
use catalog::api::rpc::ProductRpc;
use catalog::application::ProductService;
use catalog::domain::repositories::ProductRepository;
use catalog::infrastructure::persistence::PostgresProductRepository;
use catalog::infrastructure::upload::{DiskImageStore, ImageStore};
use mesa_adapter_kafka::RpcObserver;
use mesa_bootstrap::{Infrastructure, init_runtime, shutdown_signal};
use mesa_config::AppConfig;
use mesa_ports::RpcResponder;
use mesa_telemetry::init_metrics;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("config")?;
    init_runtime(&config);
    let metrics_handle = init_metrics();

    let infra = Infrastructure::from_config(config).await?;
    let config = infra.config();

    catalog::infrastructure::persistence::MIGRATOR
        .run(&infra.postgres_pool())
        .await?;
    info!("Database migrations applied");

    let repository: Arc<dyn ProductRepository> =
        Arc::new(PostgresProductRepository::new(infra.postgres_pool()));
    let service = Arc::new(ProductService::new(repository));

    // RPC 频道订阅（kafka 未配置时退化为纯 HTTP 服务）
    if let Some(rpc_config) = infra.rpc_channel_config() {
        let observer = RpcObserver::new(rpc_config)?;
        let responder: Arc<dyn RpcResponder> = Arc::new(ProductRpc::new(service.clone()));
        tokio::spawn(async move {
            if let Err(e) = observer.observe(responder).await {
                error!(error = %e, "RPC observer terminated");
            }
        });
    } else {
        info!("Kafka not configured, RPC channel disabled");
    }

    let image_store: Arc<dyn ImageStore> = Arc::new(DiskImageStore::new(&config.uploads.image_dir)?);
    let state = AppState {
        service,
        image_store,
        max_images: config.uploads.max_images,
    };

    let app = http::router(state, &config.uploads.image_dir)
        .merge(http::metrics_router(metrics_handle))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "Starting catalog service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
