//! 재고 관리 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 로그인(토큰 발급), 현재 사용자 조회, 재고 이력 조회 엔드포인트를 제공합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use stock_api::auth::{Authenticator, TokenIssuer};
use stock_api::openapi::swagger_ui_router;
use stock_api::repository::{CredentialStore, InMemoryCredentialStore, PgCredentialStore};
use stock_api::routes::create_api_router;
use stock_api::state::AppState;
use stock_core::{init_logging, AppConfig, CorsConfig, LogConfig};

/// CORS 레이어 생성.
///
/// Origin 목록이 비어 있으면 모든 Origin을 허용합니다 (개발용).
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let restricted = !origins.is_empty();
    let allow_origin = if restricted {
        info!("CORS configured with {} allowed origins", origins.len());
        AllowOrigin::list(origins)
    } else {
        if !config.origins.is_empty() {
            warn!("cors.origins contains no valid origins, allowing any");
        } else {
            warn!("cors.origins not set, allowing any origin (development mode)");
        }
        AllowOrigin::any()
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(restricted)
        .max_age(Duration::from_secs(3600))
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, config: &AppConfig) -> Router {
    Router::new()
        .merge(create_api_router().with_state(state))
        .merge(swagger_ui_router())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout_secs),
        ))
        .layer(cors_layer(&config.cors))
}

/// 자격증명 저장소 선택.
///
/// `database.url`이 있으면 PostgreSQL에 연결하고, 연결에 실패하면 시작을 중단합니다.
/// 없으면 `auth.dev_users`로 채운 메모리 저장소를 사용합니다.
async fn create_credential_store(
    config: &AppConfig,
) -> Result<(Arc<dyn CredentialStore>, Option<sqlx::PgPool>), Box<dyn std::error::Error>> {
    let database = &config.database;
    let Some(url) = database.url.as_deref() else {
        let dev_users = &config.auth.dev_users;
        if dev_users.is_empty() {
            warn!("database.url not set and no auth.dev_users configured; every login will fail");
        } else {
            warn!(
                count = dev_users.len(),
                "database.url not set, using in-memory credential store"
            );
        }
        return Ok((Arc::new(InMemoryCredentialStore::from_dev_users(dev_users)), None));
    };

    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(Duration::from_secs(database.connection_timeout_secs))
        .connect(url)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;

    sqlx::query("SELECT 1").fetch_one(&pool).await.map_err(|e| {
        error!("Failed to verify database connection: {}", e);
        e
    })?;
    info!("Connected to PostgreSQL successfully");

    Ok((Arc::new(PgCredentialStore::new(pool.clone())), Some(pool)))
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그가 있으면 OpenAPI JSON 스펙을 stdout으로 출력합니다.
/// 출력했으면 `true`를 반환합니다.
fn handle_export_openapi() -> Result<bool, Box<dyn std::error::Error>> {
    use stock_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    if !std::env::args().any(|arg| arg == "--export-openapi") {
        return Ok(false);
    }

    println!("{}", serde_json::to_string_pretty(&ApiDoc::openapi())?);
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    if handle_export_openapi()? {
        return Ok(());
    }

    let config = AppConfig::load_default()?;
    init_logging(LogConfig::from_settings(&config.logging))?;

    info!("Starting Stock API server...");

    // 서명 키나 유효 시간이 잘못되면 시작하지 않음
    let tokens = TokenIssuer::new(
        config.auth.jwt_secret.as_ref(),
        config.auth.token_ttl_minutes,
    )
    .map_err(|e| {
        error!(error = %e, "Invalid token signing settings (auth.jwt_secret, auth.token_ttl_minutes)");
        e
    })?;

    let (store, pool) = create_credential_store(&config).await?;
    let authenticator = Authenticator::new(store, config.auth.login_identifier);

    let mut state = AppState::new(authenticator, tokens);
    if let Some(pool) = pool {
        state = state.with_db_pool(pool);
    }
    let state = Arc::new(state);

    info!(
        version = %state.version,
        has_db = state.db_pool.is_some(),
        login_identifier = %state.authenticator.identifier_kind(),
        token_ttl_minutes = config.auth.token_ttl_minutes,
        "Application state initialized"
    );

    let app = create_router(state, &config);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
