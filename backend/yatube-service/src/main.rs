use actix_web::{web, App, HttpServer};
use db_pool::{create_pool as create_pg_pool, DbConfig as DbPoolConfig};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yatube_service::config::StorageBackend;
use yatube_service::db::{ContentStore, MemoryContentStore, PgContentStore};
use yatube_service::middleware::{MetricsMiddleware, SessionMiddleware};
use yatube_service::pagination::Paginator;
use yatube_service::session::SessionKeys;
use yatube_service::{routes, AppState, Config};

const SERVICE_NAME: &str = "yatube-service";

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn build_store(config: &Config) -> io::Result<Arc<dyn ContentStore>> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryContentStore::new()))
        }
        StorageBackend::Postgres => {
            let mut db_cfg = DbPoolConfig::new(SERVICE_NAME, &config.database.url);
            db_cfg.max_connections = db_cfg.max_connections.max(config.database.max_connections);
            db_cfg.log_config();

            let pool = create_pg_pool(db_cfg).await.map_err(|e| {
                io::Error::new(
                    io::ErrorKind::Other,
                    format!("Failed to create database pool: {e}"),
                )
            })?;
            tracing::info!("Connected to database via db-pool crate");

            let store = PgContentStore::new(pool);
            store.migrate().await.map_err(|e| {
                io::Error::new(
                    io::ErrorKind::Other,
                    format!("Failed to run migrations: {e}"),
                )
            })?;
            Ok(Arc::new(store))
        }
    }
}

/// Yatube Service
///
/// Serves the global, group, author and followed-authors feeds, post detail,
/// post create/edit forms, comments and follow actions. Caller identity comes
/// from session tokens issued by the external auth service.
#[actix_web::main]
async fn main() -> io::Result<()> {
    // Support container healthchecks via CLI subcommand: `healthcheck`
    {
        let mut args = std::env::args();
        let _bin = args.next();
        if let Some(cmd) = args.next() {
            if cmd == "healthcheck" || cmd == "healthcheck-http" {
                let port = std::env::var("YATUBE_SERVICE_PORT").unwrap_or_else(|_| "8000".into());
                let url = format!("http://127.0.0.1:{}/health", port);
                match reqwest::Client::new().get(&url).send().await {
                    Ok(resp) if resp.status().is_success() => return Ok(()),
                    Ok(resp) => {
                        eprintln!("healthcheck HTTP status: {}", resp.status());
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"));
                    }
                    Err(e) => {
                        eprintln!("healthcheck HTTP error: {}", e);
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"));
                    }
                }
            }
        }
    }

    let _ = dotenvy::dotenv();
    init_tracing();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting yatube-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let store = build_store(&config).await?;
    let state = web::Data::new(AppState::new(
        store,
        Paginator::new(config.feed.page_size),
        &config.auth.login_url,
    ));
    let session = SessionMiddleware::new(
        SessionKeys::new(&config.auth.jwt_secret),
        &config.auth.session_cookie,
    );

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(session.clone())
            .wrap(MetricsMiddleware)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(routes::configure)
    })
    .bind(&http_bind_address)?
    .workers(config.app.workers.max(1))
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let result = tokio::select! {
        joined = server_task => match joined {
            Ok(result) => result,
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
        },
        _ = &mut shutdown => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            Ok(())
        }
    };

    tracing::info!("Yatube-service shutting down");
    result
}
