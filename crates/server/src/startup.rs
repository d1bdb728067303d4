use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use common::utils::logging::{init_logging_default, init_logging_json};
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::repo::file::FileUserRepository;
use service::auth::service::AuthConfig;
use service::auth::AuthService;
use service::avatar::AvatarStore;
use service::contacts::ContactStore;
use service::mail::{Mailer, NoopMailer, SmtpMailer};

use crate::routes;
use crate::state::AppState;

fn init_logging(format: &str) {
    match format {
        "json" => init_logging_json(),
        _ => init_logging_default(),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn build_mailer(cfg: &configs::MailConfig) -> anyhow::Result<Arc<dyn Mailer>> {
    if cfg.enabled && !cfg.smtp_host.is_empty() {
        let mailer = SmtpMailer::new(
            &cfg.smtp_host,
            cfg.smtp_port,
            &cfg.smtp_username,
            &cfg.smtp_password,
            &cfg.from,
        )?;
        Ok(Arc::new(mailer))
    } else {
        info!("mail disabled; verification mails will be logged and dropped");
        Ok(Arc::new(NoopMailer))
    }
}

/// Public entry: build the app from configuration and run the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = configs::AppConfig::load_and_validate()?;
    init_logging(&cfg.server.log_format);
    common::env::ensure_env(&cfg.storage.data_dir, &cfg.storage.avatars_dir).await?;

    let users = FileUserRepository::new(&cfg.storage.users_file)
        .await
        .map_err(|e| anyhow::anyhow!("cannot open users store: {e}"))?;
    let mailer = build_mailer(&cfg.mail)?;
    let auth = Arc::new(AuthService::new(
        users,
        mailer,
        AuthConfig::new(&cfg.auth.jwt_secret, cfg.auth.token_ttl_secs, &cfg.mail.public_url),
    ));

    let state = AppState {
        auth,
        contacts: ContactStore::new(&cfg.storage.contacts_file),
        avatars: AvatarStore::new(&cfg.storage.avatars_dir),
    };

    let app: Router = routes::build_router(build_cors(), state, Path::new(&cfg.storage.avatars_dir));

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting contacts api server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
