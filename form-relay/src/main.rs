//! Form Relay Server - contact form endpoint backed by SMTP.
//!
//! This binary:
//! - Loads configuration from the environment (and `.env` if present)
//! - Checks the SMTP credentials once in the background
//! - Serves `GET /` and `POST /contact` until SIGINT/SIGTERM

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use formrelay::mail::check_transport;
use formrelay::{router, AppState, Config, SmtpMailer};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before the filter so RUST_LOG can live there too
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!(dotenv_loaded, "form_relay_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        smtp_host = %config.smtp_host,
        smtp_port = ?config.smtp_port,
        smtp_tls = config.smtp_tls,
        email_user_set = !config.email_user.is_empty(),
        to_email_set = !config.to_email.is_empty(),
        allowed_origins = ?config.allowed_origins,
        body_limit = config.body_limit,
        escape_html = config.escape_html,
        expose_send_errors = config.expose_send_errors,
        "config_loaded"
    );

    let mailer = Arc::new(SmtpMailer::new(&config).context("Failed to create SMTP transport")?);

    // Credential check never blocks startup; failures only get logged
    let verifier = mailer.clone();
    tokio::spawn(async move {
        check_transport(verifier.as_ref()).await;
    });

    let state = AppState::new(config.clone(), mailer);
    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "form_relay_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("form_relay_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("form_relay_shutting_down");
}
