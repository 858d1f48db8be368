pub mod auth;
pub mod error;
pub mod routes;
pub mod slack_api;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use shift_core::clock::SystemClock;
use shift_core::config::Config;
use shift_core::timeline::TimelineStore;
use tower_http::trace::TraceLayer;

use crate::slack_api::SlackClient;
use crate::state::{AppState, StateParts};

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let slack = Router::new()
        .route("/slack/commands", post(routes::commands::slash_command))
        .route("/slack/events", post(routes::events::receive_event))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::verify_slack_signature,
        ));

    let api = Router::new()
        .route(
            "/api/incidents/{id}/timeline",
            get(routes::timeline::export_timeline),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::require_api_token,
        ));

    Router::new()
        .route("/healthz", get(routes::health::healthz))
        .merge(api)
        .merge(slack)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Wire the Slack client, store, and desk from `config`.
pub fn state_from_config(config: &Config) -> anyhow::Result<AppState> {
    let token = config
        .slack
        .bot_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .context("slack bot token is not configured")?;
    let client = Arc::new(SlackClient::new(
        &config.slack.api_base,
        token,
        config.slack.request_timeout_ms,
    )?);
    let clock = Arc::new(SystemClock);
    let store = Arc::new(TimelineStore::new(client.clone(), clock.clone()));

    Ok(AppState::new(StateParts {
        platform: client,
        store,
        clock,
        slash_command: config.slash_command.clone(),
        notifications_channel: config.notifications_channel.clone(),
        capture_all_messages: config.capture_all_messages,
        signing_secret: config.slack.signing_secret.clone(),
        api_token: config.server.api_token.clone(),
    }))
}

/// Run the bot's HTTP server until Ctrl-C / SIGTERM.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let app = build_router(state_from_config(config)?);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        port = config.server.port,
        slash_command = %config.slash_command,
        notifications_channel = %config.notifications_channel,
        capture_all_messages = config.capture_all_messages,
        api_auth = config.server.api_token.is_some(),
        "shift bot listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("shift bot stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
