use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Form, Router};
use chrono::Datelike;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nivesh_core::client::{HttpProjectionClient, ProjectionApi};
use nivesh_core::domain::form::FormInput;
use nivesh_core::{advice, charts, render};

mod page;

const PAGE_TITLE: &str = "Retirement Projection";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = nivesh_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let client = HttpProjectionClient::from_settings(&settings).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        e
    })?;

    let state = AppState {
        projection: Arc::new(client),
    };

    let app = Router::new()
        .route("/", get(form_page))
        .route("/report", post(report_page))
        .route("/healthz", get(healthz))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "web shell listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    projection: Arc<dyn ProjectionApi>,
}

async fn form_page() -> Html<String> {
    Html(render::document(PAGE_TITLE, &page::form_section(None)))
}

/// One submission cycle: collect the fields, make the single upstream call,
/// and return a complete page either way. Failures land in the error panel
/// where the results would have gone; the handler itself never fails.
async fn report_page(
    State(state): State<AppState>,
    Form(fields): Form<BTreeMap<String, String>>,
) -> Html<String> {
    let form = FormInput::collect(&fields);

    let body = match state.projection.fetch_projection(&form).await {
        Ok(response) => {
            let recommendations = advice::recommendations(&response.summary, &form);
            let bundle = charts::build_charts(&response);
            format!(
                "{}{}{}{}",
                page::form_section(Some(&form)),
                render::results_body(&response, &recommendations, current_year()),
                render::chart_grid(),
                render::chart_scripts(&bundle),
            )
        }
        Err(err) => {
            tracing::warn!(error = %err, "projection submission failed");
            format!(
                "{}{}",
                page::form_section(Some(&form)),
                render::error_section(&err),
            )
        }
    };

    Html(render::document(PAGE_TITLE, &body))
}

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &nivesh_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
