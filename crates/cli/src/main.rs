use anyhow::Context;
use chrono::Datelike;
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nivesh_core::client::{HttpProjectionClient, ProjectionApi};
use nivesh_core::domain::form::FormInput;
use nivesh_core::{advice, charts, render};

#[derive(Debug, Parser)]
#[command(name = "nivesh_cli")]
struct Args {
    /// JSON object of form fields (field name -> entered text, the same
    /// shape the browser form posts).
    #[arg(long)]
    form: PathBuf,

    /// Where to write the report document.
    #[arg(long, default_value = "report.html")]
    out: PathBuf,

    /// Collect and print the request payload without calling the service.
    #[arg(long)]
    dry_run: bool,
}

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

    let args = Args::parse();

    let text = std::fs::read_to_string(&args.form)
        .with_context(|| format!("read form fields from {}", args.form.display()))?;
    let fields: BTreeMap<String, String> =
        serde_json::from_str(&text).context("form file must be a JSON object of string fields")?;
    let form = FormInput::collect(&fields);

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&form)?);
        return Ok(());
    }

    let client = HttpProjectionClient::from_settings(&settings)?;

    match client.fetch_projection(&form).await {
        Ok(response) => {
            let recommendations = advice::recommendations(&response.summary, &form);
            let bundle = charts::build_charts(&response);
            let body = format!(
                "{}{}{}",
                render::results_body(&response, &recommendations, current_year()),
                render::chart_grid(),
                render::chart_scripts(&bundle),
            );

            std::fs::write(&args.out, render::document("Retirement Projection", &body))
                .with_context(|| format!("write report to {}", args.out.display()))?;

            tracing::info!(
                out = %args.out.display(),
                years = response.results.len(),
                milestones = response.age_milestones.len(),
                "report written"
            );
            Ok(())
        }
        Err(err) => {
            // The failure page mirrors what the web shell shows, so the
            // report file is never half-written or stale.
            let body = render::error_section(&err);
            std::fs::write(&args.out, render::document("Retirement Projection", &body))
                .with_context(|| format!("write report to {}", args.out.display()))?;

            let err = anyhow::Error::new(err);
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "projection request failed");
            Err(err)
        }
    }
}

fn current_year() -> i32 {
    chrono::Utc::now().year()
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
