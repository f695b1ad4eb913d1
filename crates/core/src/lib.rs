pub mod advice;
pub mod charts;
pub mod client;
pub mod domain;
pub mod format;
pub mod render;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub projection_base_url: Option<String>,
        pub projection_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                projection_base_url: std::env::var("PROJECTION_BASE_URL").ok(),
                projection_timeout_secs: std::env::var("PROJECTION_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok()),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_projection_base_url(&self) -> anyhow::Result<&str> {
            self.projection_base_url
                .as_deref()
                .context("PROJECTION_BASE_URL is required")
        }
    }
}
