//! Logging init: pretty or JSON to stderr, level from `-v` or `RUST_LOG`

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(verbosity: u8) -> Result<()> {
    let log_format = std::env::var("GHOSTCTL_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let default_level = match verbosity {
        0 => "ghostctl=warn",
        1 => "ghostctl=info",
        _ => "ghostctl=debug",
    };

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}
