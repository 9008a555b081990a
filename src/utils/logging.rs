//! Logging setup.
//!
//! Logging goes through `tracing_subscriber` with an `EnvFilter`: `RUST_LOG` wins when it
//! is set, otherwise the level passed by the caller (normally from `--log-level`) is used.
//! Records emitted through the `log` facade are forwarded to the same subscriber.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Level used when neither `RUST_LOG` nor an explicit level is given
pub const DEFAULT_LOG_LEVEL: &str = "info";

type SetupResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

/// Sets up logging to stdout
pub fn setup_logging(level: Option<&str>) -> SetupResult {
	setup_logging_with_writer(level, std::io::stdout)
}

/// Sets up logging to a custom writer
pub fn setup_logging_with_writer<W>(level: Option<&str>, writer: W) -> SetupResult
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	let filter = build_filter(level);

	tracing_subscriber::registry()
		.with(filter)
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_thread_ids(false)
						.with_thread_names(false)
						.with_ansi(false)
						.compact(),
				)
				.fmt_fields(fmt::format::PrettyFields::new()),
		)
		.try_init()?;
	Ok(())
}

fn build_filter(level: Option<&str>) -> EnvFilter {
	EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(level.unwrap_or(DEFAULT_LOG_LEVEL)))
		.unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}
