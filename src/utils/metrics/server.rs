//! Metrics server module
//!
//! Serves the Prometheus registry over HTTP for scraping.

use actix_web::middleware::{Compress, NormalizePath};
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use tracing::{error, info};

use crate::utils::metrics::{gather_metrics, update_system_metrics};

/// Metrics endpoint handler
async fn metrics_handler() -> impl Responder {
	update_system_metrics();

	match gather_metrics() {
		Ok(buffer) => HttpResponse::Ok()
			.content_type("text/plain; version=0.0.4; charset=utf-8")
			.body(buffer),
		Err(e) => {
			error!("Error gathering metrics: {}", e);
			HttpResponse::InternalServerError().finish()
		}
	}
}

/// Binds the metrics server to `bind_address`
///
/// Inside a container (`IN_DOCKER=true`) the host part is replaced with `0.0.0.0`.
pub fn create_metrics_server(bind_address: String) -> std::io::Result<actix_web::dev::Server> {
	let actual_bind_address = if std::env::var("IN_DOCKER").unwrap_or_default() == "true" {
		match bind_address.rsplit_once(':') {
			Some((_, port)) => format!("0.0.0.0:{}", port),
			None => "0.0.0.0:8081".to_string(),
		}
	} else {
		bind_address.clone()
	};

	info!(
		"Starting metrics server on {} (actual bind: {})",
		bind_address, actual_bind_address
	);

	Ok(HttpServer::new(|| {
		App::new()
			.wrap(Compress::default())
			.wrap(NormalizePath::trim())
			.route("/metrics", web::get().to(metrics_handler))
	})
	.workers(2)
	.bind(actual_bind_address)?
	.shutdown_timeout(5)
	.run())
}
