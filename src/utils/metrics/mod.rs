//! Metrics for the dashboard.
//!
//! - Global Prometheus registry.
//! - Chain head, holdings and host resource metrics.

pub mod server;
use lazy_static::lazy_static;
use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use sysinfo::System;

lazy_static! {
	// Global Prometheus registry.
	pub static ref REGISTRY: Registry = Registry::new();

	// Latest published chain head height.
	pub static ref CHAIN_HEAD_HEIGHT: IntGauge = {
		let gauge = IntGauge::new("chain_head_height", "Latest published chain head height").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	// Unix time of the latest published snapshot.
	pub static ref CHAIN_LAST_UPDATED: IntGauge = {
		let gauge = IntGauge::new(
			"chain_last_updated_seconds",
			"Unix time of the latest published chain snapshot",
		)
		.unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	// 1 while the new-block pulse is raised.
	pub static ref CHAIN_PULSE_ACTIVE: IntGauge = {
		let gauge = IntGauge::new("chain_pulse_active", "Whether the new block pulse is raised").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	// Poll cycles aborted by a provider error.
	pub static ref CHAIN_POLL_FAILURES: IntCounter = {
		let counter = IntCounter::new("chain_poll_failures_total", "Poll cycles aborted by an error").unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Ticks skipped because the previous cycle was still running.
	pub static ref CHAIN_POLL_SKIPPED: IntCounter = {
		let counter = IntCounter::new(
			"chain_poll_skipped_total",
			"Poll ticks skipped while a cycle was in flight",
		)
		.unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Number of tracked token contracts.
	pub static ref HOLDINGS_TRACKED: IntGauge = {
		let gauge = IntGauge::new("holdings_tracked", "Number of tracked token contracts").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	// Gauge for CPU usage percentage.
	pub static ref CPU_USAGE: Gauge = {
		let gauge = Gauge::new("cpu_usage_percentage", "Current CPU usage percentage").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	// Gauge for memory usage in bytes.
	pub static ref MEMORY_USAGE: Gauge = {
		let gauge = Gauge::new("memory_usage_bytes", "Memory usage in bytes").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	// Gauge for memory usage percentage.
	pub static ref MEMORY_USAGE_PERCENT: Gauge = {
		let gauge = Gauge::new("memory_usage_percentage", "Memory usage percentage").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};
}

/// Gather all metrics and encode them in the Prometheus text format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}

/// Refreshes CPU and memory gauges.
pub fn update_system_metrics() {
	let mut sys = System::new_all();
	sys.refresh_all();

	CPU_USAGE.set(sys.global_cpu_usage() as f64);

	let total_memory = sys.total_memory();
	let used_memory = sys.used_memory();
	MEMORY_USAGE.set(used_memory as f64);
	MEMORY_USAGE_PERCENT.set(if total_memory > 0 {
		(used_memory as f64 / total_memory as f64) * 100.0
	} else {
		0.0
	});
}

/// Forces registration of every dashboard metric so they show up before first use.
pub fn register_metrics() {
	lazy_static::initialize(&CHAIN_HEAD_HEIGHT);
	lazy_static::initialize(&CHAIN_LAST_UPDATED);
	lazy_static::initialize(&CHAIN_PULSE_ACTIVE);
	lazy_static::initialize(&CHAIN_POLL_FAILURES);
	lazy_static::initialize(&CHAIN_POLL_SKIPPED);
	lazy_static::initialize(&HOLDINGS_TRACKED);
	lazy_static::initialize(&CPU_USAGE);
	lazy_static::initialize(&MEMORY_USAGE);
	lazy_static::initialize(&MEMORY_USAGE_PERCENT);
}
