//! Chain head polling with a short-lived new-block pulse.
//!
//! [`ChainPulse`] polls a [`ChainQueryClient`] on a fixed interval and publishes a
//! [`PulseView`] through a `watch` channel. A cycle that fails leaves the previous snapshot
//! in place; the next tick simply tries again.

use chrono::Utc;
use std::{
	sync::{
		atomic::{AtomicBool, AtomicU64, Ordering},
		Arc, Mutex, MutexGuard, PoisonError,
	},
	time::Duration,
};
use tokio::{
	sync::watch,
	task::JoinHandle,
	time::{interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
	models::{ChainSnapshot, PulseView},
	services::{
		blockchain::ChainQueryClient,
		pulse::cycle::{fetch_cycle, CycleOutcome},
	},
	utils::metrics::{
		CHAIN_HEAD_HEIGHT, CHAIN_LAST_UPDATED, CHAIN_POLL_FAILURES, CHAIN_POLL_SKIPPED,
		CHAIN_PULSE_ACTIVE,
	},
};

/// How long the pulse stays raised after a head height increase
pub const PULSE_DURATION: Duration = Duration::from_millis(1000);

/// State shared between the service handle, the schedule and in-flight cycles
struct PulseState {
	view: watch::Sender<PulseView>,
	/// Bumped by every start and stop; a cycle only publishes if it is unchanged
	epoch: AtomicU64,
	running: AtomicBool,
	/// Epoch of the cycle currently in flight; a cycle left over from a stopped run does
	/// not block the next one
	in_flight: Mutex<Option<u64>>,
	/// Height of the last snapshot published in the current epoch
	last_height: Mutex<Option<u64>>,
	pulse_duration: Duration,
}

/// Releases the in-flight slot when a cycle ends, including when it is cancelled
struct InFlightGuard<'a> {
	slot: &'a Mutex<Option<u64>>,
	epoch: u64,
}

impl Drop for InFlightGuard<'_> {
	fn drop(&mut self) {
		let mut slot = lock(self.slot);
		if *slot == Some(self.epoch) {
			*slot = None;
		}
	}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PulseState {
	/// Starts a new epoch while holding the view lock, so no publish interleaves with it
	///
	/// The height history belongs to a run and is forgotten here.
	fn advance_epoch(&self, running: bool) -> u64 {
		let mut epoch = 0;
		self.view.send_if_modified(|_| {
			epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
			self.running.store(running, Ordering::SeqCst);
			*lock(&self.last_height) = None;
			false
		});
		epoch
	}

	fn try_enter(&self, epoch: u64) -> Option<InFlightGuard<'_>> {
		let mut slot = lock(&self.in_flight);
		if *slot == Some(epoch) {
			return None;
		}
		*slot = Some(epoch);
		Some(InFlightGuard {
			slot: &self.in_flight,
			epoch,
		})
	}

	async fn run_cycle<C: ChainQueryClient + ?Sized>(self: &Arc<Self>, client: &C, epoch: u64) -> bool {
		let Some(_guard) = self.try_enter(epoch) else {
			CHAIN_POLL_SKIPPED.inc();
			debug!("Previous poll cycle still in flight, skipping tick");
			return false;
		};

		let previous_height = *lock(&self.last_height);
		debug!("Starting poll cycle after height {:?}", previous_height);

		match fetch_cycle(client, previous_height).await {
			Ok(outcome) => self.publish(outcome, epoch),
			Err(e) => {
				CHAIN_POLL_FAILURES.inc();
				warn!("Poll cycle failed, keeping previous snapshot: {}", e);
				false
			}
		}
	}

	fn publish(self: &Arc<Self>, outcome: CycleOutcome, epoch: u64) -> bool {
		let CycleOutcome {
			snapshot,
			height_increased,
		} = outcome;
		let height = snapshot.head_height;
		let now = Utc::now();

		let mut published_at = None;
		self.view.send_if_modified(|view| {
			if self.epoch.load(Ordering::SeqCst) != epoch {
				return false;
			}
			let last_updated = view.last_updated.map_or(now, |previous| previous.max(now));
			view.last_updated = Some(last_updated);
			view.snapshot = Some(snapshot);
			if height_increased {
				view.pulse = true;
			}
			*lock(&self.last_height) = Some(height);
			published_at = Some(last_updated);
			true
		});

		let Some(published_at) = published_at else {
			debug!("Discarding snapshot at height {} from a stopped run", height);
			return false;
		};

		CHAIN_HEAD_HEIGHT.set(i64::try_from(height).unwrap_or(i64::MAX));
		CHAIN_LAST_UPDATED.set(published_at.timestamp());

		if height_increased {
			info!("New block at height {}", height);
			CHAIN_PULSE_ACTIVE.set(1);
			self.schedule_pulse_clear();
		} else {
			debug!("Published snapshot at height {}", height);
		}
		true
	}

	/// Every raised pulse drops exactly one duration later, even if a newer block arrived
	fn schedule_pulse_clear(self: &Arc<Self>) {
		let state = Arc::clone(self);
		tokio::spawn(async move {
			tokio::time::sleep(state.pulse_duration).await;
			state.clear_pulse();
		});
	}

	fn clear_pulse(&self) {
		let cleared = self.view.send_if_modified(|view| {
			if !view.pulse {
				return false;
			}
			view.pulse = false;
			true
		});
		if cleared {
			CHAIN_PULSE_ACTIVE.set(0);
		}
	}
}

/// Keeps a fresh view of the chain head without blocking its caller
///
/// Per-cycle failures are never surfaced; observers see the last good snapshot until a
/// later cycle succeeds. Dropping the service stops its schedule.
pub struct ChainPulse<C: ChainQueryClient + 'static> {
	client: Arc<C>,
	state: Arc<PulseState>,
	schedule: Mutex<Option<JoinHandle<()>>>,
}

impl<C: ChainQueryClient + 'static> ChainPulse<C> {
	pub fn new(client: Arc<C>) -> Self {
		Self::with_pulse_duration(client, PULSE_DURATION)
	}

	/// Creates a service whose pulse stays raised for `pulse_duration`
	pub fn with_pulse_duration(client: Arc<C>, pulse_duration: Duration) -> Self {
		let (view, _) = watch::channel(PulseView::default());
		Self {
			client,
			state: Arc::new(PulseState {
				view,
				epoch: AtomicU64::new(0),
				running: AtomicBool::new(false),
				in_flight: Mutex::new(None),
				last_height: Mutex::new(None),
				pulse_duration,
			}),
			schedule: Mutex::new(None),
		}
	}

	fn lock_schedule(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
		lock(&self.schedule)
	}

	/// Polls immediately and then every `poll_interval`
	///
	/// Starting an already running service replaces its schedule. Must be called from
	/// within a tokio runtime.
	pub fn start(&self, poll_interval: Duration) {
		let poll_interval = poll_interval.max(Duration::from_millis(1));
		let mut schedule = self.lock_schedule();
		if let Some(previous) = schedule.take() {
			debug!("Replacing running poll schedule");
			previous.abort();
		}

		let epoch = self.state.advance_epoch(true);
		let client = Arc::clone(&self.client);
		let state = Arc::clone(&self.state);
		*schedule = Some(tokio::spawn(async move {
			let mut ticker = interval(poll_interval);
			ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
			loop {
				ticker.tick().await;
				let client = Arc::clone(&client);
				let state = Arc::clone(&state);
				tokio::spawn(async move {
					state.run_cycle(client.as_ref(), epoch).await;
				});
			}
		}));
		info!("Chain pulse started, polling every {:?}", poll_interval);
	}

	/// Cancels the schedule; a cycle already in flight finishes but is not published
	pub fn stop(&self) {
		let previous = self.lock_schedule().take();
		self.state.advance_epoch(false);
		if let Some(previous) = previous {
			previous.abort();
			info!("Chain pulse stopped");
		}
	}

	/// Runs one cycle now and reports whether it published a snapshot
	///
	/// Returns `false` without fetching when a scheduled cycle is already in flight.
	pub async fn poll_once(&self) -> bool {
		let epoch = self.state.epoch.load(Ordering::SeqCst);
		self.state.run_cycle(self.client.as_ref(), epoch).await
	}

	/// Receives the view after every publish and every pulse change
	pub fn subscribe(&self) -> watch::Receiver<PulseView> {
		self.state.view.subscribe()
	}

	pub fn view(&self) -> PulseView {
		self.state.view.borrow().clone()
	}

	pub fn snapshot(&self) -> Option<ChainSnapshot> {
		self.state.view.borrow().snapshot.clone()
	}

	pub fn is_pulsing(&self) -> bool {
		self.state.view.borrow().pulse
	}

	pub fn last_updated(&self) -> Option<chrono::DateTime<Utc>> {
		self.state.view.borrow().last_updated
	}

	/// False until the first cycle succeeds
	pub fn is_connected(&self) -> bool {
		self.state.view.borrow().is_connected()
	}

	pub fn is_running(&self) -> bool {
		self.state.running.load(Ordering::SeqCst)
	}
}

impl<C: ChainQueryClient + 'static> Drop for ChainPulse<C> {
	fn drop(&mut self) {
		self.stop();
	}
}
