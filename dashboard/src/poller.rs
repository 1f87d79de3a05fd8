//! Generic polling consumer.
//!
//! A [`Poller`] fetches once on activation, then again on every interval tick,
//! and publishes `{result, loading, error}` through a watch channel. A failed
//! cycle keeps the last good result and only records the error message.
//!
//! Each instance runs at most one cycle at a time (`idle -> fetching -> idle`);
//! a cycle requested while another is in flight is dropped, not queued.

use {
	async_trait::async_trait,
	chrono::{DateTime, Utc},
	std::{
		sync::{Arc, Mutex, MutexGuard, PoisonError},
		time::Duration,
	},
	tokio::{
		sync::watch,
		task::JoinHandle,
		time::MissedTickBehavior,
	},
	tracing::{debug, info, warn},
};

/// Data behind one polling consumer
#[async_trait]
pub trait PollSource: Send + Sync + 'static {
	type Output: Clone + Send + Sync + 'static;

	fn name(&self) -> &str;

	async fn fetch(&self) -> anyhow::Result<Self::Output>;
}

#[derive(Debug, Clone)]
pub struct PollSnapshot<T> {
	pub result: Option<T>,
	pub loading: bool,
	pub error: Option<String>,
	pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for PollSnapshot<T> {
	fn default() -> Self {
		Self { result: None, loading: false, error: None, updated_at: None }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
	Idle,
	Fetching,
}

struct Control {
	active: bool,
	// activate/deactivate 都会加一，旧 timer 的周期拿着旧 epoch 直接被拒绝
	epoch: u64,
	in_flight: Option<InFlight>,
	next_cycle: u64,
	task: Option<JoinHandle<()>>,
}

#[derive(Clone, Copy)]
struct InFlight {
	cycle: u64,
	// timer 周期随 deactivate 一起作废；fetch_now 的周期不受激活状态影响
	timer: bool,
}

struct Shared<S: PollSource> {
	source: S,
	control: Mutex<Control>,
	state: watch::Sender<PollSnapshot<S::Output>>,
}

impl<S: PollSource> Shared<S> {
	fn control(&self) -> MutexGuard<'_, Control> {
		self.control.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

/// Marks the owning cycle as in flight; dropping it (normal end or abort) returns to idle
struct CycleGuard<'a, S: PollSource> {
	shared: &'a Shared<S>,
	cycle: u64,
}

impl<'a, S: PollSource> CycleGuard<'a, S> {
	/// `epoch` is set for timer-driven cycles, which must belong to the current activation
	fn begin(shared: &'a Shared<S>, epoch: Option<u64>) -> Option<Self> {
		let mut control = shared.control();
		if let Some(epoch) = epoch
			&& (!control.active || control.epoch != epoch)
		{
			return None;
		}
		if control.in_flight.is_some() {
			return None;
		}
		control.next_cycle += 1;
		let cycle = control.next_cycle;
		control.in_flight = Some(InFlight { cycle, timer: epoch.is_some() });
		Some(Self { shared, cycle })
	}

	fn still_current(&self, epoch: Option<u64>) -> bool {
		match epoch {
			Some(epoch) => {
				let control = self.shared.control();
				control.active && control.epoch == epoch
			}
			None => true,
		}
	}
}

impl<S: PollSource> Drop for CycleGuard<'_, S> {
	fn drop(&mut self) {
		let mut control = self.shared.control();
		if control.in_flight.map(|flight| flight.cycle) != Some(self.cycle) {
			return;
		}
		control.in_flight = None;
		drop(control);
		self.shared.state.send_if_modified(|snapshot| std::mem::replace(&mut snapshot.loading, false));
	}
}

pub struct Poller<S: PollSource> {
	shared: Arc<Shared<S>>,
	interval: Duration,
}

impl<S: PollSource> Poller<S> {
	pub fn new(source: S, interval: Duration) -> Self {
		let (state, _) = watch::channel(PollSnapshot::default());
		let control = Control { active: false, epoch: 0, in_flight: None, next_cycle: 0, task: None };
		Self { shared: Arc::new(Shared { source, control: Mutex::new(control), state }), interval }
	}

	pub fn source(&self) -> &S {
		&self.shared.source
	}

	pub fn interval(&self) -> Duration {
		self.interval
	}

	/// Starts polling: one cycle right away, then one per interval.
	/// Returns `false` (and does nothing) when already active.
	pub fn activate(&self) -> bool {
		let mut control = self.shared.control();
		if control.active {
			return false;
		}
		control.active = true;
		control.epoch += 1;

		let shared = self.shared.clone();
		let epoch = control.epoch;
		let interval = self.interval;
		control.task = Some(tokio::spawn(async move { run_loop(shared, epoch, interval).await }));

		info!(source = self.shared.source.name(), interval_ms = interval.as_millis() as u64, "poller activated");
		true
	}

	/// Stops polling. Once this returns no timer-driven cycle can start,
	/// including a tick that was already scheduled, and a timer cycle still
	/// fetching no longer counts as in flight. Safe to call repeatedly.
	pub fn deactivate(&self) {
		let (task, released) = {
			let mut control = self.shared.control();
			if !control.active && control.task.is_none() {
				return;
			}
			control.active = false;
			control.epoch += 1;
			// abort 是异步生效的，不能等旧周期的 guard 自己放手，否则紧接着的 activate 会被当成重叠丢掉
			let released = control.in_flight.take_if(|flight| flight.timer).is_some();
			(control.task.take(), released)
		};
		if let Some(task) = task {
			task.abort();
		}
		if released {
			self.shared.state.send_if_modified(|snapshot| std::mem::replace(&mut snapshot.loading, false));
		}
		info!(source = self.shared.source.name(), "poller deactivated");
	}

	pub fn is_active(&self) -> bool {
		self.shared.control().active
	}

	pub fn phase(&self) -> CyclePhase {
		match self.shared.control().in_flight {
			Some(_) => CyclePhase::Fetching,
			None => CyclePhase::Idle,
		}
	}

	/// Runs one cycle now, independent of activation.
	/// Returns `false` when dropped because another cycle is in flight.
	pub async fn fetch_now(&self) -> bool {
		run_cycle(&self.shared, None).await
	}

	pub fn snapshot(&self) -> PollSnapshot<S::Output> {
		self.shared.state.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<PollSnapshot<S::Output>> {
		self.shared.state.subscribe()
	}
}

impl<S: PollSource> Drop for Poller<S> {
	fn drop(&mut self) {
		self.deactivate();
	}
}

async fn run_loop<S: PollSource>(shared: Arc<Shared<S>>, epoch: u64, period: Duration) {
	let mut ticker = tokio::time::interval(period);
	// 错过的 tick 直接跳过，不补发
	ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

	loop {
		// 第一次 tick 立即完成
		ticker.tick().await;
		run_cycle(&shared, Some(epoch)).await;
	}
}

async fn run_cycle<S: PollSource>(shared: &Shared<S>, epoch: Option<u64>) -> bool {
	let Some(guard) = CycleGuard::begin(shared, epoch) else {
		debug!(source = shared.source.name(), "cycle dropped");
		return false;
	};

	shared.state.send_modify(|snapshot| {
		snapshot.loading = true;
		snapshot.error = None;
	});

	let outcome = shared.source.fetch().await;

	if !guard.still_current(epoch) {
		debug!(source = shared.source.name(), "discarding result of a deactivated cycle");
		return true;
	}

	match outcome {
		Ok(result) => shared.state.send_modify(|snapshot| {
			snapshot.result = Some(result);
			snapshot.error = None;
			snapshot.loading = false;
			snapshot.updated_at = Some(Utc::now());
		}),
		Err(e) => {
			warn!(source = shared.source.name(), error = %e, "poll cycle failed, keeping last result");
			shared.state.send_modify(|snapshot| {
				snapshot.error = Some(e.to_string());
				snapshot.loading = false;
			});
		}
	}
	true
}
