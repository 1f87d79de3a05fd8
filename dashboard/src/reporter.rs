use {
	crate::poller::PollSnapshot,
	tokio::sync::{OnceCell, broadcast, watch},
	tracing::{info, warn},
};

static SHUTDOWN: OnceCell<broadcast::Sender<()>> = OnceCell::const_new();

pub fn init_shutdown() {
	let (tx, _) = broadcast::channel(1);
	let _ = SHUTDOWN.set(tx);
}

fn get_shutdown() -> &'static broadcast::Sender<()> {
	SHUTDOWN.get().expect("SHUTDOWN not initialized")
}

pub fn get_shutdown_receiver() -> broadcast::Receiver<()> {
	get_shutdown().subscribe()
}

pub fn send_shutdown() {
	let _ = get_shutdown().send(());
}

/// Logs every state change of one consumer until shutdown.
/// Rendering is out of scope; this is the dashboard's only output.
pub async fn report_task<T, F>(name: &'static str, mut receiver: watch::Receiver<PollSnapshot<T>>, mut shutdown_receiver: broadcast::Receiver<()>, summarize: F)
where
	T: Clone + Send + Sync + 'static,
	F: Fn(&T) -> String + Send + 'static,
{
	loop {
		tokio::select! {
			changed = receiver.changed() => {
				if changed.is_err() {
					// poller 已经释放
					break;
				}
				let snapshot = receiver.borrow_and_update().clone();
				if snapshot.loading {
					continue;
				}
				let summary = snapshot.result.as_ref().map(&summarize).unwrap_or_else(|| "no data yet".to_string());
				match &snapshot.error {
					Some(error) => warn!("[{}] {} (last update failed: {})", name, summary, error),
					None => info!("[{}] {}", name, summary),
				}
			}
			_ = shutdown_receiver.recv() => {
				info!("[{}] reporter received shutdown signal", name);
				break;
			}
		}
	}
}
