use {tokio::signal, tracing::info};

/// 等待 SIGINT / SIGTERM
pub async fn wait_for_signal() {
	#[cfg(unix)]
	{
		use tokio::signal::unix::{SignalKind, signal};
		let mut sigterm = match signal(SignalKind::terminate()) {
			Ok(sigterm) => sigterm,
			Err(e) => {
				info!("Failed to create SIGTERM signal handler: {}", e);
				let _ = signal::ctrl_c().await;
				info!("Received SIGINT, starting graceful shutdown...");
				return;
			}
		};
		tokio::select! {
			_ = signal::ctrl_c() => {
				info!("Received SIGINT, starting graceful shutdown...");
			}
			_ = sigterm.recv() => {
				info!("Received SIGTERM, starting graceful shutdown...");
			}
		}
	}
	#[cfg(not(unix))]
	{
		let _ = signal::ctrl_c().await;
		info!("Received SIGINT, starting graceful shutdown...");
	}
}

/// 收到信号后执行回调，再给后台任务留出收尾时间
///
/// ```rust,ignore
/// common::graceful::shutdown_signal_with_callback(
///     crate::init::send_shutdown,
///     GRACEFUL_CONSUMER_WAIT_SECS,
///     GRACEFUL_TASKS_WAIT_SECS,
/// ).await;
/// ```
pub async fn shutdown_signal_with_callback<F>(shutdown_callback: F, consumer_wait_secs: u64, tasks_wait_secs: u64)
where
	F: FnOnce(),
{
	wait_for_signal().await;

	info!("Step 1: Sending shutdown signal...");
	shutdown_callback();

	info!("Step 2: Waiting for pending polling cycles to settle (max {}s)...", consumer_wait_secs);
	tokio::time::sleep(tokio::time::Duration::from_secs(consumer_wait_secs)).await;

	info!("Step 3: Waiting for remaining tasks (max {}s)...", tasks_wait_secs);
	tokio::time::sleep(tokio::time::Duration::from_secs(tasks_wait_secs)).await;

	info!("Graceful shutdown completed");
}
