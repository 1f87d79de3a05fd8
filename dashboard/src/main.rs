use {
	common::{
		consts::{GRACEFUL_CONSUMER_WAIT_SECS, GRACEFUL_TASKS_WAIT_SECS},
		ranking::TopMovers,
	},
	dashboard::{
		prediction::PredictionResponse,
		reporter::{get_shutdown_receiver, report_task, send_shutdown},
		sources::TickerItem,
		view_sort::WatchlistView,
	},
	std::sync::Arc,
	tracing::info,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let dashboard = Arc::new(dashboard::init::init_all().await?);

	tokio::spawn(report_task("ticker", dashboard.ticker.subscribe(), get_shutdown_receiver(), summarize_ticker));
	tokio::spawn(report_task("top_movers", dashboard.top_movers.subscribe(), get_shutdown_receiver(), summarize_movers));
	tokio::spawn(report_task("watchlist", dashboard.markets.subscribe(), get_shutdown_receiver(), |rows| {
		let view = WatchlistView::default();
		view.apply(rows).iter().map(|row| format!("{}={:.4}", row.symbol.to_uppercase(), row.price)).collect::<Vec<_>>().join(" ")
	}));
	tokio::spawn(report_task("prediction", dashboard.prediction.subscribe(), get_shutdown_receiver(), summarize_prediction));

	dashboard.activate_all();
	dashboard.prediction.fetch_now().await;
	info!("Dashboard started");

	let stopping = dashboard.clone();
	common::graceful::shutdown_signal_with_callback(
		move || {
			stopping.deactivate_all();
			send_shutdown();
		},
		GRACEFUL_CONSUMER_WAIT_SECS,
		GRACEFUL_TASKS_WAIT_SECS,
	)
	.await;

	info!("Dashboard stopped");
	Ok(())
}

fn summarize_ticker(items: &Vec<TickerItem>) -> String {
	items.iter().map(|item| format!("{} {:.4} ({:+.2}%)", item.symbol, item.price, item.change_pct)).collect::<Vec<_>>().join(" | ")
}

fn summarize_movers(movers: &TopMovers) -> String {
	let fmt = |rows: &[common::market_types::RankedRow]| rows.iter().map(|r| format!("{} {:+.2}%", r.symbol, r.change_pct)).collect::<Vec<_>>().join(", ");
	format!("gainers: [{}] losers: [{}]", fmt(&movers.gainers), fmt(&movers.losers))
}

fn summarize_prediction(prediction: &PredictionResponse) -> String {
	format!("{} actual={:.2} predicted={:.2} ({:?})", prediction.ticker, prediction.actual_value, prediction.prediction_value, prediction.trend())
}
