use {std::net::SocketAddr, tracing::info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let state = api::init::init_all().await?;

	let config = api::config::get_config();
	let addr = config.server.get_addr();
	let listener = tokio::net::TcpListener::bind(&addr).await?;
	info!("🚀 Markets proxy is running at {}", listener.local_addr()?);

	let app = api::server::app(state);

	axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).with_graceful_shutdown(common::graceful::wait_for_signal()).await?;

	info!("Markets proxy stopped");
	Ok(())
}
