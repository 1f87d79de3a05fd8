use {
	crate::consts::{COMMON_ENV_PATH, DEFAULT_PREDICTION_API_BASE, DEFAULT_UPSTREAM_MARKETS_URL},
	config::{Config, Environment},
	serde::{Deserialize, Serialize},
	tokio::sync::OnceCell,
};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommonEnv {
	pub run_mode: String,
	// 上游行情接口（完整 URL）
	pub upstream_markets_url: String,
	// 预测服务 base URL
	pub prediction_api_base: String,
}

pub static COMMON_ENV: OnceCell<CommonEnv> = OnceCell::const_new();

pub fn load_common_env() -> anyhow::Result<()> {
	// common.env 不存在时直接使用进程环境变量和默认值
	if let Err(e) = dotenvy::from_path(COMMON_ENV_PATH) {
		println!("Skip loading {}: {}", COMMON_ENV_PATH, e);
	}

	let common_env = build_common_env()?;
	println!("Common env configuration: {:?}", common_env);
	COMMON_ENV.set(common_env)?;
	check_common_env(get_common_env())?;
	Ok(())
}

/// 从环境变量构造，未设置的字段取默认值
pub fn build_common_env() -> anyhow::Result<CommonEnv> {
	let config = Config::builder()
		.set_default("run_mode", crate::consts::RUN_MODE_DEV)?
		.set_default("upstream_markets_url", DEFAULT_UPSTREAM_MARKETS_URL)?
		.set_default("prediction_api_base", DEFAULT_PREDICTION_API_BASE)?
		.add_source(Environment::default())
		.build()?;
	Ok(config.try_deserialize()?)
}

pub fn check_common_env(common_env: &CommonEnv) -> anyhow::Result<()> {
	crate::consts::validate_run_mode(&common_env.run_mode)?;

	if common_env.upstream_markets_url.is_empty() {
		return Err(anyhow::anyhow!("Upstream markets url is empty"));
	}
	if common_env.prediction_api_base.is_empty() {
		return Err(anyhow::anyhow!("Prediction api base is empty"));
	}
	url::Url::parse(&common_env.upstream_markets_url)?;
	url::Url::parse(&common_env.prediction_api_base)?;

	Ok(())
}

pub fn get_common_env() -> &'static CommonEnv {
	COMMON_ENV.get().expect("Common env not loaded")
}
