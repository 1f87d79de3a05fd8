use {
	serde::{Deserialize, Serialize},
	std::{
		io,
		path::{Path, PathBuf},
	},
	tokio::sync::OnceCell,
	tracing::info,
	tracing_appender::{
		non_blocking::WorkerGuard,
		rolling::{RollingFileAppender, Rotation},
	},
	tracing_subscriber::{EnvFilter, fmt::MakeWriter},
};

// guard 必须活到进程结束，否则缓冲区里的日志不会落盘
static LOG_GUARD: OnceCell<Box<WorkerGuard>> = OnceCell::const_new();

/// Logging section shared by every service's toml config
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
	pub level: String,
	pub file: Option<String>,
	pub console: bool,
	pub rotation_max_files: usize,
}

/// Where log lines go. Console wins when both are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
	Console,
	File { path: PathBuf, max_files: usize },
}

impl LoggingConfig {
	pub fn target(&self) -> anyhow::Result<LogTarget> {
		match (self.console, self.file.as_deref()) {
			(true, _) => Ok(LogTarget::Console),
			(false, Some(file)) if !file.is_empty() => Ok(LogTarget::File { path: PathBuf::from(file), max_files: self.rotation_max_files }),
			_ => Err(anyhow::anyhow!("Logging file and console are both empty")),
		}
	}

	pub fn check(&self) -> anyhow::Result<()> {
		if self.level.is_empty() {
			return Err(anyhow::anyhow!("Logging level is empty"));
		}
		EnvFilter::try_new(&self.level).map_err(|e| anyhow::anyhow!("Invalid logging level {:?}: {}", self.level, e))?;
		self.target()?;
		Ok(())
	}
}

pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
	config.check()?;
	match config.target()? {
		LogTarget::Console => {
			install(&config.level, io::stdout)?;
			info!("Console logging system initialized");
		}
		LogTarget::File { path, max_files } => {
			let (non_blocking, guard) = tracing_appender::non_blocking(rolling_appender(&path, max_files)?);
			LOG_GUARD.set(Box::new(guard))?;
			install(&config.level, non_blocking)?;
			info!(path = %path.display(), "File logging system initialized");
		}
	}
	Ok(())
}

/// Daily rotation next to `path`, file names prefixed with its file name
pub fn rolling_appender(path: &Path, max_files: usize) -> anyhow::Result<RollingFileAppender> {
	let file_name = path.file_name().and_then(|name| name.to_str()).ok_or_else(|| anyhow::anyhow!("Invalid log file name: {}", path.display()))?;
	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	std::fs::create_dir_all(dir)?;
	Ok(RollingFileAppender::builder().rotation(Rotation::DAILY).max_log_files(max_files).filename_prefix(file_name).build(dir)?)
}

fn install<W>(level: &str, writer: W) -> anyhow::Result<()>
where
	W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_new(level)?)
		.with_writer(writer)
		.with_file(true)
		.with_target(true)
		.with_line_number(true)
		.with_ansi(false)
		.try_init()
		.map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))
}
