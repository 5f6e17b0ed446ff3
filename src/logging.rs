use owo_colors::OwoColorize;
use std::fs::OpenOptions;
use tracing_appender::non_blocking;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Try to enable ANSI escape sequence support on Windows consoles.
#[cfg(windows)]
pub fn try_enable_ansi_on_windows() -> bool {
    enable_ansi_support::enable_ansi_support().is_ok()
}

#[cfg(not(windows))]
pub fn try_enable_ansi_on_windows() -> bool {
    false
}

/// 初始化 tracing：一个文件 sink（`log/deploy_YYYYMMDD_HHMMSS.log`，flush-after-write）。
/// 控制台输出由 `status` 模块里的彩色状态行单独处理，不经过 tracing 的 fmt layer，
/// 这样过滤（RUST_LOG / --verbose）只影响文件日志，不影响用户看到的进度行。
pub fn init(log_dir: &std::path::Path, verbose: bool) -> anyhow::Result<std::path::PathBuf> {
    std::fs::create_dir_all(log_dir)?;
    let now = chrono::Local::now();
    let log_path = log_dir.join(format!("deploy_{}.log", now.format("%Y%m%d_%H%M%S")));
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;
    let (non_blocking_writer, guard) = non_blocking(file);
    // 泄漏 guard 以保持后台写线程在进程生命周期内存活。
    let _ = Box::leak(Box::new(guard));
    let level = if verbose { "debug" } else { "info" };
    let file_layer =
        fmt::layer().with_writer(non_blocking_writer).with_ansi(false).with_filter(EnvFilter::new(level));
    tracing_subscriber::registry().with(file_layer).init();
    let _ = try_enable_ansi_on_windows();
    Ok(log_path)
}

/// 单条状态行的严重级别，对应 §7 中的状态图标。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Success,
    Failed,
    Warning,
    Info,
}

impl Status {
    fn icon(self) -> &'static str {
        match self {
            Status::Running => "▶ RUNNING",
            Status::Success => "✓ SUCCESS",
            Status::Failed => "✗ FAILED",
            Status::Warning => "⚠ WARNING",
            Status::Info => ">> INFO",
        }
    }
}

/// 打印一条带时间戳、图标、可选主机标签的状态行；console 与文件日志共用一条消息。
/// `tracing-appender` 的非阻塞写入器已经串行化了文件写入，这里的控制台打印只需自身有序即可。
pub fn status_line(status: Status, host: Option<&str>, message: &str) {
    let ts = chrono::Local::now().format("%H:%M:%S");
    let tag = host.map(|h| format!("[{}] ", h)).unwrap_or_default();
    let line = format!("{} {} {}{}", ts, status.icon(), tag, message);
    let colored = match status {
        Status::Running => line.cyan().to_string(),
        Status::Success => line.green().to_string(),
        Status::Failed => line.red().to_string(),
        Status::Warning => line.yellow().to_string(),
        Status::Info => line.to_string(),
    };
    match status {
        Status::Failed | Status::Warning => eprintln!("{}", colored),
        _ => println!("{}", colored),
    }
    match status {
        Status::Failed => tracing::error!(host, "{}", message),
        Status::Warning => tracing::warn!(host, "{}", message),
        _ => tracing::info!(host, "{}", message),
    }
}
