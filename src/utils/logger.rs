//! 日志模块：env_logger 控制台输出 + 流水线进度的行输出接口
use env_logger::fmt::Formatter;
use env_logger::{Builder, Target, WriteStyle};
use log::{Level, LevelFilter, Record};
use std::io::Write;
use std::sync::Once;

// ==================== 配置常量 ====================
const LOG_LEVEL: &str = "LOG_LEVEL";
const DEFAULT_LOG_LEVEL: &str = "INFO";

static INIT_LOGGER: Once = Once::new();

// ==================== 初始化日志系统 ====================
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        let log_level = std::env::var(LOG_LEVEL)
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_uppercase();

        let level_filter = parse_level(&log_level).unwrap_or_else(|| {
            eprintln!("⚠️ 无效日志级别「{}」，使用默认 INFO", log_level);
            LevelFilter::Info
        });

        let mut builder = Builder::from_default_env();
        builder
            .filter(None, level_filter)
            .filter(Some("ethers_providers"), LevelFilter::Warn)
            .filter(Some("ethers_signers"), LevelFilter::Warn)
            .write_style(WriteStyle::Auto)
            .format(|f: &mut Formatter, record: &Record| {
                let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S.%3f");
                let level_color = match record.level() {
                    Level::Error => "\x1b[91m",
                    Level::Warn => "\x1b[93m",
                    Level::Info => "\x1b[92m",
                    Level::Debug => "\x1b[96m",
                    Level::Trace => "\x1b[95m",
                };
                let reset = "\x1b[0m";

                writeln!(
                    f,
                    "[{}] [{}{:>5}{}] [{}] - {}",
                    now,
                    level_color,
                    record.level(),
                    reset,
                    record.module_path().unwrap_or("unknown"),
                    record.args()
                )
            })
            // stdout 留给命令输出（JSON 结果）
            .target(Target::Stderr);

        if let Err(e) = builder.try_init() {
            eprintln!("❌ 日志初始化失败: {}", e);
        }
    });
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    match level {
        "TRACE" => Some(LevelFilter::Trace),
        "DEBUG" => Some(LevelFilter::Debug),
        "INFO" => Some(LevelFilter::Info),
        "WARN" => Some(LevelFilter::Warn),
        "ERROR" => Some(LevelFilter::Error),
        "OFF" => Some(LevelFilter::Off),
        _ => None,
    }
}

// ==================== 流水线进度输出 ====================

/// 记录一行进度（nonce、gas、广播哈希、回执状态）。流水线只依赖这个接口
pub trait LineSink: Send + Sync {
    fn record(&self, line: &str);
}

/// 转发到 log 门面
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl LineSink for LogSink {
    fn record(&self, line: &str) {
        log::info!(target: "eth_tx_client::pipeline", "{}", line);
    }
}

impl<F> LineSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn record(&self, line: &str) {
        self(line)
    }
}

// ==================== 便捷日志宏 ====================
#[macro_export]
macro_rules! log_trace { ($($arg:tt)*) => { log::trace!($($arg)*) }; }
#[macro_export]
macro_rules! log_debug { ($($arg:tt)*) => { log::debug!($($arg)*) }; }
#[macro_export]
macro_rules! log_info  { ($($arg:tt)*) => { log::info!($($arg)*) }; }
#[macro_export]
macro_rules! log_warn  { ($($arg:tt)*) => { log::warn!($($arg)*) }; }
#[macro_export]
macro_rules! log_error { ($($arg:tt)*) => { log::error!($($arg)*) }; }
