use std::sync::Once;

use log::LevelFilter;

use crate::client::LogLevel;

static INIT_LOG: Once = Once::new();

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

pub fn init_log(level: LogLevel) {
    INIT_LOG.call_once(|| {
        platform::init_log(level);
    });
}

pub fn set_log_level(level: LogLevel) {
    log::set_max_level(level.into())
}

#[cfg_attr(all(target_vendor = "apple", not(test)), allow(dead_code))]
fn render(record: &log::Record<'_>) -> String {
    if record.level() == log::Level::Error {
        format!(
            "[{}] {} {}:{} - {}",
            record.level(),
            record.target(),
            record.file().unwrap_or("unknown"),
            record
                .line()
                .map(|line| line.to_string())
                .as_deref()
                .unwrap_or("unknown"),
            record.args()
        )
    } else {
        format!("[{}] {} - {}", record.level(), record.target(), record.args())
    }
}

#[cfg(all(target_os = "android", not(test)))]
mod platform {
    use super::*;

    pub fn init_log(level: LogLevel) {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(level.into())
                .with_tag("DormConsole")
                .format(|f, record| writeln!(f, "{}", render(record))),
        );
    }
}

#[cfg(all(target_vendor = "apple", not(test)))]
mod platform {
    use super::*;

    pub fn init_log(level: LogLevel) {
        if let Err(e) = oslog::OsLogger::new("com.dormconsole.core")
            .level_filter(level.into())
            // cookie jar internals are chatty at debug
            .category_level_filter("cookie_store", LevelFilter::Warn)
            .init()
        {
            eprintln!("{e}");
        }
    }
}

#[cfg(any(test, not(any(target_os = "android", target_vendor = "apple"))))]
mod platform {
    use std::io::Write;

    use env_logger::{Builder, Env};

    use super::*;

    pub fn init_log(level: LogLevel) {
        let env = Env::default();
        let mut builder = Builder::from_env(env);
        let _ = builder
            .is_test(cfg!(test))
            .format(|formatter, record| writeln!(formatter, "{}", render(record)))
            .filter(None, level.into())
            .filter(Some("cookie_store"), LevelFilter::Warn)
            .filter(Some("reqwest"), LevelFilter::Warn)
            .try_init();
    }
}
