/// Log sink for browser hosts.
///
/// The crate logs through the `log` facade. Native hosts install whatever
/// logger they already use; in the browser `install` routes records to the
/// developer console.

use log::{Level, LevelFilter};

/// Default level when none (or an unknown one) is requested.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// Parse a level name such as `"debug"`, falling back to `DEFAULT_LEVEL`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(DEFAULT_LEVEL)
}

/// One console line per record.
pub fn format_record(level: Level, target: &str, message: &str) -> String {
    format!("[{level} {target}] {message}")
}

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, Log, Metadata, Record};
    use wasm_bindgen::JsValue;
    use web_sys::console;

    pub struct ConsoleLogger;

    pub static LOGGER: ConsoleLogger = ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = super::format_record(record.level(), record.target(), &record.args().to_string());
            let value = JsValue::from_str(&line);
            match record.level() {
                Level::Error => console::error_1(&value),
                Level::Warn => console::warn_1(&value),
                Level::Info => console::info_1(&value),
                Level::Debug => console::debug_1(&value),
                Level::Trace => console::log_1(&value),
            }
        }

        fn flush(&self) {}
    }
}

/// Route `log` records to the browser console. Safe to call repeatedly;
/// only the level changes after the first call.
///
/// Returns false on native targets, where nothing is installed.
pub fn install(level: LevelFilter) -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        // A second set_logger fails harmlessly
        let _ = log::set_logger(&console::LOGGER);
        log::set_max_level(level);
        true
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = level;
        false
    }
}
