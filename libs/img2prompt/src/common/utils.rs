use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

pub fn init_logger_exe() {
    let name = std::env::current_exe()
        .ok()
        .and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    init_logger(name);
}

pub fn init_logger(name: impl Into<String>) {
    let env_filters = std::env::var(env_logger::DEFAULT_FILTER_ENV).ok();

    // try_init: the server and the tests may both reach this more than once
    let _ = logger_builder(name, env_filters.as_deref()).try_init();
}

/// Built-in levels first, `env_filters` (RUST_LOG syntax) last so it wins.
fn logger_builder(name: impl Into<String>, env_filters: Option<&str>) -> Builder {
    let crate_name = name.into().replace('-', "_");

    let mut builder = Builder::new();
    builder
        .filter(Some("img2prompt"), LevelFilter::Info)
        .filter(Some(&crate_name), LevelFilter::Trace);
    if let Some(filters) = env_filters {
        builder.parse_filters(filters);
    }

    builder.format(move |f, rec| {
        let now = humantime::format_rfc3339_millis(std::time::SystemTime::now());
        let module = rec.module_path().unwrap_or("<unknown>");
        let line = rec.line().unwrap_or(u32::MIN);
        let level = rec.level();

        writeln!(
            f,
            "[{} {} {} {}:{}] {}",
            level,
            crate_name,
            now,
            module,
            line,
            rec.args()
        )
    });
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Metadata};

    fn enabled(logger: &env_logger::Logger, target: &str, level: Level) -> bool {
        logger.enabled(&Metadata::builder().target(target).level(level).build())
    }

    #[test]
    fn library_defaults_to_info() {
        let logger = logger_builder("img2prompt-cli", None).build();
        assert!(enabled(&logger, "img2prompt::image2prompt", Level::Info));
        assert!(!enabled(&logger, "img2prompt::tensor", Level::Debug));
        assert!(enabled(&logger, "img2prompt_cli", Level::Trace));
    }

    #[test]
    fn env_directive_can_raise_library_level() {
        let logger = logger_builder("img2prompt-cli", Some("img2prompt=debug")).build();
        assert!(enabled(&logger, "img2prompt::tensor", Level::Debug));
    }

    #[test]
    fn env_directive_can_silence_library() {
        let logger = logger_builder("img2prompt-cli", Some("img2prompt=error")).build();
        assert!(!enabled(&logger, "img2prompt::image2prompt", Level::Info));
        assert!(enabled(&logger, "img2prompt::image2prompt", Level::Error));
    }
}
