use crate::settings::EditorSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initialise logging. Debug logging uses the `debug` level and honours
/// `RUST_LOG`; otherwise the level is forced to `info`.
///
/// When `file` is given, output goes to that file instead of stderr. Calling
/// this more than once is harmless: only the first subscriber is installed.
pub fn init(debug: bool, file: Option<PathBuf>) {
    let filter = filter_for(debug);

    let Some(path) = file else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        return;
    };

    let dir = path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let Some(file_name) = path.file_name() else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        return;
    };
    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("failed to create log directory {}: {err}", dir.display());
    }

    let appender = tracing_appender::rolling::never(dir, file_name);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(appender)
        .try_init();
}

/// Initialise logging at the level chosen by `settings.debug_logging`.
pub fn init_from_settings(settings: &EditorSettings, file: Option<PathBuf>) {
    init(settings.debug_logging, file);
}

fn filter_for(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        // Ignore RUST_LOG so a stray variable cannot turn on verbose output.
        EnvFilter::new("info")
    }
}

#[cfg(test)]
mod tests {
    use super::filter_for;

    #[test]
    fn release_filter_is_info() {
        assert_eq!(filter_for(false).to_string(), "info");
    }
}
