use std::fs::OpenOptions;
use std::path::Path;

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

use phup_platform::AppPaths;

const MAX_LOG_SIZE: u64 = 512 * 1024;

fn trim_log_file_if_oversized(log_path: &Path, max_log_size: u64) {
    if let Ok(metadata) = std::fs::metadata(log_path)
        && metadata.len() > max_log_size
        && let Ok(contents) = std::fs::read(log_path)
    {
        let half = contents.len() / 2;
        let keep_from = contents[half..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(half, |pos| half + pos + 1);
        let _ = std::fs::write(log_path, &contents[keep_from..]);
    }
}

/// Terminal logging at warn level (debug with `--debug`) plus a full debug
/// log under the data dir. Logging failures are swallowed; the tool works
/// without a log file.
pub fn init(debug_enabled: bool) {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("phup")
        .build();

    let term_level = if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Ok(paths) = AppPaths::new()
        && paths.ensure_dirs().is_ok()
    {
        let log_path = paths.log_file();
        trim_log_file_if_oversized(&log_path, MAX_LOG_SIZE);
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
            loggers.push(WriteLogger::new(LevelFilter::Debug, config, file));
        }
    }

    let _ = CombinedLogger::init(loggers);
}
