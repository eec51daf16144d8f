use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging based on output mode and debug flag
///
/// With a `log_dir`, records are also appended to `newsletter_YYYYMMDD.log`
/// in that directory.
pub fn init_logging(debug: bool, quiet: bool, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = if debug {
        EnvFilter::new("rising_stars=debug")
    } else if quiet {
        EnvFilter::new("rising_stars=error")
    } else {
        EnvFilter::new("rising_stars=info")
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(debug)
        .with_file(debug)
        .with_writer(std::io::stderr);

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(log_file_stem(chrono::Local::now().date_naive()))
            .filename_suffix("log")
            .build(dir)?;

        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_writer(appender)
            .with_target(true)
            .with_line_number(true)
            .with_file(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }

    Ok(())
}

/// Log file name without extension for a given day
fn log_file_stem(day: chrono::NaiveDate) -> String {
    format!("newsletter_{}", day.format("%Y%m%d"))
}
