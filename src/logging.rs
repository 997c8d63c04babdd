use std::{fs::File, path::Path};

use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

use crate::CliError;

pub fn level(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

pub fn setup_logging(
    verbosity: u8,
    quiet: bool,
    log_file: Option<&Path>,
) -> Result<(), CliError> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(level(verbosity, quiet))
        .with(stderr_layer);

    if let Some(path) = log_file {
        let file = File::create(path)?;
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true);
        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level(0, false), LevelFilter::WARN);
        assert_eq!(level(1, false), LevelFilter::INFO);
        assert_eq!(level(2, false), LevelFilter::DEBUG);
        assert_eq!(level(7, false), LevelFilter::TRACE);
        assert_eq!(level(3, true), LevelFilter::OFF);
    }

    #[test]
    fn file_layer_receives_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chemengine.log");
        let file = File::create(&path).unwrap();
        let subscriber = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_ansi(false));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("descriptor failed");
        });
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("WARN"));
        assert!(content.contains("descriptor failed"));
    }

    #[test]
    fn bad_log_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = setup_logging(0, false, Some(dir.path())).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
