use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use anyhow::Result;
use slog::o;
use slog::Drain;
use slog::FnValue;
use slog::IgnoreResult;
use slog::Level;
use slog::Logger;
use slog::OwnedKVList;
use slog::Record;
use slog_term::CompactFormat;
use slog_term::TermDecorator;

/// Append JSON records, one per line, to the file at `path`.
pub fn json_file(path: &Path, level: Level) -> Result<Logger> {
    let writer = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Unable to open log file at {}", path.display()))?;
    let drain = slog_json::Json::new(writer)
        .set_newlines(true)
        .set_flush(true)
        .add_default_keys()
        .build();
    Ok(root(drain, level))
}

/// Write compact, human readable records to standard error.
pub fn stderr(level: Level) -> Logger {
    let decorator = TermDecorator::new().stderr().build();
    let drain = CompactFormat::new(decorator).build();
    root(drain, level)
}

fn root<D>(drain: D, level: Level) -> Logger
where
    D: Drain + Send + 'static,
{
    let drain = Mutex::new(drain).map(IgnoreResult::new);
    let drain = MinLevel { drain, level };
    Logger::root(
        drain,
        o!("module" => FnValue(|record: &Record| record.module())),
    )
}

/// Drop records below `level`.
///
/// Unlike [`slog::LevelFilter`] the result of this drain is `()` so it can be the root drain.
#[derive(Debug, Clone)]
struct MinLevel<D: Drain> {
    drain: D,
    level: Level,
}

impl<D: Drain> Drain for MinLevel<D> {
    type Ok = ();
    type Err = D::Err;

    fn log(&self, record: &Record, values: &OwnedKVList) -> Result<(), D::Err> {
        if record.level().is_at_least(self.level) {
            self.drain.log(record, values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use slog::debug;
    use slog::warn;
    use slog::Level;

    #[test]
    fn json_file_filters_and_encodes() {
        let tmp = tempfile::tempdir().expect("temp dir to be created");
        let path = tmp.path().join("pulsarctl.log");
        let logger = super::json_file(&path, Level::Warning).expect("logger to be created");
        debug!(logger, "Hidden record");
        warn!(logger, "Config not found"; "path" => "/missing");
        drop(logger);

        let content = std::fs::read_to_string(&path).expect("log file to exist");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        let record: serde_json::Value =
            serde_json::from_str(lines[0]).expect("record to be JSON");
        assert_eq!(record["msg"], "Config not found");
        assert_eq!(record["path"], "/missing");
        assert_eq!(record["level"], "WARN");
    }
}
