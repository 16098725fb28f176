use std::time::Instant;

use log::{Level, LevelFilter};

use crate::connection::{LogSettings, StateChange};

/// Times one command execution and logs it on success.
///
/// Nothing is logged unless [`finish`](Self::finish) is called, so a failed
/// execution leaves no statement record.
pub(crate) struct QueryLogger {
    sql: String,
    operation: &'static str,
    rows_affected: u64,
    start: Instant,
    settings: LogSettings,
}

impl QueryLogger {
    pub(crate) fn new(sql: String, operation: &'static str, settings: LogSettings) -> Self {
        Self {
            sql,
            operation,
            rows_affected: 0,
            start: Instant::now(),
            settings,
        }
    }

    /// Returns `true` if a statement could be logged at either configured level.
    pub(crate) fn enabled(settings: &LogSettings) -> bool {
        enabled(settings.statements_level, "dbshim::query").is_some()
            || enabled(settings.slow_statements_level, "dbshim::query").is_some()
    }

    pub(crate) fn increase_rows_affected(&mut self, n: u64) {
        self.rows_affected += n;
    }

    pub(crate) fn finish(self) {
        let elapsed = self.start.elapsed();

        let lvl = if elapsed >= self.settings.slow_statements_duration {
            self.settings.slow_statements_level
        } else {
            self.settings.statements_level
        };

        if let Some(lvl) = enabled(lvl, "dbshim::query") {
            let summary = summarize(&self.sql);

            log::logger().log(
                &log::Record::builder()
                    .args(format_args!(
                        "{}; {}: rows affected: {}, elapsed: {:.3?}\n\n{}\n",
                        summary, self.operation, self.rows_affected, elapsed, self.sql
                    ))
                    .level(lvl)
                    .module_path_static(Some("dbshim::query"))
                    .target("dbshim::query")
                    .build(),
            );
        }
    }
}

pub(crate) fn log_state_change(change: &StateChange, settings: &LogSettings) {
    if let Some(lvl) = enabled(settings.state_changes_level, "dbshim::connection") {
        log::log!(
            target: "dbshim::connection",
            lvl,
            "connection state changed from {} to {}",
            change.original,
            change.current
        );
    }
}

fn enabled(filter: LevelFilter, target: &str) -> Option<Level> {
    filter
        .to_level()
        .filter(|lvl| log::log_enabled!(target: target, *lvl))
}

fn summarize(sql: &str) -> String {
    let mut words = sql.split_whitespace().take(4).collect::<Vec<_>>().join(" ");
    if sql.split_whitespace().count() > 4 {
        words.push_str(" …");
    }
    words
}
