//! User-visible activity log
//!
//! This is what the browser's log pane shows: scan submissions, refresh
//! results, load failures and live scan progress. Each line is mirrored to
//! `tracing` so it also lands in the diagnostic log outside the TUI.

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use tracing::{info, warn};

/// Maximum number of lines kept in memory
pub const MAX_LINES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub at: DateTime<Local>,
    pub level: LogLevel,
    pub text: String,
}

impl LogLine {
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self {
            at: Local::now(),
            level,
            text: text.into(),
        }
    }

    /// `[HH:MM:SS] text`
    pub fn render(&self) -> String {
        format!("[{}] {}", self.at.format("%H:%M:%S"), self.text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    lines: VecDeque<LogLine>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: LogLine) {
        match line.level {
            LogLevel::Warn | LogLevel::Error => warn!("{}", line.text),
            LogLevel::Info | LogLevel::Ok => info!("{}", line.text),
        }
        if self.lines.len() == MAX_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(LogLine::new(LogLevel::Info, text));
    }

    pub fn ok(&mut self, text: impl Into<String>) {
        self.push(LogLine::new(LogLevel::Ok, text));
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(LogLine::new(LogLevel::Warn, text));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(LogLine::new(LogLevel::Error, text));
    }

    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &LogLine> + ExactSizeIterator {
        self.lines.iter()
    }

    pub fn last(&self) -> Option<&LogLine> {
        self.lines.back()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_bounded() {
        let mut log = ActivityLog::new();
        for i in 0..MAX_LINES + 10 {
            log.info(format!("line {}", i));
        }
        assert_eq!(log.len(), MAX_LINES);
        assert_eq!(log.lines().next().map(|l| l.text.as_str()), Some("line 10"));
    }

    #[test]
    fn test_render_prefixes_time() {
        let line = LogLine::new(LogLevel::Ok, "Scan submitted");
        let rendered = line.render();
        assert!(rendered.starts_with('['));
        assert!(rendered.ends_with("] Scan submitted"));
    }
}
