//! Game event logger
//!
//! Messages go to stdout, to an in-memory buffer, or both. Capture keeps every
//! message regardless of verbosity so tests can inspect what happened even when
//! nothing is printed.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

/// How much the game prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// No output during the game
    Silent = 0,
    /// Only the outcome
    Minimal = 1,
    /// Turns, steps and actions
    #[default]
    Normal = 2,
    /// Everything, including combat math and rejected actions
    Verbose = 3,
}

impl FromStr for VerbosityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "0" | "silent" => Ok(VerbosityLevel::Silent),
            "1" | "minimal" => Ok(VerbosityLevel::Minimal),
            "2" | "normal" => Ok(VerbosityLevel::Normal),
            "3" | "verbose" => Ok(VerbosityLevel::Verbose),
            _ => Err(format!("invalid verbosity level: {s} (expected 0-3 or silent/minimal/normal/verbose)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMode {
    #[default]
    Stdout,
    Memory,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// e.g. "action", "combat", "outcome"
    pub category: Option<&'static str>,
}

pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    step_header_printed: bool,
    buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_mode: OutputMode::default(),
            step_header_printed: false,
            buffer: RefCell::new(Vec::new()),
        }
    }

    /// Logger that prints nothing and keeps nothing
    pub fn silent() -> Self {
        Self::with_verbosity(VerbosityLevel::Silent)
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    /// Capture to memory only
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.buffer.borrow().clone()
    }

    /// Captured messages, optionally only one category
    pub fn messages(&self, category: Option<&str>) -> Vec<String> {
        self.buffer
            .borrow()
            .iter()
            .filter(|e| category.is_none() || e.category == category)
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn clear_logs(&mut self) {
        self.buffer.borrow_mut().clear();
    }

    pub fn reset_step_header(&mut self) {
        self.step_header_printed = false;
    }

    /// Print the step header once, before the first message of a step
    pub fn step_header(&mut self, header: impl FnOnce() -> String) {
        if self.step_header_printed {
            return;
        }
        self.step_header_printed = true;
        if self.verbosity >= VerbosityLevel::Normal || self.is_capturing() {
            self.log(VerbosityLevel::Normal, Some("step"), &header());
        }
    }

    fn log(&self, level: VerbosityLevel, category: Option<&'static str>, message: &str) {
        if level == VerbosityLevel::Silent {
            return;
        }
        if self.is_capturing() {
            self.buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category,
            });
        }
        let printing = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);
        if printing && level <= self.verbosity {
            if level == VerbosityLevel::Minimal {
                println!("{message}");
            } else {
                println!("  {message}");
            }
        }
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, None, message);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, None, message);
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, None, message);
    }

    /// Log at `level` under a category
    pub fn event(&self, level: VerbosityLevel, category: &'static str, message: &str) {
        self.log(level, Some(category), message);
    }

    /// Skip formatting entirely when the message can go nowhere
    ///
    /// Without the `verbose-logging` feature, verbose messages are never built.
    pub fn wants(&self, level: VerbosityLevel) -> bool {
        if cfg!(not(feature = "verbose-logging")) && level == VerbosityLevel::Verbose {
            return false;
        }
        self.is_capturing() || level <= self.verbosity
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.buffer.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_keeps_all_levels() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Minimal);
        logger.enable_capture();

        logger.minimal("game over");
        logger.normal("Turn 1");
        logger.verbose("details");
        logger.event(VerbosityLevel::Normal, "combat", "2 damage");

        let logs = logger.logs();
        assert_eq!(logs.len(), 4);
        assert_eq!(logs[2].level, VerbosityLevel::Verbose);
        assert_eq!(logger.messages(Some("combat")), vec!["2 damage".to_string()]);

        logger.clear_logs();
        assert!(logger.logs().is_empty());
    }

    #[test]
    fn test_step_header_printed_once() {
        let mut logger = GameLogger::new();
        logger.enable_capture();
        logger.step_header(|| "== Turn 1, Main1 ==".to_string());
        logger.step_header(|| "== again ==".to_string());
        assert_eq!(logger.messages(Some("step")).len(), 1);

        logger.reset_step_header();
        logger.step_header(|| "== Turn 1, End ==".to_string());
        assert_eq!(logger.messages(Some("step")).len(), 2);
    }

    #[test]
    fn test_stdout_mode_does_not_capture() {
        let logger = GameLogger::silent();
        logger.minimal("nothing");
        assert!(logger.logs().is_empty());
        assert!(!logger.wants(VerbosityLevel::Minimal));
    }

    #[test]
    fn test_verbosity_parse() {
        assert_eq!("verbose".parse::<VerbosityLevel>().unwrap(), VerbosityLevel::Verbose);
        assert_eq!("1".parse::<VerbosityLevel>().unwrap(), VerbosityLevel::Minimal);
        assert!("loud".parse::<VerbosityLevel>().is_err());
        assert!(VerbosityLevel::Silent < VerbosityLevel::Normal);
    }
}
