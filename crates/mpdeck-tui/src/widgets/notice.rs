//! Transient messages shown in place of the status text line.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::style::{Modifier, Style};

use crate::theme::{BRICK, SKY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    expires: Instant,
}

impl Notice {
    pub fn line(&self) -> String {
        let icon = match self.severity {
            Severity::Info => "·",
            Severity::Error => "✗",
        };
        format!("{} {}", icon, self.message)
    }

    pub fn style(&self) -> Style {
        let color = match self.severity {
            Severity::Info => SKY,
            Severity::Error => BRICK,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

pub struct Notices {
    queue: VecDeque<Notice>,
    max_kept: usize,
}

impl Notices {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            max_kept: 4,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, duration: Duration) {
        // Remove duplicates (same message)
        let msg = message.into();
        self.queue.retain(|n| n.message != msg);
        self.queue.push_back(Notice {
            message: msg,
            severity,
            expires: Instant::now() + duration,
        });
        while self.queue.len() > self.max_kept {
            self.queue.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info, Duration::from_secs(3));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error, Duration::from_secs(5));
    }

    /// Drop expired notices. Returns whether anything went away.
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        let before = self.queue.len();
        self.queue.retain(|n| n.expires > now);
        self.queue.len() != before
    }

    /// The newest live notice.
    pub fn latest(&self) -> Option<&Notice> {
        self.queue.back()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_wins_and_duplicates_collapse() {
        let mut notices = Notices::new();
        notices.info("queued");
        notices.error("connection lost");
        notices.info("queued");
        assert_eq!(notices.latest().map(|n| n.message.as_str()), Some("queued"));
        assert_eq!(notices.queue.len(), 2);
    }

    #[test]
    fn expired_notices_are_dropped() {
        let mut notices = Notices::new();
        notices.push("gone", Severity::Error, Duration::ZERO);
        assert!(notices.tick());
        assert!(notices.is_empty());
        assert!(!notices.tick());
    }

    #[test]
    fn caps_backlog() {
        let mut notices = Notices::new();
        for i in 0..10 {
            notices.info(format!("n{i}"));
        }
        assert_eq!(notices.queue.len(), 4);
        assert_eq!(notices.latest().map(Notice::line), Some("· n9".to_string()));
    }
}
