//! Encoder progress parsing and rendering
//!
//! ffmpeg is started with `-progress pipe:1 -nostats`, which makes it write
//! `key=value` lines to stdout. Position ticks are turned into a percentage
//! of the input duration and shown on an `indicatif` bar.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// A progress update derived from one line of encoder output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressEvent {
    /// Completion in percent, 0 to 100
    Percent(f64),
    /// The encoder reported the end of the stream
    Done,
}

/// Stateless translator from `-progress` lines to [`ProgressEvent`]s
#[derive(Debug, Clone, Copy)]
pub struct ProgressParser {
    duration_us: Option<f64>,
}

impl ProgressParser {
    /// Without a positive duration only the end marker is reported
    pub fn new(duration_seconds: Option<f64>) -> Self {
        Self {
            duration_us: duration_seconds
                .filter(|d| *d > 0.0)
                .map(|d| d * 1_000_000.0),
        }
    }

    pub fn parse_line(&self, line: &str) -> Option<ProgressEvent> {
        let (key, value) = line.trim().split_once('=')?;

        match key {
            // ffmpeg reports both in microseconds
            "out_time_us" | "out_time_ms" => {
                let total = self.duration_us?;
                let position: f64 = value.trim().parse().ok()?;
                Some(ProgressEvent::Percent((position / total * 100.0).clamp(0.0, 100.0)))
            }
            "progress" if value.trim() == "end" => Some(ProgressEvent::Done),
            _ => None,
        }
    }
}

/// Transient percentage bar for one encoder pass
pub struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    pub fn new(title: &str) -> Self {
        let bar = ProgressBar::new(100);
        if let Ok(style) =
            ProgressStyle::with_template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}%")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(title.to_string());
        bar.enable_steady_tick(Duration::from_millis(250));
        Self { bar }
    }

    /// A display that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn apply(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Percent(percent) => self.bar.set_position(percent.floor() as u64),
            ProgressEvent::Done => self.bar.set_position(100),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
