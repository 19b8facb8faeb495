//! # Progress and status reporting
//!
//! Operations in this crate run to completion synchronously; callers that
//! drive a UI inject a [`ProgressObserver`] to receive discrete percentage
//! ticks and advisory status text. Both channels are purely observational:
//! dropping every notification does not affect correctness.
//!
//! Streaming stages tick every [`crate::constants::PROGRESS_STRIDE`] records;
//! batch stages tick at fixed milestones (0/50/60/100).
//!
//! A console implementation backed by `indicatif` is available behind the
//! `progress` cargo feature.

/// Observer for progress ticks and status text emitted by long operations.
///
/// Callbacks are invoked synchronously on the calling thread, in order.
/// Percentages are monotonically non-decreasing within one operation and end
/// with a final `100` on success.
pub trait ProgressObserver {
    /// Called with the current completion percentage, in `0..=100`.
    fn progress(&mut self, percent: u32);

    /// Called with a short human-readable description of the current stage.
    fn status(&mut self, message: &str);
}

/// Observer that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressObserver for SilentProgress {
    fn progress(&mut self, _percent: u32) {}
    fn status(&mut self, _message: &str) {}
}

/// Observer that records every notification, for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingProgress {
    pub ticks: Vec<u32>,
    pub messages: Vec<String>,
}

#[cfg(test)]
impl ProgressObserver for RecordingProgress {
    fn progress(&mut self, percent: u32) {
        self.ticks.push(percent);
    }

    fn status(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

#[cfg(feature = "progress")]
pub use console::ConsoleProgress;

#[cfg(feature = "progress")]
mod console {
    use indicatif::{ProgressBar, ProgressStyle};

    use super::ProgressObserver;

    /// Terminal progress bar driven by operation ticks.
    pub struct ConsoleProgress {
        bar: ProgressBar,
    }

    impl ConsoleProgress {
        pub fn new() -> Self {
            let bar = ProgressBar::new(100);
            bar.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos:>3}/{len} ({percent:>3}%) | {msg}",
                )
                .expect("indicatif template"),
            );
            Self { bar }
        }
    }

    impl Default for ConsoleProgress {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ProgressObserver for ConsoleProgress {
        fn progress(&mut self, percent: u32) {
            self.bar.set_position(u64::from(percent.min(100)));
            if percent >= 100 {
                self.bar.finish_and_clear();
            }
        }

        fn status(&mut self, message: &str) {
            self.bar.set_message(message.to_string());
        }
    }
}
