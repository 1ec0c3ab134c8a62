//! Progress reporting for submission and polling

use captionkit_application::PollProgressNotifier;
use captionkit_domain::JobStatus;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner showing the current polling round for one file
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
    label: String,
}

impl ProgressReporter {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            bar: Mutex::new(None),
            label: label.into(),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };
        let bar = slot.get_or_insert_with(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(Self::spinner_style());
            bar.set_prefix(self.label.clone());
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        });
        f(bar);
    }

    /// Clear the spinner once the file is done
    pub fn finish(&self) {
        if let Ok(mut slot) = self.bar.lock()
            && let Some(bar) = slot.take()
        {
            bar.finish_and_clear();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.finish();
    }
}

impl PollProgressNotifier for ProgressReporter {
    fn on_submitted(&self, key: &str, pending: bool) {
        let state = if pending { "queued" } else { "done" };
        self.with_bar(|bar| bar.set_message(format!("{} {}", key, state)));
    }

    fn on_round_start(&self, round: u32, pending: usize) {
        self.with_bar(|bar| {
            bar.set_message(format!("round {}: waiting on {} job(s)", round, pending));
        });
    }

    fn on_job_resolved(&self, key: &str, status: JobStatus) {
        let mark = match status {
            JobStatus::Success => "v".green(),
            JobStatus::Error => "x".red(),
        };
        self.with_bar(|bar| bar.println(format!("  {} {}", mark, key)));
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl PollProgressNotifier for SimpleProgress {
    fn on_submitted(&self, key: &str, pending: bool) {
        if pending {
            eprintln!("{} {} submitted", "->".cyan(), key.bold());
        }
    }

    fn on_round_start(&self, round: u32, pending: usize) {
        eprintln!("{} round {} ({} pending)", "->".cyan(), round, pending);
    }

    fn on_job_resolved(&self, key: &str, status: JobStatus) {
        match status {
            JobStatus::Success => eprintln!("  {} {}", "v".green(), key),
            JobStatus::Error => eprintln!("  {} {} (failed)", "x".red(), key),
        }
    }
}
