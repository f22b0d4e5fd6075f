use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

/// Batches smaller than this resolve too fast to need a bar
const PROGRESS_THRESHOLD: u64 = 10;

const TEMPLATE: &str = "{spinner:.green} resolving [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";

/// Progress bar on stderr for batch resolution; a no-op when hidden.
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new(total: u64, enabled: bool) -> Self {
        if !enabled || total < PROGRESS_THRESHOLD {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            bar.set_style(style.progress_chars("=>-"));
        }
        Self { bar: Some(bar) }
    }

    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    /// Show the file currently being resolved.
    pub fn set_path(&self, path: &Path) {
        if let Some(ref bar) = self.bar {
            bar.set_message(path.display().to_string());
        }
    }

    pub fn inc(&self) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    /// Clear the bar; `cancelled` leaves a note in its place.
    pub fn finish(&self, cancelled: bool) {
        if let Some(ref bar) = self.bar {
            if cancelled {
                bar.abandon_with_message("cancelled");
            } else {
                bar.finish_and_clear();
            }
        }
    }
}
