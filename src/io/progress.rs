//! Staged progress display for library building and compositing

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::LazyLock;

static STAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "[{{elapsed_precise}}] {{prefix:>10}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Coordinates one progress bar per processing stage
///
/// Quiet reporters hand out hidden bars, so callers can report progress unconditionally.
pub struct ProgressReporter {
    multi_progress: MultiProgress,
    stages: Vec<ProgressBar>,
    quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ProgressReporter {
    /// Create a reporter drawing to stderr, or to nothing when `quiet`
    pub fn new(quiet: bool) -> Self {
        let multi_progress = if quiet {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::new()
        };

        Self {
            multi_progress,
            stages: Vec::new(),
            quiet,
        }
    }

    /// Whether bars are drawn
    pub const fn is_visible(&self) -> bool {
        !self.quiet
    }

    /// Add a bar for a stage of `len` steps
    pub fn stage(&mut self, label: &str, len: u64) -> ProgressBar {
        let bar = if self.quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(len);
            bar.set_style(STAGE_STYLE.clone());
            self.multi_progress.add(bar)
        };
        bar.set_length(len);
        bar.set_prefix(label.to_string());
        self.stages.push(bar.clone());
        bar
    }

    /// Number of stages started so far
    pub const fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Finish every stage and clear the display
    pub fn finish(&self) {
        for bar in &self.stages {
            if !bar.is_finished() {
                bar.finish_and_clear();
            }
        }
        let _ = self.multi_progress.clear();
    }
}
