//! Progress display on stderr
//!
//! A spinner while the tree is scanned for manifests, then a bar over the
//! manifests being read or updated. Nothing is drawn in quiet or JSON mode.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Step of the workflow shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Walking the tree for `*.nuspec` files
    Scan,
    /// Extracting dependencies only
    Read,
    /// Extracting dependencies and rewriting the target package
    Update { dry_run: bool },
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Scan => "Scanning for nuspec files",
            Phase::Read => "Reading",
            Phase::Update { dry_run: true } => "Checking",
            Phase::Update { dry_run: false } => "Updating",
        }
    }
}

pub struct Progress {
    enabled: bool,
    phase: Option<Phase>,
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            phase: None,
            bar: None,
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Phase currently on screen
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    /// Spins while `root` is being scanned
    pub fn scanning(&mut self, root: &Path) {
        self.phase = Some(Phase::Scan);
        if !self.enabled {
            return;
        }

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.set_message(format!("{} under {}", Phase::Scan.label(), root.display()));
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.replace(spinner);
    }

    /// Switches to a bar over `total` manifests
    pub fn manifests(&mut self, total: usize, phase: Phase) {
        self.phase = Some(phase);
        if !self.enabled {
            return;
        }

        let style = ProgressStyle::default_bar()
            .template("{prefix:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = ProgressBar::new(total as u64);
        bar.set_style(style);
        bar.set_prefix(phase.label());
        self.replace(bar);
    }

    /// Marks one manifest as done, naming it on the bar
    pub fn manifest_done(&self, path: &Path) {
        if let Some(bar) = &self.bar {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            bar.set_message(name);
            bar.inc(1);
        }
    }

    pub fn clear(&mut self) {
        self.phase = None;
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn replace(&mut self, bar: ProgressBar) {
        if let Some(previous) = self.bar.replace(bar) {
            previous.finish_and_clear();
        }
    }
}
