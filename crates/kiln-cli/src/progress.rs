//! Terminal rendering of workflow progress.

use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use kiln_core::application::ports::WorkflowObserver;
use kiln_core::domain::{Step, StepReport, StepStatus};

use crate::cli::OutputFormat;
use crate::output::OutputManager;

/// Renders one line per finished step.
///
/// In human mode a spinner shows the running step; in plain mode only the
/// finished lines are printed. JSON and quiet modes render nothing.
#[derive(Clone)]
pub struct ProgressObserver {
    mode: Mode,
}

#[derive(Clone)]
enum Mode {
    Spinner { bar: ProgressBar, color: bool },
    Lines(Term),
    Silent,
}

impl ProgressObserver {
    pub fn new(output: &OutputManager) -> Self {
        let mode = if output.is_quiet() {
            Mode::Silent
        } else {
            match output.format() {
                OutputFormat::Human => Mode::Spinner {
                    bar: spinner(),
                    color: output.supports_color(),
                },
                OutputFormat::Plain | OutputFormat::Auto => Mode::Lines(Term::stdout()),
                OutputFormat::Json => Mode::Silent,
            }
        };
        Self { mode }
    }

    /// Remove the spinner once the run is over.
    pub fn finish(&self) {
        if let Mode::Spinner { bar, .. } = &self.mode {
            bar.finish_and_clear();
        }
    }
}

fn spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// `✓ Renaming packages: rewrote 12 files`
pub(crate) fn render_report(report: &StepReport, color: bool) -> String {
    let marker = match report.status {
        StepStatus::Ok => "\u{2713}",
        StepStatus::Failed => "\u{26a0}",
        StepStatus::Skipped => "-",
    };

    let text = report.step.describe();
    let line = if report.message.is_empty() {
        text.to_string()
    } else {
        format!("{text}: {}", report.message)
    };

    if !color {
        return format!("{marker} {line}");
    }
    match report.status {
        StepStatus::Ok => format!("{} {line}", marker.green().bold()),
        StepStatus::Failed => format!("{} {}", marker.yellow().bold(), line.yellow()),
        StepStatus::Skipped => format!("{} {}", marker.dimmed(), line.dimmed()),
    }
}

impl WorkflowObserver for ProgressObserver {
    fn step_started(&self, step: Step) {
        if let Mode::Spinner { bar, .. } = &self.mode {
            bar.set_message(format!("{}...", step.describe()));
        }
    }

    fn step_finished(&self, report: &StepReport) {
        // Admin-only steps of a basic run are noise on the terminal.
        if report.status == StepStatus::Skipped {
            return;
        }
        match &self.mode {
            Mode::Spinner { bar, color } => bar.println(render_report(report, *color)),
            Mode::Lines(term) => {
                let _ = term.write_line(&render_report(report, false));
            }
            Mode::Silent => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_report_lines() {
        let ok = StepReport::ok(Step::RewriteMain, "rewrote 3 of 7 files");
        assert_eq!(
            render_report(&ok, false),
            "\u{2713} Renaming packages: rewrote 3 of 7 files"
        );

        let failed = StepReport::failed(Step::AcquireAdmin, "fatal: not found");
        assert!(render_report(&failed, false).starts_with("\u{26a0} Cloning admin repository"));
    }

    #[test]
    fn empty_message_renders_description_only() {
        let report = StepReport::ok(Step::Validate, "");
        assert_eq!(render_report(&report, false), "\u{2713} Checking destination");
    }
}
