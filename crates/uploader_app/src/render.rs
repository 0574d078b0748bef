use std::io::{self, Write};

use uploader_core::{JobStatus, PollOutcome, StatusIcon, StatusView};
use uploader_engine::RenderSink;

const BAR_WIDTH: usize = 30;

/// Prints every status update as a block of terminal lines.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl RenderSink for TerminalRenderer {
    fn render(&self, status: &JobStatus) {
        let view = StatusView::from_status(status);
        let mut stdout = io::stdout().lock();
        for line in render_lines(&view) {
            // A closed stdout only loses cosmetics.
            let _ = writeln!(stdout, "{line}");
        }
    }
}

pub fn render_lines(view: &StatusView) -> Vec<String> {
    let mut lines = vec![format!(
        "{} [{}] {:>4} {}",
        icon_label(view.icon),
        progress_bar(view.progress_percent),
        view.progress_text,
        view.message
    )];
    if let Some(result) = &view.result {
        lines.push("--- result ---".to_string());
        lines.extend(result.lines().map(str::to_string));
    }
    if view.actions_visible {
        lines.push("Processing finished.".to_string());
    }
    lines
}

pub fn outcome_line(outcome: PollOutcome) -> &'static str {
    match outcome {
        PollOutcome::NotStarted => "No session on this page; nothing to poll.",
        PollOutcome::Succeeded => "Upload completed.",
        PollOutcome::Failed => "Upload failed.",
        PollOutcome::Exhausted => "Stopped waiting for the server; last known status shown above.",
    }
}

fn icon_label(icon: StatusIcon) -> &'static str {
    match icon {
        StatusIcon::Spinner => "...",
        StatusIcon::Success => "OK ",
        StatusIcon::Error => "ERR",
    }
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
