use std::io::{self, Write};

use scout_core::{text, AppViewModel, SessionState};

/// Renders the whole view as terminal lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![format!(
        "Scout [{}] {}",
        view.search_label(),
        describe_input(view)
    )];

    if let Some(message) = &view.loading_message {
        lines.push(message.clone());
    }

    if let Some(error) = &view.error {
        lines.push(format!("Error: {error}"));
    }

    if let Some(results) = &view.results {
        lines.push("Top Candidate Matches".to_string());
        if results.is_empty() {
            lines.push(text::NO_CANDIDATES.to_string());
        }
        for (index, row) in results.iter().enumerate() {
            lines.push(format!("{}. {}", index + 1, row.name));
            lines.push(format!("   LinkedIn: {}", row.link));
            lines.push(format!("   Description: {}", row.snippet));
        }
    }

    if view.session == SessionState::Idle && view.loading_message.is_none() && view.error.is_none()
    {
        lines.push("Ready.".to_string());
    }

    lines
}

fn describe_input(view: &AppViewModel) -> String {
    match (&view.prompt_file, view.prompt_text.trim().is_empty()) {
        (Some(path), _) => format!("file {path}"),
        (None, false) => format!("pasted text ({} chars)", view.prompt_text.chars().count()),
        (None, true) => "no input".to_string(),
    }
}

/// Prints only the lines that differ from the previously printed frame.
#[derive(Debug, Default)]
pub struct FramePrinter {
    last: Vec<String>,
}

impl FramePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(&mut self, out: &mut impl Write, frame: Vec<String>) -> io::Result<()> {
        for (index, line) in frame.iter().enumerate() {
            if self.last.get(index) != Some(line) {
                writeln!(out, "{line}")?;
            }
        }
        out.flush()?;
        self.last = frame;
        Ok(())
    }
}
