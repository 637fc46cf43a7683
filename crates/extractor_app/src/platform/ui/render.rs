use extractor_core::{AppViewModel, RequestStatus, ResponseSummary, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Information,
    Warning,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Status { text: String, severity: Severity },
    Detail(String),
    /// Pretty-printed response body; goes to stdout.
    Payload(String),
}

pub fn render(view: &AppViewModel) -> Vec<ConsoleCommand> {
    let mut cmds = vec![ConsoleCommand::Status {
        text: format!("Files: {}", view.selection_label),
        severity: Severity::Information,
    }];
    cmds.extend(
        view.files
            .iter()
            .map(|file| ConsoleCommand::Detail(format!("  {} - {}", file.name, file.size_label))),
    );

    match view.status {
        RequestStatus::Idle => {
            if !view.missing_fields.is_empty() {
                let labels: Vec<_> = view.missing_fields.iter().map(|f| f.label()).collect();
                cmds.push(ConsoleCommand::Status {
                    text: format!("Required: {}", labels.join(", ")),
                    severity: Severity::Warning,
                });
            }
        }
        RequestStatus::InFlight => {
            cmds.push(ConsoleCommand::Status {
                text: format!("Processing... ({})", stage_label(view.stage)),
                severity: Severity::Information,
            });
        }
        RequestStatus::Completed => {
            if let Some(error) = &view.error {
                cmds.push(ConsoleCommand::Status {
                    text: format!("Error: {error}"),
                    severity: Severity::Error,
                });
            }
            if let Some(response) = &view.response {
                cmds.push(ConsoleCommand::Status {
                    text: "Success! Your documents have been processed.".to_string(),
                    severity: Severity::Success,
                });
                if let Some(summary) = &view.summary {
                    cmds.extend(summary_lines(summary).into_iter().map(ConsoleCommand::Detail));
                }
                let pretty = serde_json::to_string_pretty(response)
                    .unwrap_or_else(|_| response.to_string());
                cmds.push(ConsoleCommand::Payload(pretty));
            }
        }
    }

    cmds
}

fn stage_label(stage: Option<Stage>) -> &'static str {
    match stage {
        None => "starting",
        Some(Stage::Encoding) => "encoding request",
        Some(Stage::Uploading) => "uploading",
        Some(Stage::Reading) => "reading response",
    }
}

fn summary_lines(summary: &ResponseSummary) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(persona) = &summary.persona {
        lines.push(format!("Persona: {persona}"));
    }
    if let Some(job) = &summary.job_to_be_done {
        lines.push(format!("Job to be done: {job}"));
    }
    if !summary.documents.is_empty() {
        lines.push(format!("Documents: {}", summary.documents.join(", ")));
    }
    lines.push(format!("Extracted sections: {}", summary.sections.len()));
    for section in &summary.sections {
        let rank = section
            .rank
            .map(|rank| format!("#{rank}"))
            .unwrap_or_else(|| "-".to_string());
        let page = section
            .page
            .map(|page| format!(", p. {page}"))
            .unwrap_or_default();
        lines.push(format!(
            "  {rank} {} ({}{page})",
            section.title, section.document
        ));
    }
    lines
}
