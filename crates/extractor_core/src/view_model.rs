use serde_json::Value;

use crate::{RequestStatus, RequiredField, Stage};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status: RequestStatus,
    pub stage: Option<Stage>,
    pub files: Vec<FileRowView>,
    pub selection_label: String,
    pub persona: String,
    pub job_to_be_done: String,
    pub missing_fields: Vec<RequiredField>,
    pub can_submit: bool,
    pub error: Option<String>,
    pub response: Option<Value>,
    pub summary: Option<ResponseSummary>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub name: String,
    pub bytes: u64,
    pub size_label: String,
}

impl FileRowView {
    pub(crate) fn new(name: &str, bytes: u64) -> Self {
        Self {
            name: name.to_string(),
            bytes,
            size_label: format_megabytes(bytes),
        }
    }
}

/// Loose reading of the backend's usual payload shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseSummary {
    pub persona: Option<String>,
    pub job_to_be_done: Option<String>,
    pub documents: Vec<String>,
    pub sections: Vec<SectionRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRowView {
    pub document: String,
    pub title: String,
    pub rank: Option<u64>,
    pub page: Option<u64>,
}

/// `1048576` -> `"1.00 MB"`.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Extracts a summary when the payload carries `extracted_sections`.
/// Anything else yields `None`; the raw JSON is still shown.
pub fn summarize_response(value: &Value) -> Option<ResponseSummary> {
    let sections = value.get("extracted_sections")?.as_array()?;
    let metadata = value.get("metadata");
    let meta_str = |key: &str| {
        metadata
            .and_then(|meta| meta.get(key))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
    };

    let documents = metadata
        .and_then(|meta| meta.get("input_documents"))
        .and_then(Value::as_array)
        .map(|docs| {
            docs.iter()
                .filter_map(Value::as_str)
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let sections = sections
        .iter()
        .filter_map(|section| {
            let title = section.get("section_title")?.as_str()?;
            Some(SectionRowView {
                document: section
                    .get("document")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                title: title.to_string(),
                rank: section.get("importance_rank").and_then(Value::as_u64),
                page: section.get("page_number").and_then(Value::as_u64),
            })
        })
        .collect();

    Some(ResponseSummary {
        persona: meta_str("persona"),
        job_to_be_done: meta_str("job_to_be_done"),
        documents,
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::format_megabytes;

    #[test]
    fn megabytes_use_two_decimals() {
        assert_eq!(format_megabytes(0), "0.00 MB");
        assert_eq!(format_megabytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_megabytes(1_572_864), "1.50 MB");
    }
}
