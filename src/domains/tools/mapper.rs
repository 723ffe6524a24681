//! Translate openFDA JSON into the text reports returned to clients.
//!
//! Mappers never fail. Missing or oddly shaped fields fall back to fixed
//! defaults, an error status becomes a diagnostic line, and an empty result
//! set becomes a "not found" line.

use serde_json::Value;
use tracing::warn;

use super::client::UpstreamResponse;

/// Separator placed between per-record blocks.
pub const RECORD_SEPARATOR: &str = "\n---\n";

/// Maximum characters kept from any single extracted field.
pub const MAX_FIELD_CHARS: usize = 500;

/// Marker appended after long-form label sections.
const ELLIPSIS: &str = "...";

const UNKNOWN: &str = "Unknown";
const NOT_AVAILABLE: &str = "N/A";

/// Keep at most [`MAX_FIELD_CHARS`] characters. May cut mid-word.
pub fn truncate(text: &str) -> &str {
    match text.char_indices().nth(MAX_FIELD_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// First element of a list-valued field, or the value itself when openFDA
/// returns a bare string.
fn first_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Array(items) => items.first().and_then(scalar_text),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// One tool's view of an upstream result set.
pub trait ResponseMapper {
    /// Noun used in diagnostics, e.g. "drug labels".
    const SUBJECT: &'static str;

    /// Line returned when the result set is empty.
    fn not_found(drug_name: &str) -> String;

    /// Format one record.
    fn format_record(record: &Value) -> String;

    /// Render a full response into the report text.
    fn render(response: &UpstreamResponse, drug_name: &str) -> String {
        if !response.is_success() {
            return format!(
                "Error fetching {}: {} - {}",
                Self::SUBJECT,
                response.status,
                response.text()
            );
        }

        let body: Value = match serde_json::from_slice(&response.body) {
            Ok(body) => body,
            Err(e) => {
                warn!("Undecodable openFDA body for {}: {}", Self::SUBJECT, e);
                return format!("Error decoding {} response: {}", Self::SUBJECT, e);
            }
        };

        let records = body
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        if records.is_empty() {
            return Self::not_found(drug_name);
        }

        records
            .iter()
            .map(Self::format_record)
            .collect::<Vec<_>>()
            .join(RECORD_SEPARATOR)
    }
}

/// Drug label records (`/drug/label.json`).
pub struct LabelMapper;

impl ResponseMapper for LabelMapper {
    const SUBJECT: &'static str = "drug labels";

    fn not_found(drug_name: &str) -> String {
        format!("No labels found for drug: {}", drug_name)
    }

    fn format_record(record: &Value) -> String {
        let openfda = record.get("openfda");
        let brand = first_text(openfda.and_then(|o| o.get("brand_name")))
            .unwrap_or_else(|| UNKNOWN.to_string());
        let generic = first_text(openfda.and_then(|o| o.get("generic_name")))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let section = |key: &str| {
            let text = first_text(record.get(key)).unwrap_or_else(|| NOT_AVAILABLE.to_string());
            format!("{}{}", truncate(&text), ELLIPSIS)
        };

        format!(
            "Brand Name: {}\nGeneric Name: {}\n\nIndications: {}\n\nDosage: {}\n\nWarnings: {}",
            truncate(&brand),
            truncate(&generic),
            section("indications_and_usage"),
            section("dosage_and_administration"),
            section("warnings"),
        )
    }
}

/// Adverse event reports (`/drug/event.json`).
pub struct EventMapper;

impl ResponseMapper for EventMapper {
    const SUBJECT: &'static str = "adverse events";

    fn not_found(drug_name: &str) -> String {
        format!("No adverse events found for drug: {}", drug_name)
    }

    fn format_record(record: &Value) -> String {
        let reactions = record
            .get("patient")
            .and_then(|p| p.get("reaction"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let terms: Vec<&str> = reactions
            .iter()
            .filter_map(|r| r.get("reactionmeddrapt").and_then(Value::as_str))
            .map(truncate)
            .collect();

        // Only the first reaction's outcome is reported.
        let outcome = reactions
            .first()
            .and_then(|r| r.get("reactionoutcome"))
            .and_then(scalar_text)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let seriousness = match record.get("serious").and_then(Value::as_str) {
            Some("1") => "Serious",
            _ => "Non-serious",
        };

        format!(
            "Seriousness: {}\nReactions: {}\nOutcome: {}",
            seriousness,
            terms.join(", "),
            truncate(&outcome)
        )
    }
}
