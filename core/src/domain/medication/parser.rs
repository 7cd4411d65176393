use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::domain::medication::entities::{
    FailureReason, IdentificationOutcome, MedicationRecord,
};

static LEADING_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*```(?:json)?[ \t]*\r?\n?").ok());
static TRAILING_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\r?\n?[ \t]*```\s*$").ok());

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MedicationPayload {
    name: Option<String>,
    description: Option<String>,
    active_ingredients: Option<Vec<String>>,
    dosage: Option<String>,
    uses: Option<Vec<String>>,
    side_effects: Option<Vec<String>>,
    disclaimer: Option<String>,
}

/// Removes a surrounding markdown code fence, if any, with the whitespace
/// next to it. Unfenced text comes back untouched.
pub fn strip_code_fence(raw: &str) -> String {
    let mut text = raw;
    if let Some(found) = LEADING_FENCE.as_ref().and_then(|re| re.find(text)) {
        text = text[found.end()..].trim_start();
    }
    if let Some(found) = TRAILING_FENCE.as_ref().and_then(|re| re.find(text)) {
        text = text[..found.start()].trim_end();
    }
    text.to_string()
}

/// Turns raw model output into a [`MedicationRecord`]. Never fails: text that
/// is not the expected JSON object yields an `invalid_format` record that keeps
/// the original input in `raw_text`.
pub fn parse_medication_response(raw: &str) -> MedicationRecord {
    let clean = strip_code_fence(raw);

    let payload = match serde_json::from_str::<MedicationPayload>(&clean) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Model response is not a valid medication object");
            return MedicationRecord::invalid_format(raw.to_string());
        }
    };

    let outcome = match payload.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => IdentificationOutcome::Identified,
        _ => IdentificationOutcome::Unidentified {
            reason: FailureReason::NotRecognized,
        },
    };

    MedicationRecord {
        name: payload.name,
        description: payload.description,
        active_ingredients: payload.active_ingredients,
        dosage: payload.dosage,
        uses: payload.uses,
        side_effects: payload.side_effects,
        disclaimer: payload.disclaimer,
        raw_text: clean,
        outcome,
    }
}
