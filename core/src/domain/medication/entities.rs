use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const INVALID_FORMAT_DESCRIPTION: &str = "The AI returned an invalid format. Please try again.";
pub const GENERIC_DISCLAIMER: &str =
    "This is an informational tool. Always consult a healthcare professional for medical advice.";
pub const TRANSPORT_FAILURE_TEXT: &str =
    "An error occurred while communicating with the AI. Please try again.";

/// Normalized result of one identification request. Built fresh by the
/// response parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    pub raw_text: String,
    pub outcome: IdentificationOutcome,
}

/// Decided once, when the record is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IdentificationOutcome {
    Identified,
    Unidentified { reason: FailureReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The model answered with an empty name: it could not identify the medication.
    NotRecognized,
    /// The model answer was not the expected JSON object.
    InvalidFormat,
    /// The model could not be reached.
    Transport,
}

impl MedicationRecord {
    pub fn invalid_format(raw_text: String) -> Self {
        Self {
            name: Some(String::new()),
            description: Some(INVALID_FORMAT_DESCRIPTION.to_string()),
            active_ingredients: None,
            dosage: None,
            uses: None,
            side_effects: None,
            disclaimer: Some(GENERIC_DISCLAIMER.to_string()),
            raw_text,
            outcome: IdentificationOutcome::Unidentified {
                reason: FailureReason::InvalidFormat,
            },
        }
    }

    pub fn transport_failure() -> Self {
        Self {
            name: None,
            description: None,
            active_ingredients: None,
            dosage: None,
            uses: None,
            side_effects: None,
            disclaimer: None,
            raw_text: TRANSPORT_FAILURE_TEXT.to_string(),
            outcome: IdentificationOutcome::Unidentified {
                reason: FailureReason::Transport,
            },
        }
    }

    pub fn is_identified(&self) -> bool {
        matches!(self.outcome, IdentificationOutcome::Identified)
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self.outcome {
            IdentificationOutcome::Identified => None,
            IdentificationOutcome::Unidentified { reason } => Some(reason),
        }
    }
}
