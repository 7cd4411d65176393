use serde_json::json;

/// Returns the JSON schema every identification response must follow.
pub fn get_medication_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": {
                "type": "STRING",
                "description": "The brand or generic name of the medication."
            },
            "description": {
                "type": "STRING",
                "description": "A brief description of the medication."
            },
            "activeIngredients": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of active ingredients."
            },
            "dosage": {
                "type": "STRING",
                "description": "Typical dosage instructions."
            },
            "uses": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of conditions or symptoms the medication is used to treat."
            },
            "sideEffects": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of potential side effects."
            },
            "disclaimer": {
                "type": "STRING",
                "description": "A mandatory disclaimer in the specified language warning the user that this is not medical advice and they should consult a healthcare professional."
            }
        },
        "required": ["name", "uses", "sideEffects", "disclaimer"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_required_fields() {
        let schema = get_medication_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();

        assert_eq!(required, vec!["name", "uses", "sideEffects", "disclaimer"]);
        for optional in ["description", "activeIngredients", "dosage"] {
            assert!(schema["properties"].get(optional).is_some());
            assert!(!required.contains(&optional));
        }
    }
}
