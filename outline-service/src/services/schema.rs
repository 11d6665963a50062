//! Shape of the outline the upstream model is asked to produce.
//!
//! The same field lists drive both the prompt's wording and the
//! `responseSchema` descriptor, so the two cannot drift apart.

use serde_json::{json, Map, Value};

pub const OUTLINE_KEY: &str = "projectOutline";
pub const COST_KEY: &str = "costEstimation";
pub const SUMMARY_KEY: &str = "summary";

/// String-array fields of `projectOutline`.
pub const OUTLINE_FIELDS: [&str; 4] = [
    "keyObjectives",
    "highLevelPhases",
    "recommendedTech",
    "potentialRisks",
];

/// Numeric fields of `costEstimation`.
pub const COST_NUMBER_FIELDS: [&str; 3] = ["estimatedHours", "hourlyRate", "totalCost"];

/// String fields of `costEstimation`.
pub const COST_TEXT_FIELDS: [&str; 2] = ["currency", "disclaimer"];

fn typed(type_tag: &str) -> Value {
    json!({ "type": type_tag })
}

fn object(properties: Map<String, Value>) -> Value {
    let required: Vec<String> = properties.keys().cloned().collect();
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

/// `responseSchema` for schema-constrained generation, in the OpenAPI subset
/// Gemini accepts (upper-case type tags).
pub fn outline_response_schema() -> Value {
    let outline = OUTLINE_FIELDS
        .iter()
        .map(|field| {
            (
                field.to_string(),
                json!({ "type": "ARRAY", "items": typed("STRING") }),
            )
        })
        .collect();

    let cost = COST_NUMBER_FIELDS
        .iter()
        .map(|field| (field.to_string(), typed("NUMBER")))
        .chain(
            COST_TEXT_FIELDS
                .iter()
                .map(|field| (field.to_string(), typed("STRING"))),
        )
        .collect();

    let mut root = Map::new();
    root.insert(OUTLINE_KEY.to_string(), object(outline));
    root.insert(COST_KEY.to_string(), object(cost));
    root.insert(SUMMARY_KEY.to_string(), typed("STRING"));

    object(root)
}
