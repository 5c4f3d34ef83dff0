use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw trip parameters as submitted by the caller. `days` is deliberately
/// loose: forms send numbers as strings, so coercion happens in the
/// itinerary service rather than at deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct TripQueryInput {
    pub days: Option<Value>,
    pub budget: Option<String>,
    pub interests: Option<String>,
}

/// Normalized trip parameters used for prompt construction.
#[derive(Debug, Clone)]
pub struct TripQuery {
    pub days: u32,
    pub budget: String,
    pub interests: String,
}

/// The generated plan body, as marked-up plain text. `generated` is false
/// whenever the text came from the offline template path (no key configured,
/// or the completion service failed).
#[derive(Debug, Serialize)]
pub struct ItineraryPlan {
    pub city: String,
    pub days: u32,
    pub plan: String,
    pub generated: bool,
}
