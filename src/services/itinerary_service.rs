use std::sync::Arc;

use serde_json::Value;

use crate::models::destination::{Attraction, Destination, Hotel};
use crate::models::itinerary::{ItineraryPlan, TripQuery, TripQueryInput};
use crate::services::planner::{fallback_plan, PlanBackend, PlanContext};

const DEFAULT_TRIP_DAYS: u32 = 3;
const DEFAULT_BUDGET: &str = "moderate";
// Caps bound prompt size and cost; they are not correctness requirements.
pub const MAX_PROMPT_ATTRACTIONS: usize = 6;
pub const MAX_PROMPT_HOTELS: usize = 3;

/// Builds the trip prompt from catalog facts and hands it to the configured
/// plan backend. The contract is total: callers always get a non-empty plan,
/// whatever the completion service did.
pub struct ItineraryService {
    backend: Arc<dyn PlanBackend>,
}

impl ItineraryService {
    pub fn new(backend: Arc<dyn PlanBackend>) -> Self {
        Self { backend }
    }

    pub async fn generate(
        &self,
        destination: &Destination,
        attractions: &[Attraction],
        hotels: &[Hotel],
        input: &TripQueryInput,
    ) -> ItineraryPlan {
        let query = normalize_query(input);
        let prompt = build_prompt(destination, attractions, hotels, &query);

        let ctx = PlanContext {
            city: &destination.city,
            days: query.days,
        };
        let plan = self.backend.generate(&prompt, ctx).await;

        let body = if plan.body.trim().is_empty() {
            fallback_plan(&destination.city, query.days)
        } else {
            plan.body
        };

        ItineraryPlan {
            city: destination.city.clone(),
            days: query.days,
            plan: body,
            generated: plan.generated,
        }
    }
}

pub fn normalize_query(input: &TripQueryInput) -> TripQuery {
    let budget = input
        .budget
        .clone()
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BUDGET.to_string());

    TripQuery {
        days: coerce_days(input.days.as_ref()),
        budget,
        interests: input.interests.clone().unwrap_or_default(),
    }
}

/// Day counts arrive from forms, so numbers and numeric strings are both
/// accepted. Anything else defaults to three days; values below one are
/// clamped up to avoid a degenerate plan.
pub fn coerce_days(raw: Option<&Value>) -> u32 {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) => u32::try_from(v.max(1)).unwrap_or(DEFAULT_TRIP_DAYS),
        None => DEFAULT_TRIP_DAYS,
    }
}

pub fn build_prompt(
    destination: &Destination,
    attractions: &[Attraction],
    hotels: &[Hotel],
    query: &TripQuery,
) -> String {
    let attractions_text = attractions
        .iter()
        .take(MAX_PROMPT_ATTRACTIONS)
        .map(|a| format!("{}: {}", a.name, a.description))
        .collect::<Vec<_>>()
        .join("\n");

    let hotels_text = hotels
        .iter()
        .take(MAX_PROMPT_HOTELS)
        .map(|h| format!("{} (₹{}/night, rating {})", h.name, h.price_per_night, h.rating))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a professional travel planner. Create a {}-day itinerary for {}, {}.\n\
         Interests: {}. Budget: {}.\n\
         Attractions:\n\
         {}\n\
         Hotels:\n\
         {}\n\
         \n\
         Provide a day-by-day detailed itinerary with times, activities, and approximate costs.",
        query.days,
        destination.city,
        destination.country,
        query.interests,
        query.budget,
        attractions_text,
        hotels_text
    )
}
