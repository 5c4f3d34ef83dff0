use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub city: String,
    pub country: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attraction {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub destination_id: ObjectId,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub destination_id: ObjectId,
    pub name: String,
    pub rating: f32,
    pub price_per_night: i64,
}

/// One destination together with its attractions and hotels, as served by
/// the destination detail route.
#[derive(Debug, Serialize)]
pub struct DestinationDetail {
    pub destination: Destination,
    pub attractions: Vec<Attraction>,
    pub hotels: Vec<Hotel>,
}
