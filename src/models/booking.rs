use chrono::NaiveDate;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub booking_type: String,
    pub item_id: ObjectId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travellers: u32,
    pub amount: i64,
    pub status: BookingStatus,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

#[derive(Debug, Deserialize)]
pub struct BookingInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travellers: Option<u32>,
    pub amount: i64,
}

/// Ticket view of a booking. The ticket number is display-only: it is drawn
/// fresh on every fetch and never persisted, so two views of the same
/// booking may show different numbers.
#[derive(Debug, Serialize)]
pub struct TicketView {
    pub ticket_no: u32,
    #[serde(flatten)]
    pub booking: Booking,
}
