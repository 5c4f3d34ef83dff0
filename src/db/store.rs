use std::fmt;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::booking::Booking;
use crate::models::destination::{Attraction, Destination, Hotel};
use crate::models::user::User;

#[derive(Debug)]
pub enum StoreError {
    NotFound,
    Duplicate,
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "record not found"),
            StoreError::Duplicate => write!(f, "record already exists"),
            StoreError::Backend(msg) => write!(f, "store backend error: {}", msg),
        }
    }
}

/// Read path for destinations and the facts hanging off them. The core only
/// ever looks records up; catalog content is owned elsewhere.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_destinations(&self) -> Result<Vec<Destination>, StoreError>;

    async fn find_destination(&self, id: ObjectId) -> Result<Destination, StoreError>;

    async fn attractions_for(
        &self,
        destination_id: ObjectId,
        limit: Option<i64>,
    ) -> Result<Vec<Attraction>, StoreError>;

    async fn hotels_for(
        &self,
        destination_id: ObjectId,
        limit: Option<i64>,
    ) -> Result<Vec<Hotel>, StoreError>;
}

/// Record lifecycle for bookings. Cancellation is a status flip, never a
/// delete; identifier assignment belongs to the store.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_booking(&self, booking: &Booking) -> Result<ObjectId, StoreError>;

    async fn find_booking(&self, id: ObjectId) -> Result<Booking, StoreError>;

    async fn bookings_for_user(&self, user_id: ObjectId) -> Result<Vec<Booking>, StoreError>;

    async fn mark_cancelled(&self, id: ObjectId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Returns `StoreError::Duplicate` when the username or email is taken.
    async fn insert_user(&self, user: &User) -> Result<ObjectId, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: ObjectId) -> Result<Option<User>, StoreError>;
}
