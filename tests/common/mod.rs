use std::sync::{Arc, Mutex};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, Error};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use mongodb::bson::{oid::ObjectId, DateTime};

use trip_advisor_api::db::store::{
    AccountStore, BookingStore, CatalogStore, StoreError,
};
use trip_advisor_api::middleware::auth::{jwt_secret, Claims};
use trip_advisor_api::models::booking::{Booking, BookingStatus};
use trip_advisor_api::models::destination::{Attraction, Destination, Hotel};
use trip_advisor_api::models::user::User;
use trip_advisor_api::routes;
use trip_advisor_api::services::itinerary_service::ItineraryService;
use trip_advisor_api::services::planner::OfflinePlanner;

/// In-memory record stores so route tests exercise the real handlers
/// without a database.
#[derive(Default)]
pub struct InMemoryStore {
    pub destinations: Vec<Destination>,
    pub attractions: Vec<Attraction>,
    pub hotels: Vec<Hotel>,
    pub bookings: Mutex<Vec<Booking>>,
    pub users: Mutex<Vec<User>>,
}

impl InMemoryStore {
    pub fn bookings_len(&self) -> usize {
        self.bookings.lock().unwrap().len()
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn list_destinations(&self) -> Result<Vec<Destination>, StoreError> {
        Ok(self.destinations.clone())
    }

    async fn find_destination(&self, id: ObjectId) -> Result<Destination, StoreError> {
        self.destinations
            .iter()
            .find(|d| d.id == Some(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn attractions_for(
        &self,
        destination_id: ObjectId,
        limit: Option<i64>,
    ) -> Result<Vec<Attraction>, StoreError> {
        let matches = self
            .attractions
            .iter()
            .filter(|a| a.destination_id == destination_id)
            .take(limit.map(|l| l as usize).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(matches)
    }

    async fn hotels_for(
        &self,
        destination_id: ObjectId,
        limit: Option<i64>,
    ) -> Result<Vec<Hotel>, StoreError> {
        let matches = self
            .hotels
            .iter()
            .filter(|h| h.destination_id == destination_id)
            .take(limit.map(|l| l as usize).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(matches)
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn insert_booking(&self, booking: &Booking) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        let mut stored = booking.clone();
        stored.id = Some(id);
        self.bookings.lock().unwrap().push(stored);
        Ok(id)
    }

    async fn find_booking(&self, id: ObjectId) -> Result<Booking, StoreError> {
        self.bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == Some(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn bookings_for_user(&self, user_id: ObjectId) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_cancelled(&self, id: ObjectId) -> Result<(), StoreError> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings.iter_mut().find(|b| b.id == Some(id)) {
            Some(booking) => {
                booking.status = BookingStatus::Cancelled;
                booking.updated_at = Some(DateTime::now());
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn insert_user(&self, user: &User) -> Result<ObjectId, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(StoreError::Duplicate);
        }
        let id = ObjectId::new();
        let mut stored = user.clone();
        stored.id = Some(id);
        users.push(stored);
        Ok(id)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user_by_id(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == Some(id))
            .cloned())
    }
}

pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub goa: ObjectId,
    pub paris: ObjectId,
}

pub fn seeded_context() -> TestContext {
    let goa = ObjectId::new();
    let paris = ObjectId::new();

    let destinations = vec![
        Destination {
            id: Some(goa),
            city: "Goa".to_string(),
            country: "India".to_string(),
            description: "Beaches, nightlife and Portuguese heritage".to_string(),
        },
        Destination {
            id: Some(paris),
            city: "Paris".to_string(),
            country: "France".to_string(),
            description: "Museums, cafes and the Seine".to_string(),
        },
    ];

    let attractions = (0..8)
        .map(|i| Attraction {
            id: Some(ObjectId::new()),
            destination_id: goa,
            name: format!("Goa Spot {}", i),
            description: format!("Description of spot {}", i),
            category: Some("sightseeing".to_string()),
        })
        .collect();

    let hotels = (0..4)
        .map(|i| Hotel {
            id: Some(ObjectId::new()),
            destination_id: goa,
            name: format!("Goa Hotel {}", i),
            rating: 4.0,
            price_per_night: 2500 + i * 500,
        })
        .collect();

    TestContext {
        store: Arc::new(InMemoryStore {
            destinations,
            attractions,
            hotels,
            ..Default::default()
        }),
        goa,
        paris,
    }
}

pub fn build_app(
    ctx: &TestContext,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    let catalog: Arc<dyn CatalogStore> = ctx.store.clone();
    let ledger: Arc<dyn BookingStore> = ctx.store.clone();
    let accounts: Arc<dyn AccountStore> = ctx.store.clone();
    let planner = Arc::new(ItineraryService::new(Arc::new(OfflinePlanner)));

    App::new()
        .app_data(web::Data::new(catalog))
        .app_data(web::Data::new(ledger))
        .app_data(web::Data::new(accounts))
        .app_data(web::Data::new(planner))
        .configure(routes::configure)
}

/// Token for an arbitrary user id, signed the same way the signin route
/// signs them.
pub fn auth_token(user_id: ObjectId) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: format!("{}@example.com", user_id.to_hex()),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(1)).timestamp() as usize,
        user_id: user_id.to_string(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_ref()),
    )
    .expect("failed to sign test token")
}

pub fn bearer(user_id: ObjectId) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", auth_token(user_id)))
}
