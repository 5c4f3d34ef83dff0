use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::error::{ErrorKind, WriteError, WriteFailure};
use mongodb::options::{ClientOptions, FindOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection};

use crate::db::store::{AccountStore, BookingStore, CatalogStore, StoreError};
use crate::models::booking::Booking;
use crate::models::destination::{Attraction, Destination, Hotel};
use crate::models::user::User;

const DB_NAME: &str = "TripAdvisor";

pub async fn create_mongo_client(uri: &str) -> Arc<Client> {
    let mut client_options = ClientOptions::parse(uri)
        .await
        .expect("MongoDB URI may be incorrect! Failed to parse.");

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client =
        Client::with_options(client_options).expect("Failed to create MongoDB client with options");

    match client
        .database(DB_NAME)
        .run_command(doc! { "ping": 1 })
        .await
    {
        Ok(_) => log::info!("Connected to MongoDB and verified with ping command"),
        Err(e) => {
            log::warn!("Connected to MongoDB but ping test failed: {}", e);
        }
    }

    Arc::new(client)
}

/// MongoDB-backed implementation of the record stores. Duplicate signups
/// rely on unique indexes over `username` and `email` in the Users
/// collection.
pub struct MongoStore {
    client: Arc<Client>,
}

impl MongoStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.client.database(DB_NAME).collection(name)
    }
}

fn map_error(err: mongodb::error::Error) -> StoreError {
    if let ErrorKind::Write(WriteFailure::WriteError(WriteError { code, .. })) = &*err.kind {
        if *code == 11000 {
            return StoreError::Duplicate;
        }
    }
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl CatalogStore for MongoStore {
    async fn list_destinations(&self) -> Result<Vec<Destination>, StoreError> {
        let collection: Collection<Destination> = self.collection("Destinations");
        let cursor = collection.find(doc! {}).await.map_err(map_error)?;
        cursor.try_collect().await.map_err(map_error)
    }

    async fn find_destination(&self, id: ObjectId) -> Result<Destination, StoreError> {
        let collection: Collection<Destination> = self.collection("Destinations");
        match collection.find_one(doc! { "_id": id }).await {
            Ok(Some(destination)) => Ok(destination),
            Ok(None) => Err(StoreError::NotFound),
            Err(err) => Err(map_error(err)),
        }
    }

    async fn attractions_for(
        &self,
        destination_id: ObjectId,
        limit: Option<i64>,
    ) -> Result<Vec<Attraction>, StoreError> {
        let collection: Collection<Attraction> = self.collection("Attractions");
        let mut options = FindOptions::default();
        options.limit = limit;
        let cursor = collection
            .find(doc! { "destination_id": destination_id })
            .with_options(options)
            .await
            .map_err(map_error)?;
        cursor.try_collect().await.map_err(map_error)
    }

    async fn hotels_for(
        &self,
        destination_id: ObjectId,
        limit: Option<i64>,
    ) -> Result<Vec<Hotel>, StoreError> {
        let collection: Collection<Hotel> = self.collection("Hotels");
        let mut options = FindOptions::default();
        options.limit = limit;
        let cursor = collection
            .find(doc! { "destination_id": destination_id })
            .with_options(options)
            .await
            .map_err(map_error)?;
        cursor.try_collect().await.map_err(map_error)
    }
}

#[async_trait]
impl BookingStore for MongoStore {
    async fn insert_booking(&self, booking: &Booking) -> Result<ObjectId, StoreError> {
        let collection: Collection<Booking> = self.collection("Bookings");
        let result = collection.insert_one(booking).await.map_err(map_error)?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Backend("inserted id was not an ObjectId".to_string()))
    }

    async fn find_booking(&self, id: ObjectId) -> Result<Booking, StoreError> {
        let collection: Collection<Booking> = self.collection("Bookings");
        match collection.find_one(doc! { "_id": id }).await {
            Ok(Some(booking)) => Ok(booking),
            Ok(None) => Err(StoreError::NotFound),
            Err(err) => Err(map_error(err)),
        }
    }

    async fn bookings_for_user(&self, user_id: ObjectId) -> Result<Vec<Booking>, StoreError> {
        let collection: Collection<Booking> = self.collection("Bookings");
        let cursor = collection
            .find(doc! { "user_id": user_id })
            .await
            .map_err(map_error)?;
        cursor.try_collect().await.map_err(map_error)
    }

    async fn mark_cancelled(&self, id: ObjectId) -> Result<(), StoreError> {
        let collection: Collection<Booking> = self.collection("Bookings");
        let update = doc! {
            "$set": {
                "status": "cancelled",
                "updated_at": DateTime::now()
            }
        };
        match collection.update_one(doc! { "_id": id }, update).await {
            Ok(result) if result.matched_count == 0 => Err(StoreError::NotFound),
            Ok(_) => Ok(()),
            Err(err) => Err(map_error(err)),
        }
    }
}

#[async_trait]
impl AccountStore for MongoStore {
    async fn insert_user(&self, user: &User) -> Result<ObjectId, StoreError> {
        let collection: Collection<User> = self.collection("Users");
        let result = collection.insert_one(user).await.map_err(map_error)?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Backend("inserted id was not an ObjectId".to_string()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let collection: Collection<User> = self.collection("Users");
        collection
            .find_one(doc! { "email": email })
            .await
            .map_err(map_error)
    }

    async fn find_user_by_id(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        let collection: Collection<User> = self.collection("Users");
        collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(map_error)
    }
}
