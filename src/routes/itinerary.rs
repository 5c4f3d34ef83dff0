use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use mongodb::bson::oid::ObjectId;

use crate::db::store::{CatalogStore, StoreError};
use crate::models::itinerary::TripQueryInput;
use crate::services::itinerary_service::{
    ItineraryService, MAX_PROMPT_ATTRACTIONS, MAX_PROMPT_HOTELS,
};

pub async fn generate_itinerary(
    catalog: web::Data<Arc<dyn CatalogStore>>,
    planner: web::Data<Arc<ItineraryService>>,
    path: web::Path<String>,
    input: web::Json<TripQueryInput>,
) -> impl Responder {
    let dest_id = match ObjectId::parse_str(path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid destination ID"),
    };

    let destination = match catalog.find_destination(dest_id).await {
        Ok(destination) => destination,
        Err(StoreError::NotFound) => {
            return HttpResponse::NotFound().body("Destination not found")
        }
        Err(err) => {
            log::error!("Failed to fetch destination: {}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch destination");
        }
    };

    let attractions = match catalog
        .attractions_for(dest_id, Some(MAX_PROMPT_ATTRACTIONS as i64))
        .await
    {
        Ok(attractions) => attractions,
        Err(err) => {
            log::error!("Failed to fetch attractions: {}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch attractions");
        }
    };

    let hotels = match catalog
        .hotels_for(dest_id, Some(MAX_PROMPT_HOTELS as i64))
        .await
    {
        Ok(hotels) => hotels,
        Err(err) => {
            log::error!("Failed to fetch hotels: {}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch hotels");
        }
    };

    let plan = planner
        .generate(&destination, &attractions, &hotels, &input)
        .await;

    HttpResponse::Ok().json(plan)
}
