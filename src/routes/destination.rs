use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use mongodb::bson::oid::ObjectId;

use crate::db::store::{CatalogStore, StoreError};
use crate::models::destination::DestinationDetail;

pub async fn get_destinations(catalog: web::Data<Arc<dyn CatalogStore>>) -> impl Responder {
    match catalog.list_destinations().await {
        Ok(destinations) => HttpResponse::Ok().json(destinations),
        Err(err) => {
            log::error!("Failed to list destinations: {}", err);
            HttpResponse::InternalServerError().body("Failed to list destinations")
        }
    }
}

pub async fn get_destination(
    catalog: web::Data<Arc<dyn CatalogStore>>,
    path: web::Path<String>,
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

    let attractions = match catalog.attractions_for(dest_id, None).await {
        Ok(attractions) => attractions,
        Err(err) => {
            log::error!("Failed to fetch attractions: {}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch attractions");
        }
    };

    let hotels = match catalog.hotels_for(dest_id, None).await {
        Ok(hotels) => hotels,
        Err(err) => {
            log::error!("Failed to fetch hotels: {}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch hotels");
        }
    };

    HttpResponse::Ok().json(DestinationDetail {
        destination,
        attractions,
        hotels,
    })
}
