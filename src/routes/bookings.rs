use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use mongodb::bson::{oid::ObjectId, DateTime};
use rand::Rng;

use crate::db::store::{BookingStore, CatalogStore, StoreError};
use crate::middleware::auth::Claims;
use crate::models::booking::{Booking, BookingInput, BookingStatus, TicketView};

pub async fn create_booking(
    ledger: web::Data<Arc<dyn BookingStore>>,
    catalog: web::Data<Arc<dyn CatalogStore>>,
    path: web::Path<String>,
    input: web::Json<BookingInput>,
    claims: web::ReqData<Claims>,
) -> impl Responder {
    let dest_id = match ObjectId::parse_str(path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid destination ID"),
    };
    let user_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    let input = input.into_inner();

    // Money fields are never coerced; reject instead.
    if input.amount <= 0 {
        return HttpResponse::BadRequest().body("Amount must be a positive integer");
    }
    if input.end_date < input.start_date {
        return HttpResponse::BadRequest().body("End date must not precede start date");
    }
    let travellers = input.travellers.unwrap_or(1);
    if travellers < 1 {
        return HttpResponse::BadRequest().body("At least one traveller is required");
    }

    if let Err(err) = catalog.find_destination(dest_id).await {
        return match err {
            StoreError::NotFound => HttpResponse::NotFound().body("Destination not found"),
            other => {
                log::error!("Failed to verify destination: {}", other);
                HttpResponse::InternalServerError().body("Failed to verify destination")
            }
        };
    }

    let time = DateTime::now();
    let booking = Booking {
        id: None,
        user_id,
        booking_type: "trip".to_string(),
        item_id: dest_id,
        start_date: input.start_date,
        end_date: input.end_date,
        travellers,
        amount: input.amount,
        status: BookingStatus::Confirmed,
        created_at: Some(time),
        updated_at: Some(time),
    };

    match ledger.insert_booking(&booking).await {
        Ok(booking_id) => HttpResponse::Ok().json(serde_json::json!({
            "booking_id": booking_id.to_hex(),
            "status": "confirmed"
        })),
        Err(err) => {
            log::error!("Failed to create booking: {}", err);
            HttpResponse::InternalServerError().body("Failed to create booking")
        }
    }
}

pub async fn list_bookings(
    ledger: web::Data<Arc<dyn BookingStore>>,
    claims: web::ReqData<Claims>,
) -> impl Responder {
    let user_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    match ledger.bookings_for_user(user_id).await {
        Ok(bookings) => HttpResponse::Ok().json(bookings),
        Err(err) => {
            log::error!("Failed to fetch bookings: {}", err);
            HttpResponse::InternalServerError().body("Failed to fetch bookings")
        }
    }
}

pub async fn get_ticket(
    ledger: web::Data<Arc<dyn BookingStore>>,
    path: web::Path<String>,
    claims: web::ReqData<Claims>,
) -> impl Responder {
    let booking_id = match ObjectId::parse_str(path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid booking ID"),
    };
    let user_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    match ledger.find_booking(booking_id).await {
        // Bookings are scoped to their owner; someone else's booking looks
        // like no booking at all.
        Ok(booking) if booking.user_id != user_id => {
            HttpResponse::NotFound().body("Booking not found")
        }
        Ok(booking) => {
            let ticket_no = rand::thread_rng().gen_range(100_000..=999_999);
            HttpResponse::Ok().json(TicketView { ticket_no, booking })
        }
        Err(StoreError::NotFound) => HttpResponse::NotFound().body("Booking not found"),
        Err(err) => {
            log::error!("Failed to fetch booking: {}", err);
            HttpResponse::InternalServerError().body("Failed to fetch booking")
        }
    }
}

pub async fn cancel_booking(
    ledger: web::Data<Arc<dyn BookingStore>>,
    path: web::Path<String>,
    claims: web::ReqData<Claims>,
) -> impl Responder {
    let booking_id = match ObjectId::parse_str(path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid booking ID"),
    };
    let user_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    let booking = match ledger.find_booking(booking_id).await {
        Ok(booking) => booking,
        Err(StoreError::NotFound) => return HttpResponse::NotFound().body("Booking not found"),
        Err(err) => {
            log::error!("Failed to fetch booking: {}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch booking");
        }
    };

    // Only the owner may cancel. Cancellation is terminal and soft: the
    // record stays for listing, only the status flips.
    if booking.user_id != user_id {
        return HttpResponse::Forbidden().body("Forbidden");
    }

    if booking.status == BookingStatus::Cancelled {
        return HttpResponse::Ok().json(serde_json::json!({ "status": "cancelled" }));
    }

    match ledger.mark_cancelled(booking_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "cancelled" })),
        Err(StoreError::NotFound) => HttpResponse::NotFound().body("Booking not found"),
        Err(err) => {
            log::error!("Failed to cancel booking: {}", err);
            HttpResponse::InternalServerError().body("Failed to cancel booking")
        }
    }
}
