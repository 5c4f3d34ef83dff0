use actix_web::web;

use crate::middleware::auth::AuthMiddleware;

pub mod auth;
pub mod bookings;
pub mod destination;
pub mod itinerary;

/// Route table, shared between `main` and the integration tests so both run
/// the same handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(|| async { "OK" })).service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(auth::signup))
                    .route("/signin", web::post().to(auth::signin))
                    .route("/logout", web::post().to(auth::logout))
                    .service(
                        web::resource("/session")
                            .wrap(AuthMiddleware)
                            .route(web::get().to(auth::user_session)),
                    ),
            )
            .service(
                web::scope("/destinations")
                    .route("", web::get().to(destination::get_destinations))
                    .route("/{id}", web::get().to(destination::get_destination))
                    .route(
                        "/{id}/itinerary",
                        web::post().to(itinerary::generate_itinerary),
                    )
                    .service(
                        // Guarded on its exact path so unknown paths under
                        // the scope still fall through to not-found.
                        web::resource("/{id}/bookings")
                            .wrap(AuthMiddleware)
                            .route(web::post().to(bookings::create_booking)),
                    ),
            )
            .service(
                web::scope("/bookings")
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(bookings::list_bookings))
                    .route("/{id}", web::get().to(bookings::get_ticket))
                    .route("/{id}/cancel", web::post().to(bookings::cancel_booking)),
            ),
    );
}
