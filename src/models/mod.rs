pub mod booking;
pub mod destination;
pub mod itinerary;
pub mod user;
