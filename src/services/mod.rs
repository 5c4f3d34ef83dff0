pub mod itinerary_service;
pub mod planner;
