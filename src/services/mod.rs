// Service module exports

pub mod conflict;
pub mod gesture;
pub mod grid;
pub mod itinerary;
pub mod notification;
pub mod placement;
pub mod places;
pub mod planner;
pub mod resize;
pub mod schedule;
pub mod settings;
