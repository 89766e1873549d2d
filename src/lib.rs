// Trip Planner Library
// Timeline placement and conflict resolution for trip itineraries

pub mod models;
pub mod services;
pub mod utils;
