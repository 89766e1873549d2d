// Module exports for models

pub mod day_window;
pub mod plan_item;
pub mod settings;
pub mod time_range;
pub mod trip;
