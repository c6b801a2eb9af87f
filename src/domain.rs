pub mod camper;
pub mod catalog;
pub mod engine;
pub mod roster;
pub mod schedule;
pub mod search;
pub mod utils;
