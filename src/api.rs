pub mod camper_dto;
pub mod class_dto;
pub mod schedule_dto;
