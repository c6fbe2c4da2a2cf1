pub mod calculator;
pub mod delay_model;
pub mod processing_blocking;
pub mod rate_reservation;
