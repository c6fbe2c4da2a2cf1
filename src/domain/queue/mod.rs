pub mod admission;
pub mod queue_store;
