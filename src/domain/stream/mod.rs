pub mod priority;
pub mod stream;
pub mod stream_store;
