pub mod analysis;
pub mod config;
pub mod delay;
pub mod network;
pub mod queue;
pub mod stream;
pub mod utils;
