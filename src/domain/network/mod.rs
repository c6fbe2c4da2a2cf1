pub mod device;
pub mod link;
pub mod router;
pub mod topology;
