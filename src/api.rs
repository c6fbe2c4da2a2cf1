pub mod config_dto;
pub mod stream_dto;
pub mod topology_dto;
