// Infrastructure layer - External dependencies and adapters
pub mod coindesk_repository;
pub mod config;
pub mod frame_stream;
pub mod http_response;
