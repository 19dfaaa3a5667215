// Application layer - Use cases and ports
pub mod frame_renderer;
pub mod loader_service;
pub mod price_history_repository;
pub mod view_service;
