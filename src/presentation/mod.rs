// Presentation layer - Rendering and HTTP surface
pub mod app_state;
pub mod handlers;
pub mod layout;
pub mod page;
pub mod renderer;
