// Application state for HTTP handlers
use crate::application::view_service::ViewHandle;

#[derive(Clone)]
pub struct AppState {
    pub view: ViewHandle,
}
