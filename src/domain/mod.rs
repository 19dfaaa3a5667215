// Domain layer - Price series, crosshair and view state models
pub mod crosshair;
pub mod price;
pub mod series;
pub mod view;
