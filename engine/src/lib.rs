pub mod graphics;
pub mod pixels_surface;
pub mod regression;
pub mod surface;
pub mod ui;
