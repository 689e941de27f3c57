pub mod clock;
pub mod detection;
pub mod detection_http;
pub mod levels;
pub mod motion_api;
pub mod path;
pub mod phase;
pub mod serde_duration;
pub mod settings;
pub mod trace_core;
pub mod trace_ui;
