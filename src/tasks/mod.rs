//! Embassy tasks module
//!
//! Contains the async tasks for the firmware, organised by functionality.

pub mod app;
pub mod ble;

pub use app::app_task;
pub use ble::ble_task;
