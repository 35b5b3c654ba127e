//! Bluetooth Low Energy module
//!
//! Defines the GATT service carrying the UART bridge.

pub mod service;

pub use service::UartService;
