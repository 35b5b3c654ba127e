#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod uart;

// These modules depend on the BLE stack only available with the embedded feature
#[cfg(feature = "embedded")]
pub mod ble;
#[cfg(feature = "embedded")]
pub mod tasks;
