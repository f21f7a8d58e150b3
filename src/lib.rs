#![cfg_attr(not(any(test, feature = "std")), no_std)]

// Macros first so every module below can use them
pub mod logging;

pub mod button;
pub mod config;
pub mod error;
pub mod gnss;
pub mod led;
pub mod notify;

// ESP32-specific modules
#[cfg(feature = "esp32")]
pub mod app;

#[cfg(test)]
mod mock;

// Links the std critical-section implementation used by embassy-sync
#[cfg(test)]
use critical_section as _;
