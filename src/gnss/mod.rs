pub mod error;
pub mod nmea;
pub mod pipeline;
pub mod reader;
pub mod reading;
pub mod sentence;
pub mod signal;
pub mod sink;
pub mod skyview;
pub mod transport;

// ESP32-specific modules
#[cfg(feature = "esp32")]
pub mod driver;

pub use reading::DecodedReading;
pub use sink::ReadingSink;
