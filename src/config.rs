use crate::button::edge::Edge;

const BUTTON_POLL_INTERVAL_MS: u32 = 50;
const BLINK_HALF_PERIOD_MS: u32 = 500;
const GNSS_BAUD_RATE: u32 = 9600;
const GNSS_READ_TIMEOUT_MS: u64 = 1000;
const GNSS_TOPIC: &str = "boat/gps";
const GNSS_NO_FIX_LIMIT: u32 = 20;
const GNSS_STATS_INTERVAL_READS: u32 = 600;

#[derive(Debug, Clone, Copy)]
pub struct ButtonConfig {
    pub poll_interval_ms: u32,

    /// Pulled-up buttons read low while pressed, so press is a falling edge
    pub edge: Edge,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: BUTTON_POLL_INTERVAL_MS,
            edge: Edge::Falling,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BlinkConfig {
    pub half_period_ms: u32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            half_period_ms: BLINK_HALF_PERIOD_MS,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GnssConfig {
    pub baud_rate: u32,
    pub read_timeout_ms: u64,

    /// Topic readings are published under
    pub topic: &'static str,

    /// Consecutive RMC fixes without a position before the signal is
    /// reported lost
    pub no_fix_limit: u32,

    /// Transport reads between two statistics reports
    pub stats_interval_reads: u32,
}

impl Default for GnssConfig {
    fn default() -> Self {
        Self {
            baud_rate: GNSS_BAUD_RATE,
            read_timeout_ms: GNSS_READ_TIMEOUT_MS,
            topic: GNSS_TOPIC,
            no_fix_limit: GNSS_NO_FIX_LIMIT,
            stats_interval_reads: GNSS_STATS_INTERVAL_READS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppConfig {
    pub button: ButtonConfig,
    pub blink: BlinkConfig,
    pub gnss: GnssConfig,
}
