use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use heapless::Vec;

/// Maximum number of satellites carried by one GSV message
pub const SATELLITES_PER_MESSAGE: usize = 4;

/// Source constellation of a sentence, taken from the two-letter talker id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub enum Talker {
    /// `GP`
    Gps,
    /// `GL`
    Glonass,
    /// `GA`
    Galileo,
    /// `GB` or `BD`
    BeiDou,
    /// `GN`, multi-constellation solution
    Combined,
    Other([u8; 2]),
}

impl Talker {
    pub fn from_id(id: [u8; 2]) -> Self {
        match &id {
            b"GP" => Talker::Gps,
            b"GL" => Talker::Glonass,
            b"GA" => Talker::Galileo,
            b"GB" | b"BD" => Talker::BeiDou,
            b"GN" => Talker::Combined,
            _ => Talker::Other(id),
        }
    }
}

/// Fix quality reported by GGA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub enum GpsQuality {
    Invalid,
    Gps,
    Differential,
    Pps,
    RealTimeKinematic,
    FloatRtk,
    Estimated,
    Manual,
    Simulation,
}

impl GpsQuality {
    pub fn from_digit(digit: u8) -> Option<Self> {
        Some(match digit {
            0 => GpsQuality::Invalid,
            1 => GpsQuality::Gps,
            2 => GpsQuality::Differential,
            3 => GpsQuality::Pps,
            4 => GpsQuality::RealTimeKinematic,
            5 => GpsQuality::FloatRtk,
            6 => GpsQuality::Estimated,
            7 => GpsQuality::Manual,
            8 => GpsQuality::Simulation,
            _ => return None,
        })
    }

    pub fn has_fix(&self) -> bool {
        *self != GpsQuality::Invalid
    }
}

/// RMC - recommended minimum navigation data
///
/// `latitude` and `longitude` are only present when the receiver reported
/// an active (`A`) fix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub struct PositionFix {
    pub talker: Talker,
    pub valid: bool,
    #[cfg_attr(feature = "esp32", defmt(Debug2Format))]
    pub time: Option<NaiveTime>,
    #[cfg_attr(feature = "esp32", defmt(Debug2Format))]
    pub date: Option<NaiveDate>,
    /// Decimal degrees, south negative
    pub latitude: Option<f64>,
    /// Decimal degrees, west negative
    pub longitude: Option<f64>,
    pub speed_knots: Option<f32>,
    /// Course over ground, degrees true
    pub course: Option<f32>,
}

impl PositionFix {
    /// Latitude and longitude, when the fix is valid
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.valid, self.latitude, self.longitude) {
            (true, Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn datetime(&self) -> Option<NaiveDateTime> {
        Some(self.date?.and_time(self.time?))
    }
}

/// GGA - fix quality, satellites in use and altitude
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub struct FixQuality {
    pub talker: Talker,
    #[cfg_attr(feature = "esp32", defmt(Debug2Format))]
    pub time: Option<NaiveTime>,
    pub quality: GpsQuality,
    pub satellites: Option<u8>,
    pub hdop: Option<f32>,
    /// Metres above mean sea level
    pub altitude: Option<f32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub struct Satellite {
    /// PRN / satellite id
    pub id: u16,
    /// Degrees above the horizon, 0..=90
    pub elevation: Option<u8>,
    /// Degrees from true north, 0..=359
    pub azimuth: Option<u16>,
    /// Signal to noise ratio in dB-Hz, absent when not tracking
    pub snr: Option<u8>,
}

/// GSV - one message of a satellites-in-view sequence
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub struct SatelliteView {
    pub talker: Talker,
    /// Number of messages in this sequence
    pub total_messages: u8,
    /// 1-based index of this message
    pub message_index: u8,
    pub satellites_in_view: u8,
    pub satellites: Vec<Satellite, SATELLITES_PER_MESSAGE>,
}

impl SatelliteView {
    pub fn is_last(&self) -> bool {
        self.message_index == self.total_messages
    }
}

/// A validated reading produced from one sentence
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub enum DecodedReading {
    PositionFix(PositionFix),
    FixQuality(FixQuality),
    SatelliteView(SatelliteView),
}

impl DecodedReading {
    /// Short name of the sentence kind, for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            DecodedReading::PositionFix(_) => "position",
            DecodedReading::FixQuality(_) => "quality",
            DecodedReading::SatelliteView(_) => "satellites",
        }
    }
}
