//! Tracks RMC fix health over time

use super::reading::PositionFix;

/// Coordinates this close to 0/0 come from receivers reporting an
/// active fix before they have one
const NULL_ISLAND_EPSILON: f64 = 0.0001;

/// What one RMC fix says about the receiver
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub enum FixStatus {
    /// Valid fix with plausible coordinates
    Located { latitude: f64, longitude: f64 },
    /// Reported valid, but at null island
    Suspect,
    /// No fix, streak still under the limit
    NoFix { streak: u32 },
    /// Streak went over the limit; the count starts again
    SignalLost,
}

/// Counts consecutive RMC fixes without a position
#[derive(Debug, Clone)]
pub struct SignalMonitor {
    streak: u32,
    limit: u32,
}

impl SignalMonitor {
    pub const fn new(limit: u32) -> Self {
        Self { streak: 0, limit }
    }

    pub fn observe(&mut self, fix: &PositionFix) -> FixStatus {
        match fix.position() {
            Some((latitude, longitude))
                if latitude.abs() <= NULL_ISLAND_EPSILON
                    && longitude.abs() <= NULL_ISLAND_EPSILON =>
            {
                FixStatus::Suspect
            }

            Some((latitude, longitude)) => {
                self.streak = 0;
                FixStatus::Located {
                    latitude,
                    longitude,
                }
            }

            None => {
                self.streak += 1;

                if self.streak > self.limit {
                    self.streak = 0;
                    FixStatus::SignalLost
                } else {
                    FixStatus::NoFix {
                        streak: self.streak,
                    }
                }
            }
        }
    }
}
