use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Sender, TrySendError};
use heapless::String;

use super::reading::DecodedReading;
use super::signal::{FixStatus, SignalMonitor};
use super::skyview::SkyView;

/// Destination for decoded readings
///
/// Publishing is fire-and-forget: a sink that cannot keep up drops
/// readings rather than blocking the receiver.
pub trait ReadingSink {
    fn publish(&mut self, topic: &str, reading: &DecodedReading);
}

impl<S: ReadingSink + ?Sized> ReadingSink for &mut S {
    fn publish(&mut self, topic: &str, reading: &DecodedReading) {
        (**self).publish(topic, reading)
    }
}

/// Every reading goes to both sinks, first one first
impl<A: ReadingSink, B: ReadingSink> ReadingSink for (A, B) {
    fn publish(&mut self, topic: &str, reading: &DecodedReading) {
        self.0.publish(topic, reading);
        self.1.publish(topic, reading);
    }
}

/// Console sink
///
/// GSV messages are gathered into a full sky table which is logged once
/// the sequence completes. RMC fixes go through a [`SignalMonitor`] so a
/// long run without a fix is reported as a lost signal.
pub struct LogSink {
    sky: SkyView,
    signal: SignalMonitor,
    signal_losses: u32,
}

impl LogSink {
    /// `no_fix_limit`: consecutive RMC fixes without a position before
    /// warning about the signal
    pub const fn new(no_fix_limit: u32) -> Self {
        Self {
            sky: SkyView::new(),
            signal: SignalMonitor::new(no_fix_limit),
            signal_losses: 0,
        }
    }

    /// Number of lost-signal warnings issued so far
    pub fn signal_losses(&self) -> u32 {
        self.signal_losses
    }
}

impl ReadingSink for LogSink {
    fn publish(&mut self, topic: &str, reading: &DecodedReading) {
        match reading {
            DecodedReading::PositionFix(fix) => match self.signal.observe(fix) {
                FixStatus::Located {
                    latitude,
                    longitude,
                } => crate::log_info!(
                    "[{}] {:?} position {} {} speed {:?} kn course {:?}",
                    topic,
                    fix.talker,
                    latitude,
                    longitude,
                    fix.speed_knots,
                    fix.course
                ),
                FixStatus::Suspect => {
                    crate::log_warn!("[{}] {:?} invalid coordinates (0, 0)", topic, fix.talker)
                }
                FixStatus::NoFix { streak } => {
                    crate::log_info!("[{}] {:?} no fix ({})", topic, fix.talker, streak)
                }
                FixStatus::SignalLost => {
                    self.signal_losses = self.signal_losses.wrapping_add(1);
                    crate::log_warn!("[{}] Lost GPS signal or antenna issue", topic);
                }
            },

            DecodedReading::FixQuality(quality) => crate::log_info!(
                "[{}] {:?} quality {:?} satellites {:?} hdop {:?} altitude {:?} m",
                topic,
                quality.talker,
                quality.quality,
                quality.satellites,
                quality.hdop,
                quality.altitude
            ),

            DecodedReading::SatelliteView(view) => {
                crate::log_debug!(
                    "[{}] {:?} GSV {}/{}",
                    topic,
                    view.talker,
                    view.message_index,
                    view.total_messages
                );

                if let Some(satellites) = self.sky.update(view) {
                    crate::log_info!(
                        "[{}] {:?} sky: {} satellites",
                        topic,
                        view.talker,
                        satellites.len()
                    );

                    for satellite in satellites {
                        crate::log_info!(
                            "  #{} elevation {:?} azimuth {:?} snr {:?}",
                            satellite.id,
                            satellite.elevation,
                            satellite.azimuth,
                            satellite.snr
                        );
                    }
                }
            }
        }
    }
}

pub const MAX_TOPIC_LEN: usize = 32;

/// A reading queued for a network publisher
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub struct Publication {
    pub topic: String<MAX_TOPIC_LEN>,
    pub reading: DecodedReading,
}

pub type PublicationChannel<const N: usize> = Channel<CriticalSectionRawMutex, Publication, N>;

/// Hands readings to a publisher task through a bounded channel
///
/// Never waits: when the channel is full the reading is dropped and
/// counted.
pub struct ChannelSink<'a, const N: usize> {
    sender: Sender<'a, CriticalSectionRawMutex, Publication, N>,
    dropped: u32,
}

impl<'a, const N: usize> ChannelSink<'a, N> {
    pub fn new(channel: &'a PublicationChannel<N>) -> Self {
        Self {
            sender: channel.sender(),
            dropped: 0,
        }
    }

    /// Readings dropped because the channel was full or the topic too long
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<const N: usize> ReadingSink for ChannelSink<'_, N> {
    fn publish(&mut self, topic: &str, reading: &DecodedReading) {
        let mut publication_topic = String::new();
        if publication_topic.push_str(topic).is_err() {
            crate::log_warn!("Topic too long, dropping reading");
            self.dropped = self.dropped.wrapping_add(1);
            return;
        }

        let publication = Publication {
            topic: publication_topic,
            reading: reading.clone(),
        };

        if let Err(TrySendError::Full(_)) = self.sender.try_send(publication) {
            crate::log_debug!("Publish channel full, dropping {}", reading.kind());
            self.dropped = self.dropped.wrapping_add(1);
        }
    }
}
