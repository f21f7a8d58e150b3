//! Reassembles GSV sequences into one satellite table per talker

use heapless::Vec;

use super::reading::{Satellite, SatelliteView, Talker};

/// GSV sequences are at most 9 messages of 4 satellites
pub const MAX_SKY_SATELLITES: usize = 36;

/// Constellations tracked at the same time
const MAX_TALKERS: usize = 4;

struct Sequence {
    talker: Talker,
    total_messages: u8,

    /// Index of the message expected next, 0 once complete or broken
    next_index: u8,

    satellites: Vec<Satellite, MAX_SKY_SATELLITES>,
}

/// Collects the per-message satellites of a GSV sequence
///
/// A sequence is only reported once all its messages arrived in order.
/// A missing or repeated message drops the sequence until the next first
/// message.
#[derive(Default)]
pub struct SkyView {
    sequences: Vec<Sequence, MAX_TALKERS>,
}

impl SkyView {
    pub const fn new() -> Self {
        Self {
            sequences: Vec::new(),
        }
    }

    /// Add one message; returns the whole table when it completes a sequence
    pub fn update(&mut self, view: &SatelliteView) -> Option<&[Satellite]> {
        let slot = self.slot_for(view)?;
        let sequence = &mut self.sequences[slot];

        for satellite in &view.satellites {
            if sequence.satellites.push(*satellite).is_err() {
                crate::log_debug!(
                    "GSV sequence over {} satellites, dropping",
                    MAX_SKY_SATELLITES
                );
                sequence.next_index = 0;
                return None;
            }
        }

        if view.is_last() {
            sequence.next_index = 0;
            Some(sequence.satellites.as_slice())
        } else {
            sequence.next_index += 1;
            None
        }
    }

    fn slot_for(&mut self, view: &SatelliteView) -> Option<usize> {
        let existing = self
            .sequences
            .iter()
            .position(|sequence| sequence.talker == view.talker);

        if view.message_index == 1 {
            let fresh = Sequence {
                talker: view.talker,
                total_messages: view.total_messages,
                next_index: 1,
                satellites: Vec::new(),
            };

            return match existing {
                Some(slot) => {
                    self.sequences[slot] = fresh;
                    Some(slot)
                }
                None => {
                    if self.sequences.is_full() {
                        self.sequences.remove(0);
                    }
                    self.sequences.push(fresh).ok()?;
                    Some(self.sequences.len() - 1)
                }
            };
        }

        let slot = existing?;
        let sequence = &mut self.sequences[slot];

        if sequence.next_index == view.message_index
            && sequence.total_messages == view.total_messages
        {
            Some(slot)
        } else {
            if sequence.next_index != 0 {
                crate::log_debug!(
                    "GSV message {} of {} out of sequence, dropping",
                    view.message_index,
                    view.total_messages
                );
            }
            sequence.next_index = 0;
            None
        }
    }
}
