/// Why a line did not produce a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub enum DecodeError {
    /// Missing start marker, non-ASCII data or malformed checksum suffix
    InvalidFormat,
    InvalidChecksum,
    MissingField(&'static str), // Specify which field is missing
    InvalidField(&'static str),
    /// Well-formed sentence of a type we don't decode
    UnsupportedSentence,
}

/// Errors surfaced by a byte transport, timeouts excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub enum TransportError {
    /// Receive FIFO overflowed and bytes were lost
    Overflow,
    Framing,
    Parity,
    Other,
}
