use super::error::DecodeError;
use super::nmea::parse_sentence;
use super::sentence::{LineFramer, MAX_NMEA_SENTENCE_SIZE};
use super::sink::ReadingSink;

/// Counters over everything a pipeline has seen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub struct PipelineStats {
    /// Complete lines out of the framer
    pub lines: u32,
    /// Readings handed to the sink
    pub readings: u32,
    /// Malformed lines, bad checksums and bad fields
    pub rejected: u32,
    /// Well-formed sentences of a type we don't decode
    pub ignored: u32,
    /// Lines lost to framer overflow
    pub overflows: u32,
}

/// Byte chunks in, readings out
///
/// Frames the stream into lines, decodes each line and publishes whatever
/// decodes to the sink under a fixed topic.
pub struct Pipeline<S, const N: usize = MAX_NMEA_SENTENCE_SIZE> {
    framer: LineFramer<N>,
    sink: S,
    topic: &'static str,
    stats: PipelineStats,
}

impl<S: ReadingSink, const N: usize> Pipeline<S, N> {
    pub fn new(sink: S, topic: &'static str) -> Self {
        Self {
            framer: LineFramer::new(),
            sink,
            topic,
            stats: PipelineStats::default(),
        }
    }

    /// Process one chunk, returning the number of readings published
    pub fn feed(&mut self, chunk: &[u8]) -> usize {
        let mut published = 0;

        for line in self.framer.push(chunk) {
            self.stats.lines = self.stats.lines.wrapping_add(1);

            let result = line
                .as_str()
                .ok_or(DecodeError::InvalidFormat)
                .and_then(parse_sentence);

            match result {
                Ok(reading) => {
                    self.sink.publish(self.topic, &reading);
                    self.stats.readings = self.stats.readings.wrapping_add(1);
                    published += 1;
                }

                Err(DecodeError::UnsupportedSentence) => {
                    self.stats.ignored = self.stats.ignored.wrapping_add(1);
                }

                Err(e) => {
                    crate::log_debug!("Rejected sentence: {:?}", e);
                    self.stats.rejected = self.stats.rejected.wrapping_add(1);
                }
            }
        }

        self.stats.overflows = self.framer.overflows();

        published
    }

    /// Drop any partial line, e.g. after the transport lost bytes
    pub fn reset(&mut self, reason: &str) {
        self.framer.reset(reason);
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::gnss::reading::DecodedReading;

    const GGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
    const RMC_VANCOUVER: &str =
        "$GPRMC,225446,A,4916.45,N,12311.12,W,000.5,054.7,191194,020.3,E*68";
    const GLL: &str = "$GPGLL,4916.45,N,12311.12,W,225444,A*31";

    #[derive(Default)]
    struct Recorder(std::vec::Vec<DecodedReading>);

    impl ReadingSink for Recorder {
        fn publish(&mut self, topic: &str, reading: &DecodedReading) {
            assert_eq!(topic, "boat/gps");
            self.0.push(reading.clone());
        }
    }

    fn stream(lines: &[&str]) -> std::vec::Vec<u8> {
        lines
            .iter()
            .flat_map(|line| line.bytes().chain(*b"\r\n"))
            .collect()
    }

    #[test]
    fn test_decodes_every_line_in_a_chunk() {
        let mut pipeline = Pipeline::<_>::new(Recorder::default(), "boat/gps");

        assert_eq!(pipeline.feed(&stream(&[GGA, RMC_VANCOUVER])), 2);

        let stats = pipeline.stats();
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.readings, 2);
        assert_eq!(pipeline.sink().0[0].kind(), "quality");
        assert_eq!(pipeline.sink().0[1].kind(), "position");
    }

    #[test]
    fn test_counts_rejected_and_ignored() {
        let mut pipeline = Pipeline::<_>::new(Recorder::default(), "boat/gps");

        let corrupted = RMC_VANCOUVER.replace("4916.45", "4916.46");
        pipeline.feed(&stream(&[GLL, &corrupted, "garbage", GGA]));

        let stats = pipeline.stats();
        assert_eq!(stats.lines, 4);
        assert_eq!(stats.readings, 1);
        assert_eq!(stats.ignored, 1);
        assert_eq!(stats.rejected, 2);
    }

    #[test]
    fn test_split_reads_reassemble() {
        let mut pipeline = Pipeline::<_>::new(Recorder::default(), "boat/gps");
        let bytes = stream(&[RMC_VANCOUVER]);

        let published: usize = bytes.chunks(7).map(|chunk| pipeline.feed(chunk)).sum();
        assert_eq!(published, 1);

        let Some(DecodedReading::PositionFix(fix)) = pipeline.sink().0.first() else {
            panic!("expected a position fix");
        };
        let (latitude, longitude) = fix.position().unwrap();
        assert!((latitude - 49.27417).abs() < 1e-5);
        assert!((longitude + 123.18533).abs() < 1e-5);
    }

    #[test]
    fn test_overflow_then_valid_line() {
        let mut pipeline = Pipeline::<_>::new(Recorder::default(), "boat/gps");

        let mut bytes = std::vec![b'$'; 300];
        bytes.extend(stream(&[GGA, GGA]));

        // The first GGA shares a line with the junk and is lost with it
        assert_eq!(pipeline.feed(&bytes), 1);
        assert_eq!(pipeline.stats().overflows, 1);
        assert_eq!(pipeline.stats().lines, 1);
    }

    #[test]
    fn test_reset_discards_partial_line() {
        let mut pipeline = Pipeline::<_>::new(Recorder::default(), "boat/gps");

        pipeline.feed(&GGA.as_bytes()[..20]);
        pipeline.reset("test");
        pipeline.feed(&stream(&[RMC_VANCOUVER]));

        let stats = pipeline.stats();
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.rejected, 0);
        assert_eq!(pipeline.into_sink().0.len(), 1);
    }
}
