use super::pipeline::{Pipeline, PipelineStats};
use super::sink::ReadingSink;
use super::transport::Transport;
use crate::config::GnssConfig;

/// Transport read size
const READ_BUFFER_SIZE: usize = 64;

/// Owns the GNSS transport and pumps it through a [`Pipeline`]
///
/// Pipeline statistics are logged every `stats_interval_reads` reads,
/// timeouts included. An interval of 0 turns the report off.
pub struct GnssReader<T, S> {
    transport: T,
    pipeline: Pipeline<S>,
    read_buffer: [u8; READ_BUFFER_SIZE],

    stats_interval_reads: u32,
    reads_since_report: u32,
    reports: u32,
}

impl<T, S> GnssReader<T, S>
where
    T: Transport,
    S: ReadingSink,
{
    pub fn new(transport: T, sink: S, config: &GnssConfig) -> Self {
        Self {
            transport,
            pipeline: Pipeline::new(sink, config.topic),
            read_buffer: [0; READ_BUFFER_SIZE],
            stats_interval_reads: config.stats_interval_reads,
            reads_since_report: 0,
            reports: 0,
        }
    }

    /// One transport read, returning the number of readings published
    ///
    /// A timeout publishes nothing. A transport error loses the partial
    /// line, since bytes in the middle of it may be missing.
    pub async fn read_once(&mut self) -> usize {
        let published = self.read_and_feed().await;
        self.maybe_report();

        published
    }

    async fn read_and_feed(&mut self) -> usize {
        match self.transport.read(&mut self.read_buffer).await {
            Ok(0) => 0,

            Ok(bytes_read) => self.pipeline.feed(&self.read_buffer[..bytes_read]),

            Err(e) => {
                crate::log_warn!("GNSS transport error: {:?}", e);
                self.pipeline.reset("transport error");
                0
            }
        }
    }

    pub async fn run(&mut self) {
        crate::log_info!("Starting GNSS reader");

        loop {
            self.read_once().await;
        }
    }

    pub fn stats(&self) -> PipelineStats {
        self.pipeline.stats()
    }

    /// Number of statistics reports logged so far
    pub fn reports(&self) -> u32 {
        self.reports
    }

    fn maybe_report(&mut self) {
        if self.stats_interval_reads == 0 {
            return;
        }

        self.reads_since_report += 1;
        if self.reads_since_report < self.stats_interval_reads {
            return;
        }

        self.reads_since_report = 0;
        self.reports = self.reports.wrapping_add(1);

        let stats = self.pipeline.stats();
        crate::log_info!(
            "GNSS stats: lines {} readings {} rejected {} ignored {} overflows {}",
            stats.lines,
            stats.readings,
            stats.rejected,
            stats.ignored,
            stats.overflows
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use embassy_futures::block_on;

    use crate::config::GnssConfig;
    use crate::gnss::error::TransportError;
    use crate::gnss::sink::{ChannelSink, PublicationChannel};
    use crate::mock::MockTransport;

    const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

    #[test]
    fn test_timeout_publishes_nothing() {
        let channel = PublicationChannel::<4>::new();
        let mut reader = GnssReader::new(
            MockTransport::new(),
            ChannelSink::new(&channel),
            &GnssConfig::default(),
        );

        assert_eq!(block_on(reader.read_once()), 0);
        assert_eq!(reader.stats(), PipelineStats::default());
    }

    #[test]
    fn test_sentence_spread_over_reads() {
        let channel = PublicationChannel::<4>::new();
        let transport = MockTransport::new()
            .with_chunk(&GGA[..10])
            .with_chunk(&[])
            .with_chunk(&GGA[10..]);
        let mut reader =
            GnssReader::new(transport, ChannelSink::new(&channel), &GnssConfig::default());

        // The empty read in the middle looks like a timeout
        let published: usize = (0..5).map(|_| block_on(reader.read_once())).sum();

        assert_eq!(published, 1);
        let publication = channel.try_receive().unwrap();
        assert_eq!(publication.topic.as_str(), "boat/gps");
        assert_eq!(publication.reading.kind(), "quality");
    }

    #[test]
    fn test_transport_error_discards_partial_line() {
        let channel = PublicationChannel::<4>::new();
        let transport = MockTransport::new()
            .with_chunk(&GGA[..30])
            .with_error(TransportError::Overflow)
            .with_chunk(&GGA[40..])
            .with_chunk(GGA);
        let mut reader =
            GnssReader::new(transport, ChannelSink::new(&channel), &GnssConfig::default());

        while reader.read_once_remaining() {}

        let stats = reader.stats();
        // Head and tail of the broken sentence never meet
        assert_eq!(stats.readings, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(channel.try_receive().unwrap().reading.kind(), "quality");
        assert!(channel.try_receive().is_err());
    }

    #[test]
    fn test_stats_reported_every_interval() {
        let channel = PublicationChannel::<8>::new();
        let config = GnssConfig {
            stats_interval_reads: 3,
            ..GnssConfig::default()
        };
        let transport = MockTransport::new()
            .with_chunk(GGA)
            .with_chunk(b"$GPGLL,4916.45,N,12311.12,W,225444,A*31\r\n");
        let mut reader = GnssReader::new(transport, ChannelSink::new(&channel), &config);

        block_on(reader.read_once());
        block_on(reader.read_once());
        assert_eq!(reader.reports(), 0);

        // The GGA line needs two reads, the GLL line fits in the third
        block_on(reader.read_once());
        assert_eq!(reader.reports(), 1);
        assert_eq!(reader.stats().readings, 1);
        assert_eq!(reader.stats().ignored, 1);

        // Timeouts count as reads too
        for _ in 0..6 {
            block_on(reader.read_once());
        }
        assert_eq!(reader.reports(), 3);
    }

    #[test]
    fn test_zero_interval_never_reports() {
        let channel = PublicationChannel::<1>::new();
        let config = GnssConfig {
            stats_interval_reads: 0,
            ..GnssConfig::default()
        };
        let mut reader =
            GnssReader::new(MockTransport::new(), ChannelSink::new(&channel), &config);

        for _ in 0..10 {
            block_on(reader.read_once());
        }
        assert_eq!(reader.reports(), 0);
    }

    impl GnssReader<MockTransport, ChannelSink<'_, 4>> {
        fn read_once_remaining(&mut self) -> bool {
            block_on(self.read_once());
            self.transport.remaining() > 0
        }
    }
}
