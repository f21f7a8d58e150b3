//! Replays an NMEA capture from stdin through the decoding pipeline
//!
//! Usage: `nmea-replay [CHUNK_SIZE] < capture.nmea`
//!
//! Reads are cut to `CHUNK_SIZE` bytes (default 64) to mimic the UART.

use std::io::{self, Read};
use std::process::ExitCode;

use boat_gnss::config::GnssConfig;
use boat_gnss::gnss::pipeline::Pipeline;
use boat_gnss::gnss::sink::LogSink;

const DEFAULT_CHUNK_SIZE: usize = 64;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let chunk_size = match std::env::args().nth(1).map(|arg| arg.parse::<usize>()) {
        None => DEFAULT_CHUNK_SIZE,
        Some(Ok(size)) if size > 0 => size,
        Some(_) => {
            log::error!("CHUNK_SIZE must be a positive integer");
            return ExitCode::FAILURE;
        }
    };

    let config = GnssConfig::default();
    let mut pipeline = Pipeline::<_>::new(LogSink::new(config.no_fix_limit), config.topic);

    let mut stdin = io::stdin().lock();
    let mut buffer = vec![0u8; chunk_size];

    loop {
        match stdin.read(&mut buffer) {
            Ok(0) => break,
            Ok(bytes_read) => {
                pipeline.feed(&buffer[..bytes_read]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log::error!("Failed to read stdin: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    // A capture without a trailing newline still ends its last sentence
    pipeline.feed(b"\n");

    let stats = pipeline.stats();
    println!(
        "lines: {}, readings: {}, rejected: {}, ignored: {}, overflows: {}",
        stats.lines, stats.readings, stats.rejected, stats.ignored, stats.overflows
    );

    ExitCode::SUCCESS
}
