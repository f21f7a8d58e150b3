use embassy_time::{with_timeout, Duration};
use esp_hal::{
    gpio::AnyPin,
    peripherals::UART1,
    uart::{self, RxConfig, RxError, UartRx},
    Async,
};

use super::error::TransportError;
use super::transport::Transport;
use crate::config::GnssConfig;
use crate::error::AppError;

pub struct Config {
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    pub rx_pin: AnyPin,
}

impl Config {
    pub fn new(gnss: &GnssConfig, rx_pin: AnyPin) -> Self {
        Self {
            baud_rate: gnss.baud_rate,
            read_timeout_ms: gnss.read_timeout_ms,
            rx_pin,
        }
    }
}

/// Receive half of the UART the GNSS module talks on
pub struct UartTransport {
    uart: UartRx<'static, Async>,
    timeout: Duration,
}

impl UartTransport {
    pub fn new(uart1: UART1, config: Config) -> Result<Self, AppError> {
        let uart_config = uart::Config::default()
            .with_baudrate(config.baud_rate)
            .with_rx(RxConfig::default().with_fifo_full_threshold(1024));

        let uart = UartRx::new(uart1, uart_config)
            .map_err(|_| AppError::Uart)?
            .with_rx(config.rx_pin)
            .into_async();

        crate::log_info!("GNSS UART ready at {} baud", config.baud_rate);

        Ok(Self {
            uart,
            timeout: Duration::from_millis(config.read_timeout_ms),
        })
    }

    fn drain_uart_buffer(&mut self) {
        crate::log_debug!("Draining UART buffer");

        let mut scratch = [0u8; 128];
        loop {
            match self.uart.read_buffered(&mut scratch) {
                Ok(0) => break,
                Ok(_) => continue,
                Err(err) => {
                    crate::log_error!("UART read error while draining: {}", err);
                    break;
                }
            }
        }
    }
}

impl From<RxError> for TransportError {
    fn from(e: RxError) -> Self {
        match e {
            RxError::FifoOverflowed => TransportError::Overflow,
            RxError::FrameFormatViolated => TransportError::Framing,
            RxError::ParityMismatch => TransportError::Parity,
            _ => TransportError::Other,
        }
    }
}

impl Transport for UartTransport {
    async fn read(&mut self, buffer: &mut [u8]) -> Result<usize, TransportError> {
        let result = match with_timeout(self.timeout, self.uart.read_async(buffer)).await {
            Ok(result) => result,
            Err(_) => return Ok(0),
        };

        result.map_err(|e| {
            // Stale bytes in the FIFO belong to lines we already lost
            if let RxError::FifoOverflowed = e {
                self.drain_uart_buffer();
            }
            TransportError::from(e)
        })
    }
}
