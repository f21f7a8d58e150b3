//! Composition root: builds every component from the board's peripherals
//! and hands each one to its own task

use embassy_executor::Spawner;
use embassy_time::Delay;
use esp_hal::gpio::{AnyPin, Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::peripherals::UART1;
use static_cell::StaticCell;

use crate::button::ButtonMonitor;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::gnss::driver::{self, UartTransport};
use crate::gnss::reader::GnssReader;
use crate::gnss::sink::LogSink;
use crate::led::Blinker;
use crate::notify::Notification;

type Button = ButtonMonitor<'static, Input<'static>, Delay>;
type Led = Blinker<'static, Output<'static>, Delay>;
type Gnss = GnssReader<UartTransport, LogSink>;

/// Peripherals the firmware takes ownership of
pub struct Board {
    /// Status LED, active high
    pub led: AnyPin,
    /// Push button to ground, internal pull-up
    pub button: AnyPin,
    pub gnss_uart: UART1,
    pub gnss_rx: AnyPin,
}

static BUTTON_PRESSED: StaticCell<Notification> = StaticCell::new();

pub fn start(spawner: Spawner, board: Board, config: AppConfig) -> Result<(), AppError> {
    let button_pressed: &'static Notification = BUTTON_PRESSED.init(Notification::new());

    let led = Output::new(board.led, Level::Low, OutputConfig::default());
    let button = Input::new(board.button, InputConfig::default().with_pull(Pull::Up));

    let blinker = match Blinker::new(led, Delay, button_pressed, config.blink) {
        Ok(blinker) => blinker,
        Err(never) => match never {},
    };
    let monitor = match ButtonMonitor::new(button, Delay, button_pressed, config.button) {
        Ok(monitor) => monitor,
        Err(never) => match never {},
    };

    let transport = UartTransport::new(
        board.gnss_uart,
        driver::Config::new(&config.gnss, board.gnss_rx),
    )?;
    let reader = GnssReader::new(
        transport,
        LogSink::new(config.gnss.no_fix_limit),
        &config.gnss,
    );

    crate::log_info!("Spawning tasks");

    spawner
        .spawn(button_task(monitor))
        .map_err(|_| AppError::Spawn)?;
    spawner
        .spawn(led_task(blinker))
        .map_err(|_| AppError::Spawn)?;
    spawner
        .spawn(gnss_task(reader))
        .map_err(|_| AppError::Spawn)?;

    Ok(())
}

#[embassy_executor::task]
async fn button_task(mut monitor: Button) {
    crate::log_info!("Starting button task");

    match monitor.run().await {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

#[embassy_executor::task]
async fn led_task(mut blinker: Led) {
    crate::log_info!("Starting LED task");

    match blinker.run().await {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

#[embassy_executor::task]
async fn gnss_task(mut reader: Gnss) {
    crate::log_info!("Starting GNSS task");

    reader.run().await;
}
