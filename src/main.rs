#![no_std]
#![no_main]

use embassy_executor::Spawner;
use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;
use esp_println as _;

use boat_gnss::app::{self, Board};
use boat_gnss::config::AppConfig;

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    let peripherals = esp_hal::init(esp_hal::Config::default());

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    defmt::info!("hello, boat!");

    let board = Board {
        led: peripherals.GPIO2.into(),
        button: peripherals.GPIO0.into(),
        gnss_uart: peripherals.UART1,
        gnss_rx: peripherals.GPIO16.into(),
    };

    if let Err(e) = app::start(spawner, board, AppConfig::default()) {
        panic!("Startup failed: {:?}", e);
    }
}
