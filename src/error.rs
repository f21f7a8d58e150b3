/// Startup failures, fatal to the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub enum AppError {
    /// UART could not be configured
    Uart,
    /// A task could not be spawned, the executor is out of task slots
    Spawn,
}
