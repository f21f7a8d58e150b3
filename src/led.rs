use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::config::BlinkConfig;
use crate::notify::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub enum BlinkState {
    /// Output held low, waiting for a toggle
    Idle,
    /// Square wave on the output
    Enabled,
}

/// LED driver toggled between steady-off and blinking by a [`Notification`]
///
/// A toggle that arrives while blinking is noticed at the end of the
/// current half-period at the latest, and the output is left low.
pub struct Blinker<'a, P, D> {
    pin: P,
    delay: D,
    notification: &'a Notification,
    half_period_ms: u32,
    state: BlinkState,
}

impl<'a, P, D> Blinker<'a, P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Drives the output low before anything else
    pub fn new(
        mut pin: P,
        delay: D,
        notification: &'a Notification,
        config: BlinkConfig,
    ) -> Result<Self, P::Error> {
        pin.set_low()?;

        Ok(Self {
            pin,
            delay,
            notification,
            half_period_ms: config.half_period_ms,
            state: BlinkState::Idle,
        })
    }

    pub fn state(&self) -> BlinkState {
        self.state
    }

    /// One unit of work: a wait while idle, one full period while enabled
    pub async fn step(&mut self) -> Result<BlinkState, P::Error> {
        match self.state {
            BlinkState::Idle => {
                self.notification.wait().await;
                self.enter(BlinkState::Enabled);
            }

            BlinkState::Enabled => {
                self.pin.set_high()?;
                self.delay.delay_ms(self.half_period_ms).await;

                if self.notification.try_take() {
                    self.pin.set_low()?;
                    self.enter(BlinkState::Idle);
                    return Ok(self.state);
                }

                self.pin.set_low()?;
                self.delay.delay_ms(self.half_period_ms).await;

                if self.notification.try_take() {
                    self.enter(BlinkState::Idle);
                }
            }
        }

        Ok(self.state)
    }

    pub async fn run(&mut self) -> Result<(), P::Error> {
        loop {
            self.step().await?;
        }
    }

    fn enter(&mut self, state: BlinkState) {
        crate::log_info!("LED {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}
