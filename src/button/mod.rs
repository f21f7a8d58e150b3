pub mod edge;

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

use crate::config::ButtonConfig;
use crate::notify::Notification;
use edge::{Activation, EdgeDetector};

/// Polls a button and signals a [`Notification`] on every activation
pub struct ButtonMonitor<'a, P, D> {
    pin: P,
    delay: D,
    detector: EdgeDetector,
    notification: &'a Notification,
    poll_interval_ms: u32,
}

impl<'a, P, D> ButtonMonitor<'a, P, D>
where
    P: InputPin,
    D: DelayNs,
{
    /// Reads the pin once to seed the detector
    pub fn new(
        mut pin: P,
        delay: D,
        notification: &'a Notification,
        config: ButtonConfig,
    ) -> Result<Self, P::Error> {
        let initial_level = pin.is_high()?;

        crate::log_info!(
            "Button monitor ready (edge: {:?}, initial level: {}, poll: {} ms)",
            config.edge,
            initial_level,
            config.poll_interval_ms
        );

        Ok(Self {
            pin,
            delay,
            detector: EdgeDetector::new(config.edge, initial_level),
            notification,
            poll_interval_ms: config.poll_interval_ms,
        })
    }

    /// Sample the pin once, signalling on an activation
    pub fn poll_once(&mut self) -> Result<Option<Activation>, P::Error> {
        let level = self.pin.is_high()?;
        let activation = self.detector.poll(level);

        if activation.is_some() {
            crate::log_debug!("Button activated");
            self.notification.signal();
        }

        Ok(activation)
    }

    /// Sample forever at the configured interval
    pub async fn run(&mut self) -> Result<(), P::Error> {
        loop {
            self.poll_once()?;
            self.delay.delay_ms(self.poll_interval_ms).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::button::edge::Edge;
    use crate::mock::{MockDelay, MockInput};

    fn config(edge: Edge) -> ButtonConfig {
        ButtonConfig {
            edge,
            ..ButtonConfig::default()
        }
    }

    #[test]
    fn test_press_signals_once() {
        let notification = Notification::new();
        // Pulled-up button: idle high, pressed low
        let pin = MockInput::new(&[true, true, false, false, false, true]);
        let mut monitor =
            ButtonMonitor::new(pin, MockDelay::new(), &notification, config(Edge::Falling))
                .unwrap();

        let activations = (0..5)
            .filter_map(|_| monitor.poll_once().unwrap())
            .count();

        assert_eq!(activations, 1);
        assert!(notification.try_take());
        assert!(!notification.try_take());
    }

    #[test]
    fn test_pressed_at_startup_is_not_an_activation() {
        let notification = Notification::new();
        let pin = MockInput::new(&[false, false, true, false]);
        let mut monitor =
            ButtonMonitor::new(pin, MockDelay::new(), &notification, config(Edge::Falling))
                .unwrap();

        assert_eq!(monitor.poll_once().unwrap(), None);
        assert_eq!(monitor.poll_once().unwrap(), None);
        assert_eq!(monitor.poll_once().unwrap(), Some(Activation));
    }

    #[test]
    fn test_rising_polarity() {
        let notification = Notification::new();
        let pin = MockInput::new(&[false, true, false, true]);
        let mut monitor =
            ButtonMonitor::new(pin, MockDelay::new(), &notification, config(Edge::Rising))
                .unwrap();

        let activations = (0..3)
            .filter_map(|_| monitor.poll_once().unwrap())
            .count();

        assert_eq!(activations, 2);
        // Two activations, one pending signal
        assert!(notification.try_take());
        assert!(!notification.is_pending());
    }
}
