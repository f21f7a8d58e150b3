/// Which transition of the sampled level counts as an activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub enum Edge {
    /// low -> high
    Rising,
    /// high -> low
    Falling,
}

impl Edge {
    fn active_level(&self) -> bool {
        matches!(self, Edge::Rising)
    }
}

/// One qualifying transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "esp32", derive(defmt::Format))]
pub struct Activation;

/// Turns periodic samples of a digital input into discrete activations
///
/// Debouncing comes only from the sampling period: a bounce that settles
/// between two samples is never seen.
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    edge: Edge,
    last_level: bool,
}

impl EdgeDetector {
    /// `initial_level` must be a real read of the input
    pub fn new(edge: Edge, initial_level: bool) -> Self {
        Self {
            edge,
            last_level: initial_level,
        }
    }

    pub fn poll(&mut self, level: bool) -> Option<Activation> {
        let active = self.edge.active_level();
        let fired = self.last_level != active && level == active;

        self.last_level = level;

        fired.then_some(Activation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(edge: Edge, samples: &[bool]) -> usize {
        let mut detector = EdgeDetector::new(edge, samples[0]);
        samples[1..]
            .iter()
            .filter_map(|&level| detector.poll(level))
            .count()
    }

    #[test]
    fn test_rising_edge_fires_once_per_transition() {
        let samples = [false, false, true, true, true, false, true, false];
        assert_eq!(count(Edge::Rising, &samples), 2);
    }

    #[test]
    fn test_falling_edge_ignores_rising() {
        let samples = [true, true, false, false, true, true, false];
        assert_eq!(count(Edge::Falling, &samples), 2);
        assert_eq!(count(Edge::Rising, &samples), 1);
    }

    #[test]
    fn test_initial_level_is_not_an_edge() {
        // Input already active at startup
        let mut detector = EdgeDetector::new(Edge::Rising, true);
        assert_eq!(detector.poll(true), None);
        assert_eq!(detector.poll(false), None);
        assert_eq!(detector.poll(true), Some(Activation));
    }

    #[test]
    fn test_count_matches_sampled_transitions() {
        // Pseudo random input, counted against the sampled sequence
        let mut state = 0x1234_5678u32;
        let samples: std::vec::Vec<bool> = (0..500)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state & 1 == 1
            })
            .collect();

        let expected_rising = samples.windows(2).filter(|w| !w[0] && w[1]).count();
        let expected_falling = samples.windows(2).filter(|w| w[0] && !w[1]).count();

        assert_eq!(count(Edge::Rising, &samples), expected_rising);
        assert_eq!(count(Edge::Falling, &samples), expected_falling);
    }

    #[test]
    fn test_bounce_between_samples_is_invisible() {
        // Physical signal bounces every 10 ms, sampled every 50 ms
        let physical: std::vec::Vec<bool> = (0..200)
            .map(|ms| match ms {
                0..=49 => false,
                50..=89 => (ms / 10) % 2 == 1,
                _ => true,
            })
            .collect();
        let sampled: std::vec::Vec<bool> = physical.iter().step_by(50).copied().collect();

        assert_eq!(sampled, [false, true, true, true]);
        assert_eq!(count(Edge::Rising, &sampled), 1);
    }
}
