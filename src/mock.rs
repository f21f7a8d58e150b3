//! Test doubles for pins, delays and the GNSS transport

use core::convert::Infallible;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::gnss::error::TransportError;
use crate::gnss::transport::Transport;
use crate::notify::Notification;

/// Output pin recording every level written to it
#[derive(Debug, Clone, Default)]
pub struct MockOutput {
    history: Rc<RefCell<Vec<bool>>>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Levels written so far, oldest first
    pub fn history(&self) -> Vec<bool> {
        self.history.borrow().clone()
    }

    /// Last level written, low if never written
    pub fn level(&self) -> bool {
        self.history.borrow().last().copied().unwrap_or(false)
    }
}

impl ErrorType for MockOutput {
    type Error = Infallible;
}

impl OutputPin for MockOutput {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.history.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.history.borrow_mut().push(true);
        Ok(())
    }
}

/// Input pin replaying a scripted sequence, holding the last level after it
#[derive(Debug, Clone)]
pub struct MockInput {
    levels: VecDeque<bool>,
    last: bool,
}

impl MockInput {
    pub fn new(levels: &[bool]) -> Self {
        Self {
            levels: levels.iter().copied().collect(),
            last: false,
        }
    }
}

impl ErrorType for MockInput {
    type Error = Infallible;
}

impl InputPin for MockInput {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        if let Some(level) = self.levels.pop_front() {
            self.last = level;
        }
        Ok(self.last)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

/// Delay that returns immediately, recording the requested durations
///
/// A hook signals a notification when the delay with the given index
/// (0-based) is requested, standing in for an event arriving mid-sleep.
#[derive(Clone, Default)]
pub struct MockDelay<'a> {
    calls: Rc<RefCell<Vec<u32>>>,
    hooks: Vec<(usize, &'a Notification)>,
}

impl<'a> MockDelay<'a> {
    pub fn new() -> Self {
        Self {
            calls: Rc::default(),
            hooks: Vec::new(),
        }
    }

    pub fn signal_on_call(mut self, index: usize, notification: &'a Notification) -> Self {
        self.hooks.push((index, notification));
        self
    }

    /// Requested delays in milliseconds
    pub fn calls(&self) -> Vec<u32> {
        self.calls.borrow().clone()
    }

    fn record(&mut self, ms: u32) {
        let index = {
            let mut calls = self.calls.borrow_mut();
            calls.push(ms);
            calls.len() - 1
        };

        for (_, notification) in self.hooks.iter().filter(|(at, _)| *at == index) {
            notification.signal();
        }
    }
}

impl DelayNs for MockDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(ms);
    }
}

/// Transport replaying scripted reads; `Ok(0)` (timeout) once exhausted
#[derive(Debug, Default)]
pub struct MockTransport {
    reads: VecDeque<Result<Vec<u8>, TransportError>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk(mut self, chunk: &[u8]) -> Self {
        self.reads.push_back(Ok(chunk.to_vec()));
        self
    }

    pub fn with_error(mut self, error: TransportError) -> Self {
        self.reads.push_back(Err(error));
        self
    }

    pub fn remaining(&self) -> usize {
        self.reads.len()
    }
}

impl Transport for MockTransport {
    async fn read(&mut self, buffer: &mut [u8]) -> Result<usize, TransportError> {
        match self.reads.pop_front() {
            None => Ok(0),
            Some(Err(error)) => Err(error),
            Some(Ok(mut chunk)) => {
                let len = chunk.len().min(buffer.len());
                buffer[..len].copy_from_slice(&chunk[..len]);

                // Whatever didn't fit is delivered by the next read
                if len < chunk.len() {
                    self.reads.push_front(Ok(chunk.split_off(len)));
                }
                Ok(len)
            }
        }
    }
}
