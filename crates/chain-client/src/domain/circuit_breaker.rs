//! Circuit breaker guarding outbound RPC calls.
//!
//! `closed → open → half-open`, `max_failures=5`, `reset_timeout=60s`,
//! `half_open_max_calls=3`. In `open` state every call fails fast without
//! reaching the network.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Copy)]
pub enum BreakerEvent {
    CallSucceeded,
    CallFailed,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    state: BreakerState,
    max_failures: u32,
    reset_timeout: Duration,
    half_open_max_calls: u32,
    consecutive_failures: u32,
    half_open_calls: u32,
    opened_at: Option<Instant>,
}

impl CircuitBreaker {
    pub fn new() -> Self {
        Self::with_params(5, Duration::from_secs(60), 3)
    }

    pub fn with_params(max_failures: u32, reset_timeout: Duration, half_open_max_calls: u32) -> Self {
        Self {
            state: BreakerState::Closed,
            max_failures,
            reset_timeout,
            half_open_max_calls,
            consecutive_failures: 0,
            half_open_calls: 0,
            opened_at: None,
        }
    }

    pub fn state(&self) -> BreakerState {
        self.state
    }

    /// Whether a call is allowed right now. Transitions `open → half-open`
    /// when the reset timeout has elapsed, as a side effect of the check.
    pub fn allow_call(&mut self) -> bool {
        match self.state {
            BreakerState::Closed => true,
            BreakerState::HalfOpen => self.half_open_calls < self.half_open_max_calls,
            BreakerState::Open => {
                let elapsed = self
                    .opened_at
                    .map(|t| t.elapsed() >= self.reset_timeout)
                    .unwrap_or(false);
                if elapsed {
                    self.state = BreakerState::HalfOpen;
                    self.half_open_calls = 0;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record(&mut self, event: BreakerEvent) {
        match (self.state, event) {
            (BreakerState::Closed, BreakerEvent::CallFailed) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures >= self.max_failures {
                    self.trip();
                }
            }
            (BreakerState::Closed, BreakerEvent::CallSucceeded) => {
                self.consecutive_failures = 0;
            }
            (BreakerState::HalfOpen, BreakerEvent::CallSucceeded) => {
                self.half_open_calls += 1;
                if self.half_open_calls >= self.half_open_max_calls {
                    self.close();
                }
            }
            (BreakerState::HalfOpen, BreakerEvent::CallFailed) => {
                self.trip();
            }
            (BreakerState::Open, _) => {}
        }
    }

    fn trip(&mut self) {
        self.state = BreakerState::Open;
        self.opened_at = Some(Instant::now());
        self.half_open_calls = 0;
    }

    fn close(&mut self) {
        self.state = BreakerState::Closed;
        self.consecutive_failures = 0;
        self.half_open_calls = 0;
        self.opened_at = None;
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new()
    }
}
