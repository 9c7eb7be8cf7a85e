//! First-run greeting countdown.
//!
//! The sequencer never sleeps. The front-end feeds elapsed frame time into
//! [`CountdownSequencer::advance`] and renders whatever steps come back.

use std::time::Duration;

/// Count shown when a sequence starts.
pub const COUNTDOWN_FROM: u8 = 5;
pub const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

/// Greeting progress.
///
/// `Counting(0)` is transient: the tick that reaches it settles into `Done`
/// before returning, so callers only ever observe `Counting(5..=1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountdownState {
    #[default]
    Idle,
    Counting(u8),
    Done,
}

/// Observable effect of a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Replace the countdown line with this count.
    Show(u8),
    /// Clear the greeting and hand over to the prompt.
    Finished,
}

#[derive(Debug, Clone)]
pub struct CountdownSequencer {
    state: CountdownState,
    elapsed: Duration,
    interval: Duration,
}

impl Default for CountdownSequencer {
    fn default() -> Self {
        Self::new(COUNTDOWN_INTERVAL)
    }
}

impl CountdownSequencer {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            state: CountdownState::Idle,
            elapsed: Duration::ZERO,
            interval,
        }
    }

    #[must_use]
    pub fn state(&self) -> CountdownState {
        self.state
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == CountdownState::Done
    }

    /// Leave `Idle`. A returning identity skips straight to `Done`.
    /// Has no effect once started.
    pub fn start(&mut self, returning: bool) -> Option<CountdownStep> {
        if self.state != CountdownState::Idle {
            return None;
        }
        self.elapsed = Duration::ZERO;
        if returning {
            self.state = CountdownState::Done;
            Some(CountdownStep::Finished)
        } else {
            self.state = CountdownState::Counting(COUNTDOWN_FROM);
            Some(CountdownStep::Show(COUNTDOWN_FROM))
        }
    }

    /// One interval has passed.
    pub fn tick(&mut self) -> Option<CountdownStep> {
        let CountdownState::Counting(n) = self.state else {
            return None;
        };
        self.state = CountdownState::Counting(n.saturating_sub(1));
        self.settle()
    }

    /// Leaving `Counting(0)` does not wait for an interval.
    fn settle(&mut self) -> Option<CountdownStep> {
        match self.state {
            CountdownState::Counting(0) => {
                self.state = CountdownState::Done;
                Some(CountdownStep::Finished)
            }
            CountdownState::Counting(n) => Some(CountdownStep::Show(n)),
            CountdownState::Idle | CountdownState::Done => None,
        }
    }

    /// Accumulate frame time and emit one tick per whole interval.
    pub fn advance(&mut self, delta: Duration) -> Vec<CountdownStep> {
        if !matches!(self.state, CountdownState::Counting(_)) {
            return Vec::new();
        }
        self.elapsed = self.elapsed.saturating_add(delta);
        let mut steps = Vec::new();
        while self.elapsed >= self.interval && !self.is_done() {
            self.elapsed -= self.interval;
            steps.extend(self.tick());
        }
        steps
    }
}
