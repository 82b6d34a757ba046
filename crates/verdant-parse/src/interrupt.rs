use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::error::HaltReason;

/// Clock reads are spaced out by this many checks.
const CLOCK_INTERVAL: u32 = 100;

/// Cooperative halting for engines.
///
/// Engines call [`Interrupt::check`] at their checkpoints and unwind to a
/// resumable state once it returns `true`.
#[derive(Debug)]
pub struct Interrupt {
    deadline: Option<Instant>,
    flag: Option<Arc<AtomicUsize>>,
    checks: u32,
    halted: Option<HaltReason>,
}

impl Interrupt {
    pub(crate) fn new(timeout: Duration, flag: Option<Arc<AtomicUsize>>) -> Self {
        let deadline = if timeout.is_zero() { None } else { Instant::now().checked_add(timeout) };
        Self { deadline, flag, checks: 0, halted: None }
    }

    /// Never halts.
    pub fn never() -> Self {
        Self::new(Duration::ZERO, None)
    }

    /// Returns `true` once the parse has to stop. Stays `true` afterwards.
    pub fn check(&mut self) -> bool {
        if self.halted.is_some() {
            return true;
        }

        if let Some(flag) = &self.flag
            && flag.load(Ordering::Relaxed) != 0
        {
            self.halted = Some(HaltReason::Flag);
            return true;
        }

        self.checks += 1;
        if self.checks >= CLOCK_INTERVAL {
            self.checks = 0;
            if let Some(deadline) = self.deadline
                && Instant::now() >= deadline
            {
                self.halted = Some(HaltReason::Timeout);
            }
        }

        self.halted.is_some()
    }

    pub fn halted(&self) -> Option<HaltReason> {
        self.halted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_halts_immediately() {
        let flag = Arc::new(AtomicUsize::new(0));
        let mut interrupt = Interrupt::new(Duration::ZERO, Some(flag.clone()));
        assert!(!interrupt.check());

        flag.store(1, Ordering::Relaxed);
        assert!(interrupt.check());
        assert_eq!(interrupt.halted(), Some(HaltReason::Flag));

        flag.store(0, Ordering::Relaxed);
        assert!(interrupt.check());
    }

    #[test]
    fn clock_is_read_periodically() {
        let mut interrupt = Interrupt::new(Duration::from_nanos(1), None);
        std::thread::sleep(Duration::from_millis(1));

        let checks = (0..CLOCK_INTERVAL).take_while(|_| !interrupt.check()).count();
        assert_eq!(checks as u32, CLOCK_INTERVAL - 1);
        assert_eq!(interrupt.halted(), Some(HaltReason::Timeout));
    }

    #[test]
    fn unbounded_never_halts() {
        let mut interrupt = Interrupt::never();
        assert!((0..10 * CLOCK_INTERVAL).all(|_| !interrupt.check()));
    }
}
