//! Request-in-flight flags.
//!
//! A `BusyFlag` is set for exactly as long as a `BusyGuard` obtained from it
//! is alive, so the flag clears on every exit path of an action: normal
//! completion, an error, an early return or an abandoned pending request.
//! Flags are single-threaded (`Rc<Cell<_>>`), matching the UI event loop.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct BusyFlag {
    state: Rc<Cell<bool>>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.state.get()
    }

    /// Set the flag and return its guard, or `None` if it is already set.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        if self.state.replace(true) {
            return None;
        }
        Some(BusyGuard {
            state: Rc::clone(&self.state),
        })
    }
}

/// Clears its flag on drop.
#[derive(Debug)]
#[must_use = "the flag clears as soon as the guard is dropped"]
pub struct BusyGuard {
    state: Rc<Cell<bool>>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.state.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_holds_flag_until_dropped() {
        let flag = BusyFlag::new();
        assert!(!flag.is_busy());

        let guard = flag.try_acquire().unwrap();
        assert!(flag.is_busy());
        assert!(flag.try_acquire().is_none());

        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire().is_some());
    }

    #[test]
    fn flag_clears_on_early_return() {
        fn fails(flag: &BusyFlag) -> Result<(), &'static str> {
            let _guard = flag.try_acquire().ok_or("busy")?;
            Err("boom")
        }

        let flag = BusyFlag::new();
        assert_eq!(fails(&flag), Err("boom"));
        assert!(!flag.is_busy());
    }
}
