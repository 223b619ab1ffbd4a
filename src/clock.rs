use chrono::{DateTime, Local};

/// Source of "now" for every task transition. Swapped out in tests so
/// elapsed time is deterministic.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[cfg(test)]
pub use fake::FakeClock;

#[cfg(test)]
mod fake {
    use std::{cell::Cell, rc::Rc};

    use chrono::{DateTime, Duration, Local};

    use super::Clock;

    /// Manually driven clock. Clones share the same time so a test can keep a
    /// handle while the service owns another.
    #[derive(Clone)]
    pub struct FakeClock {
        now: Rc<Cell<DateTime<Local>>>,
    }

    impl FakeClock {
        pub fn at(now: DateTime<Local>) -> Self {
            Self {
                now: Rc::new(Cell::new(now)),
            }
        }

        pub fn advance(&self, by: Duration) {
            self.now.set(self.now.get() + by);
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Local> {
            self.now.get()
        }
    }
}
