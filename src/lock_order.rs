//! Debug-only enforcement of the client -> topic -> partition lock hierarchy
//! (spec.md S5, S9). Every guard produced by `ClientState::read`/`write`,
//! `TopicState::read`/`write` and `PartitionState::lock` pushes its level
//! onto a thread-local stack on acquire and pops it on release; acquiring a
//! level that is not strictly greater than the one on top of the stack is a
//! programming error and panics. Compiled out entirely in release builds.

use std::cell::RefCell;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Client = 1,
    Topic = 2,
    Partition = 3,
}

thread_local! {
    static HELD: RefCell<Vec<Level>> = RefCell::new(Vec::new());
}

/// RAII marker: held for the lifetime of a lock guard, asserts ordering on
/// construction and pops itself on drop.
pub struct LockToken {
    #[cfg(debug_assertions)]
    level: Level,
}

#[cfg(debug_assertions)]
pub fn enter(level: Level) -> LockToken {
    HELD.with(|held| {
        let mut held = held.borrow_mut();
        if let Some(&top) = held.last() {
            assert!(
                level > top,
                "lock order violation: tried to acquire {:?} while holding {:?}",
                level,
                top
            );
        }
        held.push(level);
    });
    LockToken { level }
}

#[cfg(not(debug_assertions))]
pub fn enter(_level: Level) -> LockToken {
    LockToken {}
}

#[cfg(debug_assertions)]
impl Drop for LockToken {
    fn drop(&mut self) {
        HELD.with(|held| {
            let mut held = held.borrow_mut();
            debug_assert_eq!(held.pop(), Some(self.level));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_top_down_order() {
        let _c = enter(Level::Client);
        let _t = enter(Level::Topic);
        let _p = enter(Level::Partition);
    }

    #[test]
    #[should_panic(expected = "lock order violation")]
    fn rejects_bottom_up_order() {
        let _p = enter(Level::Partition);
        let _t = enter(Level::Topic);
    }

    #[test]
    fn releases_allow_reacquire() {
        {
            let _t = enter(Level::Topic);
        }
        let _t2 = enter(Level::Topic);
    }
}
