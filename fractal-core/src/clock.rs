use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;

/// Handle for one registration with a [`FrameClock`].
///
/// Tokens are never reused and carry the id of the clock that issued
/// them, so a stale or foreign token never matches a live registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameToken {
    clock: u64,
    id: u64,
}

static NEXT_CLOCK_ID: AtomicU64 = AtomicU64::new(0);

/// A per-frame clock that tracks which subscribers still want ticks.
///
/// The clock does not call anything itself. Its owner fires it once per
/// display refresh with [`FrameClock::advance`] and ticks every subscriber
/// whose token [`FrameClock::is_live`].
#[derive(Debug)]
pub struct FrameClock {
    id: u64,
    next_id: u64,
    live: BTreeSet<FrameToken>,
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            id: NEXT_CLOCK_ID.fetch_add(1, Ordering::Relaxed),
            next_id: 0,
            live: BTreeSet::new(),
            frame: 0,
        }
    }

    /// Registers a new subscriber and returns its token.
    pub fn register(&mut self) -> FrameToken {
        let token = FrameToken {
            clock: self.id,
            id: self.next_id,
        };
        self.next_id += 1;
        self.live.insert(token);
        token
    }

    /// Cancels a registration.
    ///
    /// Canceling a token that was already canceled, or that came from
    /// another clock, is a no-op.
    ///
    /// ### Returns
    /// `true` if the token was live before this call.
    pub fn cancel(&mut self, token: FrameToken) -> bool {
        if token.clock != self.id {
            trace!("cancel of frame token {token:?} from another clock ignored");
            return false;
        }
        let removed = self.live.remove(&token);
        if !removed {
            trace!("cancel of inactive frame token {token:?} ignored");
        }
        removed
    }

    #[inline]
    pub fn is_live(&self, token: FrameToken) -> bool {
        token.clock == self.id && self.live.contains(&token)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Fires one frame and returns the new frame count.
    pub fn advance(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }

    /// Number of frames fired so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_hands_out_distinct_live_tokens() {
        let mut clock = FrameClock::new();
        let a = clock.register();
        let b = clock.register();

        assert_ne!(a, b);
        assert!(clock.is_live(a));
        assert!(clock.is_live(b));
        assert_eq!(clock.live_count(), 2);
    }

    #[test]
    fn cancel_is_safe_to_repeat() {
        let mut clock = FrameClock::new();
        let token = clock.register();

        assert!(clock.cancel(token));
        assert!(!clock.is_live(token));
        assert!(!clock.cancel(token));
        assert_eq!(clock.live_count(), 0);
    }

    #[test]
    fn cancel_of_foreign_token_is_a_no_op() {
        let mut other = FrameClock::new();
        let mut clock = FrameClock::new();

        // Both clocks hand out their first token.
        let foreign = other.register();
        let own = clock.register();
        assert_ne!(foreign, own);

        assert!(!clock.is_live(foreign));
        assert!(!clock.cancel(foreign));
        assert!(clock.is_live(own));
        assert_eq!(clock.live_count(), 1);
        assert!(other.is_live(foreign));
    }

    #[test]
    fn tokens_are_not_reused_after_cancel() {
        let mut clock = FrameClock::new();
        let first = clock.register();
        clock.cancel(first);
        let second = clock.register();

        assert_ne!(first, second);
        assert!(!clock.is_live(first));
    }

    #[test]
    fn advance_counts_frames() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.frame(), 2);
    }
}
