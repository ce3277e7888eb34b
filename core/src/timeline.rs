use alloc::vec::Vec;
use core::time::Duration;

use crate::*;

/// Milliseconds since the timeline started.
pub type Millis = u64;

fn as_millis(duration: Duration) -> Millis {
    duration.as_millis().try_into().unwrap_or(Millis::MAX)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Pending {
    due: Millis,
    seq: u64,
    deferred: Deferred,
}

/// Virtual clock around a [`MatchSession`], standing in for browser timers.
///
/// Deferred effects the session queues are picked up after every intent and
/// run in due order as time advances. A once-per-second tick runs alongside;
/// when both fall on the same instant the deferred effect goes first.
#[derive(Debug)]
pub struct Timeline<S> {
    session: MatchSession<S>,
    now: Millis,
    next_tick: Millis,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl<S: KeyValueStore> Timeline<S> {
    pub fn new(session: MatchSession<S>) -> Self {
        let mut timeline = Self {
            session,
            now: 0,
            next_tick: as_millis(TICK_PERIOD),
            next_seq: 0,
            pending: Vec::new(),
        };
        timeline.collect();
        timeline
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn session(&self) -> &MatchSession<S> {
        &self.session
    }

    /// Mutable access for intents, anything they schedule is picked up here.
    pub fn with_session<T>(&mut self, f: impl FnOnce(&mut MatchSession<S>) -> T) -> T {
        let result = f(&mut self.session);
        self.collect();
        result
    }

    pub fn flip_card(&mut self, id: CardId) -> FlipOutcome {
        self.with_session(|session| session.flip_card(id))
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Moves the clock forward by `millis`, running every deferred effect and
    /// tick that falls due on the way.
    pub fn advance(&mut self, millis: Millis) {
        let target = self.now.saturating_add(millis);
        loop {
            let next = self
                .next_pending()
                .map(|index| (index, self.pending[index].due));
            match next {
                Some((index, due)) if due <= target && due <= self.next_tick => {
                    self.now = due;
                    let pending = self.pending.remove(index);
                    self.session.run_deferred(pending.deferred);
                    self.collect();
                }
                _ if self.next_tick <= target => {
                    self.now = self.next_tick;
                    self.next_tick = self.next_tick.saturating_add(as_millis(TICK_PERIOD));
                    self.session.tick();
                }
                _ => break,
            }
        }
        self.now = target;
    }

    /// Index of the pending effect due first, oldest first on ties.
    fn next_pending(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by_key(|(_, pending)| (pending.due, pending.seq))
            .map(|(index, _)| index)
    }

    fn collect(&mut self) {
        for deferred in self.session.take_scheduled() {
            self.pending.push(Pending {
                due: self.now.saturating_add(as_millis(deferred.delay)),
                seq: self.next_seq,
                deferred,
            });
            self.next_seq += 1;
        }
    }
}
