//! Snapshot pacing and building

use crate::ws::protocol::ServerMsg;

use super::GameState;

/// Decides when a session pushes a state snapshot to its client
pub struct SnapshotBuilder {
    /// Tick counter since last snapshot
    ticks_since_snapshot: u32,
    /// Snapshot interval in ticks
    snapshot_interval: u32,
}

impl SnapshotBuilder {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            ticks_since_snapshot: 0,
            snapshot_interval: snapshot_interval.max(1),
        }
    }

    /// Check if it's time to send a snapshot
    pub fn should_send(&mut self) -> bool {
        self.ticks_since_snapshot += 1;
        if self.ticks_since_snapshot >= self.snapshot_interval {
            self.ticks_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Force snapshot on next check (used after catches and misses)
    pub fn force_next(&mut self) {
        self.ticks_since_snapshot = self.snapshot_interval;
    }

    /// Build a snapshot message
    pub fn build(&self, tick: u64, state: &GameState) -> ServerMsg {
        ServerMsg::Snapshot {
            tick,
            state: state.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sends_every_interval() {
        let mut builder = SnapshotBuilder::new(2);
        let sent: Vec<bool> = (0..6).map(|_| builder.should_send()).collect();
        assert_eq!(sent, vec![false, true, false, true, false, true]);
    }

    #[test]
    fn test_force_next() {
        let mut builder = SnapshotBuilder::new(5);
        assert!(!builder.should_send());
        builder.force_next();
        assert!(builder.should_send());
        assert!(!builder.should_send());
    }

    #[test]
    fn test_build_carries_state() {
        let builder = SnapshotBuilder::new(1);
        match builder.build(9, &GameState::default()) {
            ServerMsg::Snapshot { tick, state } => {
                assert_eq!(tick, 9);
                assert_eq!(state, GameState::default());
            }
            other => panic!("unexpected message {other:?}"),
        }
    }
}
