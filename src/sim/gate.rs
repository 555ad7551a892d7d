//! Drop cooldown gate
//!
//! `Open → Closed` on a successful drop, `Closed → Open` when the cooldown
//! timer fires. Taps while closed are discarded, not queued.

use super::timer::TimerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, Default)]
pub struct DropGate {
    state: GateState,
    /// Cooldown timer that will reopen the gate
    reopen: Option<TimerId>,
}

impl DropGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == GateState::Open
    }

    /// Close after a drop; `reopen` is the pending cooldown timer
    pub fn close(&mut self, reopen: TimerId) {
        self.state = GateState::Closed;
        self.reopen = Some(reopen);
    }

    /// Cooldown elapsed
    pub fn open(&mut self) {
        self.state = GateState::Open;
        self.reopen = None;
    }

    pub fn pending_timer(&self) -> Option<TimerId> {
        self.reopen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::timer::{Deferred, Scheduler};

    #[test]
    fn test_gate_cycle() {
        let mut scheduler = Scheduler::new();
        let mut gate = DropGate::new();
        assert!(gate.is_open());

        let timer = scheduler.schedule(0.0, 300.0, Deferred::ReopenGate);
        gate.close(timer);
        assert_eq!(gate.state(), GateState::Closed);
        assert_eq!(gate.pending_timer(), Some(timer));

        gate.open();
        assert!(gate.is_open());
        assert_eq!(gate.pending_timer(), None);
    }
}
