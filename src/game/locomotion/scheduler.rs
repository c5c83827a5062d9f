use bevy::prelude::*;

/// Work the controller defers to a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DeferredAction {
    EndRootMotionCooldown,
}

/// Runs actions after a number of tick boundaries.
///
/// Call [`TickScheduler::tick`] once at the start of every tick; an action scheduled with
/// `ticks = 1` is returned by the next call, never by a call in the same tick.
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct TickScheduler {
    pending: Vec<(u32, DeferredAction)>,
}

impl TickScheduler {
    pub fn schedule(&mut self, ticks: u32, action: DeferredAction) {
        self.pending.push((ticks.max(1), action));
    }

    /// Crosses one tick boundary and returns the actions that became due, in schedule order
    pub fn tick(&mut self) -> Vec<DeferredAction> {
        let mut due = Vec::new();
        self.pending.retain_mut(|(remaining, action)| {
            *remaining -= 1;
            if *remaining == 0 {
                due.push(*action);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn is_scheduled(&self, action: DeferredAction) -> bool {
        self.pending.iter().any(|(_, pending)| *pending == action)
    }
}
