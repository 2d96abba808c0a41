use super::ScheduledTrigger;
use crate::error::AppResult;
use crate::product::ProductId;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Capability the scheduler needs from a platform alarm service.
///
/// An installed trigger fires once, at or after `at`, and is keyed by product
/// id: installing again for the same id replaces the previous entry.
pub trait TimerService {
    fn install(&mut self, product_id: ProductId, at: DateTime<Local>) -> AppResult<()>;
    fn cancel(&mut self, product_id: ProductId) -> AppResult<()>;
}

/// Receives fired triggers. Delivery is fire-and-forget.
pub trait Notifier {
    fn notify(&mut self, trigger: ScheduledTrigger);
}

impl<F> Notifier for F
where
    F: FnMut(ScheduledTrigger),
{
    fn notify(&mut self, trigger: ScheduledTrigger) {
        self(trigger)
    }
}

/// In-process timer that is polled instead of woken by the OS.
///
/// Hosts without a native alarm service call [`LocalTimer::fire_due`] from
/// their own loop; every entry is handed out exactly once.
#[derive(Debug, Default)]
pub struct LocalTimer {
    entries: BTreeMap<ProductId, DateTime<Local>>,
}

impl LocalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Vec<ScheduledTrigger> {
        self.entries
            .iter()
            .map(|(id, at)| ScheduledTrigger {
                product_id: *id,
                fire_at: *at,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every entry due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: DateTime<Local>) -> Vec<ScheduledTrigger> {
        let due_ids: Vec<ProductId> = self
            .entries
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(id, _)| *id)
            .collect();

        let mut due: Vec<ScheduledTrigger> = due_ids
            .into_iter()
            .filter_map(|id| {
                self.entries.remove(&id).map(|at| ScheduledTrigger {
                    product_id: id,
                    fire_at: at,
                })
            })
            .collect();
        due.sort_by_key(|t| t.fire_at);
        due
    }

    /// Hand every due entry to `notifier`. Returns how many fired.
    pub fn fire_due<N: Notifier>(&mut self, now: DateTime<Local>, notifier: &mut N) -> usize {
        let due = self.take_due(now);
        let count = due.len();
        for trigger in due {
            info!(product_id = trigger.product_id, fire_at = %trigger.fire_at, "reminder fired");
            notifier.notify(trigger);
        }
        count
    }
}

impl TimerService for LocalTimer {
    fn install(&mut self, product_id: ProductId, at: DateTime<Local>) -> AppResult<()> {
        debug!(product_id, at = %at, "local timer entry installed");
        self.entries.insert(product_id, at);
        Ok(())
    }

    fn cancel(&mut self, product_id: ProductId) -> AppResult<()> {
        if self.entries.remove(&product_id).is_some() {
            debug!(product_id, "local timer entry cancelled");
        }
        Ok(())
    }
}
