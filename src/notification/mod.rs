mod clock;
mod timer;

pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use timer::{LocalTimer, Notifier, TimerService};

use crate::config::UNSET_DATE;
use crate::product::{Product, ProductId};
use chrono::{DateTime, Days, Local, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// A one-shot reminder installed for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledTrigger {
    pub product_id: ProductId,
    pub fire_at: DateTime<Local>,
}

/// Fire time of the reminder for `product`, or `None` when nothing should be
/// scheduled: no usable expiration date, an hour outside 0..=23, a lead time
/// reaching past the calendar, a local time that does not exist, or a result
/// that is not strictly after `now`.
pub fn trigger_time(
    product: &Product,
    lead_days: u32,
    hour: u32,
    now: DateTime<Local>,
) -> Option<DateTime<Local>> {
    let Some(expiration) = product.expiration() else {
        if product.expiration_date != UNSET_DATE {
            warn!(
                product_id = product.id,
                expiration_date = %product.expiration_date,
                "malformed expiration date, no reminder scheduled"
            );
        }
        return None;
    };

    let Some(at_hour) = expiration.and_hms_opt(hour, 0, 0) else {
        warn!(product_id = product.id, hour, "reminder hour out of range");
        return None;
    };
    let Some(naive) = at_hour.checked_sub_days(Days::new(u64::from(lead_days))) else {
        warn!(product_id = product.id, lead_days, "lead time overflows the calendar, no reminder scheduled");
        return None;
    };

    let Some(fire_at) = Local.from_local_datetime(&naive).earliest() else {
        warn!(product_id = product.id, at = %naive, "reminder time does not exist locally");
        return None;
    };

    if fire_at <= now {
        debug!(product_id = product.id, fire_at = %fire_at, "reminder time already passed");
        return None;
    }
    Some(fire_at)
}

/// Keeps one timer entry per product in step with expiration dates and the
/// lead-time/hour preferences.
///
/// The scheduler mirrors what it installed so that cancelling an id it never
/// scheduled costs nothing. Timer failures are logged and never surface to
/// the caller.
pub struct NotificationScheduler<T: TimerService, C: Clock = SystemClock> {
    timer: T,
    clock: C,
    triggers: BTreeMap<ProductId, DateTime<Local>>,
}

impl<T: TimerService> NotificationScheduler<T, SystemClock> {
    pub fn new(timer: T) -> Self {
        Self::with_clock(timer, SystemClock)
    }
}

impl<T: TimerService, C: Clock> NotificationScheduler<T, C> {
    pub fn with_clock(timer: T, clock: C) -> Self {
        Self {
            timer,
            clock,
            triggers: BTreeMap::new(),
        }
    }

    /// Install (or replace) the trigger of every product that still has a
    /// reminder ahead of it. Returns how many triggers were installed.
    pub fn schedule_all(&mut self, products: &[Product], lead_days: u32, hour: u32) -> usize {
        let mut installed = 0;
        for product in products {
            if self.schedule_one(product, lead_days, hour) {
                installed += 1;
            }
        }
        info!(
            products = products.len(),
            installed, lead_days, hour, "scheduled expiration reminders"
        );
        installed
    }

    /// Cancel-then-install the trigger for one product.
    /// Returns whether a trigger is live for it afterwards.
    pub fn schedule_one(&mut self, product: &Product, lead_days: u32, hour: u32) -> bool {
        self.cancel_one(product.id);

        let Some(fire_at) = trigger_time(product, lead_days, hour, self.clock.now()) else {
            return false;
        };

        match self.timer.install(product.id, fire_at) {
            Ok(()) => {
                debug!(product_id = product.id, fire_at = %fire_at, "reminder installed");
                self.triggers.insert(product.id, fire_at);
                true
            }
            Err(e) => {
                warn!(product_id = product.id, error = %e, "failed to install reminder");
                false
            }
        }
    }

    /// Remove the trigger for `product_id`, if one was installed.
    pub fn cancel_one(&mut self, product_id: ProductId) {
        if self.triggers.remove(&product_id).is_none() {
            return;
        }
        match self.timer.cancel(product_id) {
            Ok(()) => debug!(product_id, "reminder cancelled"),
            Err(e) => warn!(product_id, error = %e, "failed to cancel reminder"),
        }
    }

    /// Remove the triggers of every product in `products`.
    pub fn cancel_all(&mut self, products: &[Product]) {
        for product in products {
            self.cancel_one(product.id);
        }
        info!(products = products.len(), "cancelled expiration reminders");
    }

    /// The only correct response to a lead-time or hour change: every
    /// existing fire time depends on both.
    pub fn reschedule_all(&mut self, products: &[Product], lead_days: u32, hour: u32) -> usize {
        self.cancel_all(products);
        self.schedule_all(products, lead_days, hour)
    }

    /// Drop the record of a trigger the timer has already fired, without
    /// calling the timer.
    pub fn mark_fired(&mut self, product_id: ProductId) {
        self.triggers.remove(&product_id);
    }

    pub fn trigger_for(&self, product_id: ProductId) -> Option<DateTime<Local>> {
        self.triggers.get(&product_id).copied()
    }

    pub fn scheduled(&self) -> Vec<ScheduledTrigger> {
        self.triggers
            .iter()
            .map(|(id, at)| ScheduledTrigger {
                product_id: *id,
                fire_at: *at,
            })
            .collect()
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}
