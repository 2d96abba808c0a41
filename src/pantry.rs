use crate::error::{AppError, AppResult};
use crate::filter::FilterEngine;
use crate::notification::{
    Clock, LocalTimer, NotificationScheduler, Notifier, ScheduledTrigger, SystemClock, TimerService,
};
use crate::preferences::Preferences;
use crate::product::{Product, ProductId};
use crate::selection::SelectionSet;
use crate::storage::ProductStore;
use tracing::info;

/// Wires the product store to the filter engine, the selection and the
/// reminder scheduler, routing each change to the components it affects.
pub struct Pantry<S: ProductStore, T: TimerService, C: Clock = SystemClock> {
    store: S,
    filters: FilterEngine,
    selection: SelectionSet,
    scheduler: NotificationScheduler<T, C>,
    preferences: Preferences,
}

impl<S: ProductStore, T: TimerService> Pantry<S, T, SystemClock> {
    pub fn new(store: S, timer: T, preferences: Preferences) -> Self {
        Self::with_clock(store, timer, preferences, SystemClock)
    }
}

impl<S: ProductStore, T: TimerService, C: Clock> Pantry<S, T, C> {
    pub fn with_clock(store: S, timer: T, preferences: Preferences, clock: C) -> Self {
        Self {
            store,
            filters: FilterEngine::new(),
            selection: SelectionSet::new(),
            scheduler: NotificationScheduler::with_clock(timer, clock),
            preferences,
        }
    }

    /// Pull the product list from the store and install every reminder.
    /// Returns how many reminders were installed; none while notifications are off.
    pub fn load(&mut self) -> usize {
        self.refresh();
        let installed = if self.preferences.notifications_enabled {
            self.scheduler.schedule_all(
                self.filters.master_list(),
                self.preferences.lead_days,
                self.preferences.reminder_hour,
            )
        } else {
            0
        };
        info!(
            products = self.filters.master_list().len(),
            installed, "pantry loaded"
        );
        installed
    }

    fn refresh(&mut self) {
        self.filters.set_master_list(self.store.all_products());
        self.selection.reconcile(self.filters.master_list());
    }

    pub fn add_product(&mut self, product: Product) -> AppResult<ProductId> {
        let id = self.store.add_product(product)?;
        self.refresh();
        self.schedule_added(&[id]);
        info!(product_id = id, "product added");
        Ok(id)
    }

    /// Store `quantity` copies of `product`, each with its own id and reminder.
    pub fn add_products(&mut self, product: Product, quantity: usize) -> AppResult<Vec<ProductId>> {
        if quantity == 0 {
            return Err(AppError::validation("quantity must be at least 1"));
        }
        let mut ids = Vec::with_capacity(quantity);
        for _ in 0..quantity {
            ids.push(self.store.add_product(product.clone())?);
        }
        self.refresh();
        self.schedule_added(&ids);
        info!(quantity, name = %product.name, "products added");
        Ok(ids)
    }

    fn schedule_added(&mut self, ids: &[ProductId]) {
        if !self.preferences.notifications_enabled {
            return;
        }
        for product in self.filters.master_list().iter().filter(|p| ids.contains(&p.id)) {
            self.scheduler.schedule_one(
                product,
                self.preferences.lead_days,
                self.preferences.reminder_hour,
            );
        }
    }

    /// Store an edited product. The reminder is only touched when the
    /// expiration date changed. Returns `false` for an unknown id.
    pub fn update_product(&mut self, product: Product) -> AppResult<bool> {
        let Some(previous) = self.store.update_product(product.clone())? else {
            return Ok(false);
        };
        if self.preferences.notifications_enabled
            && previous.expiration_date != product.expiration_date
        {
            self.scheduler.schedule_one(
                &product,
                self.preferences.lead_days,
                self.preferences.reminder_hour,
            );
        }
        self.refresh();
        Ok(true)
    }

    /// Delete products and their reminders. Unknown ids are ignored.
    /// Returns how many products were removed.
    pub fn delete_products(&mut self, ids: &[ProductId]) -> AppResult<usize> {
        let removed = self.store.delete_products(ids)?;
        for product in &removed {
            self.scheduler.cancel_one(product.id);
        }
        self.refresh();
        info!(removed = removed.len(), "products deleted");
        Ok(removed.len())
    }

    /// Delete every selected product, then reset selection and filters.
    pub fn delete_selected(&mut self) -> AppResult<usize> {
        let ids = self.selection.all();
        let removed = self.delete_products(&ids)?;
        self.selection.clear();
        self.filters.clear_all();
        Ok(removed)
    }

    /// Cancel every reminder and empty the store.
    pub fn clear_database(&mut self) -> AppResult<()> {
        let products = self.store.all_products();
        self.scheduler.cancel_all(&products);
        self.store.clear()?;
        self.refresh();
        info!(removed = products.len(), "database cleared");
        Ok(())
    }

    /// Apply new preferences. Switching notifications off cancels every
    /// reminder; a new lead time or hour reschedules them all. Returns how
    /// many reminders are installed afterwards, or `None` when nothing had to move.
    pub fn set_preferences(&mut self, preferences: Preferences) -> Option<usize> {
        let changed = self.preferences.affects_schedule(&preferences);
        self.preferences = preferences;
        if !changed {
            return None;
        }
        if !preferences.notifications_enabled {
            self.scheduler.cancel_all(self.filters.master_list());
            info!("notifications disabled, reminders cancelled");
            return Some(0);
        }
        Some(self.scheduler.reschedule_all(
            self.filters.master_list(),
            preferences.lead_days,
            preferences.reminder_hour,
        ))
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn filters(&self) -> &FilterEngine {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterEngine {
        &mut self.filters
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionSet {
        &mut self.selection
    }

    pub fn scheduler(&self) -> &NotificationScheduler<T, C> {
        &self.scheduler
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn visible_list(&self) -> &[Product] {
        self.filters.visible_list()
    }

    pub fn selected_ids(&self) -> Vec<ProductId> {
        self.selection.all()
    }

    /// Selected products in list order, for print and delete batches.
    pub fn selected_products(&self) -> Vec<Product> {
        self.selection
            .selected_in(self.filters.master_list())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Products already inside their reminder window, in list order.
    pub fn expiring_soon(&self) -> Vec<&Product> {
        let today = self.scheduler.now().date_naive();
        self.filters
            .master_list()
            .iter()
            .filter(|p| p.is_expiring_soon(self.preferences.lead_days, today))
            .collect()
    }
}

impl<S: ProductStore, C: Clock> Pantry<S, LocalTimer, C> {
    /// Deliver every reminder that is due according to the pantry clock.
    pub fn fire_due_reminders<N: Notifier>(&mut self, notifier: &mut N) -> usize {
        let now = self.scheduler.now();
        let mut fired = Vec::new();
        let count = self.scheduler.timer_mut().fire_due(now, &mut |trigger: ScheduledTrigger| {
            fired.push(trigger.product_id);
            notifier.notify(trigger);
        });
        for id in fired {
            self.scheduler.mark_fired(id);
        }
        count
    }
}
