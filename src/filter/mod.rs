mod criteria;

pub use criteria::{Criterion, DateRange, FilterCriteria, FilterKind, Requirement, ValueRange};

use crate::product::Product;
use tracing::debug;

/// Holds the master product list and the active filter slots, and keeps
/// the visible subset in sync with both.
#[derive(Debug, Default)]
pub struct FilterEngine {
    master: Vec<Product>,
    criteria: FilterCriteria,
    visible: Vec<Product>,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        let mut engine = Self::new();
        engine.set_master_list(products);
        engine
    }

    /// Replace the backing list and recompute the visible list.
    pub fn set_master_list(&mut self, products: Vec<Product>) {
        self.master = products;
        self.recompute();
    }

    /// Enable, update or disable the slot named by `criterion`.
    /// Returns whether that slot is active afterwards.
    pub fn set_criterion(&mut self, criterion: Criterion) -> bool {
        let kind = criterion.kind();
        self.criteria.apply(criterion);
        self.recompute();
        self.criteria.is_active(kind)
    }

    /// Disable a single slot.
    pub fn disable(&mut self, kind: FilterKind) {
        self.criteria.disable(kind);
        self.recompute();
    }

    pub fn clear_all(&mut self) {
        self.criteria = FilterCriteria::default();
        self.recompute();
    }

    pub fn visible_list(&self) -> &[Product] {
        &self.visible
    }

    pub fn master_list(&self) -> &[Product] {
        &self.master
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn is_active(&self, kind: FilterKind) -> bool {
        self.criteria.is_active(kind)
    }

    // Full re-filter; pantry lists are small enough that an index buys nothing
    fn recompute(&mut self) {
        self.visible = self
            .master
            .iter()
            .filter(|p| self.criteria.matches(p))
            .cloned()
            .collect();
        debug!(
            master = self.master.len(),
            visible = self.visible.len(),
            active = ?self.criteria.active_kinds(),
            "recomputed visible products"
        );
    }
}
