use crate::product::{Product, ProductId};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Products marked for a bulk action (delete, print).
///
/// Selection is independent of filtering: a selected product that is
/// filtered out of view stays selected.
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    ids: BTreeSet<ProductId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `product_id` if absent, remove it if present.
    /// Returns whether it is selected afterwards.
    pub fn toggle(&mut self, product_id: ProductId) -> bool {
        if self.ids.remove(&product_id) {
            false
        } else {
            self.ids.insert(product_id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.ids.contains(&product_id)
    }

    /// Selected ids in ascending order.
    pub fn all(&self) -> Vec<ProductId> {
        self.ids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop ids that no longer exist in `master`. Returns how many were dropped.
    pub fn reconcile(&mut self, master: &[Product]) -> usize {
        let existing: HashSet<ProductId> = master.iter().map(|p| p.id).collect();
        let before = self.ids.len();
        self.ids.retain(|id| existing.contains(id));
        let dropped = before - self.ids.len();
        if dropped > 0 {
            debug!(dropped, "removed stale ids from selection");
        }
        dropped
    }

    /// Selected products in master-list order.
    pub fn selected_in<'a>(&self, master: &'a [Product]) -> Vec<&'a Product> {
        master.iter().filter(|p| self.contains(p.id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(id: ProductId) -> Product {
        let mut product = Product::new(format!("Product {}", id), "-".to_string());
        product.id = id;
        product
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle(3));
        assert!(selection.contains(3));
        assert!(!selection.toggle(3));
        assert!(!selection.contains(3));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_all_is_sorted() {
        let mut selection = SelectionSet::new();
        selection.toggle(9);
        selection.toggle(2);
        selection.toggle(5);
        assert_eq!(selection.all(), vec![2, 5, 9]);
    }

    #[test]
    fn test_clear() {
        let mut selection = SelectionSet::new();
        selection.toggle(1);
        selection.toggle(2);
        selection.clear();
        assert_eq!(selection.len(), 0);
    }

    #[test]
    fn test_reconcile_drops_missing_ids() {
        let mut selection = SelectionSet::new();
        selection.toggle(1);
        selection.toggle(2);
        selection.toggle(3);

        let master = vec![make_product(1), make_product(3), make_product(4)];
        assert_eq!(selection.reconcile(&master), 1);
        assert_eq!(selection.all(), vec![1, 3]);
        assert_eq!(selection.reconcile(&master), 0);
    }

    #[test]
    fn test_selected_in_follows_master_order() {
        let mut selection = SelectionSet::new();
        selection.toggle(1);
        selection.toggle(7);

        let master = vec![make_product(7), make_product(2), make_product(1)];
        let picked: Vec<ProductId> = selection.selected_in(&master).iter().map(|p| p.id).collect();
        assert_eq!(picked, vec![7, 1]);
    }
}
