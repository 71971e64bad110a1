use std::collections::{HashMap, HashSet};

use crate::{domain::OrderItem, entity::order_items::Model as OrderItemModel};

/// Row operations that turn the stored items of an order into a target item list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ItemChanges<'a> {
    pub inserts: Vec<&'a OrderItem>,
    pub updates: Vec<&'a OrderItem>,
    pub deletes: Vec<String>,
}

impl ItemChanges<'_> {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

/// Diff keyed by item id: ids only in `target` are inserted, ids only in
/// `stored` are deleted, shared ids are updated when any field differs.
pub fn diff_items<'a>(stored: &[OrderItemModel], target: &'a [OrderItem]) -> ItemChanges<'a> {
    let stored_by_id: HashMap<&str, &OrderItemModel> =
        stored.iter().map(|row| (row.id.as_str(), row)).collect();
    let target_ids: HashSet<&str> = target.iter().map(OrderItem::id).collect();

    let mut changes = ItemChanges::default();
    for item in target {
        match stored_by_id.get(item.id()) {
            None => changes.inserts.push(item),
            Some(row) if !row_matches(row, item) => changes.updates.push(item),
            Some(_) => {}
        }
    }
    changes.deletes = stored
        .iter()
        .filter(|row| !target_ids.contains(row.id.as_str()))
        .map(|row| row.id.clone())
        .collect();

    changes
}

fn row_matches(row: &OrderItemModel, item: &OrderItem) -> bool {
    row.product_id == item.product_id()
        && row.name == item.name()
        && row.price == item.price()
        && row.quantity == item.quantity()
}
