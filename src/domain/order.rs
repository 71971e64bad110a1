use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Order id is required")]
    MissingOrderId,

    #[error("Customer id is required")]
    MissingCustomerId,

    #[error("Order must contain at least one item")]
    EmptyItems,

    #[error("Item id is required")]
    MissingItemId,

    #[error("Product id is required for item {0}")]
    MissingProductId(String),

    #[error("Quantity must be greater than 0 for item {0}")]
    InvalidQuantity(String),

    #[error("Price must not be negative for item {0}")]
    NegativePrice(String),

    #[error("Duplicate item id {0}")]
    DuplicateItem(String),

    #[error("Item {0} is not part of the order")]
    UnknownItem(String),

    #[error("Total of {0} does not fit in an i64")]
    TotalOverflow(String),
}

/// A line of an order.
///
/// `name` and `price` are a snapshot of the product taken when the item was
/// built; they are not a live reference to the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    id: String,
    name: String,
    price: i64,
    product_id: String,
    quantity: i32,
}

impl OrderItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: i64,
        product_id: impl Into<String>,
        quantity: i32,
    ) -> Result<Self, ValidationError> {
        let item = Self {
            id: id.into(),
            name: name.into(),
            price,
            product_id: product_id.into(),
            quantity,
        };
        item.validate()?;
        Ok(item)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingItemId);
        }
        if self.product_id.is_empty() {
            return Err(ValidationError::MissingProductId(self.id.clone()));
        }
        if self.quantity <= 0 {
            return Err(ValidationError::InvalidQuantity(self.id.clone()));
        }
        if self.price < 0 {
            return Err(ValidationError::NegativePrice(self.id.clone()));
        }
        if line_total(self.price, self.quantity).is_none() {
            return Err(ValidationError::TotalOverflow(self.id.clone()));
        }
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    /// Cannot overflow: construction and every mutator reject such items.
    pub fn total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }

    pub fn change_quantity(&mut self, quantity: i32) -> Result<(), ValidationError> {
        if quantity <= 0 {
            return Err(ValidationError::InvalidQuantity(self.id.clone()));
        }
        if line_total(self.price, quantity).is_none() {
            return Err(ValidationError::TotalOverflow(self.id.clone()));
        }
        self.quantity = quantity;
        Ok(())
    }
}

/// Order aggregate: owns its items exclusively and always holds at least one.
///
/// Two orders are equal when id, customer and the set of items match; the
/// position of an item in the collection does not matter.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    id: String,
    customer_id: String,
    items: Vec<OrderItem>,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        customer_id: impl Into<String>,
        items: Vec<OrderItem>,
    ) -> Result<Self, ValidationError> {
        let order = Self {
            id: id.into(),
            customer_id: customer_id.into(),
            items,
        };
        order.validate()?;
        Ok(order)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingOrderId);
        }
        if self.customer_id.is_empty() {
            return Err(ValidationError::MissingCustomerId);
        }
        validate_items(&self.id, &self.items)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Sum of the item totals; kept within `i64` by every constructor and mutator.
    pub fn total(&self) -> i64 {
        self.items.iter().map(OrderItem::total).sum()
    }

    pub fn change_customer(&mut self, customer_id: impl Into<String>) -> Result<(), ValidationError> {
        let customer_id = customer_id.into();
        if customer_id.is_empty() {
            return Err(ValidationError::MissingCustomerId);
        }
        self.customer_id = customer_id;
        Ok(())
    }

    pub fn add_item(&mut self, item: OrderItem) -> Result<(), ValidationError> {
        if self.items.iter().any(|existing| existing.id == item.id) {
            return Err(ValidationError::DuplicateItem(item.id));
        }
        if self.total().checked_add(item.total()).is_none() {
            return Err(ValidationError::TotalOverflow(self.id.clone()));
        }
        self.items.push(item);
        Ok(())
    }

    /// Removes and returns the item. The last item of an order cannot be removed.
    pub fn remove_item(&mut self, item_id: &str) -> Result<OrderItem, ValidationError> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| ValidationError::UnknownItem(item_id.to_string()))?;
        if self.items.len() == 1 {
            return Err(ValidationError::EmptyItems);
        }
        Ok(self.items.remove(position))
    }

    pub fn change_item_quantity(
        &mut self,
        item_id: &str,
        quantity: i32,
    ) -> Result<(), ValidationError> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| ValidationError::UnknownItem(item_id.to_string()))?;
        let mut changed = self.items[position].clone();
        changed.change_quantity(quantity)?;
        let others = self.total() - self.items[position].total();
        if others.checked_add(changed.total()).is_none() {
            return Err(ValidationError::TotalOverflow(self.id.clone()));
        }
        self.items[position] = changed;
        Ok(())
    }

    pub fn replace_items(&mut self, items: Vec<OrderItem>) -> Result<(), ValidationError> {
        validate_items(&self.id, &items)?;
        self.items = items;
        Ok(())
    }
}

fn line_total(price: i64, quantity: i32) -> Option<i64> {
    price.checked_mul(i64::from(quantity))
}

fn validate_items(order_id: &str, items: &[OrderItem]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyItems);
    }
    let mut total: i64 = 0;
    for (index, item) in items.iter().enumerate() {
        item.validate()?;
        if items[..index].iter().any(|earlier| earlier.id == item.id) {
            return Err(ValidationError::DuplicateItem(item.id.clone()));
        }
        total = total
            .checked_add(item.total())
            .ok_or_else(|| ValidationError::TotalOverflow(order_id.to_string()))?;
    }
    Ok(())
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        if self.id != other.id
            || self.customer_id != other.customer_id
            || self.items.len() != other.items.len()
        {
            return false;
        }
        // item ids are unique within an order, so a keyed lookup is a set comparison
        self.items.iter().all(|item| {
            other
                .items
                .iter()
                .find(|candidate| candidate.id == item.id)
                .is_some_and(|candidate| candidate == item)
        })
    }
}

impl Eq for Order {}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: i64, quantity: i32) -> OrderItem {
        OrderItem::new(id, format!("Product {id}"), price, format!("p{id}"), quantity).unwrap()
    }

    #[test]
    fn total_sums_price_times_quantity() {
        let order = Order::new("1", "c1", vec![item("1", 10, 2), item("2", 50, 1)]).unwrap();
        assert_eq!(order.total(), 70);
    }

    #[test]
    fn rejects_order_without_items() {
        let err = Order::new("1", "c1", vec![]).unwrap_err();
        assert_eq!(err, ValidationError::EmptyItems);
    }

    #[test]
    fn rejects_missing_ids() {
        assert_eq!(
            Order::new("", "c1", vec![item("1", 10, 1)]).unwrap_err(),
            ValidationError::MissingOrderId
        );
        assert_eq!(
            Order::new("1", "", vec![item("1", 10, 1)]).unwrap_err(),
            ValidationError::MissingCustomerId
        );
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let err = OrderItem::new("1", "Product 1", 10, "p1", 0).unwrap_err();
        assert_eq!(err, ValidationError::InvalidQuantity("1".into()));
    }

    #[test]
    fn rejects_duplicate_item_ids() {
        let err = Order::new("1", "c1", vec![item("1", 10, 1), item("1", 20, 1)]).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateItem("1".into()));

        let mut order = Order::new("1", "c1", vec![item("1", 10, 1)]).unwrap();
        assert!(order.add_item(item("1", 5, 1)).is_err());
    }

    #[test]
    fn cannot_remove_last_item() {
        let mut order = Order::new("1", "c1", vec![item("1", 10, 1), item("2", 10, 1)]).unwrap();
        let removed = order.remove_item("1").unwrap();
        assert_eq!(removed.id(), "1");
        assert_eq!(order.remove_item("2").unwrap_err(), ValidationError::EmptyItems);
        assert_eq!(
            order.remove_item("9").unwrap_err(),
            ValidationError::UnknownItem("9".into())
        );
    }

    #[test]
    fn total_follows_item_changes() {
        let mut order = Order::new("1", "c1", vec![item("1", 10, 2)]).unwrap();
        order.change_item_quantity("1", 5).unwrap();
        order.add_item(item("2", 3, 1)).unwrap();
        assert_eq!(order.total(), 53);
    }

    #[test]
    fn rejects_item_whose_total_overflows() {
        let err = OrderItem::new("1", "Big", i64::MAX / 2 + 1, "p1", 2).unwrap_err();
        assert_eq!(err, ValidationError::TotalOverflow("1".into()));

        let mut big = OrderItem::new("1", "Big", i64::MAX / 2 + 1, "p1", 1).unwrap();
        assert_eq!(
            big.change_quantity(2).unwrap_err(),
            ValidationError::TotalOverflow("1".into())
        );
        assert_eq!(big.quantity(), 1);
    }

    #[test]
    fn rejects_order_whose_total_overflows() {
        let half = i64::MAX / 2 + 1;
        let err = Order::new("1", "c1", vec![item("1", half, 1), item("2", half, 1)]).unwrap_err();
        assert_eq!(err, ValidationError::TotalOverflow("1".into()));

        let mut order = Order::new("1", "c1", vec![item("1", half, 1)]).unwrap();
        assert_eq!(
            order.add_item(item("2", half, 1)).unwrap_err(),
            ValidationError::TotalOverflow("1".into())
        );
        assert_eq!(order.items().len(), 1);

        let quarter = half / 2;
        let mut order =
            Order::new("1", "c1", vec![item("1", half, 1), item("2", quarter, 1)]).unwrap();
        assert_eq!(
            order.change_item_quantity("2", 2).unwrap_err(),
            ValidationError::TotalOverflow("1".into())
        );
        assert_eq!(order.total(), half + quarter);

        assert!(order
            .replace_items(vec![item("3", half, 1), item("4", half, 1)])
            .is_err());
        assert_eq!(order.items().len(), 2);
    }

    #[test]
    fn equality_ignores_item_order() {
        let a = Order::new("1", "c1", vec![item("1", 10, 1), item("2", 20, 1)]).unwrap();
        let b = Order::new("1", "c1", vec![item("2", 20, 1), item("1", 10, 1)]).unwrap();
        assert_eq!(a, b);

        let c = Order::new("1", "c1", vec![item("2", 20, 2), item("1", 10, 1)]).unwrap();
        assert_ne!(a, c);
    }
}
