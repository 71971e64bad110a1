use sea_orm::Set;

use crate::{
    domain::{Order, OrderItem, ValidationError},
    entity::{
        order_items::{ActiveModel as OrderItemActive, Model as OrderItemModel},
        orders::{ActiveModel as OrderActive, Model as OrderModel},
    },
    error::{AppError, AppResult},
};

pub(crate) fn order_to_active(order: &Order) -> OrderActive {
    OrderActive {
        id: Set(order.id().to_string()),
        customer_id: Set(order.customer_id().to_string()),
        total: Set(order.total()),
    }
}

pub(crate) fn order_item_to_active(order_id: &str, item: &OrderItem) -> OrderItemActive {
    OrderItemActive {
        id: Set(item.id().to_string()),
        order_id: Set(order_id.to_string()),
        product_id: Set(item.product_id().to_string()),
        name: Set(item.name().to_string()),
        price: Set(item.price()),
        quantity: Set(item.quantity()),
    }
}

/// Rebuilds the aggregate from a parent row and its item rows, keeping the
/// item rows' order. The stored total must agree with the rebuilt items.
pub(crate) fn order_from_entity(model: OrderModel, items: Vec<OrderItemModel>) -> AppResult<Order> {
    let items = items
        .into_iter()
        .map(order_item_from_entity)
        .collect::<Result<Vec<_>, _>>()?;
    let order = Order::new(model.id, model.customer_id, items)?;

    let computed = order.total();
    if computed != model.total {
        return Err(AppError::TotalMismatch {
            order_id: order.id().to_string(),
            stored: model.total,
            computed,
        });
    }
    Ok(order)
}

fn order_item_from_entity(model: OrderItemModel) -> Result<OrderItem, ValidationError> {
    OrderItem::new(model.id, model.name, model.price, model.product_id, model.quantity)
}
