use async_trait::async_trait;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, LoaderTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};

use crate::{
    db::OrmConn,
    domain::Order,
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Entity as Orders},
    },
    error::{AppError, AppResult},
    repository::{
        Repository,
        mapping::{order_from_entity, order_item_to_active, order_to_active},
        reconcile::{ItemChanges, diff_items},
    },
};

/// Stores `Order` aggregates as one `orders` row plus one `order_items` row per item.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    orm: OrmConn,
}

impl OrderRepository {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl Repository<Order> for OrderRepository {
    async fn create(&self, order: &Order) -> AppResult<()> {
        let txn = self.orm.begin().await?;

        order_to_active(order).insert(&txn).await?;

        OrderItems::insert_many(
            order
                .items()
                .iter()
                .map(|item| order_item_to_active(order.id(), item)),
        )
        .exec_without_returning(&txn)
        .await?;

        txn.commit().await?;

        tracing::debug!(
            order_id = %order.id(),
            items = order.items().len(),
            total = order.total(),
            "order created"
        );
        Ok(())
    }

    async fn update(&self, order: &Order) -> AppResult<()> {
        let txn = self.orm.begin().await?;

        let existing = Orders::find_by_id(order.id().to_string())
            .lock(LockType::Update)
            .one(&txn)
            .await?;
        let existing = match existing {
            Some(o) => o,
            None => return Err(AppError::NotFound(order.id().to_string())),
        };

        let stored_items = OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(order.id()))
            .all(&txn)
            .await?;
        let changes = diff_items(&stored_items, order.items());

        if !changes.is_empty() {
            apply_item_changes(&txn, order.id(), &changes).await?;
        }

        let mut active: OrderActive = existing.into();
        active.customer_id = Set(order.customer_id().to_string());
        active.total = Set(order.total());
        active.update(&txn).await?;

        txn.commit().await?;

        tracing::debug!(
            order_id = %order.id(),
            inserted = changes.inserts.len(),
            updated = changes.updates.len(),
            deleted = changes.deletes.len(),
            total = order.total(),
            "order updated"
        );
        Ok(())
    }

    async fn find(&self, id: &str) -> AppResult<Order> {
        let mut rows = Orders::find_by_id(id.to_string())
            .find_with_related(OrderItems)
            .all(&self.orm)
            .await?;
        let (order, items) = match rows.pop() {
            Some(row) => row,
            None => return Err(AppError::NotFound(id.to_string())),
        };

        order_from_entity(order, items)
    }

    async fn find_all(&self) -> AppResult<Vec<Order>> {
        // both reads share one transaction so parents and items come from the same snapshot
        let txn = self.orm.begin().await?;
        let orders = Orders::find().all(&txn).await?;
        let items = orders.load_many(OrderItems, &txn).await?;
        txn.commit().await?;

        let orders = orders
            .into_iter()
            .zip(items)
            .map(|(order, items)| order_from_entity(order, items))
            .collect::<AppResult<Vec<_>>>()?;

        tracing::debug!(count = orders.len(), "orders loaded");
        Ok(orders)
    }
}

/// Applies deletes, then updates, then inserts to the item rows of one order.
async fn apply_item_changes(
    txn: &DatabaseTransaction,
    order_id: &str,
    changes: &ItemChanges<'_>,
) -> AppResult<()> {
    if !changes.deletes.is_empty() {
        let result = OrderItems::delete_many()
            .filter(OrderItemCol::OrderId.eq(order_id))
            .filter(OrderItemCol::Id.is_in(changes.deletes.iter().cloned()))
            .exec(txn)
            .await?;
        if result.rows_affected != changes.deletes.len() as u64 {
            return Err(AppError::PartialWrite(format!(
                "deleted {} of {} items of order {}",
                result.rows_affected,
                changes.deletes.len(),
                order_id
            )));
        }
    }

    for item in &changes.updates {
        order_item_to_active(order_id, item).update(txn).await?;
    }

    if !changes.inserts.is_empty() {
        OrderItems::insert_many(
            changes
                .inserts
                .iter()
                .map(|item| order_item_to_active(order_id, item)),
        )
        .exec_without_returning(txn)
        .await?;
    }

    Ok(())
}
