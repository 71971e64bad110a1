use std::path::Path;

use order_repository::{
    config::AppConfig,
    db::{OrmConn, create_orm_conn, run_migrations},
    domain::OrderItem,
    entity::{
        customers::ActiveModel as CustomerActive,
        products::{ActiveModel as ProductActive, Model as ProductModel},
    },
    repository::OrderRepository,
};
use sea_orm::{ActiveModelTrait, Set};

pub async fn setup() -> anyhow::Result<(OrmConn, OrderRepository)> {
    let mut config = AppConfig::new("sqlite::memory:");
    // every pooled connection to sqlite::memory: would open its own empty database
    config.max_connections = Some(1);
    let orm = create_orm_conn(&config).await?;
    run_migrations(&orm, Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations")).await?;
    Ok((orm.clone(), OrderRepository::new(orm)))
}

pub async fn create_customer(orm: &OrmConn, id: &str, name: &str) -> anyhow::Result<()> {
    CustomerActive {
        id: Set(id.into()),
        name: Set(name.into()),
    }
    .insert(orm)
    .await?;
    Ok(())
}

pub async fn create_product(
    orm: &OrmConn,
    id: &str,
    name: &str,
    price: i64,
) -> anyhow::Result<ProductModel> {
    let product = ProductActive {
        id: Set(id.into()),
        name: Set(name.into()),
        price: Set(price),
    }
    .insert(orm)
    .await?;
    Ok(product)
}

/// Builds an item from a snapshot of the product's name and price.
pub fn item_for(id: &str, product: &ProductModel, quantity: i32) -> OrderItem {
    OrderItem::new(id, product.name.clone(), product.price, product.id.clone(), quantity)
        .expect("valid order item")
}
