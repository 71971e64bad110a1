use order_repository::{
    config::AppConfig,
    db::{OrmConn, create_orm_conn, run_migrations},
    domain::{Order, OrderItem},
    entity::{
        Customers, Products,
        customers::ActiveModel as CustomerActive,
        products::{ActiveModel as ProductActive, Model as ProductModel},
    },
    repository::{OrderRepository, Repository},
};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,order_repository=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config).await?;
    // Ensure migrations are applied.
    run_migrations(&orm, &config.migrations_dir).await?;

    let customer_id = ensure_customer(&orm, "123", "Customer 1").await?;
    let product = ensure_product(&orm, "123", "Product 1", 10).await?;

    // Item name and price are copied from the product at order time.
    let item = OrderItem::new("1", product.name.clone(), product.price, product.id.clone(), 2)?;
    let order = Order::new(Uuid::new_v4().to_string(), customer_id, vec![item])?;

    let repository = OrderRepository::new(orm);
    repository.create(&order).await?;
    let stored = repository.find(order.id()).await?;

    println!("{}", serde_json::to_string_pretty(&stored)?);
    println!("Seed completed. Order ID: {}, total: {}", stored.id(), stored.total());
    Ok(())
}

async fn ensure_customer(orm: &OrmConn, id: &str, name: &str) -> anyhow::Result<String> {
    if let Some(existing) = Customers::find_by_id(id.to_string()).one(orm).await? {
        return Ok(existing.id);
    }
    let customer = CustomerActive {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
    }
    .insert(orm)
    .await?;

    println!("Ensured customer {id}");
    Ok(customer.id)
}

async fn ensure_product(
    orm: &OrmConn,
    id: &str,
    name: &str,
    price: i64,
) -> anyhow::Result<ProductModel> {
    if let Some(existing) = Products::find_by_id(id.to_string()).one(orm).await? {
        return Ok(existing);
    }
    let product = ProductActive {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
        price: Set(price),
    }
    .insert(orm)
    .await?;

    println!("Ensured product {id}");
    Ok(product)
}
