//! SQLite-backed inventory store.
//!
//! ## Schema
//!
//! - `products(sku PRIMARY KEY, name, category, size, color, price, cost,
//!   quantity, lead_time_days, reorder_point, estimated_annual_demand)`
//! - `sales(id AUTOINCREMENT, date, sku, quantity, revenue)`; `sku` is an
//!   informational link, not a foreign key
//!
//! Databases created before `estimated_annual_demand` existed are migrated in
//! place when the store opens.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | Database (unique violation) | `Domain(Conflict)` |
//! | Database (check violation) | `Domain(InvariantViolation)` |
//! | Database (other), PoolClosed, decode failures, ... | `Storage` |
//!
//! ## Concurrency
//!
//! Every mutation runs inside one transaction while holding the store's writer
//! lock, so read-check-write sequences never interleave within a process.
//! Readers only ever see committed rows.

use core::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Row, Sqlite, SqlitePool, Transaction};
use tokio::sync::Mutex;
use tracing::instrument;

use shelfwise_core::{DomainError, SaleId, Sku};
use shelfwise_inventory::{
    DEFAULT_ANNUAL_DEMAND, DEFAULT_LEAD_TIME_DAYS, DEFAULT_REORDER_POINT, Product, Sale,
    SaleDecision, SaleOutcome,
};

use super::{
    AddOutcome, InventoryStore, StoreError, StoreResult, duplicate_sku, ensure_positive,
    unknown_sku,
};
use crate::config::{DuplicateSkuPolicy, StoreConfig};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const INSERT_PRODUCT: &str = r#"
    INSERT INTO products (
        sku, name, category, size, color, price, cost, quantity,
        lead_time_days, reorder_point, estimated_annual_demand
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
"#;

const UPSERT_PRODUCT: &str = r#"
    INSERT INTO products (
        sku, name, category, size, color, price, cost, quantity,
        lead_time_days, reorder_point, estimated_annual_demand
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    ON CONFLICT(sku) DO UPDATE SET
        name = excluded.name,
        category = excluded.category,
        size = excluded.size,
        color = excluded.color,
        price = excluded.price,
        cost = excluded.cost,
        quantity = excluded.quantity,
        lead_time_days = excluded.lead_time_days,
        reorder_point = excluded.reorder_point,
        estimated_annual_demand = excluded.estimated_annual_demand
"#;

const PRODUCT_COLUMNS: &str = "sku, name, category, size, color, price, cost, quantity, \
     lead_time_days, reorder_point, estimated_annual_demand";

/// SQLite-backed inventory store.
///
/// Open with [`SqliteInventoryStore::connect`] and release with
/// [`SqliteInventoryStore::close`]; there is no ambient connection.
#[derive(Debug)]
pub struct SqliteInventoryStore {
    pool: SqlitePool,
    writer: Mutex<()>,
    duplicate_policy: DuplicateSkuPolicy,
}

impl SqliteInventoryStore {
    /// Open (or create) the database described by `config` and bring its schema
    /// up to date.
    #[instrument(skip(config), fields(database_url = %config.database_url), err)]
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;

        let mut options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| map_sqlx_error("parse_database_url", e))?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        // An in-memory database disappears with its last connection, so the
        // pool keeps exactly one connection alive for the store's lifetime.
        let pool_options = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Self::with_pool(pool, config.duplicate_policy).await
    }

    /// Wrap an existing pool, creating or migrating the schema.
    pub async fn with_pool(pool: SqlitePool, duplicate_policy: DuplicateSkuPolicy) -> StoreResult<Self> {
        migrate(&pool).await?;
        tracing::info!(policy = %duplicate_policy, "inventory store ready");
        Ok(Self {
            pool,
            writer: Mutex::new(()),
            duplicate_policy,
        })
    }

    /// Flush and close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("inventory store closed");
    }

    /// Start a write transaction.
    ///
    /// `BEGIN IMMEDIATE` takes SQLite's write lock up front, so a second process
    /// writing the same file waits in the busy handler instead of failing when
    /// its read lock cannot be upgraded.
    async fn begin(&self) -> StoreResult<Transaction<'static, Sqlite>> {
        begin_immediate(&self.pool).await
    }
}

#[async_trait]
impl InventoryStore for SqliteInventoryStore {
    #[instrument(skip(self, product), fields(sku = %product.sku), err)]
    async fn add_product(&self, product: Product) -> StoreResult<AddOutcome> {
        product.validate()?;
        let _writer = self.writer.lock().await;
        let mut tx = self.begin().await?;

        let (exists, statement, operation) = match self.duplicate_policy {
            // A duplicate surfaces as a unique violation, mapped to Conflict.
            DuplicateSkuPolicy::Reject => (false, INSERT_PRODUCT, "insert_product"),
            DuplicateSkuPolicy::Upsert => (
                fetch_product(&mut tx, &product.sku).await?.is_some(),
                UPSERT_PRODUCT,
                "upsert_product",
            ),
        };

        sqlx::query(statement)
            .bind(product.sku.as_str())
            .bind(&product.name)
            .bind(&product.category)
            .bind(&product.size)
            .bind(&product.color)
            .bind(product.price)
            .bind(product.cost)
            .bind(i64::from(product.quantity))
            .bind(i64::from(product.lead_time_days))
            .bind(i64::from(product.reorder_point))
            .bind(i64::from(product.estimated_annual_demand))
            .execute(&mut *tx)
            .await
            .map_err(|e| match map_sqlx_error(operation, e) {
                err if err.is_conflict() => duplicate_sku(&product.sku),
                err => err,
            })?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit_transaction", e))?;

        tracing::info!(replaced = exists, "product stored");
        Ok(if exists {
            AddOutcome::Replaced
        } else {
            AddOutcome::Inserted
        })
    }

    #[instrument(skip(self), fields(sku = %sku), err)]
    async fn restock(&self, sku: &Sku, amount: u32) -> StoreResult<Product> {
        ensure_positive("restock amount", amount)?;
        let _writer = self.writer.lock().await;
        let mut tx = self.begin().await?;

        let Some(mut product) = fetch_product(&mut tx, sku).await? else {
            tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(unknown_sku(sku));
        };
        product.quantity = product.restock(amount)?;

        update_quantity(&mut tx, sku, product.quantity).await?;
        tx.commit().await.map_err(|e| map_sqlx_error("commit_transaction", e))?;

        tracing::info!(quantity = product.quantity, "product restocked");
        Ok(product)
    }

    #[instrument(skip(self), fields(sku = %sku), err)]
    async fn record_sale(&self, sku: &Sku, quantity: u32) -> StoreResult<SaleOutcome> {
        ensure_positive("sale quantity", quantity)?;
        let _writer = self.writer.lock().await;
        let mut tx = self.begin().await?;

        let Some(product) = fetch_product(&mut tx, sku).await? else {
            tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(unknown_sku(sku));
        };

        let (remaining, revenue) = match product.decide_sale(quantity)? {
            SaleDecision::Fulfil { remaining, revenue } => (remaining, revenue),
            SaleDecision::Insufficient { available } => {
                tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
                tracing::warn!(requested = quantity, available, "insufficient stock");
                return Ok(SaleOutcome::InsufficientStock {
                    sku: sku.clone(),
                    requested: quantity,
                    available,
                });
            }
        };

        update_quantity(&mut tx, sku, remaining).await?;

        // Stored with microsecond precision; truncate so the returned record
        // equals what a later read produces.
        let date = Utc::now().trunc_subsecs(6);
        let result = sqlx::query(
            r#"
            INSERT INTO sales (date, sku, quantity, revenue)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(format_timestamp(date))
        .bind(sku.as_str())
        .bind(i64::from(quantity))
        .bind(revenue)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_sale", e))?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit_transaction", e))?;

        let sale = Sale {
            id: SaleId::new(result.last_insert_rowid()),
            date,
            sku: sku.clone(),
            quantity,
            revenue,
        };
        tracing::info!(quantity, revenue, sale_id = %sale.id, "sale recorded");
        Ok(SaleOutcome::Completed(sale))
    }

    async fn get_product(&self, sku: &Sku) -> StoreResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"
        ))
        .bind(sku.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_product", e))?;

        row.map(Product::try_from).transpose()
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY sku"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn low_stock_items(&self) -> StoreResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE quantity <= COALESCE(reorder_point, {DEFAULT_REORDER_POINT}) \
             ORDER BY sku"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("low_stock_items", e))?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn list_sales(&self) -> StoreResult<Vec<Sale>> {
        let rows: Vec<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, date, sku, quantity, revenue
            FROM sales
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_sales", e))?;

        rows.into_iter().map(Sale::try_from).collect()
    }
}

/// Create tables if missing and add columns introduced after the first release.
async fn migrate(pool: &SqlitePool) -> StoreResult<()> {
    let mut tx = begin_immediate(pool).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            sku                     TEXT PRIMARY KEY,
            name                    TEXT NOT NULL,
            category                TEXT NOT NULL,
            size                    TEXT NOT NULL,
            color                   TEXT NOT NULL,
            price                   REAL NOT NULL,
            cost                    REAL NOT NULL,
            quantity                INTEGER NOT NULL CHECK (quantity >= 0),
            lead_time_days          INTEGER DEFAULT 7,
            reorder_point           INTEGER DEFAULT 10,
            estimated_annual_demand INTEGER DEFAULT 0
        )
        "#,
    )
    .execute(&mut *tx)
    .await
    .map_err(|e| map_sqlx_error("create_products_table", e))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sales (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            date     TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            sku      TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            revenue  REAL NOT NULL
        )
        "#,
    )
    .execute(&mut *tx)
    .await
    .map_err(|e| map_sqlx_error("create_sales_table", e))?;

    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('products')")
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("inspect_products_table", e))?;

    if !columns.iter().any(|c| c == "estimated_annual_demand") {
        tracing::info!("adding estimated_annual_demand column to legacy products table");
        sqlx::query("ALTER TABLE products ADD COLUMN estimated_annual_demand INTEGER DEFAULT 0")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("add_demand_column", e))?;
    }

    tx.commit()
        .await
        .map_err(|e| map_sqlx_error("commit_transaction", e))?;
    Ok(())
}

async fn begin_immediate(pool: &SqlitePool) -> StoreResult<Transaction<'static, Sqlite>> {
    pool.begin_with("BEGIN IMMEDIATE")
        .await
        .map_err(|e| map_sqlx_error("begin_transaction", e))
}

async fn fetch_product(
    tx: &mut Transaction<'static, Sqlite>,
    sku: &Sku,
) -> StoreResult<Option<Product>> {
    let row: Option<ProductRow> = sqlx::query_as(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"
    ))
    .bind(sku.as_str())
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("fetch_product", e))?;

    row.map(Product::try_from).transpose()
}

async fn update_quantity(
    tx: &mut Transaction<'static, Sqlite>,
    sku: &Sku,
    quantity: u32,
) -> StoreResult<()> {
    let result = sqlx::query("UPDATE products SET quantity = ?1 WHERE sku = ?2")
        .bind(i64::from(quantity))
        .bind(sku.as_str())
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("update_quantity", e))?;

    if result.rows_affected() != 1 {
        return Err(StoreError::storage(format!(
            "expected to update one row for sku {sku}, updated {}",
            result.rows_affected()
        )));
    }
    Ok(())
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            if db_err.is_unique_violation() {
                DomainError::conflict(msg).into()
            } else if db_err.is_check_violation() {
                DomainError::invariant(msg).into()
            } else {
                StoreError::Storage(msg)
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Storage(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::RowNotFound => {
            // Queries here use fetch_optional/fetch_all.
            StoreError::Storage(format!("unexpected row not found in {}", operation))
        }
        _ => StoreError::Storage(format!("sqlx error in {}: {}", operation, err)),
    }
}

fn format_timestamp(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// Parse a stored sale date. Rows written by SQLite's `CURRENT_TIMESTAMP`
/// default use `YYYY-MM-DD HH:MM:SS` in UTC.
fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::storage(format!("invalid sale timestamp '{raw}': {e}")))
}

fn column_u32(column: &str, value: i64) -> StoreResult<u32> {
    u32::try_from(value)
        .map_err(|_| StoreError::storage(format!("column {column} out of range: {value}")))
}

fn stored_sku(raw: String) -> StoreResult<Sku> {
    Sku::parse(&raw).map_err(|e| StoreError::storage(format!("invalid stored sku '{raw}': {e}")))
}

// SQLx row types

#[derive(Debug)]
struct ProductRow {
    sku: String,
    name: String,
    category: String,
    size: String,
    color: String,
    price: f64,
    cost: f64,
    quantity: i64,
    lead_time_days: Option<i64>,
    reorder_point: Option<i64>,
    estimated_annual_demand: Option<i64>,
}

impl<'r> FromRow<'r, SqliteRow> for ProductRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            sku: row.try_get("sku")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            size: row.try_get("size")?,
            color: row.try_get("color")?,
            price: row.try_get("price")?,
            cost: row.try_get("cost")?,
            quantity: row.try_get("quantity")?,
            lead_time_days: row.try_get("lead_time_days")?,
            reorder_point: row.try_get("reorder_point")?,
            estimated_annual_demand: row.try_get("estimated_annual_demand")?,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            sku: stored_sku(row.sku)?,
            name: row.name,
            category: row.category,
            size: row.size,
            color: row.color,
            price: row.price,
            cost: row.cost,
            quantity: column_u32("quantity", row.quantity)?,
            lead_time_days: row
                .lead_time_days
                .map(|v| column_u32("lead_time_days", v))
                .transpose()?
                .unwrap_or(DEFAULT_LEAD_TIME_DAYS),
            reorder_point: row
                .reorder_point
                .map(|v| column_u32("reorder_point", v))
                .transpose()?
                .unwrap_or(DEFAULT_REORDER_POINT),
            estimated_annual_demand: row
                .estimated_annual_demand
                .map(|v| column_u32("estimated_annual_demand", v))
                .transpose()?
                .unwrap_or(DEFAULT_ANNUAL_DEMAND),
        })
    }
}

#[derive(Debug)]
struct SaleRow {
    id: i64,
    date: String,
    sku: String,
    quantity: i64,
    revenue: f64,
}

impl<'r> FromRow<'r, SqliteRow> for SaleRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(SaleRow {
            id: row.try_get("id")?,
            date: row.try_get("date")?,
            sku: row.try_get("sku")?,
            quantity: row.try_get("quantity")?,
            revenue: row.try_get("revenue")?,
        })
    }
}

impl TryFrom<SaleRow> for Sale {
    type Error = StoreError;

    fn try_from(row: SaleRow) -> Result<Self, Self::Error> {
        Ok(Sale {
            id: SaleId::new(row.id),
            date: parse_timestamp(&row.date)?,
            sku: stored_sku(row.sku)?,
            quantity: column_u32("quantity", row.quantity)?,
            revenue: row.revenue,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn product(sku: &str, quantity: u32) -> Product {
        Product::new(
            Sku::parse(sku).unwrap(),
            "Zip-Up Hoody",
            "Outerwear",
            "L",
            "Grey",
            55.0,
            25.0,
            quantity,
        )
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::file(dir.path().join("inventory.db"));
        let sku = Sku::parse("HD-ZK-L-GRY").unwrap();

        {
            let store = SqliteInventoryStore::connect(&config).await.unwrap();
            store.add_product(product("HD-ZK-L-GRY", 45)).await.unwrap();
            store.record_sale(&sku, 5).await.unwrap();
            store.close().await;
        }

        let store = SqliteInventoryStore::connect(&config).await.unwrap();
        let reloaded = store.get_product(&sku).await.unwrap().unwrap();
        assert_eq!(reloaded.quantity, 40);
        let sales = store.list_sales().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].revenue, 275.0);
        store.close().await;
    }

    #[tokio::test]
    async fn legacy_schema_gains_demand_column() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::file(dir.path().join("legacy.db"));

        let options = SqliteConnectOptions::from_str(&config.database_url)
            .unwrap()
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.unwrap();
        sqlx::query(
            r#"
            CREATE TABLE products (
                sku TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                size TEXT NOT NULL,
                color TEXT NOT NULL,
                price REAL NOT NULL,
                cost REAL NOT NULL,
                quantity INTEGER NOT NULL,
                lead_time_days INTEGER DEFAULT 7,
                reorder_point INTEGER DEFAULT 10
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO products (sku, name, category, size, color, price, cost, quantity) \
             VALUES ('SW-CR-M-BLU', 'Crewneck Sweatshirt', 'Outerwear', 'M', 'Blue', 45.0, 20.0, 50)",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool.close().await;

        let store = SqliteInventoryStore::connect(&config).await.unwrap();
        let products = store.list_products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].estimated_annual_demand, 0);
        assert_eq!(products[0].lead_time_days, 7);
        assert_eq!(products[0].reorder_point, 10);
        store.close().await;
    }

    #[tokio::test]
    async fn sales_written_with_sqlite_default_timestamp_are_readable() {
        let store = SqliteInventoryStore::connect(&StoreConfig::in_memory())
            .await
            .unwrap();
        sqlx::query("INSERT INTO sales (sku, quantity, revenue) VALUES ('TS-SH-L-WHT', 2, 40.0)")
            .execute(&store.pool)
            .await
            .unwrap();

        let sales = store.list_sales().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].sku.as_str(), "TS-SH-L-WHT");
        assert_eq!(sales[0].quantity, 2);
    }

    #[tokio::test]
    async fn negative_stock_is_rejected_by_the_schema() {
        let store = SqliteInventoryStore::connect(&StoreConfig::in_memory())
            .await
            .unwrap();
        store.add_product(product("HD-ZK-L-GRY", 1)).await.unwrap();

        let err = sqlx::query("UPDATE products SET quantity = -1 WHERE sku = 'HD-ZK-L-GRY'")
            .execute(&store.pool)
            .await
            .unwrap_err();
        assert!(matches!(
            map_sqlx_error("update_quantity", err),
            StoreError::Domain(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn parses_both_timestamp_formats() {
        let rfc = parse_timestamp("2024-03-01T10:15:30.123456Z").unwrap();
        assert_eq!(format_timestamp(rfc), "2024-03-01T10:15:30.123456Z");

        let legacy = parse_timestamp("2024-03-01 10:15:30").unwrap();
        assert_eq!(legacy.to_rfc3339(), "2024-03-01T10:15:30+00:00");

        assert!(parse_timestamp("yesterday").is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn two_handles_on_one_file_serialize_sales() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::file(dir.path().join("shared.db"));
        let sku = Sku::parse("HD-ZK-L-GRY").unwrap();

        let first = Arc::new(SqliteInventoryStore::connect(&config).await.unwrap());
        let second = Arc::new(SqliteInventoryStore::connect(&config).await.unwrap());
        first.add_product(product("HD-ZK-L-GRY", 1000)).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..40 {
            let store = if i % 2 == 0 { first.clone() } else { second.clone() };
            let sku = sku.clone();
            handles.push(tokio::spawn(async move { store.record_sale(&sku, 1).await }));
        }
        for handle in handles {
            let outcome = handle.await.unwrap().unwrap();
            assert!(outcome.is_completed());
        }

        let stored = second.get_product(&sku).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 960);
        assert_eq!(first.list_sales().await.unwrap().len(), 40);

        first.close().await;
        second.close().await;
    }

    #[tokio::test]
    async fn failed_sale_insert_leaves_stock_untouched() {
        let store = SqliteInventoryStore::connect(&StoreConfig::in_memory())
            .await
            .unwrap();
        let sku = Sku::parse("HD-ZK-L-GRY").unwrap();
        store.add_product(product("HD-ZK-L-GRY", 10)).await.unwrap();

        sqlx::query("DROP TABLE sales")
            .execute(&store.pool)
            .await
            .unwrap();

        let err = store.record_sale(&sku, 3).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)), "got {err:?}");

        let stored = store.get_product(&sku).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 10);
    }

    #[tokio::test]
    async fn duplicate_insert_maps_unique_violation_to_conflict() {
        let store = SqliteInventoryStore::connect(&StoreConfig::in_memory())
            .await
            .unwrap();
        store.add_product(product("HD-ZK-L-GRY", 10)).await.unwrap();

        let err = store
            .add_product(product("HD-ZK-L-GRY", 99))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(
            err.to_string(),
            "conflict: product with sku HD-ZK-L-GRY already exists"
        );

        let sku = Sku::parse("HD-ZK-L-GRY").unwrap();
        assert_eq!(store.get_product(&sku).await.unwrap().unwrap().quantity, 10);
    }

    #[tokio::test]
    async fn rejects_non_sqlite_url() {
        let config = StoreConfig {
            database_url: "postgres://localhost/shop".to_string(),
            ..StoreConfig::default()
        };
        let err = SqliteInventoryStore::connect(&config).await.unwrap_err();
        assert!(err.is_validation());
    }
}
