use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const ITEM_COLUMNS: &str = "item_id, business_id, name, quantity, purchase_price, sale_price, supplier_id, location, restock_threshold, created_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InventoryItemRow {
    pub item_id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub purchase_price: f64,
    pub sale_price: f64,
    pub supplier_id: Uuid,
    pub location: Option<String>,
    pub restock_threshold: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInventoryItem<'a> {
    pub business_id: Uuid,
    pub name: &'a str,
    pub quantity: i64,
    pub purchase_price: f64,
    pub sale_price: f64,
    pub supplier_id: Uuid,
    pub location: Option<&'a str>,
    pub restock_threshold: i64,
}

#[derive(Debug, Clone)]
pub struct InventoryItemUpdate<'a> {
    pub name: &'a str,
    pub quantity: i64,
    pub purchase_price: f64,
    pub sale_price: f64,
    pub supplier_id: Uuid,
    pub location: Option<&'a str>,
    pub restock_threshold: i64,
}

// Item access is scoped through the owning business: every read and write
// requires that the item's business belongs to the given owner.
pub struct InventoryRepo;

impl InventoryRepo {
    pub async fn create(pool: &PgPool, new: &NewInventoryItem<'_>) -> Result<Uuid> {
        let item_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO inventory (item_id, business_id, name, quantity, purchase_price, sale_price, supplier_id, location, restock_threshold)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(item_id)
        .bind(new.business_id)
        .bind(new.name)
        .bind(new.quantity)
        .bind(new.purchase_price)
        .bind(new.sale_price)
        .bind(new.supplier_id)
        .bind(new.location)
        .bind(new.restock_threshold)
        .execute(pool)
        .await
        .context("Failed to create inventory item")?;
        Ok(item_id)
    }

    pub async fn list_by_business(
        pool: &PgPool,
        business_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Vec<InventoryItemRow>> {
        let rows = sqlx::query_as::<_, InventoryItemRow>(&format!(
            "SELECT {} FROM inventory \
             WHERE business_id = $1 \
               AND EXISTS (SELECT 1 FROM business b \
                           WHERE b.business_id = inventory.business_id AND b.owner_id = $2) \
             ORDER BY created_at DESC",
            ITEM_COLUMNS
        ))
        .bind(business_id)
        .bind(owner_id)
        .fetch_all(pool)
        .await
        .context("Failed to list inventory items")?;
        Ok(rows)
    }

    pub async fn get(
        pool: &PgPool,
        item_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<InventoryItemRow>> {
        let row = sqlx::query_as::<_, InventoryItemRow>(&format!(
            "SELECT {} FROM inventory \
             WHERE item_id = $1 \
               AND EXISTS (SELECT 1 FROM business b \
                           WHERE b.business_id = inventory.business_id AND b.owner_id = $2)",
            ITEM_COLUMNS
        ))
        .bind(item_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get inventory item")?;
        Ok(row)
    }

    pub async fn update(
        pool: &PgPool,
        item_id: Uuid,
        owner_id: Uuid,
        update: &InventoryItemUpdate<'_>,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE inventory
            SET name = $1, quantity = $2, purchase_price = $3, sale_price = $4,
                supplier_id = $5, location = $6, restock_threshold = $7
            WHERE item_id = $8
              AND EXISTS (SELECT 1 FROM business b
                          WHERE b.business_id = inventory.business_id AND b.owner_id = $9)
            "#,
        )
        .bind(update.name)
        .bind(update.quantity)
        .bind(update.purchase_price)
        .bind(update.sale_price)
        .bind(update.supplier_id)
        .bind(update.location)
        .bind(update.restock_threshold)
        .bind(item_id)
        .bind(owner_id)
        .execute(pool)
        .await
        .context("Failed to update inventory item")?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, item_id: Uuid, owner_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM inventory \
             WHERE item_id = $1 \
               AND EXISTS (SELECT 1 FROM business b \
                           WHERE b.business_id = inventory.business_id AND b.owner_id = $2)",
        )
        .bind(item_id)
        .bind(owner_id)
        .execute(pool)
        .await
        .context("Failed to delete inventory item")?;
        Ok(result.rows_affected())
    }
}
