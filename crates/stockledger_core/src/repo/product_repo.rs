//! Product repository contract and SQLite implementation.
//!
//! # Invariants
//! - `update_product` never writes `stock_quantity`; stock only changes
//!   through `MovementRepository::record_movement`.
//! - Deleting a product referenced by movements is refused by the
//!   `ON DELETE RESTRICT` foreign key.

use super::{parse_decimal_column, parse_quantity_column, parse_uuid_column};
use super::{RepoError, RepoResult};
use crate::model::product::{Product, ProductCategory, ProductId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const PRODUCT_SELECT_SQL: &str = "SELECT
    uuid,
    code,
    description,
    category,
    supplier_cost,
    stock_quantity
FROM products";

/// Query options for listing products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListQuery {
    pub category: Option<ProductCategory>,
}

/// Repository interface for product persistence.
pub trait ProductRepository {
    fn create_product(&self, product: &Product) -> RepoResult<ProductId>;
    /// Writes every editable field. Stock quantity is left untouched.
    fn update_product(&self, product: &Product) -> RepoResult<()>;
    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>>;
    fn product_exists(&self, id: ProductId) -> RepoResult<bool>;
    /// Lists products in creation order.
    fn list_products(&self, query: &ProductListQuery) -> RepoResult<Vec<Product>>;
    fn delete_product(&self, id: ProductId) -> RepoResult<()>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create_product(&self, product: &Product) -> RepoResult<ProductId> {
        product.validate()?;

        self.conn.execute(
            "INSERT INTO products (
                uuid,
                code,
                description,
                category,
                supplier_cost,
                stock_quantity
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                product.id.to_string(),
                product.code.as_str(),
                product.description.as_str(),
                product.category.as_str(),
                product.supplier_cost.to_string(),
                i64::from(product.stock_quantity),
            ],
        )?;

        Ok(product.id)
    }

    fn update_product(&self, product: &Product) -> RepoResult<()> {
        product.validate()?;

        let changed = self.conn.execute(
            "UPDATE products
             SET
                code = ?1,
                description = ?2,
                category = ?3,
                supplier_cost = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?5;",
            params![
                product.code.as_str(),
                product.description.as_str(),
                product.category.as_str(),
                product.supplier_cost.to_string(),
                product.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(product.id));
        }

        Ok(())
    }

    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }

        Ok(None)
    }

    fn product_exists(&self, id: ProductId) -> RepoResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM products WHERE uuid = ?1;",
                [id.to_string()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn list_products(&self, query: &ProductListQuery) -> RepoResult<Vec<Product>> {
        let mut sql = format!("{PRODUCT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }

        sql.push_str(" ORDER BY created_at ASC, rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut products = Vec::new();
        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }

    fn delete_product(&self, id: ProductId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid_column(&uuid_text, "products.uuid")?;

    let category_text: String = row.get("category")?;
    let category = category_text.parse::<ProductCategory>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in products.category"
        ))
    })?;

    let cost_text: String = row.get("supplier_cost")?;
    let supplier_cost = parse_decimal_column(&cost_text, "products.supplier_cost")?;
    let stock_quantity =
        parse_quantity_column(row.get("stock_quantity")?, "products.stock_quantity")?;

    let product = Product {
        id,
        code: row.get("code")?,
        description: row.get("description")?,
        category,
        supplier_cost,
        stock_quantity,
    };
    product.validate()?;
    Ok(product)
}
