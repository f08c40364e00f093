//! Movement repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Append movements together with the stock change they caused.
//! - Serve movement history in a deterministic, chronological order.
//!
//! # Invariants
//! - `record_movement` writes the product stock and inserts the movement
//!   in one transaction; either both land or neither does.
//! - Lists are ordered by `moved_at ASC, seq ASC`, so the first incoming
//!   movement of a product is well defined.

use super::{parse_decimal_column, parse_quantity_column, parse_uuid_column};
use super::{RepoError, RepoResult};
use crate::model::movement::{Movement, MovementId, MovementKind};
use crate::model::product::{Product, ProductId};
use rusqlite::{params, Connection, Row};

const MOVEMENT_SELECT_SQL: &str = "SELECT
    uuid,
    product_uuid,
    kind,
    sale_amount,
    quantity,
    moved_at
FROM stock_movements";

const MOVEMENT_ORDER_SQL: &str = "ORDER BY moved_at ASC, seq ASC";

/// Repository interface for movement history.
pub trait MovementRepository {
    /// Persists `product`'s stock quantity, then inserts `movement`.
    fn record_movement(&self, product: &Product, movement: &Movement) -> RepoResult<()>;
    fn get_movement(&self, id: MovementId) -> RepoResult<Option<Movement>>;
    fn list_movements(&self) -> RepoResult<Vec<Movement>>;
    fn list_movements_for_product(&self, product_id: ProductId) -> RepoResult<Vec<Movement>>;
    fn has_movements_for_product(&self, product_id: ProductId) -> RepoResult<bool>;
    fn count_movements_for_product(&self, product_id: ProductId) -> RepoResult<u64>;
}

/// SQLite-backed movement repository.
pub struct SqliteMovementRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMovementRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_movements(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<Movement>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut movements = Vec::new();
        while let Some(row) = rows.next()? {
            movements.push(parse_movement_row(row)?);
        }
        Ok(movements)
    }
}

impl MovementRepository for SqliteMovementRepository<'_> {
    fn record_movement(&self, product: &Product, movement: &Movement) -> RepoResult<()> {
        if movement.product_id != product.id {
            return Err(RepoError::InvalidData(format!(
                "movement {} references product {} but product {} was supplied",
                movement.id, movement.product_id, product.id
            )));
        }

        let tx = self.conn.unchecked_transaction()?;

        let changed = tx.execute(
            "UPDATE products
             SET
                stock_quantity = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?2;",
            params![i64::from(product.stock_quantity), product.id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(product.id));
        }

        tx.execute(
            "INSERT INTO stock_movements (
                uuid,
                product_uuid,
                kind,
                sale_amount,
                quantity,
                moved_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                movement.id.to_string(),
                movement.product_id.to_string(),
                movement.kind.as_str(),
                movement.sale_amount.map(|amount| amount.to_string()),
                i64::from(movement.quantity),
                movement.moved_at,
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn get_movement(&self, id: MovementId) -> RepoResult<Option<Movement>> {
        let mut movements = self.query_movements(
            &format!("{MOVEMENT_SELECT_SQL} WHERE uuid = ?1;"),
            [id.to_string()],
        )?;
        Ok(movements.pop())
    }

    fn list_movements(&self) -> RepoResult<Vec<Movement>> {
        self.query_movements(&format!("{MOVEMENT_SELECT_SQL} {MOVEMENT_ORDER_SQL};"), [])
    }

    fn list_movements_for_product(&self, product_id: ProductId) -> RepoResult<Vec<Movement>> {
        self.query_movements(
            &format!("{MOVEMENT_SELECT_SQL} WHERE product_uuid = ?1 {MOVEMENT_ORDER_SQL};"),
            [product_id.to_string()],
        )
    }

    fn has_movements_for_product(&self, product_id: ProductId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM stock_movements WHERE product_uuid = ?1
            );",
            [product_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn count_movements_for_product(&self, product_id: ProductId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM stock_movements WHERE product_uuid = ?1;",
            [product_id.to_string()],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative movement count `{count}`")))
    }
}

fn parse_movement_row(row: &Row<'_>) -> RepoResult<Movement> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid_column(&uuid_text, "stock_movements.uuid")?;

    let product_text: String = row.get("product_uuid")?;
    let product_id = parse_uuid_column(&product_text, "stock_movements.product_uuid")?;

    let kind_text: String = row.get("kind")?;
    let kind = kind_text.parse::<MovementKind>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid movement kind `{kind_text}` in stock_movements.kind"
        ))
    })?;

    let sale_amount = match row.get::<_, Option<String>>("sale_amount")? {
        Some(value) => Some(parse_decimal_column(
            &value,
            "stock_movements.sale_amount",
        )?),
        None => None,
    };

    let quantity = parse_quantity_column(row.get("quantity")?, "stock_movements.quantity")?;
    if quantity == 0 {
        return Err(RepoError::InvalidData(
            "zero quantity in stock_movements.quantity".to_string(),
        ));
    }

    Ok(Movement {
        id,
        product_id,
        kind,
        sale_amount,
        quantity,
        moved_at: row.get("moved_at")?,
    })
}
