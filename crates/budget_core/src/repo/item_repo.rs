//! Item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `item` table.
//! - Answer period-scoped listings using the `YYYY-MM` prefix of
//!   `purchase_date`.
//!
//! # Invariants
//! - `purchase_date` is persisted as `YYYY-MM-DD` text.
//! - Read paths reject malformed dates/attributes instead of masking them.

use super::{RepoError, RepoResult};
use crate::model::item::{Item, ItemAttribute, ItemId, NewItem};
use crate::period::Period;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

const ITEM_SELECT_SQL: &str = "SELECT
    item_id,
    purchase_date,
    service_name,
    item_name,
    item_price,
    item_attribute
FROM item";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository interface for purchased items.
pub trait ItemRepository {
    fn create_item(&self, item: &NewItem) -> RepoResult<Item>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    /// Replaces every column of an existing item.
    fn update_item(&self, id: ItemId, item: &NewItem) -> RepoResult<Item>;
    /// Deletes one item and returns the removed row.
    fn delete_item(&self, id: ItemId) -> RepoResult<Item>;
    /// Items whose purchase date falls in `period`.
    fn list_items(&self, period: Period) -> RepoResult<Vec<Item>>;
    fn list_service_items(&self, period: Period, service_name: &str) -> RepoResult<Vec<Item>>;
    fn list_all_items(&self) -> RepoResult<Vec<Item>>;
    /// Whether `(service_name, item_name)` is already used, optionally
    /// ignoring the item being edited.
    fn item_name_taken(
        &self,
        service_name: &str,
        item_name: &str,
        excluding: Option<ItemId>,
    ) -> RepoResult<bool>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Wraps a migrated connection (see `db::open_db`).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn collect(&self, sql: &str, bind: impl rusqlite::Params) -> RepoResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, item: &NewItem) -> RepoResult<Item> {
        self.conn.execute(
            "INSERT INTO item (
                purchase_date,
                service_name,
                item_name,
                item_price,
                item_attribute
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                item.purchase_date.format(DATE_FORMAT).to_string(),
                item.service_name.as_str(),
                item.item_name.as_str(),
                item.item_price,
                item.item_attribute.as_str(),
            ],
        )?;

        Ok(materialize(self.conn.last_insert_rowid(), item))
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE item_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }
        Ok(None)
    }

    fn update_item(&self, id: ItemId, item: &NewItem) -> RepoResult<Item> {
        let changed = self.conn.execute(
            "UPDATE item
             SET
                purchase_date = ?1,
                service_name = ?2,
                item_name = ?3,
                item_price = ?4,
                item_attribute = ?5
             WHERE item_id = ?6;",
            params![
                item.purchase_date.format(DATE_FORMAT).to_string(),
                item.service_name.as_str(),
                item.item_name.as_str(),
                item.item_price,
                item.item_attribute.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::ItemNotFound(id));
        }

        Ok(materialize(id, item))
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<Item> {
        let deleted = self
            .conn
            .query_row(
                "DELETE FROM item
                 WHERE item_id = ?1
                 RETURNING item_id, purchase_date, service_name, item_name, item_price, item_attribute;",
                [id],
                |row| Ok(parse_item_row(row)),
            )
            .optional()?;

        match deleted {
            Some(item) => item,
            None => Err(RepoError::ItemNotFound(id)),
        }
    }

    fn list_items(&self, period: Period) -> RepoResult<Vec<Item>> {
        self.collect(
            &format!(
                "{ITEM_SELECT_SQL}
                 WHERE substr(purchase_date, 1, 7) = ?1
                 ORDER BY purchase_date ASC, item_id ASC;"
            ),
            [period.to_string()],
        )
    }

    fn list_service_items(&self, period: Period, service_name: &str) -> RepoResult<Vec<Item>> {
        self.collect(
            &format!(
                "{ITEM_SELECT_SQL}
                 WHERE substr(purchase_date, 1, 7) = ?1
                   AND service_name = ?2
                 ORDER BY purchase_date ASC, item_id ASC;"
            ),
            params![period.to_string(), service_name],
        )
    }

    fn list_all_items(&self) -> RepoResult<Vec<Item>> {
        self.collect(
            &format!("{ITEM_SELECT_SQL} ORDER BY purchase_date ASC, item_id ASC;"),
            params![],
        )
    }

    fn item_name_taken(
        &self,
        service_name: &str,
        item_name: &str,
        excluding: Option<ItemId>,
    ) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM item
                WHERE service_name = ?1
                  AND item_name = ?2
                  AND (?3 IS NULL OR item_id != ?3)
            );",
            params![service_name, item_name, excluding],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn materialize(item_id: ItemId, item: &NewItem) -> Item {
    Item {
        item_id,
        purchase_date: item.purchase_date,
        service_name: item.service_name.clone(),
        item_name: item.item_name.clone(),
        item_price: item.item_price,
        item_attribute: item.item_attribute,
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let date_text: String = row.get("purchase_date")?;
    let purchase_date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in item.purchase_date"
        ))
    })?;

    let attribute_text: String = row.get("item_attribute")?;
    let item_attribute = ItemAttribute::parse(&attribute_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid attribute `{attribute_text}` in item.item_attribute"
        ))
    })?;

    Ok(Item {
        item_id: row.get("item_id")?,
        purchase_date,
        service_name: row.get("service_name")?,
        item_name: row.get("item_name")?,
        item_price: row.get("item_price")?,
        item_attribute,
    })
}
