//! Item (single purchase) domain model.
//!
//! # Responsibility
//! - Represent one purchase attributed to a service by name.
//! - Own the fixed category list used by input forms.
//!
//! # Invariants
//! - An item's period is the year and month of `purchase_date`.
//! - `item_price` of validated input is never negative.

use super::{require_text, ValidationError};
use crate::period::Period;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type ItemId = i64;

/// Fixed category tag for purchases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemAttribute {
    Food,
    DailyGoods,
    Hobby,
    Entertainment,
    Clothing,
    Transport,
    Education,
    Other,
}

impl ItemAttribute {
    pub const ALL: [ItemAttribute; 8] = [
        Self::Food,
        Self::DailyGoods,
        Self::Hobby,
        Self::Entertainment,
        Self::Clothing,
        Self::Transport,
        Self::Education,
        Self::Other,
    ];

    /// Storage and CLI form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::DailyGoods => "daily_goods",
            Self::Hobby => "hobby",
            Self::Entertainment => "entertainment",
            Self::Clothing => "clothing",
            Self::Transport => "transport",
            Self::Education => "education",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.as_str() == normalized)
    }
}

/// Persisted item record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: ItemId,
    pub purchase_date: NaiveDate,
    /// Free-text link to a service of the same period.
    pub service_name: String,
    pub item_name: String,
    pub item_price: i64,
    pub item_attribute: ItemAttribute,
}

impl Item {
    pub fn period(&self) -> Period {
        Period::of_date(self.purchase_date)
    }
}

/// Validated payload for inserting or fully replacing one item row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub purchase_date: NaiveDate,
    pub service_name: String,
    pub item_name: String,
    pub item_price: i64,
    pub item_attribute: ItemAttribute,
}

impl NewItem {
    pub fn period(&self) -> Period {
        Period::of_date(self.purchase_date)
    }
}

/// Raw item input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub purchase_date: String,
    pub service_name: String,
    pub item_name: String,
    pub item_price: String,
    pub item_attribute: String,
}

impl ItemDraft {
    /// Validates every field.
    ///
    /// Blank fields are reported before format errors so a half-filled form
    /// gets the "fill everything in" answer first.
    pub fn validate(&self) -> Result<NewItem, ValidationError> {
        let purchase_date = require_text("purchase_date", &self.purchase_date)?;
        let service_name = require_text("service_name", &self.service_name)?;
        let item_name = require_text("item_name", &self.item_name)?;
        let item_price = require_text("item_price", &self.item_price)?;
        let item_attribute = require_text("item_attribute", &self.item_attribute)?;

        let purchase_date = NaiveDate::parse_from_str(&purchase_date, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidPurchaseDate(purchase_date.clone()))?;
        let item_price = match item_price.parse::<i64>() {
            Ok(price) if price >= 0 => price,
            _ => return Err(ValidationError::InvalidPrice(item_price)),
        };
        let item_attribute = ItemAttribute::parse(&item_attribute)
            .ok_or(ValidationError::InvalidAttribute(item_attribute))?;

        Ok(NewItem {
            purchase_date,
            service_name,
            item_name,
            item_price,
            item_attribute,
        })
    }
}
