//! Item registration use cases.
//!
//! # Responsibility
//! - Validate purchases and enforce `(service_name, item_name)` uniqueness.
//! - Require at least one current-period service before accepting items.
//!
//! # Invariants
//! - Uniqueness is a pre-check, not a storage constraint.
//! - An item's `service_name` is not required to match a registered service.

use super::{BudgetError, BudgetResult};
use crate::clock::Clock;
use crate::model::item::{Item, ItemAttribute, ItemDraft, ItemId, NewItem};
use crate::model::ValidationError;
use crate::period::{current_period, Period};
use crate::repo::item_repo::ItemRepository;
use crate::repo::service_repo::ServiceRepository;
use log::{info, warn};

/// Use-case facade for purchased items.
pub struct ItemService<S: ServiceRepository, I: ItemRepository, C: Clock> {
    services: S,
    items: I,
    clock: C,
}

impl<S: ServiceRepository, I: ItemRepository, C: Clock> ItemService<S, I, C> {
    pub fn new(services: S, items: I, clock: C) -> Self {
        Self {
            services,
            items,
            clock,
        }
    }

    /// Fixed category list offered by input forms.
    pub fn item_attributes(&self) -> &'static [ItemAttribute] {
        &ItemAttribute::ALL
    }

    pub fn get_item(&self, id: ItemId) -> BudgetResult<Item> {
        self.items.get_item(id)?.ok_or(BudgetError::ItemNotFound(id))
    }

    /// Items purchased in `period`, oldest first.
    pub fn list_items(&self, period: Period) -> BudgetResult<Vec<Item>> {
        Ok(self.items.list_items(period)?)
    }

    /// Records a purchase.
    pub fn register_item(&self, draft: &ItemDraft) -> BudgetResult<Item> {
        let result = self.try_register_item(draft);
        match &result {
            Ok(item) => info!(
                "event=item_register module=service status=ok item_id={} period={}",
                item.item_id,
                item.period()
            ),
            Err(err) => warn!(
                "event=item_register module=service status=rejected error_code={}",
                err.code()
            ),
        }
        result
    }

    fn try_register_item(&self, draft: &ItemDraft) -> BudgetResult<Item> {
        let period = current_period(&self.clock);
        if !self.services.service_exists_in(period)? {
            return Err(BudgetError::NoServicesInPeriod(period));
        }

        let new_item = draft.validate()?;
        self.ensure_name_free(&new_item, None)?;
        Ok(self.items.create_item(&new_item)?)
    }

    /// Replaces every field of an existing item.
    pub fn edit_item(&self, id: ItemId, draft: &ItemDraft) -> BudgetResult<Item> {
        let result = self.try_edit_item(id, draft);
        match &result {
            Ok(item) => info!(
                "event=item_edit module=service status=ok item_id={} period={}",
                item.item_id,
                item.period()
            ),
            Err(err) => warn!(
                "event=item_edit module=service status=rejected item_id={} error_code={}",
                id,
                err.code()
            ),
        }
        result
    }

    fn try_edit_item(&self, id: ItemId, draft: &ItemDraft) -> BudgetResult<Item> {
        if self.items.get_item(id)?.is_none() {
            return Err(BudgetError::ItemNotFound(id));
        }
        let new_item = draft.validate()?;
        self.ensure_name_free(&new_item, Some(id))?;
        Ok(self.items.update_item(id, &new_item)?)
    }

    /// Deletes an item and returns it so callers can show its service page.
    pub fn delete_item(&self, id: ItemId) -> BudgetResult<Item> {
        match self.items.delete_item(id) {
            Ok(item) => {
                info!(
                    "event=item_delete module=service status=ok item_id={} period={}",
                    id,
                    item.period()
                );
                Ok(item)
            }
            Err(err) => {
                let err = BudgetError::from(err);
                warn!(
                    "event=item_delete module=service status=rejected item_id={} error_code={}",
                    id,
                    err.code()
                );
                Err(err)
            }
        }
    }

    fn ensure_name_free(&self, item: &NewItem, excluding: Option<ItemId>) -> BudgetResult<()> {
        if self
            .items
            .item_name_taken(&item.service_name, &item.item_name, excluding)?
        {
            return Err(ValidationError::DuplicateItem {
                service_name: item.service_name.clone(),
                item_name: item.item_name.clone(),
            }
            .into());
        }
        Ok(())
    }
}
