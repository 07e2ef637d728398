use anyhow::{anyhow, Result};

use crate::{
    cart::CartItem,
    catalog::{CategoryName, ItemName, MenuItem, Price, SizeOption},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAddition {
    pub name: String,
    pub price: Price,
}

impl SelectedAddition {
    pub fn new(name: impl Into<String>, price: impl Into<Price>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
        }
    }
}

/// The item currently open in the configurator together with everything the
/// user picked for it so far.
#[derive(Debug, Clone)]
pub struct ItemSelection {
    pub category: CategoryName,
    pub name: ItemName,
    pub item: MenuItem,
    pub size: Option<SizeOption>,
    pub additions: Vec<SelectedAddition>,
    pub comment: String,
}

impl ItemSelection {
    /// Starts from a clean slate. Only sizeless items come with a size preselected.
    pub fn new(category: impl Into<String>, name: impl Into<String>, item: MenuItem) -> Self {
        let size = item.implicit_size();
        Self {
            category: category.into(),
            name: name.into(),
            item,
            size,
            additions: Vec::new(),
            comment: String::new(),
        }
    }

    pub fn select_size(&mut self, name: &str) -> Result<&SizeOption> {
        let size = self
            .item
            .size(name)
            .ok_or(anyhow!("{} has no size {}", self.name, name))?;
        Ok(self.size.insert(size))
    }

    /// Adds the addition, or removes it if one with the same name is already
    /// selected. Returns whether it is selected afterwards.
    pub fn toggle_addition(&mut self, name: &str, price: Price) -> bool {
        match self.additions.iter().position(|a| a.name == name) {
            Some(index) => {
                self.additions.remove(index);
                false
            }
            None => {
                self.additions.push(SelectedAddition::new(name, price));
                true
            }
        }
    }

    // Modal picks always stack, even when the same line was picked before.
    pub fn push_addition(&mut self, addition: SelectedAddition) {
        self.additions.push(addition);
    }

    pub fn has_addition(&self, name: &str) -> bool {
        self.additions.iter().any(|a| a.name == name)
    }

    pub fn additions_price(&self) -> Price {
        self.additions.iter().map(|a| a.price).sum()
    }

    /// Size price plus every selected addition. `None` until a size is picked.
    pub fn total(&self) -> Option<Price> {
        self.size
            .as_ref()
            .map(|size| size.price + self.additions_price())
    }

    pub fn to_cart_item(&self) -> Option<CartItem> {
        let size = self.size.as_ref()?;
        Some(CartItem::new(
            self.name.clone(),
            size,
            &self.additions,
            self.comment.clone(),
        ))
    }
}
