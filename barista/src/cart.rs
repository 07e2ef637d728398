use crate::{
    catalog::{Price, SizeOption},
    order::{Order, OrderLine},
    selection::SelectedAddition,
};

/// A configured item frozen at the moment it was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub name: String,
    pub size: String,
    pub price: Price,
    pub additions: Vec<String>,
    pub additions_price: Price,
    pub comment: String,
    pub total_price: Price,
}

impl CartItem {
    pub fn new(
        name: String,
        size: &SizeOption,
        additions: &[SelectedAddition],
        comment: String,
    ) -> Self {
        let additions_price = additions.iter().map(|a| a.price).sum();
        Self {
            name,
            size: size.name.clone(),
            price: size.price,
            additions: additions.iter().map(|a| a.name.clone()).collect(),
            additions_price,
            comment,
            total_price: size.price + additions_price,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: CartItem) {
        self.items.push(item);
    }

    // Later items shift down by one.
    pub fn remove(&mut self, index: usize) -> Option<CartItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> Price {
        self.items.iter().map(|i| i.total_price).sum()
    }

    /// Builds the payload for `POST /order`. `None` for an empty cart.
    pub fn to_order(
        &self,
        user_id: i64,
        delivery_time: impl Into<String>,
        order_comment: impl Into<String>,
    ) -> Option<Order> {
        if self.is_empty() {
            return None;
        }
        let items = self
            .items
            .iter()
            .map(|i| OrderLine {
                name: i.name.clone(),
                size: i.size.clone(),
                price: i.total_price,
                additions: i.additions.clone(),
                comment: i.comment.clone(),
            })
            .collect();
        Some(Order {
            user_id,
            items,
            total: self.total(),
            delivery_time: delivery_time.into(),
            order_comment: order_comment.into(),
        })
    }
}
