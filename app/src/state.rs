use std::fmt;

use anyhow::Result;
use barista::{
    catalog::{AdditionChoice, CINNAMON, MINT_LEMON, SYRUP},
    slots::{format_slot, generate_time_slots},
    Cart, CartItem, Catalog, ItemSelection, Order, SelectedAddition,
};
use chrono::{NaiveDateTime, NaiveTime};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Main,
    Item,
    Cart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Syrup,
    MintLemon,
}

impl Modal {
    pub fn catalog_key(self) -> &'static str {
        match self {
            Modal::Syrup => SYRUP,
            Modal::MintLemon => MINT_LEMON,
        }
    }
}

/// A user action the current state refuses. `Display` is the alert text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    UnknownCategory(String),
    UnknownItem(String),
    Unavailable,
    NoItemOpen,
    UnknownSize(String),
    SizeRequired,
    AdditionMissing(&'static str),
    NoModal,
    NoSuchChoice(usize),
    NoSuchCartItem(usize),
    EmptyCart,
    UnknownSlot(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UnknownCategory(c) => write!(f, "Нет категории «{}»", c),
            Rejection::UnknownItem(i) => write!(f, "Нет товара «{}»", i),
            Rejection::Unavailable => write!(f, "⛔ Этот товар временно недоступен"),
            Rejection::NoItemOpen => write!(f, "Сначала выберите товар"),
            Rejection::UnknownSize(s) => write!(f, "Нет размера «{}»", s),
            Rejection::SizeRequired => write!(f, "Выберите размер"),
            Rejection::AdditionMissing(a) => write!(f, "{} сейчас недоступно", a),
            Rejection::NoModal => write!(f, "Список не открыт"),
            Rejection::NoSuchChoice(n) => write!(f, "Нет пункта {}", n),
            Rejection::NoSuchCartItem(n) => write!(f, "В корзине нет позиции {}", n),
            Rejection::EmptyCart => write!(f, "Корзина пуста"),
            Rejection::UnknownSlot(t) => write!(f, "Нельзя выбрать время {}", t),
        }
    }
}

impl std::error::Error for Rejection {}

pub type Outcome<T> = Result<T, Rejection>;

/// Everything the Mini App knows once the catalog is loaded. All mutation goes
/// through the methods below.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub page: Page,
    pub category: Option<String>,
    pub selection: Option<ItemSelection>,
    pub modal: Option<Modal>,
    pub cart: Cart,
    pub delivery_slots: Vec<NaiveTime>,
    pub delivery_time: Option<NaiveTime>,
    pub order_comment: String,
}

impl AppState {
    /// Fails only if the working hours can't be read.
    pub fn new(catalog: Catalog, now: NaiveDateTime) -> Result<Self> {
        let delivery_slots = generate_time_slots(now, &catalog.config)?;
        let category = catalog.first_category().map(String::from);
        Ok(Self {
            catalog,
            page: Page::Main,
            category,
            selection: None,
            modal: None,
            cart: Cart::new(),
            delivery_slots,
            delivery_time: None,
            order_comment: String::new(),
        })
    }

    pub fn select_category(&mut self, name: &str) -> Outcome<()> {
        if !self.catalog.menu.contains_key(name) {
            return Err(Rejection::UnknownCategory(name.into()));
        }
        debug!("Category {} selected", name);
        self.category = Some(name.into());
        Ok(())
    }

    /// Opens the configurator with a fresh selection. Stop-listed items are refused.
    pub fn open_item(&mut self, category: &str, name: &str) -> Outcome<()> {
        let item = self
            .catalog
            .item(category, name)
            .ok_or(Rejection::UnknownItem(name.into()))?;
        if !self.catalog.is_available(category, name) {
            return Err(Rejection::Unavailable);
        }
        self.selection = Some(ItemSelection::new(category, name, item.clone()));
        self.modal = None;
        self.page = Page::Item;
        debug!("Opened {} / {}", category, name);
        Ok(())
    }

    fn selection_mut(&mut self) -> Outcome<&mut ItemSelection> {
        match self.page {
            Page::Item => self.selection.as_mut().ok_or(Rejection::NoItemOpen),
            _ => Err(Rejection::NoItemOpen),
        }
    }

    pub fn select_size(&mut self, name: &str) -> Outcome<()> {
        let selection = self.selection_mut()?;
        selection
            .select_size(name)
            .map_err(|_| Rejection::UnknownSize(name.into()))?;
        Ok(())
    }

    /// Returns whether cinnamon is selected afterwards.
    pub fn toggle_cinnamon(&mut self) -> Outcome<bool> {
        let price = self
            .catalog
            .additions
            .cinnamon_price()
            .ok_or(Rejection::AdditionMissing(CINNAMON))?;
        Ok(self.selection_mut()?.toggle_addition(CINNAMON, price))
    }

    fn choices(&self, modal: Modal) -> Option<Vec<AdditionChoice>> {
        let additions = &self.catalog.additions;
        match modal {
            Modal::Syrup => additions.syrup_choices(),
            Modal::MintLemon => additions.mint_lemon_choices(),
        }
    }

    pub fn open_modal(&mut self, modal: Modal) -> Outcome<()> {
        self.selection_mut()?;
        if self.choices(modal).is_none() {
            return Err(Rejection::AdditionMissing(modal.catalog_key()));
        }
        self.modal = Some(modal);
        Ok(())
    }

    pub fn modal_choices(&self) -> Vec<AdditionChoice> {
        self.modal
            .and_then(|m| self.choices(m))
            .unwrap_or_default()
    }

    /// Appends the choice at 1-based `position` of the open list and closes it.
    pub fn pick(&mut self, position: usize) -> Outcome<AdditionChoice> {
        if self.modal.is_none() {
            return Err(Rejection::NoModal);
        }
        let choice = position
            .checked_sub(1)
            .and_then(|i| self.modal_choices().into_iter().nth(i))
            .ok_or(Rejection::NoSuchChoice(position))?;
        self.selection_mut()?
            .push_addition(SelectedAddition::new(choice.name.clone(), choice.price));
        self.modal = None;
        Ok(choice)
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub fn set_item_comment(&mut self, comment: &str) -> Outcome<()> {
        self.selection_mut()?.comment = comment.into();
        Ok(())
    }

    pub fn add_to_cart(&mut self) -> Outcome<&CartItem> {
        let item = self
            .selection_mut()?
            .to_cart_item()
            .ok_or(Rejection::SizeRequired)?;
        debug!("Adding {} {} for {}", item.name, item.size, item.total_price);
        self.cart.push(item);
        self.back_to_main();
        self.cart.items().last().ok_or(Rejection::EmptyCart)
    }

    pub fn show_cart(&mut self) {
        self.modal = None;
        self.page = Page::Cart;
    }

    pub fn back_to_main(&mut self) {
        self.selection = None;
        self.modal = None;
        self.page = Page::Main;
    }

    /// Removes the line at 0-based `index`; later lines move up.
    pub fn remove_from_cart(&mut self, index: usize) -> Outcome<CartItem> {
        self.cart
            .remove(index)
            .ok_or(Rejection::NoSuchCartItem(index + 1))
    }

    pub fn select_delivery_time(&mut self, time: &str) -> Outcome<()> {
        let slot = self
            .delivery_slots
            .iter()
            .find(|s| format_slot(**s) == time.trim())
            .ok_or(Rejection::UnknownSlot(time.into()))?;
        self.delivery_time = Some(*slot);
        Ok(())
    }

    /// The chosen slot, else the first offered one, else empty.
    pub fn delivery_time_string(&self) -> String {
        self.delivery_time
            .or_else(|| self.delivery_slots.first().copied())
            .map(format_slot)
            .unwrap_or_default()
    }

    pub fn set_order_comment(&mut self, comment: &str) {
        self.order_comment = comment.into();
    }

    pub fn build_order(&self, user_id: i64) -> Outcome<Order> {
        self.cart
            .to_order(user_id, self.delivery_time_string(), self.order_comment.clone())
            .ok_or(Rejection::EmptyCart)
    }

    pub fn order_placed(&mut self) {
        self.cart.clear();
        self.order_comment.clear();
        self.delivery_time = None;
        self.back_to_main();
    }
}
