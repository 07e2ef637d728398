//! Café ordering rules with no I/O: the catalog the backend serves, item
//! configuration and pricing, the cart, the order payload, delivery slots, and
//! the text commands that drive the Mini App.

pub mod cart;
pub mod catalog;
pub mod command;
pub mod order;
pub mod ordered;
pub mod selection;
pub mod slots;

pub use cart::{Cart, CartItem};
pub use catalog::{Additions, Catalog, Menu, MenuItem, Price, ShopConfig, StopList};
pub use command::Command;
pub use order::{Order, OrderLine, OrderReceipt};
pub use ordered::OrderedMap;
pub use selection::{ItemSelection, SelectedAddition};
