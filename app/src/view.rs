use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
};

use barista::{
    catalog::{format_price, CINNAMON, MINT_LEMON, PLACEHOLDER_IMAGE, STANDARD_SIZE, SYRUP},
    slots::format_slot,
};

use crate::state::{AppState, Modal};

/// Falls back to the placeholder when the item has no image or the file isn't there.
pub fn image_path(images_dir: &Path, image: Option<&str>) -> PathBuf {
    match image {
        Some(image) if images_dir.join(image).is_file() => images_dir.join(image),
        _ => images_dir.join(PLACEHOLDER_IMAGE),
    }
}

fn size_label(name: &str) -> &str {
    if name == STANDARD_SIZE {
        "Стандарт"
    } else {
        name
    }
}

pub struct LoadingView;

impl Display for LoadingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "☕ Загрузка меню...")
    }
}

pub struct ErrorView<'a> {
    pub message: &'a str,
    pub origin: &'a str,
}

impl<'a> Display for ErrorView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "⚠️ Ошибка загрузки")?;
        writeln!(f, "{}", self.message)?;
        writeln!(f, "API: {}", self.origin)?;
        writeln!(f, "Проверьте, запущен ли бот на сервере")?;
        write!(f, "🔄 retry — попробовать снова")
    }
}

pub struct MainView<'a> {
    pub state: &'a AppState,
    pub images_dir: &'a Path,
}

impl<'a> Display for MainView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state;
        writeln!(f, "☕ Меню  🛒 {}", state.cart.len())?;
        let tabs: Vec<String> = state
            .catalog
            .menu
            .keys()
            .map(|c| match state.category.as_deref() {
                Some(active) if active == c => format!("[{}]", c),
                _ => c.to_string(),
            })
            .collect();
        write!(f, "{}", tabs.join("  "))?;

        let category = match state.category.as_deref() {
            Some(c) => c,
            None => return Ok(()),
        };
        let items = match state.catalog.menu.get(category) {
            Some(items) => items,
            None => return Ok(()),
        };
        writeln!(f)?;
        for (name, item) in items.iter() {
            writeln!(f)?;
            if state.catalog.is_available(category, name) {
                let image = image_path(self.images_dir, item.image.as_deref());
                write!(
                    f,
                    "  {}  {}  ({})",
                    name,
                    item.price_label(),
                    image.display()
                )?;
            } else {
                let image = self.images_dir.join(PLACEHOLDER_IMAGE);
                write!(f, "  ░ {}  ⛔ В стоп-листе  ({})", name, image.display())?;
            }
        }
        Ok(())
    }
}

pub struct ItemView<'a> {
    pub state: &'a AppState,
}

impl<'a> Display for ItemView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state;
        let selection = match &state.selection {
            Some(selection) => selection,
            None => return Ok(()),
        };
        writeln!(f, "← {}", selection.name)?;

        writeln!(f, "Размер:")?;
        let sizes: Vec<String> = selection
            .item
            .size_options()
            .iter()
            .map(|s| {
                let label = format!("{} {}", size_label(&s.name), format_price(s.price));
                match &selection.size {
                    Some(active) if active.name == s.name => format!("[{}]", label),
                    _ => label,
                }
            })
            .collect();
        writeln!(f, "  {}", sizes.join("  "))?;

        writeln!(f, "Добавки:")?;
        writeln!(f, "  🍯 {}", SYRUP)?;
        match state.catalog.additions.cinnamon_price() {
            Some(price) => {
                let mark = if selection.has_addition(CINNAMON) { " ✓" } else { "" };
                writeln!(f, "  🌿 {} (+{}){}", CINNAMON, format_price(price), mark)?;
            }
            None => writeln!(f, "  🌿 {}", CINNAMON)?,
        }
        writeln!(f, "  🍃 {}", MINT_LEMON)?;

        if !selection.additions.is_empty() {
            let picked: Vec<String> = selection
                .additions
                .iter()
                .map(|a| format!("{} (+{})", a.name, format_price(a.price)))
                .collect();
            writeln!(f, "Выбрано: {}", picked.join(", "))?;
        }
        if !selection.comment.is_empty() {
            writeln!(f, "Комментарий: \"{}\"", selection.comment)?;
        }
        match selection.total() {
            Some(total) => write!(f, "Итого: {}", format_price(total))?,
            None => write!(f, "Итого: —")?,
        }

        if let Some(modal) = state.modal {
            let icon = match modal {
                Modal::Syrup => "🍯",
                Modal::MintLemon => "🍃",
            };
            writeln!(f)?;
            writeln!(f)?;
            write!(f, "{} {}:", icon, modal.catalog_key())?;
            for (i, choice) in state.modal_choices().iter().enumerate() {
                write!(f, "\n  {}. {} +{}", i + 1, choice.label, format_price(choice.price))?;
            }
        }
        Ok(())
    }
}

pub struct CartView<'a> {
    pub state: &'a AppState,
}

impl<'a> Display for CartView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state;
        if state.cart.is_empty() {
            writeln!(f, "🧺")?;
            return write!(f, "Корзина пуста");
        }
        writeln!(f, "🛒 Корзина")?;
        for (i, item) in state.cart.items().iter().enumerate() {
            writeln!(f)?;
            writeln!(
                f,
                "{}. {} {}  🗑 remove {}",
                i + 1,
                item.name,
                item.size,
                i + 1
            )?;
            if !item.additions.is_empty() {
                writeln!(f, "   + {}", item.additions.join(", "))?;
            }
            if !item.comment.is_empty() {
                writeln!(f, "   \"{}\"", item.comment)?;
            }
            writeln!(f, "   {}", format_price(item.total_price))?;
        }

        writeln!(f)?;
        writeln!(f, "Итого: {}", format_price(state.cart.total()))?;
        let selected = state.delivery_time_string();
        let slots: Vec<String> = state
            .delivery_slots
            .iter()
            .map(|s| {
                let s = format_slot(*s);
                if s == selected {
                    format!("[{}]", s)
                } else {
                    s
                }
            })
            .collect();
        if slots.is_empty() {
            writeln!(f, "Время: нет доступных слотов")?;
        } else {
            writeln!(f, "Время: {}", slots.join(" "))?;
        }
        if !state.order_comment.is_empty() {
            writeln!(f, "Комментарий к заказу: \"{}\"", state.order_comment)?;
        }
        write!(f, "checkout — оформить заказ")
    }
}
