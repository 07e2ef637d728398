use anyhow::{anyhow, bail, Result};
use rust_decimal::Decimal;
use serde_derive::Deserialize;

use crate::ordered::OrderedMap;

// Rubles. The backend may send any JSON number: 200, 200.0 or 199.5.
pub type Price = Decimal;
pub type CategoryName = String;
pub type ItemName = String;

pub const CINNAMON: &str = "Корица";
pub const SYRUP: &str = "Сироп";
pub const MINT_LEMON: &str = "Мята и лимон";

pub const STANDARD_SIZE: &str = "standard";

/// `200₽`, `199.5₽`. Trailing zeros are dropped, so 200.0 shows as 200.
pub fn format_price(price: Price) -> String {
    format!("{}₽", price.normalize())
}
pub const PLACEHOLDER_IMAGE: &str = "placeholder.png";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MenuItem {
    pub base_price: Price,
    pub sizes: Option<OrderedMap<Price>>,
    pub image: Option<String>,
}

/// A size the user can pick, priced absolutely (base price plus surcharge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeOption {
    pub name: String,
    pub price: Price,
}

impl MenuItem {
    pub fn price_label(&self) -> String {
        match self.sizes {
            Some(_) => format!("от {}", format_price(self.base_price)),
            None => format_price(self.base_price),
        }
    }

    pub fn size_options(&self) -> Vec<SizeOption> {
        match &self.sizes {
            Some(sizes) => sizes
                .iter()
                .map(|(name, extra)| SizeOption {
                    name: name.into(),
                    price: self.base_price + extra,
                })
                .collect(),
            None => vec![self.standard_size()],
        }
    }

    /// Items without a size map get one implicit size at the base price.
    pub fn implicit_size(&self) -> Option<SizeOption> {
        match self.sizes {
            Some(_) => None,
            None => Some(self.standard_size()),
        }
    }

    pub fn size(&self, name: &str) -> Option<SizeOption> {
        self.size_options().into_iter().find(|s| s.name == name)
    }

    fn standard_size(&self) -> SizeOption {
        SizeOption {
            name: STANDARD_SIZE.into(),
            price: self.base_price,
        }
    }
}

pub type Menu = OrderedMap<OrderedMap<MenuItem>>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlatAddition {
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdditionGroup<V> {
    pub items: OrderedMap<V>,
}

/// One selectable line of a nested addition catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionChoice {
    // What the modal shows
    pub label: String,
    // What ends up on the cart line
    pub name: String,
    pub price: Price,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Additions {
    #[serde(rename = "Корица")]
    pub cinnamon: Option<FlatAddition>,
    // flavor -> size -> price
    #[serde(rename = "Сироп")]
    pub syrup: Option<AdditionGroup<OrderedMap<Price>>>,
    // variant -> price
    #[serde(rename = "Мята и лимон")]
    pub mint_lemon: Option<AdditionGroup<Price>>,
}

impl Additions {
    pub fn cinnamon_price(&self) -> Option<Price> {
        self.cinnamon.as_ref().map(|c| c.price)
    }

    pub fn syrup_choices(&self) -> Option<Vec<AdditionChoice>> {
        let syrup = self.syrup.as_ref()?;
        let choices = syrup
            .items
            .iter()
            .flat_map(|(flavor, sizes)| {
                sizes.iter().map(move |(size, price)| AdditionChoice {
                    label: format!("{} {}", flavor, size),
                    name: format!("{} {} {}", SYRUP, flavor, size),
                    price: *price,
                })
            })
            .collect();
        Some(choices)
    }

    pub fn mint_lemon_choices(&self) -> Option<Vec<AdditionChoice>> {
        let mint_lemon = self.mint_lemon.as_ref()?;
        let choices = mint_lemon
            .items
            .iter()
            .map(|(variant, price)| AdditionChoice {
                label: variant.into(),
                name: variant.into(),
                price: *price,
            })
            .collect();
        Some(choices)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StopEntry {
    pub category: CategoryName,
    pub item_name: ItemName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct StopList(Vec<StopEntry>);

impl StopList {
    pub fn new(entries: Vec<StopEntry>) -> Self {
        Self(entries)
    }

    // Exact (category, name) match. The same name in another category is still available.
    pub fn contains(&self, category: &str, name: &str) -> bool {
        self.0
            .iter()
            .any(|e| e.category == category && e.item_name == name)
    }

    pub fn entries(&self) -> &[StopEntry] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkingHours {
    pub start: String,
    pub end: String,
}

fn parse_hour(s: &str) -> Result<u32> {
    // Only the hour matters: "09:30" opens at 09:00.
    let hour = s
        .split(':')
        .next()
        .ok_or(anyhow!("empty working hours"))?
        .trim();
    let hour: u32 = hour
        .parse()
        .map_err(|_| anyhow!("error parsing working hour {:?}", s))?;
    if hour > 24 {
        bail!("working hour out of range: {:?}", s);
    }
    Ok(hour)
}

impl WorkingHours {
    pub fn start_hour(&self) -> Result<u32> {
        parse_hour(&self.start)
    }

    pub fn end_hour(&self) -> Result<u32> {
        parse_hour(&self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopConfig {
    pub working_hours: WorkingHours,
    pub min_minutes_before: i64,
}

/// Everything fetched at startup. Read-only for the rest of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub menu: Menu,
    pub additions: Additions,
    pub config: ShopConfig,
    pub stop_list: StopList,
}

impl Catalog {
    pub fn item(&self, category: &str, name: &str) -> Option<&MenuItem> {
        self.menu.get(category)?.get(name)
    }

    pub fn is_available(&self, category: &str, name: &str) -> bool {
        !self.stop_list.contains(category, name)
    }

    pub fn first_category(&self) -> Option<&str> {
        self.menu.first_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENU: &str = r#"{
        "Кофе": {
            "Латте": {"base_price": 200, "sizes": {"S": 0, "M": 50, "L": 90}, "image": "latte.png"},
            "Эспрессо": {"base_price": 120}
        },
        "Выпечка": {
            "Круассан": {"base_price": 150, "image": "croissant.png"}
        }
    }"#;

    const ADDITIONS: &str = r#"{
        "Корица": {"price": 20},
        "Сироп": {"items": {"Ваниль": {"250мл": 30, "400мл": 40}, "Карамель": {"250мл": 35}}},
        "Мята и лимон": {"items": {"Мята": 25, "Лимон": 30}}
    }"#;

    fn menu() -> Menu {
        serde_json::from_str(MENU).unwrap()
    }

    #[test]
    fn test_menu_order_and_items() {
        let menu = menu();
        assert_eq!(menu.keys().collect::<Vec<_>>(), vec!["Кофе", "Выпечка"]);
        let coffee = menu.get("Кофе").unwrap();
        assert_eq!(coffee.keys().collect::<Vec<_>>(), vec!["Латте", "Эспрессо"]);
        assert_eq!(coffee.get("Эспрессо").unwrap().image, None);
    }

    #[test]
    fn test_sized_item_prices() {
        let menu = menu();
        let latte = menu.get("Кофе").unwrap().get("Латте").unwrap();
        assert_eq!(latte.price_label(), "от 200₽");
        let prices: Vec<(String, Price)> = latte
            .size_options()
            .into_iter()
            .map(|s| (s.name, s.price))
            .collect();
        assert_eq!(
            prices,
            vec![
                ("S".to_string(), Price::from(200)),
                ("M".to_string(), Price::from(250)),
                ("L".to_string(), Price::from(290))
            ]
        );
        assert!(latte.implicit_size().is_none());
        assert_eq!(latte.size("M").unwrap().price, Price::from(250));
        assert!(latte.size("XL").is_none());
    }

    #[test]
    fn test_fractional_prices() {
        let menu: Menu = serde_json::from_str(
            r#"{"Кофе": {
                "Латте": {"base_price": 200.0, "sizes": {"S": 0, "M": 49.5}},
                "Какао": {"base_price": 199.5}
            }}"#,
        )
        .unwrap();
        let coffee = menu.get("Кофе").unwrap();
        let latte = coffee.get("Латте").unwrap();
        assert_eq!(latte.base_price, Price::from(200));
        assert_eq!(latte.price_label(), "от 200₽");
        assert_eq!(latte.size("M").unwrap().price, Price::new(2495, 1));
        assert_eq!(format_price(latte.size("M").unwrap().price), "249.5₽");

        let cocoa = coffee.get("Какао").unwrap();
        assert_eq!(cocoa.base_price, Price::new(1995, 1));
        assert_eq!(cocoa.price_label(), "199.5₽");
    }

    #[test]
    fn test_flat_item_gets_standard_size() {
        let menu = menu();
        let espresso = menu.get("Кофе").unwrap().get("Эспрессо").unwrap();
        assert_eq!(espresso.price_label(), "120₽");
        let standard = espresso.implicit_size().unwrap();
        assert_eq!(standard.name, STANDARD_SIZE);
        assert_eq!(standard.price, Price::from(120));
        assert_eq!(espresso.size_options(), vec![standard]);
    }

    #[test]
    fn test_addition_choices() {
        let additions: Additions = serde_json::from_str(ADDITIONS).unwrap();
        assert_eq!(additions.cinnamon_price(), Some(Price::from(20)));

        let syrups = additions.syrup_choices().unwrap();
        assert_eq!(syrups.len(), 3);
        assert_eq!(syrups[0].label, "Ваниль 250мл");
        assert_eq!(syrups[0].name, "Сироп Ваниль 250мл");
        assert_eq!(syrups[1].price, Price::from(40));
        assert_eq!(syrups[2].name, "Сироп Карамель 250мл");

        let mint = additions.mint_lemon_choices().unwrap();
        assert_eq!(mint[1].name, "Лимон");
        assert_eq!(mint[1].price, Price::from(30));
    }

    #[test]
    fn test_partial_additions_catalog() {
        let additions: Additions = serde_json::from_str(r#"{"Корица": {"price": 20}}"#).unwrap();
        assert_eq!(additions.cinnamon_price(), Some(Price::from(20)));
        assert!(additions.syrup_choices().is_none());
        assert!(additions.mint_lemon_choices().is_none());
    }

    #[test]
    fn test_stop_list_exact_match() {
        let stop_list: StopList =
            serde_json::from_str(r#"[{"category": "Кофе", "item_name": "Латте"}]"#).unwrap();
        assert!(stop_list.contains("Кофе", "Латте"));
        assert!(!stop_list.contains("Чай", "Латте"));
        assert!(!stop_list.contains("Кофе", "латте"));
    }

    #[test]
    fn test_working_hours() {
        let config: ShopConfig = serde_json::from_str(
            r#"{"working_hours": {"start": "09:00", "end": "21:30"}, "min_minutes_before": 30}"#,
        )
        .unwrap();
        assert_eq!(config.working_hours.start_hour().unwrap(), 9);
        assert_eq!(config.working_hours.end_hour().unwrap(), 21);
        let bad = WorkingHours {
            start: "nine".into(),
            end: "25:00".into(),
        };
        assert!(bad.start_hour().is_err());
        assert!(bad.end_hour().is_err());
    }
}
