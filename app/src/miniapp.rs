use std::path::PathBuf;

use barista::Command;
use chrono::{Local, NaiveDateTime};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    host::MiniAppHost,
    source::CatalogSource,
    state::{AppState, Modal, Outcome, Page, Rejection},
    view::{CartView, ErrorView, ItemView, LoadingView, MainView},
};

#[derive(Debug)]
pub enum Screen {
    Loading,
    // Startup failed; only `retry` gets out of here
    Failed(String),
    Ready(AppState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// The one controller of the Mini App. It owns the state, runs every command to
/// completion, and only suspends while talking to the backend.
pub struct MiniApp<S, H> {
    source: S,
    host: H,
    screen: Screen,
    clock: fn() -> NaiveDateTime,
    images_dir: PathBuf,
    closing_confirmation: bool,
    quit_armed: bool,
}

impl<S, H> MiniApp<S, H>
where
    S: CatalogSource,
    H: MiniAppHost,
{
    pub fn new(source: S, host: H) -> Self {
        Self {
            source,
            host,
            screen: Screen::Loading,
            clock: local_now,
            images_dir: "images".into(),
            closing_confirmation: false,
            quit_armed: false,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images_dir = dir.into();
        self
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn state(&self) -> Option<&AppState> {
        match &self.screen {
            Screen::Ready(state) => Some(state),
            _ => None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    #[instrument(name = "Initializing Mini App", skip(self))]
    pub async fn init(&mut self) {
        self.host.expand();
        self.host.enable_closing_confirmation();
        self.closing_confirmation = true;
        self.reload().await;
    }

    async fn reload(&mut self) {
        self.screen = Screen::Loading;
        info!("Loading the menu from {}...", self.source.origin());
        let loaded = match self.source.load().await {
            Ok(catalog) => AppState::new(catalog, (self.clock)()),
            Err(e) => Err(e.into()),
        };
        match loaded {
            Ok(state) => {
                info!(
                    slots = state.delivery_slots.len(),
                    "Mini App is ready."
                );
                self.screen = Screen::Ready(state);
            }
            Err(e) => {
                error!("Loading failed: {:#}", e);
                let message = e.to_string();
                self.host.show_alert(&format!(
                    "Ошибка: {}\n\nПроверьте:\n1. Запущен ли бот на сервере\n2. Доступен ли {}\n3. Правильно ли настроен CORS",
                    message,
                    self.source.origin()
                ));
                self.screen = Screen::Failed(message);
            }
        }
    }

    #[instrument(level = "debug", name = "Handling command", skip_all, fields(command = %command))]
    pub async fn handle(&mut self, command: Command) -> Flow {
        if command == Command::Quit {
            return self.quit();
        }
        self.quit_armed = false;

        match self.screen {
            Screen::Loading => return Flow::Continue,
            Screen::Failed(_) => {
                if command == Command::Retry {
                    self.reload().await;
                } else {
                    self.host.show_alert("Меню не загружено. Введите retry.");
                }
                return Flow::Continue;
            }
            Screen::Ready(_) => (),
        }

        if command == Command::Checkout {
            self.checkout().await;
            return Flow::Continue;
        }
        if let Err(rejection) = self.apply(command) {
            debug!("Rejected: {}", rejection);
            self.host.show_alert(&rejection.to_string());
        }
        Flow::Continue
    }

    fn apply(&mut self, command: Command) -> Outcome<()> {
        use Command::*;
        let Screen::Ready(state) = &mut self.screen else {
            return Ok(());
        };
        match command {
            Category(name) => state.select_category(&name)?,
            Open(name) => {
                let category = state
                    .category
                    .clone()
                    .ok_or(Rejection::UnknownItem(name.clone()))?;
                state.open_item(&category, &name)?
            }
            Size(name) => state.select_size(&name)?,
            Cinnamon => {
                state.toggle_cinnamon()?;
            }
            Syrup => state.open_modal(Modal::Syrup)?,
            MintLemon => state.open_modal(Modal::MintLemon)?,
            Pick(position) => {
                state.pick(position)?;
            }
            Close => state.close_modal(),
            Comment(text) => state.set_item_comment(&text)?,
            Add => {
                state.add_to_cart()?;
                self.host.show_alert("Добавлено в корзину!");
            }
            Cart => state.show_cart(),
            Remove(position) => {
                let index = position
                    .checked_sub(1)
                    .ok_or(Rejection::NoSuchCartItem(position))?;
                state.remove_from_cart(index)?;
            }
            Time(time) => state.select_delivery_time(&time)?,
            Note(text) => state.set_order_comment(&text),
            Back => state.back_to_main(),
            Retry | Checkout | Quit => (),
        }
        Ok(())
    }

    /// Sends the cart. The cart survives every failure so the user can try again.
    #[instrument(name = "Checkout", skip(self))]
    pub async fn checkout(&mut self) {
        let Screen::Ready(state) = &mut self.screen else {
            return;
        };
        let user_id = self.host.user_id().unwrap_or(0);
        let order = match state.build_order(user_id) {
            Ok(order) => order,
            Err(rejection) => {
                self.host.show_alert(&rejection.to_string());
                return;
            }
        };
        info!(
            user_id,
            total = %order.total,
            delivery_time = %order.delivery_time,
            "Sending order..."
        );
        match self.source.submit(&order).await {
            Ok(receipt) if receipt.success => {
                info!("Order accepted.");
                state.order_placed();
                self.host
                    .show_alert("✅ Заказ отправлен! Ожидайте подтверждения.");
            }
            Ok(receipt) => {
                warn!("Order refused: {}", receipt.failure_reason());
                self.host
                    .show_alert(&format!("❌ Ошибка: {}", receipt.failure_reason()));
            }
            Err(e) => {
                error!("Order failed: {}", e);
                self.host
                    .show_alert(&format!("❌ Ошибка при оформлении заказа: {}", e));
            }
        }
    }

    fn quit(&mut self) -> Flow {
        let cart_in_use = self.state().map_or(false, |s| !s.cart.is_empty());
        if self.closing_confirmation && cart_in_use && !self.quit_armed {
            self.quit_armed = true;
            self.host
                .show_alert("В корзине есть товары. Введите quit ещё раз, чтобы закрыть.");
            return Flow::Continue;
        }
        Flow::Quit
    }

    pub fn render(&self) -> String {
        match &self.screen {
            Screen::Loading => LoadingView.to_string(),
            Screen::Failed(message) => ErrorView {
                message,
                origin: self.source.origin(),
            }
            .to_string(),
            Screen::Ready(state) => match state.page {
                Page::Main => MainView {
                    state,
                    images_dir: &self.images_dir,
                }
                .to_string(),
                Page::Item => ItemView { state }.to_string(),
                Page::Cart => CartView { state }.to_string(),
            },
        }
    }
}
