use std::io::Write;

/// What the embedding chat client offers a Mini App.
pub trait MiniAppHost {
    fn expand(&mut self);
    fn enable_closing_confirmation(&mut self);
    fn show_alert(&mut self, message: &str);
    /// Id of the user who opened the app, if the host knows it.
    fn user_id(&self) -> Option<i64>;
}

/// Host for running the Mini App in a terminal. Alerts go to stdout between renders.
#[derive(Debug, Default)]
pub struct ConsoleHost {
    user_id: Option<i64>,
    pub expanded: bool,
    pub closing_confirmation: bool,
}

impl ConsoleHost {
    pub fn new(user_id: Option<i64>) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }
}

impl MiniAppHost for ConsoleHost {
    fn expand(&mut self) {
        self.expanded = true;
    }

    fn enable_closing_confirmation(&mut self) {
        self.closing_confirmation = true;
    }

    fn show_alert(&mut self, message: &str) {
        let mut out = std::io::stdout().lock();
        // Nothing sensible to do if the terminal is gone
        writeln!(out, "\n[!] {}\n", message).ok();
    }

    fn user_id(&self) -> Option<i64> {
        self.user_id
    }
}
