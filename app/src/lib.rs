pub mod config;
pub mod host;
pub mod miniapp;
pub mod source;
pub mod state;
pub mod view;

use anyhow::Result;
use barista::{command::USAGE, Command};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::config::Config;
use crate::host::ConsoleHost;
use crate::miniapp::{Flow, MiniApp};
use crate::source::HttpCatalogSource;

pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the Mini App against stdin until `quit` or end of input.
    pub async fn run(&self) -> Result<()> {
        info!("Initializing the application...");
        let source = HttpCatalogSource::from_config(&self.config.api);
        let host = ConsoleHost::new(self.config.host.user_id);
        let mut miniapp =
            MiniApp::new(source, host).with_images_dir(self.config.host.images_dir.clone());

        println!("{}", miniapp.render());
        miniapp.init().await;
        println!("\n{}\n", miniapp.render());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "help" {
                println!("{}", USAGE);
                continue;
            }
            let command: Command = match line.parse() {
                Ok(command) => command,
                Err(e) => {
                    debug!("Bad input {:?}: {}", line, e);
                    println!("{} (help lists the commands)", e);
                    continue;
                }
            };
            if miniapp.handle(command).await == Flow::Quit {
                break;
            }
            println!("\n{}\n", miniapp.render());
        }
        info!("Closing the Mini App.");
        Ok(())
    }
}
