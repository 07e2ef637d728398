use anyhow::Result;
use miniapp::config::Config;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("miniapp=debug,cafe_client=debug")
        .with_writer(std::io::stderr)
        .init();
    let config_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./config/miniapp.toml".into());
    info!("Loading config file {}...", config_file);
    let config = Config::from_file(&config_file)?;
    let my_app = miniapp::App::new(config);
    my_app.run().await
}
