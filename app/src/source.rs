use barista::{Catalog, Order, OrderReceipt};
use cafe_client::{CafeClient, ClientResult};

use crate::config::ApiConfig;

/// Where the Mini App gets its catalog and sends its orders.
pub trait CatalogSource {
    // Shown on the error screen
    fn origin(&self) -> &str;
    async fn load(&self) -> ClientResult<Catalog>;
    async fn submit(&self, order: &Order) -> ClientResult<OrderReceipt>;
}

pub struct HttpCatalogSource {
    client: CafeClient,
}

impl HttpCatalogSource {
    pub fn new(client: CafeClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        let client = CafeClient::new(config.base_url.as_str())
            .with_health_check(config.health_check)
            .with_fetch_timeout(config.fetch_timeout())
            .with_order_timeout(config.order_timeout());
        Self::new(client)
    }
}

impl CatalogSource for HttpCatalogSource {
    fn origin(&self) -> &str {
        self.client.origin()
    }

    async fn load(&self) -> ClientResult<Catalog> {
        self.client.load_catalog().await
    }

    async fn submit(&self, order: &Order) -> ClientResult<OrderReceipt> {
        self.client.submit_order(order).await
    }
}
