use std::time::Duration;

use barista::{Additions, Catalog, Menu, Order, OrderReceipt, ShopConfig, StopList};
use hyper::{
    body::Bytes, client::HttpConnector, header::CONTENT_TYPE, Body, Client, Method, Request,
    StatusCode, Uri,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_ORDER_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// `/health` did not answer with a success status
    #[error("API недоступен ({0}). Проверьте, запущен ли сервер.")]
    Unreachable(String),
    /// Connection, DNS or protocol failure
    #[error("{path}: {reason}")]
    Network { path: String, reason: String },
    #[error("Превышено время ожидания ({path}, {ms} мс)", ms = .after.as_millis())]
    Timeout { path: String, after: Duration },
    #[error("{path}: HTTP {status}")]
    Status { path: String, status: StatusCode },
    /// The body was not the JSON we expected
    #[error("{path}: invalid JSON: {reason}")]
    Decode { path: String, reason: String },
    #[error("invalid URL: {0}")]
    BadUrl(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

pub struct CafeClient {
    client: Client<HttpConnector>,
    origin: String,
    health_check: bool,
    fetch_timeout: Duration,
    order_timeout: Duration,
}

impl CafeClient {
    pub fn new(origin: impl Into<String>) -> Self {
        let origin: String = origin.into();
        Self {
            client: Client::new(),
            origin: origin.trim_end_matches('/').into(),
            health_check: true,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            order_timeout: DEFAULT_ORDER_TIMEOUT,
        }
    }

    pub fn with_health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_order_timeout(mut self, timeout: Duration) -> Self {
        self.order_timeout = timeout;
        self
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn uri(&self, path: &str) -> ClientResult<Uri> {
        let url = format!("{}{}", self.origin, path);
        url.parse().map_err(|_| ClientError::BadUrl(url))
    }

    async fn send(&self, path: &str, req: Request<Body>) -> ClientResult<(StatusCode, Bytes)> {
        let network = |e: hyper::Error| ClientError::Network {
            path: path.into(),
            reason: e.to_string(),
        };
        let res = self.client.request(req).await.map_err(network)?;
        let status = res.status();
        let body = hyper::body::to_bytes(res.into_body())
            .await
            .map_err(network)?;
        Ok((status, body))
    }

    /// `GET /health`. Any failure just means "not reachable".
    #[instrument(level = "debug", skip(self))]
    pub async fn is_healthy(&self) -> bool {
        let result = async {
            let req = Request::get(self.uri("/health")?)
                .body(Body::empty())
                .map_err(|e| ClientError::BadUrl(e.to_string()))?;
            let fut = self.send("/health", req);
            let (status, _) = tokio::time::timeout(self.fetch_timeout, fut)
                .await
                .map_err(|_| ClientError::Timeout {
                    path: "/health".into(),
                    after: self.fetch_timeout,
                })??;
            Ok::<_, ClientError>(status)
        }
        .await;
        match result {
            Ok(status) if status.is_success() => true,
            Ok(status) => {
                warn!("API health check answered {}", status);
                false
            }
            Err(e) => {
                warn!("API health check failed: {}", e);
                false
            }
        }
    }

    /// `GET {path}` decoded as JSON. Non-2xx statuses are errors and the whole
    /// exchange is bounded by the fetch timeout.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_json<T>(&self, path: &str) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let req = Request::get(self.uri(path)?)
            .body(Body::empty())
            .map_err(|e| ClientError::BadUrl(e.to_string()))?;
        let (status, body) = tokio::time::timeout(self.fetch_timeout, self.send(path, req))
            .await
            .map_err(|_| ClientError::Timeout {
                path: path.into(),
                after: self.fetch_timeout,
            })??;
        if !status.is_success() {
            return Err(ClientError::Status {
                path: path.into(),
                status,
            });
        }
        serde_json::from_slice(&body).map_err(|e| ClientError::Decode {
            path: path.into(),
            reason: e.to_string(),
        })
    }

    /// Everything the Mini App needs before its first render. All four
    /// resources are fetched together and the first failure aborts the load.
    #[instrument(name = "Loading catalog", skip(self), fields(origin = %self.origin))]
    pub async fn load_catalog(&self) -> ClientResult<Catalog> {
        if self.health_check && !self.is_healthy().await {
            return Err(ClientError::Unreachable(self.origin.clone()));
        }
        let (menu, additions, config, stop_list) = tokio::try_join!(
            self.get_json::<Menu>("/menu"),
            self.get_json::<Additions>("/additions"),
            self.get_json::<ShopConfig>("/config"),
            self.get_json::<StopList>("/stop_list"),
        )?;
        info!(
            categories = menu.len(),
            stopped = stop_list.entries().len(),
            "Catalog loaded."
        );
        Ok(Catalog {
            menu,
            additions,
            config,
            stop_list,
        })
    }

    /// `POST /order`. The reply body decides success. A non-2xx status only
    /// counts as an error when its body isn't a receipt.
    #[instrument(name = "Submitting order", skip_all, fields(items = order.items.len(), total = %order.total))]
    pub async fn submit_order(&self, order: &Order) -> ClientResult<OrderReceipt> {
        let path = "/order";
        let payload = serde_json::to_vec(order).map_err(|e| ClientError::Decode {
            path: path.into(),
            reason: e.to_string(),
        })?;
        let req = Request::builder()
            .method(Method::POST)
            .uri(self.uri(path)?)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(payload))
            .map_err(|e| ClientError::BadUrl(e.to_string()))?;
        let (status, body) = tokio::time::timeout(self.order_timeout, self.send(path, req))
            .await
            .map_err(|_| ClientError::Timeout {
                path: path.into(),
                after: self.order_timeout,
            })??;
        debug!("Order endpoint answered {}", status);
        match serde_json::from_slice::<OrderReceipt>(&body) {
            Ok(receipt) => Ok(receipt),
            Err(_) if !status.is_success() => Err(ClientError::Status {
                path: path.into(),
                status,
            }),
            Err(e) => Err(ClientError::Decode {
                path: path.into(),
                reason: e.to_string(),
            }),
        }
    }
}
