use async_trait::async_trait;
use reqwest::{header::CONTENT_DISPOSITION, Client, RequestBuilder, Response, StatusCode};
use shared::{
    domain::{OrderStatus, PaymentMethod, ServiceOrder, ServiceOrderId},
    error::ApiErrorBody,
    protocol::{CreateServiceOrderRequest, PaymentQuery, StatusQuery},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub mod currency;
pub mod export;
pub mod form;
pub mod list;
pub mod pipeline;

pub use export::ExportedFile;
pub use form::{FormError, OrderForm};
pub use list::{ListAction, ListError, OrderListController, OrderListState};
pub use pipeline::{OrderQuery, Page, PaymentFilter, StatusFilter, PAGE_SIZE};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_EXPORT_URL: &str = "http://localhost:5000/export";
const SERVICE_ORDERS_PATH: &str = "service-orders";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("request {method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        source: reqwest::Error,
    },
    #[error("{method} {url} returned {status}{}", describe_body(.body))]
    Status {
        method: &'static str,
        url: String,
        status: StatusCode,
        body: Option<ApiErrorBody>,
    },
    #[error("malformed response from {method} {url}: {source}")]
    Decode {
        method: &'static str,
        url: String,
        source: reqwest::Error,
    },
}

fn describe_body(body: &Option<ApiErrorBody>) -> String {
    body.as_ref()
        .map(|body| format!(" ({body})"))
        .unwrap_or_default()
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Operations offered by the remote order API.
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn list_orders(&self) -> Result<Vec<ServiceOrder>, ClientError>;
    async fn create_order(
        &self,
        request: &CreateServiceOrderRequest,
    ) -> Result<ServiceOrder, ClientError>;
    async fn delete_order(&self, id: ServiceOrderId) -> Result<(), ClientError>;
    async fn update_status(
        &self,
        id: ServiceOrderId,
        status: OrderStatus,
    ) -> Result<(), ClientError>;
    async fn update_payment(
        &self,
        id: ServiceOrderId,
        payment_method: PaymentMethod,
    ) -> Result<(), ClientError>;
}

#[async_trait]
pub trait ExportApi: Send + Sync {
    async fn export_csv(&self) -> Result<ExportedFile, ClientError>;
}

/// HTTP client for the order API and the CSV export service.
#[derive(Debug, Clone)]
pub struct ServiceOrderClient {
    http: Client,
    api_base_url: String,
    export_url: String,
}

impl ServiceOrderClient {
    pub fn new(
        api_base_url: impl Into<String>,
        export_url: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http: Client::new(),
            api_base_url: normalize_base_url(api_base_url.into())?,
            export_url: normalize_base_url(export_url.into())?,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn export_url(&self) -> &str {
        &self.export_url
    }

    fn orders_url(&self) -> String {
        format!("{}/{SERVICE_ORDERS_PATH}", self.api_base_url)
    }

    fn order_url(&self, id: ServiceOrderId) -> String {
        format!("{}/{SERVICE_ORDERS_PATH}/{id}", self.api_base_url)
    }

    async fn send(
        &self,
        method: &'static str,
        url: String,
        request: RequestBuilder,
    ) -> Result<(String, Response), ClientError> {
        debug!(method, %url, "sending request");
        let response = match request.send().await {
            Ok(response) => response,
            Err(source) => {
                warn!(method, %url, error = %source, "request failed");
                return Err(ClientError::Transport {
                    method,
                    url,
                    source,
                });
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok((url, response));
        }

        let raw = response.text().await.unwrap_or_default();
        let body = ApiErrorBody::from_raw(&raw);
        warn!(method, %url, %status, "request rejected");
        Err(ClientError::Status {
            method,
            url,
            status,
            body,
        })
    }
}

/// Trims trailing slashes and checks the result parses as an absolute URL.
pub fn normalize_base_url(raw: String) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/').to_string();
    Url::parse(&trimmed).map_err(|source| ClientError::InvalidUrl { url: raw, source })?;
    Ok(trimmed)
}

#[async_trait]
impl OrderApi for ServiceOrderClient {
    async fn list_orders(&self) -> Result<Vec<ServiceOrder>, ClientError> {
        let url = self.orders_url();
        let (url, response) = self.send("GET", url.clone(), self.http.get(url)).await?;
        response.json().await.map_err(|source| ClientError::Decode {
            method: "GET",
            url,
            source,
        })
    }

    async fn create_order(
        &self,
        request: &CreateServiceOrderRequest,
    ) -> Result<ServiceOrder, ClientError> {
        let url = self.orders_url();
        let (url, response) = self
            .send("POST", url.clone(), self.http.post(url).json(request))
            .await?;
        response.json().await.map_err(|source| ClientError::Decode {
            method: "POST",
            url,
            source,
        })
    }

    async fn delete_order(&self, id: ServiceOrderId) -> Result<(), ClientError> {
        let url = self.order_url(id);
        self.send("DELETE", url.clone(), self.http.delete(url))
            .await?;
        Ok(())
    }

    async fn update_status(
        &self,
        id: ServiceOrderId,
        status: OrderStatus,
    ) -> Result<(), ClientError> {
        let url = format!("{}/status", self.order_url(id));
        let request = self.http.put(url.clone()).query(&StatusQuery { status });
        self.send("PUT", url, request).await?;
        Ok(())
    }

    async fn update_payment(
        &self,
        id: ServiceOrderId,
        payment_method: PaymentMethod,
    ) -> Result<(), ClientError> {
        let url = format!("{}/payment", self.order_url(id));
        let request = self
            .http
            .put(url.clone())
            .query(&PaymentQuery { payment_method });
        self.send("PUT", url, request).await?;
        Ok(())
    }
}

#[async_trait]
impl ExportApi for ServiceOrderClient {
    async fn export_csv(&self) -> Result<ExportedFile, ClientError> {
        let url = self.export_url.clone();
        let (url, response) = self.send("GET", url.clone(), self.http.get(url)).await?;
        let filename = export::filename_from_content_disposition(
            response
                .headers()
                .get(CONTENT_DISPOSITION)
                .and_then(|value| value.to_str().ok()),
        );
        let bytes = response.bytes().await.map_err(|source| ClientError::Decode {
            method: "GET",
            url,
            source,
        })?;
        Ok(ExportedFile {
            filename,
            bytes: bytes.to_vec(),
        })
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
