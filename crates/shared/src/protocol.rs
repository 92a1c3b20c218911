use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{OrderStatus, PaymentMethod};

/// Body of `POST /service-orders`. The value travels as a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceOrderRequest {
    pub client_name: String,
    pub phone_number: String,
    pub car_model: String,
    pub service_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub service_value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusQuery {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuery {
    pub payment_method: PaymentMethod,
}
