//! Order intake form state.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use shared::{domain::ServiceOrder, protocol::CreateServiceOrderRequest};
use thiserror::Error;
use tracing::{error, info};

use crate::{ClientError, OrderApi};

pub const CREATE_SUCCESS_MESSAGE: &str = "Serviço cadastrado com sucesso!";
pub const CREATE_FAILURE_MESSAGE: &str = "Erro ao cadastrar serviço!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    ClientName,
    PhoneNumber,
    CarModel,
    ServiceType,
    ServiceValue,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::ClientName => "Nome do Cliente",
            FormField::PhoneNumber => "Telefone",
            FormField::CarModel => "Modelo do Carro",
            FormField::ServiceType => "Tipo de Serviço",
            FormField::ServiceValue => "Valor",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("field '{0}' is required")]
    MissingField(FormField),
    #[error("invalid service value '{0}'")]
    InvalidServiceValue(String),
    #[error("failed to create service order: {0}")]
    Client(#[from] ClientError),
}

/// Raw text of the five intake fields, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub client_name: String,
    pub phone_number: String,
    pub car_model: String,
    pub service_type: String,
    pub service_value: String,
}

impl OrderForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::ClientName => self.client_name = value,
            FormField::PhoneNumber => self.phone_number = value,
            FormField::CarModel => self.car_model = value,
            FormField::ServiceType => self.service_type = value,
            FormField::ServiceValue => self.service_value = value,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn to_request(&self) -> Result<CreateServiceOrderRequest, FormError> {
        let required = [
            (FormField::ClientName, &self.client_name),
            (FormField::PhoneNumber, &self.phone_number),
            (FormField::CarModel, &self.car_model),
            (FormField::ServiceType, &self.service_type),
            (FormField::ServiceValue, &self.service_value),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(FormError::MissingField(*field));
        }

        Ok(CreateServiceOrderRequest {
            client_name: self.client_name.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            car_model: self.car_model.trim().to_string(),
            service_type: self.service_type.trim().to_string(),
            service_value: parse_service_value(&self.service_value)?,
        })
    }

    /// Sends the create request. Fields are cleared only when the server
    /// accepted the order.
    pub async fn submit<A>(&mut self, api: &A) -> Result<ServiceOrder, FormError>
    where
        A: OrderApi + ?Sized,
    {
        let request = self.to_request()?;
        match api.create_order(&request).await {
            Ok(created) => {
                info!(order_id = %created.id, "created service order");
                self.clear();
                Ok(created)
            }
            Err(err) => {
                error!(error = %err, "failed to create service order");
                Err(err.into())
            }
        }
    }
}

/// Accepts `.` or `,` as the decimal separator; rejects negatives.
pub fn parse_service_value(raw: &str) -> Result<Decimal, FormError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.contains('.') {
        trimmed.to_string()
    } else {
        trimmed.replacen(',', ".", 1)
    };

    match Decimal::from_str(&normalized) {
        Ok(value) if !value.is_sign_negative() => Ok(value.normalize()),
        _ => Err(FormError::InvalidServiceValue(raw.to_string())),
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
