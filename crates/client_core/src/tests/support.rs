use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use shared::{
    domain::{OrderStatus, PaymentMethod, ServiceOrder, ServiceOrderId},
    error::ApiErrorBody,
    protocol::CreateServiceOrderRequest,
};
use tokio::sync::Mutex;

use crate::{ClientError, OrderApi};

pub fn order(id: i64, status: OrderStatus, payment_method: Option<PaymentMethod>) -> ServiceOrder {
    ServiceOrder {
        id: ServiceOrderId(id),
        client_name: format!("Cliente {id}"),
        phone_number: format!("1199999{id:04}"),
        car_model: "Civic".to_string(),
        service_type: "Revisão".to_string(),
        service_value: Decimal::new(10000 + id, 2),
        status,
        payment_method,
        message_was_sent: status == OrderStatus::Completed,
    }
}

pub fn pending(id: i64) -> ServiceOrder {
    order(id, OrderStatus::Pending, None)
}

pub fn settled(id: i64, method: PaymentMethod) -> ServiceOrder {
    order(id, OrderStatus::Completed, Some(method))
}

pub fn ids(orders: &[ServiceOrder]) -> Vec<i64> {
    orders.iter().map(|order| order.id.0).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    List,
    Create(CreateServiceOrderRequest),
    Delete(ServiceOrderId),
    Status(ServiceOrderId, OrderStatus),
    Payment(ServiceOrderId, PaymentMethod),
}

#[derive(Default)]
struct InMemoryState {
    orders: Vec<ServiceOrder>,
    next_id: i64,
    calls: Vec<ApiCall>,
    fail_mutations: bool,
    fail_list: bool,
}

/// In-memory stand-in for the order API that records every call.
#[derive(Clone, Default)]
pub struct InMemoryOrderApi {
    state: Arc<Mutex<InMemoryState>>,
}

fn rejected(method: &'static str) -> ClientError {
    ClientError::Status {
        method,
        url: "memory://service-orders".to_string(),
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: Some(ApiErrorBody::new("Order not found")),
    }
}

impl InMemoryOrderApi {
    pub fn with_orders(orders: Vec<ServiceOrder>) -> Self {
        let next_id = orders.iter().map(|order| order.id.0).max().unwrap_or(0) + 1;
        Self {
            state: Arc::new(Mutex::new(InMemoryState {
                orders,
                next_id,
                ..InMemoryState::default()
            })),
        }
    }

    pub async fn fail_mutations(&self, fail: bool) {
        self.state.lock().await.fail_mutations = fail;
    }

    pub async fn fail_list(&self, fail: bool) {
        self.state.lock().await.fail_list = fail;
    }

    pub async fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn list_calls(&self) -> usize {
        self.calls()
            .await
            .iter()
            .filter(|call| matches!(call, ApiCall::List))
            .count()
    }

    async fn mutate(
        &self,
        call: ApiCall,
        id: ServiceOrderId,
        apply: impl FnOnce(&mut ServiceOrder),
    ) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push(call);
        if state.fail_mutations {
            return Err(rejected("PUT"));
        }
        let order = state
            .orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or_else(|| rejected("PUT"))?;
        apply(order);
        Ok(())
    }
}

#[async_trait]
impl OrderApi for InMemoryOrderApi {
    async fn list_orders(&self) -> Result<Vec<ServiceOrder>, ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push(ApiCall::List);
        if state.fail_list {
            return Err(rejected("GET"));
        }
        Ok(state.orders.clone())
    }

    async fn create_order(
        &self,
        request: &CreateServiceOrderRequest,
    ) -> Result<ServiceOrder, ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push(ApiCall::Create(request.clone()));
        if state.fail_mutations {
            return Err(rejected("POST"));
        }
        let id = state.next_id.max(1);
        state.next_id = id + 1;
        let created = ServiceOrder {
            id: ServiceOrderId(id),
            client_name: request.client_name.clone(),
            phone_number: request.phone_number.clone(),
            car_model: request.car_model.clone(),
            service_type: request.service_type.clone(),
            service_value: request.service_value,
            status: OrderStatus::Pending,
            payment_method: None,
            message_was_sent: false,
        };
        state.orders.push(created.clone());
        Ok(created)
    }

    async fn delete_order(&self, id: ServiceOrderId) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push(ApiCall::Delete(id));
        if state.fail_mutations {
            return Err(rejected("DELETE"));
        }
        state.orders.retain(|order| order.id != id);
        Ok(())
    }

    async fn update_status(
        &self,
        id: ServiceOrderId,
        status: OrderStatus,
    ) -> Result<(), ClientError> {
        self.mutate(ApiCall::Status(id, status), id, |order| {
            order.status = status;
            if status == OrderStatus::Completed {
                order.message_was_sent = true;
            }
        })
        .await
    }

    async fn update_payment(
        &self,
        id: ServiceOrderId,
        payment_method: PaymentMethod,
    ) -> Result<(), ClientError> {
        self.mutate(ApiCall::Payment(id, payment_method), id, |order| {
            order.payment_method = Some(payment_method);
        })
        .await
    }
}
