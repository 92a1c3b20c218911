//! Order table state and the controller that keeps it in sync with the API.
//!
//! The snapshot is never patched locally: every mutation is followed by a
//! full refetch, so the state always mirrors what the server returned last.

use shared::domain::{OrderStatus, PaymentMethod, ServiceOrder, ServiceOrderId};
use thiserror::Error;
use tracing::{error, info};

use crate::{
    pipeline::{self, OrderQuery, Page, PaymentFilter, StatusFilter},
    ClientError, OrderApi,
};

pub const DELETE_CONFIRMATION_PROMPT: &str = "Tem certeza que deseja excluir este serviço?";

#[derive(Debug, Error)]
pub enum ListError {
    #[error("service order {0} is not in the current list")]
    UnknownOrder(ServiceOrderId),
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone)]
pub enum ListAction {
    OrdersLoaded(Vec<ServiceOrder>),
    SearchChanged(String),
    StatusFilterChanged(StatusFilter),
    PaymentFilterChanged(PaymentFilter),
    NextPage,
    PrevPage,
    GoToPage(usize),
}

#[derive(Debug, Clone)]
pub struct OrderListState {
    orders: Vec<ServiceOrder>,
    query: OrderQuery,
    current_page: usize,
    filtered_count: usize,
}

impl Default for OrderListState {
    fn default() -> Self {
        Self {
            orders: Vec::new(),
            query: OrderQuery::default(),
            current_page: 1,
            filtered_count: 0,
        }
    }
}

impl OrderListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: ListAction) {
        match action {
            ListAction::OrdersLoaded(mut orders) => {
                pipeline::sort_orders(&mut orders);
                self.orders = orders;
                let count = self.count_filtered();
                if count != self.filtered_count {
                    self.current_page = 1;
                } else {
                    self.current_page = pipeline::clamp_page(self.current_page, self.total_pages());
                }
                self.filtered_count = count;
            }
            ListAction::SearchChanged(search) => {
                self.query.search = search;
                self.criteria_changed();
            }
            ListAction::StatusFilterChanged(status) => {
                self.query.status = status;
                self.criteria_changed();
            }
            ListAction::PaymentFilterChanged(payment) => {
                self.query.payment = payment;
                self.criteria_changed();
            }
            ListAction::NextPage => {
                self.current_page = pipeline::next_page(self.current_page, self.total_pages());
            }
            ListAction::PrevPage => {
                self.current_page = pipeline::prev_page(self.current_page, self.total_pages());
            }
            ListAction::GoToPage(page) => {
                self.current_page = pipeline::clamp_page(page, self.total_pages());
            }
        }
    }

    fn criteria_changed(&mut self) {
        self.filtered_count = self.count_filtered();
        self.current_page = 1;
    }

    fn count_filtered(&self) -> usize {
        self.orders
            .iter()
            .filter(|order| self.query.matches(order))
            .count()
    }

    /// Sorted snapshot, before filtering.
    pub fn orders(&self) -> &[ServiceOrder] {
        &self.orders
    }

    pub fn query(&self) -> &OrderQuery {
        &self.query
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        pipeline::total_pages(self.filtered_count)
    }

    pub fn find(&self, id: ServiceOrderId) -> Option<&ServiceOrder> {
        self.orders.iter().find(|order| order.id == id)
    }

    pub fn view(&self) -> Page<&ServiceOrder> {
        let filtered = pipeline::filter_orders(&self.orders, &self.query);
        pipeline::paginate(&filtered, self.current_page)
    }
}

pub struct OrderListController<A> {
    api: A,
    state: OrderListState,
}

impl<A: OrderApi> OrderListController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: OrderListState::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &OrderListState {
        &self.state
    }

    pub fn dispatch(&mut self, action: ListAction) {
        self.state.apply(action);
    }

    pub async fn refresh(&mut self) -> Result<(), ListError> {
        let orders = self.api.list_orders().await.map_err(|err| {
            error!(error = %err, "failed to fetch service orders");
            err
        })?;
        info!(count = orders.len(), "fetched service orders");
        self.state.apply(ListAction::OrdersLoaded(orders));
        Ok(())
    }

    pub async fn update_status(
        &mut self,
        id: ServiceOrderId,
        status: OrderStatus,
    ) -> Result<(), ListError> {
        if let Err(err) = self.api.update_status(id, status).await {
            error!(order_id = %id, %status, error = %err, "failed to update status");
            return Err(err.into());
        }
        info!(order_id = %id, %status, "updated service order status");
        self.refresh().await
    }

    /// Flips PENDING and COMPLETED for an order in the current snapshot.
    pub async fn toggle_status(&mut self, id: ServiceOrderId) -> Result<OrderStatus, ListError> {
        let next = self
            .state
            .find(id)
            .map(|order| order.status.toggled())
            .ok_or(ListError::UnknownOrder(id))?;
        self.update_status(id, next).await?;
        Ok(next)
    }

    pub async fn update_payment(
        &mut self,
        id: ServiceOrderId,
        payment_method: PaymentMethod,
    ) -> Result<(), ListError> {
        if let Err(err) = self.api.update_payment(id, payment_method).await {
            error!(order_id = %id, %payment_method, error = %err, "failed to update payment");
            return Err(err.into());
        }
        info!(order_id = %id, %payment_method, "recorded payment method");
        self.refresh().await
    }

    /// Deletes an order once `confirm` agrees. Returns whether a request was
    /// issued.
    pub async fn delete<F>(&mut self, id: ServiceOrderId, confirm: F) -> Result<bool, ListError>
    where
        F: FnOnce() -> bool,
    {
        if !confirm() {
            info!(order_id = %id, "deletion cancelled");
            return Ok(false);
        }
        if let Err(err) = self.api.delete_order(id).await {
            error!(order_id = %id, error = %err, "failed to delete service order");
            return Err(err.into());
        }
        info!(order_id = %id, "deleted service order");
        self.refresh().await?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;
