use super::*;
use crate::test_support::{ids, pending, settled, ApiCall, InMemoryOrderApi};

fn page_ids(state: &OrderListState) -> Vec<i64> {
    state.view().items.iter().map(|order| order.id.0).collect()
}

fn loaded(orders: Vec<ServiceOrder>) -> OrderListState {
    let mut state = OrderListState::new();
    state.apply(ListAction::OrdersLoaded(orders));
    state
}

#[test]
fn loaded_orders_are_kept_sorted() {
    let state = loaded(vec![settled(1, PaymentMethod::Pix), pending(4), pending(2)]);

    assert_eq!(ids(state.orders()), vec![2, 4, 1]);
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.total_pages(), 1);
}

#[test]
fn page_navigation_clamps() {
    let mut state = loaded((1..=12).map(pending).collect());
    assert_eq!(state.total_pages(), 3);

    state.apply(ListAction::PrevPage);
    assert_eq!(state.current_page(), 1);

    state.apply(ListAction::NextPage);
    state.apply(ListAction::NextPage);
    state.apply(ListAction::NextPage);
    assert_eq!(state.current_page(), 3);
    assert_eq!(page_ids(&state), vec![11, 12]);

    state.apply(ListAction::GoToPage(2));
    assert_eq!(page_ids(&state), vec![6, 7, 8, 9, 10]);

    state.apply(ListAction::GoToPage(40));
    assert_eq!(state.current_page(), 3);
}

#[test]
fn every_criteria_change_resets_to_first_page() {
    let mut state = loaded((1..=12).map(pending).collect());
    state.apply(ListAction::GoToPage(3));

    // "Cliente" matches every order, so the count stays the same.
    state.apply(ListAction::SearchChanged("cliente".to_string()));
    assert_eq!(state.current_page(), 1);

    state.apply(ListAction::GoToPage(2));
    state.apply(ListAction::StatusFilterChanged(StatusFilter::Only(
        OrderStatus::Pending,
    )));
    assert_eq!(state.current_page(), 1);

    state.apply(ListAction::GoToPage(2));
    state.apply(ListAction::PaymentFilterChanged(PaymentFilter::Pending));
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.total_pages(), 3);
}

#[test]
fn refetch_with_same_count_keeps_page() {
    let mut state = loaded((1..=12).map(pending).collect());
    state.apply(ListAction::GoToPage(2));

    state.apply(ListAction::OrdersLoaded((1..=12).map(pending).collect()));
    assert_eq!(state.current_page(), 2);
}

#[test]
fn refetch_with_different_count_resets_page() {
    let mut state = loaded((1..=12).map(pending).collect());
    state.apply(ListAction::GoToPage(3));

    state.apply(ListAction::OrdersLoaded((1..=11).map(pending).collect()));
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.total_pages(), 3);
}

#[tokio::test]
async fn refresh_loads_the_server_snapshot() {
    let api = InMemoryOrderApi::with_orders(vec![pending(2), pending(1)]);
    let mut controller = OrderListController::new(api.clone());

    controller.refresh().await.expect("refresh");

    assert_eq!(ids(controller.state().orders()), vec![1, 2]);
    assert_eq!(api.calls().await, vec![ApiCall::List]);
}

#[tokio::test]
async fn completing_and_paying_moves_order_to_the_bottom() {
    let api = InMemoryOrderApi::with_orders(vec![pending(1), pending(2), pending(3)]);
    let mut controller = OrderListController::new(api.clone());
    controller.refresh().await.expect("refresh");

    controller
        .update_status(ServiceOrderId(1), OrderStatus::Completed)
        .await
        .expect("status");
    assert_eq!(ids(controller.state().orders()), vec![1, 2, 3]);

    controller
        .update_payment(ServiceOrderId(1), PaymentMethod::Pix)
        .await
        .expect("payment");
    assert_eq!(ids(controller.state().orders()), vec![2, 3, 1]);

    let moved = controller
        .state()
        .find(ServiceOrderId(1))
        .expect("order present");
    assert!(moved.is_settled());
    assert_eq!(api.list_calls().await, 3);
}

#[tokio::test]
async fn toggle_status_flips_based_on_snapshot() {
    let api = InMemoryOrderApi::with_orders(vec![pending(5)]);
    let mut controller = OrderListController::new(api.clone());
    controller.refresh().await.expect("refresh");

    let next = controller
        .toggle_status(ServiceOrderId(5))
        .await
        .expect("toggle");
    assert_eq!(next, OrderStatus::Completed);

    let next = controller
        .toggle_status(ServiceOrderId(5))
        .await
        .expect("toggle back");
    assert_eq!(next, OrderStatus::Pending);

    let err = controller
        .toggle_status(ServiceOrderId(99))
        .await
        .expect_err("unknown order");
    assert!(matches!(err, ListError::UnknownOrder(ServiceOrderId(99))));
}

#[tokio::test]
async fn failed_mutation_skips_refetch_and_keeps_state() {
    let api = InMemoryOrderApi::with_orders(vec![pending(1)]);
    let mut controller = OrderListController::new(api.clone());
    controller.refresh().await.expect("refresh");
    api.fail_mutations(true).await;

    let err = controller
        .update_payment(ServiceOrderId(1), PaymentMethod::Cash)
        .await
        .expect_err("must fail");
    assert!(matches!(err, ListError::Client(_)));
    assert_eq!(api.list_calls().await, 1);
    assert_eq!(
        controller
            .state()
            .find(ServiceOrderId(1))
            .and_then(|order| order.payment_method),
        None
    );
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let api = InMemoryOrderApi::with_orders(vec![pending(1), pending(2)]);
    let mut controller = OrderListController::new(api.clone());
    controller.refresh().await.expect("refresh");

    let deleted = controller
        .delete(ServiceOrderId(1), || false)
        .await
        .expect("cancelled delete");
    assert!(!deleted);
    assert_eq!(api.calls().await, vec![ApiCall::List]);
}

#[tokio::test]
async fn confirmed_delete_refetches_and_recomputes_pages() {
    let api = InMemoryOrderApi::with_orders((1..=6).map(pending).collect());
    let mut controller = OrderListController::new(api.clone());
    controller.refresh().await.expect("refresh");
    controller.dispatch(ListAction::NextPage);
    assert_eq!(controller.state().total_pages(), 2);
    assert_eq!(controller.state().current_page(), 2);

    let deleted = controller
        .delete(ServiceOrderId(6), || true)
        .await
        .expect("delete");
    assert!(deleted);

    let state = controller.state();
    assert!(state.find(ServiceOrderId(6)).is_none());
    assert_eq!(state.total_pages(), 1);
    assert_eq!(state.current_page(), 1);
    assert_eq!(
        api.calls().await,
        vec![ApiCall::List, ApiCall::Delete(ServiceOrderId(6)), ApiCall::List]
    );
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let api = InMemoryOrderApi::with_orders(vec![pending(1)]);
    let mut controller = OrderListController::new(api.clone());
    controller.refresh().await.expect("refresh");
    api.fail_list(true).await;

    controller.refresh().await.expect_err("must fail");
    assert_eq!(ids(controller.state().orders()), vec![1]);
}
