//! Sort, filter and paginate steps that turn the fetched order set into the
//! rows shown in the order table.

use std::{fmt, str::FromStr};

use shared::{
    domain::{OrderStatus, PaymentMethod, ServiceOrder},
    error::ParseEnumError,
};

pub const PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<OrderStatus>()
            .map(StatusFilter::Only)
            .map_err(|_| ParseEnumError::new("status filter", s.trim()))
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("ALL"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentFilter {
    #[default]
    All,
    /// Orders with no payment method recorded.
    Pending,
    Method(PaymentMethod),
}

impl PaymentFilter {
    pub fn matches(self, payment_method: Option<PaymentMethod>) -> bool {
        match self {
            PaymentFilter::All => true,
            PaymentFilter::Pending => payment_method.is_none(),
            PaymentFilter::Method(wanted) => payment_method == Some(wanted),
        }
    }
}

impl FromStr for PaymentFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(PaymentFilter::All);
        }
        if trimmed.eq_ignore_ascii_case("pending") {
            return Ok(PaymentFilter::Pending);
        }
        trimmed
            .parse::<PaymentMethod>()
            .map(PaymentFilter::Method)
            .map_err(|_| ParseEnumError::new("payment filter", trimmed))
    }
}

impl fmt::Display for PaymentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentFilter::All => f.write_str("ALL"),
            PaymentFilter::Pending => f.write_str("PENDING"),
            PaymentFilter::Method(method) => write!(f, "{method}"),
        }
    }
}

/// Search and filter criteria applied to the sorted order set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderQuery {
    pub search: String,
    pub status: StatusFilter,
    pub payment: PaymentFilter,
}

impl OrderQuery {
    pub fn matches(&self, order: &ServiceOrder) -> bool {
        search_matches(order, &self.search)
            && self.status.matches(order.status)
            && self.payment.matches(order.payment_method)
    }
}

/// Stable sort: settled orders go last, ties broken by ascending id.
pub fn sort_orders(orders: &mut [ServiceOrder]) {
    orders.sort_by(|a, b| {
        a.is_settled()
            .cmp(&b.is_settled())
            .then_with(|| a.id.cmp(&b.id))
    });
}

pub fn filter_orders<'a>(orders: &'a [ServiceOrder], query: &OrderQuery) -> Vec<&'a ServiceOrder> {
    orders.iter().filter(|order| query.matches(order)).collect()
}

/// Text fields match case-insensitively; the phone number only matches the
/// raw term.
fn search_matches(order: &ServiceOrder, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    let folded = |text: &str| text.to_lowercase().contains(&needle);

    folded(&order.client_name)
        || order.phone_number.contains(term)
        || folded(&order.car_model)
        || folded(&order.service_type)
        || folded(order.status.as_str())
        || order
            .payment_method
            .is_some_and(|method| folded(method.as_str()))
}

pub fn total_pages(item_count: usize) -> usize {
    item_count.div_ceil(PAGE_SIZE).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

pub fn next_page(page: usize, total_pages: usize) -> usize {
    clamp_page(page.saturating_add(1), total_pages)
}

pub fn prev_page(page: usize, total_pages: usize) -> usize {
    clamp_page(page.saturating_sub(1), total_pages)
}

/// One page of pipeline output. Page numbers start at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn is_first(&self) -> bool {
        self.number == 1
    }

    pub fn is_last(&self) -> bool {
        self.number == self.total_pages
    }
}

pub fn paginate<T: Clone>(items: &[T], page: usize) -> Page<T> {
    let total_pages = total_pages(items.len());
    let number = clamp_page(page, total_pages);
    let start = (number - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(items.len());
    Page {
        number,
        total_pages,
        total_items: items.len(),
        items: items.get(start..end).unwrap_or_default().to_vec(),
    }
}

/// Runs sort, filter and paginate over an unsorted snapshot.
pub fn run(orders: &[ServiceOrder], query: &OrderQuery, page: usize) -> Page<ServiceOrder> {
    let mut sorted = orders.to_vec();
    sort_orders(&mut sorted);
    let filtered: Vec<ServiceOrder> = filter_orders(&sorted, query)
        .into_iter()
        .cloned()
        .collect();
    paginate(&filtered, page)
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
