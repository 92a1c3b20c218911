//! Plain-text rendering of the order table.

use client_core::{currency::format_brl, Page};
use shared::domain::ServiceOrder;

const HEADERS: [&str; 8] = [
    "ID", "Cliente", "Telefone", "Carro", "Serviço", "Valor", "Status", "Pagamento",
];
const VALUE_COLUMN: usize = 5;
pub const EMPTY_TABLE_MESSAGE: &str = "Nenhuma ordem de serviço cadastrada";

fn row(order: &ServiceOrder) -> [String; 8] {
    [
        order.id.to_string(),
        order.client_name.clone(),
        order.phone_number.clone(),
        order.car_model.clone(),
        order.service_type.clone(),
        format_brl(order.service_value).replace('\u{a0}', " "),
        order.status.label().to_string(),
        order.payment_label().to_string(),
    ]
}

fn pad(cell: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(cell.chars().count()));
    if right_align {
        format!("{fill}{cell}")
    } else {
        format!("{cell}{fill}")
    }
}

pub fn render_page(page: &Page<&ServiceOrder>) -> String {
    let rows: Vec<[String; 8]> = page.items.iter().map(|order| row(order)).collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| pad(cell, widths[idx], idx == VALUE_COLUMN))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let headers = HEADERS.map(str::to_string);
    out.push_str(&line(&headers[..]));
    out.push('\n');
    if rows.is_empty() {
        out.push_str(EMPTY_TABLE_MESSAGE);
        out.push('\n');
    }
    for cells in &rows {
        out.push_str(&line(&cells[..]));
        out.push('\n');
    }
    out.push_str(&format!(
        "Página {} de {} ({} ordens)",
        page.number, page.total_pages, page.total_items
    ));
    out
}
