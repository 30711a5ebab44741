use std::{fmt::Write as _, time::Instant};

use client_core::{grid::customer_columns, ViewState};
use shared::domain::{Customer, CustomerField};

/// Plain-text grid of the data columns plus each row's self link.
pub fn table(rows: &[&Customer]) -> String {
    let fields: Vec<CustomerField> = customer_columns()
        .iter()
        .filter_map(|column| column.field())
        .collect();

    let mut header: Vec<String> = fields.iter().map(|f| f.label().to_string()).collect();
    header.push("Link".into());
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|customer| {
            let mut cells: Vec<String> =
                fields.iter().map(|f| customer.field(*f).to_string()).collect();
            cells.push(customer.self_href().unwrap_or("-").to_string());
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|idx| {
            body.iter()
                .map(|row| row[idx].chars().count())
                .chain(std::iter::once(header[idx].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in std::iter::once(&header).chain(body.iter()) {
        let line: Vec<String> = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    out
}

pub fn notification(view: &ViewState) -> Option<String> {
    view.notification()
        .message_at(Instant::now())
        .map(str::to_string)
}
