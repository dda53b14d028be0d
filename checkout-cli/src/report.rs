//! Plain-text output of the `checkout` binary.

use std::fmt::Write;

use checkout_core::formatter::price;
use checkout_core::session::OrderSummary;
use rust_decimal::Decimal;

use crate::scenario::ScenarioStop;

/// Figures printed by `checkout quote`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub subtotal: Decimal,
    pub slot_fee: Decimal,
    pub services: Decimal,
    pub total: Decimal,
}

pub fn render_quote(quote: &Quote) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Subtotal:  {:>12}", price(quote.subtotal));
    let _ = writeln!(out, "Delivery:  {:>12}", price(quote.slot_fee));
    let _ = writeln!(out, "Services:  {:>12}", price(quote.services));
    let _ = writeln!(out, "Total:     {:>12}", price(quote.total));
    out
}

/// The order summary page as text.
pub fn render_summary(summary: &OrderSummary) -> String {
    let mut out = String::new();
    for line in &summary.lines {
        let _ = writeln!(
            out,
            "{:<12} {:>4} x {:>10} = {:>12}",
            line.product_id,
            line.quantity,
            price(line.price),
            price(line.line_total)
        );
    }
    let _ = writeln!(out, "Subtotal: {}", price(summary.subtotal));
    let _ = writeln!(out, "Payment: {}", summary.payment_method.as_str());
    let _ = writeln!(out, "Delivery: {}", summary.delivery_method.as_str());

    let invoice = &summary.invoice_address;
    let _ = writeln!(
        out,
        "Invoice address: {}, {} {}, {}",
        invoice.address, invoice.zip_code, invoice.city, invoice.country
    );
    if summary.shipping_address != summary.invoice_address {
        let ship = &summary.shipping_address;
        let _ = writeln!(
            out,
            "Delivery address: {}, {} {}, {}",
            ship.address, ship.zip_code, ship.city, ship.country
        );
    }

    let slot = &summary.delivery_slot;
    if let (Some(from), Some(to)) = (slot.from, slot.to) {
        let _ = writeln!(
            out,
            "Delivery time: {}-{} (${})",
            from.format("%Y-%m-%d %H:%M"),
            to.format("%H:%M"),
            price(slot.fee)
        );
    }
    for service in &summary.services {
        let _ = writeln!(out, "  + {} (${})", service.service.label(), price(service.fee));
    }
    let _ = writeln!(out, "{}", summary.total_label);
    out
}

/// Why a scripted run did not reach the summary.
pub fn render_stop(stop: &ScenarioStop) -> String {
    match stop {
        ScenarioStop::IncompleteStep { step, messages } => {
            let mut out = format!("Stopped at step '{}'", step.title());
            for message in messages {
                let _ = write!(out, "\n  - {message}");
            }
            out
        }
        ScenarioStop::NotCompleted(e) => format!("Order not completed: {e}"),
    }
}
