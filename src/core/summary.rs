//! Invoice summary generation.
//!
//! Collects everything an invoice document shows into one serializable
//! structure: numbered rows with parsed description lines, totals, the labelled
//! payment schedule and its integrity check, plus the configured bank details,
//! terms and footer. Producing the actual document (PDF, upload) is left to
//! callers; [`render_plain_text`] is a minimal text rendering.

use crate::{
    config::{BankInfo, InvoiceDefaults},
    core::{
        description::raw_desc_to_lines,
        format::{rupiah, rupiah_units},
        payment::{IntegrityReport, PaymentSchedule},
        totals::{LineItem, Totals, calculate_totals},
    },
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format for the issue date, e.g. `10 January 2026`.
pub const ISSUED_DATE_FORMAT: &str = "%d %B %Y";

/// Date format for the event date, e.g. `Sunday, 12 April 2026`.
pub const EVENT_DATE_FORMAT: &str = "%A, %d %B %Y";

/// Per-invoice details entered by the operator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InvoiceMeta {
    /// Invoice number as assigned by the caller
    pub invoice_no: String,
    /// Who the invoice is addressed to
    pub client_name: String,
    /// Overrides the configured title when non-blank
    #[serde(default)]
    pub title: Option<String>,
    /// Issue date
    pub issued: NaiveDate,
    /// Date of the event being invoiced
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    /// Event venue
    #[serde(default)]
    pub venue: String,
    /// Discount subtracted from the subtotal
    #[serde(default)]
    pub cashback: f64,
}

/// One numbered item row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    /// 1-based row number
    pub number: usize,
    /// Item name
    pub description: String,
    /// Parsed description lines, bullets stripped
    pub detail_lines: Vec<String>,
    /// Unit price
    pub unit_price: f64,
    /// Quantity used for the row total
    pub quantity: i64,
    /// `unit_price * quantity`
    pub total: f64,
}

/// One labelled slot of the payment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentLine {
    /// Slot label from configuration
    pub label: String,
    /// Scheduled amount
    pub amount: i64,
}

/// Everything an invoice document summarizes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceSummary {
    /// Invoice number
    pub invoice_no: String,
    /// Invoice title
    pub title: String,
    /// Addressee
    pub client_name: String,
    /// Issue date
    pub issued: NaiveDate,
    /// Event date, if any
    pub event_date: Option<NaiveDate>,
    /// Event venue
    pub venue: String,
    /// Item rows in cart order
    pub rows: Vec<SummaryRow>,
    /// Cashback actually applied (never negative)
    pub cashback: f64,
    /// Subtotal and grand total
    pub totals: Totals,
    /// Labelled schedule slots; slots with a blank label are left out
    pub payments: Vec<PaymentLine>,
    /// Unscheduled part of the grand total, never negative
    pub remaining_balance: i64,
    /// Schedule check against the grand total
    pub integrity: IntegrityReport,
    /// Payment destination
    pub bank: BankInfo,
    /// Terms and conditions lines
    pub terms: Vec<String>,
    /// Footer lines
    pub footer: Vec<String>,
}

/// Builds the summary for a cart, a schedule and the configured defaults.
#[must_use]
pub fn build_summary(
    meta: &InvoiceMeta,
    items: &[LineItem],
    schedule: &PaymentSchedule,
    defaults: &InvoiceDefaults,
) -> InvoiceSummary {
    let totals = calculate_totals(items, meta.cashback);
    let integrity = schedule.integrity(totals.grand_total);

    let rows = items
        .iter()
        .enumerate()
        .map(|(index, item)| SummaryRow {
            number: index + 1,
            description: item.description().to_string(),
            detail_lines: raw_desc_to_lines(Some(item.details())),
            unit_price: item.unit_price(),
            quantity: item.effective_quantity(),
            total: item.line_total(),
        })
        .collect();

    let payments = defaults
        .payment_labels
        .in_order()
        .into_iter()
        .zip(schedule.slots())
        .filter(|(label, _)| !label.trim().is_empty())
        .map(|(label, amount)| PaymentLine {
            label: label.trim().to_string(),
            amount,
        })
        .collect();

    let title = meta
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(defaults.title.as_str())
        .to_string();

    InvoiceSummary {
        invoice_no: meta.invoice_no.trim().to_string(),
        title,
        client_name: meta.client_name.trim().to_string(),
        issued: meta.issued,
        event_date: meta.event_date,
        venue: meta.venue.trim().to_string(),
        rows,
        cashback: meta.cashback.max(0.0),
        totals,
        payments,
        remaining_balance: integrity.balance.max(0),
        integrity,
        bank: defaults.bank.clone(),
        terms: defaults.terms_lines(),
        footer: defaults.footer_lines(),
    }
}

/// Renders a summary as plain text, one block per invoice section.
#[must_use]
pub fn render_plain_text(summary: &InvoiceSummary) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push(format!("INVOICE  {}", summary.title));
    out.push(format!(
        "Invoice#: {}    Date: {}",
        summary.invoice_no,
        summary.issued.format(ISSUED_DATE_FORMAT)
    ));
    out.push(format!("Invoice to: {}", summary.client_name.to_uppercase()));
    if let Some(event_date) = summary.event_date {
        out.push(format!("Event date: {}", event_date.format(EVENT_DATE_FORMAT)));
    }
    if !summary.venue.is_empty() {
        out.push(format!("Venue: {}", summary.venue));
    }

    out.push(String::new());
    for row in &summary.rows {
        out.push(format!(
            "{}. {}  {} x {} = {}",
            row.number,
            row.description,
            rupiah(row.unit_price),
            row.quantity,
            rupiah(row.total)
        ));
        out.extend(row.detail_lines.iter().map(|line| format!("     • {line}")));
    }

    out.push(String::new());
    out.push(format!("TOTAL: {}", rupiah(summary.totals.subtotal)));
    out.push(format!("Cashback: -{}", rupiah(summary.cashback)));
    out.push(format!("GRAND TOTAL: {}", rupiah(summary.totals.grand_total)));
    for payment in &summary.payments {
        out.push(format!("{}: {}", payment.label, rupiah_units(payment.amount)));
    }
    out.push(format!(
        "Remaining Balance: {}",
        rupiah_units(summary.remaining_balance)
    ));
    out.push(format!(
        "Schedule: {} - {}",
        summary.integrity.status, summary.integrity.message
    ));

    out.push(String::new());
    out.push("Payment Info".to_string());
    out.push(format!("Bank: {}", summary.bank.bank_name));
    out.push(format!("A/C Name: {}", summary.bank.account_holder));
    out.push(format!("Account#: {}", summary.bank.account_number));

    if !summary.terms.is_empty() {
        out.push(String::new());
        out.push("Terms".to_string());
        out.extend(summary.terms.iter().map(|term| format!("- {term}")));
    }
    if !summary.footer.is_empty() {
        out.push(String::new());
        out.extend(summary.footer.iter().cloned());
    }

    out.join("\n")
}
