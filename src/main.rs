use dotenvy::dotenv;
use invoice_desk::core::totals::{coerce_quantity, parse_amount, parse_quantity, validate_amount};
use invoice_desk::{
    config,
    core::{Cart, InvoiceMeta, Package, PaymentSchedule, build_summary, summary::render_plain_text},
    errors::{Error, Result},
};
use serde::Deserialize;
use std::{env, fs};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// A draft invoice as written by an operator.
#[derive(Debug, Deserialize)]
struct Draft {
    meta: InvoiceMeta,
    #[serde(default)]
    schedule: PaymentSchedule,
    #[serde(default)]
    schedule_mode: ScheduleMode,
    #[serde(default)]
    packages: Vec<DraftPackage>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ScheduleMode {
    /// Use the schedule exactly as written
    #[default]
    Manual,
    /// Divide the grand total into four slots
    Split,
    /// Put the unscheduled remainder into the final slot
    Fill,
}

#[derive(Debug, Deserialize)]
struct DraftPackage {
    id: String,
    name: String,
    #[serde(default)]
    category: String,
    price: FormValue,
    #[serde(default)]
    description: String,
    #[serde(default = "default_quantity")]
    quantity: FormValue,
}

const fn default_quantity() -> FormValue {
    FormValue::Number(1.0)
}

/// A number as an operator may type it: `2`, `2.0` or `"2"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    fn amount(&self) -> Result<f64> {
        match self {
            Self::Number(value) => validate_amount(*value),
            Self::Text(raw) => parse_amount(raw),
        }
    }

    fn quantity(&self) -> Result<i64> {
        match self {
            Self::Number(value) => coerce_quantity(*value),
            Self::Text(raw) => parse_quantity(raw),
        }
    }
}

fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load invoice defaults
    let defaults = config::load_default_config()
        .inspect_err(|e| error!("Failed to load invoice defaults: {}", e))?;

    // 4. Read the draft named on the command line
    let draft_path = env::args().nth(1).ok_or_else(|| Error::Config {
        message: "Usage: invoice-desk <draft.toml>".to_string(),
    })?;
    let contents = fs::read_to_string(&draft_path)
        .inspect_err(|e| error!("Failed to read draft {}: {}", draft_path, e))?;
    let draft: Draft = toml::from_str(&contents)?;
    info!(path = %draft_path, packages = draft.packages.len(), "Loaded draft invoice");

    // 5. Fill the cart
    let mut cart = Cart::new();
    for entry in &draft.packages {
        let package = Package::new(
            &entry.id,
            &entry.name,
            &entry.category,
            entry.price.amount()?,
            &entry.description,
        )
        .inspect_err(|e| error!(id = %entry.id, "Invalid package in draft: {}", e))?;
        let quantity = entry.quantity.quantity()?;
        match cart.add_package(&package) {
            Ok(id) => {
                cart.set_quantity(id, quantity)?;
            }
            Err(Error::DuplicateItem { source_id }) => {
                warn!(source_id = %source_id, "Skipping duplicate package in draft");
            }
            Err(e) => return Err(e),
        }
    }

    // 6. Apply the schedule helper, if requested
    let grand_total = cart.totals(draft.meta.cashback).grand_total;
    let mut schedule = draft.schedule;
    match draft.schedule_mode {
        ScheduleMode::Manual => {}
        ScheduleMode::Split => schedule.split_evenly(grand_total),
        ScheduleMode::Fill => schedule.fill_remaining(grand_total),
    }

    // 7. Summarize
    let summary = build_summary(&draft.meta, cart.items(), &schedule, &defaults);
    info!(
        status = %summary.integrity.status,
        balance = summary.integrity.balance,
        "Payment schedule checked"
    );
    println!("{}", render_plain_text(&summary));

    Ok(())
}
