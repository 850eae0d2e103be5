//! Invoice defaults loading from config.toml
//!
//! Values that appear on every invoice (title, terms, bank details, footer,
//! payment labels) are configuration, not code. They are read from a TOML
//! file and handed to [`crate::core::summary::build_summary`] by the caller.
//! Every field is optional in the file; missing ones fall back to
//! [`InvoiceDefaults::default`].

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "INVOICE_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Everything an invoice shows that does not come from the cart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InvoiceDefaults {
    /// Title printed at the top of the invoice
    pub title: String,
    /// Terms and conditions, one per line
    pub terms: String,
    /// Where payments should be sent
    pub bank: BankInfo,
    /// Business contact lines printed in the footer
    pub footer: String,
    /// Labels for the four schedule slots
    pub payment_labels: PaymentLabels,
}

impl Default for InvoiceDefaults {
    fn default() -> Self {
        Self {
            title: "Invoice".to_string(),
            terms: String::new(),
            bank: BankInfo::default(),
            footer: String::new(),
            payment_labels: PaymentLabels::default(),
        }
    }
}

impl InvoiceDefaults {
    /// Non-blank, trimmed terms lines
    #[must_use]
    pub fn terms_lines(&self) -> Vec<String> {
        non_blank_lines(&self.terms)
    }

    /// Non-blank, trimmed footer lines
    #[must_use]
    pub fn footer_lines(&self) -> Vec<String> {
        non_blank_lines(&self.footer)
    }
}

/// Bank account details shown in the payment info block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankInfo {
    /// Bank name
    pub bank_name: String,
    /// Account number
    pub account_number: String,
    /// Name on the account
    pub account_holder: String,
}

impl Default for BankInfo {
    fn default() -> Self {
        Self {
            bank_name: "-".to_string(),
            account_number: "-".to_string(),
            account_holder: "-".to_string(),
        }
    }
}

/// Display labels for the payment schedule slots
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaymentLabels {
    /// Label of the first slot
    pub down_payment: String,
    /// Label of the second slot
    pub term2: String,
    /// Label of the third slot
    pub term3: String,
    /// Label of the final slot
    pub final_settlement: String,
}

impl Default for PaymentLabels {
    fn default() -> Self {
        Self {
            down_payment: "Down Payment".to_string(),
            term2: "Payment 2".to_string(),
            term3: "Payment 3".to_string(),
            final_settlement: "Final Payment".to_string(),
        }
    }
}

impl PaymentLabels {
    /// Labels in the same order as [`crate::core::payment::PaymentSchedule::slots`]
    #[must_use]
    pub fn in_order(&self) -> [&str; 4] {
        [
            self.down_payment.as_str(),
            self.term2.as_str(),
            self.term3.as_str(),
            self.final_settlement.as_str(),
        ]
    }
}

/// Loads invoice defaults from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid or a field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<InvoiceDefaults> {
    let path_ref = path.as_ref();
    debug!("Attempting to load invoice defaults from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads invoice defaults from `$INVOICE_CONFIG`, or `./config.toml`.
///
/// An explicitly configured path must exist. When falling back to
/// `./config.toml` and that file is absent, built-in defaults are used.
pub fn load_default_config() -> Result<InvoiceDefaults> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return load_config(path);
    }

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        load_config(DEFAULT_CONFIG_PATH)
    } else {
        info!("No {DEFAULT_CONFIG_PATH} found, using built-in invoice defaults.");
        Ok(InvoiceDefaults::default())
    }
}

fn non_blank_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            title = "Wedding Invoice"
            terms = """
            Down payment is due at booking
            Payments are non-refundable
            """
            footer = "studio@example.com\n@studio"

            [bank]
            bank_name = "OCBC"
            account_number = "1234567890"
            account_holder = "STUDIO LTD"

            [payment_labels]
            down_payment = "DP"
            term2 = "H+7 Expo"
            term3 = "H-7 Prewedding"
            final_settlement = "Pelunasan"
        "#;

        let config: InvoiceDefaults = toml::from_str(toml_str).unwrap();
        assert_eq!(config.title, "Wedding Invoice");
        assert_eq!(
            config.terms_lines(),
            vec![
                "Down payment is due at booking",
                "Payments are non-refundable"
            ]
        );
        assert_eq!(config.footer_lines(), vec!["studio@example.com", "@studio"]);
        assert_eq!(config.bank.bank_name, "OCBC");
        assert_eq!(config.bank.account_holder, "STUDIO LTD");
        assert_eq!(
            config.payment_labels.in_order(),
            ["DP", "H+7 Expo", "H-7 Prewedding", "Pelunasan"]
        );
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let toml_str = r#"
            title = "Event Invoice"

            [bank]
            bank_name = "BCA"
        "#;

        let config: InvoiceDefaults = toml::from_str(toml_str).unwrap();
        assert_eq!(config.title, "Event Invoice");
        assert_eq!(config.bank.bank_name, "BCA");
        assert_eq!(config.bank.account_number, "-");
        assert_eq!(config.payment_labels, PaymentLabels::default());
        assert!(config.terms_lines().is_empty());
    }

    #[test]
    fn test_parse_empty_config() {
        let config: InvoiceDefaults = toml::from_str("").unwrap();
        assert_eq!(config, InvoiceDefaults::default());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_load_config_invalid_type() {
        let path = std::env::temp_dir().join(format!(
            "invoice-desk-bad-{}.toml",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, "title = 42\n").unwrap();
        let result = load_config(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!(
            "invoice-desk-ok-{}.toml",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, "title = \"From File\"\n").unwrap();
        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.title, "From File");
    }
}
