/// Invoice defaults (title, terms, bank info, footer, payment labels) from config.toml
pub mod defaults;

pub use defaults::{BankInfo, InvoiceDefaults, PaymentLabels, load_config, load_default_config};
