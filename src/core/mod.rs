/// Caller-held cart with bundle merge and unmerge
pub mod cart;
/// Description markup normalization and line parsing
pub mod description;
/// Currency display formatting
pub mod format;
/// Payment schedule, integrity check and schedule helpers
pub mod payment;
/// Invoice summary for document export
pub mod summary;
/// Line items, packages and totals
pub mod totals;

pub use cart::{BundlePricing, Cart};
pub use description::{desc_to_lines, normalize_desc_text};
pub use payment::{IntegrityReport, IntegrityStatus, PaymentSchedule, payment_integrity_status};
pub use summary::{InvoiceMeta, InvoiceSummary, build_summary};
pub use totals::{LineItem, Package, Totals, calculate_totals};
