//! Cart business logic - the invoice-in-progress held by the caller.
//!
//! The cart owns an ordered list of [`LineItem`]s and is the only place where
//! they are mutated. Totals are never cached; call [`Cart::totals`] after any
//! change. Bundles replace two or more entries with a single entry priced as
//! one unit and can be reverted with [`Cart::unmerge`].

use crate::{
    core::{
        description::raw_desc_to_lines,
        totals::{LineItem, Package, Totals, calculate_totals},
    },
    errors::{Error, Result},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Number of source names used in an automatic bundle title.
const BUNDLE_TITLE_NAMES: usize = 3;

/// How a bundle is priced when it is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BundlePricing {
    /// Sum of the merged entries' line totals
    SumOfSelected,
    /// A fixed price; negative values become zero
    Custom(f64),
}

/// Ordered list of line items for one invoice.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Entries in display order
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up an entry by id
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Subtotal and grand total for the current entries.
    #[must_use]
    pub fn totals(&self, cashback: f64) -> Totals {
        calculate_totals(&self.items, cashback)
    }

    /// Whether the package is in the cart, on its own or inside a bundle.
    #[must_use]
    pub fn contains_source(&self, source_id: &str) -> bool {
        self.items.iter().any(|item| {
            item.source_id() == source_id
                || item
                    .bundle_sources()
                    .is_some_and(|sources| sources.iter().any(|s| s.source_id() == source_id))
        })
    }

    /// Adds a snapshot of `package` with quantity 1.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The package is already in the cart, including as part of a bundle
    /// - The package has no id, no name, or an invalid price
    pub fn add_package(&mut self, package: &Package) -> Result<Uuid> {
        let source_id = package.id.trim();
        if self.contains_source(source_id) {
            warn!(source_id, "Package already in cart");
            return Err(Error::DuplicateItem {
                source_id: source_id.to_string(),
            });
        }

        let item = LineItem::from_package(package)?;
        let id = item.id();
        info!(%id, source_id, name = item.description(), "Added package to cart");
        self.items.push(item);
        Ok(id)
    }

    /// Changes an entry's quantity, clamped to at least 1. Bundles stay at 1.
    ///
    /// Returns the quantity actually stored.
    pub fn set_quantity(&mut self, id: Uuid, quantity: i64) -> Result<i64> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| Error::ItemNotFound { id: id.to_string() })?;
        let stored = item.set_quantity(quantity);
        debug!(%id, requested = quantity, stored, "Updated quantity");
        Ok(stored)
    }

    /// Removes an entry by its cart id.
    pub fn remove(&mut self, id: Uuid) -> Result<LineItem> {
        let index = self
            .position(|item| item.id() == id)
            .ok_or_else(|| Error::ItemNotFound { id: id.to_string() })?;
        let removed = self.items.remove(index);
        debug!(%id, "Removed cart item");
        Ok(removed)
    }

    /// Removes the entry created from the given package.
    pub fn remove_by_source(&mut self, source_id: &str) -> Result<LineItem> {
        let index = self
            .position(|item| item.source_id() == source_id)
            .ok_or_else(|| Error::ItemNotFound {
                id: source_id.to_string(),
            })?;
        let removed = self.items.remove(index);
        debug!(source_id, "Removed cart item by package");
        Ok(removed)
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replaces the selected entries with a single bundle entry at the end of the cart.
    ///
    /// Duplicate ids in `ids` are ignored. A blank or missing `title` becomes
    /// `"Bundling: A + B + C"`. The bundle's details list each source name
    /// followed by its description lines as `- ` bullets.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Fewer than two distinct entries are selected
    /// - An id is not in the cart
    /// - A selected entry is itself a bundle
    pub fn merge(
        &mut self,
        ids: &[Uuid],
        title: Option<&str>,
        pricing: BundlePricing,
    ) -> Result<Uuid> {
        let mut selected_ids: Vec<Uuid> = Vec::with_capacity(ids.len());
        for id in ids {
            if !selected_ids.contains(id) {
                selected_ids.push(*id);
            }
        }
        if selected_ids.len() < 2 {
            return Err(Error::Bundle {
                message: "Select at least 2 items to merge".to_string(),
            });
        }

        for id in &selected_ids {
            let item = self
                .get(*id)
                .ok_or_else(|| Error::ItemNotFound { id: id.to_string() })?;
            if item.is_bundle() {
                return Err(Error::Bundle {
                    message: format!("Cannot merge a bundle item: {}", item.description()),
                });
            }
        }

        // Sources in selection order; the cart is only changed once the bundle exists.
        let sources: Vec<LineItem> = selected_ids
            .iter()
            .filter_map(|id| self.get(*id).cloned())
            .collect();

        let price = match pricing {
            BundlePricing::SumOfSelected => calculate_totals(&sources, 0.0).subtotal,
            BundlePricing::Custom(amount) if amount.is_finite() => amount.max(0.0),
            BundlePricing::Custom(_) => 0.0,
        };
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map_or_else(|| default_bundle_title(&sources), str::to_string);
        let details = merged_details(&sources);

        let bundle = LineItem::bundle(&title, details, price, sources)?;
        let id = bundle.id();
        info!(%id, title = %title, price, "Created bundle");
        self.items.retain(|item| !selected_ids.contains(&item.id()));
        self.items.push(bundle);
        Ok(id)
    }

    /// Reverts a bundle, appending its original entries to the end of the cart.
    ///
    /// Returns the number of restored entries.
    pub fn unmerge(&mut self, bundle_id: Uuid) -> Result<usize> {
        let index = self
            .position(|item| item.id() == bundle_id)
            .ok_or_else(|| Error::ItemNotFound {
                id: bundle_id.to_string(),
            })?;
        if !self.items[index].is_bundle() {
            return Err(Error::Bundle {
                message: "Nothing to unmerge".to_string(),
            });
        }

        let restored = self
            .items
            .remove(index)
            .into_bundle_sources()
            .unwrap_or_default();
        let count = restored.len();
        for mut item in restored {
            let quantity = item.quantity();
            item.set_quantity(quantity);
            self.items.push(item);
        }
        info!(%bundle_id, restored = count, "Reverted bundle");
        Ok(count)
    }

    fn position(&self, predicate: impl Fn(&LineItem) -> bool) -> Option<usize> {
        self.items.iter().position(predicate)
    }
}

fn default_bundle_title(sources: &[LineItem]) -> String {
    let names: Vec<&str> = sources
        .iter()
        .map(|item| item.description().trim())
        .filter(|name| !name.is_empty())
        .collect();
    let shown = names
        .iter()
        .take(BUNDLE_TITLE_NAMES)
        .copied()
        .collect::<Vec<_>>()
        .join(" + ");
    let ellipsis = if names.len() > BUNDLE_TITLE_NAMES {
        "..."
    } else {
        ""
    };
    format!("Bundling: {shown}{ellipsis}")
}

fn merged_details(sources: &[LineItem]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for item in sources {
        let name = item.description().trim();
        if !name.is_empty() {
            lines.push(name.to_string());
        }
        lines.extend(
            raw_desc_to_lines(Some(item.details()))
                .into_iter()
                .map(|line| format!("- {line}")),
        );
        lines.push(String::new());
    }
    lines.join("\n").trim().to_string()
}
