// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::TrackerError;
use ga_batcher::Hit;

/// Custom event payload. Category and action are required; label and value
/// ride along when present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Event {
    pub category: String,
    pub action: String,
    pub label: Option<String>,
    pub value: Option<i64>,
}

impl Event {
    pub fn new(category: impl Into<String>, action: impl Into<String>) -> Self {
        Event {
            category: category.into(),
            action: action.into(),
            label: None,
            value: None,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), TrackerError> {
        if self.category.trim().is_empty() {
            return Err(TrackerError::InvalidEvent(
                "event category is required".to_string(),
            ));
        }
        if self.action.trim().is_empty() {
            return Err(TrackerError::InvalidEvent(
                "event action is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Product line item for enhanced e-commerce hits.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub variant: String,
    pub quantity: u32,
    pub price: f64,
}

/// Enhanced e-commerce product actions, mapped onto the `pa` field and a
/// matching event action on the wire.
#[derive(Clone, Debug, PartialEq)]
pub enum EcommerceAction {
    /// Product detail view.
    Detail,
    /// Add to cart.
    Add,
    /// Remove from cart.
    Remove,
    /// Checkout step, optionally with an option such as the payment method.
    Checkout { step: u32, option: Option<String> },
    /// Completed transaction.
    Purchase {
        transaction_id: String,
        affiliation: Option<String>,
    },
    /// Refund of a transaction.
    Refund { transaction_id: String },
}

impl EcommerceAction {
    /// Value of the `pa` product-action field.
    pub(crate) fn product_action(&self) -> &'static str {
        match self {
            EcommerceAction::Detail => "detail",
            EcommerceAction::Add => "add",
            EcommerceAction::Remove => "remove",
            EcommerceAction::Checkout { .. } => "checkout",
            EcommerceAction::Purchase { .. } => "purchase",
            EcommerceAction::Refund { .. } => "refund",
        }
    }

    /// Event action reported alongside the product action.
    pub(crate) fn event_action(&self) -> &'static str {
        match self {
            EcommerceAction::Detail => "productView",
            EcommerceAction::Add => "addToCart",
            EcommerceAction::Remove => "removeFromCart",
            EcommerceAction::Checkout { .. } => "checkout",
            EcommerceAction::Purchase { .. } => "purchase",
            EcommerceAction::Refund { .. } => "refund",
        }
    }
}

pub(crate) fn append_event_fields(hit: &mut Hit, event: &Event) {
    hit.push_field("ec", event.category.clone());
    hit.push_field("ea", event.action.clone());
    hit.push_field("el", event.label.clone());
    hit.push_field("ev", event.value);
}

pub(crate) fn append_ecommerce_fields(
    hit: &mut Hit,
    action: &EcommerceAction,
    products: &[Product],
) {
    hit.push_field("ec", "ecommerce");
    hit.push_field("ea", action.event_action());
    hit.push_field("ev", total_value(products));
    hit.push_field("pa", action.product_action());
    for (index, product) in products.iter().enumerate() {
        let n = index + 1;
        hit.push_field(format!("pr{n}id"), product.id.clone());
        hit.push_field(format!("pr{n}nm"), product.name.clone());
        hit.push_field(format!("pr{n}br"), product.brand.clone());
        hit.push_field(format!("pr{n}ca"), product.category.clone());
        hit.push_field(format!("pr{n}va"), product.variant.clone());
        hit.push_field(format!("pr{n}qt"), product.quantity);
        hit.push_field(format!("pr{n}pr"), format!("{:.2}", product.price));
    }
    match action {
        EcommerceAction::Checkout { step, option } => {
            hit.push_field("cos", i64::from(*step));
            hit.push_field("col", option.clone());
        }
        EcommerceAction::Purchase {
            transaction_id,
            affiliation,
        } => {
            hit.push_field("ti", transaction_id.clone());
            hit.push_field("ta", affiliation.clone());
        }
        EcommerceAction::Refund { transaction_id } => {
            hit.push_field("ti", transaction_id.clone());
        }
        EcommerceAction::Detail | EcommerceAction::Add | EcommerceAction::Remove => {}
    }
}

/// Whole-unit event value for a product set: the floor of the summed prices.
fn total_value(products: &[Product]) -> i64 {
    products.iter().map(|product| product.price).sum::<f64>().floor() as i64
}
