//! Assembles a checkout session from configuration.

use std::path::Path;

use anyhow::{Context, Result};
use checkout_core::CheckoutSession;
use checkout_core::models::{AppointmentCatalog, CartSnapshot};
use checkout_core::ports::{ResourceBundle, Router};
use checkout_core::session::{ChangeDecision, DiscardableChange};
use checkout_data::{CatalogLoader, default_catalog};
use tracing::{debug, info};

use crate::config::CheckoutConfig;

/// Slot catalog named by the configuration, or the bundled one.
pub fn load_catalog(
    config: &CheckoutConfig,
    override_path: Option<&Path>,
) -> Result<AppointmentCatalog> {
    match override_path.or(config.catalog.as_deref()) {
        Some(path) => CatalogLoader::load_from_file(path)
            .with_context(|| format!("Failed to load slot catalog: {}", path.display())),
        None => default_catalog().context("Bundled slot catalog is invalid"),
    }
}

/// English texts, overlaid with the configured bundle if there is one.
pub fn load_texts(
    config: &CheckoutConfig,
    override_path: Option<&Path>,
) -> Result<ResourceBundle> {
    let english = ResourceBundle::english();
    match override_path.or(config.texts.as_deref()) {
        Some(path) => {
            let overlay = ResourceBundle::from_file(path)
                .with_context(|| format!("Failed to load texts: {}", path.display()))?;
            debug!(path = %path.display(), "text overlay loaded");
            Ok(english.merged_with(overlay))
        }
        None => Ok(english),
    }
}

/// A fresh session with the configured methods and fees.
pub fn build_session(
    config: &CheckoutConfig,
    cart: CartSnapshot,
    catalog: AppointmentCatalog,
    texts: ResourceBundle,
    router: Box<dyn Router>,
) -> CheckoutSession {
    info!(
        items = cart.len(),
        slots = catalog.len(),
        payment = config.payment_method.as_str(),
        delivery = config.delivery_method.as_str(),
        "building checkout session"
    );
    let mut session = CheckoutSession::new(cart, catalog, Box::new(texts), router)
        .with_service_fees(config.fees.clone());
    // Nothing is reached yet, so the change applies and lands in the history.
    let change = DiscardableChange::PaymentMethod(config.payment_method);
    if let ChangeDecision::Confirm(pending) = session.request_change(change) {
        session.resolve_change(pending, true);
    }
    session.state_mut().delivery_method = config.delivery_method;
    session
}
