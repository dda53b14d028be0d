//! Configuration file for the `checkout` binary.
//!
//! ```toml
//! payment_method = "Credit Card"
//! delivery_method = "Express Delivery"
//! catalog = "data/appointments.csv"
//! texts = "i18n/messages_de.toml"
//!
//! [fees]
//! assembly = "29.99"
//! advanced_assembly = "69.99"
//! green_return = "14.99"
//! indoor_delivery = "9.99"
//! ```
//!
//! Every key is optional. Relative paths are resolved against the directory
//! containing the configuration file.

use std::path::{Path, PathBuf};

use checkout_core::models::{DeliveryMethod, PaymentMethod, ServiceFees};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown payment method '{0}'")]
    UnknownPaymentMethod(String),

    #[error("unknown delivery method '{0}'")]
    UnknownDeliveryMethod(String),
}

/// Raw file layout; method names are validated in [`CheckoutConfig::from_toml_str`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    payment_method: Option<String>,
    delivery_method: Option<String>,
    catalog: Option<PathBuf>,
    texts: Option<PathBuf>,
    fees: ServiceFees,
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutConfig {
    pub payment_method: PaymentMethod,
    pub delivery_method: DeliveryMethod,
    /// Slot catalog CSV; the bundled demo catalog when `None`.
    pub catalog: Option<PathBuf>,
    /// Text bundle overlaid on the bundled English texts.
    pub texts: Option<PathBuf>,
    pub fees: ServiceFees,
}

impl CheckoutConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(input)?;

        let payment_method = match file.payment_method {
            Some(name) => {
                PaymentMethod::parse(&name).ok_or(ConfigError::UnknownPaymentMethod(name))?
            }
            None => PaymentMethod::default(),
        };
        let delivery_method = match file.delivery_method {
            Some(name) => {
                DeliveryMethod::parse(&name).ok_or(ConfigError::UnknownDeliveryMethod(name))?
            }
            None => DeliveryMethod::default(),
        };

        Ok(Self {
            payment_method,
            delivery_method,
            catalog: file.catalog,
            texts: file.texts,
            fees: file.fees,
        })
    }

    /// Loads the configuration at `path`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.catalog = config.catalog.map(|p| base.join(p));
        config.texts = config.texts.map(|p| base.join(p));
        debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }
}
