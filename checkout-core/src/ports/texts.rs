use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::{error, trace};

const ENGLISH_BUNDLE: &str = include_str!("../../i18n/messages.toml");

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\d+)\}").expect("Invalid regex"));

/// Supplies every user-facing string by resource key.
pub trait TextProvider {
    /// Returns the text for `key` with `{0}`, `{1}`, ... replaced by `args`.
    fn get_text(
        &self,
        key: &str,
        args: &[&str],
    ) -> String;
}

#[derive(Debug, Error)]
pub enum TextBundleError {
    #[error("cannot read text bundle '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("text bundle is not a flat table of strings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Key/value text bundle read from TOML.
///
/// Missing keys resolve to the key itself so a gap in a translation shows
/// up on screen instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceBundle {
    texts: BTreeMap<String, String>,
}

impl ResourceBundle {
    pub fn from_toml_str(input: &str) -> Result<Self, TextBundleError> {
        let texts: BTreeMap<String, String> = toml::from_str(input)?;
        Ok(Self { texts })
    }

    pub fn from_file(path: &Path) -> Result<Self, TextBundleError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TextBundleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// The English texts shipped with the crate.
    pub fn english() -> Self {
        Self::from_toml_str(ENGLISH_BUNDLE).unwrap_or_else(|e| {
            error!("bundled English texts are unreadable: {}", e);
            Self::default()
        })
    }

    /// Overlays `other` on top of `self`; keys in `other` win.
    pub fn merged_with(
        mut self,
        other: ResourceBundle,
    ) -> Self {
        self.texts.extend(other.texts);
        self
    }

    pub fn contains(
        &self,
        key: &str,
    ) -> bool {
        self.texts.contains_key(key)
    }
}

/// Substitutes `{N}` in one pass over the template; text coming from `args`
/// is never scanned again. Placeholders without an argument stay as written.
fn fill_placeholders(
    template: &str,
    args: &[&str],
) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i))
                .map_or_else(|| caps[0].to_string(), |arg| (*arg).to_string())
        })
        .into_owned()
}

impl TextProvider for ResourceBundle {
    fn get_text(
        &self,
        key: &str,
        args: &[&str],
    ) -> String {
        match self.texts.get(key) {
            Some(template) => fill_placeholders(template, args),
            None => {
                trace!(key, "no text for key");
                key.to_string()
            }
        }
    }
}
