use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::Locale;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollationError {
    #[error("invalid locale '{tag}': {reason}")]
    InvalidLocale { tag: String, reason: String },
    #[error("no collation data for locale '{tag}': {reason}")]
    Unavailable { tag: String, reason: String },
}

/// Locale-aware string ordering used both to sort the index and to
/// binary-search it.
pub struct Collation {
    locale: String,
    collator: Collator,
}

impl Collation {
    pub fn for_locale(tag: &str) -> Result<Self, CollationError> {
        let locale = parse_locale(tag)?;
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Tertiary);

        let collator =
            Collator::try_new(&(&locale).into(), options).map_err(|error| {
                CollationError::Unavailable {
                    tag: tag.trim().to_string(),
                    reason: format!("{error:?}"),
                }
            })?;

        Ok(Self {
            locale: locale.to_string(),
            collator,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        self.collator.compare(left, right)
    }
}

impl Debug for Collation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collation")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

pub fn parse_locale(tag: &str) -> Result<Locale, CollationError> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err(CollationError::InvalidLocale {
            tag: String::new(),
            reason: "locale tag is empty".to_string(),
        });
    }

    trimmed
        .parse::<Locale>()
        .map_err(|error| CollationError::InvalidLocale {
            tag: trimmed.to_string(),
            reason: format!("{error:?}"),
        })
}
