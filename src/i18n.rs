//! Message catalog and `Accept-Language` negotiation.
//!
//! Catalogs are flat JSON objects (`key -> text`) embedded at compile time,
//! one per locale. A lookup falls back to the default locale and finally to
//! the key itself, so a missing translation never fails a request.

use std::collections::HashMap;
use std::fmt;

/// Message keys shared by every resource.
pub mod keys {
    pub const INVALID_PAGE_NUMBER: &str = "InvalidPageNumber";
    pub const VALIDATION_FAILED: &str = "ValidationFailed";
    pub const INTERNAL_SERVER_ERROR: &str = "InternalServerError";
    pub const CONCURRENCY_CONFLICT: &str = "ConcurrencyConflict";
    pub const INVALID_REQUEST_BODY: &str = "InvalidRequestBody";
    pub const INVALID_QUERY_PARAMETERS: &str = "InvalidQueryParameters";
    pub const INVALID_ROUTE_PARAMETER: &str = "InvalidRouteParameter";
    pub const NO_FILE_UPLOADED: &str = "NoFileUploaded";
    pub const FILE_UPLOADED_SUCCESSFULLY: &str = "FileUploadedSuccessfully";
    pub const CATEGORY_ID_REQUIRED: &str = "CategoryIdRequired";
    pub const ROUTE_NOT_FOUND: &str = "RouteNotFound";
    pub const METHOD_NOT_ALLOWED: &str = "MethodNotAllowed";
    pub const REQUEST_TIMEOUT: &str = "RequestTimeout";
}

const BUNDLED: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en.json")),
    ("ar", include_str!("../locales/ar.json")),
];

/// A negotiated locale tag, lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_ascii_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    default_locale: Locale,
    messages: HashMap<Locale, HashMap<String, String>>,
}

impl Catalog {
    /// Loads the compiled-in catalogs, keeping only the `supported` locales.
    ///
    /// # Errors
    /// Returns an error if a bundled catalog is not a JSON string map.
    pub fn bundled(default_locale: &str, supported: &[String]) -> Result<Self, serde_json::Error> {
        let mut messages = HashMap::new();
        for (tag, raw) in BUNDLED {
            let locale = Locale::new(tag);
            if !supported.is_empty() && !supported.iter().any(|s| Locale::new(s) == locale) {
                continue;
            }
            let table: HashMap<String, String> = serde_json::from_str(raw)?;
            messages.insert(locale, table);
        }
        Ok(Self {
            default_locale: Locale::new(default_locale),
            messages,
        })
    }

    #[must_use]
    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    #[must_use]
    pub fn supports(&self, locale: &Locale) -> bool {
        self.messages.contains_key(locale)
    }

    /// Picks the best supported locale for an `Accept-Language` value.
    ///
    /// Tags are tried in descending quality order; each tag is matched
    /// exactly, then by its primary subtag (`en-US` matches `en`).
    #[must_use]
    pub fn negotiate(&self, accept_language: Option<&str>) -> Locale {
        let Some(header) = accept_language else {
            return self.default_locale.clone();
        };

        let mut ranges: Vec<(Locale, f32)> = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let tag = pieces.next()?.trim();
                if tag.is_empty() || tag == "*" {
                    return None;
                }
                let quality = pieces
                    .filter_map(|p| p.trim().strip_prefix("q="))
                    .find_map(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                (quality > 0.0).then(|| (Locale::new(tag), quality))
            })
            .collect();
        ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

        for (locale, _) in ranges {
            if self.supports(&locale) {
                return locale;
            }
            if let Some((primary, _)) = locale.as_str().split_once('-') {
                let primary = Locale::new(primary);
                if self.supports(&primary) {
                    return primary;
                }
            }
        }
        self.default_locale.clone()
    }

    /// Display text for `key`.
    #[must_use]
    pub fn text(&self, locale: &Locale, key: &str) -> String {
        [locale, &self.default_locale]
            .into_iter()
            .find_map(|l| self.messages.get(l).and_then(|table| table.get(key)))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::bundled("ar", &["en".to_string(), "ar".to_string()])
            .expect("bundled catalogs parse")
    }

    #[test]
    fn test_missing_header_uses_default() {
        assert_eq!(catalog().negotiate(None), Locale::new("ar"));
        assert_eq!(catalog().negotiate(Some("")), Locale::new("ar"));
    }

    #[test]
    fn test_exact_and_primary_subtag_match() {
        let c = catalog();
        assert_eq!(c.negotiate(Some("en")), Locale::new("en"));
        assert_eq!(c.negotiate(Some("en-US")), Locale::new("en"));
        assert_eq!(c.negotiate(Some("AR-eg")), Locale::new("ar"));
    }

    #[test]
    fn test_quality_ordering() {
        let c = catalog();
        assert_eq!(c.negotiate(Some("ar;q=0.4, en;q=0.9")), Locale::new("en"));
        assert_eq!(c.negotiate(Some("fr-FR, fr;q=0.9, en;q=0.5")), Locale::new("en"));
        assert_eq!(c.negotiate(Some("en;q=0, ar")), Locale::new("ar"));
    }

    #[test]
    fn test_unsupported_falls_back_to_default() {
        assert_eq!(catalog().negotiate(Some("de-DE, fr")), Locale::new("ar"));
    }

    #[test]
    fn test_text_lookup_and_fallbacks() {
        let c = catalog();
        let en = Locale::new("en");
        assert_eq!(c.text(&en, keys::INVALID_PAGE_NUMBER), "Invalid page number.");
        assert_eq!(
            c.text(&Locale::new("fr"), keys::INVALID_PAGE_NUMBER),
            "رقم الصفحة غير صالح."
        );
        assert_eq!(c.text(&en, "NoSuchKey"), "NoSuchKey");
    }

    #[test]
    fn test_supported_list_filters_catalogs() {
        let c = Catalog::bundled("en", &["en".to_string()]).expect("bundled catalogs parse");
        assert!(c.supports(&Locale::new("en")));
        assert!(!c.supports(&Locale::new("ar")));
        assert_eq!(c.negotiate(Some("ar")), Locale::new("en"));
    }

    #[test]
    fn test_bundled_locales_share_keys() {
        let c = catalog();
        let en: std::collections::BTreeSet<_> = c.messages[&Locale::new("en")].keys().collect();
        let ar: std::collections::BTreeSet<_> = c.messages[&Locale::new("ar")].keys().collect();
        assert_eq!(en, ar);
    }
}
