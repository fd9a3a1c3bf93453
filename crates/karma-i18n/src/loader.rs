//! Fluent bundle loading from the embedded locale files.

use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use karma_common::{KarmaError, KarmaResult};
use once_cell::sync::Lazy;
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

/// Locale used when the requested one is unavailable.
pub const FALLBACK_LOCALE: &str = "en-US";

/// Embedded resources, keyed by locale tag.
static RESOURCES: &[(&str, &str)] = &[("en-US", include_str!("../locales/en-US/karma.ftl"))];

static FALLBACK_ID: Lazy<LanguageIdentifier> = Lazy::new(|| {
    FALLBACK_LOCALE
        .parse()
        .unwrap_or_else(|_| LanguageIdentifier::default())
});

/// Tags of every embedded locale.
pub fn available_locales() -> impl Iterator<Item = &'static str> {
    RESOURCES.iter().map(|(tag, _)| *tag)
}

/// Picks the embedded resource for `requested`.
///
/// Exact tag matches win, then any locale with the same language subtag,
/// then the fallback locale.
fn select_resource(requested: Option<&LanguageIdentifier>) -> Option<(&'static str, &'static str)> {
    let parsed = || {
        RESOURCES.iter().filter_map(|(tag, source)| {
            tag.parse::<LanguageIdentifier>()
                .ok()
                .map(|id| (id, *tag, *source))
        })
    };

    let exact = requested.and_then(|want| parsed().find(|(id, _, _)| id == want));
    let same_language =
        || requested.and_then(|want| parsed().find(|(id, _, _)| id.language == want.language));
    let fallback = || parsed().find(|(id, _, _)| *id == *FALLBACK_ID);

    exact
        .or_else(same_language)
        .or_else(fallback)
        .map(|(_, tag, source)| (tag, source))
}

/// A Fluent bundle for one locale, shareable across threads.
pub struct LocaleBundle {
    locale: LanguageIdentifier,
    bundle: FluentBundle<FluentResource>,
}

impl std::fmt::Debug for LocaleBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleBundle")
            .field("locale", &self.locale.to_string())
            .finish_non_exhaustive()
    }
}

impl LocaleBundle {
    /// Loads the embedded bundle best matching `language`.
    pub fn load(language: &str) -> KarmaResult<Self> {
        let requested = language.parse::<LanguageIdentifier>().ok();
        let (tag, source) = select_resource(requested.as_ref()).ok_or_else(|| {
            KarmaError::localization("no embedded locale resources", Some(language))
        })?;

        if requested.as_ref().map(ToString::to_string).as_deref() != Some(tag) {
            warn!(requested = language, using = tag, "Requested locale not available exactly");
        }
        Self::from_source(tag, source)
    }

    /// Builds a bundle from Fluent source text.
    pub fn from_source(tag: &str, source: &str) -> KarmaResult<Self> {
        let locale: LanguageIdentifier = tag
            .parse()
            .map_err(|e| KarmaError::localization(format!("invalid locale tag: {e}"), Some(tag)))?;

        let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
            KarmaError::localization(
                format!("{} syntax error(s) in resource: {errors:?}", errors.len()),
                Some(tag),
            )
        })?;

        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Replies are compared byte for byte; no bidi isolation marks.
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| {
            KarmaError::localization(format!("conflicting messages: {errors:?}"), Some(tag))
        })?;

        debug!(locale = %locale, "Loaded locale bundle");
        Ok(Self { locale, bundle })
    }

    /// Locale of this bundle.
    pub const fn locale(&self) -> &LanguageIdentifier {
        &self.locale
    }

    /// Whether the bundle defines message `id`.
    pub fn has_message(&self, id: &str) -> bool {
        self.bundle.has_message(id)
    }

    /// Formats message `id`. Missing messages render as their id.
    pub fn format(&self, id: &str, args: Option<&FluentArgs<'_>>) -> String {
        let Some(pattern) = self.bundle.get_message(id).and_then(|message| message.value()) else {
            warn!(id, locale = %self.locale, "Missing message");
            return id.to_string();
        };

        let mut errors = Vec::new();
        let text = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            warn!(id, ?errors, "Errors while formatting message");
        }
        text.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_locale_is_embedded() {
        assert!(available_locales().any(|tag| tag == FALLBACK_LOCALE));
    }

    #[test]
    fn test_load_exact_locale() {
        let bundle = LocaleBundle::load("en-US").unwrap();
        assert_eq!(bundle.locale().to_string(), "en-US");
        assert!(bundle.has_message("karma-is"));
    }

    #[test]
    fn test_same_language_falls_back_to_region_variant() {
        let bundle = LocaleBundle::load("en-GB").unwrap();
        assert_eq!(bundle.locale().to_string(), "en-US");
    }

    #[test]
    fn test_unknown_language_uses_fallback() {
        let bundle = LocaleBundle::load("xx-invalid-").unwrap();
        assert_eq!(bundle.locale().to_string(), FALLBACK_LOCALE);
    }

    #[test]
    fn test_missing_message_renders_id() {
        let bundle = LocaleBundle::from_source("en-US", "hello = Hello").unwrap();
        assert_eq!(bundle.format("hello", None), "Hello");
        assert_eq!(bundle.format("missing-id", None), "missing-id");
    }

    #[test]
    fn test_invalid_source_is_localization_error() {
        let err = LocaleBundle::from_source("en-US", "= broken").unwrap_err();
        assert!(err.is_fatal());
    }
}
