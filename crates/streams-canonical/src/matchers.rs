use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::validation::ValidationError;

macro_rules! pattern {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static PATTERN: OnceLock<Regex> = OnceLock::new();
            PATTERN.get_or_init(|| Regex::new($pattern).expect("invalid regex"))
        }
    };
}

pattern!(
    token_pattern,
    r"^(?:[A-Za-z0-9\-._~]|%[0-9A-Fa-f]{2}|[!$&'()*+,;=])+$"
);
pattern!(
    relative_reference_pattern,
    r#"^(?:%[0-9A-Fa-f]{2}|[^\s%<>"{}|\\^`])*$"#
);
pattern!(
    mime_type_pattern,
    r#"^[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]{0,126}/[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]{0,126}(?:\s*;\s*[A-Za-z0-9!#$&^_.+-]+=(?:[A-Za-z0-9!#$&^_.+-]+|"[^"]*"))*$"#
);
pattern!(language_tag_pattern, r"^[A-Za-z]{1,8}(?:-[A-Za-z0-9]{1,8})*$");

/// Returns true for a non-empty run of unreserved, percent-encoded or sub-delim characters.
pub fn is_token(text: &str) -> bool {
    token_pattern().is_match(text)
}

/// Verbs are either bare tokens (`post`, `share`) or absolute IRIs.
pub fn is_verb(text: &str) -> bool {
    is_token(text) || is_absolute_iri(text)
}

/// Returns true when `text` parses as an absolute IRI (it carries a scheme).
pub fn is_absolute_iri(text: &str) -> bool {
    !text.chars().any(char::is_whitespace) && Url::parse(text).is_ok()
}

/// Returns true when `text` parses as an IRI reference, absolute or relative.
pub fn is_iri(text: &str) -> bool {
    is_absolute_iri(text) || relative_reference_pattern().is_match(text)
}

/// Returns true for a `type/subtype` media type, parameters allowed.
pub fn is_mime_type(text: &str) -> bool {
    mime_type_pattern().is_match(text)
}

/// Returns true for a hyphen-separated language tag such as `en` or `en-US`.
pub fn is_language_tag(text: &str) -> bool {
    language_tag_pattern().is_match(text)
}

/// IRI reference in canonical form.
///
/// Absolute references are normalized through the WHATWG URL parser (scheme
/// and host lowercased, default ports dropped, paths percent-encoded);
/// relative references are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    /// Parses an absolute or relative reference.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if is_absolute_iri(&s) {
            return Self::parse_absolute(s);
        }
        if !relative_reference_pattern().is_match(&s) {
            return Err(ValidationError::PatternMismatch { field: "iri", value: s });
        }
        Ok(Self(s))
    }

    /// Parses a reference that must be absolute.
    pub fn parse_absolute(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.chars().any(char::is_whitespace) {
            return Err(ValidationError::PatternMismatch { field: "iri", value: s });
        }
        match Url::parse(&s) {
            Ok(url) => Ok(Self(url.into())),
            Err(_) if relative_reference_pattern().is_match(&s) => {
                Err(ValidationError::RelativeReference { field: "iri", value: s })
            }
            Err(_) => Err(ValidationError::PatternMismatch { field: "iri", value: s }),
        }
    }

    /// Whether the reference carries a scheme.
    pub fn is_absolute(&self) -> bool {
        is_absolute_iri(&self.0)
    }

    /// Consumes the reference, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_and_verbs() {
        assert!(is_token("post"));
        assert!(is_token("make-friend"));
        assert!(is_token("a%20b"));
        assert!(!is_token(""));
        assert!(!is_token("two words"));
        assert!(is_verb("share"));
        assert!(is_verb("http://activitystrea.ms/schema/1.0/post"));
        assert!(!is_verb("not a verb"));
    }

    #[test]
    fn absolute_and_relative_references() {
        assert!(is_absolute_iri("http://example.org/foo"));
        assert!(is_absolute_iri("tag:example.org,2011:abc"));
        assert!(!is_absolute_iri("/relative/path"));
        assert!(!is_absolute_iri("http://example.org/a b"));
        assert!(is_iri("/relative/path"));
        assert!(is_iri("../up?q=1#frag"));
        assert!(!is_iri("bad<reference>"));
    }

    #[test]
    fn absolute_references_are_normalized() {
        let iri = Iri::parse("HTTP://Example.ORG").unwrap();
        assert_eq!(iri.as_ref(), "http://example.org/");
        assert!(iri.is_absolute());
        assert_eq!(Iri::parse(iri.as_ref()).unwrap(), iri);
    }

    #[test]
    fn relative_reference_rejected_when_absolute_required() {
        let err = Iri::parse_absolute("foo/bar").unwrap_err();
        assert!(matches!(err, ValidationError::RelativeReference { .. }));
    }

    #[test]
    fn media_types_and_language_tags() {
        assert!(is_mime_type("text/html"));
        assert!(is_mime_type("application/activity+json; charset=utf-8"));
        assert!(!is_mime_type("html"));
        assert!(is_language_tag("en"));
        assert!(is_language_tag("zh-Hant-TW"));
        assert!(!is_language_tag("en_US"));
    }
}
