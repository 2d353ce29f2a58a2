//! Structural matching over JSON values.
//!
//! A [`Pattern`] describes what a value should look like; a [`Matcher`]
//! tests values against it and yields a possibly pending `Flow<bool>`.
//!
//! # Pattern forms
//!
//! | Pattern | Holds when |
//! |---------|------------|
//! | `Predicate(p)` | `p` holds |
//! | `Regex(r)` | `r` matches the value as text (strings as is, anything else as JSON) |
//! | `AnyOf(patterns)` | any sub-pattern holds |
//! | `Fields(fields)` | the value is an object and every field pattern holds for the field's value (missing fields are `null`) |
//! | `Kind(kind)` | the value has this JSON type |
//! | `Exact(value)` | the value equals `value` |
//!
//! JSON values convert into patterns: arrays become `AnyOf`, objects become
//! `Fields`, anything else becomes `Exact`.
//!
//! Strict matchers ([`match_strict`]) additionally require objects to have
//! exactly as many keys as the `Fields` pattern; loose matchers
//! ([`match_loose`]) ignore extra keys.
//!
//! # Examples
//!
//! ```rust
//! use flowless::pattern::{Kind, Pattern, match_loose, match_strict};
//! use serde_json::json;
//!
//! let point: Pattern = Pattern::fields([("x", Kind::Number), ("y", Kind::Number)]);
//! let strict = match_strict(point.clone());
//! let loose = match_loose(point);
//!
//! let labelled = json!({ "x": 1, "y": 2, "label": "origin" });
//! assert_eq!(strict.test(&labelled).ok(), Some(false));
//! assert_eq!(loose.test(&labelled).ok(), Some(true));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};

use crate::control::{IntoPredicate, Predicate};
use crate::error::Error;
use crate::flow::{Flow, all_true, any_true};

static NULL: Value = Value::Null;

/// JSON value types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `true` or `false`.
    Boolean,
    /// Any number.
    Number,
    /// A string.
    Text,
    /// An array.
    List,
    /// An object.
    Record,
    /// `null`.
    Null,
}

impl Kind {
    /// Returns the type of `value`.
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::Text,
            Value::Array(_) => Self::List,
            Value::Object(_) => Self::Record,
            Value::Null => Self::Null,
        }
    }
}

/// A description of acceptable values.
pub enum Pattern<E = Error> {
    /// A custom test.
    Predicate(Predicate<Value, E>),
    /// A regular expression tested against the value as text.
    Regex(Regex),
    /// Any of the sub-patterns.
    AnyOf(Vec<Pattern<E>>),
    /// Per-field sub-patterns, all of which must hold.
    Fields(IndexMap<String, Pattern<E>>),
    /// A JSON type test.
    Kind(Kind),
    /// Equality with a fixed value.
    Exact(Value),
}

impl<E> Pattern<E> {
    /// A custom test pattern.
    pub fn predicate<F>(test: F) -> Self
    where
        F: Fn(&Value) -> Flow<bool, E> + Send + Sync + 'static,
    {
        Self::Predicate(Predicate::new(test))
    }

    /// A `Fields` pattern from `(name, pattern)` pairs.
    pub fn fields<N, P, I>(fields: I) -> Self
    where
        N: Into<String>,
        P: Into<Self>,
        I: IntoIterator<Item = (N, P)>,
    {
        Self::Fields(
            fields
                .into_iter()
                .map(|(name, pattern)| (name.into(), pattern.into()))
                .collect(),
        )
    }

    /// An `AnyOf` pattern.
    pub fn any_of<P, I>(patterns: I) -> Self
    where
        P: Into<Self>,
        I: IntoIterator<Item = P>,
    {
        Self::AnyOf(patterns.into_iter().map(Into::into).collect())
    }
}

impl<E> From<Value> for Pattern<E> {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::AnyOf(items.into_iter().map(Self::from).collect()),
            Value::Object(fields) => Self::Fields(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, Self::from(value)))
                    .collect(),
            ),
            scalar => Self::Exact(scalar),
        }
    }
}

impl<E> From<Kind> for Pattern<E> {
    fn from(kind: Kind) -> Self {
        Self::Kind(kind)
    }
}

impl<E> From<Regex> for Pattern<E> {
    fn from(regex: Regex) -> Self {
        Self::Regex(regex)
    }
}

impl<E> From<Predicate<Value, E>> for Pattern<E> {
    fn from(predicate: Predicate<Value, E>) -> Self {
        Self::Predicate(predicate)
    }
}

impl<E> From<&str> for Pattern<E> {
    fn from(text: &str) -> Self {
        Self::Exact(Value::String(text.to_owned()))
    }
}

impl<E> Clone for Pattern<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Predicate(predicate) => Self::Predicate(predicate.clone()),
            Self::Regex(regex) => Self::Regex(regex.clone()),
            Self::AnyOf(patterns) => Self::AnyOf(patterns.clone()),
            Self::Fields(fields) => Self::Fields(fields.clone()),
            Self::Kind(kind) => Self::Kind(*kind),
            Self::Exact(value) => Self::Exact(value.clone()),
        }
    }
}

impl<E> fmt::Debug for Pattern<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(predicate) => formatter.debug_tuple("Predicate").field(predicate).finish(),
            Self::Regex(regex) => formatter.debug_tuple("Regex").field(&regex.as_str()).finish(),
            Self::AnyOf(patterns) => formatter.debug_tuple("AnyOf").field(patterns).finish(),
            Self::Fields(fields) => formatter.debug_tuple("Fields").field(fields).finish(),
            Self::Kind(kind) => formatter.debug_tuple("Kind").field(kind).finish(),
            Self::Exact(value) => formatter.debug_tuple("Exact").field(value).finish(),
        }
    }
}

/// A compiled pattern.
pub struct Matcher<E = Error> {
    pattern: Arc<Pattern<E>>,
    strict: bool,
}

/// Builds a matcher that rejects objects with keys the pattern does not
/// name.
pub fn match_strict<E>(pattern: impl Into<Pattern<E>>) -> Matcher<E> {
    Matcher {
        pattern: Arc::new(pattern.into()),
        strict: true,
    }
}

/// Builds a matcher that ignores object keys the pattern does not name.
pub fn match_loose<E>(pattern: impl Into<Pattern<E>>) -> Matcher<E> {
    Matcher {
        pattern: Arc::new(pattern.into()),
        strict: false,
    }
}

impl<E> Matcher<E> {
    /// Returns `true` for strict matchers.
    pub const fn is_strict(&self) -> bool {
        self.strict
    }
}

impl<E: Send + 'static> Matcher<E> {
    /// Tests `value` against the pattern.
    ///
    /// Pending sub-matches make the outcome pending.
    pub fn test(&self, value: &Value) -> Flow<bool, E> {
        evaluate(&self.pattern, value, self.strict)
    }
}

impl<E> Clone for Matcher<E> {
    fn clone(&self) -> Self {
        Self {
            pattern: Arc::clone(&self.pattern),
            strict: self.strict,
        }
    }
}

impl<E> fmt::Debug for Matcher<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Matcher")
            .field("pattern", &self.pattern)
            .field("strict", &self.strict)
            .finish()
    }
}

fn evaluate<E: Send + 'static>(pattern: &Pattern<E>, value: &Value, strict: bool) -> Flow<bool, E> {
    match pattern {
        Pattern::Predicate(predicate) => predicate.test(value),
        Pattern::Regex(regex) => Flow::Ready(match value {
            Value::String(text) => regex.is_match(text),
            other => regex.is_match(&other.to_string()),
        }),
        Pattern::AnyOf(patterns) => any_true(
            patterns
                .iter()
                .map(|pattern| evaluate(pattern, value, strict)),
        ),
        Pattern::Fields(fields) => {
            let Value::Object(record) = value else {
                return Flow::Ready(false);
            };
            if strict && record.len() != fields.len() {
                return Flow::Ready(false);
            }
            all_true(fields.iter().map(|(name, pattern)| {
                evaluate(pattern, record.get(name).unwrap_or(&NULL), strict)
            }))
        }
        Pattern::Kind(kind) => Flow::Ready(Kind::of(value) == *kind),
        Pattern::Exact(expected) => Flow::Ready(value == expected),
    }
}

/// Tests every key of `record` against `pattern`, strictly.
///
/// # Examples
///
/// ```rust
/// use flowless::pattern::{Pattern, match_keys};
/// use regex::Regex;
/// use serde_json::json;
///
/// let lowercase: Pattern = Regex::new("^[a-z]+$").unwrap().into();
/// let record = json!({ "one": 1, "two": 2 });
/// assert_eq!(match_keys(lowercase, record.as_object().unwrap()).ok(), Some(true));
/// ```
pub fn match_keys<E: Send + 'static>(pattern: impl Into<Pattern<E>>, record: &Map<String, Value>) -> Flow<bool, E> {
    let matcher = match_strict(pattern);
    all_true(record.keys().map(|key| matcher.test(&Value::String(key.clone()))))
}

impl<E: Send + 'static> IntoPredicate<Value, E> for Matcher<E> {
    fn into_predicate(self) -> Predicate<Value, E> {
        Predicate::new(move |value| self.test(value))
    }
}

impl<E: Send + 'static> IntoPredicate<Value, E> for Pattern<E> {
    /// Patterns used directly as conditions match strictly.
    fn into_predicate(self) -> Predicate<Value, E> {
        match_strict(self).into_predicate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    type Strict = Matcher<Error>;

    fn later(outcome: bool) -> Flow<bool> {
        Flow::pending(async move {
            tokio::task::yield_now().await;
            Ok(outcome)
        })
    }

    #[rstest]
    #[case(json!("file.json"), true)]
    #[case(json!("file.txt"), false)]
    fn test_regex_against_text(#[case] value: Value, #[case] expected: bool) {
        let matcher: Strict = match_strict(Regex::new(r"\.json$").unwrap());
        assert_eq!(matcher.test(&value).ok(), Some(expected));
    }

    #[rstest]
    fn test_regex_against_number_uses_json_text() {
        let matcher: Strict = match_strict(Regex::new("^5").unwrap());
        assert_eq!(matcher.test(&json!(50)).ok(), Some(true));
    }

    #[rstest]
    #[case(json!("two"), true)]
    #[case(json!("one"), false)]
    fn test_array_is_any_of(#[case] value: Value, #[case] expected: bool) {
        let matcher: Strict = match_strict(json!(["two", "three"]));
        assert_eq!(matcher.test(&value).ok(), Some(expected));
    }

    #[rstest]
    #[case(json!(false), Kind::Boolean)]
    #[case(json!(0), Kind::Number)]
    #[case(json!("text"), Kind::Text)]
    #[case(json!([1]), Kind::List)]
    #[case(json!({}), Kind::Record)]
    #[case(json!(null), Kind::Null)]
    fn test_kind_of(#[case] value: Value, #[case] expected: Kind) {
        assert_eq!(Kind::of(&value), expected);
        let matcher: Strict = match_strict(expected);
        assert_eq!(matcher.test(&value).ok(), Some(true));
    }

    #[rstest]
    fn test_fields_reject_non_objects() {
        let matcher: Strict = match_loose(json!({ "a": 1 }));
        assert_eq!(matcher.test(&json!([1])).ok(), Some(false));
        assert_eq!(matcher.test(&json!(null)).ok(), Some(false));
    }

    #[rstest]
    fn test_missing_field_matches_as_null() {
        let matcher: Strict = match_loose(Pattern::fields([("a", Kind::Null)]));
        assert_eq!(matcher.test(&json!({ "b": 1 })).ok(), Some(true));
    }

    #[rstest]
    fn test_strict_requires_same_key_count() {
        let pattern: Pattern = Pattern::fields([("a", json!(1))]);
        assert_eq!(match_strict(pattern.clone()).test(&json!({ "a": 1, "b": 2 })).ok(), Some(false));
        assert_eq!(match_loose(pattern).test(&json!({ "a": 1, "b": 2 })).ok(), Some(true));
    }

    #[rstest]
    #[tokio::test]
    async fn test_pending_field_predicate_makes_match_pending() {
        let pattern: Pattern = Pattern::fields([
            ("name", Pattern::from(Kind::Text)),
            ("age", Pattern::predicate(|value: &Value| later(value.as_u64().is_some_and(|age| age >= 18)))),
        ]);
        let matcher = match_strict(pattern);
        let adult = matcher.test(&json!({ "name": "Ada", "age": 36 }));
        assert!(adult.is_pending());
        assert_eq!(adult.await, Ok(true));
        assert_eq!(matcher.test(&json!({ "name": "Bo", "age": 9 })).await, Ok(false));
    }

    #[rstest]
    fn test_match_keys() {
        let record = json!({ "one": 1, "two": 2, "4": 4 });
        let lowercase = || -> Pattern { Regex::new("^[a-z]+$").unwrap().into() };
        assert_eq!(match_keys(lowercase(), record.as_object().unwrap()).ok(), Some(false));
        assert_eq!(match_keys(lowercase(), &Map::new()).ok(), Some(true));
    }
}
