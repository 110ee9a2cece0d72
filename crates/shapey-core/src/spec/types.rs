//! Core types for spec fields and control settings
//!
//! A spec field is exactly one of a transform, a nested spec, or a literal.
//! The two control axes (`shapeyMode` and `shapeyTransforms`) are parsed
//! into closed enums once, when the spec is assembled.
//!
//! Copyright (c) 2025 Shapey Team
//! Licensed under the Apache-2.0 license

use crate::error::{TransformError, TransformResult};
use crate::spec::Spec;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

/// Reserved key selecting which fields survive shaping
pub const SHAPEY_MODE: &str = "shapeyMode";
/// Reserved key selecting how transforms are applied
pub const SHAPEY_TRANSFORMS: &str = "shapeyTransforms";
/// Reserved key selecting the transform error policy
pub const SHAPEY_DEBUG: &str = "shapeyDebug";

/// All reserved keys, in the order they are documented
pub const CONTROL_KEYS: [&str; 3] = [SHAPEY_MODE, SHAPEY_TRANSFORMS, SHAPEY_DEBUG];

/// Whether `key` names one of the reserved control settings
///
/// Only the three names in [`CONTROL_KEYS`] match, ignoring ASCII case.
/// Any other `shapey`-prefixed key is ordinary data.
pub fn is_control_key(key: &str) -> bool {
    CONTROL_KEYS.iter().any(|control| control.eq_ignore_ascii_case(key))
}

static NULL: Value = Value::Null;

type TransformFn = dyn Fn(&[Value]) -> TransformResult + Send + Sync;

/// A callable field value
///
/// Transforms receive their arguments as a slice. Unary transforms (the
/// common case) read the first argument, or `null` when none was given.
/// The declared arity only matters for whole-object application, where a
/// compiled spec accepts as many arguments as its widest transform.
#[derive(Clone)]
pub struct Transform {
    name: Option<String>,
    arity: usize,
    func: Arc<TransformFn>,
}

impl Transform {
    /// Create a fallible unary transform
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> TransformResult + Send + Sync + 'static,
    {
        Self {
            name: None,
            arity: 1,
            func: Arc::new(move |args: &[Value]| f(args.first().unwrap_or(&NULL))),
        }
    }

    /// Create a unary transform that cannot fail
    pub fn map<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self::new(move |value| Ok(f(value)))
    }

    /// Create a transform over an argument list with a declared arity
    pub fn variadic<F>(arity: usize, f: F) -> Self
    where
        F: Fn(&[Value]) -> TransformResult + Send + Sync + 'static,
    {
        Self {
            name: None,
            arity,
            func: Arc::new(f),
        }
    }

    /// A transform that ignores its arguments
    pub fn constant(value: Value) -> Self {
        Self {
            name: None,
            arity: 0,
            func: Arc::new(move |_: &[Value]| Ok(value.clone())),
        }
    }

    /// Attach a name, used in diagnostics
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Run the transform over an argument list
    pub fn call(&self, args: &[Value]) -> TransformResult {
        (self.func)(args)
    }

    /// Run the transform over a single value
    pub fn apply(&self, value: &Value) -> TransformResult {
        self.call(std::slice::from_ref(value))
    }

    /// Fail with a message; convenience for closures
    pub fn fail<T>(message: impl Into<String>) -> Result<T, TransformError> {
        Err(TransformError::failed(message))
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("name", &self.name.as_deref().unwrap_or("<anonymous>"))
            .field("arity", &self.arity)
            .finish()
    }
}

/// A single spec entry
#[derive(Debug, Clone)]
pub enum Field {
    /// Computed from input
    Transform(Transform),
    /// Applied recursively to the value under the same key
    Nested(Spec),
    /// Emitted as-is
    Literal(Value),
}

impl Field {
    pub fn is_transform(&self) -> bool {
        matches!(self, Field::Transform(_))
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Field::Nested(_))
    }

    pub fn as_transform(&self) -> Option<&Transform> {
        match self {
            Field::Transform(transform) => Some(transform),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Field::Literal(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Transform> for Field {
    fn from(transform: Transform) -> Self {
        Field::Transform(transform)
    }
}

impl From<Spec> for Field {
    fn from(spec: Spec) -> Self {
        Field::Nested(spec)
    }
}

impl From<Value> for Field {
    fn from(value: Value) -> Self {
        Field::Literal(value)
    }
}

/// Which fields survive shaping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Input fields pass through, spec fields are layered on top
    #[default]
    Loose,
    /// Only keys named in the spec survive
    Strict,
    /// Every spec key is emitted, present in input or not
    SuperStrict,
    /// Every transform sees the whole input object
    SuperLoose,
    /// Only fields flagged in the spec are kept from input
    Keep,
    /// Fields flagged in the spec are removed from input
    Remove,
}

struct ModePatterns {
    remove: Regex,
    keep: Regex,
    super_strict: Regex,
    strict: Regex,
    super_loose: Regex,
    loose: Regex,
}

static MODE_PATTERNS: OnceLock<ModePatterns> = OnceLock::new();

fn mode_patterns() -> &'static ModePatterns {
    MODE_PATTERNS.get_or_init(|| ModePatterns {
        remove: Regex::new(r"(?i)remove").expect("valid mode pattern"),
        keep: Regex::new(r"(?i)keep").expect("valid mode pattern"),
        super_strict: Regex::new(r"(?i)super.?strict").expect("valid mode pattern"),
        strict: Regex::new(r"(?i)strict").expect("valid mode pattern"),
        super_loose: Regex::new(r"(?i)super.?loose").expect("valid mode pattern"),
        loose: Regex::new(r"(?i)loose|unset").expect("valid mode pattern"),
    })
}

fn squash(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

impl Mode {
    /// Match a mode string, or `None` when nothing matches
    ///
    /// Matching ignores case and whitespace and checks, in order: remove,
    /// keep, super strict, strict, super loose, loose.
    pub fn recognize(raw: &str) -> Option<Mode> {
        let text = squash(raw);
        let patterns = mode_patterns();
        if patterns.remove.is_match(&text) {
            Some(Mode::Remove)
        } else if patterns.keep.is_match(&text) {
            Some(Mode::Keep)
        } else if patterns.super_strict.is_match(&text) {
            Some(Mode::SuperStrict)
        } else if patterns.strict.is_match(&text) {
            Some(Mode::Strict)
        } else if patterns.super_loose.is_match(&text) {
            Some(Mode::SuperLoose)
        } else if patterns.loose.is_match(&text) {
            Some(Mode::Loose)
        } else {
            None
        }
    }

    /// Total version of [`Mode::recognize`]; unknown strings mean loose
    pub fn parse(raw: &str) -> Mode {
        Self::recognize(raw).unwrap_or_default()
    }
}

impl FromStr for Mode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Mode::parse(s))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Loose => write!(f, "loose"),
            Mode::Strict => write!(f, "strict"),
            Mode::SuperStrict => write!(f, "super strict"),
            Mode::SuperLoose => write!(f, "super loose"),
            Mode::Keep => write!(f, "keep"),
            Mode::Remove => write!(f, "remove"),
        }
    }
}

/// How transform fields are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformsMode {
    /// Prop-level for keys present in input, whole-object for the rest
    #[default]
    Default,
    /// Every transform receives its own key's value
    Prop,
    /// Every transform receives the whole input
    Whole,
}

impl TransformsMode {
    /// Match a transforms string, or `None` when nothing matches
    pub fn recognize(raw: &str) -> Option<TransformsMode> {
        let text = squash(raw).to_ascii_lowercase();
        if text.contains("prop") {
            Some(TransformsMode::Prop)
        } else if text.contains("whole") {
            Some(TransformsMode::Whole)
        } else if text.contains("unset") || text.contains("default") {
            Some(TransformsMode::Default)
        } else {
            None
        }
    }

    /// Total version of [`TransformsMode::recognize`]
    pub fn parse(raw: &str) -> TransformsMode {
        Self::recognize(raw).unwrap_or_default()
    }
}

impl FromStr for TransformsMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TransformsMode::parse(s))
    }
}

impl fmt::Display for TransformsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformsMode::Default => write!(f, "default"),
            TransformsMode::Prop => write!(f, "prop"),
            TransformsMode::Whole => write!(f, "whole"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_parsing_is_case_and_space_insensitive() {
        assert_eq!(Mode::parse("strict"), Mode::Strict);
        assert_eq!(Mode::parse("STRICT"), Mode::Strict);
        assert_eq!(Mode::parse("super strict"), Mode::SuperStrict);
        assert_eq!(Mode::parse("Super  Strict"), Mode::SuperStrict);
        assert_eq!(Mode::parse("super-strict"), Mode::SuperStrict);
        assert_eq!(Mode::parse("superloose"), Mode::SuperLoose);
        assert_eq!(Mode::parse("Keep"), Mode::Keep);
        assert_eq!(Mode::parse("remove"), Mode::Remove);
        assert_eq!(Mode::parse("loose"), Mode::Loose);
        assert_eq!(Mode::parse("unset"), Mode::Loose);
    }

    #[test]
    fn test_unknown_mode_defaults_to_loose() {
        assert_eq!(Mode::recognize("sloppy"), None);
        assert_eq!(Mode::parse("sloppy"), Mode::Loose);
        assert_eq!("".parse::<Mode>(), Ok(Mode::Loose));
    }

    #[test]
    fn test_transforms_mode_parsing() {
        assert_eq!(TransformsMode::parse("prop"), TransformsMode::Prop);
        assert_eq!(TransformsMode::parse("Whole"), TransformsMode::Whole);
        assert_eq!(TransformsMode::parse("unset"), TransformsMode::Default);
        assert_eq!(TransformsMode::recognize("sideways"), None);
        assert_eq!(TransformsMode::parse("sideways"), TransformsMode::Default);
    }

    #[test]
    fn test_control_keys() {
        assert!(is_control_key("shapeyMode"));
        assert!(is_control_key("SHAPEYDEBUG"));
        assert!(is_control_key("shapeyTransforms"));
        assert!(!is_control_key("shape"));
        assert!(!is_control_key("shapeyFoo"));
        assert!(!is_control_key("shapeyModes"));
        assert!(!is_control_key(" shapeyMode"));
    }

    #[test]
    fn test_unary_transform_reads_first_argument() {
        let double = Transform::new(|v| match v.as_i64() {
            Some(n) => Ok(json!(n * 2)),
            None => Err(TransformError::type_mismatch("number", v)),
        });
        assert_eq!(double.arity(), 1);
        assert_eq!(double.apply(&json!(21)), Ok(json!(42)));
        assert_eq!(double.call(&[json!(2), json!(100)]), Ok(json!(4)));
        assert!(double.call(&[]).is_err(), "missing argument reads as null");
    }

    #[test]
    fn test_constant_and_variadic() {
        let gym = Transform::constant(json!("gym"));
        assert_eq!(gym.arity(), 0);
        assert_eq!(gym.call(&[]), Ok(json!("gym")));

        let count = Transform::variadic(3, |args| Ok(json!(args.len())));
        assert_eq!(count.arity(), 3);
        assert_eq!(count.call(&[json!(1), json!(2)]), Ok(json!(2)));
    }

    #[test]
    fn test_transform_debug_shows_name() {
        let t = Transform::map(|v| v.clone()).named("identity");
        assert_eq!(format!("{:?}", t), "Transform { name: \"identity\", arity: 1 }");
    }
}
