//! Value kinds and call signatures.
//!
//! A [`Signature`] is an ordered list of parameter kinds plus a return kind.
//! Equality is structural, so two signatures parsed from `"(int)->Class"` and
//! built with [`Signature::new`] compare equal.
//!
//! The textual form is `(<param>, <param>, ...)-><return>`:
//!
//! ```
//! use symprobe_types::{Signature, ValueKind};
//!
//! let sig: Signature = "(int)->Class".parse().unwrap();
//! assert_eq!(sig.params(), &[ValueKind::Int]);
//! assert_eq!(sig.ret(), &ValueKind::Named("Class".into()));
//! assert_eq!(sig.to_string(), "(int)->Class");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing a [`ValueKind`] or [`Signature`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureParseError {
    #[error("empty type name")]
    EmptyType,
    #[error("invalid type name '{0}'")]
    InvalidType(String),
    #[error("'void' is only allowed as a return kind")]
    VoidParameter,
    #[error("malformed signature '{0}', expected '(<params>)-><return>'")]
    Malformed(String),
}

/// The kind of a single value crossing a call boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueKind {
    Void,
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    /// Any non-primitive type, by its (possibly qualified) name.
    Named(String),
}

impl ValueKind {
    pub fn named(name: impl Into<String>) -> Self {
        ValueKind::Named(name.into())
    }

    pub fn is_void(&self) -> bool {
        matches!(self, ValueKind::Void)
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, ValueKind::Named(_))
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::Void => "void",
            ValueKind::Boolean => "boolean",
            ValueKind::Byte => "byte",
            ValueKind::Short => "short",
            ValueKind::Char => "char",
            ValueKind::Int => "int",
            ValueKind::Long => "long",
            ValueKind::Float => "float",
            ValueKind::Double => "double",
            ValueKind::Named(name) => name,
        };
        f.write_str(s)
    }
}

impl FromStr for ValueKind {
    type Err = SignatureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let kind = match s {
            "" => return Err(SignatureParseError::EmptyType),
            "void" => ValueKind::Void,
            "boolean" | "bool" => ValueKind::Boolean,
            "byte" => ValueKind::Byte,
            "short" => ValueKind::Short,
            "char" => ValueKind::Char,
            "int" => ValueKind::Int,
            "long" => ValueKind::Long,
            "float" => ValueKind::Float,
            "double" => ValueKind::Double,
            other => {
                let valid = other
                    .chars()
                    .all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | '[' | ']'));
                if !valid || other.starts_with('.') || other.ends_with('.') {
                    return Err(SignatureParseError::InvalidType(other.to_string()));
                }
                ValueKind::Named(other.to_string())
            }
        };
        Ok(kind)
    }
}

impl TryFrom<String> for ValueKind {
    type Error = SignatureParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ValueKind> for String {
    fn from(value: ValueKind) -> Self {
        value.to_string()
    }
}

/// Ordered parameter kinds plus a return kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature {
    params: Vec<ValueKind>,
    ret: ValueKind,
}

impl Signature {
    /// Build a signature from its return kind and parameters.
    pub fn new(ret: ValueKind, params: impl IntoIterator<Item = ValueKind>) -> Self {
        Self {
            params: params.into_iter().collect(),
            ret,
        }
    }

    /// `() -> value`, the shape of a field getter handle.
    pub fn getter(value: ValueKind) -> Self {
        Self::new(value, [])
    }

    /// `(value) -> void`, the shape of a field setter handle.
    pub fn setter(value: ValueKind) -> Self {
        Self::new(ValueKind::Void, [value])
    }

    pub fn params(&self) -> &[ValueKind] {
        &self.params
    }

    pub fn ret(&self) -> &ValueKind {
        &self.ret
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Same parameters, different return kind.
    pub fn with_ret(&self, ret: ValueKind) -> Self {
        Self {
            params: self.params.clone(),
            ret,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ")->{}", self.ret)
    }
}

impl FromStr for Signature {
    type Err = SignatureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SignatureParseError::Malformed(s.to_string());
        let trimmed = s.trim();
        let rest = trimmed.strip_prefix('(').ok_or_else(malformed)?;
        let close = rest.find(')').ok_or_else(malformed)?;
        let (params_src, tail) = rest.split_at(close);
        let ret_src = tail[1..].trim_start().strip_prefix("->").ok_or_else(malformed)?;

        let mut params = Vec::new();
        if !params_src.trim().is_empty() {
            for part in params_src.split(',') {
                let kind: ValueKind = part.parse()?;
                if kind.is_void() {
                    return Err(SignatureParseError::VoidParameter);
                }
                params.push(kind);
            }
        }
        let ret: ValueKind = ret_src.parse()?;
        Ok(Self { params, ret })
    }
}

impl TryFrom<String> for Signature {
    type Error = SignatureParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Signature> for String {
    fn from(value: Signature) -> Self {
        value.to_string()
    }
}
