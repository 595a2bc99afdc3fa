//! Temporal values whose base type is only known at runtime.
//!
//! Hosts that receive literals tagged with a type name (`tint`, `tfloat`,
//! ...) parse them into an [`AnyTemporal`] and dispatch from there. Values
//! of different base types are never converted into each other: an int and
//! a float cannot be compared here, the caller has to cast explicitly.
use crate::base::{BaseValue, GeogPoint, GeomPoint, GeomPoint3d};
use crate::config::Config;
use crate::error::{Result, TemporalError};
use crate::lifting;
use crate::temporal::Temporal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseType {
    Bool,
    Int,
    Float,
    Text,
    GeomPoint,
    GeomPoint3D,
    GeogPoint,
}

impl BaseType {
    pub const ALL: [BaseType; 7] = [
        BaseType::Bool,
        BaseType::Int,
        BaseType::Float,
        BaseType::Text,
        BaseType::GeomPoint,
        BaseType::GeomPoint3D,
        BaseType::GeogPoint,
    ];

    /// Name of the temporal type, as used by hosts.
    pub fn name(self) -> &'static str {
        match self {
            BaseType::Bool => "tbool",
            BaseType::Int => "tint",
            BaseType::Float => "tfloat",
            BaseType::Text => "ttext",
            BaseType::GeomPoint => "tgeompoint",
            BaseType::GeomPoint3D => "tgeompoint3d",
            BaseType::GeogPoint => "tgeogpoint",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BaseType {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        BaseType::ALL
            .into_iter()
            .find(|base| base.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TemporalError::InvalidBaseValue(format!("unknown temporal type: {}", wanted)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnyTemporal {
    Bool(Temporal<bool>),
    Int(Temporal<i32>),
    Float(Temporal<f64>),
    Text(Temporal<String>),
    GeomPoint(Temporal<GeomPoint>),
    GeomPoint3D(Temporal<GeomPoint3d>),
    GeogPoint(Temporal<GeogPoint>),
}

/// Base types that have a slot in [`AnyTemporal`].
pub trait ErasedBase: BaseValue {
    const BASE: BaseType;

    fn wrap(temp: Temporal<Self>) -> AnyTemporal;

    fn downcast(any: &AnyTemporal) -> Option<&Temporal<Self>>;
}

macro_rules! erased_base {
    ($ty:ty, $variant:ident) => {
        impl ErasedBase for $ty {
            const BASE: BaseType = BaseType::$variant;

            fn wrap(temp: Temporal<Self>) -> AnyTemporal {
                AnyTemporal::$variant(temp)
            }

            fn downcast(any: &AnyTemporal) -> Option<&Temporal<Self>> {
                match any {
                    AnyTemporal::$variant(temp) => Some(temp),
                    _ => None,
                }
            }
        }

        impl From<Temporal<$ty>> for AnyTemporal {
            fn from(temp: Temporal<$ty>) -> Self {
                AnyTemporal::$variant(temp)
            }
        }
    };
}

erased_base!(bool, Bool);
erased_base!(i32, Int);
erased_base!(f64, Float);
erased_base!(String, Text);
erased_base!(GeomPoint, GeomPoint);
erased_base!(GeomPoint3d, GeomPoint3D);
erased_base!(GeogPoint, GeogPoint);

/// Run `$body` with `$temp` bound to the typed value inside `$any`.
macro_rules! dispatch {
    ($any:expr, $temp:ident => $body:expr) => {
        match $any {
            AnyTemporal::Bool($temp) => $body,
            AnyTemporal::Int($temp) => $body,
            AnyTemporal::Float($temp) => $body,
            AnyTemporal::Text($temp) => $body,
            AnyTemporal::GeomPoint($temp) => $body,
            AnyTemporal::GeomPoint3D($temp) => $body,
            AnyTemporal::GeogPoint($temp) => $body,
        }
    };
}

fn parse_as<V: ErasedBase>(text: &str, config: &Config) -> Result<AnyTemporal> {
    Temporal::<V>::parse(text, config).map(V::wrap)
}

fn same_base<'a, V: ErasedBase>(other: &'a AnyTemporal) -> Result<&'a Temporal<V>> {
    V::downcast(other).ok_or(TemporalError::BaseTypeMismatch {
        expected: V::BASE.name(),
        found: other.base_type().name(),
    })
}

fn concat_members<V: ErasedBase>(items: &[AnyTemporal]) -> Result<AnyTemporal> {
    let mut sequences = Vec::new();
    for item in items {
        let temp = same_base::<V>(item)?;
        sequences.extend(temp.to_sequence_set().sequences().iter().cloned());
    }
    Temporal::sequence_set(sequences).map(V::wrap)
}

impl AnyTemporal {
    /// # Examples
    ///
    /// ```
    /// use tempora::config::Config;
    /// use tempora::dynamic::{AnyTemporal, BaseType};
    ///
    /// let temp = AnyTemporal::parse(BaseType::Int, "{1@2001-01-01, 2@2001-01-02}", &Config::default()).unwrap();
    /// assert_eq!(temp.base_type(), BaseType::Int);
    /// assert_eq!(temp.subtype(), "InstantSet");
    /// ```
    pub fn parse(base: BaseType, text: &str, config: &Config) -> Result<Self> {
        match base {
            BaseType::Bool => parse_as::<bool>(text, config),
            BaseType::Int => parse_as::<i32>(text, config),
            BaseType::Float => parse_as::<f64>(text, config),
            BaseType::Text => parse_as::<String>(text, config),
            BaseType::GeomPoint => parse_as::<GeomPoint>(text, config),
            BaseType::GeomPoint3D => parse_as::<GeomPoint3d>(text, config),
            BaseType::GeogPoint => parse_as::<GeogPoint>(text, config),
        }
    }

    pub fn to_literal(&self, config: &Config) -> String {
        dispatch!(self, temp => temp.to_literal(config))
    }

    pub fn base_type(&self) -> BaseType {
        match self {
            AnyTemporal::Bool(_) => BaseType::Bool,
            AnyTemporal::Int(_) => BaseType::Int,
            AnyTemporal::Float(_) => BaseType::Float,
            AnyTemporal::Text(_) => BaseType::Text,
            AnyTemporal::GeomPoint(_) => BaseType::GeomPoint,
            AnyTemporal::GeomPoint3D(_) => BaseType::GeomPoint3D,
            AnyTemporal::GeogPoint(_) => BaseType::GeogPoint,
        }
    }

    pub fn subtype(&self) -> &'static str {
        dispatch!(self, temp => temp.subtype())
    }

    pub fn num_instants(&self) -> usize {
        dispatch!(self, temp => temp.num_instants())
    }

    pub fn hash32(&self) -> u32 {
        dispatch!(self, temp => temp.hash32())
    }

    /// Temporal equality; both operands must share a base type.
    pub fn teq(&self, other: &AnyTemporal) -> Result<Temporal<bool>> {
        dispatch!(self, temp => lifting::teq(temp, same_base(other)?))
    }

    pub fn tne(&self, other: &AnyTemporal) -> Result<Temporal<bool>> {
        dispatch!(self, temp => lifting::tne(temp, same_base(other)?))
    }

    /// Concatenate the members of `items`, all of one base type, into a
    /// sequence set. Discrete items contribute instantaneous members.
    pub fn sequence_set(items: &[AnyTemporal]) -> Result<Self> {
        let first = items.first().ok_or(TemporalError::Empty)?;
        match first.base_type() {
            BaseType::Bool => concat_members::<bool>(items),
            BaseType::Int => concat_members::<i32>(items),
            BaseType::Float => concat_members::<f64>(items),
            BaseType::Text => concat_members::<String>(items),
            BaseType::GeomPoint => concat_members::<GeomPoint>(items),
            BaseType::GeomPoint3D => concat_members::<GeomPoint3d>(items),
            BaseType::GeogPoint => concat_members::<GeogPoint>(items),
        }
    }
}

impl fmt::Display for AnyTemporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal(&Config::default()))
    }
}
