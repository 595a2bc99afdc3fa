use crate::base::{BaseValue, NumericBase, OrderedBase};
use crate::bbox::ValueRange;
use crate::config::Config;
use crate::error::{Result, TemporalError};
use crate::hash;
use std::cmp::Ordering;

/// Relative tolerance for float comparisons made on computed values.
pub const FLOAT_EPSILON: f64 = 1.0e-9;

pub(crate) fn float_approx_eq(a: f64, b: f64) -> bool {
    let scale = 1.0f64.max(a.abs()).max(b.abs());
    (a - b).abs() <= FLOAT_EPSILON * scale
}

pub(crate) fn write_float(out: &mut String, value: f64, config: &Config) {
    match config.float_digits {
        Some(digits) => {
            let text = format!("{:.*}", digits, value);
            let text = if text.contains('.') {
                text.trim_end_matches('0').trim_end_matches('.')
            } else {
                text.as_str()
            };
            // "-0" after rounding a tiny negative value
            if text == "-0" {
                out.push('0');
            } else {
                out.push_str(text);
            }
        }
        None => out.push_str(&value.to_string()),
    }
}

impl BaseValue for bool {
    type Extent = ();
    const TYPE_NAME: &'static str = "bool";
    const CONTINUOUS: bool = false;

    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn extent(&self) -> Self::Extent {}

    fn extent_contains(_extent: &Self::Extent, _value: &Self) -> bool {
        true
    }

    fn hash32(&self) -> u32 {
        hash::hash_bool(*self)
    }

    fn hash64(&self, seed: u64) -> u64 {
        hash::hash_int_extended(*self as i64, seed)
    }

    fn from_literal(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "t" | "true" => Some(true),
            "f" | "false" => Some(false),
            _ => None,
        }
    }

    fn write_literal(&self, out: &mut String, _config: &Config) {
        out.push(if *self { 't' } else { 'f' });
    }
}

impl OrderedBase for bool {
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl BaseValue for i32 {
    type Extent = ValueRange;
    const TYPE_NAME: &'static str = "int";
    const CONTINUOUS: bool = false;

    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn extent(&self) -> Self::Extent {
        ValueRange::point(*self as f64)
    }

    fn extent_contains(extent: &Self::Extent, value: &Self) -> bool {
        extent.contains(*value as f64)
    }

    fn distance(&self, other: &Self) -> Option<f64> {
        Some((*self as f64 - *other as f64).abs())
    }

    fn hash32(&self) -> u32 {
        hash::hash_int(*self as i64)
    }

    fn hash64(&self, seed: u64) -> u64 {
        hash::hash_int_extended(*self as i64, seed)
    }

    fn from_literal(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn write_literal(&self, out: &mut String, _config: &Config) {
        out.push_str(&self.to_string());
    }
}

impl OrderedBase for i32 {
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl NumericBase for i32 {
    fn to_f64(&self) -> f64 {
        *self as f64
    }
}

impl BaseValue for f64 {
    type Extent = ValueRange;
    const TYPE_NAME: &'static str = "float";
    const CONTINUOUS: bool = true;

    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn approx_equals(&self, other: &Self) -> bool {
        float_approx_eq(*self, *other)
    }

    fn validate(&self) -> Result<()> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(TemporalError::InvalidBaseValue(format!(
                "float values must be finite, got: {}",
                self
            )))
        }
    }

    fn extent(&self) -> Self::Extent {
        ValueRange::point(*self)
    }

    fn extent_contains(extent: &Self::Extent, value: &Self) -> bool {
        extent.contains(*value)
    }

    fn interpolate(&self, end: &Self, ratio: f64) -> Option<Self> {
        if ratio <= 0.0 {
            return Some(*self);
        }
        if ratio >= 1.0 {
            return Some(*end);
        }
        Some(self + (end - self) * ratio)
    }

    fn locate(&self, end: &Self, value: &Self) -> Option<f64> {
        if self == end {
            return None;
        }
        if value == self {
            return Some(0.0);
        }
        if value == end {
            return Some(1.0);
        }
        let ratio = (value - self) / (end - self);
        (0.0..=1.0).contains(&ratio).then_some(ratio)
    }

    fn crossing(start1: &Self, end1: &Self, start2: &Self, end2: &Self) -> Option<f64> {
        let d0 = start1 - start2;
        let d1 = end1 - end2;
        if d0 == d1 || d0 == 0.0 || d1 == 0.0 || (d0 > 0.0) == (d1 > 0.0) {
            return None;
        }
        let ratio = d0 / (d0 - d1);
        (ratio > 0.0 && ratio < 1.0).then_some(ratio)
    }

    fn distance(&self, other: &Self) -> Option<f64> {
        Some((self - other).abs())
    }

    fn hash32(&self) -> u32 {
        hash::hash_float(*self)
    }

    fn hash64(&self, seed: u64) -> u64 {
        hash::hash_float_extended(*self, seed)
    }

    fn from_literal(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn write_literal(&self, out: &mut String, config: &Config) {
        write_float(out, *self, config);
    }
}

impl OrderedBase for f64 {
    fn compare(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

impl NumericBase for f64 {
    fn to_f64(&self) -> f64 {
        *self
    }
}

impl BaseValue for String {
    type Extent = ();
    const TYPE_NAME: &'static str = "text";
    const CONTINUOUS: bool = false;

    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn extent(&self) -> Self::Extent {}

    fn extent_contains(_extent: &Self::Extent, _value: &Self) -> bool {
        true
    }

    fn hash32(&self) -> u32 {
        hash::hash_text(self)
    }

    fn hash64(&self, seed: u64) -> u64 {
        hash::hash_text_extended(self, seed)
    }

    /// Quoted tokens may escape `"` and `\` with a backslash; bare tokens are
    /// taken verbatim after trimming.
    fn from_literal(text: &str) -> Option<Self> {
        let text = text.trim();
        let Some(inner) = text.strip_prefix('"') else {
            return (!text.is_empty()).then(|| text.to_string());
        };
        let inner = inner.strip_suffix('"')?;
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => out.push(chars.next()?),
                '"' => return None,
                _ => out.push(c),
            }
        }
        Some(out)
    }

    fn write_literal(&self, out: &mut String, _config: &Config) {
        out.push('"');
        for c in self.chars() {
            if c == '"' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('"');
    }
}

impl OrderedBase for String {
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}
