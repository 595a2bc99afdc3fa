//! Arithmetic on temporal numbers.
//!
//! Scalar operators map every stored value and keep the timestamps, bounds
//! and interpolation. A linear segment scaled or offset by a constant stays
//! linear, so mapping the stored instants is exact.
use crate::base::{FLOAT_EPSILON, NumericBase};
use crate::error::{Result, TemporalError};
use crate::temporal::{Interpolation, TInstant, TSequence, Temporal, from_sequences};

/// Numbers that support checked arithmetic against a constant.
pub trait TemporalNumber: NumericBase + Copy {
    fn try_add(self, other: Self) -> Result<Self>;

    fn try_sub(self, other: Self) -> Result<Self>;

    fn try_mul(self, other: Self) -> Result<Self>;

    fn try_div(self, other: Self) -> Result<Self>;
}

impl TemporalNumber for i32 {
    fn try_add(self, other: Self) -> Result<Self> {
        i32::checked_add(self, other).ok_or(TemporalError::Overflow("int"))
    }

    fn try_sub(self, other: Self) -> Result<Self> {
        i32::checked_sub(self, other).ok_or(TemporalError::Overflow("int"))
    }

    fn try_mul(self, other: Self) -> Result<Self> {
        i32::checked_mul(self, other).ok_or(TemporalError::Overflow("int"))
    }

    fn try_div(self, other: Self) -> Result<Self> {
        if other == 0 {
            return Err(TemporalError::DivisionByZero);
        }
        i32::checked_div(self, other).ok_or(TemporalError::Overflow("int"))
    }
}

fn finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TemporalError::Overflow("float"))
    }
}

impl TemporalNumber for f64 {
    fn try_add(self, other: Self) -> Result<Self> {
        finite(self + other)
    }

    fn try_sub(self, other: Self) -> Result<Self> {
        finite(self - other)
    }

    fn try_mul(self, other: Self) -> Result<Self> {
        finite(self * other)
    }

    fn try_div(self, other: Self) -> Result<Self> {
        if other.abs() < FLOAT_EPSILON {
            return Err(TemporalError::DivisionByZero);
        }
        finite(self / other)
    }
}

/// # Examples
///
/// ```
/// use tempora::math::add_scalar;
/// use tempora::temporal::Temporal;
///
/// let temp: Temporal<i32> = "[1@2001-01-01, 2@2001-01-02]".parse().unwrap();
/// let shifted = add_scalar(&temp, 10).unwrap();
/// assert_eq!(shifted.to_string(), "[11@2001-01-01 00:00:00+00, 12@2001-01-02 00:00:00+00]");
/// ```
pub fn add_scalar<V: TemporalNumber>(temp: &Temporal<V>, value: V) -> Result<Temporal<V>> {
    temp.try_map_values(|v| v.try_add(value))
}

pub fn sub_scalar<V: TemporalNumber>(temp: &Temporal<V>, value: V) -> Result<Temporal<V>> {
    temp.try_map_values(|v| v.try_sub(value))
}

pub fn mul_scalar<V: TemporalNumber>(temp: &Temporal<V>, value: V) -> Result<Temporal<V>> {
    temp.try_map_values(|v| v.try_mul(value))
}

/// Fails with `DivisionByZero` before touching any value when the divisor
/// is (nearly) zero.
pub fn div_scalar<V: TemporalNumber>(temp: &Temporal<V>, value: V) -> Result<Temporal<V>> {
    if value.to_f64().abs() < FLOAT_EPSILON {
        return Err(TemporalError::DivisionByZero);
    }
    temp.try_map_values(|v| v.try_div(value))
}

/// Radians to degrees at every instant.
pub fn degrees(temp: &Temporal<f64>) -> Result<Temporal<f64>> {
    temp.try_map_values(|v| finite(v.to_degrees()))
}

fn sequence_derivative(seq: &TSequence<f64>) -> Result<TSequence<f64>> {
    let insts = seq.instants();
    let mut slopes = Vec::with_capacity(insts.len());
    for pair in insts.windows(2) {
        let seconds = pair[1].timestamp().seconds_since(pair[0].timestamp());
        let slope = finite((pair[1].value() - pair[0].value()) / seconds)?;
        slopes.push(TInstant::new_unchecked(pair[0].timestamp(), slope));
    }
    let last = slopes.last().map(|i| *i.value()).unwrap_or_default();
    slopes.push(TInstant::new_unchecked(seq.end_instant().timestamp(), last));
    Ok(TSequence::make(slopes, seq.lower_inc(), seq.upper_inc(), Interpolation::Stepwise))
}

/// Rate of change per second of a linear temporal float, as a stepwise
/// value holding each segment's slope. The final instant repeats the last
/// slope. Discrete values have no derivative and yield `None`.
///
/// # Examples
///
/// ```
/// use tempora::math::derivative;
/// use tempora::temporal::Temporal;
///
/// let temp: Temporal<f64> = "[0@2001-01-01 00:00:00, 10@2001-01-01 00:00:10]".parse().unwrap();
/// let rate = derivative(&temp).unwrap().unwrap();
/// assert_eq!(rate.to_string(), "Interp=Stepwise;[1@2001-01-01 00:00:00+00, 1@2001-01-01 00:00:10+00]");
/// ```
pub fn derivative(temp: &Temporal<f64>) -> Result<Option<Temporal<f64>>> {
    let sequences: Vec<&TSequence<f64>> = match temp {
        Temporal::Instant(_) | Temporal::InstantSet(_) => return Ok(None),
        Temporal::Sequence(seq) => vec![seq],
        Temporal::SequenceSet(set) => set.sequences().iter().collect(),
    };
    if temp.interpolation() == Some(Interpolation::Stepwise) {
        return Err(TemporalError::InterpolationMismatch(
            "derivative requires linear interpolation".to_string(),
        ));
    }
    let pieces = sequences
        .into_iter()
        .filter(|seq| seq.num_instants() > 1)
        .map(sequence_derivative)
        .collect::<Result<Vec<_>>>()?;
    Ok(from_sequences(pieces, matches!(temp, Temporal::SequenceSet(_))))
}
