//! Base-type predicates lifted over time.
//!
//! - [`ever`]: does a predicate against a constant hold at some instant, or
//!   at every instant?
//! - [`sync`]: evaluate a predicate between two temporal values instant by
//!   instant, producing a temporal boolean.
//! - [`position`]: before/after/overlaps style predicates on the time
//!   dimension, answered from bounding periods.

pub mod ever;
pub mod position;
pub mod sync;

pub use ever::{always_cmp, always_eq, always_ne, ever_cmp, ever_eq, ever_ne};
pub use position::{
    adjacent_time, after, after_period, before, before_period, contains_time, intersects_period,
    intersects_periods, intersects_timestamp, intersects_timestamps, overafter, overbefore,
    overlaps_time,
};
pub use sync::{lift, tcomp, tcomp_value, teq, teq_value, tne, tne_value, when_true};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Comparison operators that can be lifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    /// Whether `a op b` holds given `a.cmp(b)`.
    pub fn holds(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
        }
    }

    /// The operator that holds exactly when `self` does not.
    pub fn negate(self) -> Self {
        match self {
            CmpOp::Eq => CmpOp::Ne,
            CmpOp::Ne => CmpOp::Eq,
            CmpOp::Lt => CmpOp::Ge,
            CmpOp::Le => CmpOp::Gt,
            CmpOp::Gt => CmpOp::Le,
            CmpOp::Ge => CmpOp::Lt,
        }
    }

    /// The operator with its operands swapped: `a op b` iff `b op.flip() a`.
    pub fn flip(self) -> Self {
        match self {
            CmpOp::Lt => CmpOp::Gt,
            CmpOp::Le => CmpOp::Ge,
            CmpOp::Gt => CmpOp::Lt,
            CmpOp::Ge => CmpOp::Le,
            other => other,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "<>",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        };
        f.write_str(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CmpOp; 6] = [CmpOp::Eq, CmpOp::Ne, CmpOp::Lt, CmpOp::Le, CmpOp::Gt, CmpOp::Ge];
    const ORDS: [Ordering; 3] = [Ordering::Less, Ordering::Equal, Ordering::Greater];

    #[test]
    fn test_negate_is_complement() {
        for op in ALL {
            for ord in ORDS {
                assert_ne!(op.holds(ord), op.negate().holds(ord), "{} {:?}", op, ord);
            }
        }
    }

    #[test]
    fn test_flip_swaps_operands() {
        for op in ALL {
            for ord in ORDS {
                assert_eq!(op.holds(ord), op.flip().holds(ord.reverse()));
            }
        }
    }
}
