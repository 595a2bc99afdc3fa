//! Temporal values: base values tracked over time as instants, instant sets,
//! sequences and sequence sets, kept in a canonical normal form with cached
//! bounding boxes and lifted operators.
//!
//! ```rust
//! use tempora::lifting::{ever_eq, teq_value};
//! use tempora::{Config, Temporal};
//!
//! let speed: Temporal<f64> = Temporal::parse(
//!     "[10@2001-01-01 08:00:00, 30@2001-01-01 08:10:00, 30@2001-01-01 08:20:00]",
//!     &Config::default(),
//! )?;
//! assert!(ever_eq(&speed, &20.0));
//!
//! let at_thirty = teq_value(&speed, &30.0)?;
//! assert_eq!(
//!     at_thirty.to_string(),
//!     "[f@2001-01-01 08:00:00+00, t@2001-01-01 08:10:00+00, t@2001-01-01 08:20:00+00]"
//! );
//! # Ok::<(), tempora::TemporalError>(())
//! ```

pub mod base;
pub mod bbox;
pub mod config;
pub mod dynamic;
pub mod error;
pub mod hash;
pub mod index;
pub mod lifting;
pub mod math;
pub mod similarity;
pub mod temporal;
pub mod time;

pub use error::{InputKind, Result, TemporalError};

pub use config::{Config, DateOrder, DateStyle};

pub use base::{BaseValue, GeogPoint, GeomPoint, GeomPoint3d, NumericBase, OrderedBase};

pub use bbox::{STBox, STBox3D, TBox, TemporalBox, TimeBox, ValueExtent, ValueRange};

pub use temporal::{Interpolation, TInstant, TInstantSet, TSequence, TSequenceSet, Temporal};

pub use time::{Interval, Period, TimePoint};

pub use dynamic::{AnyTemporal, BaseType};

pub use index::TemporalIndex;

pub use tempora_types::bbox::{BoundingBox2D, BoundingBox3D};
pub use tempora_types::point::Point3d;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Config, Result, TemporalError};

    pub use crate::{Interval, Period, TimePoint};

    pub use crate::{Interpolation, TInstant, TSequence, Temporal};

    pub use crate::{BaseValue, GeomPoint, OrderedBase};

    pub use crate::lifting::{CmpOp, always_eq, ever_eq, tcomp, teq, tne};

    pub use crate::{AnyTemporal, BaseType};
}
