#![warn(missing_docs)]

//! Straight-line probes through quadcsg solids.
//!
//! [`LineIntersect`] gathers the ordered points where a half-line meets a
//! set of surfaces. [`Track`] records where a half-line enters and leaves
//! solids and pairs those intercepts into [`Link`]s, the segments inside.

mod error;
mod line;
mod track;

pub use error::{Result, TrackError};
pub use line::{LineIntersect, DEFAULT_MERGE_DISTANCE};
pub use track::{Intercept, Link, Track, TrackDirection};
