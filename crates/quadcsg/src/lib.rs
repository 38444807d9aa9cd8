#![warn(missing_docs)]

//! Constructive solid geometry over quadric surfaces.
//!
//! A cell is a boolean rule over signed surface numbers; [`Object`] binds
//! that rule to the surfaces it names and answers point containment and
//! ray-track queries. [`Model`] holds a shared surface registry and the
//! numbered cells built from it.
//!
//! # Example
//!
//! ```
//! use quadcsg::{Object, Point3, Track, Vec3};
//!
//! let obj = Object::from_text(1, "10 -11", &["10 so 4", "11 cz 1"]).unwrap();
//! assert!(obj.is_valid(&Point3::new(2.0, 0.0, 0.0)));
//!
//! let mut track = Track::new(Point3::new(-10.0, 0.0, 0.0), Vec3::x()).unwrap();
//! assert_eq!(obj.intercept_surface(&mut track), 4);
//! ```

pub use quadcsg_logic;
pub use quadcsg_math;
pub use quadcsg_rules;
pub use quadcsg_surface;
pub use quadcsg_track;

pub use quadcsg_math::{Matrix3, Point3, Vec3};
pub use quadcsg_rules::RuleTree;
pub use quadcsg_surface::{Surface, SurfaceStore};
pub use quadcsg_track::{Intercept, Link, Track, TrackDirection};

mod error;
mod model;
mod object;
mod settings;

pub use error::{CsgError, Result};
pub use model::Model;
pub use object::Object;
pub use settings::Settings;
