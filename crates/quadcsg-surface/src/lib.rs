#![warn(missing_docs)]

//! Analytic quadric surfaces for the quadcsg engine.
//!
//! Every surface is a second-degree surface `f(x) = 0` whose inside is
//! `f < 0`. The named types ([`Plane`], [`Sphere`], [`Cylinder`], [`Cone`])
//! keep a compact canonical form and derive their [`QuadricEqn`] from it;
//! [`GeneralQuadric`] holds the coefficients directly.
//!
//! [`Surface`] attaches an integer name to a [`Shape`], and [`SurfaceStore`]
//! is the registry rule leaves refer into by name.

mod cone;
mod cylinder;
mod error;
mod general;
mod parse;
mod plane;
mod quadric;
mod shape;
mod sphere;
mod surface;

pub use cone::Cone;
pub use cylinder::Cylinder;
pub use error::{Result, SurfaceError};
pub use general::GeneralQuadric;
pub use plane::Plane;
pub use quadric::QuadricEqn;
pub use shape::{QuadricSurface, Shape, SurfaceKind};
pub use sphere::Sphere;
pub use surface::{Surface, SurfaceStore};
