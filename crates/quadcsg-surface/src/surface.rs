//! Named surfaces and the registry that owns them.

use std::collections::BTreeMap;
use std::ops::Index;

use quadcsg_math::{is_rotation, Dir3, Matrix3, Point3, Tolerance, Vec3};
use tracing::{debug, instrument};

use crate::error::{Result, SurfaceError};
use crate::{QuadricEqn, Shape, SurfaceKind};

/// Maximum orthonormality residual accepted by [`Surface::rotate`].
const ROTATION_TOL: f64 = 1e-9;

/// A surface with its integer name and cached coefficient form.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    name: i32,
    shape: Shape,
    eqn: QuadricEqn,
}

impl Surface {
    /// Wrap a shape under `name`.
    pub fn new(name: i32, shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        let eqn = shape.equation();
        Self { name, shape, eqn }
    }

    /// Parse a definition such as `"so 5"` and name it.
    pub fn parse(name: i32, text: &str) -> Result<Self> {
        Ok(Self::new(name, text.parse::<Shape>()?))
    }

    /// The surface name.
    pub fn name(&self) -> i32 {
        self.name
    }

    /// Rename the surface.
    pub fn set_name(&mut self, name: i32) {
        self.name = name;
    }

    /// The canonical geometry.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The kind of the underlying shape.
    pub fn kind(&self) -> SurfaceKind {
        self.shape.kind()
    }

    /// Cached coefficient form.
    pub fn equation(&self) -> &QuadricEqn {
        &self.eqn
    }

    /// `+1` inside, `-1` outside, `0` within the linear tolerance of the surface.
    pub fn side(&self, p: &Point3) -> i8 {
        -Tolerance::DEFAULT.sign(self.shape.as_quadric().signed_distance(p))
    }

    /// True if `p` lies on the surface within tolerance.
    pub fn on_surface(&self, p: &Point3) -> bool {
        self.side(p) == 0
    }

    /// Minimum distance from `p` to the surface.
    pub fn distance(&self, p: &Point3) -> f64 {
        self.shape.as_quadric().distance(p)
    }

    /// Outward unit normal at `p`, or `None` where the gradient vanishes.
    pub fn surface_normal(&self, p: &Point3) -> Option<Dir3> {
        Dir3::try_new(self.eqn.gradient(p), 1e-12)
    }

    /// Ray parameters where `origin + t·direction` meets the surface, ascending.
    pub fn intersect_ray(&self, origin: &Point3, direction: &Vec3) -> Vec<f64> {
        self.shape.as_quadric().intersect_ray(origin, direction)
    }

    /// Translate by `v`.
    pub fn displace(&mut self, v: &Vec3) {
        self.shape.displace(v);
        self.eqn = self.shape.equation();
    }

    /// Rotate about the origin by the proper rotation `m`.
    pub fn rotate(&mut self, m: &Matrix3) -> Result<()> {
        if !is_rotation(m, ROTATION_TOL) {
            return Err(SurfaceError::NotRotation);
        }
        self.shape.rotate(m);
        self.eqn = self.shape.equation();
        Ok(())
    }

    /// The surface card: `"<name> <keyword> <params>"`.
    pub fn write(&self) -> String {
        format!("{} {}", self.name, self.shape)
    }
}

/// Registry of surfaces keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceStore {
    surfaces: BTreeMap<i32, Surface>,
}

impl SurfaceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface; names must be positive and unique.
    pub fn insert(&mut self, surface: Surface) -> Result<()> {
        let name = surface.name();
        if name <= 0 {
            return Err(SurfaceError::InvalidName(name));
        }
        if self.surfaces.contains_key(&name) {
            return Err(SurfaceError::Duplicate(name));
        }
        self.surfaces.insert(name, surface);
        Ok(())
    }

    /// Parse and add a surface card such as `"10 so 5"`.
    #[instrument(skip(self))]
    pub fn insert_card(&mut self, card: &str) -> Result<i32> {
        let card = card.trim();
        let (head, rest) = card
            .split_once(char::is_whitespace)
            .ok_or_else(|| SurfaceError::parse(card, "expected `<name> <keyword> <params>`"))?;
        let name: i32 = head
            .parse()
            .map_err(|_| SurfaceError::parse(card, format!("`{head}` is not a surface name")))?;
        let surface = Surface::parse(name, rest)?;
        debug!(name, kind = ?surface.kind(), "parsed surface");
        self.insert(surface)?;
        Ok(name)
    }

    /// Insert or overwrite the surface under its name, returning the old one.
    pub fn replace(&mut self, surface: Surface) -> Result<Option<Surface>> {
        let name = surface.name();
        if name <= 0 {
            return Err(SurfaceError::InvalidName(name));
        }
        Ok(self.surfaces.insert(name, surface))
    }

    /// Look up a surface by name.
    pub fn get(&self, name: i32) -> Option<&Surface> {
        self.surfaces.get(&name)
    }

    /// True if a surface with this name is registered.
    pub fn contains(&self, name: i32) -> bool {
        self.surfaces.contains_key(&name)
    }

    /// Remove and return a surface.
    pub fn remove(&mut self, name: i32) -> Option<Surface> {
        self.surfaces.remove(&name)
    }

    /// Number of surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// True if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Surfaces in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.values()
    }

    /// Names in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.surfaces.keys().copied()
    }

    /// Translate every surface.
    pub fn displace_all(&mut self, v: &Vec3) {
        for s in self.surfaces.values_mut() {
            s.displace(v);
        }
    }

    /// Rotate every surface; nothing changes if `m` is not a rotation.
    pub fn rotate_all(&mut self, m: &Matrix3) -> Result<()> {
        if !is_rotation(m, ROTATION_TOL) {
            return Err(SurfaceError::NotRotation);
        }
        for s in self.surfaces.values_mut() {
            s.rotate(m)?;
        }
        Ok(())
    }
}

impl Index<i32> for SurfaceStore {
    type Output = Surface;

    fn index(&self, name: i32) -> &Surface {
        self.surfaces
            .get(&name)
            .unwrap_or_else(|| panic!("surface {name} is not registered"))
    }
}

impl<'a> IntoIterator for &'a SurfaceStore {
    type Item = &'a Surface;
    type IntoIter = std::collections::btree_map::Values<'a, i32, Surface>;

    fn into_iter(self) -> Self::IntoIter {
        self.surfaces.values()
    }
}
