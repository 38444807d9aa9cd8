//! Intersection of a straight line with surfaces.

use quadcsg_math::{Dir3, Point3, Vec3};
use quadcsg_surface::{Shape, Surface};
use tracing::trace;

use crate::error::{Result, TrackError};

/// Default distance below which consecutive crossings are merged.
pub const DEFAULT_MERGE_DISTANCE: f64 = 1e-8;

/// Validate and normalize a direction.
pub(crate) fn unit_direction(origin: &Point3, direction: &Vec3) -> Result<Dir3> {
    if !origin.coords.iter().all(|c| c.is_finite()) {
        return Err(TrackError::NonFinite("origin"));
    }
    if !direction.iter().all(|c| c.is_finite()) {
        return Err(TrackError::NonFinite("direction"));
    }
    Dir3::try_new(*direction, 1e-12).ok_or(TrackError::ZeroDirection)
}

/// Collects the points where a half-line from `origin` meets surfaces.
///
/// Only points at or ahead of the origin are kept. Call
/// [`sort_and_remove_duplicates`](Self::sort_and_remove_duplicates) after
/// visiting to get the ordered crossings.
#[derive(Debug, Clone)]
pub struct LineIntersect {
    origin: Point3,
    direction: Dir3,
    merge_distance: f64,
    points: Vec<Point3>,
    crossings: Vec<(Point3, f64)>,
}

impl LineIntersect {
    /// Line from `origin` along `direction`, which need not be normalized.
    pub fn new(origin: Point3, direction: Vec3) -> Result<Self> {
        let direction = unit_direction(&origin, &direction)?;
        Ok(Self {
            origin,
            direction,
            merge_distance: DEFAULT_MERGE_DISTANCE,
            points: Vec::new(),
            crossings: Vec::new(),
        })
    }

    /// Line along an already normalized direction.
    pub fn from_unit(origin: Point3, direction: Dir3) -> Self {
        Self {
            origin,
            direction,
            merge_distance: DEFAULT_MERGE_DISTANCE,
            points: Vec::new(),
            crossings: Vec::new(),
        }
    }

    /// Use a different merge distance for duplicate removal.
    pub fn with_merge_distance(mut self, merge_distance: f64) -> Self {
        self.merge_distance = merge_distance;
        self
    }

    /// Start of the line.
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Unit direction.
    pub fn direction(&self) -> &Dir3 {
        &self.direction
    }

    /// Point at distance `t` along the line.
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction.as_ref()
    }

    /// Intersect with one surface; returns how many points were added.
    pub fn visit(&mut self, surface: &Surface) -> usize {
        let added = self.visit_shape(surface.shape());
        trace!(surface = surface.name(), added, "line visit");
        added
    }

    /// Intersect with a bare shape.
    pub fn visit_shape(&mut self, shape: &Shape) -> usize {
        let roots = shape
            .as_quadric()
            .intersect_ray(&self.origin, &self.direction.into_inner());
        let before = self.points.len();
        for t in roots.into_iter().filter(|&t| t >= 0.0) {
            self.points.push(self.at(t));
        }
        self.points.len() - before
    }

    /// Raw points in visiting order.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Order the collected points by distance from the origin and drop any
    /// point closer than the merge distance to its predecessor.
    pub fn sort_and_remove_duplicates(&mut self) {
        let mut out: Vec<(Point3, f64)> = self
            .points
            .iter()
            .map(|p| (*p, (p - self.origin).dot(&self.direction)))
            .collect();
        out.sort_by(|a, b| a.1.total_cmp(&b.1));
        out.dedup_by(|next, kept| (next.1 - kept.1).abs() < self.merge_distance);
        self.crossings = out;
    }

    /// Ordered `(point, distance)` pairs from the last sort.
    pub fn crossings(&self) -> &[(Point3, f64)] {
        &self.crossings
    }

    /// Ordered distances from the last sort.
    pub fn distances(&self) -> Vec<f64> {
        self.crossings.iter().map(|c| c.1).collect()
    }

    /// Forget every point collected so far.
    pub fn clear(&mut self) {
        self.points.clear();
        self.crossings.clear();
    }
}
