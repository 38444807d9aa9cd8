//! A directed track through solids: boundary intercepts and the links
//! (inside segments) they pair into.

use std::collections::BTreeMap;

use quadcsg_math::{Dir3, Point3, Tolerance, Vec3};
use tracing::debug;

use crate::error::Result;
use crate::line::unit_direction;

/// Whether the track enters or leaves a solid at an intercept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackDirection {
    /// Crossing from outside to inside.
    Entering,
    /// Crossing from inside to outside.
    Leaving,
}

/// A boundary crossing of the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intercept {
    /// Entering or leaving.
    pub direction: TrackDirection,
    /// Crossing point.
    pub point: Point3,
    /// Distance from the track start.
    pub distance: f64,
    /// Cell that was crossed.
    pub object_id: i32,
}

/// A segment of the track inside one solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Where the track enters.
    pub entry: Point3,
    /// Where the track leaves.
    pub exit: Point3,
    /// Distance from the track start to `exit`.
    pub dist_from_start: f64,
    /// Length of the segment.
    pub dist_inside: f64,
    /// Cell the segment lies in.
    pub object_id: i32,
}

/// A half-line with its sorted intercepts and links.
#[derive(Debug, Clone)]
pub struct Track {
    start: Point3,
    direction: Dir3,
    intercepts: Vec<Intercept>,
    links: Vec<Link>,
}

impl Track {
    /// Track from `start` along `direction` (normalized here).
    pub fn new(start: Point3, direction: Vec3) -> Result<Self> {
        let direction = unit_direction(&start, &direction)?;
        Ok(Self {
            start,
            direction,
            intercepts: Vec::new(),
            links: Vec::new(),
        })
    }

    /// Start point.
    pub fn start(&self) -> &Point3 {
        &self.start
    }

    /// Unit direction.
    pub fn direction(&self) -> &Dir3 {
        &self.direction
    }

    /// Move the track and drop all results.
    pub fn reset(&mut self, start: Point3, direction: Vec3) -> Result<()> {
        self.direction = unit_direction(&start, &direction)?;
        self.start = start;
        self.clear_intersection_results();
        Ok(())
    }

    /// Drop intercepts and links.
    pub fn clear_intersection_results(&mut self) {
        self.intercepts.clear();
        self.links.clear();
    }

    /// Distance of `p` along the track from its start.
    pub fn distance_to(&self, p: &Point3) -> f64 {
        (p - self.start).dot(&self.direction)
    }

    /// Record a crossing, keeping intercepts ordered by distance. At equal
    /// distances leaving intercepts precede entering ones.
    pub fn add_point(&mut self, direction: TrackDirection, point: Point3, object_id: i32) {
        let distance = self.distance_to(&point);
        let rank = |d: TrackDirection| matches!(d, TrackDirection::Entering) as u8;
        let at = self.intercepts.partition_point(|i| {
            i.distance < distance || (i.distance == distance && rank(i.direction) <= rank(direction))
        });
        self.intercepts.insert(
            at,
            Intercept {
                direction,
                point,
                distance,
                object_id,
            },
        );
    }

    /// Record an inside segment directly, keeping links ordered.
    pub fn add_link(&mut self, entry: Point3, exit: Point3, object_id: i32) {
        let dist_from_start = self.distance_to(&exit);
        let link = Link {
            entry,
            exit,
            dist_from_start,
            dist_inside: (exit - entry).norm(),
            object_id,
        };
        let at = self
            .links
            .partition_point(|l| l.dist_from_start <= dist_from_start);
        self.links.insert(at, link);
    }

    /// Pair intercepts into links.
    ///
    /// Each cell's entering intercept pairs with its next leaving one. A
    /// leaving intercept with no open entry means the track started inside,
    /// so the link begins at the start point. An entry never left is
    /// dropped. Links of the same cell that touch end to start are merged.
    /// Links recorded earlier are rebuilt from the intercepts.
    pub fn build_links(&mut self) -> usize {
        self.links.clear();
        let mut open: BTreeMap<i32, Point3> = BTreeMap::new();
        let mut pairs = Vec::new();
        for ic in &self.intercepts {
            match ic.direction {
                TrackDirection::Entering => {
                    open.entry(ic.object_id).or_insert(ic.point);
                }
                TrackDirection::Leaving => {
                    let entry = open.remove(&ic.object_id).unwrap_or(self.start);
                    pairs.push((entry, ic.point, ic.object_id));
                }
            }
        }
        for (entry, exit, id) in pairs {
            self.add_link(entry, exit, id);
        }
        self.remove_cojoins();
        debug!(
            intercepts = self.intercepts.len(),
            links = self.links.len(),
            "built links"
        );
        self.links.len()
    }

    /// Merge consecutive links of one cell where the first exit is the
    /// second entry.
    fn remove_cojoins(&mut self) {
        let tol = Tolerance::DEFAULT;
        let mut merged: Vec<Link> = Vec::with_capacity(self.links.len());
        for link in self.links.drain(..) {
            match merged.last_mut() {
                Some(prev)
                    if prev.object_id == link.object_id
                        && tol.points_equal(&prev.exit, &link.entry) =>
                {
                    prev.exit = link.exit;
                    prev.dist_from_start = link.dist_from_start;
                    prev.dist_inside += link.dist_inside;
                }
                _ => merged.push(link),
            }
        }
        self.links = merged;
    }

    /// Intercepts ordered by distance.
    pub fn intercepts(&self) -> &[Intercept] {
        &self.intercepts
    }

    /// Links ordered by distance of their exit.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Total length of track inside solids.
    pub fn total_length(&self) -> f64 {
        self.links.iter().map(|l| l.dist_inside).sum()
    }
}
