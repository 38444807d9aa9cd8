//! A solid: a rule tree over a registry of surfaces.

use std::collections::{BTreeMap, BTreeSet};

use quadcsg_math::{Matrix3, Point3, Vec3};
use quadcsg_rules::{Resolver, RuleTree};
use quadcsg_surface::{Surface, SurfaceError, SurfaceStore};
use quadcsg_track::{Intercept, LineIntersect, Track, TrackDirection};
use tracing::{debug, instrument};

use crate::error::{CsgError, Result};
use crate::settings::Settings;

/// A cell of constructive solid geometry.
///
/// The rule decides membership from the side of each surface a point lies
/// on. Cells named through `#N` are carried along with their rules so the
/// object can be evaluated on its own.
#[derive(Debug, Clone)]
pub struct Object {
    name: i32,
    rule: RuleTree,
    surfaces: SurfaceStore,
    cells: BTreeMap<i32, RuleTree>,
    settings: Settings,
}

/// Resolves rule leaves against one point.
struct PointProbe<'a> {
    object: &'a Object,
    point: Point3,
}

impl Resolver for PointProbe<'_> {
    fn side(&self, id: i32) -> i8 {
        self.object.surfaces[id].side(&self.point)
    }

    fn object(&self, id: i32) -> bool {
        let rule = self
            .object
            .cells
            .get(&id)
            .unwrap_or_else(|| panic!("cell #{id} is not resolved"));
        !rule.is_valid_with(self)
    }
}

impl Object {
    /// Bind a rule without `#N` references to its surfaces.
    pub fn new(name: i32, rule: RuleTree, surfaces: SurfaceStore) -> Result<Self> {
        Self::with_cells(name, rule, surfaces, BTreeMap::new())
    }

    /// Bind a rule to its surfaces and to the rules of every cell it
    /// references, directly or through other cells.
    #[instrument(skip_all, fields(cell = name, rule = %rule))]
    pub fn with_cells(
        name: i32,
        rule: RuleTree,
        surfaces: SurfaceStore,
        cells: BTreeMap<i32, RuleTree>,
    ) -> Result<Self> {
        if name <= 0 {
            return Err(CsgError::InvalidCell(name));
        }
        let object = Self {
            name,
            rule,
            surfaces,
            cells,
            settings: Settings::default(),
        };
        object.check_references()?;
        debug!(
            surfaces = object.surfaces.len(),
            cells = object.cells.len(),
            "built object"
        );
        Ok(object)
    }

    /// Parse a rule and surface cards into an object.
    pub fn from_text(name: i32, rule: &str, cards: &[&str]) -> Result<Self> {
        let mut surfaces = SurfaceStore::new();
        for card in cards {
            surfaces.insert_card(card)?;
        }
        Self::new(name, RuleTree::parse(rule)?, surfaces)
    }

    /// Replace the settings.
    pub fn with_settings(mut self, settings: Settings) -> Result<Self> {
        settings.validate()?;
        self.settings = settings;
        Ok(self)
    }

    fn check_references(&self) -> Result<()> {
        let rules = std::iter::once((self.name, &self.rule))
            .chain(self.cells.iter().map(|(&id, r)| (id, r)));
        for (cell, rule) in rules {
            if let Some(surface) = rule
                .surface_ids()
                .into_iter()
                .find(|&s| !self.surfaces.contains(s))
            {
                return Err(CsgError::MissingSurface { cell, surface });
            }
            if let Some(target) = rule
                .object_ids()
                .into_iter()
                .find(|t| *t != self.name && !self.cells.contains_key(t))
            {
                return Err(CsgError::MissingCell { cell, target });
            }
        }

        let mut path = vec![self.name];
        let mut done = BTreeSet::new();
        for id in self.rule.object_ids() {
            self.visit_cell(id, &mut path, &mut done)?;
        }
        Ok(())
    }

    fn visit_cell(&self, id: i32, path: &mut Vec<i32>, done: &mut BTreeSet<i32>) -> Result<()> {
        if path.contains(&id) {
            return Err(CsgError::CellCycle(id));
        }
        if done.contains(&id) {
            return Ok(());
        }
        path.push(id);
        for next in self.cells[&id].object_ids() {
            self.visit_cell(next, path, done)?;
        }
        path.pop();
        done.insert(id);
        Ok(())
    }

    /// Cell number.
    pub fn name(&self) -> i32 {
        self.name
    }

    /// The rule tree.
    pub fn rule(&self) -> &RuleTree {
        &self.rule
    }

    /// Surfaces the object owns.
    pub fn surfaces(&self) -> &SurfaceStore {
        &self.surfaces
    }

    /// Rules of the cells referenced through `#N`.
    pub fn cells(&self) -> &BTreeMap<i32, RuleTree> {
        &self.cells
    }

    /// Numerical settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Surface numbers used by the rule or any referenced cell.
    pub fn referenced_surfaces(&self) -> BTreeSet<i32> {
        let mut ids = self.rule.surface_ids();
        for rule in self.cells.values() {
            ids.extend(rule.surface_ids());
        }
        ids
    }

    /// True if `p` is inside or on the boundary.
    pub fn is_valid(&self, p: &Point3) -> bool {
        self.rule.is_valid_with(&PointProbe {
            object: self,
            point: *p,
        })
    }

    /// True if `p` lies on the boundary of the solid.
    ///
    /// For every surface through `p` the two points a probe step along its
    /// normal are classified; the point is on the boundary when they differ.
    /// Edges where no single normal separates inside from outside are tried
    /// along the sum of each pair of normals.
    pub fn is_on_side(&self, p: &Point3) -> bool {
        let normals: Vec<Vec3> = self
            .referenced_surfaces()
            .into_iter()
            .map(|id| &self.surfaces[id])
            .filter(|s| s.on_surface(p))
            .filter_map(|s| s.surface_normal(p))
            .map(|n| n.into_inner())
            .collect();
        if normals.is_empty() {
            return false;
        }

        let step = self.settings.probe_step;
        let separates = |n: &Vec3| self.is_valid(&(p + step * *n)) != self.is_valid(&(p - step * *n));
        if normals.iter().any(|n| separates(n)) {
            return true;
        }
        for (i, a) in normals.iter().enumerate() {
            for b in &normals[i + 1..] {
                let sum = a + b;
                let len = sum.norm();
                if len > 1e-12 && separates(&(sum / len)) {
                    return true;
                }
            }
        }
        false
    }

    /// Add this object's boundary crossings to `track` and rebuild its
    /// links. Returns the number of intercepts added.
    ///
    /// Candidates are every forward intersection with a referenced surface.
    /// The stretch between consecutive candidates is classified at its
    /// midpoint and an intercept is recorded wherever the classification
    /// changes.
    pub fn intercept_surface(&self, track: &mut Track) -> usize {
        let mut line = LineIntersect::from_unit(*track.start(), *track.direction())
            .with_merge_distance(self.settings.merge_distance);
        for id in self.referenced_surfaces() {
            line.visit(&self.surfaces[id]);
        }
        line.sort_and_remove_duplicates();

        // a crossing at the start itself is not a transition along the track
        let candidates: Vec<(Point3, f64)> = line
            .crossings()
            .iter()
            .copied()
            .filter(|&(_, t)| t > self.settings.merge_distance)
            .collect();
        let Some(&(_, first)) = candidates.first() else {
            return 0;
        };

        let mut inside = self.is_valid(&line.at(0.5 * first));
        let mut added = 0;
        for (k, &(point, t)) in candidates.iter().enumerate() {
            let probe = match candidates.get(k + 1) {
                Some(&(_, next)) => 0.5 * (t + next),
                None => t + 1.0,
            };
            let after = self.is_valid(&line.at(probe));
            if after != inside {
                let direction = if after {
                    TrackDirection::Entering
                } else {
                    TrackDirection::Leaving
                };
                track.add_point(direction, point, self.name);
                added += 1;
                inside = after;
            }
        }
        let links = track.build_links();
        debug!(
            object = self.name,
            candidates = candidates.len(),
            added,
            links,
            "intercepted track"
        );
        added
    }

    /// This object's crossings along `track`, leaving `track` untouched.
    pub fn crossings(&self, track: &Track) -> Vec<Intercept> {
        let mut probe = track.clone();
        probe.clear_intersection_results();
        self.intercept_surface(&mut probe);
        probe.intercepts().to_vec()
    }

    /// Distance along `track` to the first boundary crossing.
    pub fn distance(&self, track: &Track) -> Option<f64> {
        self.crossings(track).first().map(|i| i.distance)
    }

    /// Rewrite surface `|old|` to `|new|` in the rule and register
    /// `surface` under `|new|`. A negative `new` flips the rewritten leaves.
    ///
    /// Returns the number of leaves rewritten; with none, nothing is
    /// registered. The old surface is dropped once no rule uses it. `|new|`
    /// must be a valid name not already used for another surface; on error
    /// the object is unchanged.
    pub fn substitute_surf(&mut self, old: i32, new: i32, mut surface: Surface) -> Result<usize> {
        let new_id = new
            .checked_abs()
            .filter(|&n| n > 0)
            .ok_or(SurfaceError::InvalidName(new))?;
        let Some(old_id) = old.checked_abs() else {
            return Ok(0);
        };
        if !self.rule.surface_ids().contains(&old_id) {
            return Ok(0);
        }
        if new_id != old_id && self.referenced_surfaces().contains(&new_id) {
            return Err(SurfaceError::Duplicate(new_id).into());
        }

        let count = self.rule.substitute_surf(old_id, new);
        surface.set_name(new_id);
        self.surfaces.replace(surface)?;
        if !self.referenced_surfaces().contains(&old_id) {
            self.surfaces.remove(old_id);
        }
        debug!(old, new, count, rule = %self.rule, "substituted surface");
        Ok(count)
    }

    /// Remove every leaf of surface `id` from the rule. Returns the number
    /// of leaves removed.
    pub fn remove_surface(&mut self, id: i32) -> usize {
        let id = id.abs();
        let count = self.rule.remove_item(id);
        if !self.referenced_surfaces().contains(&id) {
            self.surfaces.remove(id);
        }
        count
    }

    /// Drop duplicate and complementary operands from the rule.
    pub fn remove_complementary(&mut self) -> usize {
        self.rule.remove_complementary()
    }

    /// Remove complementary operands, then replace the rule by its
    /// smallest two-level form when it has no `#N` and few enough surfaces.
    /// Returns true if the rule changed.
    #[instrument(skip(self), fields(cell = self.name))]
    pub fn simplify(&mut self) -> Result<bool> {
        let before = self.rule.clone();
        self.rule.remove_complementary();
        let limit = self.settings.max_minimize_surfaces;
        if self.rule.object_ids().is_empty() && self.rule.surface_ids().len() <= limit {
            self.rule.minimize(limit)?;
        }
        debug!(rule = %self.rule, "simplified");
        Ok(self.rule != before)
    }

    /// Translate every surface.
    pub fn displace(&mut self, v: &Vec3) {
        self.surfaces.displace_all(v);
    }

    /// Rotate every surface about the origin.
    pub fn rotate(&mut self, m: &Matrix3) -> Result<()> {
        self.surfaces.rotate_all(m)?;
        Ok(())
    }

    /// The cell card: `"<name> <rule>"`.
    pub fn write(&self) -> String {
        format!("{} {}", self.name, self.rule)
    }

    /// Cards of the surfaces the object uses.
    pub fn surface_cards(&self) -> Vec<String> {
        self.referenced_surfaces()
            .into_iter()
            .map(|id| self.surfaces[id].write())
            .collect()
    }
}
