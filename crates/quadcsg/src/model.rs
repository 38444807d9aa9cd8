//! A model: a shared surface registry and numbered cells.

use std::collections::{BTreeMap, BTreeSet};

use quadcsg_math::Point3;
use quadcsg_rules::RuleTree;
use quadcsg_surface::{Surface, SurfaceStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{CsgError, Result};
use crate::object::Object;
use crate::settings::Settings;

/// Surfaces and cells from which objects are built.
#[derive(Debug, Clone, Default)]
pub struct Model {
    settings: Settings,
    surfaces: SurfaceStore,
    cells: BTreeMap<i32, RuleTree>,
}

/// On-disk form of a model.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ModelFile {
    #[serde(default)]
    surfaces: Vec<String>,
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    cells: Vec<CellCard>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CellCard {
    id: i32,
    rule: String,
}

impl Model {
    /// Create an empty model with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty model.
    pub fn with_settings(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::default()
        })
    }

    /// Parse a model file.
    ///
    /// ```toml
    /// surfaces = ["10 so 4", "11 cz 1"]
    ///
    /// [settings]
    /// probe_step = 1e-5
    ///
    /// [[cells]]
    /// id = 1
    /// rule = "10 -11"
    /// ```
    #[instrument(skip_all)]
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: ModelFile = toml::from_str(text)?;
        let mut model = Self::with_settings(file.settings)?;
        for card in &file.surfaces {
            model.add_surface_card(card)?;
        }
        for cell in &file.cells {
            model.add_cell(cell.id, &cell.rule)?;
        }
        debug!(
            surfaces = model.surfaces.len(),
            cells = model.cells.len(),
            "loaded model"
        );
        Ok(model)
    }

    /// Write the model in the form read by [`from_toml`](Self::from_toml).
    pub fn to_toml(&self) -> Result<String> {
        let file = ModelFile {
            surfaces: self.surfaces.iter().map(Surface::write).collect(),
            settings: self.settings.clone(),
            cells: self
                .cells
                .iter()
                .map(|(&id, rule)| CellCard {
                    id,
                    rule: rule.display(),
                })
                .collect(),
        };
        Ok(toml::to_string(&file)?)
    }

    /// Settings handed to every object.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The shared surfaces.
    pub fn surfaces(&self) -> &SurfaceStore {
        &self.surfaces
    }

    /// Parse and register a surface card such as `"10 so 5"`.
    pub fn add_surface_card(&mut self, card: &str) -> Result<i32> {
        Ok(self.surfaces.insert_card(card)?)
    }

    /// Register a surface.
    pub fn add_surface(&mut self, surface: Surface) -> Result<()> {
        Ok(self.surfaces.insert(surface)?)
    }

    /// Parse and register the rule of cell `id`.
    ///
    /// References are checked when the cell is built into an object, so
    /// cells may be added in any order.
    pub fn add_cell(&mut self, id: i32, rule: &str) -> Result<()> {
        if id <= 0 {
            return Err(CsgError::InvalidCell(id));
        }
        if self.cells.contains_key(&id) {
            return Err(CsgError::DuplicateCell(id));
        }
        self.cells.insert(id, RuleTree::parse(rule)?);
        Ok(())
    }

    /// Cell numbers in ascending order.
    pub fn cell_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.cells.keys().copied()
    }

    /// The rule of cell `id`.
    pub fn cell(&self, id: i32) -> Option<&RuleTree> {
        self.cells.get(&id)
    }

    /// Build cell `id` with the surfaces and cells it depends on.
    pub fn object(&self, id: i32) -> Result<Object> {
        let rule = self.cells.get(&id).ok_or(CsgError::MissingCell {
            cell: id,
            target: id,
        })?;

        let mut cells = BTreeMap::new();
        let mut pending: Vec<(i32, i32)> = rule.object_ids().into_iter().map(|t| (id, t)).collect();
        while let Some((from, target)) = pending.pop() {
            if target == id || cells.contains_key(&target) {
                continue;
            }
            let referenced = self.cells.get(&target).ok_or(CsgError::MissingCell {
                cell: from,
                target,
            })?;
            pending.extend(referenced.object_ids().into_iter().map(|t| (target, t)));
            cells.insert(target, referenced.clone());
        }

        let mut used: BTreeSet<(i32, i32)> = rule.surface_ids().into_iter().map(|s| (id, s)).collect();
        for (&cell, r) in &cells {
            used.extend(r.surface_ids().into_iter().map(|s| (cell, s)));
        }
        let mut surfaces = SurfaceStore::new();
        for (cell, surface) in used {
            let s = self
                .surfaces
                .get(surface)
                .ok_or(CsgError::MissingSurface { cell, surface })?;
            surfaces.replace(s.clone())?;
        }

        Object::with_cells(id, rule.clone(), surfaces, cells)?.with_settings(self.settings.clone())
    }

    /// Build every cell.
    pub fn objects(&self) -> Result<Vec<Object>> {
        self.cells.keys().map(|&id| self.object(id)).collect()
    }

    /// The first cell, in ascending order, containing `p`.
    pub fn cell_at(&self, p: &Point3) -> Result<Option<i32>> {
        for object in self.objects()? {
            if object.is_valid(p) {
                return Ok(Some(object.name()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHELL: &str = r#"
surfaces = ["10 so 4", "11 so 2", "12 cz 1"]

[settings]
probe_step = 1e-5

[[cells]]
id = 1
rule = "10 #2"

[[cells]]
id = 2
rule = "11"

[[cells]]
id = 3
rule = "-10 : -12"
"#;

    #[test]
    fn test_from_toml() {
        let model = Model::from_toml(SHELL).unwrap();
        assert_eq!(model.settings().probe_step, 1e-5);
        assert_eq!(model.surfaces().len(), 3);
        assert_eq!(model.cell_ids().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_object_resolves_cells() {
        let model = Model::from_toml(SHELL).unwrap();
        let shell = model.object(1).unwrap();
        assert_eq!(shell.cells().keys().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(shell.surfaces().ids().collect::<Vec<_>>(), vec![10, 11]);
        assert_eq!(shell.settings().probe_step, 1e-5);
        assert!(shell.is_valid(&Point3::new(3.0, 0.0, 0.0)));
        assert!(!shell.is_valid(&Point3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_cell_at() {
        let model = Model::from_toml(SHELL).unwrap();
        assert_eq!(model.cell_at(&Point3::new(3.0, 0.0, 0.0)).unwrap(), Some(1));
        assert_eq!(model.cell_at(&Point3::new(1.5, 0.0, 0.0)).unwrap(), Some(2));
        assert_eq!(model.cell_at(&Point3::new(9.0, 0.0, 0.0)).unwrap(), Some(3));
    }

    #[test]
    fn test_missing_references() {
        let mut model = Model::new();
        model.add_surface_card("10 so 4").unwrap();
        model.add_cell(1, "10 #5").unwrap();
        model.add_cell(2, "10 -11").unwrap();
        assert!(matches!(
            model.object(1),
            Err(CsgError::MissingCell { cell: 1, target: 5 })
        ));
        assert!(matches!(
            model.object(2),
            Err(CsgError::MissingSurface {
                cell: 2,
                surface: 11
            })
        ));
        assert!(matches!(model.object(9), Err(CsgError::MissingCell { .. })));
    }

    #[test]
    fn test_cycle() {
        let mut model = Model::new();
        model.add_surface_card("10 so 4").unwrap();
        model.add_cell(1, "10 #2").unwrap();
        model.add_cell(2, "#3").unwrap();
        model.add_cell(3, "10 #1").unwrap();
        assert!(matches!(model.object(1), Err(CsgError::CellCycle(1))));
        assert!(matches!(model.object(2), Err(CsgError::CellCycle(_))));
    }

    #[test]
    fn test_add_cell_rejects() {
        let mut model = Model::new();
        model.add_cell(1, "10").unwrap();
        assert!(matches!(model.add_cell(1, "11"), Err(CsgError::DuplicateCell(1))));
        assert!(matches!(model.add_cell(0, "11"), Err(CsgError::InvalidCell(0))));
        assert!(matches!(model.add_cell(4, "1 ("), Err(CsgError::Rule(_))));
    }

    #[test]
    fn test_bad_files() {
        assert!(matches!(Model::from_toml("cells = 3"), Err(CsgError::Config(_))));
        assert!(matches!(
            Model::from_toml("surfaces = [\"10 zz 4\"]"),
            Err(CsgError::Surface(_))
        ));
        assert!(matches!(
            Model::from_toml("[settings]\nmerge_distance = -1.0"),
            Err(CsgError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let model = Model::from_toml(SHELL).unwrap();
        let text = model.to_toml().unwrap();
        let again = Model::from_toml(&text).unwrap();
        assert_eq!(again.surfaces(), model.surfaces());
        assert_eq!(again.cell(1), model.cell(1));
        assert_eq!(again.settings(), model.settings());
    }
}
