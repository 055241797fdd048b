//! The committed shape list with bounded undo/redo and local persistence.
//!
//! Every mutation records the step needed to reverse it. Undo pops that step,
//! applies its inverse and moves it onto the redo stack; any fresh mutation
//! discards the redo stack.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::shapes::Shape;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

// ── Persistence format ──────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default)]
    canvas_shapes: Vec<Shape>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedCanvas {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Serialize)]
struct ExportFile<'a> {
    shapes: &'a [Shape],
}

// ── History ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
enum Step {
    Append(Shape),
    Remove { index: usize, shape: Shape },
    Replace { previous: Vec<Shape>, next: Vec<Shape> },
    Relabel {
        index: usize,
        previous: Option<String>,
        next: Option<String>,
    },
}

impl Step {
    fn revert(&self, shapes: &mut Vec<Shape>) {
        match self {
            Step::Append(_) => {
                shapes.pop();
            }
            Step::Remove { index, shape } => {
                let index = (*index).min(shapes.len());
                shapes.insert(index, shape.clone());
            }
            Step::Replace { previous, .. } => *shapes = previous.clone(),
            Step::Relabel { index, previous, .. } => {
                if let Some(shape) = shapes.get_mut(*index) {
                    shape.label = previous.clone();
                }
            }
        }
    }

    fn apply(&self, shapes: &mut Vec<Shape>) {
        match self {
            Step::Append(shape) => shapes.push(shape.clone()),
            Step::Remove { index, .. } => {
                if *index < shapes.len() {
                    shapes.remove(*index);
                }
            }
            Step::Replace { next, .. } => *shapes = next.clone(),
            Step::Relabel { index, next, .. } => {
                if let Some(shape) = shapes.get_mut(*index) {
                    shape.label = next.clone();
                }
            }
        }
    }
}

// ── Store ───────────────────────────────────────────────────────────────────

pub struct ShapeStore {
    shapes: Vec<Shape>,
    undo_stack: VecDeque<Step>,
    redo_stack: Vec<Step>,
    history_limit: usize,
    storage: Option<PathBuf>,
    hydrated: bool,
}

impl ShapeStore {
    /// Store without backing file, ready immediately.
    pub fn in_memory(history_limit: usize) -> Self {
        Self {
            shapes: Vec::new(),
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            history_limit,
            storage: None,
            hydrated: true,
        }
    }

    /// Store backed by `path`. Nothing is read until [`ShapeStore::hydrate`].
    pub fn persistent(path: impl Into<PathBuf>, history_limit: usize) -> Self {
        Self {
            storage: Some(path.into()),
            hydrated: false,
            ..Self::in_memory(history_limit)
        }
    }

    /// Load the persisted list. The store counts as hydrated afterwards even
    /// when loading failed, in which case it starts empty.
    pub fn hydrate(&mut self) -> Result<(), StoreError> {
        let result = match &self.storage {
            Some(path) => read_persisted(path),
            None => Ok(Vec::new()),
        };
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.hydrated = true;
        let shapes = result?;
        log::info!("hydrated shape store with {} shapes", shapes.len());
        self.shapes = shapes;
        Ok(())
    }

    pub fn has_hydrated(&self) -> bool {
        self.hydrated
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn storage_path(&self) -> Option<&Path> {
        self.storage.as_deref()
    }

    pub fn append(&mut self, shape: Shape) {
        self.commit(Step::Append(shape));
    }

    /// Remove the first shape equal to `shape`. Returns whether one was found.
    pub fn remove(&mut self, shape: &Shape) -> bool {
        match self.shapes.iter().position(|s| s == shape) {
            Some(index) => {
                self.commit(Step::Remove {
                    index,
                    shape: shape.clone(),
                });
                true
            }
            None => false,
        }
    }

    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        self.commit(Step::Replace {
            previous: self.shapes.clone(),
            next: shapes,
        });
    }

    pub fn reset_all(&mut self) {
        self.replace_all(Vec::new());
    }

    pub fn set_label(&mut self, index: usize, label: Option<String>) -> Result<(), StoreError> {
        let previous = self
            .shapes
            .get(index)
            .map(|s| s.label.clone())
            .ok_or(StoreError::IndexOutOfRange(index))?;
        if previous == label {
            return Ok(());
        }
        self.commit(Step::Relabel {
            index,
            previous,
            next: label,
        });
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        let Some(step) = self.undo_stack.pop_back() else {
            return false;
        };
        step.revert(&mut self.shapes);
        self.redo_stack.push(step);
        self.auto_save();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(step) = self.redo_stack.pop() else {
            return false;
        };
        step.apply(&mut self.shapes);
        self.push_undo(step);
        self.auto_save();
        true
    }

    /// Write the current list as pretty JSON to `path`.
    pub fn export_json(&self, path: &Path) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(&ExportFile {
            shapes: &self.shapes,
        })
        .map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, data).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn commit(&mut self, step: Step) {
        step.apply(&mut self.shapes);
        self.push_undo(step);
        self.redo_stack.clear();
        self.auto_save();
    }

    fn push_undo(&mut self, step: Step) {
        self.undo_stack.push_back(step);
        while self.undo_stack.len() > self.history_limit {
            self.undo_stack.pop_front();
        }
    }

    fn auto_save(&self) {
        let Some(path) = &self.storage else {
            return;
        };
        if let Err(e) = write_persisted(path, &self.shapes) {
            log::warn!("{e}");
        }
    }
}

fn read_persisted(path: &Path) -> Result<Vec<Shape>, StoreError> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let file: PersistedCanvas =
        serde_json::from_str(&data).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(file.state.canvas_shapes)
}

fn write_persisted(path: &Path, shapes: &[Shape]) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let file = PersistedCanvas {
        state: PersistedState {
            canvas_shapes: shapes.to_vec(),
        },
        version: 0,
    };
    let data = serde_json::to_string(&file).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    fn rect(x: f64) -> Shape {
        Shape::new(ShapeKind::Rectangle, x, 0.0, 10.0, 10.0)
    }

    #[test]
    fn undo_and_redo_walk_appends() {
        let mut store = ShapeStore::in_memory(DEFAULT_HISTORY_LIMIT);
        for i in 0..3 {
            store.append(rect(i as f64));
        }
        let drawn = store.shapes().to_vec();

        for _ in 0..3 {
            assert!(store.undo());
        }
        assert!(store.is_empty());
        assert!(!store.can_undo());
        assert!(!store.undo());

        for _ in 0..3 {
            assert!(store.redo());
        }
        assert_eq!(store.shapes(), drawn.as_slice());
        assert!(!store.can_redo());
    }

    #[test]
    fn remove_undo_restores_position() {
        let mut store = ShapeStore::in_memory(DEFAULT_HISTORY_LIMIT);
        store.append(rect(0.0));
        store.append(rect(1.0));
        store.append(rect(2.0));

        assert!(store.remove(&rect(1.0)));
        assert_eq!(store.shapes(), &[rect(0.0), rect(2.0)]);
        assert!(!store.remove(&rect(7.0)));

        store.undo();
        assert_eq!(store.shapes(), &[rect(0.0), rect(1.0), rect(2.0)]);
    }

    #[test]
    fn new_mutation_discards_redo() {
        let mut store = ShapeStore::in_memory(DEFAULT_HISTORY_LIMIT);
        store.append(rect(0.0));
        store.undo();
        assert!(store.can_redo());

        store.append(rect(1.0));
        assert!(!store.can_redo());
    }

    #[test]
    fn reset_is_undoable() {
        let mut store = ShapeStore::in_memory(DEFAULT_HISTORY_LIMIT);
        store.append(rect(0.0));
        store.append(rect(1.0));
        store.reset_all();
        assert!(store.is_empty());

        store.undo();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn history_is_bounded() {
        let mut store = ShapeStore::in_memory(2);
        for i in 0..5 {
            store.append(rect(i as f64));
        }
        assert!(store.undo());
        assert!(store.undo());
        assert!(!store.undo());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn relabel_round_trip() {
        let mut store = ShapeStore::in_memory(DEFAULT_HISTORY_LIMIT);
        store.append(rect(0.0));
        store.set_label(0, Some("waldo".into())).unwrap();
        assert_eq!(store.shapes()[0].label.as_deref(), Some("waldo"));

        store.undo();
        assert_eq!(store.shapes()[0].label, None);
        store.redo();
        assert_eq!(store.shapes()[0].label.as_deref(), Some("waldo"));

        assert!(matches!(
            store.set_label(4, None),
            Err(StoreError::IndexOutOfRange(4))
        ));
    }

    #[test]
    fn persistent_store_waits_for_hydration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas-store.json");

        let mut store = ShapeStore::persistent(&path, DEFAULT_HISTORY_LIMIT);
        assert!(!store.has_hydrated());
        store.hydrate().unwrap();
        assert!(store.has_hydrated());
        assert!(store.is_empty());

        store.append(rect(3.0));
        let mut reopened = ShapeStore::persistent(&path, DEFAULT_HISTORY_LIMIT);
        reopened.hydrate().unwrap();
        assert_eq!(reopened.shapes(), &[rect(3.0)]);
        assert!(!reopened.can_undo());
    }

    #[test]
    fn corrupt_file_still_hydrates_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas-store.json");
        std::fs::write(&path, "{not json").unwrap();

        let mut store = ShapeStore::persistent(&path, DEFAULT_HISTORY_LIMIT);
        assert!(matches!(store.hydrate(), Err(StoreError::Json { .. })));
        assert!(store.has_hydrated());
        assert!(store.is_empty());
    }

    #[test]
    fn persisted_document_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas-store.json");
        let mut store = ShapeStore::persistent(&path, DEFAULT_HISTORY_LIMIT);
        store.hydrate().unwrap();
        store.append(rect(1.0));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], 0);
        assert_eq!(raw["state"]["canvasShapes"][0]["type"], "rectangle");
    }
}
