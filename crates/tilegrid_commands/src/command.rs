//! The command engine
//!
//! Every edit is a [`Command`]: an object that performs the mutation and
//! carries enough captured state to reverse it exactly. Commands snapshot
//! the cells they are about to touch before mutating, and undo by
//! replaying those snapshots through the layer's normal mutators so that
//! observers see a consistent event stream either way.

use crate::document::MapDocument;
use std::rc::Rc;
use thiserror::Error;
use tilegrid_brush::TileBrush;
use tilegrid_core::{GridError, Tile, TileCoord, TileGridLayer, TileRegion, TileStack};
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("no layer at index {0}")]
    UnknownLayer(usize),
    #[error("no active selection")]
    NoSelection,
}

/// An undoable edit of a [`MapDocument`].
///
/// `execute` runs the edit for the first time and captures whatever state
/// undo needs. `redo` defaults to `execute`; commands whose effect depends
/// on document state at execution time override it to replay the recorded
/// outcome instead of recomputing it.
pub trait Command {
    fn execute(&mut self, document: &mut MapDocument) -> Result<(), CommandError>;

    fn undo(&mut self, document: &mut MapDocument) -> Result<(), CommandError>;

    fn redo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        self.execute(document)
    }

    fn description(&self) -> &str;
}

/// Overwrite one cell with a captured stack, or clear it.
pub(crate) fn restore_cell(
    layer: &mut TileGridLayer,
    coord: TileCoord,
    stack: Option<&TileStack>,
) -> Result<(), GridError> {
    layer.set_cell(coord.x, coord.y, stack.cloned())
}

/// A cell's before/after state recorded by a brush command
#[derive(Debug, Clone)]
struct CellChange {
    coord: TileCoord,
    before: Option<TileStack>,
    after: Option<TileStack>,
}

/// Capture `region`, run `f`, and return the cells whose stacks changed.
fn record_region(
    layer: &mut TileGridLayer,
    region: TileRegion,
    f: impl FnOnce(&mut TileGridLayer) -> Result<(), GridError>,
) -> Result<Vec<CellChange>, GridError> {
    let coords: Vec<TileCoord> = match layer.bounds().intersect(&region) {
        Some(clipped) => clipped.coords().collect(),
        None => Vec::new(),
    };
    let before: Vec<Option<TileStack>> = coords
        .iter()
        .map(|&coord| layer.tiles_at(coord).cloned())
        .collect();
    f(layer)?;
    Ok(coords
        .into_iter()
        .zip(before)
        .filter_map(|(coord, before)| {
            let after = layer.tiles_at(coord).cloned();
            (before != after).then_some(CellChange {
                coord,
                before,
                after,
            })
        })
        .collect())
}

// ============================================================================
// Single-cell commands
// ============================================================================

/// Add one tile to a cell.
#[derive(Debug)]
pub struct AddTileCommand {
    layer: usize,
    at: TileCoord,
    tile: Tile,
    previous: Option<TileStack>,
}

impl AddTileCommand {
    pub fn new(layer: usize, at: TileCoord, tile: Tile) -> Self {
        Self {
            layer,
            at,
            tile,
            previous: None,
        }
    }
}

impl Command for AddTileCommand {
    fn execute(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let layer = document
            .layer_mut(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        self.previous = layer.tiles_at(self.at).cloned();
        layer.add_tile(self.at.x, self.at.y, self.tile)?;
        Ok(())
    }

    fn undo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let layer = document
            .layer_mut(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        restore_cell(layer, self.at, self.previous.as_ref())?;
        Ok(())
    }

    fn description(&self) -> &str {
        "Add tile"
    }
}

/// Remove one tile, by identity, from a cell.
#[derive(Debug)]
pub struct RemoveTileCommand {
    layer: usize,
    at: TileCoord,
    tile: Tile,
    previous: Option<TileStack>,
}

impl RemoveTileCommand {
    pub fn new(layer: usize, at: TileCoord, tile: Tile) -> Self {
        Self {
            layer,
            at,
            tile,
            previous: None,
        }
    }
}

impl Command for RemoveTileCommand {
    fn execute(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let layer = document
            .layer_mut(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        self.previous = layer.tiles_at(self.at).cloned();
        layer.remove_tile(self.at.x, self.at.y, self.tile)?;
        Ok(())
    }

    fn undo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let layer = document
            .layer_mut(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        restore_cell(layer, self.at, self.previous.as_ref())?;
        Ok(())
    }

    fn description(&self) -> &str {
        "Remove tile"
    }
}

/// Drop a cell's whole stack.
#[derive(Debug)]
pub struct ClearCellCommand {
    layer: usize,
    at: TileCoord,
    previous: Option<TileStack>,
}

impl ClearCellCommand {
    pub fn new(layer: usize, at: TileCoord) -> Self {
        Self {
            layer,
            at,
            previous: None,
        }
    }
}

impl Command for ClearCellCommand {
    fn execute(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let layer = document
            .layer_mut(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        self.previous = layer.tiles_at(self.at).cloned();
        layer.clear_tile(self.at.x, self.at.y)?;
        Ok(())
    }

    fn undo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let layer = document
            .layer_mut(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        restore_cell(layer, self.at, self.previous.as_ref())?;
        Ok(())
    }

    fn description(&self) -> &str {
        "Clear cell"
    }
}

// ============================================================================
// Brush commands
// ============================================================================

/// The region of cells a brush application can touch.
///
/// Static brushes stamp their extent; dynamic brushes rewrite at most the
/// 3x3 ring around the target.
fn brush_footprint(brush: &TileBrush, at: TileCoord) -> TileRegion {
    match brush {
        TileBrush::Static(brush) => match brush.extent() {
            Some(extent) => TileRegion::new(
                extent.x + at.x,
                extent.y + at.y,
                extent.width,
                extent.height,
            ),
            None => TileRegion::new(at.x, at.y, 0, 0),
        },
        TileBrush::Dynamic(_) => TileRegion::new(at.x - 1, at.y - 1, 3, 3),
    }
}

/// Apply a brush at a cell, recording every cell the application changed.
#[derive(Debug)]
pub struct ApplyBrushCommand {
    layer: usize,
    brush: Rc<TileBrush>,
    at: TileCoord,
    changes: Vec<CellChange>,
}

impl ApplyBrushCommand {
    pub fn new(layer: usize, brush: Rc<TileBrush>, at: TileCoord) -> Self {
        Self {
            layer,
            brush,
            at,
            changes: Vec::new(),
        }
    }
}

impl Command for ApplyBrushCommand {
    fn execute(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let layer = document
            .layer_mut(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        let region = brush_footprint(&self.brush, self.at);
        self.changes = record_region(layer, region, |layer| {
            self.brush.apply(layer, self.at.x, self.at.y)
        })?;
        Ok(())
    }

    fn undo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let layer = document
            .layer_mut(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        for change in self.changes.iter().rev() {
            restore_cell(layer, change.coord, change.before.as_ref())?;
        }
        Ok(())
    }

    // Replay the recorded outcome; re-running the brush against a possibly
    // different neighborhood would not be a faithful redo.
    fn redo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let layer = document
            .layer_mut(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        for change in &self.changes {
            restore_cell(layer, change.coord, change.after.as_ref())?;
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Apply brush"
    }
}

/// Erase a brush's tiles at a cell.
///
/// For a dynamic brush this removes its member tiles and heals the
/// surrounding pattern; for a static brush it removes the pattern's tiles
/// at their stamped offsets.
#[derive(Debug)]
pub struct EraseBrushCommand {
    layer: usize,
    brush: Rc<TileBrush>,
    at: TileCoord,
    changes: Vec<CellChange>,
}

impl EraseBrushCommand {
    pub fn new(layer: usize, brush: Rc<TileBrush>, at: TileCoord) -> Self {
        Self {
            layer,
            brush,
            at,
            changes: Vec::new(),
        }
    }
}

impl Command for EraseBrushCommand {
    fn execute(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let layer = document
            .layer_mut(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        let region = brush_footprint(&self.brush, self.at);
        let at = self.at;
        let brush = Rc::clone(&self.brush);
        self.changes = record_region(layer, region, move |layer| match brush.as_ref() {
            TileBrush::Dynamic(brush) => brush.erase(layer, at.x, at.y),
            TileBrush::Static(brush) => {
                for (coord, stack) in brush.cells() {
                    let target = coord.offset(at.x, at.y);
                    if !layer.contains(target) {
                        continue;
                    }
                    for tile in stack.iter() {
                        layer.remove_tile(target.x, target.y, tile)?;
                    }
                }
                Ok(())
            }
        })?;
        Ok(())
    }

    fn undo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let layer = document
            .layer_mut(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        for change in self.changes.iter().rev() {
            restore_cell(layer, change.coord, change.before.as_ref())?;
        }
        Ok(())
    }

    fn redo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let layer = document
            .layer_mut(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        for change in &self.changes {
            restore_cell(layer, change.coord, change.after.as_ref())?;
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Erase brush"
    }
}

// ============================================================================
// Layer commands
// ============================================================================

/// Resize a layer, remembering the cells the resize drops.
#[derive(Debug)]
pub struct ResizeLayerCommand {
    layer: usize,
    new_bounds: TileRegion,
    old_bounds: Option<TileRegion>,
    displaced: Vec<(TileCoord, TileStack)>,
}

impl ResizeLayerCommand {
    pub fn new(layer: usize, new_bounds: TileRegion) -> Self {
        Self {
            layer,
            new_bounds,
            old_bounds: None,
            displaced: Vec::new(),
        }
    }
}

impl Command for ResizeLayerCommand {
    fn execute(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let layer = document
            .layer_mut(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        let old_bounds = layer.bounds();
        self.displaced = layer
            .occupied_cells()
            .filter(|(coord, _)| !self.new_bounds.contains(*coord))
            .map(|(coord, stack)| (coord, stack.clone()))
            .collect();
        self.old_bounds = Some(old_bounds);
        layer.resize(
            self.new_bounds.x,
            self.new_bounds.y,
            self.new_bounds.width,
            self.new_bounds.height,
        );
        Ok(())
    }

    fn undo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let layer = document
            .layer_mut(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        if let Some(old) = self.old_bounds {
            layer.resize(old.x, old.y, old.width, old.height);
        }
        for (coord, stack) in &self.displaced {
            restore_cell(layer, *coord, Some(stack))?;
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Resize layer"
    }
}

// ============================================================================
// Compound commands
// ============================================================================

/// A sequence of commands that undoes and redoes as one history entry.
///
/// Execution is atomic: if a step fails, the steps already run are undone
/// in reverse order before the error is returned.
pub struct CompoundCommand {
    description: String,
    commands: Vec<Box<dyn Command>>,
}

impl CompoundCommand {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: impl Command + 'static) {
        self.commands.push(Box::new(command));
    }

    pub fn with(mut self, command: impl Command + 'static) -> Self {
        self.push(command);
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl std::fmt::Debug for CompoundCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompoundCommand")
            .field("description", &self.description)
            .field("commands", &self.commands.len())
            .finish()
    }
}

impl Command for CompoundCommand {
    fn execute(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        for index in 0..self.commands.len() {
            if let Err(err) = self.commands[index].execute(document) {
                for command in self.commands[..index].iter_mut().rev() {
                    if let Err(rollback) = command.undo(document) {
                        warn!(
                            command = command.description(),
                            %rollback,
                            "rollback of partially executed compound failed"
                        );
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn undo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        for command in self.commands.iter_mut().rev() {
            command.undo(document)?;
        }
        Ok(())
    }

    fn redo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        for command in self.commands.iter_mut() {
            command.redo(document)?;
        }
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
