//! Commands over the document's active selection

use crate::command::{restore_cell, Command, CommandError, CompoundCommand};
use crate::document::MapDocument;
use crate::selection::{SelectionSnapshot, TileSelection};
use std::collections::HashMap;
use tilegrid_core::{TileCoord, TileRegion, TileStack};

#[derive(Debug, Clone)]
enum SelectionShape {
    Region(TileRegion),
    Coords(Vec<TileCoord>),
}

/// Replace the active selection with a fresh one.
///
/// Any previous selection is discarded, floating content included; float
/// before creating a new selection if that content matters.
#[derive(Debug)]
pub struct CreateTileSelectionCommand {
    layer: usize,
    shape: SelectionShape,
    previous: Option<TileSelection>,
}

impl CreateTileSelectionCommand {
    /// Select a rectangular region.
    pub fn new(layer: usize, region: TileRegion) -> Self {
        Self {
            layer,
            shape: SelectionShape::Region(region),
            previous: None,
        }
    }

    /// Select an arbitrary set of cells.
    pub fn from_coords(layer: usize, coords: Vec<TileCoord>) -> Self {
        Self {
            layer,
            shape: SelectionShape::Coords(coords),
            previous: None,
        }
    }
}

impl Command for CreateTileSelectionCommand {
    fn execute(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        if document.layer(self.layer).is_none() {
            return Err(CommandError::UnknownLayer(self.layer));
        }
        self.previous = document.take_selection();
        let layer = document
            .layer(self.layer)
            .ok_or(CommandError::UnknownLayer(self.layer))?;
        let selection = match &self.shape {
            SelectionShape::Region(region) => {
                TileSelection::from_region(layer, self.layer, *region)
            }
            SelectionShape::Coords(coords) => {
                TileSelection::from_coords(layer, self.layer, coords.iter().copied())
            }
        };
        document.replace_selection(Some(selection));
        Ok(())
    }

    fn undo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        document.replace_selection(self.previous.take());
        Ok(())
    }

    fn description(&self) -> &str {
        "Select region"
    }
}

/// Drop the active selection.
///
/// A floating selection's content goes with it; this is the destructive
/// half of cut.
#[derive(Debug, Default)]
pub struct DeleteTileSelectionCommand {
    taken: Option<TileSelection>,
}

impl DeleteTileSelectionCommand {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Command for DeleteTileSelectionCommand {
    fn execute(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        self.taken = Some(document.take_selection().ok_or(CommandError::NoSelection)?);
        Ok(())
    }

    fn undo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        document.replace_selection(self.taken.take());
        Ok(())
    }

    fn description(&self) -> &str {
        "Delete selection"
    }
}

/// Lift the active selection's cells off their layer.
#[derive(Debug, Default)]
pub struct FloatTileSelectionCommand {
    acted: bool,
}

impl FloatTileSelectionCommand {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Command for FloatTileSelectionCommand {
    fn execute(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        self.acted = document.with_selection_and_layer(|sel, layer| sel.float(layer))??;
        Ok(())
    }

    fn undo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        if self.acted {
            document.with_selection_and_layer(|sel, layer| sel.anchor(layer))??;
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Float selection"
    }
}

/// Stamp the floating selection onto its layer at the current offset.
#[derive(Debug, Default)]
pub struct DefloatTileSelectionCommand {
    saved: Option<DefloatRecord>,
}

#[derive(Debug)]
struct DefloatRecord {
    overlay: HashMap<TileCoord, TileStack>,
    offset: TileCoord,
    overwritten: Vec<(TileCoord, Option<TileStack>)>,
}

impl DefloatTileSelectionCommand {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Command for DefloatTileSelectionCommand {
    fn execute(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        self.saved = document.with_selection_and_layer(|sel, layer| {
            if !sel.is_floating() {
                return Ok::<_, CommandError>(None);
            }
            let overlay = sel.overlay_clone();
            let offset = sel.offset();
            let overwritten = overlay
                .keys()
                .map(|coord| coord.offset(offset.x, offset.y))
                .filter(|target| layer.contains(*target))
                .map(|target| (target, layer.tiles_at(target).cloned()))
                .collect();
            sel.defloat(layer)?;
            Ok(Some(DefloatRecord {
                overlay,
                offset,
                overwritten,
            }))
        })??;
        Ok(())
    }

    fn undo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let Some(record) = self.saved.take() else {
            return Ok(());
        };
        document.with_selection_and_layer(|sel, layer| {
            for (coord, stack) in &record.overwritten {
                restore_cell(layer, *coord, stack.as_ref())?;
            }
            sel.restore_overlay(record.overlay, record.offset, true);
            Ok::<_, CommandError>(())
        })??;
        Ok(())
    }

    fn description(&self) -> &str {
        "Anchor selection"
    }
}

/// Reposition a floating selection. This is O(1): only the offset moves,
/// never the content. Moving an anchored selection is a no-op, per the
/// float/defloat state machine.
#[derive(Debug)]
pub struct MoveTileSelectionCommand {
    to: TileCoord,
    from: Option<TileCoord>,
}

impl MoveTileSelectionCommand {
    pub fn new(to: TileCoord) -> Self {
        Self { to, from: None }
    }
}

impl Command for MoveTileSelectionCommand {
    fn execute(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let selection = document.selection_mut().ok_or(CommandError::NoSelection)?;
        if !selection.is_floating() {
            self.from = None;
            return Ok(());
        }
        self.from = Some(selection.offset());
        selection.set_offset(self.to);
        Ok(())
    }

    fn undo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        let Some(from) = self.from else {
            return Ok(());
        };
        let selection = document.selection_mut().ok_or(CommandError::NoSelection)?;
        selection.set_offset(from);
        Ok(())
    }

    fn description(&self) -> &str {
        "Move selection"
    }
}

/// Turn a snapshot into a new floating selection positioned at `at`.
///
/// The paste stays floating; a following [`DefloatTileSelectionCommand`]
/// commits it to the layer.
#[derive(Debug)]
pub struct PasteSelectionCommand {
    layer: usize,
    snapshot: SelectionSnapshot,
    at: TileCoord,
    previous: Option<TileSelection>,
}

impl PasteSelectionCommand {
    pub fn new(layer: usize, snapshot: SelectionSnapshot, at: TileCoord) -> Self {
        Self {
            layer,
            snapshot,
            at,
            previous: None,
        }
    }
}

impl Command for PasteSelectionCommand {
    fn execute(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        if document.layer(self.layer).is_none() {
            return Err(CommandError::UnknownLayer(self.layer));
        }
        self.previous = document.take_selection();
        let mut selection = TileSelection::from_snapshot(&self.snapshot, self.layer);
        selection.set_offset(self.at);
        document.replace_selection(Some(selection));
        Ok(())
    }

    fn undo(&mut self, document: &mut MapDocument) -> Result<(), CommandError> {
        document.replace_selection(self.previous.take());
        Ok(())
    }

    fn description(&self) -> &str {
        "Paste"
    }
}

/// Cut the active selection: float its content off the layer, then drop
/// the selection. One history entry, one undo.
pub fn cut_selection() -> CompoundCommand {
    CompoundCommand::new("Cut selection")
        .with(FloatTileSelectionCommand::new())
        .with(DeleteTileSelectionCommand::new())
}
