//! The editable map document commands operate on

use crate::command::CommandError;
use crate::selection::TileSelection;
use tilegrid_core::TileGridLayer;

/// A stack of layers plus at most one active selection.
///
/// The document itself is dumb storage; all editing goes through commands
/// so that every mutation is undoable.
#[derive(Debug, Default)]
pub struct MapDocument {
    layers: Vec<TileGridLayer>,
    selection: Option<TileSelection>,
}

impl MapDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer and return its index
    pub fn push_layer(&mut self, layer: TileGridLayer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    pub fn layers(&self) -> &[TileGridLayer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&TileGridLayer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut TileGridLayer> {
        self.layers.get_mut(index)
    }

    pub fn selection(&self) -> Option<&TileSelection> {
        self.selection.as_ref()
    }

    pub fn selection_mut(&mut self) -> Option<&mut TileSelection> {
        self.selection.as_mut()
    }

    /// Swap in a new selection (or none), returning the old one
    pub fn replace_selection(&mut self, selection: Option<TileSelection>) -> Option<TileSelection> {
        std::mem::replace(&mut self.selection, selection)
    }

    pub fn take_selection(&mut self) -> Option<TileSelection> {
        self.selection.take()
    }

    /// Run `f` with the active selection and its layer borrowed together.
    ///
    /// The selection is taken out of the document for the duration of the
    /// call and put back afterwards, including on the error paths.
    pub(crate) fn with_selection_and_layer<R>(
        &mut self,
        f: impl FnOnce(&mut TileSelection, &mut TileGridLayer) -> R,
    ) -> Result<R, CommandError> {
        let mut selection = self.selection.take().ok_or(CommandError::NoSelection)?;
        let index = selection.layer_index();
        let Some(layer) = self.layers.get_mut(index) else {
            self.selection = Some(selection);
            return Err(CommandError::UnknownLayer(index));
        };
        let result = f(&mut selection, layer);
        self.selection = Some(selection);
        Ok(result)
    }
}
