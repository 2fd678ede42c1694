//! Command-based editing for the tilegrid map model
//!
//! Every mutation of a [`MapDocument`] goes through a [`Command`], which
//! captures the state it displaces so the edit can be undone exactly. The
//! [`CommandHistory`] owns executed commands and provides linear
//! undo/redo; [`CompoundCommand`] groups several edits into one history
//! entry with atomic execution.
//!
//! Selections ([`TileSelection`]) support the float/defloat cycle: a
//! floating selection owns its content, moves in O(1), and writes back on
//! defloat. Cut and paste are built from the same pieces.

mod command;
mod document;
mod history;
mod selection;
mod selection_commands;

pub use command::{
    AddTileCommand, ApplyBrushCommand, ClearCellCommand, Command, CommandError, CompoundCommand,
    EraseBrushCommand, RemoveTileCommand, ResizeLayerCommand,
};
pub use document::MapDocument;
pub use history::{CommandHistory, HistoryObserver};
pub use selection::{SelectionSnapshot, TileSelection};
pub use selection_commands::{
    cut_selection, CreateTileSelectionCommand, DefloatTileSelectionCommand,
    DeleteTileSelectionCommand, FloatTileSelectionCommand, MoveTileSelectionCommand,
    PasteSelectionCommand,
};
