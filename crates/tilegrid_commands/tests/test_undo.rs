//! Undo/redo behavior across the command set

use std::cell::RefCell;
use std::rc::Rc;
use tilegrid_brush::{BrushClass, DynamicTileBrush, StaticTileBrush, TileBrush};
use tilegrid_commands::{
    AddTileCommand, ApplyBrushCommand, ClearCellCommand, Command, CommandError, CommandHistory,
    CompoundCommand, EraseBrushCommand, HistoryObserver, MapDocument, RemoveTileCommand,
    ResizeLayerCommand,
};
use tilegrid_core::{GridError, Tile, TileCoord, TileGridLayer, TilePool, TileRegion};

fn document() -> (TilePool, MapDocument, Vec<Tile>) {
    let mut pool = TilePool::new(16, 16);
    let tiles = (0..4)
        .map(|i| pool.create_tile(vec![i as u32; 256]).unwrap())
        .collect();
    let mut document = MapDocument::new();
    document.push_layer(TileGridLayer::new("Ground", 10, 10, 16, 16));
    (pool, document, tiles)
}

fn stack_at(document: &MapDocument, x: i32, y: i32) -> Vec<Tile> {
    document
        .layer(0)
        .unwrap()
        .tiles_at(TileCoord::new(x, y))
        .map(|stack| stack.iter().collect())
        .unwrap_or_default()
}

#[test]
fn test_add_tile_undo_redo() {
    let (_pool, mut document, tiles) = document();
    let mut history = CommandHistory::new();

    history
        .execute(
            Box::new(AddTileCommand::new(0, TileCoord::new(3, 3), tiles[0])),
            &mut document,
        )
        .unwrap();
    assert_eq!(stack_at(&document, 3, 3), vec![tiles[0]]);

    assert!(history.undo(&mut document).unwrap());
    assert!(stack_at(&document, 3, 3).is_empty());

    assert!(history.redo(&mut document).unwrap());
    assert_eq!(stack_at(&document, 3, 3), vec![tiles[0]]);
}

#[test]
fn test_undo_restores_previous_stack_order() {
    let (_pool, mut document, tiles) = document();
    let mut history = CommandHistory::new();

    for &tile in &tiles[..2] {
        history
            .execute(
                Box::new(AddTileCommand::new(0, TileCoord::new(1, 1), tile)),
                &mut document,
            )
            .unwrap();
    }
    assert_eq!(stack_at(&document, 1, 1), vec![tiles[0], tiles[1]]);

    history.undo(&mut document).unwrap();
    assert_eq!(stack_at(&document, 1, 1), vec![tiles[0]]);
}

#[test]
fn test_remove_and_clear_undo() {
    let (_pool, mut document, tiles) = document();
    let mut history = CommandHistory::new();

    for &tile in &tiles[..3] {
        history
            .execute(
                Box::new(AddTileCommand::new(0, TileCoord::new(2, 2), tile)),
                &mut document,
            )
            .unwrap();
    }

    // Remove the middle tile, then undo: order must come back intact
    history
        .execute(
            Box::new(RemoveTileCommand::new(0, TileCoord::new(2, 2), tiles[1])),
            &mut document,
        )
        .unwrap();
    assert_eq!(stack_at(&document, 2, 2), vec![tiles[0], tiles[2]]);
    history.undo(&mut document).unwrap();
    assert_eq!(stack_at(&document, 2, 2), vec![tiles[0], tiles[1], tiles[2]]);

    history
        .execute(
            Box::new(ClearCellCommand::new(0, TileCoord::new(2, 2))),
            &mut document,
        )
        .unwrap();
    assert!(stack_at(&document, 2, 2).is_empty());
    history.undo(&mut document).unwrap();
    assert_eq!(stack_at(&document, 2, 2), vec![tiles[0], tiles[1], tiles[2]]);
}

#[test]
fn test_new_command_invalidates_redo() {
    let (_pool, mut document, tiles) = document();
    let mut history = CommandHistory::new();

    history
        .execute(
            Box::new(AddTileCommand::new(0, TileCoord::new(0, 0), tiles[0])),
            &mut document,
        )
        .unwrap();
    history.undo(&mut document).unwrap();
    assert!(history.can_redo());

    history
        .execute(
            Box::new(AddTileCommand::new(0, TileCoord::new(1, 0), tiles[1])),
            &mut document,
        )
        .unwrap();
    assert!(!history.can_redo());
    assert!(!history.redo(&mut document).unwrap());
}

#[test]
fn test_failed_command_leaves_history_untouched() {
    let (_pool, mut document, tiles) = document();
    let mut history = CommandHistory::new();

    let result = history.execute(
        Box::new(AddTileCommand::new(0, TileCoord::new(20, 0), tiles[0])),
        &mut document,
    );
    assert_eq!(
        result,
        Err(CommandError::Grid(GridError::OutOfBounds { x: 20, y: 0 }))
    );
    assert!(!history.can_undo());
}

#[test]
fn test_unknown_layer_is_reported() {
    let (_pool, mut document, tiles) = document();
    let mut command = AddTileCommand::new(7, TileCoord::new(0, 0), tiles[0]);
    assert_eq!(
        command.execute(&mut document),
        Err(CommandError::UnknownLayer(7))
    );
}

#[test]
fn test_static_brush_command_undo() {
    let (_pool, mut document, tiles) = document();
    let mut history = CommandHistory::new();

    let mut stamp = StaticTileBrush::new("stamp", 16, 16);
    stamp.add_tile(TileCoord::new(0, 0), tiles[0]).unwrap();
    stamp.add_tile(TileCoord::new(1, 0), tiles[1]).unwrap();
    let brush = Rc::new(TileBrush::from(stamp));

    history
        .execute(
            Box::new(ApplyBrushCommand::new(0, brush, TileCoord::new(4, 4))),
            &mut document,
        )
        .unwrap();
    assert_eq!(stack_at(&document, 4, 4), vec![tiles[0]]);
    assert_eq!(stack_at(&document, 5, 4), vec![tiles[1]]);

    history.undo(&mut document).unwrap();
    assert!(stack_at(&document, 4, 4).is_empty());
    assert!(stack_at(&document, 5, 4).is_empty());

    history.redo(&mut document).unwrap();
    assert_eq!(stack_at(&document, 4, 4), vec![tiles[0]]);
}

fn edge_brush(pool: &mut TilePool) -> (Rc<TileBrush>, Vec<Tile>) {
    let class = Rc::new(BrushClass::edge_16());
    let mut brush = DynamicTileBrush::new("terrain", 16, 16, class);
    let tiles: Vec<Tile> = (100..116)
        .map(|i| pool.create_tile(vec![i as u32; 256]).unwrap())
        .collect();
    for (i, &tile) in tiles.iter().enumerate() {
        brush.set_slot(i, Some(tile)).unwrap();
    }
    (Rc::new(TileBrush::from(brush)), tiles)
}

#[test]
fn test_dynamic_brush_undo_restores_cascaded_neighbors() {
    let (mut pool, mut document, _tiles) = document();
    let (brush, slots) = edge_brush(&mut pool);
    let mut history = CommandHistory::new();

    history
        .execute(
            Box::new(ApplyBrushCommand::new(
                0,
                Rc::clone(&brush),
                TileCoord::new(5, 5),
            )),
            &mut document,
        )
        .unwrap();
    history
        .execute(
            Box::new(ApplyBrushCommand::new(
                0,
                Rc::clone(&brush),
                TileCoord::new(6, 5),
            )),
            &mut document,
        )
        .unwrap();
    // Second application rewrote the first cell to its east-edge form
    assert_eq!(stack_at(&document, 5, 5), vec![slots[2]]);

    // Undoing the second placement returns the first to its isolated form
    history.undo(&mut document).unwrap();
    assert_eq!(stack_at(&document, 5, 5), vec![slots[0]]);
    assert!(stack_at(&document, 6, 5).is_empty());

    history.redo(&mut document).unwrap();
    assert_eq!(stack_at(&document, 5, 5), vec![slots[2]]);
    assert_eq!(stack_at(&document, 6, 5), vec![slots[8]]);
}

#[test]
fn test_erase_brush_command_heals_and_undoes() {
    let (mut pool, mut document, _tiles) = document();
    let (brush, slots) = edge_brush(&mut pool);
    let mut history = CommandHistory::new();

    for coord in [TileCoord::new(5, 5), TileCoord::new(6, 5)] {
        history
            .execute(
                Box::new(ApplyBrushCommand::new(0, Rc::clone(&brush), coord)),
                &mut document,
            )
            .unwrap();
    }

    history
        .execute(
            Box::new(EraseBrushCommand::new(
                0,
                Rc::clone(&brush),
                TileCoord::new(6, 5),
            )),
            &mut document,
        )
        .unwrap();
    assert!(stack_at(&document, 6, 5).is_empty());
    assert_eq!(stack_at(&document, 5, 5), vec![slots[0]]);

    history.undo(&mut document).unwrap();
    assert_eq!(stack_at(&document, 6, 5), vec![slots[8]]);
    assert_eq!(stack_at(&document, 5, 5), vec![slots[2]]);
}

#[test]
fn test_resize_undo_restores_displaced_cells() {
    let (_pool, mut document, tiles) = document();
    let mut history = CommandHistory::new();

    history
        .execute(
            Box::new(AddTileCommand::new(0, TileCoord::new(8, 8), tiles[0])),
            &mut document,
        )
        .unwrap();
    history
        .execute(
            Box::new(ResizeLayerCommand::new(0, TileRegion::new(0, 0, 5, 5))),
            &mut document,
        )
        .unwrap();
    assert_eq!(document.layer(0).unwrap().bounds(), TileRegion::new(0, 0, 5, 5));
    assert!(stack_at(&document, 8, 8).is_empty());

    history.undo(&mut document).unwrap();
    assert_eq!(
        document.layer(0).unwrap().bounds(),
        TileRegion::new(0, 0, 10, 10)
    );
    assert_eq!(stack_at(&document, 8, 8), vec![tiles[0]]);
}

#[test]
fn test_compound_rolls_back_on_failure() {
    let (_pool, mut document, tiles) = document();
    let mut history = CommandHistory::new();

    let compound = CompoundCommand::new("Place pair")
        .with(AddTileCommand::new(0, TileCoord::new(0, 0), tiles[0]))
        .with(AddTileCommand::new(0, TileCoord::new(99, 0), tiles[1]));

    let result = history.execute(Box::new(compound), &mut document);
    assert!(result.is_err());
    // First step was rolled back
    assert!(stack_at(&document, 0, 0).is_empty());
    assert!(!history.can_undo());
}

#[test]
fn test_compound_undoes_as_one_entry() {
    let (_pool, mut document, tiles) = document();
    let mut history = CommandHistory::new();

    let compound = CompoundCommand::new("Place pair")
        .with(AddTileCommand::new(0, TileCoord::new(0, 0), tiles[0]))
        .with(AddTileCommand::new(0, TileCoord::new(1, 0), tiles[1]));
    history.execute(Box::new(compound), &mut document).unwrap();
    assert_eq!(history.undo_depth(), 1);
    assert_eq!(history.undo_description(), Some("Place pair"));

    history.undo(&mut document).unwrap();
    assert!(stack_at(&document, 0, 0).is_empty());
    assert!(stack_at(&document, 1, 0).is_empty());
}

#[test]
fn test_depth_limit_drops_oldest_entry() {
    let (_pool, mut document, tiles) = document();
    let mut history = CommandHistory::with_depth_limit(2);

    for (i, &tile) in tiles[..3].iter().enumerate() {
        history
            .execute(
                Box::new(AddTileCommand::new(0, TileCoord::new(i as i32, 0), tile)),
                &mut document,
            )
            .unwrap();
    }
    assert_eq!(history.undo_depth(), 2);

    assert!(history.undo(&mut document).unwrap());
    assert!(history.undo(&mut document).unwrap());
    assert!(!history.undo(&mut document).unwrap());
    // The first add survived because its entry was dropped, not undone
    assert_eq!(stack_at(&document, 0, 0), vec![tiles[0]]);
    assert!(stack_at(&document, 1, 0).is_empty());
}

#[test]
fn test_history_observer_sees_state_changes() {
    struct Recorder {
        log: Vec<(bool, bool)>,
    }

    impl HistoryObserver for Recorder {
        fn history_changed(&mut self, can_undo: bool, can_redo: bool) {
            self.log.push((can_undo, can_redo));
        }
    }

    let (_pool, mut document, tiles) = document();
    let mut history = CommandHistory::new();
    let recorder = Rc::new(RefCell::new(Recorder { log: Vec::new() }));
    let observer: Rc<RefCell<dyn HistoryObserver>> = recorder.clone();
    history.add_observer(&observer);

    history
        .execute(
            Box::new(AddTileCommand::new(0, TileCoord::new(0, 0), tiles[0])),
            &mut document,
        )
        .unwrap();
    history.undo(&mut document).unwrap();
    history.redo(&mut document).unwrap();

    assert_eq!(
        recorder.borrow().log,
        vec![(true, false), (false, true), (true, false)]
    );
}
