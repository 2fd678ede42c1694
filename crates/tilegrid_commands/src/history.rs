//! The undo/redo history

use crate::command::{Command, CommandError};
use crate::document::MapDocument;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Notified whenever the history's shape changes
pub trait HistoryObserver {
    fn history_changed(&mut self, can_undo: bool, can_redo: bool);
}

/// A linear undo/redo history of executed commands.
///
/// Executing a new command invalidates the redo stack. An optional depth
/// limit drops the oldest entries once exceeded.
#[derive(Default)]
pub struct CommandHistory {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    depth_limit: Option<usize>,
    observers: Vec<Weak<RefCell<dyn HistoryObserver>>>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that keeps at most `limit` undoable entries.
    pub fn with_depth_limit(limit: usize) -> Self {
        Self {
            depth_limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|command| command.description())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|command| command.description())
    }

    pub fn add_observer(&mut self, observer: &Rc<RefCell<dyn HistoryObserver>>) {
        self.observers.push(Rc::downgrade(observer));
    }

    /// Execute a command and, on success, push it onto the undo stack.
    ///
    /// A failed command is dropped without touching the history; commands
    /// guarantee the document is unchanged when they fail.
    pub fn execute(
        &mut self,
        mut command: Box<dyn Command>,
        document: &mut MapDocument,
    ) -> Result<(), CommandError> {
        command.execute(document)?;
        debug!(command = command.description(), "executed");
        self.redo_stack.clear();
        self.undo_stack.push(command);
        if let Some(limit) = self.depth_limit {
            while self.undo_stack.len() > limit {
                self.undo_stack.remove(0);
            }
        }
        self.notify();
        Ok(())
    }

    /// Undo the most recent command. Returns false when there is nothing
    /// to undo.
    pub fn undo(&mut self, document: &mut MapDocument) -> Result<bool, CommandError> {
        let Some(mut command) = self.undo_stack.pop() else {
            return Ok(false);
        };
        match command.undo(document) {
            Ok(()) => {
                debug!(command = command.description(), "undone");
                self.redo_stack.push(command);
                self.notify();
                Ok(true)
            }
            Err(err) => {
                self.undo_stack.push(command);
                Err(err)
            }
        }
    }

    /// Redo the most recently undone command. Returns false when there is
    /// nothing to redo.
    pub fn redo(&mut self, document: &mut MapDocument) -> Result<bool, CommandError> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        match command.redo(document) {
            Ok(()) => {
                debug!(command = command.description(), "redone");
                self.undo_stack.push(command);
                self.notify();
                Ok(true)
            }
            Err(err) => {
                self.redo_stack.push(command);
                Err(err)
            }
        }
    }

    /// Drop both stacks, e.g. after loading a different document.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.notify();
    }

    fn notify(&mut self) {
        let (can_undo, can_redo) = (self.can_undo(), self.can_redo());
        self.observers.retain(|observer| {
            if let Some(observer) = observer.upgrade() {
                observer.borrow_mut().history_changed(can_undo, can_redo);
                true
            } else {
                false
            }
        });
    }
}

impl std::fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHistory")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("depth_limit", &self.depth_limit)
            .finish()
    }
}
