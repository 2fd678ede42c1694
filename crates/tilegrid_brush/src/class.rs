//! Brush classes - the rule tables behind autotiling
//!
//! A brush class defines, for each slot of a dynamic brush's template,
//! which of the eight compass neighbors must contain a member tile for that
//! slot to be selected. Classes are immutable data shared by every dynamic
//! brush of a kind; rule registration order matters (exact score ties keep
//! the earliest-registered rule).

use std::collections::HashMap;
use std::rc::Rc;

/// Number of compass neighbors around a cell
pub const NEIGHBOR_COUNT: usize = 8;

/// Neighbor offsets clockwise from northwest, y-down:
///   0 1 2
///   7 X 3
///   6 5 4
pub const NEIGHBOR_OFFSETS: [(i32, i32); NEIGHBOR_COUNT] = [
    (-1, -1), // 0 = northwest
    (0, -1),  // 1 = north
    (1, -1),  // 2 = northeast
    (1, 0),   // 3 = east
    (1, 1),   // 4 = southeast
    (0, 1),   // 5 = south
    (-1, 1),  // 6 = southwest
    (-1, 0),  // 7 = west
];

/// Bit for the north neighbor in a membership mask
pub const NEIGHBOR_N: u8 = 1 << 1;
/// Bit for the east neighbor
pub const NEIGHBOR_E: u8 = 1 << 3;
/// Bit for the south neighbor
pub const NEIGHBOR_S: u8 = 1 << 5;
/// Bit for the west neighbor
pub const NEIGHBOR_W: u8 = 1 << 7;

/// One autotile rule: if the required neighbors are present, the slot is a
/// candidate; the best-scoring candidate wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRule {
    /// Template slot selected when this rule wins
    pub slot: usize,
    /// Bitmask over the 8 neighbor positions; a set bit means that
    /// neighbor must hold a member tile, an unset bit is a don't-care.
    pub required: u8,
}

/// A named, immutable autotile rule table.
#[derive(Debug, Clone)]
pub struct BrushClass {
    name: String,
    slot_count: usize,
    default_slot: usize,
    rules: Vec<SlotRule>,
}

impl BrushClass {
    /// Create an empty class with `slot_count` template slots.
    ///
    /// `default_slot` is the fallback used when no rule scores above zero,
    /// conventionally the isolated-tile template.
    pub fn new(name: impl Into<String>, slot_count: usize, default_slot: usize) -> Self {
        debug_assert!(default_slot < slot_count);
        Self {
            name: name.into(),
            slot_count,
            default_slot,
            rules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn default_slot(&self) -> usize {
        self.default_slot
    }

    pub fn rules(&self) -> &[SlotRule] {
        &self.rules
    }

    /// Register a rule. Registration order is significant: an exact score
    /// tie keeps the earlier rule.
    pub fn add_rule(&mut self, slot: usize, required: u8) {
        debug_assert!(slot < self.slot_count);
        self.rules.push(SlotRule { slot, required });
    }

    /// Score a rule against the actual neighbor membership mask.
    ///
    /// One point per position where the rule's expectation matches the
    /// actual state; zero (disqualified) if any required neighbor is
    /// absent. Required-neighbor constraints are strict, unset bits are
    /// don't-cares that still score when the neighbor is absent.
    pub fn match_strength(rule: &SlotRule, neighbors: u8) -> u32 {
        if rule.required & !neighbors != 0 {
            return 0;
        }
        let mut strength = 0;
        for i in 0..NEIGHBOR_COUNT {
            let bit = 1u8 << i;
            if (rule.required & bit) == (neighbors & bit) {
                strength += 1;
            }
        }
        strength
    }

    /// Select the template slot for a neighbor membership mask.
    ///
    /// Evaluates every rule, keeping the strictly best score seen so far
    /// (ties keep the earliest-registered rule). Falls back to the default
    /// slot when nothing scores above zero.
    pub fn select_slot(&self, neighbors: u8) -> usize {
        let mut best_strength = 0;
        let mut best_slot = self.default_slot;
        for rule in &self.rules {
            let strength = Self::match_strength(rule, neighbors);
            if strength > best_strength {
                best_strength = strength;
                best_slot = rule.slot;
            }
        }
        best_slot
    }

    /// The classic 16-slot edge-combination class.
    ///
    /// Slot index is the bitmask of which edge neighbors (N=1, E=2, S=4,
    /// W=8) hold member tiles; slot 0 is the isolated tile and doubles as
    /// the default.
    pub fn edge_16() -> Self {
        let mut class = Self::new("edge16", 16, 0);
        for combo in 0..16usize {
            let mut required = 0u8;
            if combo & 1 != 0 {
                required |= NEIGHBOR_N;
            }
            if combo & 2 != 0 {
                required |= NEIGHBOR_E;
            }
            if combo & 4 != 0 {
                required |= NEIGHBOR_S;
            }
            if combo & 8 != 0 {
                required |= NEIGHBOR_W;
            }
            class.add_rule(combo, required);
        }
        class
    }
}

/// An explicit, session-owned registry of brush classes.
///
/// Passed to whichever component constructs dynamic brushes; there is no
/// process-wide registry.
#[derive(Debug, Default)]
pub struct BrushClassRegistry {
    classes: HashMap<String, Rc<BrushClass>>,
}

impl BrushClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in classes
    pub fn with_builtin_classes() -> Self {
        let mut registry = Self::new();
        registry.register(BrushClass::edge_16());
        registry
    }

    /// Register a class under its own name, replacing any previous class
    /// with that name.
    pub fn register(&mut self, class: BrushClass) -> Rc<BrushClass> {
        let shared = Rc::new(class);
        self.classes
            .insert(shared.name().to_string(), shared.clone());
        shared
    }

    pub fn get(&self, name: &str) -> Option<Rc<BrushClass>> {
        self.classes.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
