//! Game session: everything that lives for one level.
//!
//! ## GameSession
//!
//! - Level, score and the level's target
//! - The occupancy grid and the live creature set
//! - Ice covers and exits
//! - The current selection
//!
//! The session enforces the structural invariants on its own: every creature
//! in the set is placed on the grid and nothing else is. Rules (what may be
//! selected, when to eliminate) live in the controller.

use im::OrdMap;
use tracing::debug;

use crate::board::Grid;
use crate::catalog::Shape;
use crate::core::{Cell, CreatureId, IceId, LevelTargetFormula, RevealScope};
use crate::creatures::{Creature, CreatureState, IceCover};
use crate::exits::ExitRegistry;

/// State of one game session.
///
/// Uses `im` ordered maps so the session clones in O(1) and iterates in id
/// order.
#[derive(Clone, Debug)]
pub struct GameSession {
    level: u32,
    score: u32,
    target: u32,

    grid: Grid,
    creatures: OrdMap<CreatureId, Creature>,
    ice: OrdMap<IceId, IceCover>,
    exits: ExitRegistry,

    selected: Option<CreatureId>,

    next_creature: u32,
    next_ice: u32,
}

impl GameSession {
    /// Create an empty level-1 session for a `size × size` board.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            level: 1,
            score: 0,
            target: 0,
            grid: Grid::new(size),
            creatures: OrdMap::new(),
            ice: OrdMap::new(),
            exits: ExitRegistry::new(size),
            selected: None,
            next_creature: 0,
            next_ice: 0,
        }
    }

    // === Progression ===

    /// Current level (starts at 1).
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Score in the current level.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Score needed to complete the current level.
    #[must_use]
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Override the current level's target.
    pub fn set_target(&mut self, target: u32) {
        self.target = target;
    }

    /// Add to the score and return the new total.
    pub fn add_score(&mut self, amount: u32) -> u32 {
        self.score = self.score.saturating_add(amount);
        self.score
    }

    /// Check whether the level target is met.
    #[must_use]
    pub fn is_level_complete(&self) -> bool {
        self.score >= self.target
    }

    /// Empty the board. Level, score and target are kept.
    pub fn reset(&mut self) {
        let size = self.grid.size();
        self.grid.clear();
        self.creatures = OrdMap::new();
        self.ice = OrdMap::new();
        self.exits = ExitRegistry::new(size);
        self.selected = None;
    }

    /// Move to the next level: bump the level, recompute the target, zero the
    /// score and empty the board.
    ///
    /// Returns the new level.
    pub fn advance_level(&mut self, formula: &LevelTargetFormula) -> u32 {
        self.level += 1;
        self.target = formula.target_for(self.level);
        self.score = 0;
        self.reset();
        debug!(level = self.level, target = self.target, "advanced level");
        self.level
    }

    // === Board ===

    /// The occupancy grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Board edge length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// The level's exits.
    #[must_use]
    pub fn exits(&self) -> &ExitRegistry {
        &self.exits
    }

    /// Replace the level's exits.
    pub fn set_exits(&mut self, exits: ExitRegistry) {
        self.exits = exits;
    }

    /// Mutable exits, for binding level-specific positions.
    pub fn exits_mut(&mut self) -> &mut ExitRegistry {
        &mut self.exits
    }

    // === Creatures ===

    /// Allocate a fresh creature id.
    pub fn alloc_creature_id(&mut self) -> CreatureId {
        let id = CreatureId(self.next_creature);
        self.next_creature += 1;
        id
    }

    /// Allocate a fresh ice id.
    pub fn alloc_ice_id(&mut self) -> IceId {
        let id = IceId(self.next_ice);
        self.next_ice += 1;
        id
    }

    /// Get a creature by id.
    #[must_use]
    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.get(&id)
    }

    /// Get a mutable creature by id.
    pub fn creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.get_mut(&id)
    }

    /// Live creatures in id order.
    pub fn creatures(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.values()
    }

    /// Number of live creatures.
    #[must_use]
    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }

    /// Creatures in a given state.
    pub fn creatures_in(&self, state: CreatureState) -> impl Iterator<Item = &Creature> {
        self.creatures.values().filter(move |c| c.state() == state)
    }

    /// Place a creature on the grid and add it to the set.
    ///
    /// Panics if the placement is invalid (see `Grid::place`).
    pub fn insert_creature(&mut self, creature: Creature, shape: &Shape) {
        self.grid.place(creature.id, creature.anchor, shape);
        self.creatures.insert(creature.id, creature);
    }

    /// Remove a creature from the grid and the set.
    pub fn remove_creature(&mut self, id: CreatureId) -> Option<Creature> {
        self.grid.vacate(id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.creatures.remove(&id)
    }

    /// Move a placed creature's occupancy to a new anchor.
    ///
    /// Returns `false` (and changes nothing) if the new cells are out of
    /// bounds or held by another creature.
    pub fn relocate(&mut self, id: CreatureId, to: Cell, shape: &Shape) -> bool {
        if !self.creatures.contains_key(&id) || !self.grid.can_place_ignoring(to, shape, id) {
            return false;
        }
        self.grid.vacate(id);
        self.grid.place(id, to, shape);
        if let Some(creature) = self.creatures.get_mut(&id) {
            creature.anchor = to;
        }
        true
    }

    // === Selection ===

    /// The selected creature, if any.
    #[must_use]
    pub fn selected(&self) -> Option<CreatureId> {
        self.selected
    }

    /// Record the selection.
    pub fn set_selected(&mut self, id: Option<CreatureId>) {
        self.selected = id;
    }

    // === Ice ===

    /// Get a cover by id.
    #[must_use]
    pub fn ice(&self, id: IceId) -> Option<&IceCover> {
        self.ice.get(&id)
    }

    /// Get a mutable cover by id.
    pub fn ice_mut(&mut self, id: IceId) -> Option<&mut IceCover> {
        self.ice.get_mut(&id)
    }

    /// Live covers in id order.
    pub fn ice_covers(&self) -> impl Iterator<Item = &IceCover> {
        self.ice.values()
    }

    /// Add a cover.
    pub fn insert_ice(&mut self, cover: IceCover) {
        self.ice.insert(cover.id, cover);
    }

    /// Remove a cover.
    pub fn remove_ice(&mut self, id: IceId) -> Option<IceCover> {
        self.ice.remove(&id)
    }

    /// Check whether any cover spans `cell`.
    #[must_use]
    pub fn is_iced(&self, cell: Cell) -> bool {
        self.ice.values().any(|c| c.covers(cell))
    }

    /// The cover a reveal at `cell` resolves, if any.
    ///
    /// Covers with a reveal already pending are skipped. With
    /// `RevealScope::VacatedCell` only a cover spanning `cell` qualifies.
    /// With `RevealScope::Nearest` the cover whose footprint is nearest by
    /// Manhattan distance wins, ties going to the anchor first in row-major
    /// order.
    #[must_use]
    pub fn ice_for_reveal(&self, cell: Cell, scope: RevealScope) -> Option<IceId> {
        let idle = self.ice.values().filter(|c| !c.is_pending());
        match scope {
            RevealScope::VacatedCell => idle.filter(|c| c.covers(cell)).map(|c| c.id).next(),
            RevealScope::Nearest => idle
                .map(|c| (c.distance_to(cell), c.anchor, c.id))
                .min()
                .map(|(_, _, id)| id),
        }
    }

    /// Pending empty covers spanning any of `cells`.
    #[must_use]
    pub fn pending_empty_ice_on(&self, cells: &[Cell]) -> Vec<IceId> {
        self.ice
            .values()
            .filter(|c| c.creature.is_none() && c.is_pending())
            .filter(|c| cells.iter().any(|&cell| c.covers(cell)))
            .map(|c| c.id)
            .collect()
    }

    /// The cover over a creature, if any.
    #[must_use]
    pub fn cover_of(&self, creature: CreatureId) -> Option<IceId> {
        self.ice
            .values()
            .find(|c| c.creature == Some(creature))
            .map(|c| c.id)
    }
}
