//! The board controller: the game's state machine.
//!
//! All mutation happens inside controller calls, on one thread:
//! - Input: `creature_activated`, `cell_activated`, or the `select` /
//!   `deselect` / `move_selected_to` primitives they map to
//! - Time: `advance` / `settle`, which fire scheduled tasks in due order
//!
//! A walk is a chain of scheduled step completions. Each completion commits
//! one step to the grid and only then starts the next animation, so steps
//! never overlap and occupancy always matches the committed position.
//! Cells held by other creatures are crossed without being claimed; the
//! walk commits again at the next free cell and halts only when its
//! destination is taken (or on any blocked step with `BlockedStep::Halt`).

use std::collections::VecDeque;

use thiserror::Error;
use tracing::{debug, instrument, trace, warn};

use crate::board::{compute_path, Grid};
use crate::catalog::{Catalog, ColorId, Shape, ShapeId};
use crate::core::{BlockedStep, Cell, ConfigError, CreatureId, GameConfig, GameRng, GameRngState, IceId, VisualId};
use crate::creatures::{Creature, CreatureState, IceCover, IcePhase};
use crate::exits::ExitRegistry;
use crate::present::{Animator, NullAnimator, NullRenderer, RenderError, Renderer};
use crate::schedule::Scheduler;

use super::event::{BoardEvent, InputEvent};
use super::session::GameSession;

/// Upper bound on tasks fired by one `settle` call.
const SETTLE_LIMIT: usize = 100_000;

/// Deferred work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task {
    /// The in-flight step animation of a walk finished.
    StepDone(CreatureId),
    /// An exit animation finished; drop its visual.
    EliminationDone(CreatureId),
    /// Grace delay over; start melting.
    MeltStart(IceId),
    /// Melt over; resolve the reveal.
    RevealDue(IceId),
    /// Reveal animation finished; draw the creature.
    RevealShown(CreatureId),
}

/// The walk in progress.
#[derive(Clone, Debug)]
struct Walk {
    creature: CreatureId,
    remaining: VecDeque<Cell>,
    in_flight: Option<Cell>,
    /// Where the walker is drawn; ahead of its anchor while passing over others.
    position: Cell,
}

/// Structural invariant violations found by `check_invariants`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// A creature's derived cell is not mapped back to it.
    #[error("{creature} should occupy {cell} but the grid says {found:?}")]
    OccupancyMismatch {
        creature: CreatureId,
        cell: Cell,
        found: Option<CreatureId>,
    },

    /// The grid holds cells for a creature that is not in the set.
    #[error("grid holds {0} which is not a live creature")]
    OrphanPlacement(CreatureId),

    /// More than one creature is in a state that must be unique.
    #[error("{count} creatures are {state}")]
    NotExclusive { state: CreatureState, count: usize },

    /// The recorded selection disagrees with creature states.
    #[error("selection is {recorded:?} but {actual:?} is in the selected state")]
    SelectionMismatch {
        recorded: Option<CreatureId>,
        actual: Option<CreatureId>,
    },
}

/// Orchestrates placement, selection, movement, ice reveals, exits, scoring
/// and levels for one session.
///
/// ## Example
///
/// ```
/// use rust_critters::controller::BoardController;
/// use rust_critters::catalog::{ColorId, ShapeId};
/// use rust_critters::core::{Cell, GameConfig};
///
/// let mut board = BoardController::headless(GameConfig::new(1)).unwrap();
///
/// // Hand-built level: one red dot two rows below the red exit at (0, 1)
/// board.clear_board();
/// board.bind_exit(ColorId::new(0), Cell::new(0, 1));
/// board.set_target(100);
/// let dot = board.place_creature(ShapeId::new(0), ColorId::new(0), Cell::new(2, 1)).unwrap();
///
/// board.creature_activated(dot);
/// board.cell_activated(0, 1);
/// board.settle();
///
/// assert!(board.creature(dot).is_none());
/// assert_eq!(board.score(), 10);
/// ```
pub struct BoardController<R = NullRenderer, A = NullAnimator> {
    config: GameConfig,
    catalog: Catalog,
    session: GameSession,
    timers: Scheduler<Task>,
    placement_rng: GameRng,
    spawn_rng: GameRng,
    renderer: R,
    animator: A,
    walk: Option<Walk>,
    /// Eliminated creatures whose exit animation is still playing.
    departing: Vec<CreatureId>,
    events: Vec<BoardEvent>,
}

impl BoardController<NullRenderer, NullAnimator> {
    /// Headless controller over the standard catalog.
    pub fn headless(config: GameConfig) -> Result<Self, ConfigError> {
        let animator = NullAnimator::new(config.step_ms);
        Self::new(config, Catalog::standard(), NullRenderer, animator)
    }
}

impl<R: Renderer, A: Animator> BoardController<R, A> {
    /// Validate the configuration and lay out level 1.
    pub fn new(config: GameConfig, catalog: Catalog, renderer: R, animator: A) -> Result<Self, ConfigError> {
        config.validate()?;
        catalog.validate()?;

        let root = GameRng::new(config.seed);
        let mut controller = Self {
            session: GameSession::new(config.board_size),
            timers: Scheduler::new(),
            placement_rng: root.for_context("placement"),
            spawn_rng: root.for_context("spawn"),
            config,
            catalog,
            renderer,
            animator,
            walk: None,
            departing: Vec::new(),
            events: Vec::new(),
        };
        controller.initialize_board();
        Ok(controller)
    }

    // === Queries ===

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Piece catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Full session state.
    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Current level.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.session.level()
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.session.score()
    }

    /// Current level target.
    #[must_use]
    pub fn target(&self) -> u32 {
        self.session.target()
    }

    /// Override the current level target.
    pub fn set_target(&mut self, target: u32) {
        self.session.set_target(target);
    }

    /// Get a live creature.
    #[must_use]
    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.session.creature(id)
    }

    /// Live creatures in id order.
    pub fn creatures(&self) -> impl Iterator<Item = &Creature> {
        self.session.creatures()
    }

    /// Live ice covers in id order.
    pub fn ice_covers(&self) -> impl Iterator<Item = &IceCover> {
        self.session.ice_covers()
    }

    /// Exits of the current level.
    #[must_use]
    pub fn exits(&self) -> &ExitRegistry {
        self.session.exits()
    }

    /// The occupancy grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.session.grid()
    }

    /// The selected creature.
    #[must_use]
    pub fn selected(&self) -> Option<CreatureId> {
        self.session.selected()
    }

    /// The walking creature.
    #[must_use]
    pub fn walking(&self) -> Option<CreatureId> {
        self.walk.as_ref().map(|w| w.creature)
    }

    /// Logical clock in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    /// True when nothing is scheduled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.timers.is_empty()
    }

    /// Placement RNG position, for reproducing a layout.
    #[must_use]
    pub fn placement_rng_state(&self) -> GameRngState {
        self.placement_rng.state()
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The animator.
    #[must_use]
    pub fn animator(&self) -> &A {
        &self.animator
    }

    /// Take all events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    // === Placement ===

    /// Lay out a fresh board for the current level.
    ///
    /// Random candidates that do not fit are skipped, never retried.
    #[instrument(skip(self), fields(level = self.session.level()))]
    pub fn initialize_board(&mut self) {
        self.clear_board();
        self.session
            .set_exits(ExitRegistry::for_catalog(&self.catalog, self.config.board_size));

        let mut visible = 0;
        for _ in 0..self.config.visible_count {
            if self.try_place_random(false) {
                visible += 1;
            }
        }
        let mut hidden = 0;
        for _ in 0..self.config.hidden_count {
            if self.try_place_random(true) {
                hidden += 1;
            }
        }
        let mut empty_ice = 0;
        for _ in 0..self.config.empty_ice_count {
            let cell = self.placement_rng.gen_cell(self.config.board_size);
            if self.insert_empty_ice(cell).is_some() {
                empty_ice += 1;
            }
        }

        if self.session.level() == 1 {
            self.session.set_target(visible as u32);
        }

        let creature_ids: Vec<_> = self.session.creatures().map(|c| c.id).collect();
        for id in creature_ids {
            self.present_creature(id);
        }
        let ice_ids: Vec<_> = self.session.ice_covers().map(|c| c.id).collect();
        for id in ice_ids {
            self.present_ice(id);
        }

        debug!(visible, hidden, empty_ice, target = self.session.target(), "board initialized");
        self.events.push(BoardEvent::BoardInitialized {
            level: self.session.level(),
            visible,
            hidden,
            empty_ice,
            target: self.session.target(),
        });
    }

    /// Remove every creature, cover, exit and pending task.
    ///
    /// Level, score and target are kept.
    pub fn clear_board(&mut self) {
        let visuals: Vec<VisualId> = self
            .session
            .creatures()
            .filter(|c| c.is_visible())
            .map(|c| VisualId::Creature(c.id))
            .chain(self.session.ice_covers().map(|c| VisualId::Ice(c.id)))
            .chain(self.departing.drain(..).map(VisualId::Creature))
            .collect();
        for visual in visuals {
            self.remove_visual(visual);
        }

        self.timers.clear();
        self.walk = None;
        self.session.reset();
    }

    /// Place a visible creature of a chosen shape and color.
    ///
    /// Returns `None` if the cells are out of bounds, occupied or iced.
    pub fn place_creature(&mut self, shape: ShapeId, color: ColorId, anchor: Cell) -> Option<CreatureId> {
        let shape = self.catalog.shape(shape)?.clone();
        self.catalog.color(color)?;
        let id = self.place_piece(&shape, color, anchor, false)?;
        self.present_creature(id);
        Some(id)
    }

    /// Place a creature hidden under a new ice cover.
    pub fn place_hidden(&mut self, shape: ShapeId, color: ColorId, anchor: Cell) -> Option<CreatureId> {
        let shape = self.catalog.shape(shape)?.clone();
        self.catalog.color(color)?;
        let id = self.place_piece(&shape, color, anchor, true)?;
        if let Some(ice) = self.session.cover_of(id) {
            self.present_ice(ice);
        }
        Some(id)
    }

    /// Place an empty ice cover on a free cell.
    pub fn place_empty_ice(&mut self, cell: Cell) -> Option<IceId> {
        let id = self.insert_empty_ice(cell)?;
        self.present_ice(id);
        Some(id)
    }

    /// Bind an exit for the current level.
    ///
    /// Panics if `cell` is not on the board edge.
    pub fn bind_exit(&mut self, color: ColorId, cell: Cell) {
        self.session.exits_mut().bind(color, cell);
    }

    fn try_place_random(&mut self, hidden: bool) -> bool {
        let size = self.config.board_size;
        let Some(shape) = self.catalog.random_shape(&mut self.placement_rng).cloned() else {
            return false;
        };
        let Some(color) = self.catalog.random_color(&mut self.placement_rng) else {
            return false;
        };
        let anchor = self.placement_rng.gen_cell(size);
        self.place_piece(&shape, color, anchor, hidden).is_some()
    }

    fn place_piece(&mut self, shape: &Shape, color: ColorId, anchor: Cell, hidden: bool) -> Option<CreatureId> {
        let fits = self.session.grid().can_place(anchor, shape)
            && shape.cells_at(anchor).all(|cell| !self.session.is_iced(cell));
        if !fits {
            debug!(shape = %shape.name, %anchor, hidden, "placement skipped: no room");
            return None;
        }

        let id = self.session.alloc_creature_id();
        if hidden {
            self.session
                .insert_creature(Creature::hidden(id, anchor, shape, color), shape);
            let ice = self.session.alloc_ice_id();
            self.session
                .insert_ice(IceCover::over_creature(ice, id, anchor, shape.cells_at(anchor)));
        } else {
            self.session
                .insert_creature(Creature::idle(id, anchor, shape, color), shape);
        }
        debug!(creature = %id, shape = %shape.name, %anchor, hidden, "placed creature");
        if self.session.exits().exit_for(color).is_none() {
            debug!(creature = %id, %color, "no exit bound for this color");
        }
        Some(id)
    }

    fn insert_empty_ice(&mut self, cell: Cell) -> Option<IceId> {
        if !self.session.grid().is_free(cell) || self.session.is_iced(cell) {
            debug!(%cell, "empty ice skipped: cell taken");
            return None;
        }
        let id = self.session.alloc_ice_id();
        self.session.insert_ice(IceCover::empty(id, cell));
        Some(id)
    }

    // === Input ===

    /// Dispatch a queued input event.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::CreatureActivated(id) => self.creature_activated(id),
            InputEvent::CellActivated { row, col } => self.cell_activated(row, col),
        }
    }

    /// The player activated a creature: select it, or toggle it off.
    #[instrument(skip(self))]
    pub fn creature_activated(&mut self, id: CreatureId) {
        match self.session.creature(id).map(Creature::state) {
            Some(CreatureState::Selected) => {
                self.deselect();
            }
            Some(CreatureState::Idle) => {
                self.select(id);
            }
            state => trace!(?state, "activation ignored"),
        }
    }

    /// The player activated a board position.
    ///
    /// An idle or selected creature's cell activates that creature; a free
    /// on-board cell is a move target; off-board deselects.
    #[instrument(skip(self))]
    pub fn cell_activated(&mut self, row: i32, col: i32) {
        let cell = Cell::new(row, col);
        if !self.session.grid().is_in_bounds(cell) {
            self.deselect();
            return;
        }

        if let Some(occupant) = self.session.grid().occupant_at(cell) {
            if self.session.creature(occupant).is_some_and(Creature::is_interactable) {
                self.creature_activated(occupant);
            } else {
                trace!(%cell, "activation ignored: occupant not interactable");
            }
            return;
        }

        if self.session.selected().is_some() {
            self.move_selected_to(cell);
        }
    }

    /// Make `id` the selection.
    ///
    /// No-op unless the creature is idle. Any previous selection returns to
    /// idle first.
    pub fn select(&mut self, id: CreatureId) -> bool {
        if self.session.creature(id).map(Creature::state) != Some(CreatureState::Idle) {
            trace!(creature = %id, "select ignored: not idle");
            return false;
        }

        self.deselect();
        if let Some(creature) = self.session.creature_mut(id) {
            creature.transition(CreatureState::Selected);
        }
        self.session.set_selected(Some(id));
        debug!(creature = %id, "selected");
        self.events.push(BoardEvent::Selected(id));
        self.present_creature(id);
        true
    }

    /// Return the selected creature, if any, to idle.
    pub fn deselect(&mut self) -> bool {
        let Some(id) = self.session.selected() else {
            return false;
        };

        self.session.set_selected(None);
        if let Some(creature) = self.session.creature_mut(id) {
            creature.transition(CreatureState::Idle);
        }
        debug!(creature = %id, "deselected");
        self.events.push(BoardEvent::Deselected(id));
        self.present_creature(id);
        true
    }

    /// Walk the selected creature to `target`.
    ///
    /// Silently ignored without a selection, while another creature walks,
    /// or for an off-board target. Returns `true` if a walk started; an
    /// empty path drops the selection and returns `false`.
    #[instrument(skip(self))]
    pub fn move_selected_to(&mut self, target: Cell) -> bool {
        let Some(id) = self.session.selected() else {
            trace!("move ignored: nothing selected");
            return false;
        };
        if self.walk.is_some() {
            trace!("move ignored: a walk is in progress");
            return false;
        }
        if !self.session.grid().is_in_bounds(target) {
            trace!("move ignored: target off the board");
            return false;
        }
        let Some(from) = self.session.creature(id).map(|c| c.anchor) else {
            return false;
        };

        self.session.set_selected(None);
        if let Some(creature) = self.session.creature_mut(id) {
            creature.transition(CreatureState::Walking);
        }

        let path = compute_path(from, target);
        if path.is_empty() {
            debug!(creature = %id, "empty path; back to idle");
            self.settle_idle(id);
            return false;
        }

        debug!(creature = %id, %from, %target, steps = path.len(), "walk started");
        self.events.push(BoardEvent::MoveStarted {
            creature: id,
            from,
            to: target,
            steps: path.len(),
        });
        self.walk = Some(Walk {
            creature: id,
            remaining: path.into(),
            in_flight: None,
            position: from,
        });
        self.start_next_step();
        true
    }

    // === Time ===

    /// Move the clock forward, firing everything that falls due.
    ///
    /// Returns the number of tasks fired.
    #[instrument(skip(self))]
    pub fn advance(&mut self, elapsed_ms: u64) -> usize {
        let until = self.timers.now().saturating_add(elapsed_ms);
        let mut fired = 0;
        while let Some(entry) = self.timers.pop_due(until) {
            self.dispatch(entry.payload);
            fired += 1;
        }
        self.timers.advance_clock(until);
        fired
    }

    /// Run the clock until nothing is scheduled.
    pub fn settle(&mut self) -> usize {
        let mut fired = 0;
        while let Some(due) = self.timers.next_due() {
            if fired >= SETTLE_LIMIT {
                warn!(fired, "settle limit reached; tasks still pending");
                break;
            }
            fired += self.advance(due.saturating_sub(self.timers.now()));
        }
        fired
    }

    fn dispatch(&mut self, task: Task) {
        trace!(?task, now = self.timers.now(), "task fired");
        match task {
            Task::StepDone(id) => self.on_step_done(id),
            Task::EliminationDone(id) => {
                self.departing.retain(|&d| d != id);
                self.remove_visual(VisualId::Creature(id));
            }
            Task::MeltStart(ice) => self.on_melt_start(ice),
            Task::RevealDue(ice) => self.on_reveal_due(ice),
            Task::RevealShown(id) => self.present_creature(id),
        }
    }

    // === Movement ===

    fn start_next_step(&mut self) {
        let Some(walk) = self.walk.as_mut() else {
            return;
        };
        let Some(next) = walk.remaining.pop_front() else {
            return;
        };
        walk.in_flight = Some(next);
        let id = walk.creature;
        let from = walk.position;

        let Some(creature) = self.session.creature_mut(id) else {
            warn!(creature = %id, "walking creature vanished");
            self.walk = None;
            return;
        };
        creature.animating = true;
        let creature = creature.clone();

        let duration = self.animator.play_step_move(&creature, from, next);
        self.timers.schedule(duration, Task::StepDone(id));
    }

    fn on_step_done(&mut self, id: CreatureId) {
        let Some(walk) = self.walk.as_mut().filter(|w| w.creature == id) else {
            warn!(creature = %id, "stale step completion");
            return;
        };
        let Some(to) = walk.in_flight.take() else {
            return;
        };
        walk.position = to;
        let last = walk.remaining.is_empty();
        let Some(shape) = self.shape_of(id) else {
            self.walk = None;
            return;
        };
        let Some(creature) = self.session.creature_mut(id) else {
            self.walk = None;
            return;
        };
        creature.animating = false;
        let from = creature.anchor;

        if !self.session.relocate(id, to, &shape) {
            if !last && self.config.blocked_step == BlockedStep::PassThrough {
                trace!(creature = %id, cell = %to, "passing over occupied cell");
                self.events.push(BoardEvent::PassedOver { creature: id, cell: to });
                self.start_next_step();
                return;
            }
            debug!(creature = %id, at = %from, blocked = %to, "step blocked; walk halted");
            self.events.push(BoardEvent::MoveHalted {
                creature: id,
                at: from,
                blocked: to,
            });
            self.finish_walk(id);
            return;
        }

        trace!(creature = %id, %from, %to, "step committed");
        self.events.push(BoardEvent::Stepped { creature: id, from, to });
        self.present_creature(id);
        self.claim_cells(id);

        if last {
            self.finish_walk(id);
        } else {
            self.start_next_step();
        }
    }

    fn finish_walk(&mut self, id: CreatureId) {
        self.walk = None;
        let Some(creature) = self.session.creature(id).cloned() else {
            return;
        };

        let on_exit = self.session.grid().is_edge(creature.anchor)
            && self.session.exits().matches(creature.anchor, creature.color);
        if on_exit {
            self.eliminate(id);
        } else {
            self.settle_idle(id);
        }

        self.deselect();
    }

    fn settle_idle(&mut self, id: CreatureId) {
        let Some(creature) = self.session.creature_mut(id) else {
            return;
        };
        creature.transition(CreatureState::Idle);
        creature.animating = false;
        let at = creature.anchor;
        self.events.push(BoardEvent::MoveFinished { creature: id, at });
        self.present_creature(id);
    }

    fn eliminate(&mut self, id: CreatureId) {
        let Some(mut creature) = self.session.remove_creature(id) else {
            return;
        };
        creature.transition(CreatureState::Eliminated);
        creature.animating = false;

        let score = self.session.add_score(self.config.score_reward);
        debug!(creature = %id, at = %creature.anchor, score, "eliminated");
        self.events.push(BoardEvent::Eliminated {
            creature: id,
            color: creature.color,
            at: creature.anchor,
            score,
        });

        let duration = self.animator.play_elimination(&creature);
        self.departing.push(id);
        self.timers.schedule(duration, Task::EliminationDone(id));

        self.schedule_reveal(creature.anchor);

        if self.session.is_level_complete() {
            self.advance_level();
        }
    }

    fn advance_level(&mut self) {
        self.clear_board();
        let level = self.session.advance_level(&self.config.level_target);
        self.events.push(BoardEvent::LevelAdvanced {
            level,
            target: self.session.target(),
        });
        self.initialize_board();
    }

    // === Ice ===

    fn schedule_reveal(&mut self, cell: Cell) {
        let Some(ice) = self.session.ice_for_reveal(cell, self.config.reveal_scope) else {
            debug!(%cell, scope = ?self.config.reveal_scope, "no ice to reveal");
            return;
        };
        let token = self.timers.schedule(self.config.reveal_grace_ms, Task::MeltStart(ice));
        if let Some(cover) = self.session.ice_mut(ice) {
            cover.arm(token, IcePhase::Frozen);
        }
        debug!(%ice, %cell, "reveal scheduled");
    }

    fn on_melt_start(&mut self, ice: IceId) {
        let Some(cover) = self.session.ice_mut(ice) else {
            return;
        };
        let token = self.timers.schedule(self.config.ice_melt_ms, Task::RevealDue(ice));
        cover.arm(token, IcePhase::Melting);
        self.events.push(BoardEvent::IceMelting { ice });
        self.present_ice(ice);
    }

    fn on_reveal_due(&mut self, ice: IceId) {
        let Some(cover) = self.session.remove_ice(ice) else {
            return;
        };
        self.remove_visual(VisualId::Ice(ice));

        let hidden = cover.creature.filter(|&id| {
            self.session
                .creature(id)
                .is_some_and(|c| c.state() == CreatureState::Hidden)
        });
        match hidden {
            Some(id) => {
                let Some(creature) = self.session.creature_mut(id) else {
                    return;
                };
                creature.transition(CreatureState::Idle);
                let creature = creature.clone();
                debug!(creature = %id, %ice, "revealed");
                self.events.push(BoardEvent::Revealed { creature: id, ice });
                let duration = self.animator.play_reveal(&creature);
                self.timers.schedule(duration, Task::RevealShown(id));
            }
            None => self.spawn_from_ice(&cover),
        }
    }

    fn spawn_from_ice(&mut self, cover: &IceCover) {
        let Some(shape) = self.catalog.smallest_shape().cloned() else {
            return;
        };
        let Some(color) = self.catalog.random_color(&mut self.spawn_rng) else {
            return;
        };
        if !self.session.grid().can_place(cover.anchor, &shape) {
            debug!(ice = %cover.id, cell = %cover.anchor, "spawn skipped: cell taken");
            self.events.push(BoardEvent::RevealFizzled { ice: cover.id });
            return;
        }

        let id = self.session.alloc_creature_id();
        let creature = Creature::idle(id, cover.anchor, &shape, color);
        self.session.insert_creature(creature.clone(), &shape);
        debug!(creature = %id, ice = %cover.id, "spawned from ice");
        self.events.push(BoardEvent::Spawned {
            creature: id,
            ice: cover.id,
        });
        let duration = self.animator.play_reveal(&creature);
        self.timers.schedule(duration, Task::RevealShown(id));
    }

    /// Withdraw pending reveals of empty ice under a creature's new cells.
    fn claim_cells(&mut self, id: CreatureId) {
        if !self.config.cancel_reveal_on_reoccupy {
            return;
        }
        let cells = self.session.grid().cells_of(id).to_vec();
        for ice in self.session.pending_empty_ice_on(&cells) {
            if let Some(token) = self.session.ice_mut(ice).and_then(IceCover::disarm) {
                self.timers.cancel(token);
            }
            debug!(%ice, creature = %id, "reveal cancelled: cell claimed");
            self.events.push(BoardEvent::RevealCancelled { ice });
            self.present_ice(ice);
        }
    }

    // === Presentation ===

    fn shape_of(&self, id: CreatureId) -> Option<Shape> {
        let creature = self.session.creature(id)?;
        self.catalog.shape(creature.shape).cloned()
    }

    fn present_creature(&mut self, id: CreatureId) {
        let Some(creature) = self.session.creature(id).filter(|c| c.is_visible()) else {
            return;
        };
        let result = self.renderer.present(creature);
        report(result, "present");
    }

    fn present_ice(&mut self, id: IceId) {
        let Some(cover) = self.session.ice(id) else {
            return;
        };
        let result = self.renderer.present_ice(cover);
        report(result, "present_ice");
    }

    fn remove_visual(&mut self, id: VisualId) {
        let result = self.renderer.remove_visual(id);
        report(result, "remove_visual");
    }

    // === Diagnostics ===

    /// Verify the structural invariants of the board.
    ///
    /// - Every live creature's derived cells map back to it, and the grid
    ///   holds nothing else
    /// - At most one creature is selected and at most one walks
    /// - The recorded selection matches creature states
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let grid = self.session.grid();
        for creature in self.session.creatures() {
            let shape = self.catalog.shape_unchecked(creature.shape);
            for cell in creature.cells(shape) {
                let found = grid.occupant_at(cell);
                if found != Some(creature.id) {
                    return Err(InvariantError::OccupancyMismatch {
                        creature: creature.id,
                        cell,
                        found,
                    });
                }
            }
        }
        if grid.placed_count() != self.session.creature_count() {
            let orphan = grid
                .occupants()
                .map(|(_, id)| id)
                .find(|id| self.session.creature(*id).is_none());
            if let Some(id) = orphan {
                return Err(InvariantError::OrphanPlacement(id));
            }
        }

        for state in [CreatureState::Selected, CreatureState::Walking] {
            let count = self.session.creatures_in(state).count();
            if count > 1 {
                return Err(InvariantError::NotExclusive { state, count });
            }
        }

        let actual = self.session.creatures_in(CreatureState::Selected).map(|c| c.id).next();
        if actual != self.session.selected() {
            return Err(InvariantError::SelectionMismatch {
                recorded: self.session.selected(),
                actual,
            });
        }
        Ok(())
    }
}

fn report(result: Result<(), RenderError>, action: &'static str) {
    if let Err(error) = result {
        warn!(%error, action, "renderer failed; continuing");
    }
}
