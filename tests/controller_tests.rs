//! Board controller integration tests.
//!
//! End-to-end play: selection, walks, exits, ice reveals, level progression
//! and determinism, driven through input events and the logical clock.

use proptest::prelude::*;

use rust_critters::catalog::{Catalog, ColorId, ShapeId};
use rust_critters::controller::{BoardController, BoardEvent, InputEvent};
use rust_critters::core::{Cell, CreatureId, GameConfig, VisualId};
use rust_critters::creatures::{Creature, CreatureState, IceCover};
use rust_critters::present::{Animator, NullAnimator, RecordingRenderer, RenderError, Renderer};

const DOT: ShapeId = ShapeId::new(0);
const RED: ColorId = ColorId::new(0);
const BLUE: ColorId = ColorId::new(1);
const RED_EXIT: Cell = Cell { row: 0, col: 1 };

/// Route engine logs to the test harness; `RUST_LOG=rust_critters=debug` to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Headless 12x12 board with nothing on it and an unreachable target.
fn empty_board(config: GameConfig) -> BoardController {
    init_tracing();
    let mut board = BoardController::headless(config).unwrap();
    board.clear_board();
    board.bind_exit(RED, RED_EXIT);
    board.set_target(1000);
    board.drain_events();
    board
}

/// Renderer whose every call fails.
struct BrokenRenderer;

impl Renderer for BrokenRenderer {
    fn present(&mut self, _creature: &Creature) -> Result<(), RenderError> {
        Err(RenderError::Backend("device lost".into()))
    }

    fn present_ice(&mut self, _cover: &IceCover) -> Result<(), RenderError> {
        Err(RenderError::Backend("device lost".into()))
    }

    fn remove_visual(&mut self, id: VisualId) -> Result<(), RenderError> {
        Err(RenderError::MissingVisual(id))
    }
}

fn walk<R: Renderer, A: Animator>(board: &mut BoardController<R, A>, id: CreatureId, to: Cell) {
    board.creature_activated(id);
    board.cell_activated(to.row, to.col);
}

// =============================================================================
// Movement and Exit Tests
// =============================================================================

/// Test that a move to the creature's own cell is a no-op.
#[test]
fn test_empty_path_is_noop() {
    let mut board = empty_board(GameConfig::new(1));
    let red = board.place_creature(DOT, RED, RED_EXIT).unwrap();

    board.select(red);
    assert!(!board.move_selected_to(RED_EXIT));
    board.settle();

    let creature = board.creature(red).unwrap();
    assert_eq!(creature.state(), CreatureState::Idle);
    assert_eq!(creature.anchor, RED_EXIT);
    assert_eq!(board.score(), 0);
}

/// Test that walking onto the matching exit eliminates and scores.
#[test]
fn test_matching_exit_eliminates() {
    let mut board = empty_board(GameConfig::new(1));
    let red = board.place_creature(DOT, RED, Cell::new(4, 1)).unwrap();

    walk(&mut board, red, RED_EXIT);
    board.settle();

    assert!(board.creature(red).is_none());
    assert_eq!(board.score(), 10);
    assert!(board.grid().is_free(RED_EXIT));
    assert_eq!(board.selected(), None);

    let events = board.drain_events();
    let eliminations: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, BoardEvent::Eliminated { .. }))
        .collect();
    assert_eq!(eliminations.len(), 1);
    assert!(matches!(
        eliminations[0],
        BoardEvent::Eliminated { creature, at, score: 10, .. } if *creature == red && *at == RED_EXIT
    ));
}

/// Test that a mismatched color on an exit stays on the board.
#[test]
fn test_wrong_color_exit_keeps_creature() {
    let mut board = empty_board(GameConfig::new(1));
    let blue = board.place_creature(DOT, BLUE, Cell::new(3, 1)).unwrap();

    for _ in 0..3 {
        walk(&mut board, blue, RED_EXIT);
        board.settle();
        assert_eq!(board.creature(blue).unwrap().state(), CreatureState::Idle);

        walk(&mut board, blue, Cell::new(3, 1));
        board.settle();
    }
    assert_eq!(board.score(), 0);
}

/// Test that an edge cell without an exit never eliminates.
#[test]
fn test_edge_without_exit_keeps_creature() {
    let mut board = empty_board(GameConfig::new(1));
    let red = board.place_creature(DOT, RED, Cell::new(5, 5)).unwrap();

    for target in [Cell::new(0, 5), Cell::new(0, 11), Cell::new(11, 11)] {
        walk(&mut board, red, target);
        board.settle();
        let creature = board.creature(red).unwrap();
        assert_eq!(creature.anchor, target);
        assert_eq!(creature.state(), CreatureState::Idle);
    }
    assert_eq!(board.score(), 0);
}

/// Test that passing over an exit mid-walk does not eliminate.
#[test]
fn test_exit_only_checked_at_end_of_walk() {
    let mut board = empty_board(GameConfig::new(1));
    let red = board.place_creature(DOT, RED, Cell::new(0, 0)).unwrap();

    walk(&mut board, red, Cell::new(0, 3));
    board.settle();

    assert_eq!(board.creature(red).unwrap().anchor, Cell::new(0, 3));
    assert_eq!(board.score(), 0);
}

/// Test that a walk crosses a creature in its path and ends on the target.
#[test]
fn test_walk_passes_over_obstacle() {
    let mut board = empty_board(GameConfig::new(1));
    let walker = board.place_creature(DOT, BLUE, Cell::new(3, 3)).unwrap();
    let other = board.place_creature(DOT, BLUE, Cell::new(5, 3)).unwrap();

    walk(&mut board, walker, Cell::new(7, 3));
    board.settle();

    let creature = board.creature(walker).unwrap();
    assert_eq!(creature.anchor, Cell::new(7, 3));
    assert_eq!(creature.state(), CreatureState::Idle);
    assert_eq!(board.grid().occupant_at(Cell::new(5, 3)), Some(other));
    assert_eq!(board.grid().occupant_at(Cell::new(7, 3)), Some(walker));
    assert!(board
        .drain_events()
        .iter()
        .any(|e| *e == BoardEvent::PassedOver { creature: walker, cell: Cell::new(5, 3) }));
    assert!(board.check_invariants().is_ok());
}

/// Test that an obstacle between a creature and its exit does not stop it.
#[test]
fn test_walk_over_obstacle_reaches_exit() {
    let mut board = empty_board(GameConfig::new(1));
    let red = board.place_creature(DOT, RED, Cell::new(6, 1)).unwrap();
    let wall = board.place_creature(DOT, BLUE, Cell::new(3, 1)).unwrap();

    walk(&mut board, red, RED_EXIT);
    board.settle();

    assert!(board.creature(red).is_none());
    assert_eq!(board.creature(wall).unwrap().anchor, Cell::new(3, 1));
    assert_eq!(board.score(), 10);
    assert!(board.check_invariants().is_ok());
}

/// Test that a taken destination halts the walk at the last free cell.
#[test]
fn test_walk_halts_when_destination_taken() {
    let mut board = empty_board(GameConfig::new(1));
    let red = board.place_creature(DOT, RED, Cell::new(6, 1)).unwrap();
    let wall = board.place_creature(DOT, BLUE, Cell::new(3, 1)).unwrap();

    board.select(red);
    assert!(board.move_selected_to(Cell::new(3, 1)));
    board.settle();

    assert_eq!(board.creature(red).unwrap().anchor, Cell::new(4, 1));
    assert_eq!(board.creature(red).unwrap().state(), CreatureState::Idle);
    assert_eq!(board.creature(wall).unwrap().anchor, Cell::new(3, 1));
    assert!(board.drain_events().iter().any(|e| *e
        == BoardEvent::MoveHalted {
            creature: red,
            at: Cell::new(4, 1),
            blocked: Cell::new(3, 1)
        }));
    assert!(board.check_invariants().is_ok());
}

/// Test that halting walks stop in front of the first obstacle.
#[test]
fn test_blocked_walk_halts_before_obstacle() {
    let mut board = empty_board(GameConfig::new(1).with_halting_walks());
    let red = board.place_creature(DOT, RED, Cell::new(6, 1)).unwrap();
    let wall = board.place_creature(DOT, BLUE, Cell::new(3, 1)).unwrap();

    walk(&mut board, red, RED_EXIT);
    board.settle();

    assert_eq!(board.creature(red).unwrap().anchor, Cell::new(4, 1));
    assert_eq!(board.creature(wall).unwrap().anchor, Cell::new(3, 1));
    assert_eq!(board.score(), 0);
    assert!(board.check_invariants().is_ok());
}

// =============================================================================
// Selection Tests
// =============================================================================

/// Test that at most one creature is ever selected.
#[test]
fn test_at_most_one_selected() {
    let mut board = empty_board(GameConfig::new(1));
    let ids: Vec<_> = (0..4)
        .map(|i| board.place_creature(DOT, BLUE, Cell::new(2 + i, 4)).unwrap())
        .collect();

    for &id in ids.iter().chain(ids.iter().rev().skip(1)) {
        board.handle_input(InputEvent::CreatureActivated(id));
        assert_eq!(board.session().creatures_in(CreatureState::Selected).count(), 1);
        assert_eq!(board.selected(), Some(id));
    }
}

/// Test that hidden creatures ignore activation.
#[test]
fn test_hidden_creature_is_not_interactable() {
    let mut board = empty_board(GameConfig::new(1));
    let hidden = board.place_hidden(DOT, BLUE, Cell::new(5, 5)).unwrap();

    board.creature_activated(hidden);
    board.cell_activated(5, 5);

    assert_eq!(board.selected(), None);
    assert_eq!(board.creature(hidden).unwrap().state(), CreatureState::Hidden);
}

// =============================================================================
// Ice Tests
// =============================================================================

/// Test that a reveal only resolves ice spanning the vacated cell.
#[test]
fn test_reveal_ignores_ice_elsewhere() {
    let mut board = empty_board(GameConfig::new(1));
    let red = board.place_creature(DOT, RED, Cell::new(2, 1)).unwrap();
    let hidden = board.place_hidden(DOT, BLUE, Cell::new(1, 2)).unwrap();
    let far = board.place_hidden(DOT, BLUE, Cell::new(11, 11)).unwrap();

    walk(&mut board, red, RED_EXIT);
    board.settle();

    assert!(board.creature(red).is_none());
    assert_eq!(board.creature(hidden).unwrap().state(), CreatureState::Hidden);
    assert_eq!(board.creature(far).unwrap().state(), CreatureState::Hidden);
    assert_eq!(board.ice_covers().count(), 2);
    assert!(board.ice_covers().all(|c| !c.is_pending()));
    assert!(!board
        .drain_events()
        .iter()
        .any(|e| matches!(e, BoardEvent::Revealed { .. } | BoardEvent::Spawned { .. })));
}

/// Test that ice under the exit melts once its creature leaves.
#[test]
fn test_ice_at_vacated_cell_resolves() {
    let mut board = empty_board(GameConfig::new(1));
    let red = board.place_creature(DOT, RED, Cell::new(2, 1)).unwrap();
    let under = board.place_empty_ice(RED_EXIT).unwrap();
    let beside = board.place_empty_ice(Cell::new(0, 2)).unwrap();

    walk(&mut board, red, RED_EXIT);
    board.settle();

    assert!(board.session().ice(under).is_none());
    assert!(!board.session().ice(beside).unwrap().is_pending());
    let spawned = board.grid().occupant_at(RED_EXIT).unwrap();
    assert_ne!(spawned, red);
    assert!(board.grid().is_free(Cell::new(0, 2)));
}

/// Test that nearest reveals uncover the closest hidden creature.
#[test]
fn test_elimination_reveals_hidden_creature() {
    let mut board = empty_board(GameConfig::new(1).with_nearest_reveals());
    let red = board.place_creature(DOT, RED, Cell::new(2, 1)).unwrap();
    let near = board.place_hidden(DOT, BLUE, Cell::new(3, 3)).unwrap();
    let far = board.place_hidden(DOT, BLUE, Cell::new(10, 10)).unwrap();

    walk(&mut board, red, RED_EXIT);
    board.settle();

    assert_eq!(board.creature(near).unwrap().state(), CreatureState::Idle);
    assert_eq!(board.creature(far).unwrap().state(), CreatureState::Hidden);
    assert_eq!(board.ice_covers().count(), 1);
    assert!(board
        .drain_events()
        .iter()
        .any(|e| matches!(e, BoardEvent::Revealed { creature, .. } if *creature == near)));
}

/// Test that the reveal waits out grace and melt.
#[test]
fn test_reveal_timing() {
    let config = GameConfig::new(1)
        .with_reveal_timing(300, 600)
        .with_step_ms(100)
        .with_nearest_reveals();
    let mut board = empty_board(config);
    let red = board.place_creature(DOT, RED, Cell::new(1, 1)).unwrap();
    let hidden = board.place_hidden(DOT, BLUE, Cell::new(6, 6)).unwrap();

    walk(&mut board, red, RED_EXIT);
    board.advance(100);
    assert!(board.creature(red).is_none());

    board.advance(899);
    assert_eq!(board.creature(hidden).unwrap().state(), CreatureState::Hidden);

    board.advance(1);
    assert_eq!(board.creature(hidden).unwrap().state(), CreatureState::Idle);
}

/// Test that melted empty ice spawns a fresh creature.
#[test]
fn test_empty_ice_spawns() {
    let mut board = empty_board(GameConfig::new(1).with_nearest_reveals());
    let red = board.place_creature(DOT, RED, Cell::new(2, 1)).unwrap();
    let ice = board.place_empty_ice(Cell::new(7, 7)).unwrap();

    walk(&mut board, red, RED_EXIT);
    board.settle();

    assert!(board.session().ice(ice).is_none());
    let spawned = board.grid().occupant_at(Cell::new(7, 7)).unwrap();
    assert_ne!(spawned, red);
    assert_eq!(board.creature(spawned).unwrap().state(), CreatureState::Idle);
    assert!(board
        .drain_events()
        .iter()
        .any(|e| matches!(e, BoardEvent::Spawned { creature, .. } if *creature == spawned)));
}

/// Test that claiming a pending empty cell withdraws its reveal.
#[test]
fn test_reoccupied_ice_cancels_reveal() {
    let config = GameConfig::new(1).with_reveal_timing(300, 600).with_step_ms(120);
    let mut board = empty_board(config);
    let red = board.place_creature(DOT, RED, Cell::new(2, 1)).unwrap();
    let blue = board.place_creature(DOT, BLUE, Cell::new(0, 4)).unwrap();
    let ice = board.place_empty_ice(RED_EXIT).unwrap();

    walk(&mut board, red, RED_EXIT);
    board.advance(240);
    assert!(board.creature(red).is_none());
    assert!(board.session().ice(ice).unwrap().is_pending());

    walk(&mut board, blue, RED_EXIT);
    board.settle();

    assert_eq!(board.creature(blue).unwrap().anchor, RED_EXIT);
    assert_eq!(board.session().creature_count(), 1);
    assert!(!board.session().ice(ice).unwrap().is_pending());
    assert!(board
        .drain_events()
        .iter()
        .any(|e| matches!(e, BoardEvent::RevealCancelled { ice: cancelled } if *cancelled == ice)));
}

/// Test that without cancellation a claimed cell makes the spawn fizzle.
#[test]
fn test_legacy_reveal_fizzles_on_occupied_cell() {
    let config = GameConfig::new(1)
        .with_reveal_timing(300, 600)
        .with_step_ms(120)
        .with_legacy_reveals();
    let mut board = empty_board(config);
    let red = board.place_creature(DOT, RED, Cell::new(2, 1)).unwrap();
    let blue = board.place_creature(DOT, BLUE, Cell::new(0, 4)).unwrap();
    let ice = board.place_empty_ice(RED_EXIT).unwrap();

    walk(&mut board, red, RED_EXIT);
    board.advance(240);
    walk(&mut board, blue, RED_EXIT);
    board.settle();

    assert_eq!(board.session().creature_count(), 1);
    assert!(board.session().ice(ice).is_none());
    assert!(board
        .drain_events()
        .iter()
        .any(|e| matches!(e, BoardEvent::RevealFizzled { ice: fizzled } if *fizzled == ice)));
}

// =============================================================================
// Progression Tests
// =============================================================================

/// Test that the first level's target is the visible creature count.
#[test]
fn test_level_one_target_counts_visible_creatures() {
    let board = BoardController::headless(GameConfig::new(11).with_counts(6, 3)).unwrap();
    let visible = board
        .session()
        .creatures()
        .filter(|c| c.state() == CreatureState::Idle)
        .count();

    assert!(visible <= 6);
    assert_eq!(board.target(), visible as u32);
    assert!(board.session().creatures_in(CreatureState::Hidden).count() <= 3);
}

/// Test that meeting the target starts a fresh level.
#[test]
fn test_level_advance() {
    let mut board = BoardController::new(
        GameConfig::new(5),
        Catalog::standard(),
        RecordingRenderer::new(),
        NullAnimator::new(50),
    )
    .unwrap();
    board.clear_board();
    board.bind_exit(RED, RED_EXIT);
    board.set_target(10);
    let red = board.place_creature(DOT, RED, Cell::new(3, 1)).unwrap();

    walk(&mut board, red, RED_EXIT);
    board.settle();

    assert_eq!(board.level(), 2);
    assert_eq!(board.target(), 9);
    assert_eq!(board.score(), 0);
    assert!(board.creature(red).is_none());
    assert!(board
        .session()
        .creatures()
        .all(|c| c.id > red && c.state() != CreatureState::Eliminated));
    assert!(!board.renderer().is_live(VisualId::Creature(red)));
    assert!(board
        .drain_events()
        .iter()
        .any(|e| *e == BoardEvent::LevelAdvanced { level: 2, target: 9 }));
    assert!(board.check_invariants().is_ok());
}

// =============================================================================
// Determinism and Invariant Tests
// =============================================================================

/// Test that a seed reproduces the layout exactly.
#[test]
fn test_same_seed_same_layout() {
    let config = GameConfig::new(77).with_empty_ice(3);
    let a = BoardController::headless(config.clone()).unwrap();
    let b = BoardController::headless(config).unwrap();

    let layout = |board: &BoardController| {
        board
            .session()
            .creatures()
            .map(|c| (c.id, c.anchor, c.shape, c.color, c.state()))
            .collect::<Vec<_>>()
    };
    assert_eq!(layout(&a), layout(&b));
    assert_eq!(
        a.ice_covers().cloned().collect::<Vec<_>>(),
        b.ice_covers().cloned().collect::<Vec<_>>()
    );
    assert_eq!(a.placement_rng_state(), b.placement_rng_state());
}

/// Test that a renderer which fails every call never stalls play.
#[test]
fn test_renderer_failures_are_tolerated() {
    let mut board = BoardController::new(
        GameConfig::new(3).with_nearest_reveals(),
        Catalog::standard(),
        BrokenRenderer,
        NullAnimator::new(10),
    )
    .unwrap();
    board.clear_board();
    board.bind_exit(RED, RED_EXIT);
    board.set_target(1000);
    let red = board.place_creature(DOT, RED, Cell::new(2, 1)).unwrap();
    let hidden = board.place_hidden(DOT, BLUE, Cell::new(6, 6)).unwrap();

    walk(&mut board, red, RED_EXIT);
    board.settle();

    assert!(board.creature(red).is_none());
    assert_eq!(board.score(), 10);
    assert_eq!(board.creature(hidden).unwrap().state(), CreatureState::Idle);
    assert!(board.is_settled());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Random input and clock movement never breaks occupancy or selection.
    #[test]
    fn test_random_play_keeps_invariants(
        seed in any::<u64>(),
        ops in proptest::collection::vec((0u8..3, -1i32..13, -1i32..13, 0u64..400), 1..60)
    ) {
        let config = GameConfig::new(seed).with_empty_ice(2);
        let mut board = BoardController::headless(config).unwrap();

        for (kind, row, col, ms) in ops {
            match kind {
                0 => {
                    let ids: Vec<_> = board.creatures().map(|c| c.id).collect();
                    if !ids.is_empty() {
                        let index = (row.unsigned_abs() as usize + col.unsigned_abs() as usize) % ids.len();
                        board.creature_activated(ids[index]);
                    }
                }
                1 => board.cell_activated(row, col),
                _ => {
                    board.advance(ms);
                }
            }
            prop_assert_eq!(board.check_invariants(), Ok(()));
        }

        board.settle();
        prop_assert!(board.is_settled());
        prop_assert_eq!(board.session().creatures_in(CreatureState::Walking).count(), 0);
        prop_assert_eq!(board.check_invariants(), Ok(()));
    }
}
