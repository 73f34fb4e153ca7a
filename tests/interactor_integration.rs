//! Integration tests for interactors
//!
//! Covers weight arbitration between candidates, the selection broadcast,
//! interactor requests and interactor-to-interactor dependencies.

use std::cell::RefCell;
use std::rc::Rc;

use interaction_engine::core::types::{ActorId, CollisionEnabled, InteractableId, InteractorId};
use interaction_engine::events::{InteractableEventKind, InteractorEvent, InteractorEventKind};
use interaction_engine::surfaces::CollisionShape;
use interaction_engine::{
    InteractableConfig, InteractableState, InteractorConfig, InteractorState, World,
};

fn awake_player(world: &mut World) -> InteractorId {
    world.spawn_interactor(
        ActorId::new(),
        &InteractorConfig::default().with_default_state(InteractorState::Awake),
    )
}

fn spawn_weighted(world: &mut World, weight: i32) -> InteractableId {
    let id = world.spawn_interactable(ActorId::new(), &InteractableConfig::default().with_weight(weight));
    let shape = world.spawn_shape(CollisionShape::new(CollisionEnabled::QueryOnly));
    world.add_collision_shape(id, shape).unwrap();
    id
}

fn count_selections(world: &mut World, id: InteractorId) -> Rc<RefCell<Vec<InteractableId>>> {
    let selected = Rc::new(RefCell::new(Vec::new()));
    let sink = selected.clone();
    world
        .subscribe_interactor(id, InteractorEventKind::InteractableSelected, move |e| {
            if let InteractorEvent::InteractableSelected(target) = e {
                sink.borrow_mut().push(*target);
            }
        })
        .unwrap();
    selected
}

// ============================================================================
// Arbitration
// ============================================================================

#[test]
fn test_first_candidate_is_selected_once() {
    let mut world = World::new();
    let player = awake_player(&mut world);
    let lever = spawn_weighted(&mut world, 0);
    let selected = count_selections(&mut world, player);

    world.evaluate_interactable(player, Some(lever));

    assert_eq!(world.interactor(player).unwrap().active_interactable(), Some(lever));
    assert_eq!(*selected.borrow(), vec![lever]);
}

#[test]
fn test_equal_weight_keeps_current() {
    let mut world = World::new();
    let player = awake_player(&mut world);
    let first = spawn_weighted(&mut world, 5);
    let second = spawn_weighted(&mut world, 5);
    let selected = count_selections(&mut world, player);

    world.report_overlap(player, first);
    world.report_overlap(player, second);

    assert_eq!(world.interactor(player).unwrap().active_interactable(), Some(first));
    assert_eq!(world.interactable_state(first), Some(InteractableState::Active));
    assert_eq!(world.interactable_state(second), Some(InteractableState::Awake));
    assert_eq!(*selected.borrow(), vec![first]);
}

#[test]
fn test_heavier_candidate_takes_over() {
    let mut world = World::new();
    let player = awake_player(&mut world);
    let light = spawn_weighted(&mut world, 5);
    let heavy = spawn_weighted(&mut world, 6);
    let selected = count_selections(&mut world, player);

    let canceled = Rc::new(RefCell::new(0));
    let counter = canceled.clone();
    world
        .subscribe_interactable(light, InteractableEventKind::InteractionCanceled, move |_| {
            *counter.borrow_mut() += 1
        })
        .unwrap();

    world.report_overlap(player, light);
    world.report_overlap(player, heavy);

    assert_eq!(world.interactor(player).unwrap().active_interactable(), Some(heavy));
    assert_eq!(world.interactable_state(heavy), Some(InteractableState::Active));
    // The loser drops back and lets go of the interactor
    assert_eq!(world.interactable_state(light), Some(InteractableState::Awake));
    assert_eq!(world.interactable(light).unwrap().interactor(), None);
    assert!(*canceled.borrow() >= 1);
    assert_eq!(*selected.borrow(), vec![light, heavy]);
}

#[test]
fn test_none_candidate_releases_target() {
    let mut world = World::new();
    let player = awake_player(&mut world);
    let lever = spawn_weighted(&mut world, 1);

    world.report_overlap(player, lever);
    world.evaluate_interactable(player, None);

    assert_eq!(world.interactor(player).unwrap().active_interactable(), None);
}

#[test]
fn test_stale_candidate_keeps_target() {
    let mut world = World::new();
    let player = awake_player(&mut world);
    let lever = spawn_weighted(&mut world, 1);
    let gone = spawn_weighted(&mut world, 9);
    assert!(world.despawn_interactable(gone));

    world.report_overlap(player, lever);
    world.evaluate_interactable(player, Some(gone));
    world.evaluate_interactable(player, Some(InteractableId(999)));

    assert_eq!(world.interactor(player).unwrap().active_interactable(), Some(lever));
    assert_eq!(world.interactable_state(lever), Some(InteractableState::Active));
}

#[test]
fn test_invalid_interactor_does_not_evaluate() {
    let mut world = World::new();
    let player = awake_player(&mut world);
    let lever = spawn_weighted(&mut world, 1);

    assert!(world.suppress_interactor(player).accepted);
    world.evaluate_interactable(player, Some(lever));

    assert_eq!(world.interactor(player).unwrap().active_interactable(), None);
}

#[test]
fn test_asleep_interactor_detects_nothing() {
    let mut world = World::new();
    let sleeper = world.spawn_interactor(ActorId::new(), &InteractorConfig::default());
    let lever = spawn_weighted(&mut world, 1);

    assert_eq!(world.interactor_state(sleeper), Some(InteractorState::Asleep));
    assert!(!world.report_overlap(sleeper, lever));
}

#[test]
fn test_ignored_actor_is_skipped() {
    let mut world = World::new();
    let player = awake_player(&mut world);
    let owner = ActorId::new();
    let lever = world.spawn_interactable(owner, &InteractableConfig::default());
    let shape = world.spawn_shape(CollisionShape::default());
    world.add_collision_shape(lever, shape).unwrap();

    world.interactor_mut(player).unwrap().add_ignored_actor(owner);
    assert!(!world.report_overlap(player, lever));

    world.interactor_mut(player).unwrap().remove_ignored_actor(owner);
    assert!(world.report_overlap(player, lever));
}

// ============================================================================
// Requests
// ============================================================================

#[test]
fn test_interactor_requests() {
    let mut world = World::new();
    let player = awake_player(&mut world);

    let outcome = world.activate_interactor(player);
    assert!(outcome.accepted);
    assert!(outcome.reason.contains("has been Activated"));

    let again = world.activate_interactor(player);
    assert!(!again.accepted);
    assert!(again.reason.contains("already Active"));

    assert!(world.deactivate_interactor(player).accepted);
    let blocked = world.suppress_interactor(player);
    assert!(!blocked.accepted);
    assert!(blocked.reason.contains("cannot be Suppressed from Disabled"));

    assert!(world.wake_up_interactor(player).accepted);
    assert_eq!(world.interactor_state(player), Some(InteractorState::Awake));
}

#[test]
fn test_despawned_interactor_frees_targets() {
    let mut world = World::new();
    let player = awake_player(&mut world);
    let lever = spawn_weighted(&mut world, 1);

    world.report_overlap(player, lever);
    assert!(world.despawn_interactor(player));

    assert_eq!(world.interactable(lever).unwrap().interactor(), None);
    assert_eq!(world.interactable_state(lever), Some(InteractableState::Awake));
    assert!(world.interactor(player).is_err());
}

// ============================================================================
// Interactor Dependencies
// ============================================================================

#[test]
fn test_found_suppresses_dependents_and_lost_restores() {
    let mut world = World::new();
    let hands = awake_player(&mut world);
    let gaze = awake_player(&mut world);
    let lever = spawn_weighted(&mut world, 1);
    assert!(world.add_interactor_dependency(hands, gaze));

    world.report_overlap(hands, lever);
    assert_eq!(world.interactor_state(gaze), Some(InteractorState::Suppressed));

    world.report_overlap_end(hands, lever);
    assert_eq!(world.interactor_state(gaze), Some(InteractorState::Awake));
}

#[test]
fn test_explicit_dependency_processing() {
    let mut world = World::new();
    let master = awake_player(&mut world);
    let dependent = awake_player(&mut world);
    world.add_interactor_dependency(master, dependent);

    // Transitions alone never propagate
    world.activate_interactor(master);
    assert_eq!(world.interactor_state(dependent), Some(InteractorState::Awake));

    world.process_interactor_dependencies(master);
    assert_eq!(world.interactor_state(dependent), Some(InteractorState::Suppressed));

    world.wake_up_interactor(master);
    world.process_interactor_dependencies(master);
    assert_eq!(world.interactor_state(dependent), Some(InteractorState::Awake));
    assert!(world.interactor(master).unwrap().dependencies().is_empty());
}

#[test]
fn test_interactor_dependency_cycle_refused() {
    let mut world = World::new();
    let a = awake_player(&mut world);
    let b = awake_player(&mut world);

    assert!(world.add_interactor_dependency(a, b));
    assert!(!world.add_interactor_dependency(b, a));
    assert!(!world.add_interactor_dependency(a, a));
    assert!(!world.add_interactor_dependency(a, b));
}
