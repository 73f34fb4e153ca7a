//! Integration tests for interactable dependencies
//!
//! A master interactable suppresses its dependents while it is busy, holds
//! their weight strictly below its own, and releases them once it finishes.

use std::cell::RefCell;
use std::rc::Rc;

use interaction_engine::core::types::{ActorId, InteractableId};
use interaction_engine::events::{InteractableEvent, InteractableEventKind};
use interaction_engine::interactable::MIN_WEIGHT;
use interaction_engine::{EngineConfig, InteractableConfig, InteractableState, World};

fn spawn(world: &mut World, weight: i32) -> InteractableId {
    world.spawn_interactable(ActorId::new(), &InteractableConfig::default().with_weight(weight))
}

// ============================================================================
// Weight Clamping
// ============================================================================

#[test]
fn test_dependency_clamps_and_restores_weight() {
    let mut world = World::new();
    let master = spawn(&mut world, 3);
    let dependent = spawn(&mut world, 5);

    assert!(world.add_interactable_dependency(master, dependent));
    assert!(world.interactable(dependent).unwrap().weight() <= 2);

    assert!(world.remove_interactable_dependency(master, dependent));
    assert_eq!(world.interactable(dependent).unwrap().weight(), 5);
}

#[test]
fn test_lighter_dependent_keeps_weight() {
    let mut world = World::new();
    let master = spawn(&mut world, 10);
    let dependent = spawn(&mut world, 4);

    world.add_interactable_dependency(master, dependent);
    assert_eq!(world.interactable(dependent).unwrap().weight(), 4);
}

#[test]
fn test_weight_set_under_dependency_is_cached() {
    let mut world = World::new();
    let master = spawn(&mut world, 3);
    let dependent = spawn(&mut world, 5);
    world.add_interactable_dependency(master, dependent);

    world.set_interactable_weight(dependent, 8);
    assert_eq!(world.interactable(dependent).unwrap().weight(), 2);
    assert_eq!(world.interactable(dependent).unwrap().base_weight(), 8);

    world.remove_interactable_dependency(master, dependent);
    assert_eq!(world.interactable(dependent).unwrap().weight(), 8);
}

#[test]
fn test_master_weight_change_reclamps_dependents() {
    let mut world = World::new();
    let master = spawn(&mut world, 3);
    let dependent = spawn(&mut world, 5);
    world.add_interactable_dependency(master, dependent);

    world.set_interactable_weight(master, 1);
    assert_eq!(world.interactable(dependent).unwrap().weight(), 0);

    world.set_interactable_weight(master, 9);
    assert_eq!(world.interactable(dependent).unwrap().weight(), 5);
}

#[test]
fn test_lowest_master_weight_still_undercut() {
    let mut world = World::new();
    let master = spawn(&mut world, i32::MIN);
    let dependent = spawn(&mut world, 0);
    assert_eq!(world.interactable(master).unwrap().weight(), MIN_WEIGHT);

    world.add_interactable_dependency(master, dependent);
    world.set_interactable_weight(master, i32::MIN);

    let master_weight = world.interactable(master).unwrap().weight();
    assert_eq!(master_weight, MIN_WEIGHT);
    assert!(world.interactable(dependent).unwrap().weight() < master_weight);
}

#[test]
fn test_several_masters_use_the_lowest() {
    let mut world = World::new();
    let a = spawn(&mut world, 4);
    let b = spawn(&mut world, 2);
    let dependent = spawn(&mut world, 5);

    world.add_interactable_dependency(a, dependent);
    world.add_interactable_dependency(b, dependent);
    assert_eq!(world.interactable(dependent).unwrap().weight(), 1);

    world.remove_interactable_dependency(b, dependent);
    assert_eq!(world.interactable(dependent).unwrap().weight(), 3);

    world.remove_interactable_dependency(a, dependent);
    assert_eq!(world.interactable(dependent).unwrap().weight(), 5);
}

// ============================================================================
// State Propagation
// ============================================================================

#[test]
fn test_active_master_suppresses_dependent() {
    let mut world = World::new();
    let master = spawn(&mut world, 3);
    let dependent = spawn(&mut world, 1);
    world.add_interactable_dependency(master, dependent);

    world.activate_interactable(master);
    assert_eq!(world.interactable_state(dependent), Some(InteractableState::Suppressed));

    world.wake_up_interactable(master);
    assert_eq!(world.interactable_state(dependent), Some(InteractableState::Awake));
}

#[test]
fn test_completed_master_releases_dependent_and_drops_edge() {
    let mut world = World::new();
    let master = spawn(&mut world, 3);
    let dependent = spawn(&mut world, 5);
    world.add_interactable_dependency(master, dependent);

    world.activate_interactable(master);
    world.complete_interactable(master);

    assert_eq!(world.interactable_state(dependent), Some(InteractableState::Awake));
    assert!(world.interactable(master).unwrap().dependencies().is_empty());
    assert_eq!(world.interactable(dependent).unwrap().weight(), 5);
}

#[test]
fn test_dependent_returns_to_its_own_default() {
    let mut world = World::new();
    let master = spawn(&mut world, 3);
    let dependent = world.spawn_interactable(
        ActorId::new(),
        &InteractableConfig::default().with_default_state(InteractableState::Asleep),
    );
    world.add_interactable_dependency(master, dependent);

    world.activate_interactable(master);
    assert_eq!(world.interactable_state(dependent), Some(InteractableState::Suppressed));

    world.deactivate_interactable(master);
    assert_eq!(world.interactable_state(dependent), Some(InteractableState::Asleep));
}

#[test]
fn test_dependency_events() {
    let mut world = World::new();
    let master = spawn(&mut world, 3);
    let dependent = spawn(&mut world, 5);

    let log = Rc::new(RefCell::new(Vec::new()));
    for kind in [
        InteractableEventKind::DependencyStarted,
        InteractableEventKind::DependencyStopped,
    ] {
        let log = log.clone();
        world
            .subscribe_interactable(dependent, kind, move |e| log.borrow_mut().push(e.clone()))
            .unwrap();
    }

    world.add_interactable_dependency(master, dependent);
    world.remove_interactable_dependency(master, dependent);

    assert_eq!(
        *log.borrow(),
        vec![
            InteractableEvent::DependencyStarted { master },
            InteractableEvent::DependencyStopped { master },
        ]
    );
}

// ============================================================================
// Graph Safety
// ============================================================================

#[test]
fn test_cycles_are_refused() {
    let mut world = World::new();
    let a = spawn(&mut world, 1);
    let b = spawn(&mut world, 1);
    let c = spawn(&mut world, 1);

    assert!(world.add_interactable_dependency(a, b));
    assert!(world.add_interactable_dependency(b, c));
    assert!(!world.add_interactable_dependency(c, a));
    assert!(!world.add_interactable_dependency(a, a));
}

#[test]
fn test_cascade_stops_at_configured_depth() {
    let config = EngineConfig {
        max_cascade_depth: 4,
        ..EngineConfig::default()
    };
    let mut world = World::new().with_config(config);
    let chain: Vec<InteractableId> = (0..8).map(|_| spawn(&mut world, 1)).collect();
    for pair in chain.windows(2) {
        assert!(world.add_interactable_dependency(pair[0], pair[1]));
    }

    world.activate_interactable(chain[0]);

    for node in &chain[1..=4] {
        assert_eq!(world.interactable_state(*node), Some(InteractableState::Suppressed));
    }
    assert_eq!(world.interactable_state(chain[5]), Some(InteractableState::Awake));
}

#[test]
fn test_despawned_master_restores_dependent() {
    let mut world = World::new();
    let master = spawn(&mut world, 3);
    let dependent = spawn(&mut world, 5);
    world.add_interactable_dependency(master, dependent);

    world.despawn_interactable(master);
    assert_eq!(world.interactable(dependent).unwrap().weight(), 5);
    assert!(world.interactable(dependent).unwrap().masters().is_empty());
}
