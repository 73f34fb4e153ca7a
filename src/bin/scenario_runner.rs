//! Headless Scenario Runner
//!
//! Drives one interactor through repeated interactions with a preset
//! interactable and prints the resulting event trace.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use interaction_engine::core::types::{ActorId, CollisionEnabled};
use interaction_engine::events::{InteractableEvent, InteractableEventKind};
use interaction_engine::surfaces::CollisionShape;
use interaction_engine::{
    InteractableConfig, InteractableState, InteractorConfig, InteractorState, PresetCatalog, World,
};
use serde::Serialize;

/// Headless Scenario Runner - exercise an interactable preset
#[derive(Parser, Debug)]
#[command(name = "scenario_runner")]
#[command(about = "Run an interactor against an interactable preset and report events")]
struct Args {
    /// TOML preset catalog; built-in defaults are used when omitted
    #[arg(long)]
    presets: Option<PathBuf>,

    /// Interactable preset name in the catalog
    #[arg(long, default_value = "default")]
    interactable: String,

    /// Simulation step in seconds
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Total simulated time in seconds
    #[arg(long, default_value_t = 20.0)]
    duration: f32,

    /// Do not restart the interaction when the target becomes available again
    #[arg(long)]
    no_restart: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize, Clone)]
struct TracedEvent {
    time: f32,
    event: InteractableEvent,
}

/// JSON output structure
#[derive(Serialize)]
struct ScenarioResult {
    interactable: String,
    final_state: InteractableState,
    interactor_state: Option<InteractorState>,
    cycles_completed: u32,
    lifecycle_completed: bool,
    remaining_cycles: i32,
    simulated_seconds: f32,
    events: Vec<TracedEvent>,
}

fn load_preset(args: &Args) -> interaction_engine::Result<InteractableConfig> {
    match &args.presets {
        Some(path) => {
            let catalog = PresetCatalog::load(path)?;
            Ok(catalog.interactable(&args.interactable)?.clone())
        }
        None => Ok(InteractableConfig::named(args.interactable.clone())
            .with_lifecycle(interaction_engine::LifecycleMode::Cycled, 3)
            .with_interaction_period(1.0)
            .with_cooldown_period(2.0)),
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let preset = match load_preset(&args) {
        Ok(preset) => preset,
        Err(e) => {
            tracing::error!("Failed to load preset '{}': {}", args.interactable, e);
            std::process::exit(1);
        }
    };

    let mut world = World::new();
    let channel = preset.collision_channel;
    let target = world.spawn_interactable(ActorId::new(), &preset);
    let player = world.spawn_interactor(
        ActorId::new(),
        &InteractorConfig::named("player")
            .with_default_state(InteractorState::Awake)
            .with_channel(channel),
    );

    let shape = world.spawn_shape(CollisionShape::new(CollisionEnabled::QueryOnly));
    if let Err(e) = world.add_collision_shape(target, shape) {
        tracing::error!("Failed to attach collision shape: {}", e);
        std::process::exit(1);
    }

    // Record every broadcast with its simulation time
    let trace: Rc<RefCell<Vec<TracedEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let clock = Rc::new(RefCell::new(0.0f32));
    for kind in [
        InteractableEventKind::StateChanged,
        InteractableEventKind::Selected,
        InteractableEventKind::InteractionStarted,
        InteractableEventKind::CycleCompleted,
        InteractableEventKind::CooldownCompleted,
        InteractableEventKind::InteractionCompleted,
        InteractableEventKind::LifecycleCompleted,
    ] {
        let trace = trace.clone();
        let clock = clock.clone();
        let subscribed = world.subscribe_interactable(target, kind, move |event| {
            trace.borrow_mut().push(TracedEvent {
                time: *clock.borrow(),
                event: event.clone(),
            });
        });
        if let Err(e) = subscribed {
            tracing::error!("Failed to subscribe: {}", e);
            std::process::exit(1);
        }
    }

    world.report_overlap(player, target);
    world.start_interaction(player);

    let dt = args.dt.max(0.001);
    let mut elapsed = 0.0;
    while elapsed < args.duration {
        elapsed += dt;
        *clock.borrow_mut() = elapsed;
        world.advance(dt);

        let state = world.interactable_state(target);
        if state == Some(InteractableState::Completed) {
            break;
        }
        let engaged = world.interaction_progress(target) > 0.0;
        if !args.no_restart && state == Some(InteractableState::Active) && !engaged {
            world.start_interaction(player);
        }
    }

    let events = trace.borrow().clone();
    let cycles_completed = events
        .iter()
        .filter(|e| matches!(e.event, InteractableEvent::CycleCompleted { .. }))
        .count() as u32;
    let lifecycle_completed = events
        .iter()
        .any(|e| e.event == InteractableEvent::LifecycleCompleted);

    let result = ScenarioResult {
        interactable: preset.name.clone(),
        final_state: world
            .interactable_state(target)
            .unwrap_or(InteractableState::Disabled),
        interactor_state: world.interactor_state(player),
        cycles_completed,
        lifecycle_completed,
        remaining_cycles: world
            .interactable(target)
            .map(|e| e.remaining_lifecycle_count())
            .unwrap_or(0),
        simulated_seconds: elapsed,
        events,
    };

    match args.format.as_str() {
        "text" => {
            println!("Scenario Result");
            println!("===============");
            println!("Interactable: {}", result.interactable);
            println!("Final state: {:?}", result.final_state);
            println!("Interactor state: {:?}", result.interactor_state);
            println!("Cycles completed: {}", result.cycles_completed);
            println!("Lifecycle completed: {}", result.lifecycle_completed);
            println!("Remaining cycles: {}", result.remaining_cycles);
            println!("Simulated: {:.2}s", result.simulated_seconds);
            println!();
            for traced in &result.events {
                println!("  [{:>6.2}s] {:?}", traced.time, traced.event);
            }
        }
        _ => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                tracing::error!("Failed to serialize result: {}", e);
                std::process::exit(1);
            }
        },
    }
}
