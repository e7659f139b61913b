/// The step function: advances the world by one frame.
///
/// Processing order:
///   1. Input impulses (horizontal, then jump)
///   2. Physics (integrate → floor clamp → platform collision)
///   3. Camera scroll and screen clamp
///
/// Scroll reads the post-collision velocity and position, so it must run
/// last.

use crate::domain::entity::Contact;
use crate::domain::input::{Action, ActionSet};
use super::event::GameEvent;
use super::world::WorldState;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: ActionSet, dt: f32) -> Vec<GameEvent> {
    if !(dt.is_finite() && dt > 0.0) { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.frame += 1;
    world.elapsed += dt as f64;

    resolve_input(world, input, &mut events);
    resolve_physics(world, dt, &mut events);
    resolve_scroll(world, dt, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Phases
// ══════════════════════════════════════════════════════════════

fn resolve_input(world: &mut WorldState, input: ActionSet, events: &mut Vec<GameEvent>) {
    world.physics.steer(&mut world.actor, input.horizontal());
    if input.contains(Action::Jump) && world.physics.jump(&mut world.actor) {
        events.push(GameEvent::Jumped);
    }
}

fn resolve_physics(world: &mut WorldState, dt: f32, events: &mut Vec<GameEvent>) {
    // A resting actor sinks under gravity and is snapped back every frame;
    // only the airborne → grounded transition counts as touching down.
    let was_grounded = world.actor.grounded;
    let report = world.physics.advance(&mut world.actor, &world.platforms, dt);
    if report.floor_clamped && !was_grounded {
        events.push(GameEvent::FloorClamped);
    }
    events.extend(report.hits.iter().filter_map(|hit| match hit.contact {
        Contact::Landed if was_grounded => None,
        Contact::Landed => Some(GameEvent::Landed { kind: hit.kind }),
        Contact::Ceiling => Some(GameEvent::HitCeiling { kind: hit.kind }),
    }));
}

fn resolve_scroll(world: &mut WorldState, dt: f32, events: &mut Vec<GameEvent>) {
    let pixels = world.camera.update(&mut world.actor, dt);
    if pixels != 0 {
        events.push(GameEvent::Scrolled { pixels });
    }
}
