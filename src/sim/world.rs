/// WorldState: the complete snapshot of a running level.
///
/// ## Ownership
///
/// The frame loop owns the world. Physics and camera receive borrows for
/// the duration of one call and keep nothing.
///
/// ## Coordinates
///
/// `actor` and `platforms` live in world pixels. The camera maps them to
/// screen pixels (`screen_x = world_x - camera.offset()`); only drawing
/// and the scroll policy look at screen space.

use crate::config::GameConfig;
use crate::domain::camera::Camera;
use crate::domain::entity::{Actor, Platform};
use crate::domain::physics::PhysicsStep;
use super::level::TileGrid;

#[derive(Clone, Debug)]
pub struct WorldState {
    pub actor: Actor,
    pub grid: TileGrid,
    pub platforms: Vec<Platform>,
    pub physics: PhysicsStep,
    pub camera: Camera,
    /// Initial actor state, restored by `restart`.
    pub spawn: Actor,
    pub frame: u64,
    pub elapsed: f64,
}

impl WorldState {
    /// Build the platform set and place the actor at the screen center.
    pub fn new(grid: TileGrid, config: &GameConfig) -> Self {
        let platforms = grid.platforms(config.physics.tile_size);
        let spawn = Actor::centered_at(
            config.screen.width as f32 / 2.0,
            config.screen.height as f32 / 2.0,
            config.physics.actor_width,
            config.physics.actor_height,
        );

        WorldState {
            actor: spawn.clone(),
            grid,
            platforms,
            physics: PhysicsStep::new(&config.physics, &config.screen),
            camera: Camera::new(&config.screen),
            spawn,
            frame: 0,
            elapsed: 0.0,
        }
    }

    /// Put the actor back at its spawn point and recenter the camera.
    pub fn restart(&mut self) {
        self.actor = self.spawn.clone();
        self.camera.reset();
        self.frame = 0;
        self.elapsed = 0.0;
    }
}
