use glam::Vec3;

use crate::game::{Sprite, Time};

const GRAVITY: f32 = -5.0;
const FLY_ACCELERATION: f32 = 9.0;
const RUN_FRAME_TIME: f32 = 0.1;
const RUN_FRAME_COUNT: usize = 3;
const FLY_FRAME: usize = 2;

/// The player: vertical physics between a floor and a ceiling, plus a small
/// run/fly animation state machine.
///
/// Acceleration is gravity by default. A fly impulse overrides it for
/// exactly one integration step; `advance` restores gravity afterwards.
#[derive(Debug)]
pub struct Player {
    pub sprite: Sprite,
    pub velocity: f32,
    pub flying: bool,
    acceleration: f32,
    floor: f32,
    ceiling: f32,
    run_frame: usize,
    anim_timer: f32,
    clock: Time,
}

impl Player {
    pub fn new(position: Vec3, ceiling: f32) -> Self {
        Self {
            floor: position.y,
            sprite: Sprite::new(position),
            velocity: 0.0,
            flying: false,
            acceleration: 0.0,
            ceiling,
            run_frame: 0,
            anim_timer: 0.0,
            clock: Time::new(),
        }
    }

    /// Fly input: one frame of upward thrust and the smoothstep blend on.
    pub fn fly(&mut self) {
        self.acceleration = FLY_ACCELERATION;
        self.sprite.smoothstep = 1.0;
    }

    /// Per-frame update on the player's own clock: advance the animation,
    /// integrate the vertical move, then fall back to gravity.
    pub fn advance(&mut self) {
        let dt = self.clock.tick();
        self.step_animation(dt);
        self.integrate(dt);
        self.acceleration = GRAVITY;
    }

    /// One physics step: `v += a*dt`, then propose `dy = v*dt + a*dt^2/2`.
    /// A proposed position outside [floor, ceiling] rejects the whole move
    /// and zeroes the velocity; there is no partial clamp to the boundary.
    pub fn integrate(&mut self, dt: f32) {
        if self.acceleration < 0.0 {
            self.sprite.smoothstep = 0.0;
        }

        self.velocity += self.acceleration * dt;
        let dy = self.velocity * dt + 0.5 * self.acceleration * dt * dt;

        let proposed = self.sprite.position.y + dy;
        if proposed > self.ceiling {
            self.velocity = 0.0;
            return;
        }
        if proposed < self.floor {
            self.velocity = 0.0;
            self.flying = false;
            return;
        }

        self.sprite.translate_by(0.0, dy, 0.0);
        self.flying = self.sprite.position.y > self.floor;

        if !self.flying {
            self.sprite.smoothstep = 0.0;
        }
    }

    fn step_animation(&mut self, dt: f32) {
        self.anim_timer += dt;
        if self.anim_timer > RUN_FRAME_TIME {
            self.anim_timer = 0.0;
            self.run_frame = (self.run_frame + 1) % RUN_FRAME_COUNT;
        }
    }

    /// Which run-cycle texture to draw this frame.
    pub fn texture_index(&self) -> usize {
        if self.flying { FLY_FRAME } else { self.run_frame }
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }
}
