use std::f32::consts::TAU;

use fastrand::Rng;

use crate::color::Rgb;
use crate::display::Surface;
use crate::sim::rand_range;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Shape {
    Circle,
    Square,
}

/// Creation options for a particle. `None` fields are sampled from the
/// default ranges at creation: life 50..=130 ticks, speed 1.2..7.6, angle
/// anywhere on the circle, size 1.0..3.2. The remaining fields have constant
/// defaults: gravity 0.02, circle shape, no glow, no velocity bias, opaque.
#[derive(Clone, Copy, Debug)]
pub struct ParticleSpec {
    pub life: Option<f32>,
    pub speed: Option<f32>,
    pub angle: Option<f32>,
    pub size: Option<f32>,
    pub gravity: f32,
    pub shape: Shape,
    pub glow: bool,
    pub bias: (f32, f32),
    pub opacity: f32,
}

impl Default for ParticleSpec {
    fn default() -> Self {
        Self {
            life: None,
            speed: None,
            angle: None,
            size: None,
            gravity: 0.02,
            shape: Shape::Circle,
            glow: false,
            bias: (0.0, 0.0),
            opacity: 1.0,
        }
    }
}

/// One explosion fragment. Lives in the particle pool from the burst that
/// created it until its age passes its life.
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
    pub age: f32,
    pub life: f32,
    pub size: f32,
    pub gravity: f32,
    pub shape: Shape,
    pub glow: bool,
    pub opacity: f32,
}

impl Particle {
    pub fn new(x: f32, y: f32, color: Rgb, spec: ParticleSpec, rng: &mut Rng) -> Self {
        let life = spec.life.unwrap_or_else(|| rng.i32(50..=130) as f32);
        let speed = spec.speed.unwrap_or_else(|| rand_range(rng, 1.2, 7.6));
        let angle = spec.angle.unwrap_or_else(|| rand_range(rng, 0.0, TAU));
        let size = spec.size.unwrap_or_else(|| rand_range(rng, 1.0, 3.2));

        Self {
            x,
            y,
            vx: angle.cos() * speed + spec.bias.0,
            vy: angle.sin() * speed + spec.bias.1,
            color,
            age: 0.0,
            life,
            size,
            gravity: spec.gravity,
            shape: spec.shape,
            glow: spec.glow,
            opacity: spec.opacity,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.vy += self.gravity * dt;
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.age += dt;
    }

    pub fn expired(&self) -> bool {
        self.age > self.life
    }

    pub fn render(&self, surface: &mut impl Surface) {
        let alpha = (1.0 - (self.age / self.life).min(1.0)) * self.opacity;
        if self.glow {
            surface.glow(self.x, self.y, self.size, self.color, alpha);
        }
        match self.shape {
            Shape::Square => surface.fill_rect(
                self.x - self.size,
                self.y - self.size,
                self.size * 2.0,
                self.size * 2.0,
                self.color,
                alpha,
            ),
            Shape::Circle => surface.fill_circle(self.x, self.y, self.size, self.color, alpha),
        }
    }
}
