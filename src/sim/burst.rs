use std::f32::consts::{PI, TAU};

use log::debug;

use crate::color::Rgb;
use crate::config::Mode;
use crate::display::TextLayer;
use crate::sim::particle::{Particle, ParticleSpec, Shape};
use crate::sim::rand_range;
use crate::sim::show::Show;

const SMOKE_GREY: Rgb = Rgb::new(120, 120, 120);

// Flat candy palette for the cartoon burst.
const CARTOON_PALETTE: [Rgb; 6] = [
    Rgb::new(255, 207, 107),
    Rgb::new(255, 111, 178),
    Rgb::new(123, 223, 240),
    Rgb::new(255, 213, 107),
    Rgb::new(138, 255, 138),
    Rgb::new(255, 138, 138),
];

impl Show {
    /// Fires the active mode's recipe at a spent rocket's position. The
    /// rocket's own color only identifies the shell in the log; every recipe
    /// rolls its own colors.
    pub fn explode(&mut self, x: f32, y: f32, rocket_color: Rgb, text: &mut impl TextLayer) {
        debug!(
            "{:?} burst at ({x:.0},{y:.0}) from shell {rocket_color:?}",
            self.config.mode
        );
        match self.config.mode {
            Mode::Real => self.explode_realistic(x, y, text),
            Mode::Cartoon => self.explode_cartoon(x, y, text),
            Mode::Premium => self.explode_premium(x, y, text),
            Mode::Mixed => self.explode_mixed(x, y, text),
        }
    }

    /// Dense glowing spray in a narrow hue band plus a few big, slow smoke
    /// puffs that drift upward. Floats the smoke caption.
    pub fn explode_realistic(&mut self, x: f32, y: f32, text: &mut impl TextLayer) {
        let hue_base = self.rng.i32(0..=360);

        for _ in 0..90 {
            let hue = (hue_base + self.rng.i32(-30..=30)) as f32;
            let spec = ParticleSpec {
                angle: Some(rand_range(&mut self.rng, 0.0, TAU)),
                speed: Some(rand_range(&mut self.rng, 2.2, 7.8)),
                size: Some(rand_range(&mut self.rng, 1.0, 2.2)),
                life: Some(self.rng.i32(80..=160) as f32),
                glow: true,
                ..ParticleSpec::default()
            };
            self.particles
                .push(Particle::new(x, y, Rgb::hsl(hue, 0.85, 0.6), spec, &mut self.rng));
        }

        for _ in 0..12 {
            let px = x + rand_range(&mut self.rng, -30.0, 30.0);
            let py = y + rand_range(&mut self.rng, -10.0, 10.0);
            let spec = ParticleSpec {
                angle: Some(rand_range(&mut self.rng, -PI, PI)),
                speed: Some(rand_range(&mut self.rng, 0.2, 1.4)),
                size: Some(rand_range(&mut self.rng, 10.0, 28.0)),
                life: Some(self.rng.i32(80..=160) as f32),
                gravity: -0.01,
                opacity: 0.6,
                ..ParticleSpec::default()
            };
            self.particles
                .push(Particle::new(px, py, SMOKE_GREY, spec, &mut self.rng));
        }

        self.smoke_name.arm(text);
    }

    /// Big flat color blobs, heavier gravity, every fourth one square. Kicks
    /// off the bouncing-letter phrase.
    pub fn explode_cartoon(&mut self, x: f32, y: f32, text: &mut impl TextLayer) {
        for i in 0..36 {
            let spec = ParticleSpec {
                angle: Some(rand_range(&mut self.rng, 0.0, TAU)),
                speed: Some(rand_range(&mut self.rng, 0.6, 4.4)),
                size: Some(rand_range(&mut self.rng, 6.0, 12.0)),
                life: Some(self.rng.i32(50..=105) as f32),
                gravity: 0.08,
                shape: if i % 4 == 0 { Shape::Square } else { Shape::Circle },
                ..ParticleSpec::default()
            };
            self.particles.push(Particle::new(
                x + 20.0,
                y + 20.0,
                CARTOON_PALETTE[i % CARTOON_PALETTE.len()],
                spec,
                &mut self.rng,
            ));
        }

        self.letters.spawn(
            &self.config.phrase,
            self.width,
            self.height,
            &mut self.rng,
            text,
        );
    }

    /// Three layers around a golden-ish hue: slow glowing core, fast thin
    /// streaks, and an even ring with a little angular jitter. Flashes the
    /// premium caption and schedules the clap accent.
    pub fn explode_premium(&mut self, x: f32, y: f32, text: &mut impl TextLayer) {
        let hue = self.rng.i32(30..=55);

        for _ in 0..22 {
            let h = (hue + self.rng.i32(-10..=10)) as f32;
            let spec = ParticleSpec {
                angle: Some(rand_range(&mut self.rng, 0.0, TAU)),
                speed: Some(rand_range(&mut self.rng, 0.6, 2.4)),
                size: Some(rand_range(&mut self.rng, 6.0, 14.0)),
                life: Some(self.rng.i32(50..=110) as f32),
                glow: true,
                ..ParticleSpec::default()
            };
            self.particles
                .push(Particle::new(x, y, Rgb::hsl(h, 0.9, 0.6), spec, &mut self.rng));
        }

        for _ in 0..140 {
            let h = self.rng.i32(hue - 40..=hue + 40) as f32;
            let spec = ParticleSpec {
                angle: Some(rand_range(&mut self.rng, 0.0, TAU)),
                speed: Some(rand_range(&mut self.rng, 2.8, 10.2)),
                size: Some(rand_range(&mut self.rng, 0.9, 2.6)),
                life: Some(self.rng.i32(40..=140) as f32),
                gravity: 0.015,
                glow: true,
                ..ParticleSpec::default()
            };
            self.particles
                .push(Particle::new(x, y, Rgb::hsl(h, 0.85, 0.6), spec, &mut self.rng));
        }

        let ring = 36;
        for i in 0..ring {
            let ang = i as f32 / ring as f32 * TAU;
            let spec = ParticleSpec {
                angle: Some(ang + rand_range(&mut self.rng, -0.06, 0.06)),
                speed: Some(rand_range(&mut self.rng, 0.8, 3.6)),
                size: Some(rand_range(&mut self.rng, 2.0, 4.5)),
                life: Some(self.rng.i32(60..=130) as f32),
                gravity: 0.01,
                glow: true,
                ..ParticleSpec::default()
            };
            self.particles.push(Particle::new(
                x + ang.cos() * 8.0,
                y + ang.sin() * 8.0,
                Rgb::hsl(hue as f32, 0.85, 0.66),
                spec,
                &mut self.rng,
            ));
        }

        self.premium_text.arm(text);
        self.clap.arm();
    }

    /// All three recipes at once, the extras scattered around the origin.
    pub fn explode_mixed(&mut self, x: f32, y: f32, text: &mut impl TextLayer) {
        self.explode_realistic(x, y, text);

        let cx = x + rand_range(&mut self.rng, -40.0, 40.0);
        let cy = y + rand_range(&mut self.rng, -20.0, 20.0);
        self.explode_cartoon(cx, cy, text);

        let px = x + rand_range(&mut self.rng, -60.0, 60.0);
        let py = y + rand_range(&mut self.rng, -30.0, 30.0);
        self.explode_premium(px, py, text);
    }
}
