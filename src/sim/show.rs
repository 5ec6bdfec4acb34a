use fastrand::Rng;
use log::{debug, info};

use crate::color;
use crate::config::{Mode, ShowConfig};
use crate::display::{Surface, TextLayer};
use crate::sim::letters::LetterBatch;
use crate::sim::overlay::{ClapCue, OverlayTimer};
use crate::sim::particle::Particle;
use crate::sim::rocket::Rocket;

const TRAIL_FADE: f32 = 0.22;
const TWINKLE_CHANCE: f32 = 0.01;
const TWINKLE_ALPHA: f32 = 0.04;
const CLAP_DROP: f32 = 46.0; // clap sits this far under the premium caption

/// The whole show: entity pools, overlay timers, and the per-frame
/// update-and-render cycle. Single-threaded and frame-driven; the automatic
/// launcher and the pool guard are tick-accumulator clocks advanced from the
/// same step, so nothing ever runs concurrently with a frame.
pub struct Show {
    pub(crate) config: ShowConfig,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) rng: Rng,
    pub(crate) rockets: Vec<Rocket>,
    pub(crate) particles: Vec<Particle>,
    pub(crate) letters: LetterBatch,
    pub(crate) smoke_name: OverlayTimer,
    pub(crate) premium_text: OverlayTimer,
    pub(crate) clap: ClapCue,
    auto_clock: f32,
    guard_clock: f32,
    overlays_ready: bool,
}

impl Show {
    pub fn new(config: ShowConfig, width: f32, height: f32) -> Self {
        Self::with_rng(config, width, height, Rng::new())
    }

    /// Seeded construction for reproducible shows.
    pub fn with_rng(config: ShowConfig, width: f32, height: f32, rng: Rng) -> Self {
        Self {
            config,
            width,
            height,
            rng,
            rockets: Vec::new(),
            particles: Vec::new(),
            letters: LetterBatch::new(),
            smoke_name: OverlayTimer::smoke(),
            premium_text: OverlayTimer::premium(),
            clap: ClapCue::new(),
            auto_clock: 0.0,
            guard_clock: 0.0,
            overlays_ready: false,
        }
    }

    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.config.mode = mode;
    }

    pub fn toggle_auto(&mut self) {
        self.config.auto_launch = !self.config.auto_launch;
    }

    /// The display was rebuilt: adopt the new dimensions and forget every
    /// handle that pointed into the old one.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.letters.forget();
        self.smoke_name.id = None;
        self.premium_text.id = None;
        self.clap.id = None;
        self.overlays_ready = false;
    }

    pub fn launch(&mut self, x: Option<f32>) {
        let rocket = Rocket::launch(self.width, self.height, x, &mut self.rng);
        debug!(
            "rocket up at x={:.0}, vy={:.1}, {} in flight",
            rocket.x,
            rocket.vy,
            self.rockets.len() + 1
        );
        self.rockets.push(rocket);
    }

    /// One frame: advance and draw every pool, explode spent rockets with the
    /// active mode's recipe, tick the overlay timers, and keep the pool and
    /// launch clocks running. `dt` is in ticks and is expected pre-clamped by
    /// the driver.
    pub fn step<C: Surface + TextLayer>(&mut self, dt: f32, display: &mut C) {
        self.ensure_overlays(display);

        self.auto_clock += dt;
        if self.auto_clock >= self.config.auto_interval {
            self.auto_clock -= self.config.auto_interval;
            if self.config.auto_launch {
                self.launch(None);
            }
        }

        self.guard_clock += dt;
        if self.guard_clock >= self.config.guard_interval {
            self.guard_clock -= self.config.guard_interval;
            self.enforce_particle_cap();
        }

        display.fade(self.config.backdrop, TRAIL_FADE);

        let apex = self.config.apex_threshold;
        let mut bursts = Vec::new();
        self.rockets.retain_mut(|rocket| {
            rocket.advance(dt);
            rocket.render(display);
            if rocket.past_apex(apex) {
                bursts.push((rocket.x, rocket.y, rocket.color));
                false
            } else {
                true
            }
        });
        for (x, y, rocket_color) in bursts {
            self.explode(x, y, rocket_color, display);
        }

        self.particles.retain_mut(|particle| {
            particle.advance(dt);
            particle.render(display);
            !particle.expired()
        });

        self.letters.step(dt, self.width, self.height, display);

        self.smoke_name.tick(display);
        self.premium_text.tick(display);
        self.clap.tick(display);

        if self.rng.f32() < TWINKLE_CHANCE {
            let x = self.rng.f32() * self.width;
            let y = self.rng.f32() * self.height;
            display.fill_rect(x, y, 1.0, 1.0, color::WHITE, TWINKLE_ALPHA);
        }
    }

    fn ensure_overlays(&mut self, display: &mut impl TextLayer) {
        if self.overlays_ready {
            return;
        }
        let center = self.width / 2.0;
        let premium_y = self.height * 0.35;

        let smoke = display.create(&self.config.smoke_text, center, self.height * 0.42);
        display.set_opacity(smoke, 0.0);
        self.smoke_name.id = Some(smoke);

        let premium = display.create(&self.config.premium_text, center, premium_y);
        display.set_opacity(premium, 0.0);
        self.premium_text.id = Some(premium);

        let clap = display.create(&self.config.clap_text, center, premium_y + CLAP_DROP);
        display.set_opacity(clap, 0.0);
        self.clap.id = Some(clap);

        self.overlays_ready = true;
    }

    /// Approximate backpressure: when the pool has grown past the cap, shed a
    /// fixed slice of the oldest particles.
    fn enforce_particle_cap(&mut self) {
        if self.particles.len() > self.config.particle_cap {
            let drop = self.config.particle_drop.min(self.particles.len());
            self.particles.drain(..drop);
            info!(
                "particle pool passed {}, dropped {} oldest ({} left)",
                self.config.particle_cap,
                drop,
                self.particles.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::color::Rgb;
    use crate::display::probe::ProbeDisplay;
    use crate::sim::particle::ParticleSpec;

    fn quiet_config(mode: Mode) -> ShowConfig {
        ShowConfig {
            mode,
            auto_launch: false,
            ..ShowConfig::default()
        }
    }

    fn show(mode: Mode) -> Show {
        Show::with_rng(quiet_config(mode), 800.0, 900.0, Rng::with_seed(42))
    }

    #[test]
    fn expired_particles_leave_on_the_next_sweep() {
        let mut probe = ProbeDisplay::new(800.0, 900.0);
        let mut show = show(Mode::Real);

        let spec = ParticleSpec {
            life: Some(2.0),
            ..ParticleSpec::default()
        };
        let particle = Particle::new(100.0, 100.0, Rgb::new(255, 0, 0), spec, &mut show.rng);
        show.particles.push(particle);

        show.step(1.0, &mut probe); // age 1
        assert_eq!(show.particles.len(), 1);
        show.step(1.0, &mut probe); // age 2 == life, still alive
        assert_eq!(show.particles.len(), 1);
        show.step(1.0, &mut probe); // age 3 > life
        assert_eq!(show.particles.len(), 0);
        // every step laid down one trail-fade pass
        assert_eq!(probe.fades, 3);
    }

    #[test]
    fn guard_drops_exactly_the_configured_slice() {
        let mut show = show(Mode::Real);
        for _ in 0..6500 {
            let p = Particle::new(
                0.0,
                0.0,
                Rgb::new(255, 255, 255),
                ParticleSpec::default(),
                &mut show.rng,
            );
            show.particles.push(p);
        }

        show.enforce_particle_cap();
        assert_eq!(show.particles.len(), 3500);

        // under the threshold nothing happens
        show.enforce_particle_cap();
        assert_eq!(show.particles.len(), 3500);
    }

    #[test]
    fn guard_clock_fires_on_its_interval() {
        let mut probe = ProbeDisplay::new(800.0, 900.0);
        let mut show = show(Mode::Real);
        for _ in 0..6500 {
            let spec = ParticleSpec {
                life: Some(100_000.0),
                ..ParticleSpec::default()
            };
            let p = Particle::new(0.0, 0.0, Rgb::new(255, 255, 255), spec, &mut show.rng);
            show.particles.push(p);
        }

        for _ in 0..179 {
            show.step(1.0, &mut probe);
        }
        assert_eq!(show.particles.len(), 6500);
        show.step(1.0, &mut probe);
        assert_eq!(show.particles.len(), 3500);
    }

    #[test]
    fn auto_clock_launches_when_enabled() {
        let mut probe = ProbeDisplay::new(800.0, 900.0);
        let mut show = Show::with_rng(
            ShowConfig {
                auto_launch: true,
                ..quiet_config(Mode::Real)
            },
            800.0,
            900.0,
            Rng::with_seed(42),
        );

        for _ in 0..95 {
            show.step(1.0, &mut probe);
        }
        assert_eq!(show.rockets.len(), 0);
        show.step(1.0, &mut probe);
        assert_eq!(show.rockets.len(), 1);
    }

    #[test]
    fn rocket_explodes_on_the_first_frame_past_apex() {
        let mut probe = ProbeDisplay::new(800.0, 900.0);
        let mut show = show(Mode::Real);

        show.launch(Some(400.0));
        {
            let rocket = &mut show.rockets[0];
            rocket.vx = 0.0;
            rocket.vy = -13.0;
        }

        // same integration the rocket runs: one gravity increment per tick
        let mut vy = -13.0f32;
        let mut expected_step = 0;
        while !(vy > -1.2) {
            vy += 0.12;
            expected_step += 1;
        }

        let mut burst_step = None;
        for frame in 1..=200 {
            show.step(1.0, &mut probe);
            if burst_step.is_none() && show.rockets.is_empty() {
                burst_step = Some(frame);
                assert_eq!(show.particles.len(), 102);
            }
        }

        assert_eq!(burst_step, Some(expected_step));
        // no second rocket and no second burst with auto off
        assert!(show.rockets.is_empty());
    }

    #[test]
    fn active_mode_picks_the_recipe() {
        let mut probe = ProbeDisplay::new(800.0, 900.0);
        let mut show = show(Mode::Cartoon);

        show.launch(Some(400.0));
        show.rockets[0].vy = -1.0; // already past apex
        show.step(1.0, &mut probe);

        assert_eq!(show.particles.len(), 36);
        assert!(!show.letters.is_empty());
    }

    #[test]
    fn resize_forgets_display_handles() {
        let mut probe = ProbeDisplay::new(800.0, 900.0);
        let mut show = show(Mode::Cartoon);
        show.launch(Some(400.0));
        show.rockets[0].vy = -1.0;
        show.step(1.0, &mut probe);
        assert!(!show.letters.is_empty());

        show.resize(1000.0, 900.0);
        assert!(show.letters.is_empty());
        assert!(show.smoke_name.id.is_none());

        // a fresh display gets fresh overlays on the next step
        let mut fresh = ProbeDisplay::new(1000.0, 900.0);
        show.step(1.0, &mut fresh);
        assert_eq!(fresh.texts.len(), 3);
    }
}
