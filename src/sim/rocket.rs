use std::collections::VecDeque;

use fastrand::Rng;

use crate::color::Rgb;
use crate::display::Surface;
use crate::sim::rand_range;

const TRAIL_LEN: usize = 10;
const GRAVITY: f32 = 0.12;
const TRAIL_DOT_RADIUS: f32 = 2.2;

/// An ascending shell. Spawns at the bottom edge, decelerates under gravity,
/// and is replaced by an explosion once its climb is nearly spent.
pub struct Rocket {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
    pub size: f32,
    trail: VecDeque<(f32, f32)>,
}

impl Rocket {
    /// `x` defaults to a random position in the middle 15%..85% band.
    pub fn launch(width: f32, height: f32, x: Option<f32>, rng: &mut Rng) -> Self {
        let x = x.unwrap_or_else(|| rand_range(rng, width * 0.15, width * 0.85));
        Self {
            x,
            y: height + 6.0,
            vx: rand_range(rng, -0.9, 0.9),
            vy: rand_range(rng, -13.6, -10.6),
            color: Rgb::hsl(rng.i32(0..=360) as f32, 0.8, 0.6),
            size: 3.0 + rng.f32() * 2.0,
            trail: VecDeque::with_capacity(TRAIL_LEN + 1),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.trail.push_back((self.x, self.y));
        if self.trail.len() > TRAIL_LEN {
            self.trail.pop_front();
        }
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.vy += GRAVITY * dt;
    }

    /// Ascent has decayed to near-zero: time to explode.
    pub fn past_apex(&self, threshold: f32) -> bool {
        self.vy > threshold
    }

    pub fn render(&self, surface: &mut impl Surface) {
        let len = self.trail.len() as f32;
        for (i, &(tx, ty)) in self.trail.iter().enumerate() {
            let alpha = i as f32 / len * 0.9;
            surface.fill_circle(tx, ty, TRAIL_DOT_RADIUS, self.color, alpha);
        }
        surface.fill_circle(self.x, self.y, self.size, self.color, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_velocity_strictly_increases_until_apex() {
        let mut rng = Rng::with_seed(21);
        let mut rocket = Rocket::launch(800.0, 900.0, None, &mut rng);
        let mut prev = rocket.vy;
        while !rocket.past_apex(-1.2) {
            rocket.advance(1.0);
            assert!(rocket.vy > prev);
            prev = rocket.vy;
        }
    }

    #[test]
    fn spawns_inside_horizontal_band() {
        let mut rng = Rng::with_seed(22);
        for _ in 0..200 {
            let rocket = Rocket::launch(1000.0, 900.0, None, &mut rng);
            assert!((150.0..850.0).contains(&rocket.x));
            assert!((-13.6..-10.6).contains(&rocket.vy));
            assert!((-0.9..0.9).contains(&rocket.vx));
        }
    }

    #[test]
    fn explicit_launch_position_wins() {
        let mut rng = Rng::with_seed(23);
        let rocket = Rocket::launch(1000.0, 900.0, Some(400.0), &mut rng);
        assert_eq!(rocket.x, 400.0);
        assert_eq!(rocket.y, 906.0);
    }

    #[test]
    fn trail_is_capped() {
        let mut rng = Rng::with_seed(24);
        let mut rocket = Rocket::launch(800.0, 900.0, None, &mut rng);
        for _ in 0..30 {
            rocket.advance(1.0);
        }
        assert_eq!(rocket.trail.len(), 10);
        // oldest entry is at most 10 integration steps behind
        let (_, oldest_y) = rocket.trail[0];
        assert!(oldest_y > rocket.y);
    }
}
