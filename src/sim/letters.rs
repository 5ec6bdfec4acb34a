use fastrand::Rng;

use crate::display::{TextId, TextLayer, Transform};
use crate::sim::rand_range;

const GRAVITY: f32 = 0.18;
const PITCH: f32 = 36.0;
const POSITION_SCALE: f32 = 10.0;
const ROW: f32 = 0.18; // fraction of surface height the batch hangs from

struct Letter {
    id: TextId,
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    rot: f32,
    life: i32,
}

/// One glyph handle plus projectile state per character of the celebratory
/// phrase. A new batch always replaces the previous one in full; letters then
/// die off individually.
pub struct LetterBatch {
    letters: Vec<Letter>,
}

impl LetterBatch {
    pub fn new() -> Self {
        Self { letters: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn spawn(
        &mut self,
        phrase: &str,
        width: f32,
        height: f32,
        rng: &mut Rng,
        text: &mut impl TextLayer,
    ) {
        self.clear(text);

        let chars: Vec<char> = phrase.chars().collect();
        let count = chars.len() as f32;
        let start_x = width / 2.0;
        let row_y = height * ROW;

        for (i, ch) in chars.into_iter().enumerate() {
            let id = text.create(&ch.to_string(), start_x, row_y);
            text.set_transform(
                id,
                Transform {
                    ty: -rand_range(rng, 0.0, 20.0),
                    ..Transform::default()
                },
            );
            self.letters.push(Letter {
                id,
                x: start_x + (i as f32 - count / 2.0) * PITCH + rand_range(rng, -8.0, 8.0),
                y: row_y + rand_range(rng, -8.0, 8.0),
                vy: -rand_range(rng, 2.0, 6.0),
                vx: rand_range(rng, -1.2, 1.2),
                rot: rand_range(rng, -0.8, 0.8),
                life: rng.i32(80..=160),
            });
        }
    }

    /// Detaches every handle and drops all records.
    pub fn clear(&mut self, text: &mut impl TextLayer) {
        for letter in self.letters.drain(..) {
            text.remove(letter.id);
        }
    }

    /// Drops records without touching handles. For when the display itself
    /// was rebuilt and the ids are already gone.
    pub fn forget(&mut self) {
        self.letters.clear();
    }

    pub fn step(&mut self, dt: f32, width: f32, height: f32, text: &mut impl TextLayer) {
        let origin_x = width / 2.0;
        let origin_y = height * ROW;

        self.letters.retain_mut(|letter| {
            letter.vy += GRAVITY * dt;
            letter.x += letter.vx * dt * POSITION_SCALE;
            letter.y += letter.vy * dt * POSITION_SCALE;
            letter.life -= 1;

            let wear = 1.0 - letter.life as f32 / 200.0;
            text.set_transform(
                letter.id,
                Transform {
                    tx: letter.x - origin_x,
                    ty: letter.y - origin_y,
                    rot: letter.rot * wear,
                    scale: 1.0 + wear * 0.15,
                },
            );

            if letter.life < 0 {
                text.set_opacity(letter.id, 0.0);
                text.remove(letter.id);
                false
            } else {
                true
            }
        });
    }
}
