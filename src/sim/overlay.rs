use crate::display::{TextId, TextLayer, Transform};

/// Countdown driving the fade/drift/swell of a caption. Re-armed to its
/// maximum every time the matching burst recipe fires; decays by one per tick
/// and pins the caption fully hidden at zero. Opacity is always
/// `remaining / max`.
pub struct OverlayTimer {
    max: i32,
    remaining: i32,
    lift: f32,
    rise: f32,
    swell: f32,
    pub id: Option<TextId>,
}

impl OverlayTimer {
    /// The caption floated by the realistic burst's smoke.
    pub fn smoke() -> Self {
        Self {
            max: 120,
            remaining: 0,
            lift: -18.0,
            rise: 4.0,
            swell: 600.0,
            id: None,
        }
    }

    /// The caption flashed by the premium burst.
    pub fn premium() -> Self {
        Self {
            max: 160,
            remaining: 0,
            lift: -8.0,
            rise: 8.0,
            swell: 800.0,
            id: None,
        }
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn opacity(&self) -> f32 {
        self.remaining as f32 / self.max as f32
    }

    pub fn arm(&mut self, text: &mut impl TextLayer) {
        self.remaining = self.max;
        if let Some(id) = self.id {
            text.set_opacity(id, 1.0);
            text.set_transform(
                id,
                Transform {
                    ty: self.lift,
                    ..Transform::default()
                },
            );
        }
    }

    pub fn tick(&mut self, text: &mut impl TextLayer) {
        if self.remaining > 0 {
            self.remaining -= 1;
            let gone = (self.max - self.remaining) as f32;
            if let Some(id) = self.id {
                text.set_opacity(id, self.opacity());
                text.set_transform(
                    id,
                    Transform {
                        tx: 0.0,
                        ty: self.lift - gone / self.rise,
                        rot: 0.0,
                        scale: 1.0 + gone / self.swell,
                    },
                );
            }
        } else if let Some(id) = self.id {
            text.set_opacity(id, 0.0);
        }
    }
}

/// Delayed accent attached to the premium caption: pops in part-way through,
/// vanishes again shortly after, then disarms until the next burst.
pub struct ClapCue {
    age: Option<i32>,
    pub id: Option<TextId>,
}

const CLAP_APPEAR: i32 = 42; // ~0.7 s after the burst
const CLAP_VANISH: i32 = 120; // ~2 s after the burst

impl ClapCue {
    pub fn new() -> Self {
        Self { age: None, id: None }
    }

    pub fn armed(&self) -> bool {
        self.age.is_some()
    }

    pub fn arm(&mut self) {
        self.age = Some(0);
    }

    pub fn tick(&mut self, text: &mut impl TextLayer) {
        let Some(age) = self.age.as_mut() else {
            return;
        };
        *age += 1;
        if *age == CLAP_APPEAR {
            if let Some(id) = self.id {
                text.set_opacity(id, 1.0);
                text.set_transform(
                    id,
                    Transform {
                        scale: 1.1,
                        ..Transform::default()
                    },
                );
            }
        } else if *age >= CLAP_VANISH {
            if let Some(id) = self.id {
                text.set_opacity(id, 0.0);
                text.set_transform(
                    id,
                    Transform {
                        scale: 0.9,
                        ..Transform::default()
                    },
                );
            }
            self.age = None;
        }
    }
}
