use slotmap::new_key_type;

use crate::color::Rgb;

new_key_type! {
    /// Key for a text handle owned by a [`TextLayer`].
    pub struct TextId;
}

/// 2D transform applied to a text handle, relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub tx: f32,
    pub ty: f32,
    pub rot: f32,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            tx: 0.0,
            ty: 0.0,
            rot: 0.0,
            scale: 1.0,
        }
    }
}

/// Immediate-mode drawing surface with a persistent pixel buffer.
///
/// Coordinates are virtual pixels; implementations decide how those map onto
/// real output. `fade` blends the whole buffer toward a color, which is what
/// produces the motion-trail look when called once per frame with low alpha.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn fade(&mut self, color: Rgb, alpha: f32);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32);
    /// Soft halo around a point, used for glowing particles.
    fn glow(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32);
}

/// Retained text handles layered over the surface: captions and bouncing
/// letters. Handles are created at an anchor point (virtual pixels) and moved
/// around it via [`Transform`]. Stale ids are ignored.
pub trait TextLayer {
    fn create(&mut self, text: &str, anchor_x: f32, anchor_y: f32) -> TextId;
    fn set_opacity(&mut self, id: TextId, opacity: f32);
    fn set_transform(&mut self, id: TextId, transform: Transform);
    fn remove(&mut self, id: TextId);
}
