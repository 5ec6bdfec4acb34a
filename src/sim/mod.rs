pub mod burst;
pub mod letters;
pub mod overlay;
pub mod particle;
pub mod rocket;
pub mod show;

pub use show::Show;

/// Uniform sample in `lo..hi`.
pub(crate) fn rand_range(rng: &mut fastrand::Rng, lo: f32, hi: f32) -> f32 {
    lo + rng.f32() * (hi - lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rand_range_stays_in_bounds() {
        let mut rng = fastrand::Rng::with_seed(1);
        for _ in 0..1000 {
            let v = rand_range(&mut rng, -2.5, 7.5);
            assert!((-2.5..7.5).contains(&v));
        }
    }
}
