//! Background star field
//!
//! Purely visual: stars stream toward the camera at a difficulty-scaled speed
//! and wrap back to the far plane. Nothing in gameplay reads them.

use glam::Vec3;
use rand::Rng;

/// Plain white
pub const STAR_WHITE: u32 = 0xffffff;
/// Occasional colored stars
pub const STAR_PALETTE: [u32; 5] = [0xffffff, 0xadd8e6, 0xffa07a, 0xffff99, 0xdda0dd];
/// Chance a star picks from the palette instead of plain white
pub const COLORED_STAR_CHANCE: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec3,
    pub color: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Starfield {
    pub stars: Vec<Star>,
    /// Edge length of the cube stars are scattered in
    spread: f32,
}

impl Starfield {
    pub fn new(count: usize, spread: f32, rng: &mut impl Rng) -> Self {
        let stars = (0..count)
            .map(|_| {
                let color = if rng.random_bool(COLORED_STAR_CHANCE) {
                    STAR_PALETTE[rng.random_range(0..STAR_PALETTE.len())]
                } else {
                    STAR_WHITE
                };
                Star {
                    pos: scatter(spread, rng),
                    color,
                }
            })
            .collect();
        Self { stars, spread }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Scatter every star through the cube again (colors are kept)
    pub fn reseed(&mut self, rng: &mut impl Rng) {
        for star in &mut self.stars {
            star.pos = scatter(self.spread, rng);
        }
    }

    /// Stream stars toward the camera, wrapping those past `wrap_z`
    pub fn advance(&mut self, speed: f32, wrap_z: f32, reset_z: f32, rng: &mut impl Rng) {
        let half = self.spread / 2.0;
        for star in &mut self.stars {
            star.pos.z += speed;
            if star.pos.z > wrap_z {
                star.pos.z = reset_z;
                star.pos.x = (rng.random::<f32>() - 0.5) * 2.0 * half;
                star.pos.y = (rng.random::<f32>() - 0.5) * 2.0 * half;
            }
        }
    }
}

fn scatter(spread: f32, rng: &mut impl Rng) -> Vec3 {
    Vec3::new(
        (rng.random::<f32>() - 0.5) * spread,
        (rng.random::<f32>() - 0.5) * spread,
        (rng.random::<f32>() - 0.5) * spread,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_stars_inside_cube() {
        let mut rng = Pcg32::seed_from_u64(5);
        let field = Starfield::new(1000, 200.0, &mut rng);
        assert_eq!(field.len(), 1000);
        assert!(field.stars.iter().all(|s| s.pos.abs().max_element() <= 100.0));
        // Mostly white
        let colored = field.stars.iter().filter(|s| s.color != STAR_WHITE).count();
        assert!(colored < 100);
    }

    #[test]
    fn test_wrap_to_far_plane() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut field = Starfield::new(1, 200.0, &mut rng);
        field.stars[0].pos = Vec3::new(10.0, 10.0, 14.8);
        field.advance(0.5, 15.0, -200.0, &mut rng);
        assert_eq!(field.stars[0].pos.z, -200.0);
        assert!(field.stars[0].pos.x.abs() <= 100.0);

        field.advance(0.5, 15.0, -200.0, &mut rng);
        assert_eq!(field.stars[0].pos.z, -199.5);
    }

    #[test]
    fn test_reseed_moves_stars() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut field = Starfield::new(50, 200.0, &mut rng);
        let before: Vec<Vec3> = field.stars.iter().map(|s| s.pos).collect();
        field.reseed(&mut rng);
        let moved = field.stars.iter().zip(&before).filter(|(s, b)| s.pos != **b).count();
        assert!(moved > 40);
    }
}
