//! Spawn strategies: where new particles are anchored

use wisp_core::{ParticleRng, Result, Vec2};
use wisp_mask::ShapeRegion;

/// How a system keeps its population in line with the config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// Rebuild the whole population on init and on every config change
    Resample,
    /// Start empty, grow a random batch per tick, truncate when `max_particles` shrinks
    Regrow,
}

/// A source of spawn anchors in canvas pixels
pub trait SpawnStrategy {
    /// Human-readable name for logging
    fn name(&self) -> &str;

    /// Number of distinct anchors available, or None when effectively unlimited
    fn capacity(&self) -> Option<usize>;

    /// True when nothing can ever be spawned
    fn is_empty(&self) -> bool;

    /// `n` distinct anchors
    fn sample_unique(&self, rng: &mut ParticleRng, n: usize) -> Result<Vec<Vec2>>;

    /// One anchor; repeated calls may return the same point
    fn sample_one(&self, rng: &mut ParticleRng) -> Result<Vec2>;

    /// The reconciliation policy this kind of region is normally paired with
    fn default_reconcile(&self) -> Reconcile;
}

/// A finite set of eligible pixels, e.g. the opaque pixels of a rasterized mask
pub struct MaskPoints {
    points: Vec<Vec2>,
}

impl MaskPoints {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

impl SpawnStrategy for MaskPoints {
    fn name(&self) -> &str {
        "pixel mask"
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.points.len())
    }

    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn sample_unique(&self, rng: &mut ParticleRng, n: usize) -> Result<Vec<Vec2>> {
        rng.sample_without_replacement(&self.points, n)
    }

    fn sample_one(&self, rng: &mut ParticleRng) -> Result<Vec2> {
        rng.choose_one(&self.points).copied()
    }

    fn default_reconcile(&self) -> Reconcile {
        Reconcile::Resample
    }
}

/// Vector shapes sampled on demand. Without any shapes it falls back to
/// uniform integer points over the whole canvas.
pub struct ShapeSpawner {
    region: ShapeRegion,
    canvas_size: (u32, u32),
}

impl ShapeSpawner {
    pub fn new(region: ShapeRegion, canvas_size: (u32, u32)) -> Self {
        if region.is_empty() {
            log::warn!("[particles] No spawn areas detected, spawning across the whole canvas");
        }
        Self {
            region,
            canvas_size,
        }
    }

    pub fn region(&self) -> &ShapeRegion {
        &self.region
    }
}

impl SpawnStrategy for ShapeSpawner {
    fn name(&self) -> &str {
        "vector shapes"
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn is_empty(&self) -> bool {
        false
    }

    fn sample_unique(&self, rng: &mut ParticleRng, n: usize) -> Result<Vec<Vec2>> {
        // Continuous region: independent draws are distinct almost surely
        (0..n).map(|_| self.sample_one(rng)).collect()
    }

    fn sample_one(&self, rng: &mut ParticleRng) -> Result<Vec2> {
        if self.region.is_empty() {
            let (width, height) = self.canvas_size;
            return Ok(Vec2::new(
                rng.uniform_int(0.0, width as f32) as f32,
                rng.uniform_int(0.0, height as f32) as f32,
            ));
        }
        self.region.random_point_in_region(rng)
    }

    fn default_reconcile(&self) -> Reconcile {
        Reconcile::Regrow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisp_core::WispError;
    use wisp_mask::{Shape, ShapeDocument, ViewBox};

    fn document(shapes: Vec<Shape>) -> ShapeDocument {
        ShapeDocument {
            view_box: ViewBox {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
            },
            rendered_width: 100.0,
            rendered_height: 100.0,
            offset: [0.0, 0.0],
            shapes,
        }
    }

    #[test]
    fn mask_points_capacity_and_sampling() {
        let points: Vec<Vec2> = (0..5).map(|i| Vec2::new(i as f32, 0.0)).collect();
        let spawner = MaskPoints::new(points.clone());
        let mut rng = ParticleRng::new(1);

        assert_eq!(spawner.capacity(), Some(5));
        assert_eq!(spawner.default_reconcile(), Reconcile::Resample);
        assert_eq!(spawner.sample_unique(&mut rng, 5).unwrap().len(), 5);
        assert!(points.contains(&spawner.sample_one(&mut rng).unwrap()));
        assert!(matches!(
            spawner.sample_unique(&mut rng, 6),
            Err(WispError::InsufficientPopulation { .. })
        ));
    }

    #[test]
    fn empty_mask_cannot_sample_one() {
        let spawner = MaskPoints::new(vec![]);
        let mut rng = ParticleRng::new(1);
        assert!(spawner.is_empty());
        assert!(matches!(
            spawner.sample_one(&mut rng),
            Err(WispError::EmptyCollection)
        ));
    }

    #[test]
    fn shape_spawner_stays_in_scaled_shape() {
        let region = ShapeRegion::new(document(vec![Shape::Rect {
            x: 2.0,
            y: 2.0,
            width: 1.0,
            height: 1.0,
        }]));
        let spawner = ShapeSpawner::new(region, (100, 100));
        let mut rng = ParticleRng::new(2);

        assert_eq!(spawner.capacity(), None);
        assert_eq!(spawner.default_reconcile(), Reconcile::Regrow);
        for p in spawner.sample_unique(&mut rng, 50).unwrap() {
            assert!(p.x >= 20.0 && p.x <= 30.0, "x = {}", p.x);
            assert!(p.y >= 20.0 && p.y <= 30.0, "y = {}", p.y);
        }
    }

    #[test]
    fn shape_spawner_without_shapes_covers_canvas() {
        let spawner = ShapeSpawner::new(ShapeRegion::new(document(vec![])), (8, 4));
        let mut rng = ParticleRng::new(3);

        assert!(!spawner.is_empty());
        for _ in 0..200 {
            let p = spawner.sample_one(&mut rng).unwrap();
            assert!(p.x >= 0.0 && p.x <= 8.0 && p.x.fract() == 0.0);
            assert!(p.y >= 0.0 && p.y <= 4.0 && p.y.fract() == 0.0);
        }
    }
}
