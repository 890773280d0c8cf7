//! Image tiling for parallel rendering.
//!
//! The frame is cut into square buckets that share nothing but the
//! read-only scene, so rayon can trace them in any order. They are handed
//! out centre first.

use crate::renderer::render_pixel;
use crate::{pixel_rng, Camera, Color, Hittable, RenderConfig};

/// A rectangle of pixels traced as one task. `(x, y)` is its top-left
/// pixel, with row 0 at the top of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Image coordinates of every pixel, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| (x, y)))
    }

    /// Squared distance from the bucket centre to the image centre, in
    /// half-pixel units so it stays integral.
    fn centre_distance(&self, width: u32, height: u32) -> i64 {
        let dx = i64::from(2 * self.x + self.width) - i64::from(width);
        let dy = i64::from(2 * self.y + self.height) - i64::from(height);
        dx * dx + dy * dy
    }
}

/// Cover a `width` x `height` image with buckets of at most `bucket_size`
/// pixels a side, ordered from the image centre outward. Ties keep
/// scanline order.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1) as usize;

    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(size)
        .flat_map(|y| {
            (0..width).step_by(size).map(move |x| {
                let size = size as u32;
                Bucket::new(x, y, size.min(width - x), size.min(height - y), 0)
            })
        })
        .collect();

    buckets.sort_by_key(|b| b.centre_distance(width, height));
    for (index, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = index;
    }
    buckets
}

/// A traced bucket, pixels in the order of [`Bucket::pixels`].
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub pixels: Vec<Color>,
}

/// Trace every pixel of `bucket`, each with its own [`pixel_rng`] stream.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> BucketResult {
    let pixels = bucket
        .pixels()
        .map(|(x, y)| {
            let mut rng = pixel_rng(config.seed, x, y);
            render_pixel(camera, world, x, y, config, &mut rng)
        })
        .collect();

    BucketResult {
        bucket: *bucket,
        pixels,
    }
}
