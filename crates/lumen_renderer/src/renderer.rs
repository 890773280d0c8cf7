//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing, cut off at a fixed depth
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma 2 output encoding

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::{Camera, Color, Hittable, Ray, RenderError};
use lumen_core::RenderSettings;
use lumen_math::Interval;
use rand::RngCore;
use rayon::prelude::*;
use std::time::Instant;

/// Bounce at which a path stops scattering and returns only emission.
pub const MAX_DEPTH: u32 = 50;

/// Closest ray parameter a hit may have. Keeps scattered rays from
/// re-hitting the surface they left.
pub const T_MIN: f32 = 0.001;

/// What a ray that escapes the scene sees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Background {
    /// White-to-blue gradient by the ray's vertical direction
    #[default]
    Sky,
    /// Fixed color; black for scenes lit only by their lights
    Solid(Color),
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Sky => sky_gradient(ray),
            Background::Solid(color) => *color,
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Base seed for the per-pixel generators
    pub seed: u64,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
    /// Worker threads, 0 = rayon's global pool
    pub threads: usize,
    pub background: Background,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::from_settings(&RenderSettings::default(), Background::Sky)
    }
}

impl RenderConfig {
    pub fn from_settings(settings: &RenderSettings, background: Background) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            samples_per_pixel: settings.samples_per_pixel,
            seed: settings.seed,
            bucket_size: settings.bucket_size,
            threads: settings.threads,
            background,
        }
    }

    /// Reject sizes that would leave the image empty or average over no
    /// samples.
    pub fn validate(&self) -> Result<(), RenderError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("samples_per_pixel", self.samples_per_pixel),
        ];
        match positive.into_iter().find(|(_, value)| *value == 0) {
            Some((field, _)) => Err(RenderError::ZeroField { field }),
            None => Ok(()),
        }
    }
}

/// Compute the color seen by a ray.
///
/// `depth` counts bounces taken so far; call with 0 for a camera ray.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f32::INFINITY), rng) else {
        return background.color(ray);
    };

    // Get emission from material (for lights)
    let emitted = rec.material.emitted(rec.u, rec.v, rec.p);
    if depth >= MAX_DEPTH {
        return emitted;
    }

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            emitted
                + result.attenuation
                    * ray_color(&result.scattered, world, depth + 1, background, rng)
        }
        None => emitted,
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0). Negative input maps to 0.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Gamma-encode a linear color and quantize it to 8 bits per channel.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let encode = |c: f32| (255.99 * Interval::UNIT.clamp(linear_to_gamma(c))) as u8;
    [encode(color.x), encode(color.y), encode(color.z)]
}

/// Average `config.samples_per_pixel` jittered samples for the pixel at
/// column `x`, row `y` (row 0 is the top of the image).
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    // Image-plane t grows upward
    let j = config.height - 1 - y;
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + crate::gen_f32(rng)) / config.width as f32;
        let t = (j as f32 + crate::gen_f32(rng)) / config.height as f32;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, 0, &config.background, rng);
    }

    pixel_color / config.samples_per_pixel as f32
}

/// Linear radiance per pixel, row-major, top row first.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a finished bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        for ((x, y), color) in result.bucket.pixels().zip(&result.pixels) {
            self.set(x, y, *color);
        }
    }

    /// Gamma-corrected triplets, each channel in [0, 1].
    pub fn to_gamma(&self) -> Vec<[f32; 3]> {
        self.pixels
            .iter()
            .map(|c| {
                [c.x, c.y, c.z].map(|channel| Interval::UNIT.clamp(linear_to_gamma(channel)))
            })
            .collect()
    }

    /// 8-bit RGB bytes for encoding.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 3) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }
}

/// Render the entire scene to an image buffer.
///
/// Buckets are traced in parallel; each pixel draws from its own generator
/// seeded by `config.seed` and its position, so the image does not depend
/// on the thread count.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> Result<ImageBuffer, RenderError> {
    config.validate()?;
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);
    log::info!(
        "Rendering {}x{} at {} spp in {} buckets",
        config.width,
        config.height,
        config.samples_per_pixel,
        buckets.len()
    );
    let start = Instant::now();

    let trace = || -> Vec<BucketResult> {
        buckets
            .par_iter()
            .map(|bucket| {
                let result = render_bucket(bucket, camera, world, config);
                log::debug!("Bucket {} done", bucket.index);
                result
            })
            .collect()
    };

    let results = if config.threads == 0 {
        trace()
    } else {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?
            .install(trace)
    };

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AxisRect, DiffuseLight, Lambertian, Metal, PrimitiveList, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_config(width: u32, height: u32, samples: u32) -> RenderConfig {
        RenderConfig {
            width,
            height,
            samples_per_pixel: samples,
            bucket_size: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_gamma_and_quantize() {
        assert_eq!(linear_to_gamma(0.25), 0.5);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert_eq!(color_to_rgb8(Color::new(0.0, 1.0, 4.0)), [0, 255, 255]);
        assert_eq!(color_to_rgb8(Color::splat(0.25)), [127, 127, 127]);
    }

    #[test]
    fn test_empty_world_sees_background() {
        let world = PrimitiveList::new();
        let mut rng = StdRng::seed_from_u64(0);
        let up = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);

        let sky = ray_color(&up, &world, 0, &Background::Sky, &mut rng);
        assert!((sky - Color::new(0.5, 0.7, 1.0)).length() < 1e-6);

        let black = ray_color(&up, &world, 0, &Background::Solid(Color::ZERO), &mut rng);
        assert_eq!(black, Color::ZERO);
    }

    #[test]
    fn test_depth_cutoff_returns_emission_only() {
        let mut world = PrimitiveList::new();
        world.add(Sphere::new(
            Vec3::new(0.0, 0.0, -2.0),
            1.0,
            Lambertian::solid(Color::ONE),
        ));
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);

        let color = ray_color(&ray, &world, MAX_DEPTH, &Background::Sky, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_mirror_box_terminates() {
        // Two facing perfect mirrors: the path only ends at the depth cap
        let mut world = PrimitiveList::new();
        let mirror = || Metal::new(Color::splat(0.5), 0.0);
        world.add(AxisRect::xy(-5.0, 5.0, -5.0, 5.0, -1.0, mirror()));
        world.add(
            crate::Primitive::from(AxisRect::xy(-5.0, 5.0, -5.0, 5.0, 1.0, mirror())).flip_normal(),
        );
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);

        let color = ray_color(&ray, &world, 0, &Background::Sky, &mut rng);
        assert!(color.is_finite());
        assert!(color.max_element() < 1e-6);
    }

    #[test]
    fn test_render_is_deterministic_across_thread_counts() {
        let mut world = PrimitiveList::new();
        world.add(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Lambertian::solid(Color::splat(0.5)),
        ));
        world.add(Sphere::new(
            Vec3::new(0.0, 1.0, -1.0),
            0.25,
            DiffuseLight::new(Color::splat(3.0)),
        ));
        let camera = Camera::new();

        let with_threads = |threads| RenderConfig {
            threads,
            ..small_config(9, 7, 4)
        };

        let single = render(&camera, &world, &with_threads(1)).unwrap();
        let multi = render(&camera, &world, &with_threads(3)).unwrap();
        let global = render(&camera, &world, &small_config(9, 7, 4)).unwrap();

        assert_eq!(single.pixels, multi.pixels);
        assert_eq!(single.pixels, global.pixels);
        assert_eq!(single.to_rgb8().len(), 9 * 7 * 3);
    }

    #[test]
    fn test_zero_samples_rejected_before_tracing() {
        let world = PrimitiveList::new();
        let config = small_config(4, 4, 0);

        let err = render(&Camera::new(), &world, &config).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ZeroField {
                field: "samples_per_pixel"
            }
        ));
        assert!(small_config(0, 4, 1).validate().is_err());
        assert!(small_config(4, 4, 1).validate().is_ok());
    }

    #[test]
    fn test_to_gamma_row_major_in_unit_range() {
        let mut image = ImageBuffer::new(2, 2);
        image.set(0, 0, Color::new(0.25, 4.0, -1.0));
        image.set(1, 1, Color::splat(0.04));

        let gamma = image.to_gamma();
        assert_eq!(gamma.len(), 4);
        assert_eq!(gamma[0], [0.5, 1.0, 0.0]);
        assert_eq!(gamma[1], [0.0; 3]);
        assert!((gamma[3][0] - 0.2).abs() < 1e-6);
        assert!(gamma.iter().flatten().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn test_row_zero_is_top() {
        // Sky is bluer looking up, so the top row must have less red
        let world = PrimitiveList::new();
        let camera = Camera::new();
        let image = render(&camera, &world, &small_config(4, 6, 1)).unwrap();

        let top = image.get(2, 0);
        let bottom = image.get(2, 5);
        assert!(top.x < bottom.x);
    }
}
