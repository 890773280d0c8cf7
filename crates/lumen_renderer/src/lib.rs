//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer: rays leave the camera, bounce through a
//! frozen scene of primitives and materials, and accumulate emitted light.
//!
//! Scenes are closed sum types ([`Primitive`], [`Material`], [`Texture`])
//! built once, wrapped in a [`BvhNode`], then shared read-only by every
//! render thread.

mod bucket;
mod bvh;
mod camera;
mod error;
mod hittable;
mod material;
mod medium;
mod noise;
mod rect;
mod renderer;
mod sampling;
mod sphere;
mod texture;
mod transform;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use error::{RenderError, SceneError};
pub use hittable::{HitRecord, Hittable, Primitive, PrimitiveList};
pub use material::{
    refract, schlick, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal,
    ScatterResult,
};
pub use medium::ConstantMedium;
pub use noise::{NoiseSource, Perlin, ValueNoise, TURBULENCE_DEPTH};
pub use rect::{AxisRect, Block, RectPlane};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render, render_pixel, Background, ImageBuffer,
    RenderConfig, MAX_DEPTH, T_MIN,
};
pub use sampling::{gen_f32, pixel_rng, random_in_unit_disk, random_in_unit_sphere};
pub use sphere::{MovingSphere, Sphere};
pub use texture::{
    CheckerTexture, ImageTexture, NoiseBasis, NoiseFlavor, NoiseTexture, Texture,
};
pub use transform::{FlippedNormal, Rotated, Translated};

/// Re-export the math types scenes are written in
pub use lumen_math::{Aabb, Color, Interval, Point3, Ray, Vec3};
