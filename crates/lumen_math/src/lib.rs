// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;

/// Points and directions share the vector type.
pub type Point3 = Vec3;

/// Linear RGB color. Components may exceed 1.0 for emitters.
pub type Color = Vec3;
