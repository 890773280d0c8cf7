//! Lumen Core - inputs the renderer consumes but does not compute.
//!
//! This crate provides:
//!
//! - **Bitmaps**: decoded texture images (`Bitmap`) loaded with the `image` crate
//! - **Settings**: the render settings document (`RenderSettings`), read from JSON
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{Bitmap, RenderSettings};
//!
//! let settings = RenderSettings::load("render.json")?;
//! let earth = Bitmap::load("earthmap.jpg")?;
//! println!("{}x{} @ {} spp", settings.width, settings.height, settings.samples_per_pixel);
//! ```

pub mod bitmap;
pub mod settings;

pub use bitmap::{Bitmap, TextureError, TextureResult};
pub use settings::{RenderSettings, SettingsError};
