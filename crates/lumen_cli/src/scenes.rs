//! Built-in demo scenes.
//!
//! Every scene draws its random choices (sphere layout, noise tables) from
//! one generator seeded by the render seed, so a given seed always builds
//! the same world.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use lumen_core::Bitmap;
use lumen_renderer::{
    AxisRect, Background, Block, Camera, CheckerTexture, Color, ConstantMedium, Dielectric,
    DiffuseLight, ImageTexture, Lambertian, Material, Metal, MovingSphere, NoiseFlavor,
    NoiseTexture, Perlin, Primitive, PrimitiveList, Sphere, ValueNoise, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Field of small spheres, the diffuse ones bouncing during the shutter
    RandomSpheres,
    /// Value-noise ground with netting and marble spheres
    NoiseSpheres,
    /// Image-mapped globe on a checker floor
    Globe,
    /// Marble spheres lit only by two area lights
    SimpleLight,
    CornellBox,
    /// Cornell box with the two blocks turned to smoke
    CornellSmoke,
    /// Cornell box with two glass spheres filled with colored fog
    CornellJade,
}

/// Everything needed to render one frame.
pub struct Scene {
    pub world: PrimitiveList,
    pub camera: Camera,
    pub background: Background,
}

/// Build `kind` for an image of the given aspect ratio.
///
/// `texture` is only read by [`SceneKind::Globe`].
pub fn build(kind: SceneKind, aspect_ratio: f32, seed: u64, texture: &Path) -> Result<Scene> {
    let mut rng = StdRng::seed_from_u64(seed);
    let scene = match kind {
        SceneKind::RandomSpheres => random_spheres(&mut rng, aspect_ratio),
        SceneKind::NoiseSpheres => noise_spheres(&mut rng, aspect_ratio),
        SceneKind::Globe => globe(texture, aspect_ratio)?,
        SceneKind::SimpleLight => simple_light(&mut rng, aspect_ratio),
        SceneKind::CornellBox => cornell_box(aspect_ratio),
        SceneKind::CornellSmoke => cornell_smoke(aspect_ratio),
        SceneKind::CornellJade => cornell_jade(aspect_ratio),
    };
    log::info!("Built scene {:?}: {} top-level objects", kind, scene.world.len());
    Ok(scene)
}

fn outdoor_camera(look_from: Vec3, look_at: Vec3, vfov: f32, aperture: f32, aspect: f32) -> Camera {
    Camera::new()
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(vfov, aperture, 10.0)
        .with_aspect_ratio(aspect)
        .with_shutter(0.0, 1.0)
}

fn random_spheres(rng: &mut StdRng, aspect: f32) -> Scene {
    let mut world = PrimitiveList::new();
    world.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(CheckerTexture::new(
            Color::new(0.2, 0.3, 0.1),
            Color::new(0.9, 0.9, 0.9),
        )),
    ));

    let big_spheres = [
        Vec3::new(-4.0, 0.2, 0.0),
        Vec3::new(0.0, 0.2, 0.0),
        Vec3::new(4.0, 0.2, 0.0),
    ];

    for a in -10..10 {
        for b in -10..10 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if big_spheres.iter().any(|c| (center - *c).length() <= 0.9) {
                continue;
            }

            if choose_mat < 0.8 {
                // Diffuse, bouncing up during the shutter
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                let rise = Vec3::new(0.0, 0.5 * rng.gen::<f32>(), 0.0);
                world.add(MovingSphere::new(
                    center,
                    center + rise,
                    0.0,
                    1.0,
                    0.2,
                    Lambertian::solid(albedo),
                ));
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 * (1.0 + rng.gen::<f32>()),
                    0.5 * (1.0 + rng.gen::<f32>()),
                    0.5 * (1.0 + rng.gen::<f32>()),
                );
                let fuzz = 0.5 * rng.gen::<f32>();
                world.add(Sphere::new(center, 0.2, Metal::new(albedo, fuzz)));
            } else {
                world.add(Sphere::new(center, 0.2, Dielectric::new(1.5)));
            }
        }
    }

    world.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Dielectric::new(1.5)));
    world.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Lambertian::solid(Color::new(0.3, 0.5, 0.2)),
    ));
    world.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Metal::new(Color::new(0.7, 0.6, 0.5), 0.3),
    ));

    Scene {
        world,
        camera: outdoor_camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0, 0.1, aspect),
        background: Background::Sky,
    }
}

fn noise_spheres(rng: &mut StdRng, aspect: f32) -> Scene {
    let value = ValueNoise::new(rng);
    let perlin = Perlin::new(rng);

    let mut world = PrimitiveList::new();
    world.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(NoiseTexture::new(value, 3.0, NoiseFlavor::Raw)),
    ));
    let perlin = lumen_renderer::NoiseBasis::from(perlin);
    world.add(Sphere::new(
        Vec3::new(2.0, 2.0, 0.0),
        2.0,
        Lambertian::new(NoiseTexture::new(perlin.clone(), 5.0, NoiseFlavor::Turbulence)),
    ));
    world.add(Sphere::new(
        Vec3::new(-2.0, 2.0, 0.0),
        2.0,
        Lambertian::new(NoiseTexture::new(perlin, 3.0, NoiseFlavor::Marble)),
    ));

    Scene {
        world,
        camera: outdoor_camera(
            Vec3::new(10.0, 2.0, 10.0),
            Vec3::new(0.0, 1.0, 0.0),
            30.0,
            0.0,
            aspect,
        ),
        background: Background::Sky,
    }
}

fn globe(texture: &Path, aspect: f32) -> Result<Scene> {
    let bitmap = Bitmap::load(texture)
        .with_context(|| format!("globe scene needs a texture at {}", texture.display()))?;

    let mut world = PrimitiveList::new();
    world.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(CheckerTexture::new(
            Color::new(0.2, 0.3, 0.1),
            Color::new(0.9, 0.9, 0.9),
        )),
    ));
    world.add(Sphere::new(
        Vec3::new(-2.0, 2.0, 0.0),
        2.0,
        Lambertian::new(ImageTexture::new(bitmap)),
    ));
    world.add(Sphere::new(Vec3::new(2.0, 1.0, 0.0), 1.0, Dielectric::new(1.5)));

    Ok(Scene {
        world,
        camera: outdoor_camera(
            Vec3::new(18.0, 5.0, 10.0),
            Vec3::new(-2.0, 2.0, 0.0),
            30.0,
            0.0,
            aspect,
        ),
        background: Background::Sky,
    })
}

fn simple_light(rng: &mut StdRng, aspect: f32) -> Scene {
    let marble = Lambertian::new(NoiseTexture::new(Perlin::new(rng), 4.0, NoiseFlavor::Marble));

    let mut world = PrimitiveList::new();
    world.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone()));
    world.add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble));
    let red_light = DiffuseLight::new(Color::new(1.0, 0.0, 0.0));
    world.add(AxisRect::xz(-1.0, 1.0, -1.0, 1.0, 5.0, red_light));
    world.add(AxisRect::xy(3.0, 5.0, 1.0, 3.0, -2.0, DiffuseLight::new(Color::splat(4.0))));

    Scene {
        world,
        camera: outdoor_camera(
            Vec3::new(18.0, 7.0, 10.0),
            Vec3::new(0.0, 2.0, 0.0),
            30.0,
            0.0,
            aspect,
        ),
        background: Background::Solid(Color::ZERO),
    }
}

/// The five walls of a 555-unit Cornell box, lit by `light` spanning
/// `light_x` by `light_z` just under the ceiling.
fn cornell_walls(light: Color, light_x: (f32, f32), light_z: (f32, f32)) -> PrimitiveList {
    let red: Material = Lambertian::solid(Color::new(0.65, 0.05, 0.05)).into();
    let white: Material = Lambertian::solid(Color::splat(0.73)).into();
    let green: Material = Lambertian::solid(Color::new(0.12, 0.45, 0.15)).into();

    let (x0, x1) = light_x;
    let (z0, z1) = light_z;
    let inward = |wall: AxisRect| Primitive::from(wall).flip_normal();

    let mut walls = PrimitiveList::new();
    walls.add(inward(AxisRect::yz(0.0, 555.0, 0.0, 555.0, 555.0, green)));
    walls.add(AxisRect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red));
    walls.add(AxisRect::xz(x0, x1, z0, z1, 554.0, DiffuseLight::new(light)));
    walls.add(inward(AxisRect::xz(0.0, 555.0, 0.0, 555.0, 555.0, white.clone())));
    walls.add(AxisRect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white.clone()));
    walls.add(inward(AxisRect::xy(0.0, 555.0, 0.0, 555.0, 555.0, white)));
    walls
}

/// The short and tall blocks, turned and placed on the floor.
fn cornell_blocks() -> (Primitive, Primitive) {
    let white = Lambertian::solid(Color::splat(0.73));
    let short = Primitive::from(Block::new(Vec3::ZERO, Vec3::splat(165.0), white.clone()))
        .rotate_y(-18.0)
        .translate(Vec3::new(130.0, 0.0, 65.0));
    let tall = Primitive::from(Block::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white))
        .rotate_y(15.0)
        .translate(Vec3::new(265.0, 0.0, 295.0));
    (short, tall)
}

fn cornell_camera(aspect: f32) -> Camera {
    Camera::new()
        .with_position(Vec3::new(278.0, 278.0, -800.0), Vec3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0)
        .with_aspect_ratio(aspect)
        .with_shutter(0.0, 1.0)
}

fn cornell_box(aspect: f32) -> Scene {
    let mut world = cornell_walls(Color::splat(15.0), (213.0, 343.0), (227.0, 332.0));
    let (short, tall) = cornell_blocks();
    world.add(short);
    world.add(tall);

    Scene {
        world,
        camera: cornell_camera(aspect),
        background: Background::Solid(Color::ZERO),
    }
}

fn cornell_smoke(aspect: f32) -> Scene {
    let mut world = cornell_walls(Color::splat(7.0), (113.0, 443.0), (127.0, 432.0));
    let (short, tall) = cornell_blocks();
    world.add(ConstantMedium::new(short, 0.01, Color::ONE));
    world.add(ConstantMedium::new(tall, 0.01, Color::ZERO));

    Scene {
        world,
        camera: cornell_camera(aspect),
        background: Background::Solid(Color::ZERO),
    }
}

fn cornell_jade(aspect: f32) -> Scene {
    let mut world = cornell_walls(Color::splat(7.0), (113.0, 443.0), (127.0, 432.0));

    // Glass shells with fog inside: the shell refracts, the fog scatters
    let jade = [
        (Vec3::new(360.0, 120.0, 270.0), 120.0, 0.08, Color::new(0.2, 0.4, 0.9)),
        (Vec3::new(180.0, 65.0, 140.0), 65.0, 0.18, Color::new(0.2, 0.8, 0.4)),
    ];
    for (center, radius, density, tint) in jade {
        world.add(Sphere::new(center, radius, Dielectric::new(1.6)));
        world.add(ConstantMedium::new(
            Sphere::new(center, radius, Dielectric::new(1.6)).into(),
            density,
            tint,
        ));
    }

    Scene {
        world,
        camera: cornell_camera(aspect),
        background: Background::Solid(Color::ZERO),
    }
}
