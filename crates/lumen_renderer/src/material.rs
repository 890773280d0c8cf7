//! Surface and volume scattering models.

use crate::{gen_f32, hittable::HitRecord, random_in_unit_sphere, Ray, Texture};
use lumen_math::{Color, Vec3};
use rand::RngCore;

/// Outcome of a scattering event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel multiplier applied to light arriving along `scattered`
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Every material a primitive can carry.
#[derive(Clone)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
    Isotropic(Isotropic),
    DiffuseLight(DiffuseLight),
}

impl Material {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => Some(m.scatter(ray_in, rec, rng)),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => Some(m.scatter(ray_in, rec, rng)),
            Material::Isotropic(m) => Some(m.scatter(ray_in, rec, rng)),
            Material::DiffuseLight(_) => None,
        }
    }

    /// Light emitted at the given surface coordinates. Black for
    /// everything but lights.
    pub fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Material::DiffuseLight(light) => light.emit.value(u, v, p),
            _ => Color::ZERO,
        }
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Texture,
}

impl Lambertian {
    pub fn new(albedo: impl Into<Texture>) -> Self {
        Self {
            albedo: albedo.into(),
        }
    }

    /// Uniform color albedo.
    pub fn solid(albedo: Color) -> Self {
        Self::new(Texture::Constant(albedo))
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        let direction = rec.normal + random_in_unit_sphere(rng);
        ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        }
    }
}

/// Metal (specular) material.
#[derive(Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, clamped to 1.0
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Perturbed into the surface: absorbed
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }
        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Dielectric (glass) material. The outside is assumed to be air.
#[derive(Clone)]
pub struct Dielectric {
    ref_idx: f32,
}

impl Dielectric {
    /// - `ref_idx`: Index of refraction (1.5 = glass, 2.4 = diamond)
    pub fn new(ref_idx: f32) -> Self {
        Self { ref_idx }
    }

    /// Reflects or refracts; which one is drawn with the Schlick
    /// reflectance as the reflect probability.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        let dir = ray_in.direction();
        let d_dot_n = dir.dot(rec.normal);
        let reflected = reflect(dir, rec.normal);

        let (outward_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
            // Leaving the medium
            let cos_in = d_dot_n / dir.length();
            let cos_out =
                (1.0 - self.ref_idx * self.ref_idx * (1.0 - cos_in * cos_in)).sqrt();
            (-rec.normal, self.ref_idx, cos_out)
        } else {
            (rec.normal, 1.0 / self.ref_idx, -d_dot_n / dir.length())
        };

        let refracted = refract(dir, outward_normal, ni_over_nt);
        let reflect_prob = match refracted {
            Some(_) => schlick(cosine, self.ref_idx),
            None => 1.0,
        };

        let direction = match refracted {
            Some(r) if gen_f32(rng) >= reflect_prob => r,
            _ => reflected,
        };

        ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        }
    }
}

/// Phase function of a participating medium: scatters uniformly in all
/// directions.
#[derive(Clone)]
pub struct Isotropic {
    albedo: Texture,
}

impl Isotropic {
    pub fn new(albedo: impl Into<Texture>) -> Self {
        Self {
            albedo: albedo.into(),
        }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_in_unit_sphere(rng), ray_in.time()),
        }
    }
}

/// Diffuse light emitter. Emission may exceed 1.0.
#[derive(Clone)]
pub struct DiffuseLight {
    emit: Texture,
}

impl DiffuseLight {
    pub fn new(emit: impl Into<Texture>) -> Self {
        Self { emit: emit.into() }
    }
}

macro_rules! impl_from_for_material {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Material {
                fn from(value: $variant) -> Self {
                    Material::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_material!(Lambertian, Metal, Dielectric, Isotropic, DiffuseLight);

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Snell refraction of `v` through a surface with unit normal `n` facing
/// the incoming side. `None` on total internal reflection.
pub fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - dt * n) - discriminant.sqrt() * n)
    } else {
        None
    }
}

/// Schlick's approximation of Fresnel reflectance against air.
pub fn schlick(cosine: f32, ref_idx: f32) -> f32 {
    let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CheckerTexture, Interval};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(material: &Material, normal: Vec3) -> HitRecord<'_> {
        HitRecord {
            t: 1.0,
            p: Vec3::ZERO,
            normal,
            u: 0.5,
            v: 0.5,
            material,
        }
    }

    #[test]
    fn test_schlick_normal_incidence() {
        assert!((schlick(1.0, 1.5) - 0.04).abs() < 1e-6);
        assert!((schlick(0.0, 1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_refract_straight_through_and_total_internal() {
        let straight = refract(-Vec3::Y, Vec3::Y, 1.0 / 1.5).unwrap();
        assert!((straight - (-Vec3::Y)).length() < 1e-6);

        // Grazing exit from glass to air
        let grazing = Vec3::new(1.0, 0.1, 0.0);
        assert!(refract(grazing, -Vec3::Y, 1.5).is_none());
    }

    #[test]
    fn test_dielectric_normal_incidence_mostly_refracts() {
        let glass: Material = Dielectric::new(1.5).into();
        let rec = record(&glass, Vec3::Y);
        let ray_in = Ray::new(Vec3::Y, -Vec3::Y, 0.0);
        let mut rng = StdRng::seed_from_u64(21);

        let trials = 20_000;
        let mut reflected = 0;
        for _ in 0..trials {
            let s = glass.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert_eq!(s.attenuation, Color::ONE);
            if s.scattered.direction().y > 0.0 {
                reflected += 1;
            }
        }
        let fraction = reflected as f32 / trials as f32;
        assert!((fraction - 0.04).abs() < 0.01, "reflected {fraction}");
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let glass: Material = Dielectric::new(1.5).into();
        // Outward normal +Y; ray travels inside the glass toward the surface at a shallow angle
        let rec = record(&glass, Vec3::Y);
        let ray_in = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.1, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(22);

        for _ in 0..100 {
            let s = glass.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert!(s.scattered.direction().y < 0.0);
        }
    }

    #[test]
    fn test_lambertian_never_amplifies() {
        let checker = CheckerTexture::new(Color::new(0.2, 0.3, 0.1), Color::new(0.9, 0.9, 0.9));
        let mat: Material = Lambertian::new(checker).into();
        let mut rng = StdRng::seed_from_u64(23);
        let ray_in = Ray::new(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 0.5);

        for i in 0..500 {
            let mut rec = record(&mat, Vec3::Y);
            rec.p = Vec3::new(i as f32 * 0.013, 0.0, i as f32 * 0.007);
            let s = mat.scatter(&ray_in, &rec, &mut rng).unwrap();
            let a = s.attenuation;
            assert!(Interval::new(0.0, 1.0).contains(a.min_element()));
            assert!(Interval::new(0.0, 1.0).contains(a.max_element()));
            assert_eq!(s.scattered.time(), 0.5);
        }
    }

    #[test]
    fn test_metal_fuzz_clamped_and_mirror() {
        let mirror: Material = Metal::new(Color::splat(0.9), -3.0).into();
        let rec = record(&mirror, Vec3::Y);
        let ray_in = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(24);

        let s = mirror.scatter(&ray_in, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((s.scattered.direction() - expected).length() < 1e-5);
        assert_eq!(s.attenuation, Color::splat(0.9));
    }

    #[test]
    fn test_metal_absorbs_below_surface() {
        let rough: Material = Metal::new(Color::ONE, 1.0).into();
        let rec = record(&rough, Vec3::Y);
        // Grazing incidence: fuzz often pushes the reflection under the surface
        let ray_in = Ray::new(Vec3::ZERO, Vec3::new(1.0, -0.01, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(25);

        let mut absorbed = 0;
        for _ in 0..200 {
            match rough.scatter(&ray_in, &rec, &mut rng) {
                Some(s) => assert!(s.scattered.direction().dot(Vec3::Y) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_light_emits_and_never_scatters() {
        let light: Material = DiffuseLight::new(Color::splat(4.0)).into();
        let rec = record(&light, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(26);

        assert!(light
            .scatter(&Ray::new(Vec3::Y, -Vec3::Y, 0.0), &rec, &mut rng)
            .is_none());
        assert_eq!(light.emitted(0.1, 0.2, Vec3::ONE), Color::splat(4.0));

        let matte: Material = Lambertian::solid(Color::ONE).into();
        assert_eq!(matte.emitted(0.1, 0.2, Vec3::ONE), Color::ZERO);
    }

    #[test]
    fn test_isotropic_ignores_normal() {
        let fog: Material = Isotropic::new(Color::splat(0.5)).into();
        let rec = record(&fog, Vec3::X);
        let mut rng = StdRng::seed_from_u64(27);

        let s = fog
            .scatter(&Ray::new(Vec3::ZERO, Vec3::Z, 0.0), &rec, &mut rng)
            .unwrap();
        assert!(s.scattered.direction().length() < 1.0);
        assert_eq!(s.attenuation, Color::splat(0.5));
    }
}
