//! Lattice noise for procedural textures.
//!
//! Both generators hash the 8 lattice corners around a point through three
//! 256-entry permutation tables and blend the corner values with Hermite
//! weights. Tables are drawn from the generator passed to `new`, so a
//! seeded scene always gets the same noise.

use crate::gen_f32;
use lumen_math::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;

/// Octaves summed by [`NoiseSource::turb`] unless told otherwise.
pub const TURBULENCE_DEPTH: u32 = 7;

const TABLE_SIZE: usize = 256;

/// A scalar field over 3D space.
pub trait NoiseSource {
    fn noise(&self, p: Vec3) -> f32;

    /// Sum of `depth` octaves, each at double the frequency and half the
    /// amplitude of the last, taken as an absolute value.
    fn turb(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0_f32;
        let mut temp_p = p;
        let mut weight = 1.0_f32;
        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }
        accum.abs()
    }
}

#[derive(Clone)]
struct Permutations {
    x: Vec<usize>,
    y: Vec<usize>,
    z: Vec<usize>,
}

impl Permutations {
    fn new(rng: &mut dyn RngCore) -> Self {
        Self {
            x: shuffled(rng),
            y: shuffled(rng),
            z: shuffled(rng),
        }
    }

    /// Table index for the lattice point (i, j, k).
    #[inline]
    fn hash(&self, i: i32, j: i32, k: i32) -> usize {
        self.x[(i & 255) as usize] ^ self.y[(j & 255) as usize] ^ self.z[(k & 255) as usize]
    }
}

fn shuffled(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..TABLE_SIZE).collect();
    perm.shuffle(rng);
    perm
}

/// Lattice cell and fractional position of `p`.
#[inline]
fn cell(p: Vec3) -> ([i32; 3], Vec3) {
    let base = p.floor();
    (
        [base.x as i32, base.y as i32, base.z as i32],
        p - base,
    )
}

/// Hermite smoothstep `3t^2 - 2t^3`, per component.
#[inline]
fn hermite(t: Vec3) -> Vec3 {
    t * t * (Vec3::splat(3.0) - 2.0 * t)
}

/// Interpolation weight of corner `c` (0 or 1) at fraction `t`.
#[inline]
fn corner_weight(c: usize, t: f32) -> f32 {
    if c == 1 {
        t
    } else {
        1.0 - t
    }
}

/// Random scalar per lattice point, blended trilinearly. Output in [0, 1).
#[derive(Clone)]
pub struct ValueNoise {
    values: Vec<f32>,
    perm: Permutations,
}

impl ValueNoise {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let values = (0..TABLE_SIZE).map(|_| gen_f32(rng)).collect();
        Self {
            values,
            perm: Permutations::new(rng),
        }
    }
}

impl NoiseSource for ValueNoise {
    fn noise(&self, p: Vec3) -> f32 {
        let ([i, j, k], frac) = cell(p);
        let w = hermite(frac);

        let mut accum = 0.0;
        for di in 0..2 {
            for dj in 0..2 {
                for dk in 0..2 {
                    let value =
                        self.values[self.perm.hash(i + di as i32, j + dj as i32, k + dk as i32)];
                    accum += corner_weight(di, w.x)
                        * corner_weight(dj, w.y)
                        * corner_weight(dk, w.z)
                        * value;
                }
            }
        }
        accum
    }
}

/// Random unit gradient per lattice point; the field is zero at every
/// lattice point and roughly in [-1, 1] between them.
#[derive(Clone)]
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm: Permutations,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..TABLE_SIZE)
            .map(|_| {
                let v = Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng)) * 2.0 - Vec3::ONE;
                v.normalize_or_zero()
            })
            .collect();
        Self {
            gradients,
            perm: Permutations::new(rng),
        }
    }
}

impl NoiseSource for Perlin {
    fn noise(&self, p: Vec3) -> f32 {
        let ([i, j, k], frac) = cell(p);
        let w = hermite(frac);

        let mut accum = 0.0;
        for di in 0..2 {
            for dj in 0..2 {
                for dk in 0..2 {
                    let gradient =
                        self.gradients[self.perm.hash(i + di as i32, j + dj as i32, k + dk as i32)];
                    let offset = frac - Vec3::new(di as f32, dj as f32, dk as f32);
                    accum += corner_weight(di, w.x)
                        * corner_weight(dj, w.y)
                        * corner_weight(dk, w.z)
                        * gradient.dot(offset);
                }
            }
        }
        accum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_points() -> Vec<Vec3> {
        (0..200)
            .map(|i| {
                let f = i as f32;
                Vec3::new(f * 0.137 - 7.0, f * 0.291 - 20.0, f * 0.053 + 3.0)
            })
            .collect()
    }

    fn assert_seeded<N: NoiseSource>(build: impl Fn(&mut dyn RngCore) -> N) {
        let a = build(&mut StdRng::seed_from_u64(5));
        let b = build(&mut StdRng::seed_from_u64(5));
        let c = build(&mut StdRng::seed_from_u64(6));

        let points = sample_points();
        assert!(points.iter().all(|&p| a.noise(p) == a.noise(p)));
        assert!(points.iter().all(|&p| a.noise(p) == b.noise(p)));
        assert!(points.iter().any(|&p| a.noise(p) != c.noise(p)));
        assert!(points.iter().all(|&p| a.turb(p, 7) == b.turb(p, 7)));
    }

    #[test]
    fn test_same_seed_same_noise() {
        assert_seeded(Perlin::new);
        assert_seeded(ValueNoise::new);
    }

    #[test]
    fn test_perlin_is_continuous() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(7));
        let eps = 1e-3;
        for p in sample_points() {
            for step in [Vec3::X, Vec3::Y, Vec3::Z] {
                let delta = (perlin.noise(p + step * eps) - perlin.noise(p)).abs();
                // Gradient magnitude is bounded by a small constant
                assert!(delta < 10.0 * eps, "jump of {delta} at {p}");
            }
        }
    }

    #[test]
    fn test_perlin_zero_on_lattice() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(8));
        for p in [Vec3::ZERO, Vec3::new(3.0, -2.0, 7.0), Vec3::new(-100.0, 5.0, 0.0)] {
            assert!(perlin.noise(p).abs() < 1e-6);
        }
    }

    #[test]
    fn test_value_noise_range_and_lattice_values() {
        let mut rng = StdRng::seed_from_u64(9);
        let noise = ValueNoise::new(&mut rng);
        for p in sample_points() {
            let n = noise.noise(p);
            assert!((0.0..=1.0).contains(&n), "value noise {n} out of range");
        }

        // On a lattice point only one corner has weight
        let at_origin = noise.noise(Vec3::ZERO);
        assert_eq!(at_origin, noise.values[noise.perm.hash(0, 0, 0)]);
    }

    #[test]
    fn test_turbulence_non_negative() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(10));
        for p in sample_points() {
            assert!(perlin.turb(p, TURBULENCE_DEPTH) >= 0.0);
        }
        assert_eq!(perlin.turb(Vec3::new(0.3, 0.1, 0.9), 0), 0.0);
    }

    #[test]
    fn test_permutation_tables_are_permutations() {
        let perm = Permutations::new(&mut StdRng::seed_from_u64(11));
        for table in [&perm.x, &perm.y, &perm.z] {
            let mut sorted = table.clone();
            sorted.sort_unstable();
            assert!(sorted.iter().enumerate().all(|(i, &v)| i == v));
        }
    }
}
