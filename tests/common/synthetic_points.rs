use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator shared by the synthetic fixtures.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// `count` points uniformly spread over a `length × width` rectangle on the
/// horizontal plane `y = height`, long side along x.
pub fn horizontal_rectangle(
    count: usize,
    length: f32,
    width: f32,
    height: f32,
    seed: u64,
) -> Vec<Vector3<f32>> {
    let mut rng = seeded(seed);
    (0..count)
        .map(|_| {
            Vector3::new(
                rng.random_range(-0.5 * length..0.5 * length),
                height,
                rng.random_range(-0.5 * width..0.5 * width),
            )
        })
        .collect()
}

/// Rectangle spanned by two unit directions around `center`, with optional
/// noise along `normal`.
pub fn oriented_patch(
    count: usize,
    center: Vector3<f32>,
    u: Vector3<f32>,
    v: Vector3<f32>,
    extents: (f32, f32),
    noise: f32,
    seed: u64,
) -> Vec<Vector3<f32>> {
    let mut rng = seeded(seed);
    let normal = u.cross(&v).normalize();
    (0..count)
        .map(|_| {
            let a = rng.random_range(-0.5 * extents.0..0.5 * extents.0);
            let b = rng.random_range(-0.5 * extents.1..0.5 * extents.1);
            let n = if noise > 0.0 {
                rng.random_range(-noise..noise)
            } else {
                0.0
            };
            center + u * a + v * b + normal * n
        })
        .collect()
}
