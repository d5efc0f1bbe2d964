use ndarray::Array2;
use rand::{rngs::StdRng, SeedableRng as _};
use rand_distr::{Distribution as _, Normal, StandardNormal};

/// Generates `count` rows of dimension `dimension` with a decaying spectrum.
///
/// Each row is a random combination of `rank` fixed directions, with the weight of direction `i` scaled by `1 / (i + 1)`,
/// plus a small amount of isotropic noise. This gives the sketch a few dominant directions to find, which is closer to
/// real covariance data than pure noise.
pub fn make_rows(count: usize, dimension: usize, rank: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.05).expect("normal distribution should be valid");

    let directions = Array2::from_shape_simple_fn((rank, dimension), || StandardNormal.sample(&mut rng));
    let mut weights: Array2<f64> = Array2::from_shape_simple_fn((count, rank), || StandardNormal.sample(&mut rng));
    for (i, mut column) in weights.columns_mut().into_iter().enumerate() {
        column /= (i + 1) as f64;
    }

    let mut rows = weights.dot(&directions);
    rows.mapv_inplace(|v| v + noise.sample(&mut rng));
    rows
}
