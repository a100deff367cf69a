use rand::Rng;

use crate::math::matrix::Matrix;

/// Half-width of the initial weight range for a layer with `fan_in` inputs: `1/√fan_in`.
pub fn init_bound(fan_in: usize) -> f64 {
    1.0 / (fan_in as f64).sqrt()
}

/// Fan-in scaled uniform initialization.
///
/// Shape: (rows, cols). `cols` is the fan-in, so each entry is drawn from
/// `U[-1/√cols, 1/√cols]`. This keeps initial sigmoid inputs near zero where
/// the activation is not saturated.
pub fn fan_in_uniform<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
    Matrix::uniform(rows, cols, init_bound(cols), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn bound_shrinks_with_fan_in() {
        assert_eq!(init_bound(1), 1.0);
        assert_eq!(init_bound(4), 0.5);
        assert_eq!(init_bound(100), 0.1);
    }

    #[test]
    fn draws_stay_inside_fan_in_bound() {
        let mut rng = StdRng::seed_from_u64(2024);
        let w = fan_in_uniform(200, 784, &mut rng);
        let bound = init_bound(784);
        assert_eq!(w.shape(), (200, 784));
        assert!(w.iter().all(|x| x.abs() <= bound));
        // a draw this large should reach close to both ends of the range
        assert!(w.iter().any(|x| x > bound * 0.9));
        assert!(w.iter().any(|x| x < -bound * 0.9));
    }

    #[test]
    fn same_seed_same_weights() {
        let a = fan_in_uniform(3, 5, &mut StdRng::seed_from_u64(1));
        let b = fan_in_uniform(3, 5, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }
}
