use num::Float;

/// Similar to numpy.interp, sampling the piecewise-linear function through
/// `coords` (sorted by x) at every point of `x_input`. Values beyond either
/// end are held at the nearest y. A vertical segment (two coords sharing an
/// x) is a step and evaluates to the larger of its two ys.
pub(crate) fn interp<F: Float>(
    x_input: impl IntoIterator<Item = F>,
    coords: impl IntoIterator<Item = (F, F)>,
) -> Vec<F> {
    let coords: Vec<(F, F)> = coords.into_iter().collect();

    x_input.into_iter().map(|x| sample(&coords, x)).collect()
}

fn sample<F: Float>(coords: &[(F, F)], x: F) -> F {
    let (Some(&(first_x, first_y)), Some(&(last_x, last_y))) = (coords.first(), coords.last()) else {
        return F::zero();
    };

    // Base cases
    if x < first_x {
        return first_y;
    }
    if x > last_x {
        return last_y;
    }

    for pair in coords.windows(2) {
        let (x1, y1) = pair[0];
        let (x2, y2) = pair[1];

        if x1 <= x && x <= x2 {
            if x1 == x2 {
                return F::max(y1, y2);
            }

            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    last_y
}

/// Index of the grid point closest to `x`. `grid` must be sorted ascending and
/// non-empty; on a tie the lower index wins.
pub(crate) fn nearest_index<F: Float>(grid: &[F], x: F) -> usize {
    let i = grid.partition_point(|g| *g < x);

    if i == 0 {
        return 0;
    }
    if i >= grid.len() {
        return grid.len() - 1;
    }

    if x - grid[i - 1] <= grid[i] - x {
        i - 1
    } else {
        i
    }
}

pub(crate) fn round_dp<F: Float>(x: F, decimals: i32) -> F {
    let scale = F::from(10.).unwrap_or_else(F::one).powi(decimals);

    (x * scale).round() / scale
}

/// Center of gravity of a sampled function, `None` when it has no mass.
pub(crate) fn centroid<F: Float>(universe: &[F], membership: &[F]) -> Option<F> {
    let (num, den) = universe
        .iter()
        .zip(membership)
        .fold((F::zero(), F::zero()), |(num, den), (&x, &m)| (num + x * m, den + m));

    if den == F::zero() {
        None
    } else {
        Some(num / den)
    }
}

#[test]
fn test_interp() {
    let x = [0., 1., 1.5, 2.72, 3.24];
    let xs = [1., 2., 3.];
    let ys = [3., 2., 0.];

    assert_eq!(
        interp(x, xs.into_iter().zip(ys)),
        vec![3., 3., 2.5, 0.5599999999999996, 0.]
    );

    let x = [2.5, -1., 7.5];
    let xs = [0., 1., 2., 3., 4.5];
    let ys = [0., 2., 5., 3., 2.];

    assert_eq!(interp(x, xs.into_iter().zip(ys)), vec![4., 0., 2.]);
}

#[test]
fn test_interp_steps() {
    let x = [0., 1., 2., 3., 4.];

    // rises vertically at 0, falls linearly to 4
    assert_eq!(
        interp(x, [(0., 0.), (0., 1.), (4., 0.)]),
        vec![1., 0.75, 0.5, 0.25, 0.]
    );
    // plateau that drops vertically at 2
    assert_eq!(
        interp(x, [(0., 0.), (1., 1.), (2., 1.), (2., 0.)]),
        vec![0., 1., 1., 0., 0.]
    );
    assert!(interp(x, std::iter::empty::<(f64, f64)>()).iter().all(|y| *y == 0.));
}

#[test]
fn test_nearest_index() {
    let grid = [0., 1., 2., 3., 4.];

    assert_eq!(nearest_index(&grid, -3.), 0);
    assert_eq!(nearest_index(&grid, 0.2), 0);
    assert_eq!(nearest_index(&grid, 2.5), 2);
    assert_eq!(nearest_index(&grid, 2.51), 3);
    assert_eq!(nearest_index(&grid, 3.), 3);
    assert_eq!(nearest_index(&grid, 99.), 4);
    assert_eq!(nearest_index(&[7.], 1.), 0);
}

#[test]
fn test_round_dp() {
    assert_eq!(round_dp(0.12345, 3), 0.123);
    assert_eq!(round_dp(0.6666666, 3), 0.667);
    assert_eq!(round_dp(1. - 0.3, 3), 0.7);
}

#[test]
fn test_centroid() {
    assert_eq!(centroid(&[0., 1., 2.], &[1., 1., 1.]), Some(1.));
    assert_eq!(centroid(&[0., 1., 2.], &[0., 0., 0.]), None);
}
