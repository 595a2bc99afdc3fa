//! Discrete Fréchet and dynamic time warping distances.
//!
//! Both measures compare the stored instants of two values in time order,
//! ignoring timestamps, and differ only in how the cost of a matching is
//! accumulated: the Fréchet distance keeps the largest pairwise distance
//! along the best matching, time warping sums them.
use crate::base::BaseValue;
use crate::temporal::Temporal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measure {
    Frechet,
    DynTimeWarp,
}

impl Measure {
    fn combine(self, cost: f64, best_prior: f64) -> f64 {
        match self {
            Measure::Frechet => cost.max(best_prior),
            Measure::DynTimeWarp => cost + best_prior,
        }
    }
}

fn instant_values<V: BaseValue>(temp: &Temporal<V>) -> Vec<&V> {
    temp.instants().into_iter().map(|i| i.value()).collect()
}

fn distance<V: BaseValue>(a: &V, b: &V) -> f64 {
    a.distance(b).unwrap_or(f64::INFINITY)
}

fn min3(a: f64, b: f64, c: f64) -> f64 {
    a.min(b).min(c)
}

/// Accumulated cost using two rows of the matrix.
fn linear_space<V: BaseValue>(a: &Temporal<V>, b: &Temporal<V>, measure: Measure) -> Option<f64> {
    let (xs, ys) = (instant_values(a), instant_values(b));
    // base types without a distance have no similarity
    xs[0].distance(ys[0])?;

    let mut prev = vec![f64::INFINITY; ys.len()];
    let mut curr = vec![f64::INFINITY; ys.len()];
    for (i, x) in xs.iter().enumerate() {
        for (j, y) in ys.iter().enumerate() {
            let cost = distance(*x, *y);
            curr[j] = match (i, j) {
                (0, 0) => cost,
                (0, _) => measure.combine(cost, curr[j - 1]),
                (_, 0) => measure.combine(cost, prev[0]),
                _ => measure.combine(cost, min3(prev[j - 1], prev[j], curr[j - 1])),
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev.last().copied()
}

/// Full matrix, then the matching walked back from the last pair.
fn matching_path<V: BaseValue>(
    a: &Temporal<V>,
    b: &Temporal<V>,
    measure: Measure,
) -> Option<Vec<(usize, usize)>> {
    let (xs, ys) = (instant_values(a), instant_values(b));
    xs[0].distance(ys[0])?;

    let (n, m) = (xs.len(), ys.len());
    let mut acc = vec![vec![f64::INFINITY; m]; n];
    for i in 0..n {
        for j in 0..m {
            let cost = distance(xs[i], ys[j]);
            acc[i][j] = match (i, j) {
                (0, 0) => cost,
                (0, _) => measure.combine(cost, acc[0][j - 1]),
                (_, 0) => measure.combine(cost, acc[i - 1][0]),
                _ => measure.combine(cost, min3(acc[i - 1][j - 1], acc[i - 1][j], acc[i][j - 1])),
            };
        }
    }

    let (mut i, mut j) = (n - 1, m - 1);
    let mut path = vec![(i, j)];
    while i > 0 || j > 0 {
        (i, j) = if i == 0 {
            (0, j - 1)
        } else if j == 0 {
            (i - 1, 0)
        } else {
            let diagonal = acc[i - 1][j - 1];
            if diagonal <= acc[i - 1][j] && diagonal <= acc[i][j - 1] {
                (i - 1, j - 1)
            } else if acc[i - 1][j] <= acc[i][j - 1] {
                (i - 1, j)
            } else {
                (i, j - 1)
            }
        };
        path.push((i, j));
    }
    path.reverse();
    Some(path)
}

/// Discrete Fréchet distance between the instants of two values, or `None`
/// when the base type has no distance.
///
/// # Examples
///
/// ```
/// use tempora::similarity::frechet_distance;
/// use tempora::temporal::Temporal;
///
/// let a: Temporal<f64> = "[1@2001-01-01, 3@2001-01-02, 2@2001-01-03]".parse().unwrap();
/// let b: Temporal<f64> = "{1@2001-01-01, 2@2001-01-02}".parse().unwrap();
/// assert_eq!(frechet_distance(&a, &b), Some(1.0));
/// ```
pub fn frechet_distance<V: BaseValue>(a: &Temporal<V>, b: &Temporal<V>) -> Option<f64> {
    linear_space(a, b, Measure::Frechet)
}

pub fn dyn_time_warp_distance<V: BaseValue>(a: &Temporal<V>, b: &Temporal<V>) -> Option<f64> {
    linear_space(a, b, Measure::DynTimeWarp)
}

/// Index pairs `(i, j)` of the instants matched by the Fréchet distance,
/// from `(0, 0)` to the last instants of both values.
pub fn frechet_path<V: BaseValue>(a: &Temporal<V>, b: &Temporal<V>) -> Option<Vec<(usize, usize)>> {
    matching_path(a, b, Measure::Frechet)
}

pub fn dyn_time_warp_path<V: BaseValue>(
    a: &Temporal<V>,
    b: &Temporal<V>,
) -> Option<Vec<(usize, usize)>> {
    matching_path(a, b, Measure::DynTimeWarp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::GeomPoint;

    fn parse<V: BaseValue>(text: &str) -> Temporal<V> {
        text.parse().unwrap()
    }

    #[test]
    fn test_identical_values_have_zero_distance() {
        let a = parse::<i32>("{1@2001-01-01, 5@2001-01-02, 3@2001-01-03}");
        assert_eq!(frechet_distance(&a, &a), Some(0.0));
        assert_eq!(dyn_time_warp_distance(&a, &a), Some(0.0));
        assert_eq!(frechet_path(&a, &a), Some(vec![(0, 0), (1, 1), (2, 2)]));
    }

    #[test]
    fn test_warping_sums_frechet_takes_max() {
        let a = parse::<f64>("{0@2001-01-01, 0@2001-01-02, 0@2001-01-03}");
        let b = parse::<f64>("{1@2001-01-01, 2@2001-01-02}");
        assert_eq!(frechet_distance(&a, &b), Some(2.0));
        // matching (0,0) (1,0) (2,1)
        assert_eq!(dyn_time_warp_distance(&a, &b), Some(4.0));
        let path = dyn_time_warp_path(&a, &b).unwrap();
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(2, 1)));
    }

    #[test]
    fn test_path_is_monotone() {
        let a = parse::<i32>("{1@2001-01-01, 9@2001-01-02, 2@2001-01-03, 8@2001-01-04}");
        let b = parse::<i32>("{1@2001-01-01, 2@2001-01-02, 8@2001-01-03}");
        let path = frechet_path(&a, &b).unwrap();
        for pair in path.windows(2) {
            let (di, dj) = (pair[1].0 - pair[0].0, pair[1].1 - pair[0].1);
            assert!(di <= 1 && dj <= 1 && di + dj >= 1);
        }
    }

    #[test]
    fn test_points_use_euclidean_distance() {
        let a = parse::<GeomPoint>("[POINT(0 0)@2001-01-01, POINT(3 4)@2001-01-02]");
        let b = parse::<GeomPoint>("POINT(0 0)@2001-01-01");
        assert_eq!(frechet_distance(&a, &b), Some(5.0));
    }

    #[test]
    fn test_no_distance_for_bool() {
        let a = parse::<bool>("{t@2001-01-01, f@2001-01-02}");
        assert_eq!(frechet_distance(&a, &a), None);
        assert_eq!(dyn_time_warp_path(&a, &a), None);
    }
}
