use std::fmt;

use tracing::debug;

use crate::error::{FuzzyError, Result};
use crate::math::{centroid, interp, nearest_index, round_dp};
use crate::universe::Universe;

/// A type-1 fuzzy set: a membership function sampled on the grid of a
/// [`Universe`].
///
/// Membership values always lie in `[0, 1]` and are rounded to
/// [`FuzzySet::PRECISION`] decimals whenever they are written.
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzySet {
    name: String,
    universe: Universe,
    domain: Vec<f64>,
    membership: Vec<f64>,
}

impl FuzzySet {
    /// Decimal places kept in membership values
    pub const PRECISION: i32 = 3;

    /// An empty (all zero) set on `[min, max]` sampled at `res` points.
    pub fn new(name: impl Into<String>, min: f64, max: f64, res: usize) -> Result<Self> {
        Self::with_universe(name, Universe::new(min, max, res)?)
    }

    pub fn with_universe(name: impl Into<String>, universe: Universe) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(FuzzyError::construction("fuzzy set name must not be empty"));
        }

        let domain: Vec<f64> = universe.grid().collect();
        let membership = vec![0.; domain.len()];

        Ok(Self {
            name,
            universe,
            domain,
            membership,
        })
    }

    /// Triangular membership rising from `a` to a peak at `m` and falling back
    /// to zero at `b`. The three points are snapped to the grid first; `a == m`
    /// or `m == b` make that side a vertical step.
    #[allow(clippy::too_many_arguments)]
    pub fn triangular(
        name: impl Into<String>,
        min: f64,
        max: f64,
        res: usize,
        a: f64,
        m: f64,
        b: f64,
    ) -> Result<Self> {
        Self::triangular_on(name, Universe::new(min, max, res)?, a, m, b)
    }

    pub fn triangular_on(name: impl Into<String>, universe: Universe, a: f64, m: f64, b: f64) -> Result<Self> {
        let set = Self::with_universe(name, universe)?;

        if !(a <= m && m <= b) {
            return Err(FuzzyError::construction(format!(
                "triangular set `{}` needs a <= m <= b, got ({a}, {m}, {b})",
                set.name
            )));
        }

        let (a, m, b) = (set.adjust_domain_val(a), set.adjust_domain_val(m), set.adjust_domain_val(b));
        let values = interp(set.domain.iter().copied(), [(a, 0.), (m, 1.), (b, 0.)]);

        Ok(set.with_membership(values))
    }

    /// Trapezoidal membership: zero outside `[a, d]`, rising on `[a, b]`, one
    /// on `[b, c]` and falling on `[c, d]`. Where a slope collapses to a single
    /// grid point the plateau wins.
    #[allow(clippy::too_many_arguments)]
    pub fn trapezoidal(
        name: impl Into<String>,
        min: f64,
        max: f64,
        res: usize,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
    ) -> Result<Self> {
        Self::trapezoidal_on(name, Universe::new(min, max, res)?, a, b, c, d)
    }

    pub fn trapezoidal_on(
        name: impl Into<String>,
        universe: Universe,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
    ) -> Result<Self> {
        let set = Self::with_universe(name, universe)?;

        if !(a <= b && b <= c && c <= d) {
            return Err(FuzzyError::construction(format!(
                "trapezoidal set `{}` needs a <= b <= c <= d, got ({a}, {b}, {c}, {d})",
                set.name
            )));
        }

        let [a, b, c, d] = [a, b, c, d].map(|p| set.adjust_domain_val(p));
        let values = interp(set.domain.iter().copied(), [(a, 0.), (b, 1.), (c, 1.), (d, 0.)]);

        Ok(set.with_membership(values))
    }

    /// Piecewise-linear membership through `(x, membership)` points. Outside
    /// the first and last point the membership is held constant.
    pub fn from_points(name: impl Into<String>, universe: Universe, points: &[(f64, f64)]) -> Result<Self> {
        let set = Self::with_universe(name, universe)?;

        if points.is_empty() {
            return Err(FuzzyError::construction(format!("set `{}` has no points", set.name)));
        }
        if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(FuzzyError::construction(format!(
                "set `{}` has a non-finite point",
                set.name
            )));
        }

        let mut points = points.to_vec();

        points.sort_by(|(x1, _), (x2, _)| x1.total_cmp(x2));

        let values = interp(set.domain.iter().copied(), points);

        Ok(set.with_membership(values))
    }

    fn with_membership(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        for (slot, value) in self.membership.iter_mut().zip(values) {
            *slot = Self::round(value);
        }

        self
    }

    fn derived(&self, name: String, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            name,
            universe: self.universe,
            domain: self.domain.clone(),
            membership: vec![0.; self.domain.len()],
        }
        .with_membership(values)
    }

    pub(crate) fn renamed(mut self, name: String) -> Self {
        self.name = name;
        self
    }

    // NaN counts as no membership
    fn round(value: f64) -> f64 {
        if value.is_nan() {
            return 0.;
        }

        round_dp(value.clamp(0., 1.), Self::PRECISION)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> Universe {
        self.universe
    }

    /// The sampled domain values, ascending
    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    /// The membership value for each domain sample
    pub fn membership(&self) -> &[f64] {
        &self.membership
    }

    /// The grid value nearest to `x`.
    pub fn adjust_domain_val(&self, x: f64) -> f64 {
        self.domain[nearest_index(&self.domain, x)]
    }

    /// Degree of membership of `x`, read at the nearest grid point.
    pub fn lookup(&self, x: f64) -> f64 {
        self.membership[nearest_index(&self.domain, x)]
    }

    /// Overwrite the membership of the grid point nearest to `x`.
    pub fn set(&mut self, x: f64, dom: f64) {
        let i = nearest_index(&self.domain, x);

        self.membership[i] = Self::round(dom);
    }

    pub fn is_empty(&self) -> bool {
        self.membership.iter().all(|m| *m == 0.)
    }

    pub fn clear_set(&mut self) {
        self.membership.fill(0.);
    }

    /// Clip the set at `x`.
    pub fn min_scalar(&self, x: f64) -> Self {
        self.derived(
            format!("({}) min ({x})", self.name),
            self.membership.iter().map(|m| m.min(x)),
        )
    }

    pub fn union(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;

        Ok(self.derived(
            format!("({}) union ({})", self.name, other.name),
            self.membership.iter().zip(&other.membership).map(|(u, v)| u.max(*v)),
        ))
    }

    pub fn intersection(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;

        Ok(self.derived(
            format!("({}) intersection ({})", self.name, other.name),
            self.membership.iter().zip(&other.membership).map(|(u, v)| u.min(*v)),
        ))
    }

    pub fn complement(&self) -> Self {
        self.derived(format!("not ({})", self.name), self.membership.iter().map(|m| 1. - m))
    }

    /// Center of gravity of the membership function.
    ///
    /// A set with no mass has no centroid; the midpoint of the universe is
    /// returned instead so callers never see NaN.
    pub fn defuzzify_cog(&self) -> f64 {
        centroid(&self.domain, &self.membership).unwrap_or_else(|| {
            let fallback = self.universe.midpoint();

            debug!(set = %self.name, fallback, "empty fuzzy set, using universe midpoint");

            fallback
        })
    }

    fn check_compatible(&self, other: &Self) -> Result<()> {
        if self.universe != other.universe {
            return Err(FuzzyError::DomainMismatch {
                left: self.universe,
                right: other.universe,
            });
        }

        Ok(())
    }
}

impl fmt::Display for FuzzySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (m, x)) in self.membership.iter().zip(&self.domain).enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{m}/{x}")?;
        }

        Ok(())
    }
}
