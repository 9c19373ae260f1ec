use num::Float;

/// Evenly spaced samples over a closed interval, numpy.linspace style.
pub struct Linspace<F> {
    start: F,
    end: F,
    step: F,
    index: usize,
    len: usize,
}

impl<F: Float> Linspace<F> {
    pub fn new(min: F, max: F, n: usize) -> Self {
        let step = if n > 1 {
            // usize -> float never fails for Float impls
            let num_steps = F::from(n - 1).unwrap_or_else(F::one);
            (max - min) / num_steps
        } else {
            F::zero()
        };
        Linspace {
            start: min,
            end: max,
            step,
            index: 0,
            len: n,
        }
    }
}

impl<F: Float> Iterator for Linspace<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        if self.index >= self.len {
            return None;
        }

        let i = self.index;
        self.index += 1;

        // numpy pins the endpoint instead of accumulating rounding error into it
        if i + 1 == self.len && i > 0 {
            return Some(self.end);
        }

        Some(self.start + self.step * F::from(i).unwrap_or_else(F::zero))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<F: Float> ExactSizeIterator for Linspace<F> {}

#[test]
fn test_linspace() {
    let xs: Vec<f64> = Linspace::new(0., 10., 11).collect();

    assert_eq!(xs, vec![0., 1., 2., 3., 4., 5., 6., 7., 8., 9., 10.]);

    let xs: Vec<f64> = Linspace::new(0., 1., 4).collect();

    assert_eq!(xs.len(), 4);
    assert_eq!(xs[0], 0.);
    assert_eq!(xs[3], 1.);

    let xs: Vec<f32> = Linspace::new(2., 5., 1).collect();

    assert_eq!(xs, vec![2.]);
    assert_eq!(Linspace::<f64>::new(0., 1., 0).count(), 0);
}
