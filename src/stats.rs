use crate::config::RefConfig;
use anyhow::{Result, bail};
use ndarray::{Array1, ArrayView1};

/// Compute the z-score of every value against the reference distribution.
///
/// Each output element is `(val - mean) / std_dev`, computed independently.
pub fn standardize(vals: ArrayView1<f64>, reference: &RefConfig) -> Result<Array1<f64>> {
    let RefConfig { mean, std_dev } = *reference;
    if std_dev == 0.0 || !std_dev.is_finite() {
        bail!("standard deviation must be finite and non-zero, but is {std_dev}");
    }
    Ok(vals.mapv(|val| (val - mean) / std_dev))
}

/// Running mean and sample standard deviation (Welford's algorithm).
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

#[derive(Debug, PartialEq)]
pub struct AccumulatorReport {
    pub n_vals: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
        }
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    pub fn report(&self) -> AccumulatorReport {
        AccumulatorReport {
            n_vals: self.n_vals,
            mean: if self.n_vals > 0 { self.mean } else { f64::NAN },
            std_dev: if self.n_vals > 1 {
                (self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt()
            } else {
                f64::NAN
            },
        }
    }
}

/// Summarize the finite values of an array.
pub fn summarize(vals: ArrayView1<f64>) -> AccumulatorReport {
    let mut acc = Accumulator::new();
    for &val in vals.iter().filter(|val| val.is_finite()) {
        acc.add(val);
    }
    acc.report()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn reference(mean: f64, std_dev: f64) -> RefConfig {
        RefConfig { mean, std_dev }
    }

    #[test]
    fn mean_maps_to_zero_and_one_std_to_one() {
        let z = standardize(array![293.0, 363.0, 223.0].view(), &RefConfig::default()).unwrap();
        assert_eq!(z, array![0.0, 1.0, -1.0]);
    }

    #[test]
    fn output_is_elementwise_and_same_length() {
        let vals = array![1.0, 5.0, -3.0, 10.5];
        let z = standardize(vals.view(), &reference(2.0, 4.0)).unwrap();
        assert_eq!(z.len(), vals.len());
        for (&v, &s) in vals.iter().zip(z.iter()) {
            assert!((s - (v - 2.0) / 4.0).abs() < 1e-12);
        }
    }

    #[test]
    fn not_idempotent_in_general() {
        let r = RefConfig::default();
        let once = standardize(array![400.0].view(), &r).unwrap();
        let twice = standardize(once.view(), &r).unwrap();
        assert_ne!(once, twice);
    }

    #[test]
    fn idempotent_for_unit_reference() {
        let r = reference(0.0, 1.0);
        let once = standardize(array![400.0, -2.5].view(), &r).unwrap();
        let twice = standardize(once.view(), &r).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn zero_std_dev_fails() {
        assert!(standardize(array![1.0].view(), &reference(0.0, 0.0)).is_err());
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let z = standardize(Array1::<f64>::zeros(0).view(), &RefConfig::default()).unwrap();
        assert!(z.is_empty());
    }

    #[test]
    fn summary_matches_sample_statistics() {
        let report = summarize(array![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0, f64::NAN].view());
        assert_eq!(report.n_vals, 8);
        assert!((report.mean - 5.0).abs() < 1e-12);
        assert!((report.std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn summary_of_single_value_has_no_std_dev() {
        let report = summarize(array![3.0].view());
        assert_eq!(report.mean, 3.0);
        assert!(report.std_dev.is_nan());
    }
}
