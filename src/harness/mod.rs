//! Differential test harness: every backend against the scalar reference.
//!
//! A [`Harness`] owns a seeded generator and a [`HarnessConfig`]. Each case
//! is an independent generate → compute → compare transaction:
//!
//! 1. fill inputs from the generator,
//! 2. compute the expected result with [`crate::simd::scalar`],
//! 3. compute the actual result with the backend under test,
//! 4. compare with [`Tolerance::ELEMENTWISE`] (vectors) or
//!    [`Tolerance::REDUCTION`] (`dot`).
//!
//! Output buffers carry a guard region past `n`, filled with a sentinel.
//! A kernel that writes beyond its slice, typically a broken remainder
//! loop, fails the case even when the in-range values are right.
//!
//! ```
//! use floats_simd::Portable;
//! use floats_simd::harness::{Harness, HarnessConfig};
//!
//! let mut harness = Harness::new(HarnessConfig::covering(8).with_seed(1));
//! let report = harness.run(&Portable);
//! assert!(report.is_success());
//! assert!(report.covers_all_residues(8));
//! ```

mod generate;


pub use generate::Values;

use core::fmt;

use num_traits::Float;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::simd::{Portable, scalar};
use crate::tolerance::Tolerance;
use crate::traits::Kernels;

#[cfg(target_arch = "x86_64")]
use crate::simd::Avx;
#[cfg(target_arch = "aarch64")]
use crate::simd::Neon;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 0x5EED_F10A_7500_0001;

/// Environment variable overriding [`HarnessConfig::seed`].
pub const SEED_VAR: &str = "FLOATS_SIMD_SEED";

/// Environment variable overriding [`HarnessConfig::values`].
pub const VALUES_VAR: &str = "FLOATS_SIMD_VALUES";

/// Elements past `n` in every output buffer that must stay untouched.
const GUARD: usize = 8;

/// Guard fill. Not producible from the generated inputs.
const SENTINEL: f32 = -8191.75;

/// The five kernels under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ScaleAddInto,
    ScaleInto,
    ScaleInPlace,
    MultiplyInto,
    Dot,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::ScaleAddInto,
        Operation::ScaleInto,
        Operation::ScaleInPlace,
        Operation::MultiplyInto,
        Operation::Dot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::ScaleAddInto => "scale_add_into",
            Operation::ScaleInto => "scale_into",
            Operation::ScaleInPlace => "scale_in_place",
            Operation::MultiplyInto => "multiply_into",
            Operation::Dot => "dot",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A backend result outside tolerance of the reference.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error(
    "{op} mismatch on {backend} (n={n}, seed={seed:#x}) at {}: expected {expected}, actual {actual}",
    position(.index)
)]
pub struct Mismatch {
    pub op: Operation,
    pub backend: &'static str,
    pub n: usize,
    pub seed: u64,
    /// Offending element; `None` for the scalar `dot` result. Indices
    /// `>= n` point into the guard region.
    pub index: Option<usize>,
    pub expected: f32,
    pub actual: f32,
}

fn position(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!("index {i}"),
        None => "result".to_string(),
    }
}

/// Harness failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HarnessError {
    #[error("invalid FLOATS_SIMD_SEED {0:?}: expected a decimal or 0x-prefixed u64")]
    InvalidSeed(String),
    #[error("invalid FLOATS_SIMD_VALUES {0:?}: expected \"ints\" or \"unit\"")]
    InvalidValues(String),
    #[error("{failed} of {total} cases failed on {backend}; first: {first}")]
    Failed {
        backend: &'static str,
        failed: usize,
        total: usize,
        first: Mismatch,
    },
}

/// What a harness run generates and checks.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub seed: u64,
    /// Every length is checked for every operation.
    pub lengths: Vec<usize>,
    pub values: Values,
    /// Repetitions per (operation, length) pair, each with fresh inputs.
    pub iterations: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::covering(8)
    }
}

impl HarnessConfig {
    /// Lengths `0..=2*lanes+1` (every residue, pure-remainder and
    /// bulk-plus-remainder), plus 31 and two larger arrays.
    pub fn covering(lanes: usize) -> Self {
        let mut lengths: Vec<usize> = (0..=2 * lanes + 1).collect();
        for n in [31, 257, 1000] {
            if !lengths.contains(&n) {
                lengths.push(n);
            }
        }
        Self {
            seed: DEFAULT_SEED,
            lengths,
            values: Values::default(),
            iterations: 1,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_values(mut self, values: Values) -> Self {
        self.values = values;
        self
    }

    pub fn with_lengths(mut self, lengths: impl IntoIterator<Item = usize>) -> Self {
        self.lengths = lengths.into_iter().collect();
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Default configuration with [`SEED_VAR`] / [`VALUES_VAR`] applied.
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the environment, a map, ...).
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, HarnessError> {
        if let Some(raw) = lookup(SEED_VAR) {
            self.seed = parse_seed(&raw)?;
        }
        if let Some(raw) = lookup(VALUES_VAR) {
            self.values = raw.parse().map_err(HarnessError::InvalidValues)?;
        }
        Ok(self)
    }
}

fn parse_seed(raw: &str) -> Result<u64, HarnessError> {
    let s = raw.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|_| HarnessError::InvalidSeed(raw.to_string()))
}

/// Outcome of one (operation, length) case.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    pub op: Operation,
    pub n: usize,
    pub outcome: Result<(), Mismatch>,
}

impl CaseResult {
    /// Case name, e.g. `dot/n=17`.
    pub fn name(&self) -> String {
        format!("{}/n={}", self.op, self.n)
    }

    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Aggregated results of [`Harness::run`] for one backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub backend: &'static str,
    pub lanes: usize,
    pub seed: u64,
    pub cases: Vec<CaseResult>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Mismatch> {
        self.cases.iter().filter_map(|c| c.outcome.as_ref().err())
    }

    pub fn is_success(&self) -> bool {
        self.cases.iter().all(CaseResult::passed)
    }

    /// True when every operation ran at least once for each residue
    /// `n % lanes` in `0..lanes`, including `n = 0` and some `0 < n < lanes`.
    pub fn covers_all_residues(&self, lanes: usize) -> bool {
        if lanes == 0 {
            return false;
        }
        Operation::ALL.iter().all(|&op| {
            let ns: Vec<usize> = self.cases.iter().filter(|c| c.op == op).map(|c| c.n).collect();
            let residues = (0..lanes).all(|r| ns.iter().any(|n| n % lanes == r));
            let empty = ns.contains(&0);
            let remainder_only = lanes == 1 || ns.iter().any(|&n| n > 0 && n < lanes);
            residues && empty && remainder_only
        })
    }

    /// `Ok` when every case passed, otherwise [`HarnessError::Failed`].
    pub fn into_result(self) -> Result<(), HarnessError> {
        let total = self.cases.len();
        let failed = self.failed();
        match self.cases.into_iter().find_map(|c| c.outcome.err()) {
            None => Ok(()),
            Some(first) => Err(HarnessError::Failed {
                backend: self.backend,
                failed,
                total,
                first,
            }),
        }
    }
}

/// Seeded differential tester.
#[derive(Debug)]
pub struct Harness {
    config: HarnessConfig,
    rng: StdRng,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    /// Run every operation at every configured length against `backend`.
    pub fn run<K: Kernels>(&mut self, backend: &K) -> Report {
        let lengths = self.config.lengths.clone();
        let mut cases = Vec::with_capacity(lengths.len() * Operation::ALL.len() * self.config.iterations);

        for op in Operation::ALL {
            for &n in &lengths {
                for _ in 0..self.config.iterations {
                    let outcome = self.check(op, backend, n);
                    match &outcome {
                        Ok(()) => debug!(%op, backend = K::NAME, n, "case passed"),
                        Err(mismatch) => warn!(%mismatch, "case failed"),
                    }
                    cases.push(CaseResult { op, n, outcome });
                }
            }
        }

        let report = Report {
            backend: K::NAME,
            lanes: K::LANES,
            seed: self.config.seed,
            cases,
        };
        info!(
            backend = report.backend,
            lanes = report.lanes,
            seed = report.seed,
            passed = report.passed(),
            failed = report.failed(),
            "differential run finished"
        );
        report
    }

    /// Run against every backend the current CPU can execute.
    pub fn run_available(&mut self) -> Vec<Report> {
        let mut reports = vec![self.run(&Portable)];
        #[cfg(target_arch = "x86_64")]
        {
            match Avx::detect() {
                Some(avx) => reports.push(self.run(&avx)),
                None => info!("avx backend unavailable on this cpu; skipped"),
            }
        }
        #[cfg(target_arch = "aarch64")]
        {
            reports.push(self.run(&Neon));
        }
        reports
    }

    /// One generate → compute → compare transaction.
    pub fn check<K: Kernels>(&mut self, op: Operation, backend: &K, n: usize) -> Result<(), Mismatch> {
        let values = self.config.values;
        let seed = self.config.seed;
        let rng = &mut self.rng;
        let fail = |index: Option<usize>, expected: f32, actual: f32| Mismatch {
            op,
            backend: K::NAME,
            n,
            seed,
            index,
            expected,
            actual,
        };

        match op {
            Operation::ScaleAddInto => {
                let a = values.vec(rng, n);
                let b = values.sample(rng);
                let c = values.vec(rng, n);
                let mut expected = guarded(&c);
                let mut actual = guarded(&c);
                scalar::scale_add_into(&a, b, &mut expected[..n]);
                backend.scale_add_into(&a, b, &mut actual[..n]);
                let scale = |i: usize| Float::abs(c[i]) + Float::abs(a[i] * b);
                compare(&expected, &actual, n, scale).map_err(|(i, e, x)| fail(Some(i), e, x))
            }
            Operation::ScaleInto => {
                let a = values.vec(rng, n);
                let b = values.sample(rng);
                let mut expected = vec![SENTINEL; n + GUARD];
                let mut actual = expected.clone();
                scalar::scale_into(&a, b, &mut expected[..n]);
                backend.scale_into(&a, b, &mut actual[..n]);
                compare(&expected, &actual, n, |i| Float::abs(expected[i])).map_err(|(i, e, x)| fail(Some(i), e, x))
            }
            Operation::ScaleInPlace => {
                let a = values.vec(rng, n);
                let b = values.sample(rng);
                let mut expected = guarded(&a);
                let mut actual = guarded(&a);
                scalar::scale_in_place(&mut expected[..n], b);
                backend.scale_in_place(&mut actual[..n], b);
                compare(&expected, &actual, n, |i| Float::abs(expected[i])).map_err(|(i, e, x)| fail(Some(i), e, x))
            }
            Operation::MultiplyInto => {
                let a = values.vec(rng, n);
                let b = values.vec(rng, n);
                let mut expected = vec![SENTINEL; n + GUARD];
                let mut actual = expected.clone();
                scalar::multiply_into(&a, &b, &mut expected[..n]);
                backend.multiply_into(&a, &b, &mut actual[..n]);
                compare(&expected, &actual, n, |i| Float::abs(expected[i])).map_err(|(i, e, x)| fail(Some(i), e, x))
            }
            Operation::Dot => {
                let a = values.vec(rng, n);
                let b = values.vec(rng, n);
                let expected = scalar::dot(&a, &b);
                let actual = backend.dot(&a, &b);
                let scale: f32 = a.iter().zip(&b).map(|(x, y)| Float::abs(x * y)).sum();
                // An empty dot product is exactly zero on every backend.
                let tolerance = if n == 0 { Tolerance::EXACT } else { Tolerance::REDUCTION };
                if tolerance.close_scaled(expected, actual, scale) {
                    Ok(())
                } else {
                    Err(fail(None, expected, actual))
                }
            }
        }
    }
}

/// Copy of `data` followed by `GUARD` sentinels.
fn guarded(data: &[f32]) -> Vec<f32> {
    let mut v = Vec::with_capacity(data.len() + GUARD);
    v.extend_from_slice(data);
    v.resize(data.len() + GUARD, SENTINEL);
    v
}

/// First disagreement as `(index, expected, actual)`.
///
/// `[..n]` is compared with [`Tolerance::ELEMENTWISE`] scaled per element;
/// the guard region `[n..]` must be bit-identical.
fn compare(
    expected: &[f32],
    actual: &[f32],
    n: usize,
    scale: impl Fn(usize) -> f32,
) -> Result<(), (usize, f32, f32)> {
    debug_assert_eq!(expected.len(), actual.len());
    for i in 0..n {
        if !Tolerance::ELEMENTWISE.close_scaled(expected[i], actual[i], scale(i)) {
            return Err((i, expected[i], actual[i]));
        }
    }
    for i in n..actual.len() {
        if actual[i].to_bits() != SENTINEL.to_bits() {
            return Err((i, SENTINEL, actual[i]));
        }
    }
    Ok(())
}
