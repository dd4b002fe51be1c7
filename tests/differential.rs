#![cfg(feature = "harness")]

use floats_simd::Kernels;
use floats_simd::harness::{Harness, HarnessConfig, Operation, Values};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn config() -> HarnessConfig {
    // FLOATS_SIMD_SEED / FLOATS_SIMD_VALUES reproduce a reported failure.
    HarnessConfig::from_env().expect("harness environment overrides")
}

#[test]
fn every_backend_matches_reference_small_ints() {
    init_tracing();
    let mut harness = Harness::new(config());
    for report in harness.run_available() {
        assert!(report.covers_all_residues(report.lanes), "{}", report.backend);
        if let Err(e) = report.into_result() {
            panic!("{e}");
        }
    }
}

#[test]
fn every_backend_matches_reference_unit_floats() {
    init_tracing();
    let config = config().with_values(Values::UnitFloats).with_iterations(4);
    let mut harness = Harness::new(config);
    for report in harness.run_available() {
        if let Err(e) = report.into_result() {
            panic!("{e}");
        }
    }
}

#[test]
fn signed_inputs_survive_cancellation() {
    init_tracing();
    // Negative values make c + a*b cancel; FMA and mul+add then differ
    // relative to the result but not relative to the terms.
    let config = config()
        .with_values(Values::SmallInts { low: -10, high: 10 })
        .with_iterations(4);
    let mut harness = Harness::new(config);
    for report in harness.run_available() {
        if let Err(e) = report.into_result() {
            panic!("{e}");
        }
    }
}

#[test]
fn native_lane_width_residues() {
    init_tracing();
    let lanes = floats_simd::Native::LANES;
    let mut harness = Harness::new(HarnessConfig::covering(lanes).with_lengths(0..lanes.max(2) * 3));
    for op in Operation::ALL {
        for n in 0..lanes.max(2) * 3 {
            if let Err(e) = harness.check(op, &floats_simd::native(), n) {
                panic!("{e}");
            }
        }
    }
}

#[cfg(target_arch = "x86_64")]
#[test]
fn avx_residues_when_available() {
    init_tracing();
    let Some(avx) = floats_simd::Avx::detect() else {
        return;
    };
    let report = Harness::new(HarnessConfig::covering(8).with_seed(0xA5)).run(&avx);
    assert_eq!(report.lanes, 8);
    assert!(report.covers_all_residues(8));
    assert!(report.is_success(), "{:?}", report.failures().next());
}

#[cfg(target_arch = "aarch64")]
#[test]
fn neon_residues() {
    init_tracing();
    let report = Harness::new(HarnessConfig::covering(4).with_seed(0xA5)).run(&floats_simd::Neon);
    assert_eq!(report.lanes, 4);
    assert!(report.covers_all_residues(4));
    assert!(report.is_success(), "{:?}", report.failures().next());
}
