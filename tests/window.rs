//! Scenario tests for the spectral window

mod common;

use common::jittered_times;
use rustytsa::window;

#[test]
fn windowsum_is_insensitive_to_the_reference_frequency() {
    // Equispaced sampling: the window translates with f0, so its sum over a
    // grid wide enough for the main lobe barely moves.
    let time: Vec<f64> = (0..500).map(|i| 100.0 * i as f64).collect();

    let base = window::windowsum(1000.0, 900.0, 1100.0, 0.1, &time, None).expect("windowsum");
    assert!(base.is_finite() && base > 0.0, "windowsum = {base}");

    for f0 in [950.0, 1020.0] {
        let other = window::windowsum(f0, 900.0, 1100.0, 0.1, &time, None).expect("windowsum");
        let rel = (other - base).abs() / base;
        assert!(rel < 0.05, "windowsum moved by {rel} at f0 = {f0}");
    }
}

#[test]
fn window_is_exact_at_the_reference_frequency_for_irregular_sampling() {
    // The reference tones are exactly representable at their own frequency
    // no matter how the series is sampled.
    let time = jittered_times(500, 100.0, 0x77);
    let freq = vec![1000.0];
    let mut win = vec![0.0];
    window::windowfunction(&time, None, &freq, 1000.0, &mut win).expect("window");
    assert!((win[0] - 1.0).abs() < 1e-9, "W(f0) = {}", win[0]);
}

#[test]
fn zero_weight_samples_do_not_shape_the_window() {
    let time: Vec<f64> = (0..400).map(|i| 100.0 * i as f64).collect();
    let mut weight = vec![1.0; time.len()];
    for w in weight.iter_mut().skip(200) {
        *w = 0.0;
    }

    // Identical to the unweighted window of the first half of the series.
    let half: Vec<f64> = time[..200].to_vec();
    let freq: Vec<f64> = (0..50).map(|i| 950.0 + 2.0 * i as f64).collect();
    let mut full = vec![0.0; freq.len()];
    let mut truncated = vec![0.0; freq.len()];
    window::windowfunction(&time, Some(&weight), &freq, 1000.0, &mut full).expect("weighted");
    window::windowfunction(&half, None, &freq, 1000.0, &mut truncated).expect("plain");

    for (a, b) in full.iter().zip(&truncated) {
        assert!((a - b).abs() < 1e-9, "windows differ: {a} vs {b}");
    }
}
