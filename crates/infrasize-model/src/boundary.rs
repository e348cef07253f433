use crate::sizing::{SizingSpec, MACHINE_A, MACHINE_B};

/// Hours of B that make throughput exactly the floor, given `x` hours of A.
///
/// Degenerate `x` values produce large or negative results rather than
/// failing; callers clip when rendering.
pub fn throughput_boundary(spec: &SizingSpec, x: f64) -> f64 {
    (spec.min_throughput - spec.throughput_per_hour[MACHINE_A] * x)
        / spec.throughput_per_hour[MACHINE_B]
}

/// Hours of B that spend exactly the budget, given `x` hours of A.
pub fn budget_boundary(spec: &SizingSpec, x: f64) -> f64 {
    (spec.max_budget - spec.cost_per_hour[MACHINE_A] * x) / spec.cost_per_hour[MACHINE_B]
}

/// The two boundary lines sampled at `samples`, as lazy `(x, y)` sequences
/// of the same length as the input.
pub fn boundary_lines<'a>(
    samples: &'a [f64],
    spec: &'a SizingSpec,
) -> (
    impl Iterator<Item = (f64, f64)> + 'a,
    impl Iterator<Item = (f64, f64)> + 'a,
) {
    let throughput = samples.iter().map(|&x| (x, throughput_boundary(spec, x)));
    let budget = samples.iter().map(|&x| (x, budget_boundary(spec, x)));
    (throughput, budget)
}

/// The vertical slice of the feasible region at `x` hours of A: at least the
/// throughput boundary, at most the budget boundary and the B hour cap.
/// `None` when the slice is empty or `x` is outside A's own range.
pub fn feasible_band(spec: &SizingSpec, x: f64) -> Option<(f64, f64)> {
    if x < 0.0 || x > spec.max_hours[MACHINE_A] {
        return None;
    }
    let lo = throughput_boundary(spec, x).max(0.0);
    let hi = budget_boundary(spec, x).min(spec.max_hours[MACHINE_B]);
    (hi >= lo).then_some((lo, hi))
}

/// `n` evenly spaced samples from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reachable_spec() -> SizingSpec {
        // Same rates and caps as the stock problem, with a floor the fleet
        // can actually reach.
        SizingSpec::new([50.0, 70.0], [200.0, 300.0], 2500.0, 15_000.0, [10.0, 8.0]).unwrap()
    }

    #[test]
    fn boundaries_at_zero_hours_of_a() {
        // Both values land far outside the plotted y-range on purpose; this
        // pins the formulas down independent of display clipping.
        let spec = SizingSpec::default();
        assert!((throughput_boundary(&spec, 0.0) - 25_000.0 / 300.0).abs() < 1e-9);
        assert!((budget_boundary(&spec, 0.0) - 15_000.0 / 70.0).abs() < 1e-9);
        assert!((throughput_boundary(&spec, 0.0) - 83.3333).abs() < 1e-3);
        assert!((budget_boundary(&spec, 0.0) - 214.2857).abs() < 1e-3);
    }

    #[test]
    fn lines_cover_every_sample() {
        let spec = SizingSpec::default();
        let samples = linspace(0.0, 10.0, 400);
        let (throughput, budget) = boundary_lines(&samples, &spec);

        let throughput: Vec<_> = throughput.collect();
        let budget: Vec<_> = budget.collect();
        assert_eq!(throughput.len(), samples.len());
        assert_eq!(budget.len(), samples.len());
        assert_eq!(throughput[0].0, 0.0);
        assert!((throughput[399].0 - 10.0).abs() < 1e-12);
        // The boundary drops as A picks up more of the floor
        assert!(throughput[399].1 < throughput[0].1);
    }

    #[test]
    fn stock_problem_has_no_feasible_band() {
        let spec = SizingSpec::default();
        for x in [0.0, 2.5, 5.0, 7.5, 10.0] {
            assert_eq!(feasible_band(&spec, x), None, "band at x={x}");
        }
    }

    #[test]
    fn reachable_floor_opens_a_band() {
        let spec = reachable_spec();

        // 200·0.5 + 300·8 = 2500: the band pinches to a single point
        let (lo, hi) = feasible_band(&spec, 0.5).unwrap();
        assert!((lo - 8.0).abs() < 1e-9);
        assert!((hi - 8.0).abs() < 1e-9);

        // Further right the floor needs less of B
        let (lo, hi) = feasible_band(&spec, 5.0).unwrap();
        assert!((lo - 5.0).abs() < 1e-9);
        assert!((hi - 8.0).abs() < 1e-9);

        // Left of 0.5 even maxed-out B misses the floor
        assert_eq!(feasible_band(&spec, 0.0), None);
        // Beyond A's own cap there is no slice at all
        assert_eq!(feasible_band(&spec, 10.5), None);
    }

    #[test]
    fn linspace_endpoints_and_spacing() {
        assert!(linspace(0.0, 10.0, 0).is_empty());
        assert_eq!(linspace(3.0, 10.0, 1), vec![3.0]);

        let samples = linspace(0.0, 10.0, 5);
        assert_eq!(samples, vec![0.0, 2.5, 5.0, 7.5, 10.0]);

        let dense = linspace(0.0, 10.0, 400);
        assert_eq!(dense.len(), 400);
        assert_eq!(dense[0], 0.0);
        assert!((dense[399] - 10.0).abs() < 1e-12);
    }
}
