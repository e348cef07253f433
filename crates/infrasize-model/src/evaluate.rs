use crate::sizing::{ConstraintKind, SizingSpec, MACHINE_A, MACHINE_B};

/// A candidate hours allocation supplied by the caller.
///
/// Values are not clamped to the spec's ranges; exploring infeasible points
/// is the point of the tool, so out-of-range hours are evaluated as given.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatingPoint {
    pub hours_a: f64,
    pub hours_b: f64,
}

impl OperatingPoint {
    pub fn new(hours_a: f64, hours_b: f64) -> Self {
        Self { hours_a, hours_b }
    }

    pub fn hours(&self) -> [f64; 2] {
        [self.hours_a, self.hours_b]
    }
}

/// Derived totals and per-constraint verdicts for one operating point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    /// The evaluated point, echoed for rendering
    pub point: OperatingPoint,
    /// Total throughput at the point (GB)
    pub throughput: f64,
    /// Total operating cost at the point ($)
    pub cost: f64,
    pub throughput_ok: bool,
    pub budget_ok: bool,
    pub hours_a_ok: bool,
    pub hours_b_ok: bool,
}

/// One row of the constraint summary table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintStatus {
    pub kind: ConstraintKind,
    /// The constraint rendered as text, e.g. `200·hA + 300·hB ≥ 25000`
    pub condition: String,
    /// Value achieved at the point
    pub actual: f64,
    /// The floor or cap being compared against
    pub bound: f64,
    pub satisfied: bool,
}

/// Evaluate a candidate point against every constraint of the spec.
///
/// All four verdicts are always computed, with no short-circuiting, so a
/// caller can render each constraint's status independently. Pure arithmetic
/// over finite inputs; identical inputs yield identical outputs.
pub fn evaluate(point: &OperatingPoint, spec: &SizingSpec) -> Evaluation {
    let hours = point.hours();
    let throughput = spec.throughput_at(hours);
    let cost = spec.cost_at(hours);

    Evaluation {
        point: *point,
        throughput,
        cost,
        throughput_ok: throughput >= spec.min_throughput,
        budget_ok: cost <= spec.max_budget,
        hours_a_ok: point.hours_a <= spec.max_hours[MACHINE_A],
        hours_b_ok: point.hours_b <= spec.max_hours[MACHINE_B],
    }
}

impl Evaluation {
    /// Whether every constraint is satisfied at the point.
    pub fn all_ok(&self) -> bool {
        self.throughput_ok && self.budget_ok && self.hours_a_ok && self.hours_b_ok
    }

    /// The constraint summary table, one row per constraint.
    pub fn statuses(&self, spec: &SizingSpec) -> Vec<ConstraintStatus> {
        ConstraintKind::ALL
            .iter()
            .map(|&kind| {
                let (condition, actual, bound, satisfied) = match kind {
                    ConstraintKind::Throughput => (
                        format!(
                            "{}·hA + {}·hB ≥ {}",
                            spec.throughput_per_hour[MACHINE_A],
                            spec.throughput_per_hour[MACHINE_B],
                            spec.min_throughput
                        ),
                        self.throughput,
                        spec.min_throughput,
                        self.throughput_ok,
                    ),
                    ConstraintKind::Budget => (
                        format!(
                            "{}·hA + {}·hB ≤ {}",
                            spec.cost_per_hour[MACHINE_A],
                            spec.cost_per_hour[MACHINE_B],
                            spec.max_budget
                        ),
                        self.cost,
                        spec.max_budget,
                        self.budget_ok,
                    ),
                    ConstraintKind::HoursA => (
                        format!("hA ≤ {}", spec.max_hours[MACHINE_A]),
                        self.point.hours_a,
                        spec.max_hours[MACHINE_A],
                        self.hours_a_ok,
                    ),
                    ConstraintKind::HoursB => (
                        format!("hB ≤ {}", spec.max_hours[MACHINE_B]),
                        self.point.hours_b,
                        spec.max_hours[MACHINE_B],
                        self.hours_b_ok,
                    ),
                };
                ConstraintStatus {
                    kind,
                    condition,
                    actual,
                    bound,
                    satisfied,
                }
            })
            .collect()
    }
}
