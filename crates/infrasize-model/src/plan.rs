use infrasize_solver::{ConstraintOp, ConstraintViolation, LpProblem, SolutionStatus, Solver};

use crate::sizing::{ConstraintKind, SizingSpec, MACHINE_A, MACHINE_B};

/// Tolerance for deciding that a constraint is tight at the optimum.
const BINDING_TOLERANCE: f64 = 1e-6;

/// The cheapest operating plan that satisfies every constraint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    /// Optimal hours per machine type
    pub hours: [f64; 2],
    /// Daily operating cost at the optimum ($)
    pub cost: f64,
    /// Daily throughput at the optimum (GB)
    pub throughput: f64,
    /// Constraints that hold with equality at the optimum
    pub binding: Vec<ConstraintKind>,
}

/// Result of one optimization run. Infeasibility is a normal outcome of
/// exploration, not an error.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlanOutcome {
    Optimal(Plan),
    Infeasible {
        /// Human-readable explanation of why no plan exists
        message: String,
        /// The requirements that cannot be met
        violations: Vec<ConstraintViolation>,
    },
}

impl PlanOutcome {
    pub fn is_optimal(&self) -> bool {
        matches!(self, PlanOutcome::Optimal(_))
    }

    pub fn plan(&self) -> Option<&Plan> {
        match self {
            PlanOutcome::Optimal(plan) => Some(plan),
            PlanOutcome::Infeasible { .. } => None,
        }
    }
}

/// Solve the sizing problem: minimize daily operating cost subject to the
/// throughput floor, the budget cap, and the hour caps.
///
/// Deterministic: repeated calls on the same spec return identical results.
pub fn optimize(spec: &SizingSpec) -> PlanOutcome {
    let solution = Solver::new().solve(&spec.to_lp());

    match (solution.status, solution.point()) {
        (SolutionStatus::Optimal, Some(hours)) => PlanOutcome::Optimal(plan_at(spec, hours)),
        (SolutionStatus::Unbounded, _) => PlanOutcome::Infeasible {
            // Cannot happen for a validated spec: the hour caps close the
            // feasible set in both directions.
            message: "the cost objective is unbounded under the configured limits".to_string(),
            violations: Vec::new(),
        },
        _ => PlanOutcome::Infeasible {
            message: infeasibility_message(spec),
            violations: solution.violations,
        },
    }
}

fn plan_at(spec: &SizingSpec, hours: [f64; 2]) -> Plan {
    let cost = spec.cost_at(hours);
    let throughput = spec.throughput_at(hours);

    let mut binding = Vec::new();
    if (throughput - spec.min_throughput).abs() <= BINDING_TOLERANCE {
        binding.push(ConstraintKind::Throughput);
    }
    if (cost - spec.max_budget).abs() <= BINDING_TOLERANCE {
        binding.push(ConstraintKind::Budget);
    }
    if (hours[MACHINE_A] - spec.max_hours[MACHINE_A]).abs() <= BINDING_TOLERANCE {
        binding.push(ConstraintKind::HoursA);
    }
    if (hours[MACHINE_B] - spec.max_hours[MACHINE_B]).abs() <= BINDING_TOLERANCE {
        binding.push(ConstraintKind::HoursB);
    }

    Plan {
        hours,
        cost,
        throughput,
        binding,
    }
}

/// Explain an infeasible spec in fleet terms: how much throughput the budget
/// and hour caps allow at best, versus the floor being asked for.
fn infeasibility_message(spec: &SizingSpec) -> String {
    match throughput_ceiling(spec) {
        Some(best) if best < spec.min_throughput => format!(
            "no operating plan can reach the throughput floor: the budget and hour caps \
             allow at most {best:.0} GB against a floor of {:.0} GB",
            spec.min_throughput
        ),
        _ => "no operating plan satisfies every constraint within the configured limits"
            .to_string(),
    }
}

/// Maximum achievable throughput under the budget and hour caps alone.
fn throughput_ceiling(spec: &SizingSpec) -> Option<f64> {
    let mut lp = LpProblem::new(["hours_a".to_string(), "hours_b".to_string()]);
    lp.set_objective(spec.throughput_per_hour, false);
    lp.add_constraint(
        ConstraintKind::Budget.label(),
        spec.cost_per_hour,
        ConstraintOp::Le,
        spec.max_budget,
    );
    lp.add_constraint(
        ConstraintKind::HoursA.label(),
        [1.0, 0.0],
        ConstraintOp::Le,
        spec.max_hours[MACHINE_A],
    );
    lp.add_constraint(
        ConstraintKind::HoursB.label(),
        [0.0, 1.0],
        ConstraintOp::Le,
        spec.max_hours[MACHINE_B],
    );

    let solution = Solver::new().solve(&lp);
    solution.is_optimal().then_some(solution.objective_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reachable_spec() -> SizingSpec {
        SizingSpec::new([50.0, 70.0], [200.0, 300.0], 2500.0, 15_000.0, [10.0, 8.0]).unwrap()
    }

    #[test]
    fn stock_problem_is_infeasible_with_an_explanation() {
        let outcome = optimize(&SizingSpec::default());

        let PlanOutcome::Infeasible { message, violations } = outcome else {
            panic!("stock floor of 25 000 GB is unreachable, expected infeasible");
        };
        assert!(message.contains("4400"), "message: {message}");
        assert!(message.contains("25000"), "message: {message}");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint, "minimum throughput");
    }

    #[test]
    fn reachable_floor_yields_the_cheap_plan() {
        let spec = reachable_spec();
        let outcome = optimize(&spec);

        let plan = outcome.plan().expect("floor of 2500 GB is reachable");
        // B moves a GB for less, so it runs at its cap; A covers the rest.
        assert!((plan.hours[MACHINE_A] - 0.5).abs() < 1e-6, "hours: {:?}", plan.hours);
        assert!((plan.hours[MACHINE_B] - 8.0).abs() < 1e-6, "hours: {:?}", plan.hours);
        assert!((plan.cost - 585.0).abs() < 1e-6);
        assert!((plan.throughput - 2500.0).abs() < 1e-6);

        assert!(plan.binding.contains(&ConstraintKind::Throughput));
        assert!(plan.binding.contains(&ConstraintKind::HoursB));
        assert!(!plan.binding.contains(&ConstraintKind::Budget));
        assert!(!plan.binding.contains(&ConstraintKind::HoursA));
    }

    #[test]
    fn optimum_satisfies_every_constraint() {
        let spec = reachable_spec();
        let outcome = optimize(&spec);
        let plan = outcome.plan().expect("spec is feasible");

        let eps = 1e-6;
        for constraint in &spec.to_lp().constraints {
            assert!(
                constraint.holds_at(plan.hours, eps),
                "{} does not hold at {:?}",
                constraint.name,
                plan.hours
            );
        }
        assert!(plan.hours[MACHINE_A] >= -eps);
        assert!(plan.hours[MACHINE_B] >= -eps);
    }

    #[test]
    fn optimize_is_deterministic() {
        let spec = reachable_spec();
        assert_eq!(optimize(&spec), optimize(&spec));

        let stock = SizingSpec::default();
        assert_eq!(optimize(&stock), optimize(&stock));
    }

    #[test]
    fn exhausted_budget_binds_at_the_optimum() {
        // Hitting a 2400 GB floor costs $560 at best (B at its cap); with the
        // budget set to exactly that, every limit on the plan is tight.
        let spec =
            SizingSpec::new([50.0, 70.0], [200.0, 300.0], 2400.0, 560.0, [10.0, 8.0]).unwrap();
        let outcome = optimize(&spec);

        let plan = outcome.plan().expect("floor of 2400 GB fits a $560 budget");
        assert!((plan.hours[MACHINE_A] - 0.0).abs() < 1e-6);
        assert!((plan.hours[MACHINE_B] - 8.0).abs() < 1e-6);
        assert!((plan.cost - 560.0).abs() < 1e-6);
        assert!(plan.binding.contains(&ConstraintKind::Throughput));
        assert!(plan.binding.contains(&ConstraintKind::Budget));
        assert!(plan.binding.contains(&ConstraintKind::HoursB));
    }
}
