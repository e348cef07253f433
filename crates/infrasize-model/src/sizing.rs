use infrasize_solver::{ConstraintOp, LpProblem};
use thiserror::Error;

/// Index of machine type A in per-machine arrays.
pub const MACHINE_A: usize = 0;
/// Index of machine type B in per-machine arrays.
pub const MACHINE_B: usize = 1;

/// Immutable description of the infrastructure-sizing problem: choose daily
/// operating hours for two machine types at minimum cost, subject to a
/// throughput floor, a budget cap, and per-machine hour caps.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizingSpec {
    /// Operating cost per hour for each machine type ($/h)
    pub cost_per_hour: [f64; 2],
    /// Data processed per hour for each machine type (GB/h)
    pub throughput_per_hour: [f64; 2],
    /// Minimum total throughput per day (GB)
    pub min_throughput: f64,
    /// Maximum daily operating budget ($)
    pub max_budget: f64,
    /// Maximum operating hours per day for each machine type
    pub max_hours: [f64; 2],
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecError {
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
}

impl SizingSpec {
    /// The stock sizing problem: $50/h and $70/h machines pushing 200 and
    /// 300 GB/h, a 25 000 GB daily floor, a $15 000 budget, and caps of 10
    /// and 8 hours per day.
    pub const DEFAULT: SizingSpec = SizingSpec {
        cost_per_hour: [50.0, 70.0],
        throughput_per_hour: [200.0, 300.0],
        min_throughput: 25_000.0,
        max_budget: 15_000.0,
        max_hours: [10.0, 8.0],
    };

    /// Build a spec from custom parameters.
    ///
    /// Rates must be finite and strictly positive (the boundary-line
    /// formulas divide by them); the floor, the budget, and the hour caps
    /// must be finite and non-negative.
    pub fn new(
        cost_per_hour: [f64; 2],
        throughput_per_hour: [f64; 2],
        min_throughput: f64,
        max_budget: f64,
        max_hours: [f64; 2],
    ) -> Result<Self, SpecError> {
        check_positive("cost_per_hour[A]", cost_per_hour[MACHINE_A])?;
        check_positive("cost_per_hour[B]", cost_per_hour[MACHINE_B])?;
        check_positive("throughput_per_hour[A]", throughput_per_hour[MACHINE_A])?;
        check_positive("throughput_per_hour[B]", throughput_per_hour[MACHINE_B])?;
        check_non_negative("min_throughput", min_throughput)?;
        check_non_negative("max_budget", max_budget)?;
        check_non_negative("max_hours[A]", max_hours[MACHINE_A])?;
        check_non_negative("max_hours[B]", max_hours[MACHINE_B])?;

        Ok(Self {
            cost_per_hour,
            throughput_per_hour,
            min_throughput,
            max_budget,
            max_hours,
        })
    }

    /// Total throughput at an hours allocation (GB).
    pub fn throughput_at(&self, hours: [f64; 2]) -> f64 {
        self.throughput_per_hour[MACHINE_A] * hours[MACHINE_A]
            + self.throughput_per_hour[MACHINE_B] * hours[MACHINE_B]
    }

    /// Total operating cost at an hours allocation ($).
    pub fn cost_at(&self, hours: [f64; 2]) -> f64 {
        self.cost_per_hour[MACHINE_A] * hours[MACHINE_A]
            + self.cost_per_hour[MACHINE_B] * hours[MACHINE_B]
    }

    /// Lower the sizing problem to a two-variable LP: minimize cost subject
    /// to the throughput floor, the budget cap, and the hour caps.
    pub fn to_lp(&self) -> LpProblem {
        let mut lp = LpProblem::new(["hours_a".to_string(), "hours_b".to_string()]);
        lp.set_objective(self.cost_per_hour, true);
        lp.add_constraint(
            ConstraintKind::Throughput.label(),
            self.throughput_per_hour,
            ConstraintOp::Ge,
            self.min_throughput,
        );
        lp.add_constraint(
            ConstraintKind::Budget.label(),
            self.cost_per_hour,
            ConstraintOp::Le,
            self.max_budget,
        );
        lp.add_constraint(
            ConstraintKind::HoursA.label(),
            [1.0, 0.0],
            ConstraintOp::Le,
            self.max_hours[MACHINE_A],
        );
        lp.add_constraint(
            ConstraintKind::HoursB.label(),
            [0.0, 1.0],
            ConstraintOp::Le,
            self.max_hours[MACHINE_B],
        );
        lp
    }
}

impl Default for SizingSpec {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), SpecError> {
    if !value.is_finite() {
        return Err(SpecError::NonFinite { name, value });
    }
    if value <= 0.0 {
        return Err(SpecError::NotPositive { name, value });
    }
    Ok(())
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), SpecError> {
    if !value.is_finite() {
        return Err(SpecError::NonFinite { name, value });
    }
    if value < 0.0 {
        return Err(SpecError::Negative { name, value });
    }
    Ok(())
}

/// The four constraints of the sizing problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintKind {
    /// Minimum total throughput per day
    Throughput,
    /// Maximum daily operating budget
    Budget,
    /// Hour cap for machine type A
    HoursA,
    /// Hour cap for machine type B
    HoursB,
}

impl ConstraintKind {
    pub const ALL: [ConstraintKind; 4] = [
        ConstraintKind::Throughput,
        ConstraintKind::Budget,
        ConstraintKind::HoursA,
        ConstraintKind::HoursB,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConstraintKind::Throughput => "minimum throughput",
            ConstraintKind::Budget => "operating budget",
            ConstraintKind::HoursA => "type A hours",
            ConstraintKind::HoursB => "type B hours",
        }
    }
}
