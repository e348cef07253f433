/// The result of solving a two-variable LP
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Optimal values for each variable; empty unless `status` is `Optimal`
    pub values: Vec<f64>,
    /// Optimal objective value (+inf when infeasible, -inf when unbounded)
    pub objective_value: f64,
    /// Requirements that cannot be met (populated when infeasible)
    pub violations: Vec<ConstraintViolation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
}

/// A requirement the problem cannot satisfy
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintViolation {
    /// Constraint name
    pub constraint: String,
    /// Required value (from constraint RHS)
    pub required: f64,
    /// Value achieved at the reference point
    pub actual: f64,
    /// How far the requirement is missed by
    pub shortfall: f64,
    /// Human-readable description of what's wrong
    pub description: String,
}

impl Solution {
    pub fn optimal(values: [f64; 2], objective_value: f64) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            values: values.to_vec(),
            objective_value,
            violations: Vec::new(),
        }
    }

    pub fn infeasible(violations: Vec<ConstraintViolation>) -> Self {
        Self {
            status: SolutionStatus::Infeasible,
            values: Vec::new(),
            objective_value: f64::INFINITY,
            violations,
        }
    }

    pub fn unbounded() -> Self {
        Self {
            status: SolutionStatus::Unbounded,
            values: Vec::new(),
            objective_value: f64::NEG_INFINITY,
            violations: Vec::new(),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// The optimal point, when one exists.
    pub fn point(&self) -> Option<[f64; 2]> {
        match self.values.as_slice() {
            [a, b] => Some([*a, *b]),
            _ => None,
        }
    }
}
