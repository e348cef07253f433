mod boundary;
mod evaluate;
mod plan;
mod sizing;

pub use infrasize_solver::ConstraintViolation;

pub use boundary::{boundary_lines, budget_boundary, feasible_band, linspace, throughput_boundary};
pub use evaluate::{evaluate, ConstraintStatus, Evaluation, OperatingPoint};
pub use plan::{optimize, Plan, PlanOutcome};
pub use sizing::{ConstraintKind, SizingSpec, SpecError, MACHINE_A, MACHINE_B};
