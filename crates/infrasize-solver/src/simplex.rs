use crate::problem::{Constraint, ConstraintOp, LpProblem};
use crate::solution::{ConstraintViolation, Solution, SolutionStatus};

const N_VARS: usize = 2;

/// Two-phase simplex solver for two-variable LP problems
pub struct Solver {
    /// Maximum pivots per phase before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Solve the problem using the two-phase simplex method.
    ///
    /// Infeasibility and unboundedness are ordinary outcomes reported in the
    /// solution status; this never panics on a well-formed problem.
    pub fn solve(&self, problem: &LpProblem) -> Solution {
        let solution = self.run(problem);
        if solution.status == SolutionStatus::Infeasible {
            return self.explain_infeasibility(problem);
        }
        solution
    }

    fn run(&self, problem: &LpProblem) -> Solution {
        let mut tableau = Tableau::build(problem);

        // Phase 1: drive the artificial variables out of the basis
        if tableau.n_artificial > 0 && !self.phase1(&mut tableau) {
            return Solution::infeasible(Vec::new());
        }

        // Phase 2: optimize the real objective
        match self.phase2(&mut tableau) {
            PhaseOutcome::Optimal => {
                let point = tableau.decision_values();
                Solution::optimal(point, problem.objective.value_at(point))
            }
            PhaseOutcome::Unbounded => Solution::unbounded(),
        }
    }

    /// When the problem is infeasible, resolve with the lower-bound rows
    /// dropped and report which requirements the remaining limits cannot meet.
    fn explain_infeasibility(&self, problem: &LpProblem) -> Solution {
        let mut relaxed = LpProblem::new(problem.variables.clone());
        relaxed.set_objective(
            problem.objective.coefficients,
            problem.objective.minimize,
        );
        for c in &problem.constraints {
            if c.op != ConstraintOp::Ge {
                relaxed.add_constraint(c.name.clone(), c.coefficients, c.op, c.rhs);
            }
        }

        let reference = self.run(&relaxed).point().unwrap_or([0.0, 0.0]);
        Solution::infeasible(self.violations_at(problem, reference))
    }

    /// Which constraints a candidate point violates, worst first.
    fn violations_at(&self, problem: &LpProblem, point: [f64; 2]) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for c in &problem.constraints {
            let actual = c.lhs_at(point);
            if let Some((shortfall, description)) = self.violation_of(c, actual) {
                violations.push(ConstraintViolation {
                    constraint: c.name.clone(),
                    required: c.rhs,
                    actual,
                    shortfall,
                    description,
                });
            }
        }

        violations.sort_by(|a, b| {
            b.shortfall
                .partial_cmp(&a.shortfall)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        violations
    }

    fn violation_of(&self, c: &Constraint, actual: f64) -> Option<(f64, String)> {
        match c.op {
            ConstraintOp::Le if actual > c.rhs + self.tolerance => {
                let amt = actual - c.rhs;
                Some((amt, format!("{} exceeds the maximum of {:.2} by {:.2}", c.name, c.rhs, amt)))
            }
            ConstraintOp::Ge if actual < c.rhs - self.tolerance => {
                let amt = c.rhs - actual;
                Some((amt, format!("{} is below the minimum of {:.2} by {:.2}", c.name, c.rhs, amt)))
            }
            ConstraintOp::Eq if (actual - c.rhs).abs() > self.tolerance => {
                let amt = (actual - c.rhs).abs();
                Some((amt, format!("{} requires exactly {:.2} but got {:.2}", c.name, c.rhs, actual)))
            }
            _ => None,
        }
    }

    fn phase1(&self, tableau: &mut Tableau) -> bool {
        let obj = tableau.num_constraints();
        let n_cols = tableau.rows[0].len();
        let art_start = tableau.artificial_start();

        let original = tableau.rows[obj].clone();

        // Auxiliary objective: maximize -sum(artificials), i.e. minimize them
        for cell in tableau.rows[obj].iter_mut() {
            *cell = 0.0;
        }
        for j in art_start..art_start + tableau.n_artificial {
            tableau.rows[obj][j] = -1.0;
        }
        // Price out the artificials that start in the basis
        for i in 0..obj {
            if tableau.basis[i] >= art_start {
                for j in 0..n_cols {
                    tableau.rows[obj][j] += tableau.rows[i][j];
                }
            }
        }

        for _ in 0..self.max_iterations {
            let Some(col) = self.entering_column(tableau, n_cols - 1) else {
                break;
            };
            let Some(row) = self.leaving_row(tableau, col) else {
                // Unbounded auxiliary problem means no feasible point
                return false;
            };
            tableau.pivot(row, col);
        }

        // Any artificial still basic at a positive level means infeasible
        let rhs = tableau.rhs_col();
        for i in 0..obj {
            if tableau.basis[i] >= art_start && tableau.rows[i][rhs].abs() > self.tolerance {
                return false;
            }
        }

        // Restore the real objective and price out the current basis
        tableau.rows[obj] = original;
        for i in 0..obj {
            let factor = tableau.rows[obj][tableau.basis[i]];
            if factor.abs() > self.tolerance {
                for j in 0..n_cols {
                    tableau.rows[obj][j] -= factor * tableau.rows[i][j];
                }
            }
        }

        true
    }

    fn phase2(&self, tableau: &mut Tableau) -> PhaseOutcome {
        // Artificial columns must not re-enter the basis
        let limit = tableau.artificial_start();

        for _ in 0..self.max_iterations {
            let Some(col) = self.entering_column(tableau, limit) else {
                return PhaseOutcome::Optimal;
            };
            let Some(row) = self.leaving_row(tableau, col) else {
                return PhaseOutcome::Unbounded;
            };
            tableau.pivot(row, col);
        }
        PhaseOutcome::Optimal // iteration cap reached, keep the best basis found
    }

    /// Column with the most positive reduced cost among the first `limit` columns.
    fn entering_column(&self, tableau: &Tableau, limit: usize) -> Option<usize> {
        let obj = tableau.num_constraints();
        let mut best = self.tolerance;
        let mut best_col = None;

        for j in 0..limit {
            if tableau.rows[obj][j] > best {
                best = tableau.rows[obj][j];
                best_col = Some(j);
            }
        }

        best_col
    }

    /// Minimum-ratio row for the entering column.
    fn leaving_row(&self, tableau: &Tableau, col: usize) -> Option<usize> {
        let rhs = tableau.rhs_col();
        let mut best = f64::INFINITY;
        let mut best_row = None;

        for i in 0..tableau.num_constraints() {
            let coef = tableau.rows[i][col];
            if coef > self.tolerance {
                let ratio = tableau.rows[i][rhs] / coef;
                if ratio >= 0.0 && ratio < best {
                    best = ratio;
                    best_row = Some(i);
                }
            }
        }

        best_row
    }
}

/// Dense simplex tableau: one row per constraint plus the objective row.
/// Columns are laid out as [decision | slack/surplus | artificial | rhs].
struct Tableau {
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    n_slack: usize,
    n_artificial: usize,
}

impl Tableau {
    fn build(problem: &LpProblem) -> Self {
        // Normalize so every RHS is non-negative; flipping a row reverses
        // its inequality direction.
        let normalized: Vec<Constraint> = problem
            .constraints
            .iter()
            .map(|c| {
                if c.rhs < 0.0 {
                    let op = match c.op {
                        ConstraintOp::Le => ConstraintOp::Ge,
                        ConstraintOp::Ge => ConstraintOp::Le,
                        ConstraintOp::Eq => ConstraintOp::Eq,
                    };
                    Constraint {
                        name: c.name.clone(),
                        coefficients: [-c.coefficients[0], -c.coefficients[1]],
                        op,
                        rhs: -c.rhs,
                    }
                } else {
                    c.clone()
                }
            })
            .collect();

        let mut n_slack = 0;
        let mut n_artificial = 0;
        for c in &normalized {
            match c.op {
                ConstraintOp::Le => n_slack += 1,
                ConstraintOp::Ge => {
                    n_slack += 1; // surplus
                    n_artificial += 1;
                }
                ConstraintOp::Eq => n_artificial += 1,
            }
        }

        let n_cols = N_VARS + n_slack + n_artificial + 1;
        let mut rows = vec![vec![0.0; n_cols]; normalized.len() + 1];
        let mut basis = vec![0; normalized.len()];

        let mut slack_col = N_VARS;
        let mut artificial_col = N_VARS + n_slack;
        for (i, c) in normalized.iter().enumerate() {
            rows[i][0] = c.coefficients[0];
            rows[i][1] = c.coefficients[1];
            rows[i][n_cols - 1] = c.rhs;

            match c.op {
                ConstraintOp::Le => {
                    rows[i][slack_col] = 1.0;
                    basis[i] = slack_col;
                    slack_col += 1;
                }
                ConstraintOp::Ge => {
                    rows[i][slack_col] = -1.0; // surplus
                    slack_col += 1;
                    rows[i][artificial_col] = 1.0;
                    basis[i] = artificial_col;
                    artificial_col += 1;
                }
                ConstraintOp::Eq => {
                    rows[i][artificial_col] = 1.0;
                    basis[i] = artificial_col;
                    artificial_col += 1;
                }
            }
        }

        // The objective row stores reduced costs for a maximization, so
        // minimization negates the coefficients.
        let obj = normalized.len();
        for (j, &coef) in problem.objective.coefficients.iter().enumerate() {
            rows[obj][j] = if problem.objective.minimize { -coef } else { coef };
        }

        Self {
            rows,
            basis,
            n_slack,
            n_artificial,
        }
    }

    fn num_constraints(&self) -> usize {
        self.rows.len() - 1
    }

    fn rhs_col(&self) -> usize {
        self.rows[0].len() - 1
    }

    fn artificial_start(&self) -> usize {
        N_VARS + self.n_slack
    }

    fn pivot(&mut self, row: usize, col: usize) {
        self.basis[row] = col;

        let pivot_val = self.rows[row][col];
        for j in 0..self.rows[row].len() {
            self.rows[row][j] /= pivot_val;
        }

        for i in 0..self.rows.len() {
            if i != row {
                let factor = self.rows[i][col];
                if factor != 0.0 {
                    for j in 0..self.rows[i].len() {
                        self.rows[i][j] -= factor * self.rows[row][j];
                    }
                }
            }
        }
    }

    fn decision_values(&self) -> [f64; 2] {
        let rhs = self.rhs_col();
        let mut point = [0.0; 2];
        for (i, &basic) in self.basis.iter().enumerate() {
            if basic < N_VARS {
                point[basic] = self.rows[i][rhs];
            }
        }
        point
    }
}

enum PhaseOutcome {
    Optimal,
    Unbounded,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::LpProblem;

    fn two_vars() -> [String; 2] {
        ["x".to_string(), "y".to_string()]
    }

    #[test]
    fn maximization_with_upper_bounds() {
        // Maximize 3x + 2y subject to x + y <= 4, x <= 3, y <= 3.
        // Optimal: x=3, y=1, obj=11.
        let mut problem = LpProblem::new(two_vars());
        problem.set_objective([3.0, 2.0], false);
        problem.add_constraint("sum", [1.0, 1.0], ConstraintOp::Le, 4.0);
        problem.add_constraint("x_max", [1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", [0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        let [x, y] = solution.point().unwrap();
        assert!((x - 3.0).abs() < 1e-6, "x = {x} (expected 3)");
        assert!((y - 1.0).abs() < 1e-6, "y = {y} (expected 1)");
        assert!((solution.objective_value - 11.0).abs() < 1e-6);
    }

    #[test]
    fn minimization_with_lower_bound() {
        // Minimize 2x + 3y subject to x + y >= 4, x <= 3, y <= 3.
        // Optimal: x=3, y=1, obj=9.
        let mut problem = LpProblem::new(two_vars());
        problem.set_objective([2.0, 3.0], true);
        problem.add_constraint("sum", [1.0, 1.0], ConstraintOp::Ge, 4.0);
        problem.add_constraint("x_max", [1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", [0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        let [x, y] = solution.point().unwrap();
        assert!((x - 3.0).abs() < 1e-6, "x = {x} (expected 3)");
        assert!((y - 1.0).abs() < 1e-6, "y = {y} (expected 1)");
        assert!((solution.objective_value - 9.0).abs() < 1e-6);
    }

    #[test]
    fn equality_constraint() {
        // Minimize x + y subject to x + y = 2.
        let mut problem = LpProblem::new(two_vars());
        problem.set_objective([1.0, 1.0], true);
        problem.add_constraint("total", [1.0, 1.0], ConstraintOp::Eq, 2.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.objective_value - 2.0).abs() < 1e-6);
        let [x, y] = solution.point().unwrap();
        assert!((x + y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn conflicting_bounds_are_infeasible() {
        // x >= 5 conflicts with x <= 3.
        let mut problem = LpProblem::new(two_vars());
        problem.set_objective([1.0, 0.0], true);
        problem.add_constraint("floor", [1.0, 0.0], ConstraintOp::Ge, 5.0);
        problem.add_constraint("cap", [1.0, 0.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert!(solution.values.is_empty());
        assert_eq!(solution.violations.len(), 1);
        let v = &solution.violations[0];
        assert_eq!(v.constraint, "floor");
        assert!(v.shortfall > 0.0);
    }

    #[test]
    fn missing_cap_is_unbounded() {
        // Maximize 3x + 2y with only a floor on x.
        let mut problem = LpProblem::new(two_vars());
        problem.set_objective([3.0, 2.0], false);
        problem.add_constraint("floor", [1.0, 0.0], ConstraintOp::Ge, 1.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Unbounded);
        assert!(solution.values.is_empty());
    }

    #[test]
    fn solve_is_deterministic() {
        let mut problem = LpProblem::new(two_vars());
        problem.set_objective([2.0, 3.0], true);
        problem.add_constraint("sum", [1.0, 1.0], ConstraintOp::Ge, 4.0);
        problem.add_constraint("x_max", [1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", [0.0, 1.0], ConstraintOp::Le, 3.0);

        let solver = Solver::new();
        let first = solver.solve(&problem);
        let second = solver.solve(&problem);
        assert_eq!(first, second);
    }
}
