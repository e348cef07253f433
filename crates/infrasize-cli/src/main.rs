use clap::{Args, Parser, Subcommand};

use infrasize_model::{
    boundary_lines, evaluate, feasible_band, linspace, optimize, Evaluation, OperatingPoint,
    PlanOutcome, SizingSpec, MACHINE_A, MACHINE_B,
};

mod chart;

#[derive(Parser)]
#[command(name = "infrasize")]
#[command(about = "Size a two-machine fleet: minimum-cost hours under throughput and budget limits", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    problem: ProblemArgs,
}

/// Problem parameters, defaulting to the stock sizing problem. Every
/// subcommand accepts them, so what-if runs can reshape the whole problem.
#[derive(Args)]
struct ProblemArgs {
    /// Cost per operating hour for machine type A ($)
    #[arg(long, default_value_t = SizingSpec::DEFAULT.cost_per_hour[MACHINE_A])]
    cost_a: f64,
    /// Cost per operating hour for machine type B ($)
    #[arg(long, default_value_t = SizingSpec::DEFAULT.cost_per_hour[MACHINE_B])]
    cost_b: f64,
    /// Throughput per operating hour for machine type A (GB)
    #[arg(long, default_value_t = SizingSpec::DEFAULT.throughput_per_hour[MACHINE_A])]
    throughput_a: f64,
    /// Throughput per operating hour for machine type B (GB)
    #[arg(long, default_value_t = SizingSpec::DEFAULT.throughput_per_hour[MACHINE_B])]
    throughput_b: f64,
    /// Minimum total throughput per day (GB)
    #[arg(long, default_value_t = SizingSpec::DEFAULT.min_throughput)]
    min_throughput: f64,
    /// Maximum daily operating budget ($)
    #[arg(long, default_value_t = SizingSpec::DEFAULT.max_budget)]
    budget: f64,
    /// Maximum daily hours for machine type A
    #[arg(long, default_value_t = SizingSpec::DEFAULT.max_hours[MACHINE_A])]
    max_hours_a: f64,
    /// Maximum daily hours for machine type B
    #[arg(long, default_value_t = SizingSpec::DEFAULT.max_hours[MACHINE_B])]
    max_hours_b: f64,
}

impl ProblemArgs {
    fn to_spec(&self) -> Result<SizingSpec, infrasize_model::SpecError> {
        SizingSpec::new(
            [self.cost_a, self.cost_b],
            [self.throughput_a, self.throughput_b],
            self.min_throughput,
            self.budget,
            [self.max_hours_a, self.max_hours_b],
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Solve for the cheapest operating plan
    Solve {
        /// Show which constraints are binding at the optimum
        #[arg(short, long)]
        analysis: bool,
        /// Output format (pretty, json)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Evaluate a candidate hours allocation against every constraint
    Evaluate {
        /// Hours of operation for machine type A
        hours_a: f64,
        /// Hours of operation for machine type B
        hours_b: f64,
        /// Output format (pretty, json)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Chart the feasible region, boundary lines, and optimum
    Plot {
        /// Number of samples along the A axis (json output)
        #[arg(long, default_value_t = 400)]
        samples: usize,
        /// Chart width in columns
        #[arg(long, default_value_t = 64)]
        width: usize,
        /// Chart height in rows
        #[arg(long, default_value_t = 24)]
        height: usize,
        /// Mark a selected point, e.g. --point 5,5
        #[arg(long, value_parser = parse_point)]
        point: Option<OperatingPoint>,
        /// Output format (pretty, json)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Full what-if report: optimum, point evaluation, chart, conclusion
    Report {
        /// Hours of operation for machine type A
        hours_a: f64,
        /// Hours of operation for machine type B
        hours_b: f64,
    },
}

fn main() {
    let cli = Cli::parse();

    let spec = match cli.problem.to_spec() {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("Invalid problem parameters: {e}");
            std::process::exit(2);
        }
    };

    match cli.command {
        Commands::Solve { analysis, format } => {
            let outcome = optimize(&spec);
            if format == "json" {
                println!("{}", to_json(&outcome));
            } else {
                print_outcome(&outcome, analysis);
            }
            if !outcome.is_optimal() {
                std::process::exit(1);
            }
        }
        Commands::Evaluate { hours_a, hours_b, format } => {
            let point = OperatingPoint::new(hours_a, hours_b);
            let evaluation = evaluate(&point, &spec);
            if format == "json" {
                let rows = evaluation.statuses(&spec);
                println!(
                    "{}",
                    to_json(&serde_json::json!({
                        "evaluation": &evaluation,
                        "constraints": rows,
                    }))
                );
            } else {
                print_evaluation(&evaluation, &spec);
            }
        }
        Commands::Plot { samples, width, height, point, format } => {
            let outcome = optimize(&spec);
            let optimum = outcome.plan().map(|p| p.hours);
            if format == "json" {
                let xs = linspace(0.0, spec.max_hours[MACHINE_A], samples);
                let (throughput_line, budget_line) = boundary_lines(&xs, &spec);
                println!(
                    "{}",
                    to_json(&serde_json::json!({
                        "throughput_line": throughput_line.collect::<Vec<_>>(),
                        "budget_line": budget_line.collect::<Vec<_>>(),
                        "feasible_band": xs
                            .iter()
                            .filter_map(|&x| feasible_band(&spec, x).map(|(lo, hi)| (x, lo, hi)))
                            .collect::<Vec<_>>(),
                        "optimum": optimum,
                        "point": point,
                    }))
                );
            } else {
                print!("{}", chart::render(&spec, optimum, point.map(|p| p.hours()), width, height));
                println!("{}", chart::legend());
                if let PlanOutcome::Infeasible { message, .. } = &outcome {
                    println!();
                    println!("Note: {message}");
                }
            }
        }
        Commands::Report { hours_a, hours_b } => {
            let outcome = optimize(&spec);
            let point = OperatingPoint::new(hours_a, hours_b);
            let evaluation = evaluate(&point, &spec);

            println!("== Optimal plan ==");
            print_outcome(&outcome, true);
            println!();
            println!("== Selected point ==");
            print_evaluation(&evaluation, &spec);
            println!();
            println!("== Constraint map ==");
            print!(
                "{}",
                chart::render(
                    &spec,
                    outcome.plan().map(|p| p.hours),
                    Some(point.hours()),
                    64,
                    24,
                )
            );
            println!("{}", chart::legend());
            println!();
            match &outcome {
                PlanOutcome::Optimal(_) => {
                    println!("Conclusion: the optimization succeeded; the plan above meets every constraint.");
                }
                PlanOutcome::Infeasible { .. } => {
                    println!("Conclusion: no feasible plan exists for this configuration; adjust the limits before sizing the fleet.");
                }
            }
        }
    }
}

fn print_outcome(outcome: &PlanOutcome, analysis: bool) {
    match outcome {
        PlanOutcome::Optimal(plan) => {
            println!("Status: OPTIMAL");
            println!("  Machine type A:       {:>8.2} h/day", plan.hours[MACHINE_A]);
            println!("  Machine type B:       {:>8.2} h/day", plan.hours[MACHINE_B]);
            println!("  Daily throughput:     {:>8.2} GB", plan.throughput);
            println!("  Daily operating cost: ${:.2}", plan.cost);
            if analysis {
                if plan.binding.is_empty() {
                    println!("  No binding constraints; the optimum sits inside every limit.");
                } else {
                    println!("  Binding constraints:");
                    for kind in &plan.binding {
                        println!("    - {}", kind.label());
                    }
                }
            }
        }
        PlanOutcome::Infeasible { message, violations } => {
            println!("Status: INFEASIBLE");
            println!("{message}");
            for v in violations {
                println!("  - {}", v.description);
            }
        }
    }
}

fn print_evaluation(evaluation: &Evaluation, spec: &SizingSpec) {
    println!(
        "Hours: type A {:.2}, type B {:.2}",
        evaluation.point.hours_a, evaluation.point.hours_b
    );
    println!("  Total throughput: {:>10.2} GB", evaluation.throughput);
    println!("  Total cost:       ${:.2}", evaluation.cost);
    println!();
    for row in evaluation.statuses(spec) {
        let mark = if row.satisfied { '✓' } else { '✗' };
        println!(
            "  {} {:<20} {:<28} {:.2}",
            mark,
            row.kind.label(),
            row.condition,
            row.actual
        );
    }
    if evaluation.all_ok() {
        println!();
        println!("Every constraint is satisfied at this point.");
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

fn parse_point(s: &str) -> Result<OperatingPoint, String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| "expected HOURS_A,HOURS_B".to_string())?;
    let hours_a: f64 = a.trim().parse().map_err(|_| format!("invalid hours: {a}"))?;
    let hours_b: f64 = b.trim().parse().map_err(|_| format!("invalid hours: {b}"))?;
    Ok(OperatingPoint::new(hours_a, hours_b))
}
