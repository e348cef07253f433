use infrasize_model::{
    budget_boundary, feasible_band, throughput_boundary, SizingSpec, MACHINE_A, MACHINE_B,
};

/// Render the constraint map as a character raster: feasible-region shading,
/// the two boundary lines, the hour-cap guides, and optional markers for the
/// optimum and a selected point.
///
/// Boundary values far outside the axis ranges are simply not drawn; the
/// axes pad one hour past each cap so the cap guides stay visible.
pub fn render(
    spec: &SizingSpec,
    optimum: Option<[f64; 2]>,
    selected: Option<[f64; 2]>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(2);
    let height = height.max(2);

    let x_max = spec.max_hours[MACHINE_A] + 1.0;
    let y_max = spec.max_hours[MACHINE_B] + 1.0;
    let x_at = |col: usize| x_max * col as f64 / (width - 1) as f64;
    let row_of = |y: f64| ((1.0 - y / y_max) * (height - 1) as f64).round() as isize;
    let col_of = |x: f64| (x / x_max * (width - 1) as f64).round() as isize;

    let mut grid = vec![vec![' '; width]; height];

    // Feasible-region shading, column by column
    for col in 0..width {
        let x = x_at(col);
        if let Some((lo, hi)) = feasible_band(spec, x) {
            let top = row_of(hi.min(y_max)).max(0);
            let bottom = row_of(lo.max(0.0)).min(height as isize - 1);
            for row in top..=bottom {
                grid[row as usize][col] = '░';
            }
        }
    }

    // Hour-cap guides
    let cap_col = col_of(spec.max_hours[MACHINE_A]);
    if (0..width as isize).contains(&cap_col) {
        for row in grid.iter_mut() {
            row[cap_col as usize] = '|';
        }
    }
    let cap_row = row_of(spec.max_hours[MACHINE_B]);
    if (0..height as isize).contains(&cap_row) {
        for cell in grid[cap_row as usize].iter_mut() {
            *cell = '-';
        }
    }

    // Boundary lines
    for col in 0..width {
        let x = x_at(col);
        plot_mark(&mut grid, row_of(throughput_boundary(spec, x)), col, 'T');
        plot_mark(&mut grid, row_of(budget_boundary(spec, x)), col, 'B');
    }

    // Markers last so they stay visible
    if let Some(hours) = optimum {
        let row = row_of(hours[MACHINE_B]);
        let col = col_of(hours[MACHINE_A]);
        if (0..height as isize).contains(&row) && (0..width as isize).contains(&col) {
            grid[row as usize][col as usize] = '*';
        }
    }
    if let Some(hours) = selected {
        let row = row_of(hours[MACHINE_B]);
        let col = col_of(hours[MACHINE_A]);
        if (0..height as isize).contains(&row) && (0..width as isize).contains(&col) {
            grid[row as usize][col as usize] = 'o';
        }
    }

    let mut out = String::new();
    out.push_str(&format!("type B hours, 0 to {y_max} (top)\n"));
    for row in &grid {
        out.push_str(&row.iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&format!("type A hours, 0 to {x_max}\n"));
    out
}

pub fn legend() -> &'static str {
    "  ░ feasible region   T throughput floor   B budget line\n\
     \u{20}\u{20}| type A hour cap   - type B hour cap    * optimal plan   o selected point"
}

fn plot_mark(grid: &mut [Vec<char>], row: isize, col: usize, mark: char) {
    if row >= 0 && (row as usize) < grid.len() {
        grid[row as usize][col] = mark;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reachable_spec() -> SizingSpec {
        SizingSpec::new([50.0, 70.0], [200.0, 300.0], 2500.0, 15_000.0, [10.0, 8.0]).unwrap()
    }

    #[test]
    fn reachable_problem_shows_region_line_and_optimum() {
        let chart = render(&reachable_spec(), Some([0.5, 8.0]), None, 64, 24);

        assert!(chart.contains('░'), "chart:\n{chart}");
        assert!(chart.contains('T'), "chart:\n{chart}");
        assert!(chart.contains('*'), "chart:\n{chart}");
        assert!(!chart.contains('o'));
        // 24 grid rows plus the two axis caption lines
        assert_eq!(chart.lines().count(), 26);
    }

    #[test]
    fn stock_problem_renders_empty_region() {
        // Both boundary lines sit far above the plotted range, so only the
        // cap guides and any markers appear.
        let chart = render(&SizingSpec::default(), None, Some([5.0, 5.0]), 64, 24);

        assert!(!chart.contains('░'));
        assert!(!chart.contains('T'));
        assert!(!chart.contains('B'));
        assert!(!chart.contains('*'));
        assert!(chart.contains('o'));
        assert!(chart.contains('|'));
        assert!(chart.contains('-'));
    }

    #[test]
    fn out_of_range_markers_are_clipped() {
        let chart = render(&SizingSpec::default(), None, Some([40.0, 40.0]), 32, 12);
        assert!(!chart.contains('o'));
    }
}
