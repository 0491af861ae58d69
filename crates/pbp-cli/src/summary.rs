use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pbp_model::GameSummary;

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Input: {}", result.input_dir.display());
    match &result.output_dir {
        Some(dir) => println!("Output: {}", dir.display()),
        None => println!("Output: (dry run)"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Game"),
        header_cell("Raw"),
        header_cell("Events"),
        header_cell("Shifts"),
        header_cell("Drift"),
        header_cell("Bad clock"),
        header_cell("Unresolved"),
        header_cell("Ambiguous xy"),
        header_cell("Bad shifts"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..9 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total = GameSummary::default();
    let mut ordered: Vec<&GameSummary> = result.report.games.iter().collect();
    ordered.sort_by_key(|summary| summary.game_id);
    for summary in ordered {
        accumulate(&mut total, summary);
        let game = summary
            .game_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let mut row = vec![
            Cell::new(game)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
        ];
        row.extend(count_cells(summary));
        table.add_row(row);
    }
    let mut total_row = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ];
    total_row.extend(
        count_cells(&total)
            .into_iter()
            .map(|cell| cell.add_attribute(Attribute::Bold)),
    );
    table.add_row(total_row);
    println!("{table}");

    if !result.report.skipped.is_empty() {
        eprintln!("Skipped games:");
        for skip in &result.report.skipped {
            eprintln!("- {}: {}", skip.game_id, skip.reason);
        }
    }
    if !result.load_failures.is_empty() {
        eprintln!("Unreadable files:");
        for failure in &result.load_failures {
            eprintln!("- {failure}");
        }
    }
}

fn accumulate(total: &mut GameSummary, summary: &GameSummary) {
    total.raw_events += summary.raw_events;
    total.events += summary.events;
    total.shift_intervals += summary.shift_intervals;
    total.schema_drift += summary.schema_drift;
    total.malformed_durations += summary.malformed_durations;
    total.unresolved_attributions += summary.unresolved_attributions;
    total.ambiguous_coordinates += summary.ambiguous_coordinates;
    total.degenerate_shifts += summary.degenerate_shifts;
}

fn count_cells(summary: &GameSummary) -> Vec<Cell> {
    vec![
        Cell::new(summary.raw_events),
        Cell::new(summary.events),
        Cell::new(summary.shift_intervals),
        issue_cell(summary.schema_drift, Color::Yellow),
        issue_cell(summary.malformed_durations, Color::Yellow),
        issue_cell(summary.unresolved_attributions, Color::Yellow),
        issue_cell(summary.ambiguous_coordinates, Color::Yellow),
        issue_cell(summary.degenerate_shifts, Color::Yellow),
    ]
}

fn issue_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
