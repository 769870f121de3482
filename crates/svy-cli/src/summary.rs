use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use crate::pipeline::ExportOutcome;

pub fn print_summary(outcome: &ExportOutcome) {
    println!("Survey: {} (SID: {})", outcome.title, outcome.survey_id);
    println!("Responses: {}", outcome.rows);
    println!("Label sets: {}", outcome.label_sets);
    if let Some(path) = &outcome.output {
        println!("Dataset: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variable"),
        header_cell("Kind"),
        header_cell("Type"),
        header_cell("Format"),
        header_cell("Label set"),
        header_cell("Label"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    for column in &outcome.columns {
        table.add_row(vec![
            Cell::new(&column.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&column.kind),
            Cell::new(&column.storage),
            Cell::new(&column.format),
            label_set_cell(column.label_set.as_deref()),
            Cell::new(&column.label),
        ]);
    }
    println!("{table}");

    if !outcome.dropped.is_empty() {
        eprintln!("Dropped columns (no survey metadata):");
        for key in &outcome.dropped {
            eprintln!("- {key}");
        }
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(20)),
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::UpperBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
        ]);
    }
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

fn label_set_cell(name: Option<&str>) -> Cell {
    match name {
        Some(name) => Cell::new(name).fg(Color::Green),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}
