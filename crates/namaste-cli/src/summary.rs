use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use namaste_map::JobSummary;

pub fn print_materialize_summary(summaries: &[JobSummary], threshold: f64) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Candidates"),
        header_cell(&format!("Published (>= {threshold:.2})")),
        header_cell("Elements"),
        header_cell("Targets"),
        header_cell("ConceptMap"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_full = 0usize;
    let mut total_clean = 0usize;
    for summary in summaries {
        total_full += summary.csv.full_rows;
        total_clean += summary.csv.clean_rows;
        table.add_row(vec![
            Cell::new(&summary.dataset)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            Cell::new(summary.csv.full_rows),
            count_cell(summary.csv.clean_rows),
            Cell::new(summary.elements),
            Cell::new(summary.targets),
            dim_cell(summary.concept_map.display()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_full).add_attribute(Attribute::Bold),
        count_cell(total_clean).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Green)
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
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
