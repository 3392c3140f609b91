use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use reglament_cli::pipeline::{GenerateResult, ServicePlan};

pub fn print_summary(result: &GenerateResult) {
    if result.written {
        println!("Script: {}", result.output.display());
    } else {
        println!("Script: {} (dry run, not written)", result.output.display());
    }
    println!("SHA-256: {}", result.sha256);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Service"),
        header_cell("Rejections"),
        header_cell("Criteria"),
        header_cell("Resolved"),
        header_cell("Unresolved"),
        header_cell("Oversized"),
        header_cell("Errors"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for outcome in &result.services {
        let stats = &outcome.stats;
        table.add_row(vec![
            Cell::new(&outcome.service)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(stats.rejections),
            Cell::new(stats.criteria),
            count_cell(stats.resolved, Color::Green),
            count_cell(stats.unresolved, Color::Yellow),
            count_cell(stats.oversized, Color::Yellow),
            count_cell(outcome.errors.len(), Color::Red),
        ]);
    }
    let totals = &result.totals;
    let error_count = result.errors().count();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(totals.rejections).add_attribute(Attribute::Bold),
        Cell::new(totals.criteria).add_attribute(Attribute::Bold),
        count_cell(totals.resolved, Color::Green).add_attribute(Attribute::Bold),
        count_cell(totals.unresolved, Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(totals.oversized, Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(error_count, Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if result.has_errors() {
        eprintln!("Errors:");
        for (service, error) in result.errors() {
            eprintln!("- {service}: {error}");
        }
    }
}

pub fn print_services(plans: &[ServicePlan]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Service"),
        header_cell("Reglament"),
        header_cell("Dictionary"),
        header_cell("Source"),
    ]);
    apply_table_style(&mut table);
    for plan in plans {
        for (index, (kind, source)) in plan.dictionaries.iter().enumerate() {
            let (service, path) = if index == 0 {
                (
                    Cell::new(&plan.service)
                        .fg(Color::Blue)
                        .add_attribute(Attribute::Bold),
                    Cell::new(plan.path.display()),
                )
            } else {
                (Cell::new(""), Cell::new(""))
            };
            let source_cell = match source {
                Some(source) => Cell::new(source),
                None => Cell::new("missing").fg(Color::Red),
            };
            table.add_row(vec![service, path, Cell::new(kind), source_cell]);
        }
    }
    println!("{table}");
    println!("{} reglament(s)", plans.len());
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
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

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
