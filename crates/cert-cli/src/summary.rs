use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use cert_cli::types::{CertificateStatus, RunResult, TemplateCheck};

pub fn print_summary(result: &RunResult) {
    println!("Attendance export: {}", result.csv_path.display());
    println!("Output: {}", result.output_root.display());
    if let Some(path) = &result.summary_path {
        println!("Summary: {}", path.display());
    }
    if !result.dry_run {
        println!("Certificates: {}", result.certificate_dir.display());
    }
    println!(
        "Rows: {} read, {} unusable, {} excluded by first row, {} below minimum",
        result.records,
        result.stats.unusable_rows,
        result.stats.gated_rows,
        result.stats.below_minimum
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Ref"),
        header_cell("Name"),
        header_cell("Email"),
        header_cell("Minutes"),
        header_cell("Certificate"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    let mut total_minutes = 0u64;
    for attendee in &result.attendees {
        total_minutes = total_minutes.saturating_add(attendee.duration_minutes);
        table.add_row(vec![
            Cell::new(attendee.reference),
            Cell::new(&attendee.name),
            Cell::new(&attendee.email),
            Cell::new(attendee.duration_minutes),
            certificate_cell(&attendee.certificate),
        ]);
    }
    table.add_row(vec![
        dim_cell("-"),
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} eligible", result.attendees.len())).add_attribute(Attribute::Bold),
        Cell::new(total_minutes).add_attribute(Attribute::Bold),
        totals_cell(result),
    ]);
    println!("{table}");
}

pub fn print_template_check(check: &TemplateCheck) {
    println!("Template: {}", check.template_path.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Placeholder"), header_cell("Status")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for token in &check.present {
        table.add_row(vec![
            Cell::new(token),
            Cell::new("found")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
    }
    for token in &check.missing {
        table.add_row(vec![
            Cell::new(token),
            Cell::new("missing")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
        ]);
    }
    println!("{table}");
}

fn certificate_cell(status: &CertificateStatus) -> Cell {
    match status {
        CertificateStatus::Written(path) => Cell::new(
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        )
        .fg(Color::Green),
        CertificateStatus::Failed(reason) => Cell::new(reason).fg(Color::Red),
        CertificateStatus::Skipped => dim_cell("dry run"),
    }
}

fn totals_cell(result: &RunResult) -> Cell {
    if result.dry_run {
        return dim_cell("-");
    }
    let failed = result.failed_count();
    let text = format!("{} written, {failed} failed", result.written_count());
    let cell = Cell::new(text).add_attribute(Attribute::Bold);
    if failed > 0 {
        cell.fg(Color::Red)
    } else {
        cell.fg(Color::Green)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
