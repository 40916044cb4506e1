//! Terminal tables.

use agri_ai::{CropReportOutput, PlantingScheduleOutput};
use agri_model::{
    AUTHENTIC_THRESHOLD, Equipment, FORM_CATALOG, FieldKind, FirCase, FirStatus, InspectionTask,
    LabSample, LabSampleStatus, RecordId, STEP_COUNT, Seizure, SeizureStatus, Submission,
    SubmissionStatus,
};
use agri_state::{
    ActivityReport, AppState, AuditEntry, DashboardStats, FormSession, ScanResult, ScheduleDay,
};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

pub fn apply_table_style(table: &mut Table) {
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_header(headers.iter().map(|h| header_cell(h)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    table
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

fn id_cell(id: &str) -> Cell {
    Cell::new(id).fg(Color::Blue).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn optional_cell(value: Option<&str>) -> Cell {
    value.map_or_else(|| dim_cell("-"), Cell::new)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn print_table_or_empty(table: &Table, what: &str) {
    if table.row_count() == 0 {
        println!("No {what}.");
    } else {
        println!("{table}");
    }
}

// ===== SESSION =====

pub fn print_status(state: &AppState) {
    println!("Role: {}", state.user_role().label());
    println!("Active tab: {}", state.active_tab().definition().text);
    if let Some(form) = state.selected_form_type() {
        println!("Selected form: {}", form.definition().title);
    }
    let mut table = new_table(&["Tab", "Id", "Sidebar"]);
    for tab in state.allowed_tabs() {
        let name = if tab.id == state.active_tab() {
            Cell::new(format!("> {}", tab.text)).add_attribute(Attribute::Bold)
        } else {
            Cell::new(tab.text)
        };
        let sidebar = if tab.hidden_in_sidebar {
            dim_cell("hidden")
        } else {
            Cell::new("shown")
        };
        table.add_row(vec![name, dim_cell(tab.id.as_str()), sidebar]);
    }
    println!("{table}");
    println!(
        "{} inspections, {} seizures, {} samples, {} FIRs, {} submissions",
        state.inspection_tasks().len(),
        state.seizures().len(),
        state.lab_samples().len(),
        state.fir_cases().len(),
        state.submissions().len()
    );
}

pub fn print_audit<'a>(entries: impl Iterator<Item = &'a AuditEntry>) {
    let mut table = new_table(&["Time", "Role", "Action", "Details"]);
    for entry in entries {
        table.add_row(vec![
            dim_cell(entry.at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(entry.role.label()),
            Cell::new(&entry.action),
            Cell::new(&entry.details),
        ]);
    }
    print_table_or_empty(&table, "audit entries");
}

// ===== DASHBOARD & REPORTS =====

pub fn print_dashboard(stats: &DashboardStats, schedule: &[ScheduleDay<'_>]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Total Inspections"),
        Cell::new(stats.total_inspections),
    ]);
    table.add_row(vec![
        Cell::new("Active Seizures"),
        count_cell(stats.active_seizures, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Pending Lab Samples"),
        count_cell(stats.pending_lab_samples, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Open FIR Cases"),
        count_cell(stats.open_fir_cases, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Compliance Rate"),
        Cell::new(stats.compliance_label()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let mut calendar = new_table(&["Day", "Visits"]);
    for day in schedule {
        let visits = if day.tasks.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(
                day.tasks
                    .iter()
                    .map(|task| {
                        format!(
                            "{} {} ({})",
                            task.scheduled_at.format("%H:%M"),
                            task.location,
                            task.officer
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        };
        calendar.add_row(vec![Cell::new(day.day_name()), visits]);
    }
    println!();
    println!("This week:");
    println!("{calendar}");
}

pub fn print_report(report: &ActivityReport) {
    println!("{}", report.title);
    println!("{}", report.description);
    let mut table = new_table(&["Metric", "Value"]);
    align_column(&mut table, 1, CellAlignment::Right);
    for metric in &report.metrics {
        table.add_row(vec![
            Cell::new(metric.label),
            Cell::new(&metric.value).add_attribute(Attribute::Bold),
        ]);
    }
    println!("{table}");
}

// ===== ENFORCEMENT RECORDS =====

pub fn print_inspections(tasks: &[InspectionTask]) {
    let mut table = new_table(&[
        "Id",
        "When",
        "Officer",
        "Location",
        "Target",
        "Equipment",
        "Status",
    ]);
    for task in tasks {
        let equipment = task
            .equipment
            .iter()
            .map(Equipment::label)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            id_cell(task.id.as_str()),
            Cell::new(task.scheduled_at.format("%Y-%m-%d %H:%M")),
            Cell::new(&task.officer),
            Cell::new(&task.location),
            Cell::new(task.target_type),
            if equipment.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(equipment)
            },
            Cell::new(task.status),
        ]);
    }
    print_table_or_empty(&table, "inspections planned");
}

fn seizure_status_cell(status: SeizureStatus) -> Cell {
    let cell = Cell::new(status);
    match status {
        SeizureStatus::Pending => cell.fg(Color::Yellow),
        SeizureStatus::FirFiled => cell.fg(Color::Red),
        _ => cell,
    }
}

pub fn print_seizures(seizures: &[Seizure]) {
    let mut table = new_table(&[
        "Id", "Product", "Batch", "Score", "Qty", "Value", "Location", "Status",
    ]);
    align_column(&mut table, 3, CellAlignment::Right);
    for seizure in seizures {
        let d = &seizure.details;
        table.add_row(vec![
            id_cell(seizure.id.as_str()),
            Cell::new(format!("{} {}", d.company, d.product)),
            Cell::new(&d.batch_number),
            score_cell(d.authenticity_score.value()),
            optional_cell(d.quantity.as_deref()),
            optional_cell(d.estimated_value.as_deref()),
            Cell::new(&d.geo_location),
            seizure_status_cell(seizure.status),
        ]);
    }
    print_table_or_empty(&table, "seizures logged");
}

fn score_cell(score: u8) -> Cell {
    let color = if score < AUTHENTIC_THRESHOLD {
        Color::Red
    } else {
        Color::Green
    };
    Cell::new(format!("{score}%")).fg(color)
}

pub fn print_lab_samples(samples: &[LabSample]) {
    let mut table = new_table(&["Id", "Seizure", "Product", "Type", "Lab", "Status"]);
    for sample in samples {
        let status = Cell::new(sample.status);
        let status = match sample.status {
            LabSampleStatus::Violation => status.fg(Color::Red).add_attribute(Attribute::Bold),
            LabSampleStatus::Compliant => status.fg(Color::Green),
            _ => status,
        };
        table.add_row(vec![
            id_cell(sample.id.as_str()),
            optional_cell(sample.seizure_id.as_ref().map(RecordId::as_str)),
            Cell::new(format!("{} {}", sample.details.company, sample.details.product)),
            Cell::new(&sample.sample_type),
            Cell::new(&sample.lab_destination),
            status,
        ]);
    }
    print_table_or_empty(&table, "lab samples");
}

pub fn print_fir_cases(cases: &[FirCase]) {
    let mut table = new_table(&[
        "Id",
        "Seizure",
        "Lab report",
        "Violation",
        "Accused",
        "Location",
        "Status",
    ]);
    for case in cases {
        let status = Cell::new(case.status);
        let status = if case.status == FirStatus::Draft {
            status.fg(Color::Yellow)
        } else {
            status
        };
        table.add_row(vec![
            id_cell(case.id.as_str()),
            optional_cell(case.seizure_id.as_ref().map(RecordId::as_str)),
            Cell::new(&case.lab_report_id),
            Cell::new(&case.violation_type),
            Cell::new(&case.accused),
            Cell::new(&case.location),
            status,
        ]);
    }
    print_table_or_empty(&table, "FIR cases");
}

pub fn print_scan(scan: &ScanResult) {
    let d = &scan.details;
    let mut table = Table::new();
    apply_summary_table_style(&mut table);
    table.add_row(vec![header_cell("Product"), Cell::new(format!("{} {}", d.company, d.product))]);
    table.add_row(vec![header_cell("Batch"), Cell::new(&d.batch_number)]);
    if let Some(ingredient) = scan.active_ingredient() {
        table.add_row(vec![header_cell("Active ingredient"), Cell::new(ingredient)]);
    }
    if let Some(mrp) = scan.mrp() {
        table.add_row(vec![header_cell("MRP"), Cell::new(format!("₹{mrp}"))]);
    }
    table.add_row(vec![header_cell("Authenticity"), score_cell(d.authenticity_score.value())]);
    let verdict = if scan.counterfeit {
        Cell::new(&d.recommendation).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        Cell::new(&d.recommendation).fg(Color::Green)
    };
    table.add_row(vec![header_cell("Recommendation"), verdict]);
    if !d.issues.is_empty() {
        table.add_row(vec![header_cell("Issues"), Cell::new(d.issues.join("\n"))]);
    }
    table.add_row(vec![header_cell("Location"), Cell::new(&d.geo_location)]);
    let fingerprint = scan.fingerprint.get(..16).unwrap_or(&scan.fingerprint);
    table.add_row(vec![header_cell("Fingerprint"), dim_cell(fingerprint)]);
    println!("{table}");
}

// ===== FORMS PORTAL =====

pub fn print_catalog() {
    let mut table = new_table(&["Form", "Title", "Description"]);
    for form in &FORM_CATALOG {
        table.add_row(vec![
            id_cell(form.form_type.as_str()),
            Cell::new(form.title).add_attribute(Attribute::Bold),
            Cell::new(form.description),
        ]);
    }
    println!("{table}");
}

fn kind_label(kind: FieldKind) -> String {
    match kind {
        FieldKind::Text => "text".to_string(),
        FieldKind::Email => "email".to_string(),
        FieldKind::Tel => "tel".to_string(),
        FieldKind::Date => "date (YYYY-MM-DD)".to_string(),
        FieldKind::Number => "number".to_string(),
        FieldKind::Textarea => "textarea".to_string(),
        FieldKind::Select(options) => format!("one of: {}", options.join(", ")),
        FieldKind::File => "file".to_string(),
        FieldKind::Checkbox => "yes/no".to_string(),
    }
}

pub fn print_draft(draft: &FormSession, only_flagged: bool) {
    let step = draft.current_step();
    println!("{}", draft.form_type().definition().title);
    println!(
        "Step {} of {}: {} ({}% complete)",
        draft.step(),
        STEP_COUNT,
        step.title,
        draft.progress_percent()
    );
    if draft.is_update() && !draft.flagged_fields().is_empty() {
        let flagged: Vec<&str> = draft.flagged_fields().iter().map(String::as_str).collect();
        println!("Fields needing update: {}", flagged.join(", "));
    }
    let mut table = new_table(&["Field", "Label", "Kind", "Value"]);
    for spec in draft.visible_fields(only_flagged) {
        let name = if draft.needs_update(spec.name) {
            Cell::new(spec.name).fg(Color::Yellow).add_attribute(Attribute::Bold)
        } else {
            Cell::new(spec.name)
        };
        let value = draft
            .value(spec.name)
            .map_or_else(|| dim_cell("-"), Cell::new);
        table.add_row(vec![name, Cell::new(spec.label), dim_cell(kind_label(spec.kind)), value]);
    }
    print_table_or_empty(&table, "fields on this step");
}

fn submission_status_cell(status: SubmissionStatus) -> Cell {
    let cell = Cell::new(status.label());
    match status {
        SubmissionStatus::Approved => cell.fg(Color::Green),
        SubmissionStatus::Rejected => cell.fg(Color::Red),
        SubmissionStatus::PendingUpdate => cell.fg(Color::Yellow),
        SubmissionStatus::Pending | SubmissionStatus::UnderReview => cell,
    }
}

pub fn print_submissions(submissions: &[&Submission]) {
    let mut table = new_table(&["Id", "Form", "Submitted", "Status"]);
    for submission in submissions {
        table.add_row(vec![
            id_cell(submission.id.as_str()),
            Cell::new(submission.label()),
            Cell::new(submission.submitted_on.format("%Y-%m-%d")),
            submission_status_cell(submission.status),
        ]);
    }
    print_table_or_empty(&table, "submissions found");
}

pub fn print_submission(submission: &Submission) {
    println!("{} ({})", submission.label(), submission.id);
    println!("Status: {}", submission.status.label());
    if let Some(comment) = &submission.review_comment {
        println!("Reviewer comment: {comment}");
    }
    let mut table = new_table(&["Field", "Value"]);
    for (name, value) in &submission.values {
        let cell = if submission.update_fields.contains(name) {
            Cell::new(name).fg(Color::Yellow).add_attribute(Attribute::Bold)
        } else {
            Cell::new(name)
        };
        table.add_row(vec![cell, Cell::new(value)]);
    }
    print_table_or_empty(&table, "values");
}

// ===== AI =====

pub fn print_crop_report(report: &CropReportOutput) {
    let mut table = Table::new();
    apply_summary_table_style(&mut table);
    table.add_row(vec![header_cell("Overall health"), Cell::new(&report.overall_health)]);
    table.add_row(vec![header_cell("Potential risks"), Cell::new(&report.potential_risks)]);
    table.add_row(vec![
        header_cell("Recommended actions"),
        Cell::new(&report.recommended_actions),
    ]);
    println!("{table}");
}

pub fn print_planting_schedule(schedule: &PlantingScheduleOutput) {
    let mut table = Table::new();
    apply_summary_table_style(&mut table);
    table.add_row(vec![header_cell("Schedule"), Cell::new(&schedule.planting_schedule)]);
    table.add_row(vec![header_cell("Rationale"), Cell::new(&schedule.rationale)]);
    println!("{table}");
}
