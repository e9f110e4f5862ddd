//! Terminal rendering of the dashboard views

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{
    Aggregate, CorrelationMatrix, CrossRiskTable, CrossRiskUnit, Distribution, HeadlineMetrics,
    Histogram, InsufficientData, RiskShare,
};

use super::DashboardReport;

/// Correlations above this magnitude are listed under the heatmap
const NOTABLE_CORRELATION: f64 = 0.3;

fn section(title: &str) {
    println!();
    println!("    {} {}", style("◆").cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn header(cells: &[&str]) -> Vec<Cell> {
    cells
        .iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect()
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table
}

fn insufficient_message(reason: &InsufficientData) -> String {
    match reason {
        InsufficientData::EmptyTable => "no data for the current filters".to_string(),
        InsufficientData::MissingColumn(c) => format!("column '{}' not available", c),
        InsufficientData::NonNumericColumn(c) => format!("column '{}' is not numeric", c),
        InsufficientData::NoValues(c) => format!("no values in '{}'", c),
    }
}

/// Render a view, or a dimmed placeholder when there is nothing to show
fn render<T>(title: &str, view: &Aggregate<T>, draw: impl FnOnce(&T)) {
    section(title);
    match view {
        Aggregate::Ready(value) => draw(value),
        Aggregate::Insufficient(reason) => {
            println!("      {}", style(insufficient_message(reason)).dim());
        }
    }
}

fn draw_metrics(m: &HeadlineMetrics) {
    let mut table = new_table();
    table.set_header(header(&["Metric", "Value"]));

    table.add_row(vec![Cell::new("👥 Applicants"), Cell::new(m.applicants)]);

    let share = match m.good_risk_share {
        RiskShare::Percentage(pct) => format!("{:.1}%", pct),
        RiskShare::Count(n) => format!("{} (single class)", n),
    };
    table.add_row(vec![
        Cell::new("✅ Good Risk"),
        Cell::new(share).fg(Color::Green).add_attribute(Attribute::Bold),
    ]);

    let fmt_opt = |v: Option<f64>, decimals: usize| {
        v.map(|x| format!("{:.*}", decimals, x))
            .unwrap_or_else(|| "-".to_string())
    };
    table.add_row(vec![Cell::new("🎂 Mean Age"), Cell::new(fmt_opt(m.mean_age, 1))]);
    table.add_row(vec![
        Cell::new("💶 Mean Credit (DM)"),
        Cell::new(fmt_opt(m.mean_credit, 0)),
    ]);

    print_indented(&table);

    if let Some(pct) = m.bad_risk_pct {
        println!();
        println!(
            "      {} {} of the applicants in the current filters are bad risk.",
            style("!").yellow().bold(),
            style(format!("{:.1}%", pct)).yellow().bold()
        );
    }
}

fn draw_distribution(dist: &Distribution) {
    let mut table = new_table();
    table.set_header(header(&[dist.column.as_str(), "Count", "Share"]));
    for (value, pct) in dist.percentages() {
        let count = dist.get(&value).unwrap_or(0);
        table.add_row(vec![
            Cell::new(value),
            Cell::new(count),
            Cell::new(format!("{:.1}%", pct)),
        ]);
    }
    print_indented(&table);
}

fn draw_cross_risk(ct: &CrossRiskTable) {
    let mut table = new_table();
    let mut cells = vec![Cell::new(&ct.column).add_attribute(Attribute::Bold)];
    cells.extend(
        ct.risk_labels
            .iter()
            .map(|l| Cell::new(l.as_str()).add_attribute(Attribute::Bold)),
    );
    table.set_header(cells);

    for row in &ct.rows {
        let mut cells = vec![Cell::new(&row.category)];
        cells.extend(row.values.iter().map(|v| match ct.unit {
            CrossRiskUnit::Percentage => Cell::new(format!("{:.1}%", v)),
            CrossRiskUnit::Count => Cell::new(format!("{}", *v as u64)),
        }));
        table.add_row(cells);
    }
    print_indented(&table);

    if ct.is_single_class() {
        println!(
            "      {}",
            style("single risk class in selection: showing counts").dim()
        );
    }
}

fn draw_histogram(hist: &Histogram) {
    let max = hist.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in &hist.bins {
        let bar = "█".repeat(bin.count * 30 / max);
        println!(
            "      {:>9.1} - {:<9.1} {:>5}  {}",
            bin.lower,
            bin.upper,
            bin.count,
            style(bar).cyan()
        );
    }
}

fn draw_correlation(matrix: &CorrelationMatrix) {
    let mut table = new_table();
    let mut cells = vec![Cell::new("")];
    cells.extend(
        matrix
            .columns
            .iter()
            .map(|c| Cell::new(c).add_attribute(Attribute::Bold)),
    );
    table.set_header(cells);

    for (name, row) in matrix.columns.iter().zip(matrix.values.iter()) {
        let mut cells = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        cells.extend(row.iter().map(|r| {
            if r.is_nan() {
                Cell::new("NaN").fg(Color::DarkGrey)
            } else {
                let color = if r.abs() >= 0.5 {
                    Color::Red
                } else if r.abs() >= NOTABLE_CORRELATION {
                    Color::Yellow
                } else {
                    Color::White
                };
                Cell::new(format!("{:.2}", r)).fg(color)
            }
        }));
        table.add_row(cells);
    }
    print_indented(&table);

    for pair in matrix.strongest_pairs(NOTABLE_CORRELATION) {
        println!(
            "      {} {} ~ {}: {}",
            style("•").dim(),
            pair.feature1,
            pair.feature2,
            style(format!("{:+.2}", pair.correlation)).yellow()
        );
    }
}

/// Print the full dashboard to stdout
pub fn print_dashboard(report: &DashboardReport) {
    println!();
    println!(
        "    {} {} of {}",
        style("Records shown:").bold(),
        style(report.filtered_rows).yellow().bold(),
        report.total_rows
    );

    if let Some(no_data) = report.no_data {
        println!();
        println!("    {} {}", style("⚠").yellow(), style(no_data.message()).yellow());
        return;
    }

    render("KEY METRICS", &report.metrics, draw_metrics);

    render("RISK DISTRIBUTION", &report.risk.risk_distribution, draw_distribution);
    render("RISK BY AGE BAND", &report.risk.risk_by_age_band, draw_cross_risk);

    render("AGE DISTRIBUTION", &report.demographics.age_histogram, draw_histogram);
    render(
        "PERSONAL STATUS AND SEX",
        &report.demographics.personal_status,
        draw_distribution,
    );

    render("CREDIT AMOUNT", &report.financial.credit_histogram, draw_histogram);
    render(
        "CREDIT AMOUNT VS DURATION",
        &report.financial.credit_vs_duration,
        |points| println!("      {} points", points.len()),
    );

    render("CREDIT PURPOSE", &report.social.purpose, draw_distribution);
    render("HOUSING", &report.social.housing, draw_distribution);

    render("RISK BY PURPOSE", &report.advanced.risk_by_purpose, draw_cross_risk);
    render(
        "RISK BY EMPLOYMENT STATUS",
        &report.advanced.risk_by_employment,
        draw_cross_risk,
    );
    render("CORRELATION", &report.advanced.correlation, draw_correlation);
}
