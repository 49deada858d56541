use crate::formatting::FormattingConfig;
use crate::report::DirectableReport;
use colored::*;
use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{ContentArrangement, Table};

pub fn render_terminal(report: &DirectableReport, formatting: FormattingConfig) -> String {
    formatting.apply();
    let color = formatting.color.should_use_color();

    let mut out = String::new();
    let unit = if report.unit.is_empty() {
        "(unnamed unit)"
    } else {
        report.unit.as_str()
    };
    out.push_str(&format!("{} {}\n", "Unit".bold(), unit));
    out.push_str(&format!(
        "  {} directable, {} blocked selectors, {} blocked methods\n",
        report.meths.len().to_string().green(),
        report.sels.len().to_string().yellow(),
        report.undirect_meths.len().to_string().red(),
    ));

    if !report.meths.is_empty() {
        let mut table = Table::new();
        table
            .load_preset(if color { UTF8_FULL } else { ASCII_FULL })
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Method", "Location", "Accessor"]);
        for entry in &report.meths {
            table.add_row(vec![
                entry.name.clone(),
                entry.loc.clone(),
                if entry.is_property_accessor { "yes" } else { "" }.to_string(),
            ]);
        }
        out.push_str(&table.to_string());
        out.push('\n');
    }

    if !report.sels.is_empty() {
        out.push_str(&format!("{}\n", "Blocked selectors".yellow().bold()));
        for sel in &report.sels {
            out.push_str(&format!("  {sel}\n"));
        }
    }
    if !report.undirect_meths.is_empty() {
        out.push_str(&format!("{}\n", "Blocked methods".red().bold()));
        for name in &report.undirect_meths {
            out.push_str(&format!("  {name}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportEntry;

    #[test]
    fn test_plain_terminal_output() {
        let report = DirectableReport {
            unit: "A".into(),
            sels: vec![],
            undirect_meths: vec!["-[A height]".into()],
            meths: vec![ReportEntry {
                name: "-[A run]".into(),
                sel: "run".into(),
                loc: "A.h:2:1".into(),
                is_property_accessor: false,
            }],
        };
        let text = render_terminal(&report, FormattingConfig::plain());
        assert!(text.contains("Unit A"));
        assert!(text.contains("-[A run]"));
        assert!(text.contains("Blocked methods"));
        assert!(!text.contains('\u{1b}'));
    }
}
