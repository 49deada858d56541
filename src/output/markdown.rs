use crate::report::DirectableReport;
use std::fmt::Write;

pub fn render_markdown(report: &DirectableReport) -> String {
    let mut out = String::new();
    let title = if report.unit.is_empty() {
        "Direct dispatch report".to_string()
    } else {
        format!("Direct dispatch report: {}", report.unit)
    };
    let _ = writeln!(out, "# {title}\n");
    let _ = writeln!(
        out,
        "{} directable ({} accessors), {} blocked selectors, {} blocked methods\n",
        report.meths.len(),
        report.accessor_count(),
        report.sels.len(),
        report.undirect_meths.len()
    );

    if !report.meths.is_empty() {
        out.push_str("## Directable methods\n\n");
        out.push_str("| Method | Selector | Location | Accessor |\n");
        out.push_str("|---|---|---|---|\n");
        for entry in &report.meths {
            let _ = writeln!(
                out,
                "| `{}` | `{}` | {} | {} |",
                entry.name,
                entry.sel,
                entry.loc,
                if entry.is_property_accessor { "yes" } else { "no" }
            );
        }
        out.push('\n');
    }

    push_list(&mut out, "Blocked selectors", &report.sels);
    push_list(&mut out, "Blocked methods", &report.undirect_meths);
    out
}

fn push_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "## {heading}\n");
    for item in items {
        let _ = writeln!(out, "- `{item}`");
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportEntry;

    #[test]
    fn test_markdown_sections() {
        let report = DirectableReport {
            unit: "A".into(),
            sels: vec!["foo:".into()],
            undirect_meths: vec![],
            meths: vec![ReportEntry {
                name: "-[A title]".into(),
                sel: "title".into(),
                loc: "A.h:3:1".into(),
                is_property_accessor: true,
            }],
        };
        let md = render_markdown(&report);
        assert!(md.starts_with("# Direct dispatch report: A"));
        assert!(md.contains("| `-[A title]` | `title` | A.h:3:1 | yes |"));
        assert!(md.contains("## Blocked selectors"));
        assert!(!md.contains("## Blocked methods"));
    }
}
