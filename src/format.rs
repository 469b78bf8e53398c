use std::fmt::Write as _;

use crate::locator::{BeautifyOptions, SearchResult, beautify_group};

/// Escape characters that break inline Markdown: `[`, `]`, `(`, `)`.
pub(crate) fn escape_md(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '[' | ']' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Sanitize text for embedding in a Markdown heading.
/// Replaces newlines (which would break heading structure) with spaces.
pub(crate) fn sanitize_heading(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

/// Renders results grouped by category, groups in order of first appearance.
pub fn format_results(
    title: &str,
    search: &str,
    results: &[SearchResult],
    beautify: &BeautifyOptions,
) -> String {
    let mut output = format!("# {title}: {}\n\n", sanitize_heading(search));
    if results.is_empty() {
        output.push_str("(no results)\n");
        return output;
    }

    let mut groups: Vec<(_, Vec<&SearchResult>)> = Vec::new();
    for result in results {
        match groups.iter_mut().find(|(c, _)| *c == result.category) {
            Some((_, members)) => members.push(result),
            None => groups.push((result.category, vec![result])),
        }
    }

    for (category, members) in groups {
        let heading = beautify_group(category.label(), beautify);
        let _ = writeln!(output, "## {}\n", sanitize_heading(&heading));
        for r in members {
            let b = &r.bbox;
            let _ = writeln!(
                output,
                "- {} (priority {:.3}) [{}, {}, {}, {}]",
                escape_md(&r.label),
                r.priority,
                b.xmin,
                b.ymin,
                b.xmax,
                b.ymax
            );
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;
    use crate::locator::Category;

    fn result(label: &str, category: Category, rank: i64) -> SearchResult {
        SearchResult {
            label: label.into(),
            detail: None,
            category,
            rank,
            priority: crate::locator::rank_to_priority(rank),
            bbox: Rectangle::new(2600000.5, 1200000.0, 2601000.0, 1201000.25),
        }
    }

    #[test]
    fn escapes_special_chars() {
        assert_eq!(escape_md("normal text"), "normal text");
        assert_eq!(escape_md("a[b]c(d)e"), r"a\[b\]c\(d\)e");
    }

    #[test]
    fn sanitize_heading_replaces_newlines() {
        assert_eq!(sanitize_heading("line1\nline2\rline3"), "line1 line2 line3");
    }

    #[test]
    fn groups_results_by_first_appearance() {
        let results = vec![
            result("3011 Bern", Category::ZipCode, 1),
            result("Bern (BE)", Category::MunicipalBoundary, 2),
            result("3012 Bern", Category::ZipCode, 1),
        ];
        let text = format_results("Locations", "Bern", &results, &BeautifyOptions::default());

        assert!(text.starts_with("# Locations: Bern\n"));
        let zip = text.find("## ZIP code").unwrap();
        let muni = text.find("## Municipal boundaries").unwrap();
        assert!(zip < muni);
        assert!(text.find("3012 Bern").unwrap() < muni);
        assert!(text.contains(r"- Bern \(BE\) (priority 0.714)"));
        assert!(text.contains("[2600000.5, 1200000, 2601000, 1201000.25]"));
    }

    #[test]
    fn empty_results_are_noted() {
        let text = format_results("Locations", "xy", &[], &BeautifyOptions::default());
        assert!(text.contains("(no results)"));
    }
}
