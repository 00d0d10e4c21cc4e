use super::ChartTallies;

/// `| Item | Count | % |` table. Pipes inside labels become `/`.
pub fn table(items: &[(String, usize)], total: usize) -> String {
    let mut lines = vec!["| Item | Count | % |".to_string(), "|---|---:|---:|".to_string()];
    for (name, count) in items {
        let pct = if total > 0 {
            *count as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        lines.push(format!("| {} | {} | {:.2}% |", name.replace('|', "/"), count, pct));
    }
    lines.join("\n")
}

/// Full Markdown summary for a set of tallies.
pub fn summary(tallies: &ChartTallies, top_n: usize) -> String {
    let total = tallies.total;
    let sections = [
        ("Top collections", tallies.collections.top(top_n)),
        ("Top files", tallies.files.top(top_n)),
        ("Top codes", tallies.codes.top(top_n)),
        ("Sources", tallies.sources.top(top_n)),
    ];

    let mut out = String::from("# Diagnostic charts\n\n");
    out.push_str(&format!("- Total diagnostics: **{total}**\n"));
    out.push_str(&format!("- Top N: **{top_n}**\n"));
    for (heading, items) in &sections {
        out.push_str(&format!("\n## {heading}\n\n"));
        out.push_str(&table(items, total));
        out.push('\n');
    }
    out
}
