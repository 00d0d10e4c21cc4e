const WIDTH: usize = 1200;
const BAR_HEIGHT: usize = 24;
const BAR_GAP: usize = 10;
const LEFT_MARGIN: usize = 340;
const RIGHT_MARGIN: usize = 40;
const TOP_MARGIN: usize = 60;
const BOTTOM_MARGIN: usize = 40;
const BAR_COLOR: &str = "#4C78A8";

/// Escape text for XML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Horizontal bar chart, one bar per `(label, count)`, scaled to the
/// largest count.
pub fn bar_chart(title: &str, items: &[(String, usize)]) -> String {
    let rows = items.len().max(1);
    let height = TOP_MARGIN + rows * (BAR_HEIGHT + BAR_GAP) + BOTTOM_MARGIN;
    let max_value = items.iter().map(|(_, v)| *v).max().unwrap_or(1).max(1);
    let plot_width = WIDTH.saturating_sub(LEFT_MARGIN + RIGHT_MARGIN).max(200);

    let mut lines = vec![
        format!(r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{height}">"#),
        "<style>text{font-family:Arial,Helvetica,sans-serif;font-size:12px;} \
         .title{font-size:18px;font-weight:bold;}</style>"
            .to_string(),
        format!(r#"<text class="title" x="20" y="30">{}</text>"#, escape(title)),
        format!(
            r##"<line x1="{LEFT_MARGIN}" y1="{}" x2="{LEFT_MARGIN}" y2="{}" stroke="#333"/>"##,
            TOP_MARGIN - 10,
            height - BOTTOM_MARGIN + 5
        ),
    ];

    for (i, (label, value)) in items.iter().enumerate() {
        let y = TOP_MARGIN + i * (BAR_HEIGHT + BAR_GAP);
        let text_y = y + BAR_HEIGHT - 6;
        let bar_width = value * plot_width / max_value;
        lines.push(format!(
            r#"<rect x="{LEFT_MARGIN}" y="{y}" width="{bar_width}" height="{BAR_HEIGHT}" fill="{BAR_COLOR}" />"#
        ));
        lines.push(format!(r#"<text x="10" y="{text_y}">{}</text>"#, escape(label)));
        lines.push(format!(
            r##"<text x="{}" y="{text_y}" fill="#111">{value}</text>"##,
            LEFT_MARGIN + bar_width + 8
        ));
    }

    lines.push("</svg>".to_string());
    lines.join("\n")
}
