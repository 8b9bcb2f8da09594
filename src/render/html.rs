//! HTML rendering for reconstructed tables.

use crate::model::TableGrid;

/// Render a grid as a standalone HTML page holding one table.
///
/// No header row, no index column, no attributes: the output only needs to
/// be readable by a plain HTML table reader.
pub fn table_to_html(grid: &TableGrid) -> String {
    let mut output = String::from("<html><body>");
    render_table(&mut output, grid);
    output.push_str("</body></html>");
    output
}

/// Render a grid as a bare `<table>` fragment.
pub fn table_fragment(grid: &TableGrid) -> String {
    let mut output = String::new();
    render_table(&mut output, grid);
    output
}

fn render_table(output: &mut String, grid: &TableGrid) {
    output.push_str("<table>\n");
    output.push_str("  <tbody>\n");
    for row in grid.rows() {
        output.push_str("    <tr>\n");
        for cell in row {
            output.push_str("      <td>");
            output.push_str(&escape_html(cell));
            output.push_str("</td>\n");
        }
        output.push_str("    </tr>\n");
    }
    output.push_str("  </tbody>\n");
    output.push_str("</table>");
}

/// Escape text for use inside an HTML element.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_to_html() {
        let grid = TableGrid::from_strings(vec![vec!["a", "b"], vec!["c", ""]]);
        let html = table_to_html(&grid);

        assert!(html.starts_with("<html><body><table>"));
        assert!(html.ends_with("</table></body></html>"));
        assert_eq!(html.matches("<tr>").count(), 2);
        assert_eq!(html.matches("<td>").count(), 4);
        assert!(html.contains("<td></td>"));
        assert!(!html.contains("<th>"));
        assert!(!html.contains("class="));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & c > \"d\""), "a &lt; b &amp; c &gt; &quot;d&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_fragment_has_no_wrapper() {
        let grid = TableGrid::from_strings(vec![vec!["x"]]);
        let fragment = table_fragment(&grid);
        assert!(fragment.starts_with("<table>"));
        assert!(!fragment.contains("<html>"));
    }
}
