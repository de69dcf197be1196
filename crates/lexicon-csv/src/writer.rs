//! CSV rendering for table exports.

use lexicon_types::Row;

/// Quotes a field if it contains a comma, a double quote or a line break
/// (`\n` or `\r`). Internal quotes are doubled.
pub fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn push_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = fields.map(escape_field).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Renders `rows` under `columns`, one line per row. Missing and null
/// cells are empty fields.
pub(crate) fn render(columns: &[String], rows: &[Row]) -> String {
    let mut out = String::new();
    push_line(&mut out, columns.iter().map(String::as_str));
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| row.get(c).map(ToString::to_string).unwrap_or_default())
            .collect();
        push_line(&mut out, cells.iter().map(String::as_str));
    }
    out
}
