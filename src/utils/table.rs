/// Plain-text table for terminal output
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

/// Display width, counted in chars so badges and currency signs line up
fn width(text: &str) -> usize {
    strip_ansi(text).chars().count()
}

/// Drop ANSI SGR sequences (`ESC [ ... m`) before measuring
fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            col_widths: headers.iter().map(|h| width(h)).collect(),
        }
    }

    /// Add a row; cells beyond the header count are dropped
    pub fn add_row(&mut self, row: Vec<String>) {
        let mut row = row;
        row.truncate(self.headers.len());
        for (i, cell) in row.iter().enumerate() {
            self.col_widths[i] = self.col_widths[i].max(width(cell));
        }
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut output = self.render_row(&self.headers);
        output.push('\n');
        output.push_str(&self.render_separator());
        for row in &self.rows {
            output.push('\n');
            output.push_str(&self.render_row(row));
        }
        output
    }

    fn render_row(&self, row: &[String]) -> String {
        self.col_widths
            .iter()
            .enumerate()
            .map(|(i, &col_width)| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                let padding = col_width.saturating_sub(width(cell));
                format!("{}{}", cell, " ".repeat(padding))
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_table() {
        let mut table = Table::new(&["#", "Name", "Email"]);
        table.add_row(vec!["1".into(), "Ada Obi".into(), "ada@trove.io".into()]);
        table.add_row(vec!["2".into(), "Bo".into(), "bo@trove.io".into()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "# | Name    | Email");
        assert_eq!(lines[1], "--+---------+-------------");
        assert_eq!(lines[3], "2 | Bo      | bo@trove.io");
    }

    #[test]
    fn test_ansi_badges_do_not_widen_columns() {
        let mut table = Table::new(&["Status", "Id"]);
        table.add_row(vec!["\x1b[97;48;2;0;128;0m ok \x1b[0m".into(), "t1".into()]);

        let rendered = table.render();
        assert!(rendered.lines().nth(1).unwrap().starts_with("------"));
        assert_eq!(strip_ansi(rendered.lines().nth(2).unwrap()), " ok    | t1");
    }
}
