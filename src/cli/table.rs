use crate::cli::output;

/// Declarative description of a table column.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: String,
    pub width: usize,
    pub align_right: bool,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, width: usize) -> Self {
        Self {
            header: header.into(),
            width,
            align_right: false,
        }
    }

    pub fn right(mut self) -> Self {
        self.align_right = true;
        self
    }
}

/// Simple table model used for rendering read-only overviews.
#[derive(Debug, Clone)]
pub struct Table {
    pub title: Option<String>,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<T: Into<String>>(title: Option<T>, columns: Vec<TableColumn>) -> Self {
        Self {
            title: title.map(|value| value.into()),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: Vec<S>) {
        self.rows
            .push(cells.into_iter().map(|value| value.into()).collect());
    }

    /// Lays the table out as padded lines. Columns widen to fit their content.
    pub fn lines(&self) -> Vec<String> {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .chain([column.width, column.header.chars().count()])
                    .max()
                    .unwrap_or(column.width)
            })
            .collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        let headers: Vec<&str> = self.columns.iter().map(|col| col.header.as_str()).collect();
        lines.push(self.render_line(&headers, &widths));
        let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        lines.push("-".repeat(total));
        for row in &self.rows {
            let cells: Vec<&str> = (0..self.columns.len())
                .map(|idx| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect();
            lines.push(self.render_line(&cells, &widths));
        }
        lines
    }

    fn render_line(&self, cells: &[&str], widths: &[usize]) -> String {
        let line = cells
            .iter()
            .zip(self.columns.iter().zip(widths))
            .map(|(cell, (column, width))| {
                if column.align_right {
                    format!("{:>width$}", cell, width = *width)
                } else {
                    format!("{:<width$}", cell, width = *width)
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    }

    pub fn print(&self) {
        if let Some(title) = &self.title {
            output::section(title);
        }
        for line in self.lines() {
            output::plain(line);
        }
    }
}
