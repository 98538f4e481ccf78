use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::table::render::TableBody;
use crate::table::{SortDirection, TableView};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(body)) = (data, response.as_object_mut()) {
                body.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": false,
                "error": { "message": message }
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output a rendered table: the view model as JSON, or an aligned text grid
pub fn output_table(output_format: &OutputFormat, view: &TableView) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
        OutputFormat::Text => print!("{}", text_table(view)),
    }
    Ok(())
}

pub fn text_table(view: &TableView) -> String {
    let mut out = String::new();

    if let Some(title) = &view.title {
        out.push_str(title);
        out.push('\n');
    }
    if !view.search.value.is_empty() {
        out.push_str(&format!("Search: {}\n", view.search.value));
    }

    let headers: Vec<String> = view
        .header
        .iter()
        .map(|h| match h.sort_indicator {
            Some(SortDirection::Asc) => format!("{} ▲", h.label),
            Some(SortDirection::Desc) => format!("{} ▼", h.label),
            None => h.label.clone(),
        })
        .collect();

    let rows: Vec<Vec<String>> = view
        .rows()
        .iter()
        .map(|row| row.cells.iter().map(|c| c.plain()).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    out.push_str(&grid_line(&headers, &widths));
    out.push_str(&grid_line(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>(), &widths));
    for row in &rows {
        out.push_str(&grid_line(row, &widths));
    }

    if let TableBody::Empty { empty } = &view.body {
        out.push_str(&format!("{}\n{}\n", empty.title, empty.description));
    }
    if let Some(pager) = &view.pager {
        out.push_str(&format!(
            "{} (page {}/{})\n",
            pager.summary, pager.current_page, pager.total_pages
        ));
    }
    out
}

fn grid_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{DataColumn, DataTable, DataTableProps, DataTableState, SortState, TableConfig};
    use serde_json::json;

    #[test]
    fn text_table_aligns_columns_and_marks_sort() {
        let rows = vec![json!({ "name": "Ana", "city": "Viedma" }), json!({ "name": "Bautista", "city": "" })];
        let config = TableConfig {
            sortable_columns: vec!["name".into()],
            initial_sort: Some(SortState::by("name", SortDirection::Asc)),
            ..Default::default()
        };
        let state = DataTableState::new(rows, config);
        let props = DataTableProps::new(vec![
            DataColumn::new("name", "Name").sortable().into(),
            DataColumn::new("city", "City").into(),
        ]);

        let text = text_table(&DataTable::render(&props, &state));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name ▲    City");
        assert_eq!(lines[2], "Ana       Viedma");
        assert_eq!(lines[3], "Bautista  -");
    }

    #[test]
    fn empty_tables_print_the_empty_state() {
        let state = DataTableState::new(Vec::<Value>::new(), TableConfig::default());
        let props = DataTableProps::new(vec![DataColumn::new("name", "Name").into()]);
        let text = text_table(&DataTable::render(&props, &state));
        assert!(text.contains("No results"));
    }
}
