use serde::Serialize;
use serde_json::Value;

use super::row::{is_truthy, stringify, TableRow};

/// Placeholder shown for empty data cells.
pub const EMPTY_CELL: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    View,
    Edit,
    Delete,
    Restore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionButton {
    pub kind: ActionKind,
    pub label: String,
    pub method: &'static str,
    pub href: String,
}

/// Rendered content of one table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Cell {
    Text { text: String },
    Link { label: String, href: String },
    Badge { label: String, tone: Tone },
    Actions { actions: Vec<ActionButton> },
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Cell::Text { text: text.into() }
    }

    pub fn badge(label: impl Into<String>, tone: Tone) -> Self {
        Cell::Badge {
            label: label.into(),
            tone,
        }
    }

    /// Plain text of the cell, as printed by text renderers.
    pub fn plain(&self) -> String {
        match self {
            Cell::Text { text } => text.clone(),
            Cell::Link { label, .. } | Cell::Badge { label, .. } => label.clone(),
            Cell::Actions { actions } => actions.iter().map(|a| a.label.as_str()).collect::<Vec<_>>().join(" | "),
        }
    }
}

pub type ValueRenderer<R> = Box<dyn Fn(Option<&Value>, &R) -> Cell + Send + Sync>;
pub type RowRenderer<R> = Box<dyn Fn(&R) -> Cell + Send + Sync>;

/// Column bound to a field of the row.
pub struct DataColumn<R> {
    pub key: String,
    pub header: String,
    pub sortable: bool,
    render: Option<ValueRenderer<R>>,
}

impl<R: TableRow> DataColumn<R> {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            sortable: false,
            render: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(Option<&Value>, &R) -> Cell + Send + Sync + 'static,
    {
        self.render = Some(Box::new(render));
        self
    }

    pub fn cell(&self, row: &R) -> Cell {
        let value = row.field(&self.key);
        match &self.render {
            Some(render) => render(value, row),
            None if is_truthy(value) => Cell::text(value.and_then(stringify).unwrap_or_default()),
            None => Cell::text(EMPTY_CELL),
        }
    }
}

/// Column with no backing field; the renderer builds the whole cell from the row.
pub struct ActionColumn<R> {
    pub key: String,
    pub header: String,
    render: RowRenderer<R>,
}

impl<R> ActionColumn<R> {
    pub fn new<F>(key: impl Into<String>, header: impl Into<String>, render: F) -> Self
    where
        F: Fn(&R) -> Cell + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            header: header.into(),
            render: Box::new(render),
        }
    }

    pub fn cell(&self, row: &R) -> Cell {
        (self.render)(row)
    }
}

pub enum Column<R> {
    Data(DataColumn<R>),
    Action(ActionColumn<R>),
}

impl<R: TableRow> Column<R> {
    pub fn key(&self) -> &str {
        match self {
            Column::Data(c) => &c.key,
            Column::Action(c) => &c.key,
        }
    }

    pub fn header(&self) -> &str {
        match self {
            Column::Data(c) => &c.header,
            Column::Action(c) => &c.header,
        }
    }

    /// Only data columns can ask the engine to sort.
    pub fn is_sortable(&self) -> bool {
        matches!(self, Column::Data(c) if c.sortable)
    }

    pub fn cell(&self, row: &R) -> Cell {
        match self {
            Column::Data(c) => c.cell(row),
            Column::Action(c) => c.cell(row),
        }
    }
}

impl<R> From<DataColumn<R>> for Column<R> {
    fn from(column: DataColumn<R>) -> Self {
        Column::Data(column)
    }
}

impl<R> From<ActionColumn<R>> for Column<R> {
    fn from(column: ActionColumn<R>) -> Self {
        Column::Action(column)
    }
}

impl<R> std::fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Column::Data(c) => f
                .debug_struct("DataColumn")
                .field("key", &c.key)
                .field("sortable", &c.sortable)
                .field("custom_render", &c.render.is_some())
                .finish(),
            Column::Action(c) => f.debug_struct("ActionColumn").field("key", &c.key).finish_non_exhaustive(),
        }
    }
}
