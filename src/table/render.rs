//! View model for a data table.
//!
//! [`DataTable::render`] turns column definitions plus an engine into a
//! serializable [`TableView`]. User intents come back as [`TableIntent`]s and
//! are routed into the engine's setters by [`DataTable::dispatch`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::column::{Cell, Column};
use super::pipeline;
use super::row::TableRow;
use super::state::DataTableState;
use super::types::{FilterKind, FilterValue, SelectOption, SortDirection, ALL};

pub const DEFAULT_PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];
pub const DEFAULT_EMPTY_TITLE: &str = "No results";
pub const DEFAULT_EMPTY_DESCRIPTION: &str = "Try adjusting your search or filters.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkButton {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub title: String,
    pub description: String,
    pub action: Option<LinkButton>,
}

impl Default for EmptyState {
    fn default() -> Self {
        Self {
            title: DEFAULT_EMPTY_TITLE.to_string(),
            description: DEFAULT_EMPTY_DESCRIPTION.to_string(),
            action: None,
        }
    }
}

pub struct DataTableProps<R> {
    pub title: Option<String>,
    pub columns: Vec<Column<R>>,
    /// Target of the add button; no button without it.
    pub on_add: Option<String>,
    pub add_label: Option<String>,
    pub empty_state: Option<EmptyState>,
    pub page_sizes: Vec<usize>,
}

impl<R> DataTableProps<R> {
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self {
            title: None,
            columns,
            on_add: None,
            add_label: None,
            empty_state: None,
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn on_add(mut self, href: impl Into<String>, label: impl Into<String>) -> Self {
        self.on_add = Some(href.into());
        self.add_label = Some(label.into());
        self
    }

    pub fn empty_state(mut self, empty_state: EmptyState) -> Self {
        self.empty_state = Some(empty_state);
        self
    }

    pub fn page_sizes(mut self, page_sizes: Vec<usize>) -> Self {
        if !page_sizes.is_empty() {
            self.page_sizes = page_sizes;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchBox {
    pub value: String,
    pub show_clear: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterControl {
    Select {
        key: String,
        label: String,
        value: String,
        options: Vec<SelectOption>,
    },
    Switch {
        key: String,
        label: String,
        checked: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    /// Set only on the active sort column.
    pub sort_indicator: Option<SortDirection>,
    /// Direction a click would produce.
    pub next_sort: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TableBody {
    Rows { rows: Vec<RowView> },
    Empty { empty: EmptyState },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pager {
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub from: usize,
    pub to: usize,
    pub summary: String,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page: Option<usize>,
    pub next_page: Option<usize>,
    pub page_sizes: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub title: Option<String>,
    pub add_button: Option<LinkButton>,
    pub search: SearchBox,
    pub filters: Vec<FilterControl>,
    pub header: Vec<HeaderCell>,
    pub body: TableBody,
    pub pager: Option<Pager>,
}

impl TableView {
    pub fn rows(&self) -> &[RowView] {
        match &self.body {
            TableBody::Rows { rows } => rows,
            TableBody::Empty { .. } => &[],
        }
    }
}

/// User intent coming back from a rendered table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum TableIntent {
    Sort { column: String },
    Search { text: String },
    ClearSearch,
    Filter { key: String, value: FilterValue },
    Page { page: usize },
    PageSize { page_size: usize },
}

pub struct DataTable;

impl DataTable {
    pub fn render<R: TableRow>(props: &DataTableProps<R>, state: &DataTableState<R>) -> TableView {
        let config = state.config();
        let sort = state.sort();

        let filters = config
            .filter_fields
            .iter()
            .map(|field| {
                let current = state.filters().get(&field.key);
                match &field.kind {
                    FilterKind::Select { options } => {
                        let mut with_all = Vec::with_capacity(options.len() + 1);
                        with_all.push(SelectOption::new(ALL, "All"));
                        with_all.extend(options.iter().cloned());
                        FilterControl::Select {
                            key: field.key.clone(),
                            label: field.label.clone(),
                            value: current.map(|v| v.to_filter_string()).unwrap_or_else(|| ALL.to_string()),
                            options: with_all,
                        }
                    }
                    FilterKind::Switch => FilterControl::Switch {
                        key: field.key.clone(),
                        label: field.label.clone(),
                        checked: current == Some(FilterValue::Switch(true)),
                    },
                }
            })
            .collect();

        let header = props
            .columns
            .iter()
            .map(|column| {
                let sortable = column.is_sortable();
                let active = sortable && sort.is_active(column.key());
                HeaderCell {
                    key: column.key().to_string(),
                    label: column.header().to_string(),
                    sortable,
                    sort_indicator: active.then_some(sort.direction),
                    next_sort: sortable.then(|| if active { sort.direction.toggle() } else { SortDirection::Asc }),
                }
            })
            .collect();

        let page = state.paginated_data();
        let body = if page.is_empty() {
            TableBody::Empty {
                empty: props.empty_state.clone().unwrap_or_default(),
            }
        } else {
            TableBody::Rows {
                rows: page
                    .into_iter()
                    .map(|row| RowView {
                        cells: props.columns.iter().map(|column| column.cell(row)).collect(),
                    })
                    .collect(),
            }
        };

        TableView {
            title: props.title.clone(),
            add_button: props.on_add.as_ref().map(|href| LinkButton {
                label: props.add_label.clone().unwrap_or_else(|| "Add".to_string()),
                href: href.clone(),
            }),
            search: SearchBox {
                value: state.search().to_string(),
                show_clear: !state.search().is_empty(),
            },
            filters,
            header,
            body,
            pager: Self::pager(props, state),
        }
    }

    fn pager<R: TableRow>(props: &DataTableProps<R>, state: &DataTableState<R>) -> Option<Pager> {
        let total_pages = state.total_pages();
        if total_pages <= 1 {
            return None;
        }
        let current_page = state.current_page();
        let page_size = state.page_size();
        let total_items = state.total_items();
        // past the last page the window is empty: "Showing 0–0 of N"
        let window = pipeline::page_bounds(total_items, current_page, page_size);
        let from = if window.is_empty() { 0 } else { window.start + 1 };
        let to = window.end;
        let has_previous = current_page > 1;
        let has_next = current_page < total_pages;

        Some(Pager {
            current_page,
            total_pages,
            page_size,
            total_items,
            from,
            to,
            summary: format!("Showing {}–{} of {}", from, to, total_items),
            has_previous,
            has_next,
            previous_page: has_previous.then(|| (current_page - 1).min(total_pages)),
            next_page: has_next.then(|| current_page + 1),
            page_sizes: props.page_sizes.clone(),
        })
    }

    /// Applies `intent` to the engine. Returns false when the intent was ignored.
    pub fn dispatch<R: TableRow>(props: &DataTableProps<R>, state: &mut DataTableState<R>, intent: TableIntent) -> bool {
        debug!(?intent, "table intent");
        match intent {
            TableIntent::Sort { column } => {
                let sortable = props.columns.iter().any(|c| c.key() == column && c.is_sortable());
                if !sortable {
                    return false;
                }
                state.set_sort(column);
            }
            TableIntent::Search { text } => state.set_search(text),
            TableIntent::ClearSearch => state.set_search(""),
            TableIntent::Filter { key, value } => state.set_filters([(key, value)]),
            TableIntent::Page { page } => state.set_current_page(page),
            TableIntent::PageSize { page_size } => state.set_page_size(page_size),
        }
        true
    }
}
