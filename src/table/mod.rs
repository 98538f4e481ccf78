// table/mod.rs - In-memory list views
//
// A declarative TableConfig plus a row collection feed DataTableState, which
// derives the filtered, sorted and paginated views. DataTable renders those
// views through a column list into a serializable TableView.

pub mod collate;
pub mod column;
pub mod pipeline;
pub mod query;
pub mod render;
pub mod row;
pub mod state;
pub mod types;

pub use column::{ActionButton, ActionColumn, ActionKind, Cell, Column, DataColumn, Tone};
pub use query::{TableQuery, TableQueryError};
pub use render::{DataTable, DataTableProps, EmptyState, TableIntent, TableView};
pub use row::TableRow;
pub use state::DataTableState;
pub use types::{FilterField, FilterKind, FilterState, FilterValue, SelectOption, SortDirection, SortState, TableConfig};
