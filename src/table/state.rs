use tracing::trace;

use super::pipeline::{self, active_filters, compare_rows, matches_filters, matches_search};
use super::row::TableRow;
use super::types::{FilterState, FilterValue, SortState, TableConfig};

/// Client-side table state over an in-memory row collection.
///
/// Inputs are the rows, the config and the current search/filter/sort/page
/// values. Derived views (filtered, sorted, paginated) are recomputed after
/// every mutation, so reads are cheap and always consistent with the inputs.
#[derive(Debug, Clone)]
pub struct DataTableState<R> {
    data: Vec<R>,
    config: TableConfig,
    filters: FilterState,
    sort: SortState,
    current_page: usize,
    page_size: usize,
    /// Indices into `data` that passed search and filters, in insertion order.
    filtered: Vec<usize>,
    /// `filtered` after sorting.
    sorted: Vec<usize>,
}

impl<R: TableRow> DataTableState<R> {
    pub fn new(data: Vec<R>, config: TableConfig) -> Self {
        let mut state = Self {
            data,
            filters: FilterState::seeded(),
            sort: SortState::default(),
            current_page: 1,
            page_size: config.starting_page_size(),
            config,
            filtered: Vec::new(),
            sorted: Vec::new(),
        };
        state.apply_initial();
        state.recompute();
        state
    }

    fn apply_initial(&mut self) {
        self.filters = FilterState::seeded();
        self.filters.merge(self.config.initial_filters.clone());
        self.sort = self.config.starting_sort();
        self.current_page = 1;
        self.page_size = self.config.starting_page_size();
    }

    /// Replaces the row collection after the caller refetched it.
    pub fn set_data(&mut self, data: Vec<R>) {
        trace!(rows = data.len(), "table data replaced");
        self.data = data;
        self.recompute();
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filters.search = text.into();
        trace!(search = %self.filters.search, "table search changed");
        self.current_page = 1;
        self.recompute();
    }

    pub fn set_filters<I>(&mut self, patch: I)
    where
        I: IntoIterator<Item = (String, FilterValue)>,
    {
        self.filters.merge(patch);
        trace!(filters = ?self.filters, "table filters changed");
        self.current_page = 1;
        self.recompute();
    }

    /// Same column flips the direction; a new column starts ascending.
    pub fn set_sort(&mut self, column: impl Into<String>) {
        let column = column.into();
        if self.sort.is_active(&column) {
            self.sort.direction = self.sort.direction.toggle();
        } else {
            self.sort = SortState::by(column, Default::default());
        }
        trace!(sort = ?self.sort, "table sort changed");
        self.current_page = 1;
        self.recompute();
    }

    /// Sets column and direction at once, e.g. when rebuilding state from a URL.
    pub fn set_sort_state(&mut self, sort: SortState) {
        self.sort = sort;
        trace!(sort = ?self.sort, "table sort replaced");
        self.current_page = 1;
        self.recompute();
    }

    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page.max(1);
        trace!(page = self.current_page, "table page changed");
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        trace!(page_size = self.page_size, "table page size changed");
        self.current_page = 1;
    }

    pub fn reset_state(&mut self) {
        self.apply_initial();
        trace!("table state reset");
        self.recompute();
    }

    fn recompute(&mut self) {
        let active = active_filters(&self.config.filter_fields, &self.filters);
        let search_fields = &self.config.search_fields;
        let search = &self.filters.search;

        self.filtered = self
            .data
            .iter()
            .enumerate()
            .filter(|(_, row)| matches_search(*row, search_fields, search) && matches_filters(*row, &active))
            .map(|(i, _)| i)
            .collect();

        let mut sorted = self.filtered.clone();
        if let Some(column) = self.sort.column.as_deref() {
            let direction = self.sort.direction;
            // stable: equal rows keep insertion order
            sorted.sort_by(|&a, &b| compare_rows(&self.data[a], &self.data[b], column, direction));
        }
        self.sorted = sorted;
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn data(&self) -> &[R] {
        &self.data
    }

    pub fn search(&self) -> &str {
        &self.filters.search
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn filtered_data(&self) -> Vec<&R> {
        self.filtered.iter().map(|&i| &self.data[i]).collect()
    }

    pub fn sorted_data(&self) -> Vec<&R> {
        self.sorted.iter().map(|&i| &self.data[i]).collect()
    }

    pub fn paginated_data(&self) -> Vec<&R> {
        pipeline::paginate(&self.sorted, self.current_page, self.page_size)
            .iter()
            .map(|&i| &self.data[i])
            .collect()
    }

    pub fn total_items(&self) -> usize {
        self.sorted.len()
    }

    pub fn total_pages(&self) -> usize {
        pipeline::total_pages(self.sorted.len(), self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::types::{FilterField, SortDirection};
    use crate::testing::{names, scenario_config, scenario_rows};
    use serde_json::json;

    #[test]
    fn scenario_search_matches_case_insensitively() {
        let mut state = DataTableState::new(scenario_rows(), scenario_config());
        state.set_search("a");
        assert_eq!(names(&state.filtered_data(), "n"), vec!["Ana", "Caro"]);
    }

    #[test]
    fn scenario_switch_filter_uses_direct_equality() {
        let mut state = DataTableState::new(scenario_rows(), scenario_config());
        state.set_filters([("d".to_string(), FilterValue::Switch(true))]);
        assert_eq!(names(&state.filtered_data(), "n"), vec!["Beto"]);

        state.set_filters([("d".to_string(), FilterValue::Switch(false))]);
        assert_eq!(names(&state.filtered_data(), "n"), vec!["Ana", "Caro"]);

        state.set_filters([("d".to_string(), FilterValue::All)]);
        assert_eq!(state.total_items(), 3);
    }

    #[test]
    fn scenario_last_page_holds_the_remainder() {
        let rows: Vec<_> = (1..=5).map(|i| json!({ "n": format!("row {}", i) })).collect();
        let mut state = DataTableState::new(rows, TableConfig::default());
        state.set_page_size(2);
        assert_eq!(state.total_pages(), 3);
        state.set_current_page(3);
        assert_eq!(state.paginated_data().len(), 1);
        assert_eq!(state.paginated_data()[0]["n"], "row 5");
    }

    #[test]
    fn scenario_repeated_sort_toggles_direction() {
        let mut state = DataTableState::new(scenario_rows(), scenario_config());
        assert_eq!(state.sort().column, None);

        state.set_sort("n");
        assert_eq!(state.sort(), &SortState::by("n", SortDirection::Asc));
        assert_eq!(names(&state.sorted_data(), "n"), vec!["Ana", "Beto", "Caro"]);

        state.set_sort("n");
        assert_eq!(state.sort().direction, SortDirection::Desc);
        assert_eq!(names(&state.sorted_data(), "n"), vec!["Caro", "Beto", "Ana"]);

        state.set_sort("d");
        assert_eq!(state.sort(), &SortState::by("d", SortDirection::Asc));
    }

    #[test]
    fn unsorted_keeps_insertion_order() {
        let state = DataTableState::new(scenario_rows(), scenario_config());
        assert_eq!(names(&state.sorted_data(), "n"), vec!["Ana", "Beto", "Caro"]);
    }

    #[test]
    fn every_input_change_returns_to_first_page() {
        let rows: Vec<_> = (0..40).map(|i| json!({ "n": format!("n{:02}", i), "d": i % 2 == 0 })).collect();
        let mut state = DataTableState::new(rows, scenario_config());

        state.set_current_page(3);
        state.set_search("n");
        assert_eq!(state.current_page(), 1);

        state.set_current_page(3);
        state.set_filters([("d".to_string(), FilterValue::Switch(true))]);
        assert_eq!(state.current_page(), 1);

        state.set_current_page(2);
        state.set_sort("n");
        assert_eq!(state.current_page(), 1);

        state.set_current_page(2);
        state.set_page_size(25);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn pagination_bounds_hold_for_any_page_size() {
        let rows: Vec<_> = (0..23).map(|i| json!({ "n": i })).collect();
        let mut state = DataTableState::new(rows, TableConfig::default());
        for size in 1..=30 {
            state.set_page_size(size);
            assert_eq!(state.total_pages(), state.total_items().div_ceil(size));
            for page in 1..=state.total_pages() + 1 {
                state.set_current_page(page);
                assert!(state.paginated_data().len() <= size);
            }
        }
    }

    #[test]
    fn reset_then_replay_is_deterministic() {
        let mut state = DataTableState::new(scenario_rows(), scenario_config());
        let replay = |state: &mut DataTableState<serde_json::Value>| {
            state.set_search("o");
            state.set_sort("n");
            state.set_sort("n");
            state.set_page_size(1);
            state.set_current_page(2);
            names(&state.paginated_data(), "n")
        };

        let first = replay(&mut state);
        state.reset_state();
        assert_eq!(state.search(), "");
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.sort().column, None);
        let second = replay(&mut state);

        assert_eq!(first, vec!["Beto"]);
        assert_eq!(first, second);
    }

    #[test]
    fn initial_values_come_from_config() {
        let config = TableConfig {
            filter_fields: vec![FilterField::switch("d", "Deleted")],
            initial_filters: [("d".to_string(), FilterValue::Switch(false))].into_iter().collect(),
            initial_sort: Some(SortState::by("n", SortDirection::Desc)),
            initial_page_size: Some(25),
            ..Default::default()
        };
        let mut state = DataTableState::new(scenario_rows(), config);
        assert_eq!(state.page_size(), 25);
        assert_eq!(names(&state.paginated_data(), "n"), vec!["Caro", "Ana"]);

        state.set_filters([("d".to_string(), FilterValue::All)]);
        state.set_page_size(2);
        state.reset_state();
        assert_eq!(state.page_size(), 25);
        assert_eq!(state.filters().get("d"), Some(FilterValue::Switch(false)));
    }

    #[test]
    fn set_data_recomputes_views() {
        let mut state = DataTableState::new(scenario_rows(), scenario_config());
        state.set_search("to");
        assert_eq!(state.total_items(), 1);

        state.set_data(vec![json!({ "n": "Roberto", "d": false }), json!({ "n": "Lucía", "d": false })]);
        assert_eq!(names(&state.filtered_data(), "n"), vec!["Roberto"]);
    }

    #[test]
    fn missing_config_fields_degrade_gracefully() {
        let config = TableConfig {
            search_fields: vec!["nope".into()],
            filter_fields: vec![FilterField::select("ghost", "Ghost", vec![])],
            ..Default::default()
        };
        let mut state = DataTableState::new(scenario_rows(), config);
        state.set_sort("nope");
        assert_eq!(state.total_items(), 3);

        state.set_search("ana");
        assert_eq!(state.total_items(), 0);

        state.set_search("");
        state.set_filters([("ghost".to_string(), FilterValue::Select("x".into()))]);
        assert_eq!(state.total_items(), 0);
        assert_eq!(state.total_pages(), 0);
    }

    #[test]
    fn zero_page_inputs_are_clamped() {
        let mut state = DataTableState::new(scenario_rows(), scenario_config());
        state.set_page_size(0);
        assert_eq!(state.page_size(), 1);
        state.set_current_page(0);
        assert_eq!(state.current_page(), 1);
    }
}
