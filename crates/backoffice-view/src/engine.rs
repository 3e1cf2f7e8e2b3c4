//! The view engine: filter, sort and page one collection.
//!
//! [`ViewEngine`] owns a screen's collection and its view configuration.
//! Every reconfiguration reruns the whole pipeline synchronously
//! (filter → sort → paginate) and swaps in the new derived state; there is
//! no incremental update and no cached delta.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::accessor::FieldSource;
use crate::export::{export, ExportSpec, ExportTable};
use crate::facet::FacetValue;
use crate::filter::{filter_indices, FilterConfig};
use crate::ordering::{sort_indices, SortConfig, ValueKind};
use crate::paginate::{paginate, Page, PageConfig, PageSize};
use crate::path::FieldPath;

/// Complete view configuration of a list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Search query and facets.
    pub filter: FilterConfig,
    /// Sort keys.
    pub sort: SortConfig,
    /// Page size and requested page.
    pub page: PageConfig,
}

/// One configuration change.
#[derive(Debug, Clone)]
pub enum Reconfigure<R> {
    /// New search/facet state. Returns to page 1.
    Filter(FilterConfig),
    /// New sort keys. Returns to page 1.
    Sort(SortConfig),
    /// New paging. A page size change returns to page 1.
    Page(PageConfig),
    /// Wholesale collection replacement. Keeps the page, clamped.
    Collection(Vec<R>),
}

/// The derived, paginated output for the current configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewResult<'a, R> {
    /// Records on the current page, in view order.
    pub visible_rows: Vec<&'a R>,
    /// Number of records passing the filter.
    pub filtered_sorted_count: usize,
    /// Page count for the filtered set, at least 1.
    pub total_pages: usize,
    /// Current page, 1-based, always in `1..=total_pages`.
    pub current_page: usize,
}

/// Search, facet, sort and paging over one in-memory collection.
///
/// # Example
///
/// ```
/// use backoffice_view::{FacetValue, FieldPath, ViewEngine};
/// use serde_json::json;
///
/// let users = (0..12)
///     .map(|i| json!({"id": i, "status": if i < 5 { "active" } else { "inactive" }}))
///     .collect();
///
/// let mut engine = ViewEngine::new(users, vec![FieldPath::parse("id").unwrap()]);
/// engine.set_facet(FieldPath::parse("status").unwrap(), FacetValue::equals("active"));
///
/// let view = engine.view();
/// assert_eq!(view.filtered_sorted_count, 5);
/// assert_eq!(view.total_pages, 1);
/// assert_eq!(view.visible_rows.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct ViewEngine<R> {
    records: Vec<R>,
    search_paths: Vec<FieldPath>,
    config: ViewConfig,
    // Derived state, replaced together by `recompute`.
    ordered: Vec<usize>,
    total_pages: usize,
}

impl<R: FieldSource> ViewEngine<R> {
    /// Creates an engine with default configuration.
    ///
    /// `search_paths` are the fields the search box looks in.
    pub fn new(records: Vec<R>, search_paths: Vec<FieldPath>) -> Self {
        ViewEngine::with_config(records, search_paths, ViewConfig::default())
    }

    /// Creates an engine with an initial configuration.
    pub fn with_config(records: Vec<R>, search_paths: Vec<FieldPath>, config: ViewConfig) -> Self {
        let mut engine = ViewEngine {
            records,
            search_paths,
            config,
            ordered: Vec::new(),
            total_pages: 1,
        };
        engine.recompute();
        engine
    }

    // ========================================================================
    // Reconfiguration
    // ========================================================================

    /// Applies one change and recomputes the view.
    pub fn reconfigure(&mut self, change: Reconfigure<R>) {
        match change {
            Reconfigure::Filter(filter) => {
                self.config.filter = filter;
                self.config.page.current_page = 1;
            }
            Reconfigure::Sort(sort) => {
                self.config.sort = sort;
                self.config.page.current_page = 1;
            }
            Reconfigure::Page(page) => {
                if page.page_size != self.config.page.page_size {
                    self.config.page = PageConfig::new(page.page_size);
                } else {
                    self.config.page = page;
                }
            }
            Reconfigure::Collection(records) => {
                self.records = records;
            }
        }
        self.recompute();
    }

    /// Replaces the whole filter.
    pub fn set_filter(&mut self, filter: FilterConfig) {
        self.reconfigure(Reconfigure::Filter(filter));
    }

    /// Sets the search query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let filter = FilterConfig {
            query: query.into(),
            ..self.config.filter.clone()
        };
        self.set_filter(filter);
    }

    /// Sets one facet. [`FacetValue::All`] lifts the constraint.
    pub fn set_facet(&mut self, path: FieldPath, value: impl Into<FacetValue>) {
        let filter = self.config.filter.clone().facet(path, value);
        self.set_filter(filter);
    }

    /// Removes one facet entirely.
    pub fn clear_facet(&mut self, path: &FieldPath) {
        let mut filter = self.config.filter.clone();
        filter.facets.remove(path);
        self.set_filter(filter);
    }

    /// Replaces the sort keys.
    pub fn set_sort(&mut self, sort: SortConfig) {
        self.reconfigure(Reconfigure::Sort(sort));
    }

    /// Column-header click on `field`.
    ///
    /// See [`SortConfig::toggle`].
    pub fn toggle_sort(&mut self, field: FieldPath, kind: ValueKind) {
        let mut sort = self.config.sort.clone();
        sort.toggle(field, kind);
        self.set_sort(sort);
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.reconfigure(Reconfigure::Page(PageConfig::new(page_size)));
    }

    /// Requests a page; out-of-range requests are clamped.
    pub fn set_page(&mut self, page: usize) {
        let config = self.config.page.at(page);
        self.reconfigure(Reconfigure::Page(config));
    }

    /// Replaces the collection, keeping the configuration.
    pub fn replace_collection(&mut self, records: Vec<R>) {
        self.reconfigure(Reconfigure::Collection(records));
    }

    fn recompute(&mut self) {
        let mut ordered = filter_indices(&self.records, &self.config.filter, &self.search_paths);
        trace!(
            total = self.records.len(),
            filtered = ordered.len(),
            "filter applied"
        );
        sort_indices(&self.records, &mut ordered, &self.config.sort);

        let requested = self.config.page.current_page;
        let page = paginate(&ordered, &self.config.page);
        if page.current_page != requested {
            debug!(requested, current = page.current_page, "page clamped");
        }

        self.total_pages = page.total_pages;
        self.config.page.current_page = page.current_page;
        self.ordered = ordered;

        debug!(
            total = self.records.len(),
            filtered = self.ordered.len(),
            page = self.config.page.current_page,
            pages = self.total_pages,
            page_size = self.config.page.page_size.get(),
            "view recomputed"
        );
    }

    // ========================================================================
    // Derived output
    // ========================================================================

    /// Returns the current page and counts.
    pub fn view(&self) -> ViewResult<'_, R> {
        ViewResult {
            visible_rows: self.window().rows.iter().map(|&i| &self.records[i]).collect(),
            filtered_sorted_count: self.ordered.len(),
            total_pages: self.total_pages,
            current_page: self.config.page.current_page,
        }
    }

    /// Iterates the full filtered and sorted sequence, ignoring paging.
    pub fn filtered_sorted(&self) -> impl Iterator<Item = &R> + '_ {
        self.ordered.iter().map(move |&i| &self.records[i])
    }

    /// Exports the full filtered and sorted sequence.
    pub fn export(&self, spec: &ExportSpec) -> ExportTable {
        let table = export(self.filtered_sorted(), spec);
        debug!(rows = table.len(), columns = table.headers.len(), "export built");
        table
    }

    /// Distinct text values of `path` across the whole collection, sorted.
    ///
    /// Used to populate facet dropdowns. Missing values are skipped.
    pub fn facet_options(&self, path: &FieldPath) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.resolve(path))
            .filter(|value| !value.is_missing())
            .map(|value| value.to_text().into_owned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 1-based `(first, last, total)` rows of the current page.
    ///
    /// `(0, 0, 0)` when nothing matches.
    pub fn showing(&self) -> (usize, usize, usize) {
        let page = self.window();
        if page.rows.is_empty() {
            return (0, 0, 0);
        }
        (page.offset + 1, page.offset + page.rows.len(), self.ordered.len())
    }

    fn window(&self) -> Page<'_, usize> {
        paginate(&self.ordered, &self.config.page)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The raw collection, in input order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Fields searched by the query.
    pub fn search_paths(&self) -> &[FieldPath] {
        &self.search_paths
    }

    /// Current configuration, with the page already clamped.
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Current filter.
    pub fn filter(&self) -> &FilterConfig {
        &self.config.filter
    }

    /// Current sort.
    pub fn sort(&self) -> &SortConfig {
        &self.config.sort
    }

    /// Current paging, with the page already clamped.
    pub fn page(&self) -> &PageConfig {
        &self.config.page
    }
}
