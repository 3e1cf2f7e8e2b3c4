//! One open list screen: preset, engine and refresh state.

use std::fmt;

use backoffice_view::{
    ExportTable, FieldPath, FilterConfig, PageConfig, PageSize, ViewConfig, ViewEngine, ViewResult,
};
use serde_json::Value as Json;
use tracing::{debug, warn};

use crate::collection::{records_from_payload, ID_FIELD};
use crate::config::ConsoleConfig;
use crate::error::Result;
use crate::refresh::{RefreshGate, Ticket};
use crate::screens::{Screen, ScreenPreset};

/// What happened to a completed refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The collection was replaced.
    Applied { records: usize },
    /// A newer refresh had started; the result was dropped.
    Stale,
    /// The fetch failed; the previous collection is still shown.
    Failed(String),
}

/// A list screen bound to its collection.
#[derive(Debug, Clone)]
pub struct ScreenView {
    preset: ScreenPreset,
    engine: ViewEngine<Json>,
    gate: RefreshGate,
}

impl ScreenView {
    /// Opens `screen` empty, with its preset sort and the configured page size.
    pub fn open(screen: Screen, config: &ConsoleConfig) -> Result<Self> {
        let preset = screen.preset()?;
        let sort = config
            .sort_for(screen)
            .cloned()
            .unwrap_or_else(|| preset.default_sort.clone());
        let view_config = ViewConfig {
            filter: FilterConfig::default(),
            sort,
            page: PageConfig::new(config.page_size_for(screen)),
        };
        Ok(ScreenView::with_config(preset, view_config))
    }

    /// Opens a preset with an explicit view configuration.
    pub fn with_config(preset: ScreenPreset, config: ViewConfig) -> Self {
        let engine = ViewEngine::with_config(Vec::new(), preset.search_paths.clone(), config);
        ScreenView {
            preset,
            engine,
            gate: RefreshGate::new(),
        }
    }

    // ========================================================================
    // Refresh
    // ========================================================================

    /// Marks a fetch as started.
    pub fn begin_refresh(&mut self) -> Ticket {
        let ticket = self.gate.begin();
        debug!(screen = %self.preset.screen, ticket = ticket.seq(), "refresh started");
        ticket
    }

    /// Applies a fetch result if `ticket` is still the latest.
    pub fn finish_refresh<E: fmt::Display>(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<Json, E>,
    ) -> RefreshOutcome {
        if !self.gate.admit(ticket) {
            return RefreshOutcome::Stale;
        }
        let records = match result
            .map_err(|e| e.to_string())
            .and_then(|payload| records_from_payload(payload).map_err(|e| e.to_string()))
        {
            Ok(records) => records,
            Err(message) => {
                warn!(screen = %self.preset.screen, error = %message, "refresh failed");
                self.gate.failed(message.clone());
                return RefreshOutcome::Failed(message);
            }
        };
        RefreshOutcome::Applied {
            records: self.apply(records),
        }
    }

    /// Loads an already-fetched payload, failing on a malformed one.
    ///
    /// A successful load counts as the newest refresh: tickets from earlier
    /// [`begin_refresh`](Self::begin_refresh) calls go stale and their
    /// results are dropped.
    pub fn load(&mut self, payload: Json) -> Result<usize> {
        let records = records_from_payload(payload)?;
        let ticket = self.gate.begin();
        let admitted = self.gate.admit(ticket);
        debug_assert!(admitted, "a ticket just issued is always current");
        Ok(self.apply(records))
    }

    fn apply(&mut self, records: Vec<Json>) -> usize {
        let count = records.len();
        self.engine.replace_collection(records);
        self.gate.succeeded();
        debug!(screen = %self.preset.screen, records = count, "collection replaced");
        count
    }

    /// Returns `true` while a refresh is outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.gate.is_pending()
    }

    /// Error of the last failed refresh, for a retry prompt.
    pub fn last_error(&self) -> Option<&str> {
        self.gate.last_error()
    }

    // ========================================================================
    // Local patches
    // ========================================================================

    /// Inserts or replaces the record with the same `id` after a create or
    /// update is acknowledged. New records go first.
    pub fn upsert(&mut self, record: Json) {
        let mut records = self.engine.records().to_vec();
        let id = record.get(ID_FIELD).cloned();
        match id.and_then(|id| records.iter().position(|r| r.get(ID_FIELD) == Some(&id))) {
            Some(pos) => records[pos] = record,
            None => records.insert(0, record),
        }
        self.engine.replace_collection(records);
    }

    /// Drops the record with `id` after a delete is acknowledged.
    ///
    /// Returns `false` if no record had that id.
    pub fn remove(&mut self, id: &Json) -> bool {
        let mut records = self.engine.records().to_vec();
        let before = records.len();
        records.retain(|r| r.get(ID_FIELD) != Some(id));
        if records.len() == before {
            return false;
        }
        self.engine.replace_collection(records);
        true
    }

    // ========================================================================
    // View
    // ========================================================================

    /// Column-header click: toggles sort using the column's declared kind.
    pub fn sort_by_column(&mut self, path: FieldPath) {
        let kind = self.preset.kind_of(&path);
        self.engine.toggle_sort(path, kind);
    }

    /// Changes the page size.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.engine.set_page_size(size);
    }

    /// Current page.
    pub fn view(&self) -> ViewResult<'_, Json> {
        self.engine.view()
    }

    /// Every filtered and sorted row through the preset's export columns.
    pub fn export_table(&self) -> ExportTable {
        self.engine.export(&self.preset.export)
    }

    /// Dropdown options for every facet of the screen.
    pub fn facet_options(&self) -> Vec<(FieldPath, Vec<String>)> {
        self.preset
            .facets
            .iter()
            .map(|path| (path.clone(), self.engine.facet_options(path)))
            .collect()
    }

    pub fn preset(&self) -> &ScreenPreset {
        &self.preset
    }

    pub fn engine(&self) -> &ViewEngine<Json> {
        &self.engine
    }

    /// Mutable engine access for filter, sort and paging changes.
    pub fn engine_mut(&mut self) -> &mut ViewEngine<Json> {
        &mut self.engine
    }
}
