//! Tabular view engine for back-office list screens.
//!
//! Every list screen of the console (users, accounts, deposits, orders, …)
//! shows an in-memory collection through the same pipeline:
//!
//! ```text
//! records ─▶ facets ∧ search ─▶ stable sort ─▶ page window ─▶ visible rows
//!                                    │
//!                                    └─▶ export (all filtered rows, sorted)
//! ```
//!
//! The engine performs no I/O. Callers hand it an already-fetched
//! collection and read back a [`ViewResult`] or an [`ExportTable`].
//!
//! # Quick Start
//!
//! ```rust
//! use backoffice_view::{
//!     ExportSpec, FieldPath, SortConfig, SortKey, ValueKind, ViewEngine,
//! };
//! use serde_json::json;
//!
//! let p = |s: &str| FieldPath::parse(s).unwrap();
//!
//! let deposits = vec![
//!     json!({"id": 1, "amount": "10.00", "user": {"email": "ann@example.com"}}),
//!     json!({"id": 2, "amount": "2.50",  "user": {"email": "bob@example.com"}}),
//!     json!({"id": 3, "amount": "10.00", "user": null}),
//! ];
//!
//! let mut engine = ViewEngine::new(deposits, vec![p("user.email")]);
//! engine.set_sort(SortConfig::by(SortKey::asc(p("amount"), ValueKind::Number)));
//!
//! let view = engine.view();
//! let ids: Vec<_> = view.visible_rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
//! assert_eq!(ids, [2, 1, 3]);
//!
//! let spec = ExportSpec::new().column("Email", p("user.email"));
//! let table = engine.export(&spec);
//! assert_eq!(table.rows[2], [""]);
//! ```
//!
//! # Semantics
//!
//! - **Search** is case-insensitive substring match over any search field.
//! - **Facets** are exact, case-sensitive equality; `"all"` lifts a facet.
//!   Search and facets combine with AND.
//! - **Sort** is stable and type-aware. Each key declares a [`ValueKind`];
//!   missing or malformed values coerce to `0`, the epoch, or `""`.
//! - **Paging** clamps the current page on every recomputation, so a
//!   shrinking result never shows an empty page unless nothing matches.

mod accessor;
mod engine;
mod error;
mod export;
mod facet;
mod filter;
mod ordering;
mod paginate;
mod path;
mod search;
mod value;

// Re-export public API
pub use accessor::{resolve, FieldSource};
pub use engine::{Reconfigure, ViewConfig, ViewEngine, ViewResult};
pub use error::{Result, ViewError};
pub use export::{export, ExportColumn, ExportSpec, ExportTable};
pub use facet::{matches_facets, FacetFilter, FacetValue, Facets, ALL};
pub use filter::{filter_indices, FilterConfig};
pub use ordering::{sort_indices, Direction, SortConfig, SortKey, SortValue, ValueKind};
pub use paginate::{clamp_page, paginate, total_pages, Page, PageConfig, PageSize};
pub use path::FieldPath;
pub use search::{matches_search, SearchPredicate};
pub use value::{Timestamp, Value};
