//! Page windowing over an ordered sequence.

use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};

/// Rows per page. Zero is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    /// The page sizes offered by list screens.
    pub const STANDARD: [usize; 4] = [10, 25, 50, 100];

    /// Ten rows.
    pub const DEFAULT: PageSize = match NonZeroUsize::new(10) {
        Some(n) => PageSize(n),
        None => panic!("default page size is zero"),
    };

    /// Creates a page size, rejecting zero.
    pub fn new(size: usize) -> Result<Self> {
        NonZeroUsize::new(size)
            .map(PageSize)
            .ok_or(ViewError::InvalidPageSize(size))
    }

    /// Returns the size as a plain count.
    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Returns `true` if this is one of [`PageSize::STANDARD`].
    pub fn is_standard(self) -> bool {
        PageSize::STANDARD.contains(&self.get())
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::DEFAULT
    }
}

impl TryFrom<usize> for PageSize {
    type Error = ViewError;

    fn try_from(size: usize) -> Result<Self> {
        PageSize::new(size)
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> usize {
        size.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Pagination state of a list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Rows per page.
    pub page_size: PageSize,
    /// Requested page, 1-based. Clamped on every recomputation.
    pub current_page: usize,
}

impl PageConfig {
    /// First page at the given size.
    pub fn new(page_size: PageSize) -> Self {
        PageConfig {
            page_size,
            current_page: 1,
        }
    }

    /// Sets the requested page.
    pub fn at(mut self, page: usize) -> Self {
        self.current_page = page;
        self
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig::new(PageSize::DEFAULT)
    }
}

/// The visible window of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Rows on the current page; a contiguous slice of the input.
    pub rows: &'a [T],
    /// Index of the first row of the page in the input.
    pub offset: usize,
    /// `ceil(len / page_size)`, at least 1.
    pub total_pages: usize,
    /// The requested page clamped into `1..=total_pages`.
    pub current_page: usize,
}

/// Number of pages for `len` rows, never less than 1.
pub fn total_pages(len: usize, page_size: PageSize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

/// Clamps a requested 1-based page into range for `len` rows.
pub fn clamp_page(requested: usize, len: usize, page_size: PageSize) -> usize {
    requested.clamp(1, total_pages(len, page_size))
}

/// Slices `sequence` to the page described by `config`.
///
/// The page is clamped first, so a shrunken sequence yields its last page
/// instead of an empty window. Only an empty sequence yields no rows.
///
/// # Example
///
/// ```
/// use backoffice_view::{paginate, PageConfig, PageSize};
///
/// let rows: Vec<u32> = (1..=23).collect();
/// let config = PageConfig::new(PageSize::new(10).unwrap()).at(5);
/// let page = paginate(&rows, &config);
/// assert_eq!(page.current_page, 3);
/// assert_eq!(page.rows, &[21, 22, 23]);
/// ```
pub fn paginate<'a, T>(sequence: &'a [T], config: &PageConfig) -> Page<'a, T> {
    let size = config.page_size.get();
    let total_pages = total_pages(sequence.len(), config.page_size);
    let current_page = config.current_page.clamp(1, total_pages);
    let start = ((current_page - 1) * size).min(sequence.len());
    let end = (start + size).min(sequence.len());
    Page {
        rows: &sequence[start..end],
        offset: start,
        total_pages,
        current_page,
    }
}
