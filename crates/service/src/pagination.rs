//! Page parameters for the uncached service listing.

use serde::Deserialize;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Query parameters as the client sends them (`?page=&per_page=`).
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// 1-based page number
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: DEFAULT_PER_PAGE } }
}

/// Clamped window handed to repositories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    /// 0-based
    pub index: u64,
    pub size: u64,
}

impl PageWindow {
    /// The 1-based page number echoed back in responses.
    pub fn number(&self) -> u32 {
        (self.index + 1) as u32
    }
}

impl Pagination {
    /// Page 0 reads as page 1; page size is kept within 1..=MAX_PER_PAGE.
    pub fn window(self) -> PageWindow {
        PageWindow {
            index: u64::from(self.page.max(1) - 1),
            size: u64::from(self.per_page.clamp(1, MAX_PER_PAGE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_page_and_size_are_clamped() {
        let w = Pagination { page: 0, per_page: 0 }.window();
        assert_eq!(w, PageWindow { index: 0, size: 1 });
        assert_eq!(w.number(), 1);
    }

    #[test]
    fn oversized_pages_are_capped() {
        let w = Pagination { page: 5, per_page: 1000 }.window();
        assert_eq!(w.index, 4);
        assert_eq!(w.size, u64::from(MAX_PER_PAGE));
    }

    #[test]
    fn missing_query_fields_default() {
        let p: Pagination = serde_json::from_str(r#"{"page": 3}"#).unwrap();
        assert_eq!(p.page, 3);
        assert_eq!(p.per_page, DEFAULT_PER_PAGE);
    }
}
