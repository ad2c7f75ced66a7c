//! Paging parameters for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size when the client does not ask for one.
pub const DEFAULT_LIMIT: u32 = 50;

/// Upper bound on client-requested page sizes.
pub const MAX_LIMIT: u32 = 200;

/// Page/limit pair supplied by clients and echoed back with the total count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub page: u32,

    #[serde(default)]
    pub limit: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl Paging {
    /// Clamps the parameters into their valid ranges.
    pub fn normalize(&mut self) {
        if self.page == 0 {
            self.page = 1;
        }
        if self.limit == 0 {
            self.limit = DEFAULT_LIMIT;
        }
        if self.limit > MAX_LIMIT {
            self.limit = MAX_LIMIT;
        }
    }

    /// Zero-based offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * (self.limit as usize)
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            total: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_fills_defaults() {
        let mut paging = Paging {
            page: 0,
            limit: 0,
            total: None,
        };
        paging.normalize();
        assert_eq!(paging.page, 1);
        assert_eq!(paging.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_normalize_clamps_limit() {
        let mut paging = Paging {
            page: 2,
            limit: 10_000,
            total: None,
        };
        paging.normalize();
        assert_eq!(paging.limit, MAX_LIMIT);
    }

    #[test]
    fn test_offset() {
        let paging = Paging {
            page: 3,
            limit: 20,
            total: None,
        };
        assert_eq!(paging.offset(), 40);
    }
}
