use serde::{Deserialize, Serialize};

use super::de_nullable;

/// One page of a paged listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Pager<T> {
    /// Current page, starting at 1.
    pub page: u32,
    pub size: u32,
    #[serde(default = "Vec::new", deserialize_with = "de_nullable")]
    pub data: Vec<T>,
    #[serde(default, deserialize_with = "de_nullable")]
    pub total_data: u64,
    #[serde(default, deserialize_with = "de_nullable")]
    pub total_page: u32,
}

impl<T> Pager<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_page
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Pager<U> {
        Pager {
            page: self.page,
            size: self.size,
            data: self.data.into_iter().map(f).collect(),
            total_data: self.total_data,
            total_page: self.total_page,
        }
    }
}
