//! Client-side search and pagination over the unpaginated stylist list.
//!
//! Legacy path kept for the directory view, which downloads every stylist
//! and slices locally. New screens should page on the server through
//! `ReviewQueue::fetch_paginated_stylists`.

use super::model::{PaginationMetadata, StylistRecord};

/// Search term, page and page size for the directory view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPager {
    pub search: String,
    pub page: u32,
    pub per_page: u32,
}

impl Default for LocalPager {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            per_page: 10,
        }
    }
}

/// A locally computed page.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPage<'a> {
    pub records: Vec<&'a StylistRecord>,
    pub pagination: PaginationMetadata,
}

impl LocalPager {
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page: per_page.max(1),
            ..Default::default()
        }
    }

    /// Change the search term; goes back to page 1.
    pub fn search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    fn matches(&self, record: &StylistRecord) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        record
            .name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&needle))
            || record.email.to_lowercase().contains(&needle)
            || record.specialization.to_lowercase().contains(&needle)
    }

    /// Filter then slice.
    pub fn apply<'a, I>(&self, records: I) -> LocalPage<'a>
    where
        I: IntoIterator<Item = &'a StylistRecord>,
    {
        let per_page = self.per_page.max(1);
        let page = self.page.max(1);
        let filtered: Vec<&StylistRecord> = records.into_iter().filter(|r| self.matches(r)).collect();

        let total_items = filtered.len() as u64;
        let total_pages = total_items.div_ceil(u64::from(per_page)) as u32;
        let start = (page as usize - 1) * per_page as usize;

        let records = filtered
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        LocalPage {
            records,
            pagination: PaginationMetadata {
                current_page: page,
                total_pages,
                total_items,
                items_per_page: per_page,
                has_next_page: page < total_pages,
                has_previous_page: page > 1,
            },
        }
    }
}
