use std::collections::BTreeMap;

/// Largest page size the backend accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Canonical request descriptor for one page of a list.
///
/// `page` is 1-based (the wire convention). UI code works with 0-based page
/// indices and converts through [`ListQuery::build`] and
/// [`ListQuery::page_index`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    page: u32,
    page_size: u32,
    filters: BTreeMap<String, String>,
}

impl ListQuery {
    /// Build a query from a 0-based page index, a page size and raw filter
    /// values.
    ///
    /// Filter entries whose value is `None`, empty or whitespace only are
    /// dropped, as are entries with a blank key. Keys and values are trimmed.
    /// The page size is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn build<I, K, V>(page_index: u32, page_size: u32, filters: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let filters = filters
            .into_iter()
            .filter_map(|(key, value)| {
                let key = key.as_ref().trim();
                let value = value?;
                let value = value.as_ref().trim();
                if key.is_empty() || value.is_empty() {
                    None
                } else {
                    Some((key.to_string(), value.to_string()))
                }
            })
            .collect();

        Self {
            page: page_index.saturating_add(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            filters,
        }
    }

    /// First page with no filters.
    pub fn first_page(page_size: u32) -> Self {
        Self::build(0, page_size, std::iter::empty::<(&str, Option<&str>)>())
    }

    /// 1-based page number, as sent to the backend.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// 0-based page index, as used by UI counters.
    pub fn page_index(&self) -> u32 {
        self.page - 1
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Non-empty filters in key order.
    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Number of records skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_index()) * u64::from(self.page_size)
    }

    /// Number of pages needed to show `total` records, never less than one.
    pub fn page_count(&self, total: u64) -> u32 {
        let pages = total.div_ceil(u64::from(self.page_size)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn with_page_index(&self, page_index: u32) -> Self {
        Self::build(page_index, self.page_size, self.filter_entries())
    }

    /// Change the page size and go back to the first page.
    pub fn with_page_size(&self, page_size: u32) -> Self {
        Self::build(0, page_size, self.filter_entries())
    }

    /// Set or clear one filter and go back to the first page.
    pub fn with_filter(&self, key: &str, value: Option<&str>) -> Self {
        let mut entries: Vec<(String, Option<String>)> = self
            .filters
            .iter()
            .filter(|(existing, _)| existing.as_str() != key.trim())
            .map(|(k, v)| (k.clone(), Some(v.clone())))
            .collect();
        entries.push((key.to_string(), value.map(str::to_string)));
        Self::build(0, self.page_size, entries)
    }

    /// Drop every filter and go back to the first page.
    pub fn without_filters(&self) -> Self {
        Self::first_page(self.page_size)
    }

    fn filter_entries(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.filters
            .iter()
            .map(|(k, v)| (k.as_str(), Some(v.as_str())))
    }
}
