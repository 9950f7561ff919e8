//! Shared query infrastructure: the [`Query`] trait, [`QueryCommon`] fields, and [`SortDirection`].

use url::Url;

/// Trait implemented by query builders. Provides URL serialization and
/// shared builder methods for page size and sort direction.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the number of results per page.
    fn with_limit(mut self, limit: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().limit = Some(limit);
        self
    }

    /// Sets the sort direction (ascending or descending).
    fn with_order(mut self, order: SortDirection) -> Self
    where
        Self: Sized,
    {
        self.get_common().order = order;
        self
    }
}

/// Sort order for API results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order. This is the default.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Fields shared by all query types: sort direction and page size.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryCommon {
    /// Sort direction. Defaults to ascending.
    pub order: SortDirection,
    /// Results per page. `None` uses the API default.
    pub limit: Option<u32>,
}

impl QueryCommon {
    /// Appends the common order and limit parameters to the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("order", self.order.as_str());
        if let Some(limit) = self.limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        };
        url
    }
}
