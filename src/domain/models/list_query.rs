use bon::Builder;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::item::Item;

/// Columns a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Title,
    Price,
    Duration,
    CreatedAt,
}

impl SortColumn {
    /// Accepted `sortBy` values, in their canonical spelling
    pub const ALLOWED: [&'static str; 4] = ["title", "price", "duration", "createdAt"];

    /// Case-insensitive lookup of a column name
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "title" => Some(SortColumn::Title),
            "price" => Some(SortColumn::Price),
            "duration" => Some(SortColumn::Duration),
            "createdat" => Some(SortColumn::CreatedAt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Title => "title",
            SortColumn::Price => "price",
            SortColumn::Duration => "duration",
            SortColumn::CreatedAt => "createdAt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "Asc", alias = "ASC")]
    Asc,
    #[serde(alias = "Desc", alias = "DESC")]
    Desc,
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: {}", other)),
        }
    }
}

/// The ordering a listing is actually returned in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortOrder {
    /// Compare two items under this ordering. Equal keys fall back to the id
    /// so that pages never overlap.
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        let primary = match self.column {
            SortColumn::Title => a.title().cmp(b.title()),
            SortColumn::Price => a.price().cmp(&b.price()),
            SortColumn::Duration => a.duration_minutes().cmp(&b.duration_minutes()),
            SortColumn::CreatedAt => a.created_at().cmp(&b.created_at()),
        };

        let primary = match self.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };

        primary.then_with(|| a.id().cmp(&b.id()))
    }
}

/// Parameters of a listing request.
///
/// `sort_by` is kept as the caller sent it: the validators reject unknown
/// columns, while storage falls back to creation order for them.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ListItemsQuery {
    #[builder(default = 1)]
    pub page: i64,
    #[builder(default = 10)]
    pub page_size: i64,
    #[builder(into)]
    pub search: Option<String>,
    #[builder(into)]
    pub sort_by: Option<String>,
    #[builder(default)]
    pub sort_direction: SortDirection,
}

impl Default for ListItemsQuery {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ListItemsQuery {
    /// Search term, or `None` when absent or blank
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Case-insensitive substring match on the title
    pub fn matches(&self, item: &Item) -> bool {
        match self.search_term() {
            Some(term) => item.title().to_lowercase().contains(&term.to_lowercase()),
            None => true,
        }
    }

    /// No column means newest first; an unrecognised column means oldest first.
    pub fn sort_order(&self) -> SortOrder {
        match self.sort_by.as_deref().filter(|s| !s.trim().is_empty()) {
            None => SortOrder {
                column: SortColumn::CreatedAt,
                direction: SortDirection::Desc,
            },
            Some(raw) => match SortColumn::parse(raw.trim()) {
                Some(column) => SortOrder {
                    column,
                    direction: self.sort_direction,
                },
                None => SortOrder {
                    column: SortColumn::CreatedAt,
                    direction: SortDirection::Asc,
                },
            },
        }
    }

    pub fn effective_page(&self) -> i64 {
        self.page.max(1)
    }

    pub fn effective_page_size(&self) -> i64 {
        self.page_size.max(1)
    }

    /// Number of rows to skip for the requested page
    pub fn offset(&self) -> i64 {
        (self.effective_page() - 1).saturating_mul(self.effective_page_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_parse_is_case_insensitive() {
        assert_eq!(SortColumn::parse("TITLE"), Some(SortColumn::Title));
        assert_eq!(SortColumn::parse("createdat"), Some(SortColumn::CreatedAt));
        assert_eq!(SortColumn::parse("CreatedAt"), Some(SortColumn::CreatedAt));
        assert_eq!(SortColumn::parse("Duration"), Some(SortColumn::Duration));
        assert_eq!(SortColumn::parse("director"), None);

        for name in SortColumn::ALLOWED {
            assert_eq!(SortColumn::parse(name).map(|c| c.as_str()), Some(name));
        }
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let query = ListItemsQuery::default();
        assert_eq!(
            query.sort_order(),
            SortOrder {
                column: SortColumn::CreatedAt,
                direction: SortDirection::Desc
            }
        );

        let blank = ListItemsQuery::builder().sort_by("  ").build();
        assert_eq!(blank.sort_order().direction, SortDirection::Desc);
    }

    #[test]
    fn test_unknown_sort_column_falls_back_to_oldest_first() {
        let query = ListItemsQuery::builder()
            .sort_by("director")
            .sort_direction(SortDirection::Desc)
            .build();

        assert_eq!(
            query.sort_order(),
            SortOrder {
                column: SortColumn::CreatedAt,
                direction: SortDirection::Asc
            }
        );
    }

    #[test]
    fn test_known_sort_column_keeps_direction() {
        let query = ListItemsQuery::builder()
            .sort_by("price")
            .sort_direction(SortDirection::Desc)
            .build();

        assert_eq!(query.sort_order().column, SortColumn::Price);
        assert_eq!(query.sort_order().direction, SortDirection::Desc);
    }

    #[test]
    fn test_paging_is_clamped() {
        let query = ListItemsQuery::builder().page(0).page_size(-3).build();
        assert_eq!(query.effective_page(), 1);
        assert_eq!(query.effective_page_size(), 1);
        assert_eq!(query.offset(), 0);

        let query = ListItemsQuery::builder().page(3).page_size(5).build();
        assert_eq!(query.offset(), 10);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        assert_eq!(ListItemsQuery::builder().search("   ").build().search_term(), None);
        assert_eq!(
            ListItemsQuery::builder().search("matrix").build().search_term(),
            Some("matrix")
        );
    }

    #[test]
    fn test_sort_direction_from_str() {
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
