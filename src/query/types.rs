use serde::Serialize;

/// Equality-filterable design columns. Caller input maps through this enum;
/// a raw string never reaches an identifier position in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Category,
    Style,
    Colour,
    Fabric,
    Occasion,
    Designer,
    Collection,
    Season,
    DesignNumber,
}

impl FilterField {
    pub fn column(&self) -> &'static str {
        match self {
            FilterField::Category => "category",
            FilterField::Style => "style",
            FilterField::Colour => "colour",
            FilterField::Fabric => "fabric",
            FilterField::Occasion => "occasion",
            FilterField::Designer => "designer_name",
            FilterField::Collection => "collection_name",
            FilterField::Season => "season",
            FilterField::DesignNumber => "design_number",
        }
    }
}

/// Sortable columns. Anything outside this allow-list falls back to
/// `created_at` - this is the only barrier between caller-supplied sort
/// input and the ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    Title,
    ViewCount,
    LikeCount,
    DesignNumber,
    Category,
    Style,
    PriceRange,
}

impl SortField {
    pub fn parse(input: Option<&str>) -> Self {
        match input {
            Some("created_at") => SortField::CreatedAt,
            Some("title") => SortField::Title,
            Some("view_count") => SortField::ViewCount,
            Some("like_count") => SortField::LikeCount,
            Some("design_number") => SortField::DesignNumber,
            Some("category") => SortField::Category,
            Some("style") => SortField::Style,
            Some("price_range") => SortField::PriceRange,
            _ => SortField::CreatedAt,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Title => "title",
            SortField::ViewCount => "view_count",
            SortField::LikeCount => "like_count",
            SortField::DesignNumber => "design_number",
            SortField::Category => "category",
            SortField::Style => "style",
            SortField::PriceRange => "price_range",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(input: Option<&str>) -> Self {
        match input {
            Some(s) if s.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            Some(s) if s.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Desc,
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A generated query plus its positional bind values.
#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<serde_json::Value>,
}

/// Pagination block attached to every list response.
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            page,
            limit,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1 && total > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_falls_back_to_created_at() {
        assert_eq!(SortField::parse(Some("title")), SortField::Title);
        assert_eq!(
            SortField::parse(Some("1; DROP TABLE designs")),
            SortField::CreatedAt
        );
        assert_eq!(SortField::parse(None), SortField::CreatedAt);
    }

    #[test]
    fn sort_order_defaults_to_desc() {
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("ASC")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("sideways")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(None), SortOrder::Desc);
    }

    #[test]
    fn pagination_math() {
        let p = Pagination::new(1, 5, 12);
        assert_eq!(p.pages, 3);
        assert!(p.has_next);
        assert!(!p.has_prev);

        let p = Pagination::new(3, 5, 12);
        assert!(!p.has_next);
        assert!(p.has_prev);

        let p = Pagination::new(1, 20, 0);
        assert_eq!(p.pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }
}
