use serde_json::{json, Value};
use uuid::Uuid;

use super::error::QueryError;
use super::types::{FilterField, Pagination, SortField, SortOrder, SqlResult};
use crate::config;
use crate::database::models::DesignStatus;

/// Columns searched by the free-text `q` parameter.
const SEARCH_COLUMNS: &[&str] = &[
    "title",
    "description_short",
    "description_long",
    "description_plain",
    "tags",
    "designer_name",
    "collection_name",
    "design_number",
];

/// Builder translating optional filter/sort/pagination parameters into a
/// bounded, parameterized query over the designs table.
///
/// The visibility rule composes with everything else: non-admin callers get
/// an implicit `status = 'active'` predicate regardless of other filters.
/// Caller-supplied strings only ever become bind values; identifiers are
/// drawn exclusively from the `FilterField`/`SortField` allow-lists.
pub struct CatalogQuery {
    is_admin: bool,
    filters: Vec<(FilterField, String)>,
    search: Option<String>,
    featured: Option<bool>,
    status: Option<DesignStatus>,
    favorited_by: Option<Uuid>,
    sort_by: SortField,
    sort_order: SortOrder,
    page: i64,
    per_page: i64,
}

impl CatalogQuery {
    pub fn new(is_admin: bool) -> Self {
        Self {
            is_admin,
            filters: vec![],
            search: None,
            featured: None,
            status: None,
            favorited_by: None,
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
            page: 1,
            per_page: config::config().api.default_page_size,
        }
    }

    /// Equality filter. Empty values impose no constraint.
    pub fn filter(mut self, field: FilterField, value: Option<String>) -> Self {
        if let Some(v) = value {
            if !v.trim().is_empty() {
                self.filters.push((field, v));
            }
        }
        self
    }

    /// Free-text search across title, descriptions, tags, designer,
    /// collection and design number.
    pub fn search(mut self, q: Option<String>) -> Self {
        self.search = q.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn featured(mut self, featured: Option<bool>) -> Self {
        self.featured = featured;
        self
    }

    /// Explicit status filter. Only honored for admins; non-admins are
    /// pinned to active designs no matter what they pass.
    pub fn status(mut self, status: Option<String>) -> Result<Self, QueryError> {
        if let Some(s) = status {
            if self.is_admin {
                self.status = Some(
                    DesignStatus::parse(&s).ok_or_else(|| QueryError::InvalidStatus(s.clone()))?,
                );
            }
        }
        Ok(self)
    }

    /// Restrict to designs favorited by the given user.
    pub fn favorited_by(mut self, user_id: Uuid) -> Self {
        self.favorited_by = Some(user_id);
        self
    }

    pub fn sort(mut self, sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        self.sort_by = SortField::parse(sort_by);
        self.sort_order = SortOrder::parse(sort_order);
        self
    }

    /// Clamp page to >= 1 and per_page to [1, configured max].
    pub fn paginate(mut self, page: Option<i64>, per_page: Option<i64>) -> Self {
        let max = config::config().api.max_page_size;
        self.page = page.unwrap_or(1).max(1);
        self.per_page = per_page
            .unwrap_or(config::config().api.default_page_size)
            .clamp(1, max);
        self
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn pagination(&self, total: i64) -> Pagination {
        Pagination::new(self.page, self.per_page, total)
    }

    /// WHERE predicates plus accumulated bind values, `$1`-based.
    fn build_where(&self) -> (Vec<String>, Vec<Value>) {
        let mut predicates = vec![];
        let mut params: Vec<Value> = vec![];

        // Visibility composes with all other filters
        if !self.is_admin {
            params.push(json!(DesignStatus::Active.as_str()));
            predicates.push(format!("status = ${}", params.len()));
        } else if let Some(status) = self.status {
            params.push(json!(status.as_str()));
            predicates.push(format!("status = ${}", params.len()));
        }

        for (field, value) in &self.filters {
            params.push(json!(value));
            predicates.push(format!("{} = ${}", field.column(), params.len()));
        }

        if let Some(featured) = self.featured {
            params.push(json!(featured));
            predicates.push(format!("featured = ${}", params.len()));
        }

        if let Some(q) = &self.search {
            params.push(json!(format!("%{}%", q.trim())));
            let n = params.len();
            let ors: Vec<String> = SEARCH_COLUMNS
                .iter()
                .map(|col| format!("{} ILIKE ${}", col, n))
                .collect();
            predicates.push(format!("({})", ors.join(" OR ")));
        }

        if let Some(user_id) = self.favorited_by {
            params.push(json!(user_id));
            predicates.push(format!(
                "id IN (SELECT design_id FROM user_favorites WHERE user_id = ${}::uuid)",
                params.len()
            ));
        }

        (predicates, params)
    }

    pub fn to_sql(&self) -> SqlResult {
        let (predicates, params) = self.build_where();

        let where_clause = if predicates.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", predicates.join(" AND "))
        };

        let query = [
            "SELECT * FROM designs".to_string(),
            where_clause,
            format!(
                "ORDER BY {} {}",
                self.sort_by.column(),
                self.sort_order.to_sql()
            ),
            format!(
                "LIMIT {} OFFSET {}",
                self.per_page,
                (self.page - 1) * self.per_page
            ),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }

    /// Count query over the same WHERE clause, no LIMIT.
    pub fn to_count_sql(&self) -> SqlResult {
        let (predicates, params) = self.build_where();

        let query = if predicates.is_empty() {
            "SELECT COUNT(*) AS count FROM designs".to_string()
        } else {
            format!(
                "SELECT COUNT(*) AS count FROM designs WHERE {}",
                predicates.join(" AND ")
            )
        };

        SqlResult { query, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_admin_always_gets_active_predicate() {
        let sql = CatalogQuery::new(false)
            .filter(FilterField::Category, Some("sarees".to_string()))
            .to_sql();

        assert!(sql.query.contains("status = $1"));
        assert!(sql.query.contains("category = $2"));
        assert_eq!(sql.params[0], json!("active"));
        assert_eq!(sql.params[1], json!("sarees"));
    }

    #[test]
    fn admin_gets_no_status_predicate_by_default() {
        let sql = CatalogQuery::new(true).to_sql();
        assert!(!sql.query.contains("status"));
    }

    #[test]
    fn admin_explicit_status_filter_is_validated() {
        let q = CatalogQuery::new(true).status(Some("draft".to_string())).unwrap();
        let sql = q.to_sql();
        assert!(sql.query.contains("status = $1"));
        assert_eq!(sql.params[0], json!("draft"));

        assert!(CatalogQuery::new(true)
            .status(Some("'; DROP TABLE designs".to_string()))
            .is_err());
    }

    #[test]
    fn non_admin_status_param_is_ignored() {
        let sql = CatalogQuery::new(false)
            .status(Some("draft".to_string()))
            .unwrap()
            .to_sql();
        assert_eq!(sql.params[0], json!("active"));
    }

    #[test]
    fn values_are_parameterized_never_inlined() {
        let sql = CatalogQuery::new(false)
            .filter(FilterField::Category, Some("sarees".to_string()))
            .search(Some("kanchipuram silk".to_string()))
            .to_sql();

        assert!(!sql.query.contains("sarees"));
        assert!(!sql.query.contains("kanchipuram"));
        assert!(sql.params.iter().any(|p| p == &json!("%kanchipuram silk%")));
    }

    #[test]
    fn unrecognized_sort_falls_back_to_created_at_desc() {
        let sql = CatalogQuery::new(false)
            .sort(Some("1; DROP TABLE designs"), Some("sideways"))
            .to_sql();
        assert!(sql.query.contains("ORDER BY created_at DESC"));
    }

    #[test]
    fn search_expands_over_all_text_columns_with_one_param() {
        let sql = CatalogQuery::new(true).search(Some("silk".to_string())).to_sql();
        let param_count = sql.params.len();
        assert_eq!(param_count, 1);
        for col in SEARCH_COLUMNS {
            assert!(sql.query.contains(&format!("{} ILIKE $1", col)));
        }
    }

    #[test]
    fn empty_filter_values_impose_no_constraint() {
        let sql = CatalogQuery::new(true)
            .filter(FilterField::Colour, Some("  ".to_string()))
            .filter(FilterField::Fabric, None)
            .to_sql();
        assert!(!sql.query.contains("colour"));
        assert!(!sql.query.contains("fabric"));
    }

    #[test]
    fn featured_is_tri_state() {
        let absent = CatalogQuery::new(true).featured(None).to_sql();
        assert!(!absent.query.contains("featured"));

        let set = CatalogQuery::new(true).featured(Some(false)).to_sql();
        assert!(set.query.contains("featured = $1"));
        assert_eq!(set.params[0], json!(false));
    }

    #[test]
    fn pagination_is_clamped() {
        let q = CatalogQuery::new(false).paginate(Some(-3), Some(100_000));
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page(), 100);
        assert!(q.to_sql().query.contains("LIMIT 100 OFFSET 0"));

        let q = CatalogQuery::new(false).paginate(Some(3), Some(5));
        assert!(q.to_sql().query.contains("LIMIT 5 OFFSET 10"));
    }

    #[test]
    fn count_query_shares_where_without_limit() {
        let q = CatalogQuery::new(false)
            .filter(FilterField::Category, Some("sarees".to_string()))
            .paginate(Some(2), Some(5));
        let count = q.to_count_sql();
        let select = q.to_sql();

        assert!(count.query.starts_with("SELECT COUNT(*)"));
        assert!(!count.query.contains("LIMIT"));
        assert_eq!(count.params, select.params);
    }

    #[test]
    fn favorites_scope_adds_subquery_predicate() {
        let user = Uuid::new_v4();
        let sql = CatalogQuery::new(false).favorited_by(user).to_sql();
        assert!(sql
            .query
            .contains("id IN (SELECT design_id FROM user_favorites WHERE user_id = $2::uuid)"));
        assert_eq!(sql.params[1], json!(user));
    }
}
