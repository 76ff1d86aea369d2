//! PostgREST query composition.
//!
//! The managed store exposes an auto-generated REST interface where filters
//! travel as query-string operators (`eq.`, `ilike.`, `in.(...)`). This
//! builder renders those operators; the client in `mod.rs` attaches them to
//! the request. Only the operators the directory actually issues are
//! implemented.

use uuid::Uuid;

/// A single read query against one table.
#[derive(Debug, Clone)]
pub struct TableQuery {
    table: String,
    params: Vec<(String, String)>,
}

impl TableQuery {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            params: Vec::new(),
        }
    }

    /// Column projection, including nested relation embeds such as
    /// `user_skills(count)` or `profiles(id,full_name)`.
    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.params.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Case-insensitive "contains" match. The needle is user text, so the
    /// pattern metacharacters `%`, `_` and `\` are escaped before wrapping.
    pub fn ilike_contains(mut self, column: &str, needle: &str) -> Self {
        let escaped = escape_pattern(needle);
        self.params
            .push((column.to_string(), format!("ilike.%{escaped}%")));
        self
    }

    pub fn id_in(mut self, column: &str, ids: &[Uuid]) -> Self {
        let list = ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.params.push((column.to_string(), format!("in.({list})")));
        self
    }

    pub fn order(mut self, column: &str) -> Self {
        self.params
            .push(("order".to_string(), format!("{column}.asc")));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.params.push(("limit".to_string(), n.to_string()));
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Escapes LIKE/ILIKE metacharacters in user-supplied text so the query
/// stays a plain substring match.
fn escape_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(query: &'a TableQuery, key: &str) -> &'a str {
        query
            .params()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or_else(|| panic!("missing param {key}"))
    }

    #[test]
    fn renders_select_and_limit() {
        let q = TableQuery::new("skills")
            .select("*, user_skills(count)")
            .limit(8);
        assert_eq!(q.table(), "skills");
        assert_eq!(param(&q, "select"), "*, user_skills(count)");
        assert_eq!(param(&q, "limit"), "8");
    }

    #[test]
    fn renders_ilike_contains() {
        let q = TableQuery::new("skills").ilike_contains("name", "Python");
        assert_eq!(param(&q, "name"), "ilike.%Python%");
    }

    #[test]
    fn escapes_pattern_metacharacters() {
        let q = TableQuery::new("skills").ilike_contains("name", "C% _and\\ more");
        assert_eq!(param(&q, "name"), "ilike.%C\\% \\_and\\\\ more%");
    }

    #[test]
    fn renders_in_list() {
        let a = Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap();
        let b = Uuid::parse_str("22222222-2222-2222-2222-222222222222").unwrap();
        let q = TableQuery::new("user_skills").id_in("skill_id", &[a, b]);
        assert_eq!(
            param(&q, "skill_id"),
            format!("in.({a},{b})")
        );
    }

    #[test]
    fn renders_eq_and_order() {
        let q = TableQuery::new("skills")
            .eq("category", "Programming")
            .order("name");
        assert_eq!(param(&q, "category"), "eq.Programming");
        assert_eq!(param(&q, "order"), "name.asc");
    }
}
