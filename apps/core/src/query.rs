use crate::model::normalize_for_search;

/// Current free-text filter of a menu context.
///
/// `active` is derived from `text` and never stored separately, so the two
/// can't disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    text: String,
}

impl QueryState {
    pub fn new(raw: &str) -> Self {
        Self {
            text: normalize_for_search(raw),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_active(&self) -> bool {
        !self.text.is_empty()
    }

    /// Case-insensitive containment of the query in `haystack`.
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::QueryState;

    #[test]
    fn whitespace_only_query_is_inactive() {
        let query = QueryState::new("  \n\t ");
        assert!(!query.is_active());
        assert_eq!(query.text(), "");
    }

    #[test]
    fn query_is_normalized() {
        let query = QueryState::new("  FooBar ");
        assert!(query.is_active());
        assert_eq!(query.text(), "foobar");
        assert!(query.matches("some FOOBAR text"));
        assert!(!query.matches("foo bar"));
    }
}
