/// A trimmed, non-empty song search string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    lower: String,
}

impl Query {
    /// Returns `None` when the input is blank.
    pub fn new(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            lower: text.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Case-insensitive exact match against a provider title.
    pub fn matches(&self, title: &str) -> bool {
        eq_ignore_case(&self.lower, title)
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Compare a lowercase needle with an untrimmed provider field.
pub(crate) fn eq_ignore_case(lower: &str, candidate: &str) -> bool {
    candidate.trim().to_lowercase() == lower
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_rejected() {
        assert!(Query::new("").is_none());
        assert!(Query::new("   \t").is_none());
    }

    #[test]
    fn test_query_trimmed() {
        let q = Query::new("  Hey Jude ").unwrap();
        assert_eq!(q.as_str(), "Hey Jude");
        assert!(q.matches("hey jude"));
        assert!(q.matches(" HEY JUDE "));
        assert!(!q.matches("Hey Jude (Remastered)"));
    }
}
