use serde::{Deserialize, Serialize};

/// Free-text question plus the optional source identifier that selects the
/// metrics pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub source_id: Option<String>,
}

impl Query {
    pub fn new(text: impl Into<String>, source_id: Option<String>) -> Self {
        Self { text: text.into(), source_id }
    }

    /// The routing discriminator, if present and not blank.
    pub fn discriminator(&self) -> Option<&str> {
        self.source_id.as_deref().map(str::trim).filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::Query;

    #[test]
    fn blank_source_id_is_not_a_discriminator() {
        assert_eq!(Query::new("page views", None).discriminator(), None);
        assert_eq!(Query::new("page views", Some(String::new())).discriminator(), None);
        assert_eq!(Query::new("page views", Some("   ".to_string())).discriminator(), None);
    }

    #[test]
    fn discriminator_is_trimmed() {
        let query = Query::new("page views", Some(" 12345 ".to_string()));
        assert_eq!(query.discriminator(), Some("12345"));
    }
}
