use serde::{Deserialize, Deserializer};

/// Deserializes a nullable field of a partial update.
///
/// Use with `#[serde(default)]`: an absent field stays `None`, an explicit
/// `null` becomes `Some(None)` and a value becomes `Some(Some(value))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Whether a partial update touches the field.
pub fn is_set<T>(field: &Option<Option<T>>) -> bool {
    field.is_some()
}

/// The new value of a touched field, `None` when it is being cleared.
pub fn new_value<T>(field: &Option<Option<T>>) -> Option<&T> {
    field.as_ref().and_then(Option::as_ref)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Update {
        #[serde(default, deserialize_with = "nullable")]
        excerpt: Option<Option<String>>,
    }

    #[test]
    fn tells_absent_from_null() {
        let absent: Update = serde_json::from_str("{}").unwrap();
        let cleared: Update = serde_json::from_str(r#"{"excerpt": null}"#).unwrap();
        let set: Update = serde_json::from_str(r#"{"excerpt": "Short"}"#).unwrap();

        assert_eq!(absent.excerpt, None);
        assert_eq!(cleared.excerpt, Some(None));
        assert_eq!(set.excerpt, Some(Some("Short".to_owned())));

        assert!(!is_set(&absent.excerpt));
        assert!(is_set(&cleared.excerpt));
        assert_eq!(new_value(&cleared.excerpt), None);
        assert_eq!(new_value(&set.excerpt).map(String::as_str), Some("Short"));
    }
}
