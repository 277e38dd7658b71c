use serde::{Deserialize, Deserializer};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Deserializer for nullable patch fields.
///
/// Pair with `#[serde(default, deserialize_with = "nullable_patch")]` on an
/// `Option<Option<T>>`: a missing key stays `None`, an explicit `null`
/// becomes `Some(None)`, a value becomes `Some(Some(v))`.
pub fn nullable_patch<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable_patch")]
        parent_id: Option<Option<DbId>>,
    }

    #[test]
    fn test_nullable_patch_distinguishes_missing_and_null() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.parent_id, None);

        let null: Patch = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(null.parent_id, Some(None));

        let value: Patch = serde_json::from_str(r#"{"parent_id": 7}"#).unwrap();
        assert_eq!(value.parent_id, Some(Some(7)));
    }
}
