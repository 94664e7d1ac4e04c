use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_newtype!(EntryId);

impl EntryId {
    /// Ids are creation times in Unix milliseconds. Two entries created in
    /// the same millisecond share an id.
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis())
    }
}

/// What the user submits: an accomplishment, how it was measured, and the
/// task or project behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletRequest {
    pub accomplished: String,
    pub measured: String,
    pub task: String,
    #[serde(default)]
    pub keyword: Option<String>,
}

impl BulletRequest {
    pub fn new(
        accomplished: impl Into<String>,
        measured: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            accomplished: accomplished.into(),
            measured: measured.into(),
            task: task.into(),
            keyword: None,
        }
    }

    /// A blank keyword is treated as no keyword at all.
    pub fn with_keyword(mut self, keyword: Option<String>) -> Self {
        self.keyword = keyword.filter(|value| !value.is_empty());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredBullet {
    pub bullet: String,
    pub score: f64,
}

impl ScoredBullet {
    pub fn new(bullet: impl Into<String>, score: f64) -> Self {
        Self {
            bullet: bullet.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub timestamp: DateTime<Utc>,
    pub input: BulletRequest,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub output: Vec<ScoredBullet>,
}

/// Reads an absent or `null` list as empty.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keyword_is_absent() {
        let request = BulletRequest::new("a", "b", "c").with_keyword(Some(String::new()));
        assert_eq!(request.keyword, None);
    }

    #[test]
    fn absent_keyword_serializes_as_null() {
        let request = BulletRequest::new("Led migration", "reduced latency 40%", "backend");
        let value = serde_json::to_value(&request).expect("serialize");
        assert!(value["keyword"].is_null());
        assert_eq!(value["accomplished"], "Led migration");
    }

    #[test]
    fn entry_id_is_unix_millis() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00.250Z")
            .expect("timestamp")
            .with_timezone(&Utc);
        assert_eq!(EntryId::from_timestamp(at), EntryId(1_714_564_800_250));
    }

    #[test]
    fn entry_parses_browser_style_timestamp() {
        let raw = r#"{
            "id": 1714564800250,
            "timestamp": "2024-05-01T12:00:00.250Z",
            "input": {"accomplished": "a", "measured": "b", "task": "c", "keyword": null},
            "output": [{"bullet": "Did a", "score": 0.8}]
        }"#;
        let entry: HistoryEntry = serde_json::from_str(raw).expect("entry");
        assert_eq!(entry.id, EntryId(1_714_564_800_250));
        assert_eq!(entry.output, vec![ScoredBullet::new("Did a", 0.8)]);
    }

    #[test]
    fn null_output_reads_as_no_bullets() {
        let raw = r#"{
            "id": 1714564800250,
            "timestamp": "2024-05-01T12:00:00.250Z",
            "input": {"accomplished": "a", "measured": "b", "task": "c", "keyword": null},
            "output": null
        }"#;
        let entry: HistoryEntry = serde_json::from_str(raw).expect("entry");
        assert!(entry.output.is_empty());
    }
}
