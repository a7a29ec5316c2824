/*
 * Responsibility
 * - getHistory の request/response DTO (JSON は camelCase)
 * - validation (形式チェック) 用の validate()
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{MessageId, UserId};

pub const MIN_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetHistoryRequest {
    pub page_size: Option<i64>,
    pub cursor: Option<String>,
}

impl GetHistoryRequest {
    /// Either a first page (`pageSize`) or a continuation (`cursor`), never both.
    pub fn validate(&self) -> Result<(), &'static str> {
        let cursor = self.cursor.as_deref().filter(|c| !c.is_empty());

        match (self.page_size, cursor) {
            (Some(_), Some(_)) => Err("pageSize and cursor are mutually exclusive"),
            (None, Some(_)) => Ok(()),
            (None, None) => Err("pageSize or cursor is required"),
            (Some(size), None) if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&size) => {
                Err("pageSize must be between 10 and 100")
            }
            (Some(_), None) => Ok(()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetHistoryResponse {
    pub data: MessagesPage,
}

#[derive(Debug, Serialize)]
pub struct MessagesPage {
    pub messages: Vec<Message>,
    pub next: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub author_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(page_size: Option<i64>, cursor: Option<&str>) -> GetHistoryRequest {
        GetHistoryRequest {
            page_size,
            cursor: cursor.map(str::to_string),
        }
    }

    #[test]
    fn page_size_bounds() {
        assert!(req(Some(10), None).validate().is_ok());
        assert!(req(Some(100), None).validate().is_ok());
        assert!(req(Some(9), None).validate().is_err());
        assert!(req(Some(101), None).validate().is_err());
    }

    #[test]
    fn cursor_alone_is_enough() {
        assert!(req(None, Some("eyJwYWdlIjoyfQ")).validate().is_ok());
    }

    #[test]
    fn empty_cursor_counts_as_absent() {
        assert!(req(None, Some("")).validate().is_err());
        assert!(req(Some(20), Some("")).validate().is_ok());
    }

    #[test]
    fn page_size_and_cursor_are_exclusive() {
        assert_eq!(
            req(Some(20), Some("abc")).validate(),
            Err("pageSize and cursor are mutually exclusive")
        );
    }

    #[test]
    fn request_uses_camel_case() {
        let r: GetHistoryRequest = serde_json::from_str(r#"{"pageSize": 42}"#).unwrap();
        assert_eq!(r.page_size, Some(42));
        assert!(r.cursor.is_none());
    }

    #[test]
    fn message_serializes_camel_case() {
        let msg = Message {
            id: MessageId::nil(),
            author_id: UserId::nil(),
            body: "hi".into(),
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
        };
        let v = serde_json::to_value(msg).unwrap();
        assert_eq!(v["authorId"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(v["createdAt"], "1970-01-01T00:00:00Z");
        assert!(v.get("author_id").is_none());
    }
}
