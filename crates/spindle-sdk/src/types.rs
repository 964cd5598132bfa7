//! Type definitions for the Spindle SDK

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard response envelope wrapping every API payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub status: bool,
    pub status_code: i64,
    pub message: String,
    pub data: T,
}

/// A single LP record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lp {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub thumbnail: String,
    pub published: bool,
    pub author_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub likes: Vec<Like>,
}

/// Tag attached to an LP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

/// Like on an LP
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: u64,
    pub user_id: u64,
    pub lp_id: u64,
}

/// One page of a cursor-paginated LP listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LpPage {
    pub data: Vec<Lp>,
    pub next_cursor: Option<u64>,
    pub has_next: bool,
}

/// Sort direction for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Cursor-pagination query for LP listings
#[derive(Debug, Clone, Default)]
pub struct PageQuery {
    pub cursor: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub order: Option<Order>,
}

impl PageQuery {
    /// Flatten into query-string pairs, skipping unset fields
    pub(crate) fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(cursor) = self.cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        if let Some(order) = self.order {
            params.push(("order".to_string(), order.as_str().to_string()));
        }
        params
    }
}

/// Credentials for sign-in
#[derive(Debug, Clone, Serialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// New-account request
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Token payload returned by signin and refresh
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Body of the token refresh call
#[derive(Debug, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lp_page_envelope_parsing() {
        let body = r#"{
            "status": true,
            "statusCode": 200,
            "message": "ok",
            "data": {
                "data": [{
                    "id": 1,
                    "title": "Blue Train",
                    "content": "Coltrane, 1958 pressing",
                    "thumbnail": "https://cdn.example.com/1.jpg",
                    "published": true,
                    "authorId": 7,
                    "createdAt": "2024-05-01T00:00:00Z",
                    "updatedAt": "2024-05-02T00:00:00Z",
                    "tags": [{"id": 1, "name": "jazz"}],
                    "likes": [{"id": 3, "userId": 7, "lpId": 1}]
                }],
                "nextCursor": 1,
                "hasNext": true
            }
        }"#;

        let envelope: Envelope<LpPage> = serde_json::from_str(body).unwrap();
        assert!(envelope.status);
        let page = envelope.data;
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].title, "Blue Train");
        assert_eq!(page.data[0].tags[0].name, "jazz");
        assert_eq!(page.next_cursor, Some(1));
        assert!(page.has_next);
    }

    #[test]
    fn test_last_page_has_no_cursor() {
        let body = r#"{
            "status": true,
            "statusCode": 200,
            "message": "ok",
            "data": {"data": [], "nextCursor": null, "hasNext": false}
        }"#;
        let envelope: Envelope<LpPage> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data.next_cursor, None);
        assert!(!envelope.data.has_next);
    }

    #[test]
    fn test_page_query_params() {
        let query = PageQuery {
            cursor: Some(10),
            limit: Some(20),
            search: Some("jazz".to_string()),
            order: Some(Order::Desc),
        };
        let params = query.to_params();
        assert_eq!(params.len(), 4);
        assert!(params.contains(&("order".to_string(), "desc".to_string())));

        assert!(PageQuery::default().to_params().is_empty());
    }
}
