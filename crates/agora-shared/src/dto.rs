//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Credentials submitted to register or log in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Response carrying a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_in: u64,
}

/// Body of `POST /api/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of `POST /api/post/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCommentRequest {
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_post_request_reads_type_field() {
        let body = r#"{"title":"t","category":"music","type":"link","url":"https://x.io"}"#;

        let req: CreatePostRequest = serde_json::from_str(body).unwrap();

        assert_eq!(req.kind, "link");
        assert_eq!(req.url.as_deref(), Some("https://x.io"));
        assert!(req.text.is_none());
    }
}
