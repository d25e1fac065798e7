//! HTTP client for the store's PostgREST interface.
//!
//! Wraps `reqwest` with the store's two auth headers, table URL building, and
//! typed deserialization of the `posts`, `persons` and `engagements` reads the
//! backfill needs. Every call is a single request; nothing is retried.

use std::time::Duration;

use backfill_core::{NewEngagement, Person, Post};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::RestError;
use crate::filter::Query;

const REST_PATH: &str = "rest/v1/";

pub const POSTS_TABLE: &str = "posts";
pub const PERSONS_TABLE: &str = "persons";
pub const ENGAGEMENTS_TABLE: &str = "engagements";

const POST_COLUMNS: &[&str] = &["id", "linkedin_url", "created_at", "tenant_id"];
const PERSON_COLUMNS: &[&str] = &["id", "name", "engagement_score", "created_at", "tenant_id"];

/// Client for one store project.
///
/// Use [`RestClient::new`] with the project URL (e.g.
/// `https://<ref>.supabase.co`); tests point it at a wiremock server.
pub struct RestClient {
    client: Client,
    base_url: Url,
}

impl RestClient {
    /// Creates a client that sends `apikey` and `Authorization: Bearer` on
    /// every request.
    ///
    /// # Errors
    ///
    /// - [`RestError::InvalidBaseUrl`] if `project_url` is not a valid URL.
    /// - [`RestError::InvalidHeader`] if a credential is not a valid header value.
    /// - [`RestError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(
        project_url: &str,
        api_key: &str,
        bearer_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, RestError> {
        let mut headers = HeaderMap::new();
        let mut api_key_value =
            HeaderValue::from_str(api_key).map_err(|_| RestError::InvalidHeader("apikey"))?;
        api_key_value.set_sensitive(true);
        headers.insert("apikey", api_key_value);
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {bearer_token}"))
            .map_err(|_| RestError::InvalidHeader("Authorization"))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        // Exactly one trailing slash so `join` appends below /rest/v1/ instead
        // of replacing the last segment.
        let normalised = format!("{}/{REST_PATH}", project_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| RestError::InvalidBaseUrl {
            url: project_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// All posts for `tenant_id`, in the order the store returns them.
    ///
    /// # Errors
    ///
    /// - [`RestError::UnexpectedStatus`] on a non-2xx response.
    /// - [`RestError::Http`] on network failure.
    /// - [`RestError::Deserialize`] if the rows do not match [`Post`].
    pub async fn fetch_posts(&self, tenant_id: Uuid) -> Result<Vec<Post>, RestError> {
        let query = Query::select(POST_COLUMNS).eq("tenant_id", tenant_id);
        let url = self.table_url(POSTS_TABLE, &query)?;
        self.get_json(url, "fetch posts").await
    }

    /// People of `tenant_id` with `engagement_score > 0`.
    ///
    /// # Errors
    ///
    /// Same as [`RestClient::fetch_posts`].
    pub async fn fetch_engaged_people(&self, tenant_id: Uuid) -> Result<Vec<Person>, RestError> {
        let query = Query::select(PERSON_COLUMNS)
            .eq("tenant_id", tenant_id)
            .gt("engagement_score", 0);
        let url = self.table_url(PERSONS_TABLE, &query)?;
        self.get_json(url, "fetch people").await
    }

    /// Whether any engagement already links `person_id` to `post_id` in
    /// `tenant_id`.
    ///
    /// # Errors
    ///
    /// Same as [`RestClient::fetch_posts`].
    pub async fn engagement_exists(
        &self,
        post_id: Uuid,
        person_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<bool, RestError> {
        let query = Query::select(&["id"])
            .eq("post_id", post_id)
            .eq("person_id", person_id)
            .eq("tenant_id", tenant_id);
        let url = self.table_url(ENGAGEMENTS_TABLE, &query)?;
        let rows: Vec<serde_json::Value> = self.get_json(url, "check engagement").await?;
        Ok(!rows.is_empty())
    }

    /// Inserts one engagement row.
    ///
    /// Only `201 Created` counts as success.
    ///
    /// # Errors
    ///
    /// - [`RestError::UnexpectedStatus`] for any other status, carrying the
    ///   store's raw response body.
    /// - [`RestError::Http`] on network failure.
    pub async fn insert_engagement(&self, engagement: &NewEngagement) -> Result<(), RestError> {
        let url = self.table_url(ENGAGEMENTS_TABLE, &Query::default())?;
        let response = self
            .client
            .post(url)
            .header("Prefer", "return=minimal")
            .json(engagement)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CREATED {
            return Ok(());
        }
        let body = body_or_read_error(response.text().await);
        Err(RestError::UnexpectedStatus {
            status: status.as_u16(),
            context: "insert engagement".to_string(),
            body,
        })
    }

    /// Reads a single post id to confirm the URL and credentials work.
    ///
    /// # Errors
    ///
    /// Same as [`RestClient::fetch_posts`].
    pub async fn ping(&self) -> Result<(), RestError> {
        let query = Query::select(&["id"]).limit(1);
        let url = self.table_url(POSTS_TABLE, &query)?;
        let _rows: Vec<serde_json::Value> = self.get_json(url, "ping").await?;
        Ok(())
    }

    /// Builds `<base>/rest/v1/<table>?<query>` with percent-encoded values.
    fn table_url(&self, table: &str, query: &Query) -> Result<Url, RestError> {
        let mut url = self
            .base_url
            .join(table)
            .map_err(|e| RestError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        if !query.pairs().is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query.pairs() {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET, requires a 2xx status, and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, RestError> {
        tracing::debug!(%url, context, "store read");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RestError::UnexpectedStatus {
                status: status.as_u16(),
                context: context.to_string(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| RestError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

/// The response text, or a readable note when the body itself could not be
/// read, so a rejected insert never reports an empty response.
fn body_or_read_error(body: Result<String, reqwest::Error>) -> String {
    body.unwrap_or_else(|e| format!("<failed to read response body: {e}>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(project_url: &str) -> RestClient {
        RestClient::new(project_url, "anon-key", "anon-key", 30, "backfill-test/0.1")
            .expect("client construction should not fail")
    }

    #[test]
    fn table_url_appends_rest_path_and_query() {
        let client = test_client("https://example.supabase.co");
        let query = Query::select(&["id", "created_at"]).eq("tenant_id", "abc");
        let url = client.table_url("posts", &query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.supabase.co/rest/v1/posts?select=id%2Ccreated_at&tenant_id=eq.abc"
        );
    }

    #[test]
    fn table_url_strips_trailing_slash() {
        let client = test_client("https://example.supabase.co/");
        let url = client.table_url("engagements", &Query::default()).unwrap();
        assert_eq!(url.as_str(), "https://example.supabase.co/rest/v1/engagements");
    }

    #[test]
    fn invalid_project_url_is_rejected() {
        let result = RestClient::new("not a url", "k", "k", 30, "ua");
        assert!(matches!(result, Err(RestError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn body_or_read_error_passes_text_through() {
        assert_eq!(body_or_read_error(Ok("boom".to_string())), "boom");
    }

    #[tokio::test]
    async fn body_or_read_error_describes_read_failure() {
        let err = reqwest::Client::new()
            .get("http://0.0.0.0:1")
            .send()
            .await
            .unwrap_err();
        let text = body_or_read_error(Err(err));
        assert!(
            text.starts_with("<failed to read response body: "),
            "unexpected text: {text}"
        );
    }

    #[test]
    fn invalid_header_value_is_rejected() {
        let result = RestClient::new("https://example.supabase.co", "bad\nkey", "k", 30, "ua");
        assert!(matches!(result, Err(RestError::InvalidHeader("apikey"))));
    }
}
