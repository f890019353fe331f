use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{FbError, Result, ResultExt};
use crate::pagination::{self, CollectionKind, MAX_RESULTS};
use crate::responses::{CommentPayload, RestPrefixResponse, TicketSearchBody};
use crate::types::{Bin, Board, Ticket, User};

const REST_DIRECTORY_URL: &str = "https://fb.mauvable.com/rest-directory/2";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const ERROR_BODY_LIMIT: usize = 500;

/// Search filters for `GET /ticket-search`. Absent filters are omitted from
/// the query; the backend may ignore the ones that are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketQuery {
    pub user_ids: Vec<String>,
    pub bin_id: Option<String>,
    pub board_id: Option<String>,
}

impl TicketQuery {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            user_ids: vec![user_id.to_string()],
            ..Default::default()
        }
    }
}

/// Operations the commands need from the Flow Boards API.
pub trait FlowBoards {
    async fn current_user(&self) -> Result<User>;
    async fn search_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>>;
    async fn bins(&self) -> Result<Vec<Bin>>;
    async fn boards(&self) -> Result<Vec<Board>>;
    async fn post_comment(&self, payload: &CommentPayload) -> Result<()>;
}

pub struct FlowBoardsClient {
    http: Client,
    auth_key: String,
    base_url: Url,
    user_email: String,
}

impl FlowBoardsClient {
    /// Looks up the organization's REST prefix and returns a client bound to it.
    pub async fn connect(auth_key: &str, org_id: &str, user_email: &str) -> Result<Self> {
        let http = build_http_client()?;
        let directory = join_segments(&parse_url(REST_DIRECTORY_URL)?, &[org_id])?;

        let body = send(&http, auth_key, http.get(directory.clone()))
            .await
            .context("failed to discover REST prefix")?;
        let prefix: RestPrefixResponse = parse_json(&body, "REST prefix")?;
        if prefix.rest_prefix.trim().is_empty() {
            return Err(FbError::MissingRestPrefix);
        }
        debug!(%directory, base_url = %prefix.rest_prefix, "discovered REST prefix");

        Self::with_base_url(auth_key, &prefix.rest_prefix, user_email)
    }

    pub fn with_base_url(auth_key: &str, base_url: &str, user_email: &str) -> Result<Self> {
        Ok(Self {
            http: build_http_client()?,
            auth_key: auth_key.to_string(),
            base_url: parse_url(base_url)?,
            user_email: user_email.to_string(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        join_segments(&self.base_url, segments)
    }

    async fn execute(&self, method: Method, url: Url) -> Result<String> {
        send(&self.http, &self.auth_key, self.http.request(method, url)).await
    }

    async fn fetch_collection<T: DeserializeOwned>(&self, kind: CollectionKind) -> Result<Vec<T>> {
        let base = self.endpoint(&[kind.path()])?;
        pagination::fetch_all(kind, |token| {
            let url = paginated_url(&base, token.as_deref());
            self.execute(Method::GET, url)
        })
        .await
    }
}

impl FlowBoards for FlowBoardsClient {
    async fn current_user(&self) -> Result<User> {
        let url = self.endpoint(&["users", self.user_email.as_str()])?;
        let body = self
            .execute(Method::GET, url)
            .await
            .context("failed to get user")?;
        parse_json(&body, "user")
    }

    async fn search_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>> {
        let url = ticket_search_url(&self.endpoint(&["ticket-search"])?, query);
        let body = self
            .execute(Method::GET, url)
            .await
            .context("failed to search tickets")?;
        let tickets: TicketSearchBody = parse_json(&body, "ticket")?;
        Ok(tickets.into_tickets())
    }

    async fn bins(&self) -> Result<Vec<Bin>> {
        self.fetch_collection(CollectionKind::Bins)
            .await
            .context("failed to get bins")
    }

    async fn boards(&self) -> Result<Vec<Board>> {
        self.fetch_collection(CollectionKind::Boards)
            .await
            .context("failed to get boards")
    }

    async fn post_comment(&self, payload: &CommentPayload) -> Result<()> {
        let url = self.endpoint(&["ticket-comments", payload.id.as_str()])?;
        send(&self.http, &self.auth_key, self.http.post(url).json(payload))
            .await
            .context("failed to post comment")?;
        Ok(())
    }
}

fn build_http_client() -> Result<Client> {
    Ok(Client::builder().timeout(HTTP_TIMEOUT).build()?)
}

/// Sends one authenticated request. Non-2xx responses become
/// [`FbError::ApiError`]; there is no retry.
async fn send(http: &Client, auth_key: &str, request: RequestBuilder) -> Result<String> {
    let mut request = request.build()?;
    let authorization =
        HeaderValue::from_str(&format!("bearer {auth_key}")).map_err(|_| FbError::InvalidAuthKey)?;
    let headers = request.headers_mut();
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    debug!(method = %request.method(), url = %request.url(), "sending request");

    let response = http.execute(request).await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(FbError::ApiError {
            status: status.as_u16(),
            message: truncate_body(body.trim()),
        });
    }

    Ok(body)
}

fn parse_json<T: DeserializeOwned>(body: &str, what: &'static str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| FbError::Parse { what, source })
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| FbError::InvalidUrl(format!("{raw}: {e}")))
}

/// Appends path segments, percent-encoding each one.
fn join_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| FbError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn paginated_url(base: &Url, page_token: Option<&str>) -> Url {
    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("max-results", &MAX_RESULTS.to_string());
        if let Some(token) = page_token {
            pairs.append_pair("page-token", token);
        }
    }
    url
}

fn ticket_search_url(base: &Url, query: &TicketQuery) -> Url {
    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        if !query.user_ids.is_empty() {
            pairs.append_pair("users", &query.user_ids.join(","));
        }
        if let Some(bin_id) = query.bin_id.as_deref().filter(|id| !id.is_empty()) {
            pairs.append_pair("bins", bin_id);
        }
        if let Some(board_id) = query.board_id.as_deref().filter(|id| !id.is_empty()) {
            pairs.append_pair("boards", board_id);
        }
    }
    url
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
