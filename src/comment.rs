use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tracing::debug;

use crate::client::FlowBoards;
use crate::error::{FbError, Result};
use crate::responses::CommentPayload;

const COMMENT_ID_BYTES: usize = 13;

/// 13 bytes from the OS CSPRNG, base64url without padding (18 characters).
pub fn generate_comment_id() -> Result<String> {
    let mut bytes = [0u8; COMMENT_ID_BYTES];
    getrandom::fill(&mut bytes)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

pub fn build_payload(ticket_id: &str, text: &str) -> Result<CommentPayload> {
    Ok(CommentPayload {
        id: generate_comment_id()?,
        ticket_id: ticket_id.to_string(),
        comment: text.to_string(),
    })
}

/// Posts `text` on `ticket_id`. Blank text is rejected before any request.
pub async fn post_comment<A: FlowBoards>(api: &A, ticket_id: &str, text: &str) -> Result<CommentPayload> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FbError::EmptyComment);
    }

    let payload = build_payload(ticket_id, text)?;
    debug!(comment_id = %payload.id, ticket_id, "posting comment");
    api.post_comment(&payload).await?;
    Ok(payload)
}
