use std::sync::Arc;

use base64::Engine;

use entitycore_core::{Error, ProjectContext, Result, TokenProvider};

use crate::transport::{HttpTransport, Request, RequestBody, Response};

const PREVIEW_LIMIT: usize = 2048;
const BINARY_PREVIEW_LIMIT: usize = 256;

/// Authenticated access to the catalog API.
///
/// Attaches the bearer credential and the tenancy headers to every request
/// and converts non-2xx responses into [`Error::Server`] values carrying the
/// request and response context callers need to diagnose which entity, asset
/// or part failed. Presigned-URL traffic bypasses this layer and goes to the
/// transport directly.
pub struct Api<T: HttpTransport> {
    transport: T,
    context: ProjectContext,
    token: Arc<dyn TokenProvider>,
}

impl<T: HttpTransport> Api<T> {
    pub fn new(transport: T, context: ProjectContext, token: Arc<dyn TokenProvider>) -> Self {
        Self {
            transport,
            context,
            token,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn context(&self) -> &ProjectContext {
        &self.context
    }

    /// Issue a catalog request; non-2xx responses become [`Error::Server`].
    pub async fn request(&self, request: Request) -> Result<Response> {
        let token = self.token.token()?;
        let request = request
            .header("Authorization", format!("Bearer {token}"))
            .header("project-id", self.context.project_id.to_string())
            .header("virtual-lab-id", self.context.virtual_lab_id.to_string());

        let method = request.method;
        let url = request.url.clone();
        let request_preview = request_body_preview(&request.body);

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(Error::Server {
                method: method.as_str().to_string(),
                url,
                status: response.status,
                request: request_preview,
                response: body_preview(&response.body),
            });
        }

        Ok(response)
    }
}

/// Degrade a body to a representation safe to embed in an error message:
/// UTF-8 text is truncated, anything else is base64 of a short prefix.
pub fn body_preview(body: &[u8]) -> String {
    if body.is_empty() {
        return String::new();
    }

    match std::str::from_utf8(body) {
        Ok(text) if text.len() <= PREVIEW_LIMIT => text.to_string(),
        Ok(text) => {
            let cut = text
                .char_indices()
                .take_while(|(i, _)| *i <= PREVIEW_LIMIT)
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            format!("{}... ({} bytes total)", &text[..cut], body.len())
        }
        Err(_) => {
            let prefix = &body[..body.len().min(BINARY_PREVIEW_LIMIT)];
            format!(
                "base64:{} ({} bytes total)",
                base64::engine::general_purpose::STANDARD.encode(prefix),
                body.len()
            )
        }
    }
}

fn request_body_preview(body: &RequestBody) -> String {
    match body {
        RequestBody::None => String::new(),
        RequestBody::Json(value) => {
            let text = value.to_string();
            body_preview(text.as_bytes())
        }
        RequestBody::Bytes(bytes) => format!("<{} raw bytes>", bytes.len()),
        RequestBody::File {
            file_name, content, ..
        } => format!("<file {file_name}, {} bytes>", content.len()),
    }
}
