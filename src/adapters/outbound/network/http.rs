use crate::shared::error::LookupError;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// Attempts per request, including the first one
pub const MAX_ATTEMPTS: u32 = 3;

/// Builds the shared reqwest client with the pipinfo user agent
pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    let user_agent = format!("pipinfo/{}", env!("CARGO_PKG_VERSION"));
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
}

/// Validates a package name or version before it is placed in a URL
pub fn validate_url_component(component: &str, component_type: &str) -> Result<(), LookupError> {
    let reject = |reason: &str| {
        Err(LookupError::InvalidComponent {
            details: format!("{} '{}' {}", component_type, component, reason),
        })
    };

    if component.is_empty() {
        return reject("is empty");
    }
    // Security: Prevent URL injection attacks
    if component.contains('/') || component.contains('\\') {
        return reject("contains path separators which are not allowed");
    }
    if component.contains("..") {
        return reject("contains '..' which is not allowed");
    }
    if component.contains(['#', '?', '@', '%']) || component.chars().any(char::is_whitespace) {
        return reject("contains URL-unsafe characters");
    }
    Ok(())
}

/// Transient failures are worth another attempt; answers and local errors are not.
fn is_retryable(error: &LookupError) -> bool {
    match error {
        LookupError::Transport { .. } => true,
        LookupError::Http { status } => *status == 429 || *status >= 500,
        LookupError::NotFound { .. }
        | LookupError::MalformedResponse { .. }
        | LookupError::InvalidComponent { .. } => false,
    }
}

/// Runs a request up to [`MAX_ATTEMPTS`] times with a linear back-off
pub async fn with_retry<T, F, Fut>(mut request: F) -> Result<T, LookupError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LookupError>>,
{
    let mut attempt = 1;
    loop {
        match request().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < MAX_ATTEMPTS && is_retryable(&e) => {
                tracing::debug!("attempt {} failed: {}; retrying", attempt, e);
                tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Decodes a JSON response, mapping 404 to `NotFound` and other failures to `Http`
pub async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    package_name: &str,
) -> Result<T, LookupError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(LookupError::NotFound {
            package: package_name.to_string(),
        });
    }
    if !status.is_success() {
        return Err(LookupError::Http {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| LookupError::MalformedResponse {
        details: e.to_string(),
    })
}
