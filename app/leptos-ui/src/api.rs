use dbs_api_types::{ExecutionKey, LogMessage};
use dbs_history::config::ApiConfig;
use dbs_history::error::FetchError;
use dbs_history::fetcher::{FetchResult, LogFetcher};
use futures::future::{FutureExt, LocalBoxFuture};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

/// Fetches execution log messages from the scheduler backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpLogFetcher {
    api: ApiConfig,
}

impl HttpLogFetcher {
    pub fn new(api: ApiConfig) -> Self {
        Self { api }
    }
}

impl LogFetcher for HttpLogFetcher {
    fn fetch_log_messages(&self, key: &ExecutionKey) -> LocalBoxFuture<'static, FetchResult> {
        let url = self.api.log_messages_url(key);
        async move {
            let body = fetch_text(&url).await?;
            decode_log_messages(&body)
        }
        .boxed_local()
    }
}

/// Parse the backend's JSON array of log messages, keeping its order.
pub fn decode_log_messages(body: &str) -> Result<Vec<LogMessage>, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

// ── Fetch helper ──

async fn fetch_text(url: &str) -> Result<String, FetchError> {
    let opts = RequestInit::new();
    opts.set_method("GET");

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| FetchError::Network(format!("{:?}", e)))?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(|e| FetchError::Network(format!("{:?}", e)))?;

    let window =
        web_sys::window().ok_or_else(|| FetchError::Network("no global window".to_string()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| FetchError::Network(format!("{:?}", e)))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|e| FetchError::Network(format!("{:?}", e)))?;
    if !resp.ok() {
        return Err(FetchError::Status(resp.status()));
    }

    let text = JsFuture::from(resp.text().map_err(|e| FetchError::Decode(format!("{:?}", e)))?)
        .await
        .map_err(|e| FetchError::Decode(format!("{:?}", e)))?;
    text.as_string()
        .ok_or_else(|| FetchError::Decode("response body is not text".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbs_api_types::LogLevel;

    #[test]
    fn decode_keeps_backend_order() {
        let body = r#"[
            {"timeLogged": "2024-03-01T12:00:02Z", "logLevel": "ERROR", "logMessage": "second"},
            {"timeLogged": "2024-03-01T12:00:01Z", "logLevel": "INFO", "logMessage": "first"}
        ]"#;
        let messages = decode_log_messages(body).expect("decode");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].log_message, "second");
        assert_eq!(messages[0].log_level, LogLevel::Error);
        assert_eq!(messages[1].log_message, "first");
    }

    #[test]
    fn decode_empty_array() {
        assert!(decode_log_messages("[]").expect("decode").is_empty());
    }

    #[test]
    fn decode_error_is_reported_as_decode() {
        let err = decode_log_messages("{\"error\": \"nope\"}").expect_err("not an array");
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
