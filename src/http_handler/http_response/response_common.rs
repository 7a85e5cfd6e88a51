use reqwest::StatusCode;
use strum_macros::Display;

pub(crate) trait JSONBodyHTTPResponseType: HTTPResponseType {
    async fn parse_json_body<T>(response: reqwest::Response) -> Result<T, ResponseError>
    where T: for<'de> serde::Deserialize<'de> {
        Ok(response.json::<T>().await?)
    }
}

pub(crate) trait HTTPResponseType {
    type ParsedResponseType;
    async fn read_response(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError>;

    async fn unwrap_return_code(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ResponseError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status == StatusCode::NOT_FOUND {
            Err(ResponseError::NotFound { url: response.url().to_string() })
        } else if status.is_server_error() {
            Err(ResponseError::InternalServer { message: ErrorReturn::read_message(response).await })
        } else if status.is_client_error() {
            Err(ResponseError::BadRequest { message: ErrorReturn::read_message(response).await })
        } else {
            Err(ResponseError::Unknown { message: status.to_string() })
        }
    }
}

/// Error body of the backend, `{"message": "..."}` or `{"error": "..."}`.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorReturn {
    message: Option<String>,
    error: Option<String>,
}

impl ErrorReturn {
    /// Extracts a human readable message from an error response,
    /// falling back to the raw body and finally to the status line.
    async fn read_message(response: reqwest::Response) -> String {
        let status = response.status().to_string();
        let Ok(text) = response.text().await else { return status };
        Self::message_from_body(&text).unwrap_or(status)
    }

    pub(crate) fn message_from_body(text: &str) -> Option<String> {
        match serde_json::from_str::<ErrorReturn>(text) {
            Ok(ErrorReturn { message: Some(m), .. } | ErrorReturn { message: None, error: Some(m) })
                if !m.is_empty() =>
            {
                Some(m)
            }
            Ok(_) => None,
            Err(_) if text.trim().is_empty() => None,
            Err(_) => Some(text.trim().to_string()),
        }
    }
}

#[derive(Debug, Display)]
pub enum ResponseError {
    #[strum(to_string = "Server error: {message}")]
    InternalServer { message: String },
    #[strum(to_string = "Request rejected: {message}")]
    BadRequest { message: String },
    #[strum(to_string = "Resource not found: {url}")]
    NotFound { url: String },
    #[strum(to_string = "Unable to parse response: {message}")]
    Malformed { message: String },
    #[strum(to_string = "No connection to the race backend")]
    NoConnection,
    #[strum(to_string = "Request timed out")]
    Timeout,
    #[strum(to_string = "Unexpected response: {message}")]
    Unknown { message: String },
}

impl std::error::Error for ResponseError {}
impl From<reqwest::Error> for ResponseError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            ResponseError::Timeout
        } else if value.is_connect() {
            ResponseError::NoConnection
        } else if value.is_decode() {
            ResponseError::Malformed { message: value.to_string() }
        } else {
            ResponseError::Unknown { message: value.to_string() }
        }
    }
}
