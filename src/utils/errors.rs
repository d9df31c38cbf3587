use crate::api::exchangerate::ApiError;

/// Errors surfaced by the bot services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),
    #[error("Currency {0} not found.")]
    CurrencyNotFound(String),
    #[error("No data to plot for {base}/{target}")]
    NoChartData { base: String, target: String },
    #[error("Failed to render chart: {0}")]
    Render(String),
    #[error("Chart file error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Message shown to the user, without the error indicator
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Api(e) if e.is_connection() => {
                format!("Could not reach the rates service: {}", e)
            }
            ServiceError::InvalidAmount(_) => "Invalid amount.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Prefix a message with the error indicator used in every failure reply
pub fn error_reply(message: &str) -> String {
    if message.starts_with('❌') {
        message.to_string()
    } else {
        format!("❌ {}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_amount_message() {
        let err = ServiceError::InvalidAmount("abc".to_string());
        assert_eq!(err.user_message(), "Invalid amount.");
        assert_eq!(err.to_string(), "Invalid amount: 'abc'");
    }

    #[test]
    fn test_data_error_passes_through() {
        let err = ServiceError::from(ApiError::Data("no rate data".to_string()));
        assert_eq!(err.user_message(), "Data error: no rate data");
    }

    #[test]
    fn test_error_reply_prefixes_once() {
        assert_eq!(error_reply("boom"), "❌ boom");
        assert_eq!(error_reply("❌ boom"), "❌ boom");
    }
}
