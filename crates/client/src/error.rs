use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Translate well-known server messages into something fit for a
    /// banner; everything else passes through as-is.
    pub fn human_message(&self) -> String {
        let raw = match self {
            Self::Transport(_) => return "Network error, please try again.".to_string(),
            Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::Validation(msg)
            | Self::Server(msg) => msg.as_str(),
        };

        match raw {
            "invalid login credentials" => "Invalid email or password.".to_string(),
            "user already registered" => "This email is already registered.".to_string(),
            "password should be at least 6 characters" => {
                "Password must be at least 6 characters.".to_string()
            }
            other => other.to_string(),
        }
    }
}
