use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppErrorKind {
    Network,
    Api,
    Decode,
    Auth,
    Config,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppErrorKind::Network => "network",
            AppErrorKind::Api => "api",
            AppErrorKind::Decode => "decode",
            AppErrorKind::Auth => "auth",
            AppErrorKind::Config => "config",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{kind} error: {message}")]
pub struct AppError {
    pub kind: AppErrorKind,
    pub message: String,
}

impl AppError {
    pub fn new(kind: AppErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            401 | 403 => AppErrorKind::Auth,
            _ => AppErrorKind::Api,
        };
        let body = body.trim();
        let message = if body.is_empty() {
            format!("request failed with status {status}")
        } else {
            format!("request failed with status {status}: {body}")
        };
        Self::new(kind, message)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_decode() {
            AppErrorKind::Decode
        } else if let Some(status) = err.status() {
            if status.as_u16() == 401 || status.as_u16() == 403 {
                AppErrorKind::Auth
            } else {
                AppErrorKind::Api
            }
        } else {
            AppErrorKind::Network
        };
        Self::new(kind, err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(AppErrorKind::Decode, err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        Self::new(AppErrorKind::Config, format!("invalid API URL: {err}"))
    }
}
