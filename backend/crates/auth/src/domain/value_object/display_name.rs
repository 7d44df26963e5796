//! Display name shown on the dashboard header.

use kernel::error::app_error::{AppError, AppResult};

const DISPLAY_NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let name = raw.into().trim().to_string();

        if name.is_empty() {
            return Err(AppError::bad_request("Name cannot be empty"));
        }
        if name.chars().count() > DISPLAY_NAME_MAX_CHARS {
            return Err(AppError::bad_request(format!(
                "Name must be at most {DISPLAY_NAME_MAX_CHARS} characters"
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request("Name contains invalid characters"));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
