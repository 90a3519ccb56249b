//! Submission request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// List submissions query parameters
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListSubmissionsQuery {
    #[validate(range(min = 1))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100))]
    pub per_page: Option<u32>,

    pub language: Option<String>,

    pub status: Option<String>,
}

impl ListSubmissionsQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)
    }
}
