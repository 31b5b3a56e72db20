use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::Gender;

/// Rejected form input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Blank(&'static str),
}

fn require(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::Blank(field))
    } else {
        Ok(())
    }
}

/// Input for creating a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPostForm {
    pub title: String,
    pub location: String,
    pub deadline: NaiveDate,
    pub body: String,
    #[serde(default)]
    pub min_age: u32,
    #[serde(default)]
    pub gender: Gender,
}

impl RegisterPostForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require("title", &self.title)?;
        require("location", &self.location)?;
        require("body", &self.body)
    }
}

/// Input for editing a posting. Location is fixed once posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyPostForm {
    pub title: String,
    pub deadline: NaiveDate,
    pub body: String,
    #[serde(default)]
    pub min_age: u32,
    #[serde(default)]
    pub gender: Gender,
}

impl ModifyPostForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require("title", &self.title)?;
        require("body", &self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub body: String,
}

impl ApplicationForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require("body", &self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentForm {
    pub content: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require("content", &self.content)
    }
}

/// Author decision on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionForm {
    pub approve: bool,
}
