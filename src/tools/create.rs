/// Tool for registering a child
///
/// This module implements the child_create MCP tool.

use serde::{Deserialize, Serialize};

use crate::domain::{ChildId, ChildSleepLog};
use crate::storage::{ChildProfile, SleepStorage};
use crate::tools::{parse_date, ToolError};

/// Parameters for registering a new child
#[derive(Debug, Deserialize)]
pub struct CreateChildParams {
    pub name: String,
    /// Birth date as YYYY-MM-DD; must not be in the future
    pub birth_date: String,
}

/// Response from registering a child
#[derive(Debug, Serialize)]
pub struct CreateChildResponse {
    pub success: bool,
    pub child_id: Option<String>,
    pub message: String,
}

/// Register a new child using the provided storage
pub fn create_child<S: SleepStorage>(
    storage: &S,
    params: CreateChildParams,
) -> Result<CreateChildResponse, ToolError> {
    let name = params.name.trim();
    if name.is_empty() {
        return Err(ToolError::InvalidParams(
            "child name cannot be empty".to_string(),
        ));
    }

    let birth_date = parse_date(&params.birth_date)?;

    // Construct the (empty) log first: this runs the birth-date
    // validation before anything is stored.
    let log = ChildSleepLog::new(name, birth_date)?;

    let profile = ChildProfile {
        id: ChildId::new(),
        name: name.to_string(),
        birth_date,
    };
    storage.create_child(&profile)?;

    Ok(CreateChildResponse {
        success: true,
        child_id: Some(profile.id.to_string()),
        message: format!(
            "👶 Registered {} ({} months old). Ready to track sleep!",
            name,
            log.age_months()
        ),
    })
}
