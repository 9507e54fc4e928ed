/// Tool for listing registered children
///
/// This module implements the child_list MCP tool.

use serde::{Deserialize, Serialize};

use crate::storage::SleepStorage;
use crate::tools::ToolError;

/// Parameters for listing children (none yet)
#[derive(Debug, Default, Deserialize)]
pub struct ListChildrenParams {}

/// One child in the listing
#[derive(Debug, Serialize)]
pub struct ChildInfo {
    pub child_id: String,
    pub name: String,
    pub birth_date: String,
    pub age_months: i32,
    /// Whether a sleep period is currently open
    pub asleep: bool,
}

/// Response from listing children
#[derive(Debug, Serialize)]
pub struct ListChildrenResponse {
    pub children: Vec<ChildInfo>,
    pub message: String,
}

/// List all registered children with their current sleep state
pub fn list_children<S: SleepStorage>(
    storage: &S,
    _params: ListChildrenParams,
) -> Result<ListChildrenResponse, ToolError> {
    let mut children = Vec::new();

    for profile in storage.list_children()? {
        let log = storage.load_log(&profile)?;
        children.push(ChildInfo {
            child_id: profile.id.to_string(),
            name: profile.name,
            birth_date: profile.birth_date.to_string(),
            age_months: log.age_months(),
            asleep: log.active_period().is_some(),
        });
    }

    let message = if children.is_empty() {
        "No children registered yet. Use child_create to add one.".to_string()
    } else {
        children
            .iter()
            .map(|c| {
                format!(
                    "👶 {} - born {}, {} months old{}",
                    c.name,
                    c.birth_date,
                    c.age_months,
                    if c.asleep { " 😴 (asleep now)" } else { "" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    Ok(ListChildrenResponse { children, message })
}
