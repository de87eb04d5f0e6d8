//! Cache key builders.
//!
//! Keys are `:`-delimited segments with the entity kind first, which is what
//! lets `delete_pattern("user:*")` drop everything cached for users.

use std::fmt::Display;

/// `project:{id}`
pub fn project_key(id: impl Display) -> String {
    format!("project:{}", id)
}

/// `user:{user_id}:projects`
pub fn user_projects_key(user_id: impl Display) -> String {
    format!("user:{}:projects", user_id)
}

/// `themes:all`
pub fn themes_key() -> String {
    "themes:all".to_string()
}

/// `subscription:{user_id}`
pub fn subscription_key(user_id: impl Display) -> String {
    format!("subscription:{}", user_id)
}

/// `analytics:{project_id}:{range}`
pub fn analytics_key(project_id: impl Display, range: impl Display) -> String {
    format!("analytics:{}:{}", project_id, range)
}

// == Invalidation Patterns ==

/// Every key cached for one user.
pub fn user_pattern(user_id: impl Display) -> String {
    format!("user:{}:*", user_id)
}

/// Every project record.
pub fn project_pattern() -> String {
    "project:*".to_string()
}

/// Every analytics range for one project.
pub fn analytics_pattern(project_id: impl Display) -> String {
    format!("analytics:{}:*", project_id)
}
