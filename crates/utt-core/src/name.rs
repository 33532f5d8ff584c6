//! Structured activity names.
//!
//! A name written as `project: task` splits on its first colon. Anything
//! else has an empty project and the whole (trimmed) name as its task.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Pre-compiled pattern for the `project: task` convention.
static PROJECT_TASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?P<project>[^:]*?)\s*:\s*(?P<task>.*?)\s*$").unwrap());

/// An activity name with its parsed project and task components.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    raw: String,
    project: String,
    task: String,
}

impl Name {
    /// Parses `raw` with the `project: task` convention.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let (project, task) = PROJECT_TASK_RE
            .captures(&raw)
            .map(|caps| (caps["project"].to_string(), caps["task"].to_string()))
            .filter(|(project, task)| !project.is_empty() && !task.is_empty())
            .unwrap_or_else(|| (String::new(), raw.trim().to_string()));

        Self { raw, project, task }
    }

    /// Builds a name whose components were parsed elsewhere.
    pub fn from_parts(
        raw: impl Into<String>,
        project: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            raw: raw.into(),
            project: project.into(),
            task: task.into(),
        }
    }

    /// The name exactly as it was logged.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The project component; empty when the name has none.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// The task component.
    pub fn task(&self) -> &str {
        &self.task
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
