//! Route strings connecting the list and edit screens.
//!
//! The edit route carries an optional, string-encoded task id. Absent,
//! non-numeric or non-positive ids (including the legacy `-1` marker) all
//! mean "create a new task".

use crate::model::task::TaskId;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

pub const TASK_LIST_ROUTE: &str = "task_list_screen";
pub const ADD_EDIT_TASK_ROUTE: &str = "add_edit_task_screen";
pub const TASK_ID_ARG: &str = "taskId";

static ADD_EDIT_ROUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^add_edit_task_screen(?:\?(?P<query>.*))?$").expect("valid route regex")
});
static TASK_ID_PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|&)taskId=(?P<id>[^&]*)").expect("valid taskId regex"));

/// Screen destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    TaskList,
    AddEditTask { task_id: Option<TaskId> },
}

impl Route {
    /// Edit route for `task_id`, or the create route when `None`.
    pub fn add_edit_task(task_id: Option<TaskId>) -> Self {
        Self::AddEditTask {
            task_id: task_id.filter(|id| *id > 0),
        }
    }

    /// Parses a route string. Unknown destinations return `None`.
    pub fn parse(route: &str) -> Option<Self> {
        let route = route.trim();
        if route == TASK_LIST_ROUTE {
            return Some(Self::TaskList);
        }

        let caps = ADD_EDIT_ROUTE_RE.captures(route)?;
        let task_id = caps
            .name("query")
            .and_then(|query| TASK_ID_PARAM_RE.captures(query.as_str()))
            .and_then(|param| param.name("id"))
            .and_then(|id| id.as_str().parse::<TaskId>().ok());
        Some(Self::add_edit_task(task_id))
    }

    /// Task id carried by an edit route.
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            Self::TaskList => None,
            Self::AddEditTask { task_id } => *task_id,
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskList => f.write_str(TASK_LIST_ROUTE),
            Self::AddEditTask { task_id: None } => f.write_str(ADD_EDIT_TASK_ROUTE),
            Self::AddEditTask {
                task_id: Some(task_id),
            } => write!(f, "{ADD_EDIT_TASK_ROUTE}?{TASK_ID_ARG}={task_id}"),
        }
    }
}
