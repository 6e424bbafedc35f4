//! Static routing table from resource names to HTTP verbs and response keys.
//!
//! | Resource | Verbs |
//! |----------|-------|
//! | `users`, `groups`, `jobcodes`, `reminders`, `schedule_events` | list, add, update |
//! | `timesheets` | list, add, update, delete |
//! | `jobcode_assignments`, `notifications` | list, add, delete |
//! | `geolocations` | list, add |
//! | `timesheets_deleted`, `last_modified_timestamps`, `schedule_calendars`, `managed_clients`, `current_user` | list |
//!
//! Reports are POST-only actions whose entities come back under
//! `<kind>_report` rather than under the called path.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::http_client::HttpMethod;

/// Logical verb exposed by a resource handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    List,
    Add,
    Update,
    Delete,
}

impl Verb {
    pub const ALL: [Self; 4] = [Self::List, Self::Add, Self::Update, Self::Delete];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    pub const fn method(self) -> HttpMethod {
        match self {
            Self::List => HttpMethod::Get,
            Self::Add => HttpMethod::Post,
            Self::Update => HttpMethod::Put,
            Self::Delete => HttpMethod::Delete,
        }
    }
}

impl Display for Verb {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = UnknownName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|verb| verb.as_str() == normalized)
            .ok_or_else(|| UnknownName::new("verb", value))
    }
}

/// Routing facts for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    pub path: &'static str,
    pub response_key: &'static str,
    pub verbs: &'static [Verb],
}

impl ResourceDescriptor {
    pub fn supports(&self, verb: Verb) -> bool {
        self.verbs.contains(&verb)
    }
}

const LIST: &[Verb] = &[Verb::List];
const LIST_ADD: &[Verb] = &[Verb::List, Verb::Add];
const LIST_ADD_UPDATE: &[Verb] = &[Verb::List, Verb::Add, Verb::Update];
const LIST_ADD_DELETE: &[Verb] = &[Verb::List, Verb::Add, Verb::Delete];
const ALL_VERBS: &[Verb] = &Verb::ALL;

/// Remote collections addressable through the CRUD verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Users,
    Groups,
    Jobcodes,
    JobcodeAssignments,
    Timesheets,
    TimesheetsDeleted,
    Geolocations,
    LastModifiedTimestamps,
    Notifications,
    Reminders,
    ScheduleCalendars,
    ScheduleEvents,
    ManagedClients,
    CurrentUser,
}

impl Resource {
    pub const ALL: [Self; 14] = [
        Self::Users,
        Self::Groups,
        Self::Jobcodes,
        Self::JobcodeAssignments,
        Self::Timesheets,
        Self::TimesheetsDeleted,
        Self::Geolocations,
        Self::LastModifiedTimestamps,
        Self::Notifications,
        Self::Reminders,
        Self::ScheduleCalendars,
        Self::ScheduleEvents,
        Self::ManagedClients,
        Self::CurrentUser,
    ];

    pub const fn as_str(self) -> &'static str {
        self.descriptor().path
    }

    pub const fn descriptor(self) -> ResourceDescriptor {
        let (path, response_key, verbs) = match self {
            Self::Users => ("users", "users", LIST_ADD_UPDATE),
            Self::Groups => ("groups", "groups", LIST_ADD_UPDATE),
            Self::Jobcodes => ("jobcodes", "jobcodes", LIST_ADD_UPDATE),
            Self::JobcodeAssignments => {
                ("jobcode_assignments", "jobcode_assignments", LIST_ADD_DELETE)
            }
            Self::Timesheets => ("timesheets", "timesheets", ALL_VERBS),
            Self::TimesheetsDeleted => ("timesheets_deleted", "timesheets_deleted", LIST),
            Self::Geolocations => ("geolocations", "geolocations", LIST_ADD),
            Self::LastModifiedTimestamps => (
                "last_modified_timestamps",
                "last_modified_timestamps",
                LIST,
            ),
            Self::Notifications => ("notifications", "notifications", LIST_ADD_DELETE),
            Self::Reminders => ("reminders", "reminders", LIST_ADD_UPDATE),
            Self::ScheduleCalendars => ("schedule_calendars", "schedule_calendars", LIST),
            Self::ScheduleEvents => ("schedule_events", "schedule_events", LIST_ADD_UPDATE),
            Self::ManagedClients => ("managed_clients", "managed_clients", LIST),
            Self::CurrentUser => ("current_user", "users", LIST),
        };

        ResourceDescriptor {
            path,
            response_key,
            verbs,
        }
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = UnknownName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|resource| resource.as_str() == normalized)
            .ok_or_else(|| UnknownName::new("resource", value))
    }
}

/// POST-only report actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Report {
    Payroll,
    PayrollByJobcode,
    Project,
    CurrentTotals,
}

impl Report {
    pub const ALL: [Self; 4] = [
        Self::Payroll,
        Self::PayrollByJobcode,
        Self::Project,
        Self::CurrentTotals,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payroll => "payroll",
            Self::PayrollByJobcode => "payroll_by_jobcode",
            Self::Project => "project",
            Self::CurrentTotals => "current_totals",
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::Payroll => "reports/payroll",
            Self::PayrollByJobcode => "reports/payroll_by_jobcode",
            Self::Project => "reports/project",
            Self::CurrentTotals => "reports/current_totals",
        }
    }

    pub const fn response_key(self) -> &'static str {
        match self {
            Self::Payroll => "payroll_report",
            Self::PayrollByJobcode => "payroll_by_jobcode_report",
            Self::Project => "project_report",
            Self::CurrentTotals => "current_totals_report",
        }
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Report {
    type Err = UnknownName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|report| report.as_str() == normalized)
            .ok_or_else(|| UnknownName::new("report", value))
    }
}

/// Returned when a name does not match any routing table entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownName {
    kind: &'static str,
    value: String,
}

impl UnknownName {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
