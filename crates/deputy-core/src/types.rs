//! Resource models returned by the upstream API.
//!
//! Field names mirror the upstream PascalCase keys so JSON output is a
//! faithful passthrough. Fields the CLI does not model explicitly are kept in
//! `extra` and serialized back out unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Resource collections addressable under `api/v1/resource/<Name>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Staff members.
    Employee,
    /// Departments (operational units in upstream terms).
    Department,
    /// Worked time records.
    Timesheet,
    /// Scheduled shifts.
    Roster,
    /// Leave requests.
    Leave,
}

impl Resource {
    /// Upstream resource name used in URLs.
    #[must_use]
    pub const fn api_name(self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Department => "OperationalUnit",
            Self::Timesheet => "Timesheet",
            Self::Roster => "Roster",
            Self::Leave => "Leave",
        }
    }

    /// Plural noun used in log and error messages.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Employee => "employees",
            Self::Department => "departments",
            Self::Timesheet => "timesheets",
            Self::Roster => "rosters",
            Self::Leave => "leave requests",
        }
    }
}

/// The authenticated user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Me {
    /// User account id.
    #[serde(default)]
    pub user_id: u64,
    /// Employee record linked to the user.
    #[serde(default)]
    pub employee_id: u64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Login email, when shared.
    #[serde(default)]
    pub primary_email: Option<String>,
    /// Home location id.
    #[serde(default)]
    pub company: Option<u64>,
    /// Upstream fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A staff member.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Employee {
    /// Record id.
    pub id: u64,
    /// Name as shown upstream.
    #[serde(default)]
    pub display_name: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Whether the employee is currently employed.
    #[serde(default)]
    pub active: bool,
    /// Home location id.
    #[serde(default)]
    pub company: Option<u64>,
    /// First working day, `YYYY-MM-DD`.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Upstream fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A department (operational unit).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Department {
    /// Record id.
    pub id: u64,
    /// Department name.
    #[serde(default)]
    pub operational_unit_name: String,
    /// Location the department belongs to.
    #[serde(default)]
    pub company: Option<u64>,
    /// Whether the department is in use.
    #[serde(default)]
    pub active: bool,
    /// Upstream fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A worked time record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Timesheet {
    /// Record id.
    pub id: u64,
    /// Employee who worked the time.
    #[serde(default)]
    pub employee: u64,
    /// Work date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
    /// Unix seconds.
    #[serde(default)]
    pub start_time: i64,
    /// Unix seconds.
    #[serde(default)]
    pub end_time: i64,
    /// Hours.
    #[serde(default)]
    pub total_time: f64,
    /// Whether a manager approved the timesheet.
    #[serde(default)]
    pub time_approved: bool,
    /// Upstream fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Timesheet {
    /// Start of the worked period, if set.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.start_time)
    }

    /// End of the worked period, if set.
    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.end_time)
    }
}

/// A scheduled shift.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Roster {
    /// Record id.
    pub id: u64,
    /// Rostered employee, `0` for an open shift.
    #[serde(default)]
    pub employee: u64,
    /// Department the shift is in.
    #[serde(default)]
    pub operational_unit: u64,
    /// Unix seconds.
    #[serde(default)]
    pub start_time: i64,
    /// Unix seconds.
    #[serde(default)]
    pub end_time: i64,
    /// Whether staff can see the shift.
    #[serde(default)]
    pub published: bool,
    /// Upstream fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Roster {
    /// Scheduled start, if set.
    #[must_use]
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.start_time)
    }

    /// Scheduled end, if set.
    #[must_use]
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.end_time)
    }
}

/// A leave request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Leave {
    /// Record id.
    pub id: u64,
    /// Employee taking leave.
    #[serde(default)]
    pub employee: u64,
    /// First day of leave.
    #[serde(default)]
    pub date_start: Option<String>,
    /// Last day of leave.
    #[serde(default)]
    pub date_end: Option<String>,
    /// Upstream status code; see [`Leave::status_label`].
    #[serde(default)]
    pub status: i64,
    /// Free-text note from the employee.
    #[serde(default)]
    pub comment: Option<String>,
    /// Upstream fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Leave {
    /// Upstream status codes rendered as words.
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        match self.status {
            0 => "pending",
            1 => "approved",
            2 => "declined",
            3 => "cancelled",
            _ => "unknown",
        }
    }
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    if secs <= 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_employee_keeps_unknown_fields() {
        let raw = json!({
            "Id": 7,
            "DisplayName": "Ada Lovelace",
            "Active": true,
            "Role": 50
        });
        let employee: Employee = serde_json::from_value(raw).expect("decode employee");
        assert_eq!(employee.id, 7);
        assert_eq!(employee.display_name, "Ada Lovelace");

        let back = serde_json::to_value(&employee).expect("encode employee");
        assert_eq!(back["Role"], 50);
        assert_eq!(back["DisplayName"], "Ada Lovelace");
    }

    #[test]
    fn test_me_uses_pascal_case() {
        let me = Me {
            user_id: 1,
            employee_id: 2,
            name: "Ada".into(),
            primary_email: Some("ada@example.com".into()),
            ..Me::default()
        };
        let value = serde_json::to_value(&me).expect("encode me");
        assert_eq!(value["PrimaryEmail"], "ada@example.com");
        assert!(value.get("primary_email").is_none());
    }

    #[test]
    fn test_timesheet_zero_timestamp_is_unset() {
        let sheet = Timesheet {
            id: 1,
            start_time: 0,
            end_time: 1_700_000_000,
            ..Timesheet::default()
        };
        assert!(sheet.started_at().is_none());
        assert!(sheet.ended_at().is_some());
    }

    #[test]
    fn test_department_resource_name() {
        assert_eq!(Resource::Department.api_name(), "OperationalUnit");
    }
}
