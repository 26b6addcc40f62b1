use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// Date columns may come back as `2026-04-01` or `2026-04-01T00:00:00`.
mod day {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, de::Error};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let day = raw.get(..10).unwrap_or(&raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map(Some)
            .map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub employee_id: String,
    pub full_name: String,
    pub furigana: Option<String>,
    pub department: Option<String>,
    pub status: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "day::deserialize")]
    pub date_of_joining: Option<NaiveDate>,
    #[serde(default, deserialize_with = "day::deserialize")]
    pub previous_job_leaving_date: Option<NaiveDate>,
    pub salary: Option<String>,
    pub grade: Option<String>,
    #[serde(default)]
    pub is_double_work: Option<bool>,
    #[serde(default)]
    pub is_dependent: Option<bool>,
    pub scheduled_department: Option<String>,
    pub scheduled_working_hours: Option<String>,
    pub age: Option<u32>,
    pub commute_method: Option<String>,
    pub employment_type: Option<String>,
    #[serde(default, deserialize_with = "day::deserialize")]
    pub last_working_day: Option<NaiveDate>,
    #[serde(default, deserialize_with = "day::deserialize")]
    pub date_of_leaving: Option<NaiveDate>,
    #[serde(default)]
    pub is_resignation_submitted: Option<bool>,
    pub handover_status: Option<String>,
    #[serde(default)]
    pub is_company_property_returned: Option<bool>,
    #[serde(default)]
    pub is_severance_pay: Option<bool>,
    pub transfer_destination_department: Option<String>,
    #[serde(default, deserialize_with = "day::deserialize")]
    pub transfer_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_working_hours_changed: Option<bool>,
    #[serde(default)]
    pub is_commute_method_changed: Option<bool>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Task progress. The server stores whatever label it is given, so labels
/// outside the three standard ones are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
    Other(String),
}

impl TaskStatus {
    pub fn label(&self) -> &str {
        match self {
            TaskStatus::Todo => "未完了",
            TaskStatus::InProgress => "進行中",
            TaskStatus::Done => "完了",
            TaskStatus::Other(label) => label,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "未完了" => TaskStatus::Todo,
            "進行中" => TaskStatus::InProgress,
            "完了" => TaskStatus::Done,
            _ => TaskStatus::Other(label),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(label) => label,
            standard => standard.label().to_string(),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the CLI spellings (`todo`, `in-progress`, `done`) as well as any
/// server label.
impl std::str::FromStr for TaskStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "todo" => TaskStatus::Todo,
            "in-progress" => TaskStatus::InProgress,
            "done" => TaskStatus::Done,
            label => TaskStatus::from(label.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub employee_id: i64,
    pub name: String,
    pub due_date: NaiveDateTime,
    pub assignee: Option<String>,
    pub status: TaskStatus,
}

/// Body of `PATCH /api/tasks/:id`; unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OnboardingForm {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub furigana: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_job_leaving_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    pub is_double_work: bool,
    pub is_dependent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_working_hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commute_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OffboardingForm {
    /// Internal `EMP...` id or the numeric database id.
    pub employee_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_working_day: Option<NaiveDate>,
    pub date_of_leaving: Option<NaiveDate>,
    pub is_resignation_submitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handover_status: Option<String>,
    pub is_company_property_returned: bool,
    pub is_severance_pay: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransferForm {
    pub employee_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_destination_department: Option<String>,
    pub transfer_date: Option<NaiveDate>,
    pub is_working_hours_changed: bool,
    pub is_commute_method_changed: bool,
}

/// One of the three HR procedures, each filed to its own endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Procedure {
    Onboarding(OnboardingForm),
    Offboarding(OffboardingForm),
    Transfer(TransferForm),
}

impl Procedure {
    pub fn path(&self) -> &'static str {
        match self {
            Procedure::Onboarding(_) => "/api/employees/onboarding",
            Procedure::Offboarding(_) => "/api/employees/offboarding",
            Procedure::Transfer(_) => "/api/employees/transfer",
        }
    }
}

/// The employee a procedure touched and its regenerated task list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcedureOutcome {
    pub employee: Employee,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_status_uses_server_labels() {
        assert_eq!(serde_json::to_string(&TaskStatus::Done).unwrap(), "\"完了\"");
        let status: TaskStatus = serde_json::from_str("\"進行中\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);
        assert_eq!("todo".parse::<TaskStatus>().unwrap(), TaskStatus::Todo);
        assert_eq!("完了".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
    }

    #[test]
    fn unknown_task_status_keeps_its_label() {
        let status: TaskStatus = serde_json::from_str("\"保留\"").unwrap();
        assert_eq!(status, TaskStatus::Other("保留".into()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"保留\"");
        assert_eq!(status.to_string(), "保留");
        assert_eq!(
            "on-hold".parse::<TaskStatus>().unwrap(),
            TaskStatus::Other("on-hold".into())
        );
    }

    #[test]
    fn task_parses_naive_iso_due_date() {
        let task: Task = serde_json::from_value(json!({
            "id": 4,
            "employee_id": 2,
            "name": "Prepare laptop",
            "due_date": "2026-04-01T09:00:00",
            "assignee": "IT",
            "status": "未完了"
        }))
        .unwrap();
        assert_eq!(task.due_date.to_string(), "2026-04-01 09:00:00");
        assert_eq!(task.status, TaskStatus::Todo);
    }

    #[test]
    fn employee_dates_accept_day_or_datetime() {
        let employee: Employee = serde_json::from_value(json!({
            "id": 1,
            "employee_id": "EMP20260401",
            "full_name": "Sato Hana",
            "status": "在籍",
            "date_of_joining": "2026-04-01",
            "transfer_date": "2026-06-01T00:00:00",
            "date_of_leaving": null,
            "created_at": "2026-03-01T10:15:30.123456"
        }))
        .unwrap();
        assert_eq!(employee.date_of_joining, NaiveDate::from_ymd_opt(2026, 4, 1));
        assert_eq!(employee.transfer_date, NaiveDate::from_ymd_opt(2026, 6, 1));
        assert_eq!(employee.date_of_leaving, None);
        assert_eq!(employee.last_working_day, None);
        assert!(employee.is_double_work.is_none());
    }

    #[test]
    fn task_update_skips_unset_fields() {
        let update = TaskUpdate {
            status: Some(TaskStatus::Done),
            ..TaskUpdate::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "status": "完了" }));
    }

    #[test]
    fn onboarding_form_sends_dates_as_plain_days() {
        let form = OnboardingForm {
            full_name: "Sato Hana".into(),
            date_of_joining: NaiveDate::from_ymd_opt(2026, 4, 1),
            ..OnboardingForm::default()
        };
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["date_of_joining"], json!("2026-04-01"));
        assert_eq!(value["is_double_work"], json!(false));
        assert!(value.get("furigana").is_none());
    }

    #[test]
    fn procedure_paths() {
        assert_eq!(
            Procedure::Transfer(TransferForm::default()).path(),
            "/api/employees/transfer"
        );
        assert_eq!(
            Procedure::Offboarding(OffboardingForm::default()).path(),
            "/api/employees/offboarding"
        );
    }
}
