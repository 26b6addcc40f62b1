use super::model::{Employee, Procedure, ProcedureOutcome, Task, TaskUpdate};
use crate::{
    error::PushError,
    http_client::{HttpClient, HttpMethod},
};

/// Employees, their task checklists and the procedures that generate them.
#[derive(Debug, Clone)]
pub struct Hr {
    http: HttpClient,
}

impl Hr {
    pub fn new(http: HttpClient) -> Self {
        Hr { http }
    }

    /// Newest first, as the server orders them.
    pub async fn list_employees(&self) -> Result<Vec<Employee>, PushError> {
        self.http.get("/api/employees").await
    }

    pub async fn employee(&self, id: i64) -> Result<Employee, PushError> {
        self.http.get(&format!("/api/employees/{id}")).await
    }

    /// Checklist ordered by due date.
    pub async fn employee_tasks(&self, id: i64) -> Result<Vec<Task>, PushError> {
        self.http.get(&format!("/api/employees/{id}/tasks")).await
    }

    pub async fn update_task(&self, task_id: i64, update: &TaskUpdate) -> Result<Task, PushError> {
        let task: Task = self
            .http
            .fetch(HttpMethod::PATCH, &format!("/api/tasks/{task_id}"), Some(update))
            .await?;
        log::info!("[Hr] Task {} is now {}", task.id, task.status);
        Ok(task)
    }

    pub async fn submit(&self, procedure: &Procedure) -> Result<ProcedureOutcome, PushError> {
        let path = procedure.path();
        let outcome: ProcedureOutcome = match procedure {
            Procedure::Onboarding(form) => self.http.fetch(HttpMethod::POST, path, Some(form)).await?,
            Procedure::Offboarding(form) => self.http.fetch(HttpMethod::POST, path, Some(form)).await?,
            Procedure::Transfer(form) => self.http.fetch(HttpMethod::POST, path, Some(form)).await?,
        };
        log::info!(
            "[Hr] {} filed for {} ({} tasks)",
            path,
            outcome.employee.employee_id,
            outcome.tasks.len()
        );
        Ok(outcome)
    }
}
