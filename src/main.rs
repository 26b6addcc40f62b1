use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hr_push::{
    cfg::{get_config, init_config},
    controller::PushController,
    hr::{
        model::{TaskStatus, TaskUpdate},
        svc::Hr,
    },
    http_client::HttpClient,
    notification::svc::Notification,
    platform::{Alert, Navigator, ShownNotification, memory::MemoryWorker},
    worker::{
        event::{PushMessageData, WorkerEvent},
        svc::ServiceWorker,
    },
};

#[derive(Parser)]
#[command(name = "hr-push", about = "HR procedure tracker: push notifications and task checklists")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the server's web-push public key
    PublicKey,
    /// Ask the server to push reminders for tasks due soon
    NotifyUpcoming {
        /// Window in hours (defaults to HR_NOTIFY_HOURS)
        #[arg(long)]
        hours: Option<u32>,
    },
    /// List employees
    Employees,
    /// Show an employee's task checklist
    Tasks { employee: i64 },
    /// Change a task's status (todo, in-progress, done, or any label)
    SetStatus { task: i64, status: TaskStatus },
    /// Run a push payload through the worker and print the notification
    SimulatePush {
        payload: Option<String>,
        /// Number of open windows when the notification is clicked
        #[arg(long, default_value_t = 0)]
        open_windows: usize,
    },
}

struct ConsoleAlert;

impl Alert for ConsoleAlert {
    fn alert(&self, message: &str) {
        println!("{message}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    init_config()?;
    let cli = Cli::parse();
    let config = get_config();

    let http = HttpClient::new(&config.api_url).context("failed to build http client")?;
    match cli.command {
        Command::PublicKey => {
            let notification = Notification::new(Navigator::default(), http, config.worker.clone());
            println!("{}", notification.public_key().await?);
        }
        Command::NotifyUpcoming { hours } => {
            let notification = Notification::new(Navigator::default(), http, config.worker.clone());
            let controller = PushController::new(notification, Arc::new(ConsoleAlert));
            controller
                .notify_upcoming(hours.unwrap_or(config.notify_hours))
                .await?;
        }
        Command::Employees => {
            for e in Hr::new(http).list_employees().await? {
                println!(
                    "{:>4}  {}  {} ({}) / {}",
                    e.id,
                    e.employee_id,
                    e.full_name,
                    e.status,
                    e.department.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Tasks { employee } => {
            for t in Hr::new(http).employee_tasks(employee).await? {
                println!(
                    "{:>4}  {}  {:<8} {}  [{}]",
                    t.id,
                    t.due_date.format("%Y-%m-%d %H:%M"),
                    t.assignee.as_deref().unwrap_or("-"),
                    t.name,
                    t.status
                );
            }
        }
        Command::SetStatus { task, status } => {
            let update = TaskUpdate {
                status: Some(status),
                ..TaskUpdate::default()
            };
            let task = Hr::new(http).update_task(task, &update).await?;
            println!("{} -> {}", task.name, task.status);
        }
        Command::SimulatePush {
            payload,
            open_windows,
        } => simulate_push(payload, open_windows).await?,
    }
    Ok(())
}

async fn simulate_push(payload: Option<String>, open_windows: usize) -> Result<()> {
    let global = MemoryWorker::new();
    for _ in 0..open_windows {
        global.add_client(&get_config().worker.app_root);
    }
    let worker = ServiceWorker::new(global.clone(), get_config().worker.clone());

    worker.dispatch(WorkerEvent::Install).await?;
    worker.dispatch(WorkerEvent::Activate).await?;
    worker
        .dispatch(WorkerEvent::Push(payload.map(PushMessageData::new)))
        .await?;

    let shown: ShownNotification = global
        .shown()
        .pop()
        .context("worker showed no notification")?;
    println!("title: {}", shown.title);
    println!("body:  {}", shown.options.body);
    println!("data:  {}", serde_json::Value::Object(shown.options.data.clone()));

    worker.dispatch(WorkerEvent::NotificationClick(shown)).await?;
    for id in global.focused() {
        println!("click: focused {id}");
    }
    for url in global.opened() {
        println!("click: opened {url}");
    }
    Ok(())
}
