use lambda_http::{Body, Request, RequestExt, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use smart_home_backend::shared::device::DeviceKind;
use smart_home_backend::shared::error::CoreError;
use smart_home_backend::shared::notifications::event_types;
use smart_home_backend::shared::scheduler::{ScheduledTask, TaskAction};
use smart_home_backend::shared::validators::validate_brightness;

use crate::auth::session_user;
use crate::error::{ApiError, ValidationError};
use crate::state::AppState;

/// Request payload for POST /schedule
#[derive(Debug, Deserialize)]
pub struct ScheduleTaskRequest {
    pub device_id: Option<String>,
    pub action: Option<String>,
    pub scheduled_time: Option<String>,
    pub brightness: Option<i64>,
}

/// Response payload for GET /schedule
#[derive(Debug, Serialize)]
pub struct ListTasksResponse {
    pub tasks: Vec<ScheduledTask>,
}

/// Response payload for DELETE /schedule/{task_id}
#[derive(Debug, Serialize)]
pub struct CancelTaskResponse {
    pub success: bool,
    pub task_id: String,
}

/// One task processed by a due sweep
#[derive(Debug, Serialize)]
pub struct ExecutedTask {
    #[serde(flatten)]
    pub task: ScheduledTask,
    /// Whether the action reached the device. False when the device has been
    /// removed or no longer matches the action.
    pub applied: bool,
}

/// Response payload for POST /schedule/run
#[derive(Debug, Serialize)]
pub struct RunDueResponse {
    pub executed: Vec<ExecutedTask>,
}

/// Handler for GET /schedule
pub async fn list_tasks(event: Request, state: &AppState) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(request_id = %request_id, "Processing list tasks request");

    session_user(&event, state)?;
    let tasks = state.scheduler.tasks();

    super::json_response(200, &ListTasksResponse { tasks })
}

/// Handler for POST /schedule
pub async fn create_task(event: Request, state: &AppState) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(request_id = %request_id, "Processing create task request");

    let user = session_user(&event, state)?;
    let request: ScheduleTaskRequest = super::parse_body(&event, &request_id)?;

    let device_id = request
        .device_id
        .ok_or_else(|| ValidationError::MissingField("device_id".to_string()))?;
    let action = request
        .action
        .ok_or_else(|| ValidationError::MissingField("action".to_string()))?;
    let scheduled_time = request
        .scheduled_time
        .ok_or_else(|| ValidationError::MissingField("scheduled_time".to_string()))?;

    // The target must be on the caller's dashboard at scheduling time
    if !state.dashboards.contains_device(&user.user_id, &device_id) {
        return Err(CoreError::DeviceNotFound.into());
    }

    let action: TaskAction = action.parse()?;
    let brightness = match action {
        TaskAction::SetBrightness => {
            let level = request
                .brightness
                .ok_or_else(|| ValidationError::MissingField("brightness".to_string()))?;
            validate_brightness(level)?;
            Some(level as u8)
        }
        _ => None,
    };

    let task = ScheduledTask::new(
        state.ids.next_id(),
        device_id,
        action,
        scheduled_time,
        brightness,
        state.clock.now_rfc3339(),
    );
    state.scheduler.schedule(task.clone());

    info!(
        request_id = %request_id,
        task_id = %task.task_id,
        device_id = %task.device_id,
        action = %task.action,
        "Task scheduled"
    );

    state.notifications.publish(
        format!("Scheduled {} for {}", task.action, task.device_id),
        task.device_id.clone(),
        event_types::TASK_SCHEDULED,
        serde_json::json!({"task_id": task.task_id, "scheduled_time": task.scheduled_time}),
        state.clock.as_ref(),
    );

    super::json_response(201, &task)
}

/// Handler for DELETE /schedule/{task_id}
pub async fn cancel_task(
    event: Request,
    state: &AppState,
    task_id: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        task_id = %task_id,
        "Processing cancel task request"
    );

    session_user(&event, state)?;
    let task = state.scheduler.get(task_id);
    if !state.scheduler.cancel(task_id) {
        return Err(CoreError::TaskNotFound.into());
    }

    if let Some(task) = task {
        state.notifications.publish(
            format!("Cancelled {} for {}", task.action, task.device_id),
            task.device_id,
            event_types::TASK_CANCELLED,
            serde_json::json!({"task_id": task_id}),
            state.clock.as_ref(),
        );
    }

    super::json_response(
        200,
        &CancelTaskResponse {
            success: true,
            task_id: task_id.to_string(),
        },
    )
}

/// Handler for POST /schedule/run.
///
/// Marks every due task executed and applies its action to the caller's
/// dashboard. A task whose device has disappeared still counts as executed;
/// it just does not apply.
pub async fn run_due(event: Request, state: &AppState) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(request_id = %request_id, "Processing due task sweep");

    let user = session_user(&event, state)?;
    let due = state.scheduler.run_due(state.clock.as_ref());

    let mut executed = Vec::with_capacity(due.len());
    for task in due {
        let applied = apply_task(state, &user.user_id, &task).is_ok();
        if applied {
            state.notifications.publish(
                format!("Executed {} for {}", task.action, task.device_id),
                task.device_id.clone(),
                event_types::TASK_EXECUTED,
                serde_json::json!({"task_id": task.task_id}),
                state.clock.as_ref(),
            );
        } else {
            warn!(
                request_id = %request_id,
                task_id = %task.task_id,
                device_id = %task.device_id,
                "Due task could not be applied"
            );
        }
        executed.push(ExecutedTask { task, applied });
    }

    info!(
        request_id = %request_id,
        count = executed.len(),
        "Due sweep finished"
    );

    super::json_response(200, &RunDueResponse { executed })
}

fn apply_task(state: &AppState, user_id: &str, task: &ScheduledTask) -> Result<(), CoreError> {
    state
        .dashboards
        .with_device_mut(user_id, &task.device_id, |device| match task.action {
            TaskAction::TurnOn => {
                device.turn_on();
                Ok(())
            }
            TaskAction::TurnOff => {
                device.turn_off();
                Ok(())
            }
            TaskAction::SetBrightness => {
                let light = device
                    .as_light_mut()
                    .ok_or_else(|| CoreError::WrongDeviceKind {
                        device_id: task.device_id.clone(),
                        expected: DeviceKind::Light,
                    })?;
                // Brightness is validated at scheduling time
                light.set_brightness(i64::from(task.brightness.unwrap_or(100)))
            }
        })
}
