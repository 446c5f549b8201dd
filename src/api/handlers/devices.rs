use lambda_http::{Body, Request, RequestExt, Response};
use serde::{Deserialize, Serialize};
use tracing::info;

use smart_home_backend::shared::device::{DeviceConfig, DeviceKind, DeviceSnapshot};
use smart_home_backend::shared::error::CoreError;
use smart_home_backend::shared::factory::DeviceSpec;
use smart_home_backend::shared::notifications::event_types;

use crate::auth::session_user;
use crate::error::{ApiError, ValidationError};
use crate::state::AppState;

/// Request payload for POST /devices
#[derive(Debug, Deserialize)]
pub struct AddDeviceRequest {
    pub device_type: Option<String>,
    pub device_name: Option<String>,
}

/// Request payload for PUT /devices/{id}/light/brightness
#[derive(Debug, Deserialize)]
pub struct BrightnessRequest {
    pub brightness: Option<i64>,
}

/// Request payload for POST /devices/{id}/power
#[derive(Debug, Deserialize)]
pub struct PowerRequest {
    pub on: Option<bool>,
}

/// Response payload for GET /devices
#[derive(Debug, Serialize)]
pub struct ListDevicesResponse {
    pub devices: Vec<DeviceSnapshot>,
}

/// Response payload for POST /devices/{id}/toggle
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub device_id: String,
    pub is_on: bool,
    pub status: String,
}

/// Response payload for DELETE /devices/{id}
#[derive(Debug, Serialize)]
pub struct RemoveDeviceResponse {
    pub success: bool,
    pub device_id: String,
    pub message: String,
}

/// Response payload for the camera recording routes
#[derive(Debug, Serialize)]
pub struct RecordingResponse {
    pub device_id: String,
    pub recording: bool,
    pub status: String,
}

/// Response payload for POST /devices/{id}/camera/capture
#[derive(Debug, Serialize)]
pub struct CaptureResponse {
    pub device_id: String,
    pub image: String,
}

/// Handler for GET /devices
pub async fn list_devices(event: Request, state: &AppState) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(request_id = %request_id, "Processing list devices request");

    let user = session_user(&event, state)?;
    let devices = state.dashboards.list_devices(&user.user_id);

    info!(
        request_id = %request_id,
        user_id = %user.user_id,
        count = devices.len(),
        "Listing dashboard devices"
    );

    super::json_response(200, &ListDevicesResponse { devices })
}

/// Handler for POST /devices
pub async fn add_device(event: Request, state: &AppState) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(request_id = %request_id, "Processing add device request");

    let user = session_user(&event, state)?;
    let request: AddDeviceRequest = super::parse_body(&event, &request_id)?;
    let device_type = request
        .device_type
        .ok_or_else(|| ValidationError::MissingField("device_type".to_string()))?;

    let spec = DeviceSpec {
        device_id: None,
        device_name: request.device_name,
    };
    let device = state
        .registry
        .create(&device_type, spec, state.ids.as_ref())?;
    let snapshot = state.dashboards.add_device(&user.user_id, device)?;

    info!(
        request_id = %request_id,
        user_id = %user.user_id,
        device_id = %snapshot.device_id,
        device_type = %snapshot.device_type,
        "Device added to dashboard"
    );

    state.notifications.publish(
        format!("New device added: {}", snapshot.device_name),
        snapshot.device_id.clone(),
        event_types::DEVICE_ADDED,
        serde_json::json!({"device_type": snapshot.device_type}),
        state.clock.as_ref(),
    );

    super::json_response(201, &snapshot)
}

/// Handler for DELETE /devices/{id}
pub async fn remove_device(
    event: Request,
    state: &AppState,
    device_id: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        device_id = %device_id,
        "Processing remove device request"
    );

    let user = session_user(&event, state)?;
    let device_name = state.dashboards.device_name(&user.user_id, device_id);
    state.dashboards.remove_device(&user.user_id, device_id)?;

    state.notifications.publish(
        format!(
            "Device removed: {}",
            device_name.as_deref().unwrap_or(device_id)
        ),
        device_id,
        event_types::DEVICE_REMOVED,
        serde_json::Value::Null,
        state.clock.as_ref(),
    );

    super::json_response(
        200,
        &RemoveDeviceResponse {
            success: true,
            device_id: device_id.to_string(),
            message: "Device removed".to_string(),
        },
    )
}

/// Handler for POST /devices/{id}/toggle
pub async fn toggle_device(
    event: Request,
    state: &AppState,
    device_id: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        device_id = %device_id,
        "Processing toggle request"
    );

    let user = session_user(&event, state)?;
    let (is_on, status) = state
        .dashboards
        .with_device_mut(&user.user_id, device_id, |device| {
            let light = device
                .as_light_mut()
                .ok_or_else(|| CoreError::WrongDeviceKind {
                    device_id: device_id.to_string(),
                    expected: DeviceKind::Light,
                })?;
            let is_on = light.toggle();
            Ok((is_on, light.base.status.clone()))
        })?;

    state.notifications.publish(
        format!(
            "Light {} turned {}",
            device_id,
            if is_on { "on" } else { "off" }
        ),
        device_id,
        event_types::DEVICE_TOGGLED,
        serde_json::json!({"is_on": is_on}),
        state.clock.as_ref(),
    );

    super::json_response(
        200,
        &ToggleResponse {
            device_id: device_id.to_string(),
            is_on,
            status,
        },
    )
}

/// Handler for PUT /devices/{id}/light/brightness
pub async fn set_brightness(
    event: Request,
    state: &AppState,
    device_id: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        device_id = %device_id,
        "Processing set brightness request"
    );

    let user = session_user(&event, state)?;
    let request: BrightnessRequest = super::parse_body(&event, &request_id)?;
    let brightness = request
        .brightness
        .ok_or_else(|| ValidationError::MissingField("brightness".to_string()))?;

    let snapshot = state
        .dashboards
        .with_device_mut(&user.user_id, device_id, |device| {
            let light = device
                .as_light_mut()
                .ok_or_else(|| CoreError::WrongDeviceKind {
                    device_id: device_id.to_string(),
                    expected: DeviceKind::Light,
                })?;
            light.set_brightness(brightness)?;
            Ok(device.snapshot())
        })?;

    state.notifications.publish(
        format!("Brightness of {} set to {}", device_id, brightness),
        device_id,
        event_types::BRIGHTNESS_CHANGED,
        serde_json::json!({"brightness": brightness}),
        state.clock.as_ref(),
    );

    super::json_response(200, &snapshot)
}

/// Handler for POST /devices/{id}/power
pub async fn set_power(
    event: Request,
    state: &AppState,
    device_id: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        device_id = %device_id,
        "Processing set power request"
    );

    let user = session_user(&event, state)?;
    let request: PowerRequest = super::parse_body(&event, &request_id)?;
    let on = request
        .on
        .ok_or_else(|| ValidationError::MissingField("on".to_string()))?;

    let snapshot = state
        .dashboards
        .with_device_mut(&user.user_id, device_id, |device| {
            if on {
                device.turn_on();
            } else {
                device.turn_off();
            }
            Ok(device.snapshot())
        })?;

    state.notifications.publish(
        format!("{} powered {}", device_id, if on { "on" } else { "off" }),
        device_id,
        event_types::POWER_CHANGED,
        serde_json::json!({"on": on}),
        state.clock.as_ref(),
    );

    super::json_response(200, &snapshot)
}

/// Handler for PUT /devices/{id}/config
pub async fn configure_device(
    event: Request,
    state: &AppState,
    device_id: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        device_id = %device_id,
        "Processing configure device request"
    );

    let user = session_user(&event, state)?;
    let config: DeviceConfig = super::parse_body(&event, &request_id)?;

    let snapshot = state
        .dashboards
        .with_device_mut(&user.user_id, device_id, |device| {
            device.apply(config)?;
            Ok(device.snapshot())
        })?;

    state.notifications.publish(
        format!("Device {} reconfigured", device_id),
        device_id,
        event_types::DEVICE_CONFIGURED,
        serde_json::Value::Null,
        state.clock.as_ref(),
    );

    super::json_response(200, &snapshot)
}

/// Handler for POST /devices/{id}/camera/start-recording
pub async fn start_recording(
    event: Request,
    state: &AppState,
    device_id: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        device_id = %device_id,
        "Processing start recording request"
    );

    let user = session_user(&event, state)?;
    let (started, recording, status) =
        state
            .dashboards
            .with_device_mut(&user.user_id, device_id, |device| {
                let camera =
                    device
                        .as_camera_mut()
                        .ok_or_else(|| CoreError::WrongDeviceKind {
                            device_id: device_id.to_string(),
                            expected: DeviceKind::SecurityCamera,
                        })?;
                let started = camera.start_recording();
                Ok((started, camera.recording, camera.base.status.clone()))
            })?;

    if started {
        state.notifications.publish(
            format!("Camera {} started recording", device_id),
            device_id,
            event_types::RECORDING_STARTED,
            serde_json::Value::Null,
            state.clock.as_ref(),
        );
    }

    super::json_response(
        200,
        &RecordingResponse {
            device_id: device_id.to_string(),
            recording,
            status,
        },
    )
}

/// Handler for POST /devices/{id}/camera/stop-recording
pub async fn stop_recording(
    event: Request,
    state: &AppState,
    device_id: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        device_id = %device_id,
        "Processing stop recording request"
    );

    let user = session_user(&event, state)?;
    let (stopped, recording, status) =
        state
            .dashboards
            .with_device_mut(&user.user_id, device_id, |device| {
                let camera =
                    device
                        .as_camera_mut()
                        .ok_or_else(|| CoreError::WrongDeviceKind {
                            device_id: device_id.to_string(),
                            expected: DeviceKind::SecurityCamera,
                        })?;
                let stopped = camera.stop_recording();
                Ok((stopped, camera.recording, camera.base.status.clone()))
            })?;

    if stopped {
        state.notifications.publish(
            format!("Camera {} stopped recording", device_id),
            device_id,
            event_types::RECORDING_STOPPED,
            serde_json::Value::Null,
            state.clock.as_ref(),
        );
    }

    super::json_response(
        200,
        &RecordingResponse {
            device_id: device_id.to_string(),
            recording,
            status,
        },
    )
}

/// Handler for POST /devices/{id}/camera/capture
pub async fn capture_image(
    event: Request,
    state: &AppState,
    device_id: &str,
) -> Result<Response<Body>, ApiError> {
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        device_id = %device_id,
        "Processing capture image request"
    );

    let user = session_user(&event, state)?;
    let image = state
        .dashboards
        .with_device_mut(&user.user_id, device_id, |device| {
            let camera = device
                .as_camera_mut()
                .ok_or_else(|| CoreError::WrongDeviceKind {
                    device_id: device_id.to_string(),
                    expected: DeviceKind::SecurityCamera,
                })?;
            camera.capture_image()
        })?;

    state.notifications.publish(
        format!("Camera {} captured {}", device_id, image),
        device_id,
        event_types::IMAGE_CAPTURED,
        serde_json::json!({"image": image}),
        state.clock.as_ref(),
    );

    super::json_response(
        200,
        &CaptureResponse {
            device_id: device_id.to_string(),
            image,
        },
    )
}
