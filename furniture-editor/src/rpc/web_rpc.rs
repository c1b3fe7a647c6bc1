use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tools::furniture::catalog::FurnitureType;
use crate::tools::furniture::commands::EditorCommand;
use crate::tools::furniture::{EditorSession, LayoutChanged};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following the 2.0 error object layout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Standard RPC error codes and constructors.
impl RpcError {
    /// `-32601`: the host asked for a method the editor does not offer.
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    /// `-32602`: missing or malformed params, or an unknown furniture type.
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    /// `-32603`: the editor failed to build a result.
    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Resource managing traffic between the host page and the editor.
/// Outgoing notifications and responses are flushed to the host page each frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the JSON-RPC layer for embedding the editor in a page.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    notify_layout_changed,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

/// Register the `message` listener that feeds the shared queue.
#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::{Arc, Mutex};

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("Window object not available, RPC disabled");
        return;
    };
    if let Err(e) = window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref()) {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    // Listener lives as long as the page.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Messages received by the page listener, drained once per frame.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing an incoming RPC message from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

/// Move messages queued by the page listener into Bevy events.
fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage { content: message_str });
    }
}

/// Parse incoming messages, answer requests and forward editor commands.
fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    session: Res<EditorSession>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut editor_commands: EventWriter<EditorCommand>,
) {
    let mut issued = Vec::new();

    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("RPC request: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &session, &mut issued) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => warn!("Ignoring malformed RPC message: {}", parse_error),
        }
    }

    editor_commands.write_batch(issued);
}

/// Answer one request. Commands it triggers are pushed to `issued`; requests
/// without an id still run but get no response.
pub fn handle_rpc_request(
    request: &RpcRequest,
    session: &EditorSession,
    issued: &mut Vec<EditorCommand>,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "add_furniture" => handle_add_furniture(&request.params, issued),
        "clear_layout" => {
            issued.push(EditorCommand::ClearLayout);
            Ok(serde_json::json!({ "success": true }))
        }
        "logout" => {
            issued.push(EditorCommand::Logout);
            Ok(serde_json::json!({ "success": true }))
        }
        "get_layout" => handle_get_layout(session),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError::method_not_found(&request.method))
        }
    };

    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

/// Handle `add_furniture` with type validation before any command is issued.
fn handle_add_furniture(
    params: &serde_json::Value,
    issued: &mut Vec<EditorCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct AddFurnitureParams {
        #[serde(rename = "type")]
        furniture_type: String,
        x: Option<f32>,
        z: Option<f32>,
        #[serde(rename = "rotationY", default)]
        rotation_y: f32,
    }

    let add = serde_json::from_value::<AddFurnitureParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'type' parameter"))?;

    add.furniture_type
        .parse::<FurnitureType>()
        .map_err(|err| RpcError::invalid_params(&err.to_string()))?;

    let position = match (add.x, add.z) {
        (Some(x), Some(z)) => Some(Vec2::new(x, z)),
        (None, None) => None,
        _ => return Err(RpcError::invalid_params("'x' and 'z' must be given together")),
    };

    info!("Add furniture requested over RPC: {}", add.furniture_type);
    issued.push(EditorCommand::Add {
        tag: add.furniture_type.clone(),
        position,
        rotation_y: add.rotation_y,
    });

    Ok(serde_json::json!({
        "success": true,
        "type": add.furniture_type
    }))
}

/// Handle `get_layout` by returning the records a save would write.
fn handle_get_layout(session: &EditorSession) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(session.records()).map_err(|err| RpcError::internal_error(&err.to_string()))
}

/// `layout_changed` params for a frame's changes, if any of them reached storage.
pub fn layout_notification<'a>(
    changes: impl IntoIterator<Item = &'a LayoutChanged>,
    count: usize,
) -> Option<serde_json::Value> {
    changes
        .into_iter()
        .any(|change| change.is_committed())
        .then(|| serde_json::json!({ "count": count }))
}

/// Tell the host page how many items remain after each stored change.
fn notify_layout_changed(
    mut changes: EventReader<LayoutChanged>,
    session: Res<EditorSession>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if let Some(params) = layout_notification(changes.read(), session.registry().len()) {
        rpc_interface.send_notification("layout_changed", params);
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}
