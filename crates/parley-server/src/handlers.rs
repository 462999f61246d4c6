//! HTTP and WebSocket handlers for the Parley server.
//!
//! Each WebSocket connection gets its own task. The task attaches a bounded
//! outbound queue to the coordinator, turns inbound frames into session
//! events, and drains the queue onto the socket.

use crate::config::Config;
use crate::metrics::{self, ConnectionMetricsGuard};
use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::BytesMut;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parley_core::{
    Authenticator, ConnectionId, Credentials, Envelope, Moderation, Role, SessionCoordinator,
    SessionEvent, TrustingAuthenticator,
};
use parley_protocol::{codec, codes, Encoding, Frame};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

type WsSender = SplitSink<WebSocket, Message>;

/// Shared server state.
pub struct AppState {
    /// The session coordinator. All events are applied under this lock.
    pub coordinator: Mutex<SessionCoordinator>,
    /// Login collaborator.
    pub authenticator: Box<dyn Authenticator>,
    /// Server configuration.
    pub config: Config,
}

impl AppState {
    /// Create app state with the default authenticator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_authenticator(config, Box::new(TrustingAuthenticator))
    }

    /// Create app state with a custom authenticator.
    #[must_use]
    pub fn with_authenticator(config: Config, authenticator: Box<dyn Authenticator>) -> Self {
        let mut coordinator = SessionCoordinator::with_channels(&config.chat.default_channels);
        for admin in &config.chat.admins {
            coordinator.grant_role(admin, Role::Admin);
        }

        Self {
            coordinator: Mutex::new(coordinator),
            authenticator,
            config,
        }
    }
}

/// Build the HTTP router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route(&state.config.transport.websocket_path, get(ws_handler))
        .route("/login", post(login_handler))
        .route("/logout", get(logout_handler))
        .route("/channels", get(channels_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Run the HTTP/WebSocket server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: Config) -> Result<()> {
    config.validate()?;

    if config.metrics.enabled {
        if let Err(e) = metrics::start_metrics_server(config.metrics.port) {
            error!("Failed to start metrics server: {}", e);
        }
    }

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;

    info!("Parley server listening on {}", addr);
    info!(
        "WebSocket endpoint: ws://{}{}",
        addr, config.transport.websocket_path
    );

    serve(listener, Arc::new(AppState::new(config))).await
}

/// Serve on an already bound listener.
///
/// # Errors
///
/// Returns an error if the server stops with an I/O error.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Record the role of an authenticated user.
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> (StatusCode, Json<Value>) {
    let Some(identity) = state.authenticator.authenticate(&credentials) else {
        debug!(username = %credentials.username, "Login rejected");
        return (StatusCode::UNAUTHORIZED, Json(json!({ "success": false })));
    };

    state.coordinator.lock().await.login(&identity);
    info!(username = %identity.username, role = %identity.role, "Login");

    (StatusCode::OK, Json(json!({ "success": true })))
}

/// Log out. Roles granted at login are kept.
pub async fn logout_handler() -> Json<Value> {
    Json(json!({ "success": true }))
}

/// List known channel names.
pub async fn channels_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.coordinator.lock().await.channel_names())
}

/// WebSocket upgrade handler.
///
/// The connection's slot is reserved before the upgrade completes, so the
/// limit check and the attach happen under one coordinator lock.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    let connection_id = ConnectionId::generate();
    let (tx, outbound) = mpsc::channel::<Arc<Envelope>>(state.config.limits.outbound_buffer);

    {
        let mut coordinator = state.coordinator.lock().await;
        let connections = coordinator.stats().connections;
        if connections >= state.config.limits.max_connections {
            warn!(connections, "Connection limit reached");
            metrics::record_error("server_full");
            return (StatusCode::SERVICE_UNAVAILABLE, "Server full").into_response();
        }
        coordinator.attach(connection_id.clone(), tx);
    }

    let failed_state = Arc::clone(&state);
    let failed_id = connection_id.clone();
    ws.on_failed_upgrade(move |e| {
        warn!(connection = %failed_id, error = %e, "WebSocket upgrade failed");
        metrics::record_error("upgrade");
        tokio::spawn(async move {
            failed_state.coordinator.lock().await.disconnect(&failed_id);
        });
    })
    .on_upgrade(move |socket| handle_websocket(socket, state, connection_id, outbound))
}

/// Handle a WebSocket connection already attached to the coordinator.
async fn handle_websocket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    mut outbound: mpsc::Receiver<Arc<Envelope>>,
) {
    let _metrics_guard = ConnectionMetricsGuard::new();
    debug!(connection = %connection_id, "WebSocket connected");

    let (mut sender, mut receiver) = socket.split();

    // Replies follow the encoding of the client's latest message
    let mut encoding = Encoding::default();

    let heartbeat = u32::try_from(state.config.heartbeat.interval_ms).unwrap_or(u32::MAX);
    let connected = Frame::connected(connection_id.as_str(), heartbeat);
    if send_frame(&mut sender, &connected, encoding).await.is_err() {
        error!(connection = %connection_id, "Failed to send Connected frame");
        dispatch(&state, &connection_id, SessionEvent::Disconnect).await;
        return;
    }

    let mut read_buffer = BytesMut::with_capacity(4096);
    let max_message_size = state.config.limits.max_message_size;
    let idle_timeout = Duration::from_millis(state.config.heartbeat.timeout_ms);
    let idle = tokio::time::sleep(idle_timeout);
    tokio::pin!(idle);

    loop {
        tokio::select! {
            biased;

            envelope = outbound.recv() => {
                let Some(envelope) = envelope else {
                    // The coordinator detached us (moderation)
                    debug!(connection = %connection_id, "Connection removed by coordinator");
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                };
                if send_frame(&mut sender, &envelope_frame(&envelope), encoding).await.is_err() {
                    break;
                }
            }

            () = &mut idle => {
                debug!(connection = %connection_id, "Heartbeat timeout");
                let _ = sender.send(Message::Close(None)).await;
                break;
            }

            msg = receiver.next() => {
                idle.as_mut().reset(tokio::time::Instant::now() + idle_timeout);

                match msg {
                    Some(Ok(Message::Text(text))) => {
                        encoding = Encoding::Text;
                        metrics::record_message(text.len(), "inbound");

                        if text.len() > max_message_size {
                            reject_oversize(&mut sender, &connection_id, text.len(), encoding).await;
                            break;
                        }

                        let result = match codec::decode_text(&text) {
                            Ok(frame) => handle_frame(frame, &connection_id, &state, &mut sender, encoding).await,
                            Err(e) => reject_invalid(&mut sender, &connection_id, &e, encoding).await,
                        };
                        if result.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(data))) => {
                        encoding = Encoding::Binary;
                        metrics::record_message(data.len(), "inbound");

                        if read_buffer.len() + data.len() > max_message_size {
                            reject_oversize(&mut sender, &connection_id, data.len(), encoding).await;
                            break;
                        }
                        read_buffer.extend_from_slice(&data);

                        if drain_binary(&mut read_buffer, &connection_id, &state, &mut sender).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) => {
                        debug!(connection = %connection_id, "Received close frame");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(connection = %connection_id, error = %e, "WebSocket error");
                        metrics::record_error("websocket");
                        break;
                    }
                    None => {
                        debug!(connection = %connection_id, "WebSocket stream ended");
                        break;
                    }
                }
            }
        }
    }

    dispatch(&state, &connection_id, SessionEvent::Disconnect).await;
    debug!(connection = %connection_id, "WebSocket disconnected");
}

/// Decode and handle every complete binary frame in the buffer.
async fn drain_binary(
    read_buffer: &mut BytesMut,
    connection_id: &ConnectionId,
    state: &Arc<AppState>,
    sender: &mut WsSender,
) -> Result<()> {
    loop {
        match codec::decode_from(read_buffer) {
            Ok(Some(frame)) => {
                handle_frame(frame, connection_id, state, sender, Encoding::Binary).await?;
            }
            Ok(None) => return Ok(()),
            Err(e) => {
                read_buffer.clear();
                return reject_invalid(sender, connection_id, &e, Encoding::Binary).await;
            }
        }
    }
}

/// Handle a decoded frame.
async fn handle_frame(
    frame: Frame,
    connection_id: &ConnectionId,
    state: &Arc<AppState>,
    sender: &mut WsSender,
    encoding: Encoding,
) -> Result<()> {
    let event = match frame {
        Frame::Join { username, channel } => SessionEvent::Join { username, channel },
        Frame::Message { text, .. } => SessionEvent::Message { text },
        Frame::CreateChannel { channel } => SessionEvent::CreateChannel { channel },
        Frame::Moderate { target_user } => SessionEvent::Moderate {
            target: target_user,
        },
        Frame::Ping { timestamp } => {
            return send_frame(sender, &Frame::pong(timestamp), encoding).await;
        }
        Frame::Pong { .. } => return Ok(()),
        other => {
            warn!(connection = %connection_id, frame_type = ?other.frame_type(), "Unexpected frame type");
            let reply = Frame::error(codes::UNEXPECTED_FRAME, "Unexpected frame type");
            return send_frame(sender, &reply, encoding).await;
        }
    };

    dispatch(state, connection_id, event).await;
    Ok(())
}

/// Apply a session event under the coordinator lock.
///
/// Returns the outcome when the event was a moderation request.
async fn dispatch(
    state: &AppState,
    connection_id: &ConnectionId,
    event: SessionEvent,
) -> Option<Moderation> {
    let kind = event.kind();
    let start = Instant::now();

    let (fanout, moderation, stats) = {
        let mut coordinator = state.coordinator.lock().await;
        let (fanout, moderation) = match event {
            SessionEvent::Moderate { target } => {
                let moderation = coordinator.moderate(connection_id, &target);
                (moderation.fanout(), Some(moderation))
            }
            event => (coordinator.handle(connection_id, event), None),
        };
        (fanout, moderation, coordinator.stats())
    };

    metrics::record_event(kind);
    if let Some(moderation) = &moderation {
        metrics::record_moderation(moderation);
        debug!(connection = %connection_id, outcome = moderation.outcome(), "Moderation");
    }
    metrics::record_fanout(fanout);
    metrics::set_coordinator_stats(stats);
    metrics::record_latency(start.elapsed().as_secs_f64());

    debug!(
        connection = %connection_id,
        event = kind,
        recipients = fanout.delivered,
        "Handled event"
    );

    moderation
}

/// Reply to an undecodable frame. The connection stays open.
async fn reject_invalid(
    sender: &mut WsSender,
    connection_id: &ConnectionId,
    error: &parley_protocol::ProtocolError,
    encoding: Encoding,
) -> Result<()> {
    warn!(connection = %connection_id, error = %error, "Invalid frame");
    metrics::record_error("decode");
    send_frame(sender, &Frame::error(codes::INVALID_FRAME, error.to_string()), encoding).await
}

/// Reply to an oversize message before the connection is closed.
async fn reject_oversize(
    sender: &mut WsSender,
    connection_id: &ConnectionId,
    size: usize,
    encoding: Encoding,
) {
    warn!(connection = %connection_id, size, "Message too large");
    metrics::record_error("message_too_large");
    let reply = Frame::error(codes::MESSAGE_TOO_LARGE, "Message too large");
    let _ = send_frame(sender, &reply, encoding).await;
    let _ = sender.send(Message::Close(None)).await;
}

/// Map an envelope onto its wire frame.
fn envelope_frame(envelope: &Envelope) -> Frame {
    match envelope {
        Envelope::Chat { sender, text } => Frame::message(sender.label(), text.as_str()),
        Envelope::ChannelCreated { channel } => Frame::channel_created(channel.as_str()),
    }
}

/// Send a frame to the WebSocket.
async fn send_frame(sender: &mut WsSender, frame: &Frame, encoding: Encoding) -> Result<()> {
    let message = match encoding {
        Encoding::Text => Message::Text(codec::encode_text(frame)?),
        Encoding::Binary => Message::Binary(codec::encode(frame)?.to_vec()),
    };
    let size = match &message {
        Message::Text(text) => text.len(),
        Message::Binary(data) => data.len(),
        _ => 0,
    };
    metrics::record_message(size, "outbound");
    sender.send(message).await?;
    Ok(())
}
