use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Router,
};
use display_core::{
    websocket_url, AnnouncePolicy, AnnouncementEmitter, Connection, DisplaySession,
    LaneRenderTarget, LaneStateReducer, LaneView, SpeechError, SpeechSink,
};
use shared::{
    domain::{AnnounceEvent, LaneIndex, LaneState},
    protocol::{ClientCommand, ServerEvent},
};
use tokio::{net::TcpListener, time::timeout};

const LANES: usize = 4;

/// Scripted controller: answers each command with the resulting snapshot,
/// announces pit toggles, and hangs up after `commands` commands.
async fn scripted_controller(mut socket: WebSocket, commands: usize) {
    let mut lanes = vec![LaneState::default(); LANES];
    if send_event(&mut socket, &ServerEvent::Update { data: lanes.clone() })
        .await
        .is_err()
    {
        return;
    }

    let mut handled = 0;
    while handled < commands {
        let Some(Ok(Message::Text(text))) = socket.recv().await else {
            return;
        };
        handled += 1;
        match ClientCommand::parse(&text) {
            Ok(ClientCommand::StartPit { lane }) => {
                let state = &mut lanes[lane.0];
                state.is_pitting = !state.is_pitting;
                let announce = ServerEvent::Announce(AnnounceEvent {
                    lane,
                    pilot_name: state.pilot_name.clone(),
                    is_pitting: state.is_pitting,
                });
                let _ = send_event(&mut socket, &announce).await;
            }
            Ok(ClientCommand::Rename { lane, pilot_name }) => {
                lanes[lane.0].pilot_name = pilot_name;
            }
            Err(_) => continue,
        }
        let _ = send_event(&mut socket, &ServerEvent::Update { data: lanes.clone() }).await;
    }
    let _ = socket.send(Message::Close(None)).await;
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), axum::Error> {
    let text = serde_json::to_string(event).expect("encode event");
    socket.send(Message::Text(text)).await
}

async fn spawn_controller(commands: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route(
        "/ws",
        get(move |ws: WebSocketUpgrade| async move {
            ws.on_upgrade(move |socket| scripted_controller(socket, commands))
                .into_response()
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/ws")
}

#[derive(Clone, Default)]
struct Board(Arc<Mutex<Vec<Option<LaneView>>>>);

struct BoardLane(Board);

impl LaneRenderTarget for BoardLane {
    fn render(&mut self, lane: LaneIndex, view: &LaneView) {
        let mut lanes = self.0 .0.lock().expect("board");
        lanes[lane.0] = Some(view.clone());
    }
}

#[derive(Default)]
struct Speech(Mutex<Vec<String>>);

impl SpeechSink for Speech {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        self.0.lock().expect("speech").push(text.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn display_follows_controller_after_rename_and_pit() {
    let address = spawn_controller(3).await;
    let url = websocket_url(&address).expect("url");
    let (commands, mut frames, writer) = Connection::open(&url).await.expect("connect").split();

    let board = Board(Arc::new(Mutex::new(vec![None; LANES])));
    let targets = (0..LANES)
        .map(|_| Box::new(BoardLane(board.clone())) as Box<dyn LaneRenderTarget>)
        .collect();
    let speech = Arc::new(Speech::default());
    let mut session = DisplaySession::new(
        commands.clone(),
        LaneStateReducer::new(targets),
        AnnouncementEmitter::new(AnnouncePolicy::BothDirections, speech.clone()),
    );

    commands.rename_lane(LaneIndex(1), "Ada");
    commands.request_pit_toggle(LaneIndex(1));
    commands.rename_lane(LaneIndex(2), "Grace: Team Blue");

    let handled = timeout(Duration::from_secs(10), session.run(&mut frames))
        .await
        .expect("controller hangs up");
    writer.close().await;

    // initial snapshot + rename + announce/snapshot + rename
    assert_eq!(handled, 5);

    let lanes = board.0.lock().expect("board").clone();
    let lane2 = lanes[1].clone().expect("lane 2 rendered");
    assert_eq!(lane2.heading, "Lane 2: Ada");
    assert_eq!(lane2.control.label, "Leave Pit");
    assert!(lane2.control.emphasised);
    let lane3 = lanes[2].clone().expect("lane 3 rendered");
    assert_eq!(lane3.heading, "Lane 3: Grace: Team Blue");
    assert_eq!(lane3.name_field, "Grace: Team Blue");
    let lane1 = lanes[0].clone().expect("lane 1 rendered");
    assert_eq!(lane1.heading, "Lane 1");
    assert_eq!(lane1.control.label, "Pit");

    assert_eq!(
        speech.0.lock().expect("speech").clone(),
        vec!["Lane 2 pilot Ada is pitting".to_string()]
    );
}
