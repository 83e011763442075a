use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use display_core::{
    websocket_url, AnnouncePolicy, AnnouncementEmitter, CommandSpeechSink, Connection,
    DisplaySession, LaneStateReducer, LogSpeechSink, SpeechSink,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod input;
mod terminal;

use config::{load_settings, Settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(about = "Terminal display for the pit lane board")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Controller address: ws://, http:// or a bare host.
    #[arg(long)]
    controller_url: Option<String>,
    #[arg(long)]
    lanes: Option<usize>,
    /// "entry-only" or "both".
    #[arg(long)]
    announce_policy: Option<AnnouncePolicy>,
    /// External text-to-speech program, e.g. espeak or say.
    #[arg(long)]
    speech_command: Option<String>,
    #[arg(long)]
    speech_voice: Option<String>,
    #[arg(long)]
    announce_transitions: bool,
}

impl Args {
    fn apply(self, settings: &mut Settings) {
        if let Some(v) = self.controller_url {
            settings.controller_url = v;
        }
        if let Some(v) = self.lanes {
            settings.lane_count = v;
        }
        if let Some(v) = self.announce_policy {
            settings.announce_policy = v;
        }
        if let Some(v) = self.speech_command {
            settings.speech_command = Some(v);
        }
        if let Some(v) = self.speech_voice {
            settings.speech_voice = Some(v);
        }
        if self.announce_transitions {
            settings.announce_transitions = true;
        }
    }
}

fn speech_sink(settings: &Settings) -> Arc<dyn SpeechSink> {
    match &settings.speech_command {
        Some(program) => Arc::new(
            CommandSpeechSink::new(program.clone()).with_voice(settings.speech_voice.clone()),
        ),
        None => Arc::new(LogSpeechSink),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    args.apply(&mut settings);
    settings.validate()?;

    let url = websocket_url(&settings.controller_url)?;
    let connection = Connection::open(&url)
        .await
        .with_context(|| format!("controller unreachable at {url}"))?;
    let (commands, mut frames, writer) = connection.split();

    let emitter = AnnouncementEmitter::new(settings.announce_policy, speech_sink(&settings));
    let mut session = DisplaySession::new(
        commands.clone(),
        LaneStateReducer::new(terminal::lane_targets(settings.lane_count)),
        emitter,
    )
    .with_transition_announcements(settings.announce_transitions);

    info!(
        lanes = settings.lane_count,
        policy = %settings.announce_policy,
        "pitboard ready; {}",
        input::USAGE
    );

    let mut input_task = tokio::spawn(input::read_intents(
        input::stdin_lines(),
        commands,
        session.lane_count(),
    ));

    tokio::select! {
        _ = session.run(&mut frames) => {}
        _ = &mut input_task => info!("input closed; leaving"),
    }

    input_task.abort();
    writer.close().await;
    Ok(())
}
