use std::{fs, io::ErrorKind, path::Path};

use anyhow::{bail, Context};
use display_core::AnnouncePolicy;
use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "pitboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub controller_url: String,
    pub lane_count: usize,
    pub announce_policy: AnnouncePolicy,
    pub speech_command: Option<String>,
    pub speech_voice: Option<String>,
    pub announce_transitions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            controller_url: "ws://pitcaller.local/ws".into(),
            lane_count: 4,
            announce_policy: AnnouncePolicy::BothDirections,
            speech_command: None,
            speech_voice: None,
            announce_transitions: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    controller_url: Option<String>,
    lane_count: Option<usize>,
    announce_policy: Option<String>,
    speech_command: Option<String>,
    speech_voice: Option<String>,
    announce_transitions: Option<bool>,
}

/// Defaults, then `path` if it exists, then environment variables.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()));
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file_cfg.controller_url {
        settings.controller_url = v;
    }
    if let Some(v) = file_cfg.lane_count {
        settings.lane_count = v;
    }
    if let Some(v) = file_cfg.announce_policy {
        settings.announce_policy = v.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(v) = file_cfg.speech_command {
        settings.speech_command = non_empty(v);
    }
    if let Some(v) = file_cfg.speech_voice {
        settings.speech_voice = non_empty(v);
    }
    if let Some(v) = file_cfg.announce_transitions {
        settings.announce_transitions = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("PITBOARD_URL") {
        settings.controller_url = v;
    }
    if let Some(v) = var("APP__CONTROLLER_URL") {
        settings.controller_url = v;
    }

    if let Some(v) = var("APP__LANE_COUNT") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.lane_count = parsed,
            Err(err) => warn!(value = %v, %err, "ignoring APP__LANE_COUNT"),
        }
    }

    if let Some(v) = var("APP__ANNOUNCE_POLICY") {
        match v.parse::<AnnouncePolicy>() {
            Ok(parsed) => settings.announce_policy = parsed,
            Err(err) => warn!(%err, "ignoring APP__ANNOUNCE_POLICY"),
        }
    }

    if let Some(v) = var("APP__SPEECH_COMMAND") {
        settings.speech_command = non_empty(v);
    }
    if let Some(v) = var("APP__SPEECH_VOICE") {
        settings.speech_voice = non_empty(v);
    }

    if let Some(v) = var("APP__ANNOUNCE_TRANSITIONS") {
        match v.parse::<bool>() {
            Ok(parsed) => settings.announce_transitions = parsed,
            Err(err) => warn!(value = %v, %err, "ignoring APP__ANNOUNCE_TRANSITIONS"),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.lane_count == 0 {
            bail!("lane_count must be at least 1");
        }
        if self.controller_url.trim().is_empty() {
            bail!("controller_url must not be empty");
        }
        Ok(())
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
