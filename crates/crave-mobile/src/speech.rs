//! Speech-to-text dictation helpers for the logging screen.
#![cfg_attr(not(target_os = "android"), allow(dead_code))]

use serde::Deserialize;
use thiserror::Error;

#[cfg(target_os = "android")]
use dioxus::document;

const REQUEST_PERMISSION_SCRIPT: &str = r#"
(() => {
    if (!navigator.mediaDevices || !navigator.mediaDevices.getUserMedia) {
        return { ok: false, kind: "unavailable", error: "Microphone capture is unavailable in this runtime." };
    }
    return (async () => {
        try {
            const stream = await navigator.mediaDevices.getUserMedia({ audio: true });
            for (const track of stream.getTracks()) {
                track.stop();
            }
            return { ok: true, granted: true };
        } catch (error) {
            const name = error && error.name ? error.name : "";
            if (name === "NotAllowedError" || name === "SecurityError") {
                return { ok: true, granted: false };
            }
            return {
                ok: false,
                kind: "audio",
                error: error && error.message ? error.message : String(error),
            };
        }
    })();
})()
"#;

const START_DICTATION_SCRIPT: &str = r#"
(() => {
    const state = window.__craveDictation;
    if (state && state.recognition) {
        return { ok: false, kind: "recognition", error: "Dictation is already running." };
    }

    const Recognizer = window.SpeechRecognition || window.webkitSpeechRecognition;
    if (!Recognizer) {
        return { ok: false, kind: "unavailable", error: "Speech recognition is unavailable in this runtime." };
    }

    try {
        const recognition = new Recognizer();
        recognition.continuous = true;
        recognition.interimResults = false;

        const session = { recognition, segments: [], lastKind: null, lastError: null };

        recognition.onresult = (event) => {
            for (let i = event.resultIndex; i < event.results.length; i += 1) {
                const result = event.results[i];
                if (result.isFinal && result[0] && result[0].transcript) {
                    session.segments.push(result[0].transcript);
                }
            }
        };
        recognition.onerror = (event) => {
            const code = event.error || "unknown";
            if (code === "not-allowed" || code === "service-not-allowed") {
                session.lastKind = "not-authorized";
            } else if (code === "audio-capture") {
                session.lastKind = "audio";
            } else {
                session.lastKind = "recognition";
            }
            session.lastError = "Speech recognition error: " + code;
        };

        recognition.start();
        window.__craveDictation = session;
        return { ok: true };
    } catch (error) {
        window.__craveDictation = null;
        return {
            ok: false,
            kind: "audio",
            error: error && error.message ? error.message : String(error),
        };
    }
})()
"#;

const DRAIN_TRANSCRIPTS_SCRIPT: &str = r#"
(() => {
    const state = window.__craveDictation;
    if (!state) {
        return { ok: true, segments: [] };
    }
    if (state.lastKind) {
        const kind = state.lastKind;
        const error = state.lastError;
        state.lastKind = null;
        state.lastError = null;
        return { ok: false, kind, error };
    }
    return { ok: true, segments: state.segments.splice(0) };
})()
"#;

const STOP_DICTATION_SCRIPT: &str = r#"
(() => {
    const state = window.__craveDictation;
    window.__craveDictation = null;
    if (!state || !state.recognition) {
        return { ok: true, segments: [] };
    }

    try {
        state.recognition.onresult = null;
        state.recognition.onerror = null;
        state.recognition.stop();
        return { ok: true, segments: state.segments.splice(0) };
    } catch (error) {
        return {
            ok: false,
            kind: "recognition",
            error: error && error.message ? error.message : String(error),
        };
    }
})()
"#;

/// Typed dictation failure reasons, each with a displayable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("Speech recognition permission was denied.")]
    NotAuthorized,
    #[error("Speech recognition is unavailable on this device.")]
    RecognizerUnavailable,
    #[error("Audio session failed: {0}")]
    AudioSession(String),
    #[error("Speech recognition failed: {0}")]
    Recognition(String),
}

/// Dictation control state for the logging screen UX.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DictationState {
    /// Recognizer is idle and ready for a new session.
    #[default]
    Idle,
    /// Start has been requested and is awaiting recognizer initialization.
    Starting,
    /// Recognizer is actively listening and delivering transcripts.
    Listening,
    /// Stop has been requested and the session is being torn down.
    Stopping,
}

/// Discrete state-machine events for dictation transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DictationEvent {
    StartRequested,
    StartSucceeded,
    StartFailed,
    StopRequested,
    StopSucceeded,
    StopFailed,
    RecognizerFailed,
}

/// Deterministic dictation state transition helper.
#[must_use]
pub const fn transition_dictation_state(
    state: DictationState,
    event: DictationEvent,
) -> DictationState {
    match (state, event) {
        (DictationState::Idle, DictationEvent::StartRequested) => DictationState::Starting,
        (DictationState::Starting, DictationEvent::StartSucceeded) => DictationState::Listening,
        (DictationState::Starting, DictationEvent::StartFailed)
        | (
            DictationState::Stopping,
            DictationEvent::StopSucceeded | DictationEvent::StopFailed,
        )
        | (_, DictationEvent::RecognizerFailed) => DictationState::Idle,
        (DictationState::Listening, DictationEvent::StopRequested) => DictationState::Stopping,
        _ => state,
    }
}

/// Merge a delivered transcript segment into the description draft.
#[must_use]
pub fn merge_transcript(existing: &str, segment: &str) -> String {
    let segment = segment.trim();
    if segment.is_empty() {
        return existing.to_string();
    }
    if existing.is_empty() {
        return segment.to_string();
    }
    if existing.ends_with(char::is_whitespace) {
        format!("{existing}{segment}")
    } else {
        format!("{existing} {segment}")
    }
}

#[derive(Debug, Deserialize)]
struct PermissionResult {
    ok: bool,
    #[serde(default)]
    granted: bool,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DictationResult {
    ok: bool,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DrainResult {
    ok: bool,
    #[serde(default)]
    segments: Vec<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Ask for microphone/speech permission; `Ok(false)` means denied.
#[cfg(target_os = "android")]
pub async fn request_speech_permission() -> Result<bool, SpeechError> {
    let result: PermissionResult = document::eval(REQUEST_PERMISSION_SCRIPT)
        .join()
        .await
        .map_err(|error| {
            SpeechError::Recognition(format!("Failed to query speech permission: {error}"))
        })?;
    parse_permission_result(result)
}

/// Start a dictation session.
#[cfg(target_os = "android")]
pub async fn start_dictation() -> Result<(), SpeechError> {
    let result: DictationResult = document::eval(START_DICTATION_SCRIPT)
        .join()
        .await
        .map_err(|error| SpeechError::Recognition(format!("Failed to start dictation: {error}")))?;
    parse_dictation_result(result)
}

/// Drain transcript segments delivered since the last call.
#[cfg(target_os = "android")]
pub async fn drain_transcripts() -> Result<Vec<String>, SpeechError> {
    let result: DrainResult = document::eval(DRAIN_TRANSCRIPTS_SCRIPT)
        .join()
        .await
        .map_err(|error| SpeechError::Recognition(format!("Failed to read transcripts: {error}")))?;
    parse_drain_result(result)
}

/// Stop the dictation session, returning any residual segments.
#[cfg(target_os = "android")]
pub async fn stop_dictation() -> Result<Vec<String>, SpeechError> {
    let result: DrainResult = document::eval(STOP_DICTATION_SCRIPT)
        .join()
        .await
        .map_err(|error| SpeechError::Recognition(format!("Failed to stop dictation: {error}")))?;
    parse_drain_result(result)
}

/// Ask for microphone/speech permission; `Ok(false)` means denied.
#[cfg(not(target_os = "android"))]
pub async fn request_speech_permission() -> Result<bool, SpeechError> {
    std::future::ready(()).await;
    Err(SpeechError::RecognizerUnavailable)
}

/// Start a dictation session.
#[cfg(not(target_os = "android"))]
pub async fn start_dictation() -> Result<(), SpeechError> {
    std::future::ready(()).await;
    Err(SpeechError::RecognizerUnavailable)
}

/// Drain transcript segments delivered since the last call.
#[cfg(not(target_os = "android"))]
pub async fn drain_transcripts() -> Result<Vec<String>, SpeechError> {
    std::future::ready(()).await;
    Err(SpeechError::RecognizerUnavailable)
}

/// Stop the dictation session, returning any residual segments.
#[cfg(not(target_os = "android"))]
pub async fn stop_dictation() -> Result<Vec<String>, SpeechError> {
    std::future::ready(()).await;
    Err(SpeechError::RecognizerUnavailable)
}

fn speech_error_from_parts(kind: Option<String>, error: Option<String>) -> SpeechError {
    let message = error.unwrap_or_else(|| "Speech recognition failed.".to_string());
    match kind.as_deref() {
        Some("not-authorized") => SpeechError::NotAuthorized,
        Some("unavailable") => SpeechError::RecognizerUnavailable,
        Some("audio") => SpeechError::AudioSession(message),
        _ => SpeechError::Recognition(message),
    }
}

fn parse_permission_result(result: PermissionResult) -> Result<bool, SpeechError> {
    if result.ok {
        Ok(result.granted)
    } else {
        Err(speech_error_from_parts(result.kind, result.error))
    }
}

fn parse_dictation_result(result: DictationResult) -> Result<(), SpeechError> {
    if result.ok {
        Ok(())
    } else {
        Err(speech_error_from_parts(result.kind, result.error))
    }
}

fn parse_drain_result(result: DrainResult) -> Result<Vec<String>, SpeechError> {
    if result.ok {
        Ok(result.segments)
    } else {
        Err(speech_error_from_parts(result.kind, result.error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictation_state_machine_covers_start_and_stop() {
        let state =
            transition_dictation_state(DictationState::Idle, DictationEvent::StartRequested);
        assert_eq!(state, DictationState::Starting);

        let state = transition_dictation_state(state, DictationEvent::StartSucceeded);
        assert_eq!(state, DictationState::Listening);

        let state = transition_dictation_state(state, DictationEvent::StopRequested);
        assert_eq!(state, DictationState::Stopping);

        let state = transition_dictation_state(state, DictationEvent::StopSucceeded);
        assert_eq!(state, DictationState::Idle);
    }

    #[test]
    fn dictation_state_machine_handles_failures() {
        let state =
            transition_dictation_state(DictationState::Starting, DictationEvent::StartFailed);
        assert_eq!(state, DictationState::Idle);

        let state =
            transition_dictation_state(DictationState::Listening, DictationEvent::RecognizerFailed);
        assert_eq!(state, DictationState::Idle);

        let state =
            transition_dictation_state(DictationState::Stopping, DictationEvent::StopFailed);
        assert_eq!(state, DictationState::Idle);
    }

    #[test]
    fn dictation_state_machine_ignores_stray_events() {
        let state = transition_dictation_state(DictationState::Idle, DictationEvent::StopRequested);
        assert_eq!(state, DictationState::Idle);

        let state =
            transition_dictation_state(DictationState::Listening, DictationEvent::StartRequested);
        assert_eq!(state, DictationState::Listening);
    }

    #[test]
    fn error_kinds_map_to_typed_reasons() {
        assert_eq!(
            speech_error_from_parts(Some("not-authorized".to_string()), None),
            SpeechError::NotAuthorized
        );
        assert_eq!(
            speech_error_from_parts(Some("unavailable".to_string()), None),
            SpeechError::RecognizerUnavailable
        );
        assert_eq!(
            speech_error_from_parts(Some("audio".to_string()), Some("mic busy".to_string())),
            SpeechError::AudioSession("mic busy".to_string())
        );
        assert_eq!(
            speech_error_from_parts(None, Some("network".to_string())),
            SpeechError::Recognition("network".to_string())
        );
    }

    #[test]
    fn parse_permission_result_reports_denial() {
        let granted = parse_permission_result(PermissionResult {
            ok: true,
            granted: true,
            kind: None,
            error: None,
        })
        .unwrap();
        assert!(granted);

        let denied = parse_permission_result(PermissionResult {
            ok: true,
            granted: false,
            kind: None,
            error: None,
        })
        .unwrap();
        assert!(!denied);
    }

    #[test]
    fn parse_drain_result_surfaces_recorded_errors() {
        let err = parse_drain_result(DrainResult {
            ok: false,
            segments: Vec::new(),
            kind: Some("not-authorized".to_string()),
            error: Some("Speech recognition error: not-allowed".to_string()),
        })
        .unwrap_err();
        assert_eq!(err, SpeechError::NotAuthorized);
    }

    #[test]
    fn merge_transcript_joins_with_single_space() {
        assert_eq!(merge_transcript("", "coffee"), "coffee");
        assert_eq!(merge_transcript("I want", "coffee"), "I want coffee");
        assert_eq!(merge_transcript("I want ", "coffee"), "I want coffee");
        assert_eq!(merge_transcript("I want", "  "), "I want");
    }
}
