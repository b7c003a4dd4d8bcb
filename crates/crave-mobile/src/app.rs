use std::sync::Arc;
use std::time::Duration;

use dioxus::document;
use dioxus::prelude::*;
use dioxus_primitives::scroll_area::{ScrollArea, ScrollDirection, ScrollType};
use dioxus_primitives::separator::Separator;

use crave_core::models::{Craving, CravingId, EMOTION_PRESETS};
use crave_core::query::{select_cravings_now, CravingFilter};

use crate::alerts::{self, Alert};
use crate::data::MobileCravingStore;
use crate::list_state::{
    classify_list_state, empty_state_message, has_active_narrowing, shown_caption,
};
use crate::speech::{self, merge_transcript, DictationState};

#[derive(Clone, Copy, PartialEq, Eq)]
enum MobileScreen {
    List,
    Log,
}

const DESCRIPTION_MAX_CHARS: u32 = 300;
const DEFAULT_SLIDER_VALUE: f64 = 5.0;
const TRANSCRIPT_POLL_MS: u64 = 400;

const BLUR_ACTIVE_INPUT_SCRIPT: &str = r"
(() => {
    if (document.activeElement && document.activeElement.blur) {
        document.activeElement.blur();
    }
    return true;
})()
";

#[component]
pub fn App() -> Element {
    rsx! {
        AppShell {}
    }
}

#[component]
fn AppShell() -> Element {
    let mut store = use_signal(|| None::<Arc<MobileCravingStore>>);
    let mut cravings = use_signal(Vec::<Craving>::new);
    let mut search_query = use_signal(String::new);
    let mut active_filter = use_signal(CravingFilter::default);
    let mut screen = use_signal(|| MobileScreen::List);
    let mut loading = use_signal(|| true);
    let mut submitting = use_signal(|| false);
    let mut archiving = use_signal(|| false);
    let mut active_alert = use_signal(|| None::<Alert>);
    let mut draft_description = use_signal(String::new);
    let mut draft_intensity = use_signal(|| DEFAULT_SLIDER_VALUE);
    let mut draft_resistance = use_signal(|| DEFAULT_SLIDER_VALUE);
    let mut draft_emotions = use_signal(Vec::<String>::new);
    let mut dictation_state = use_signal(DictationState::default);
    let mut db_init_retry_version = use_signal(|| 0u64);

    use_future(move || async move {
        let _db_init_retry_version = db_init_retry_version();

        loading.set(true);
        store.set(None);
        cravings.set(Vec::new());

        match MobileCravingStore::open_default() {
            Ok(craving_store) => {
                let craving_store = Arc::new(craving_store);
                store.set(Some(craving_store.clone()));

                match craving_store.list_cravings().await {
                    Ok(loaded) => cravings.set(loaded),
                    Err(error) => active_alert.set(Some(alerts::fetch_failed(&error))),
                }
            }
            Err(error) => {
                tracing::error!("Failed to open database: {}", error);
                active_alert.set(Some(alerts::fetch_failed(&error)));
            }
        }

        loading.set(false);
    });

    let on_retry_db_init = move |_| {
        if loading() {
            return;
        }
        db_init_retry_version.set(db_init_retry_version() + 1);
    };

    let on_open_log = move |_| {
        if store.read().is_none() {
            active_alert.set(Some(Alert::new(
                "Not ready",
                "The database is still initializing. Retry in a moment.",
            )));
            return;
        }
        draft_description.set(String::new());
        draft_intensity.set(DEFAULT_SLIDER_VALUE);
        draft_resistance.set(DEFAULT_SLIDER_VALUE);
        draft_emotions.set(Vec::new());
        dictation_state.set(DictationState::Idle);
        screen.set(MobileScreen::Log);
    };

    let mut back_to_list = move || {
        // The list screen comes back freshly instantiated: its transient
        // search/filter state resets to defaults
        search_query.set(String::new());
        active_filter.set(CravingFilter::All);
        screen.set(MobileScreen::List);
    };

    let on_dismiss_alert = move |_| {
        active_alert.set(None);
    };

    let on_submit = move |_| {
        if submitting() {
            return;
        }

        let Some(craving_store) = store.read().clone() else {
            active_alert.set(Some(Alert::new(
                "Not ready",
                "The database is still initializing. Retry in a moment.",
            )));
            return;
        };

        submitting.set(true);

        spawn(async move {
            if dictation_state() != DictationState::Idle {
                if let Ok(residual) = speech::stop_dictation().await {
                    for segment in residual {
                        let merged = merge_transcript(&draft_description(), &segment);
                        draft_description.set(merged);
                    }
                }
                dictation_state.set(DictationState::Idle);
            }

            let result = craving_store
                .log_craving(
                    &draft_description(),
                    draft_intensity(),
                    draft_resistance(),
                    draft_emotions(),
                )
                .await;

            match result {
                Ok(_) => {
                    match craving_store.list_cravings().await {
                        Ok(fresh) => cravings.set(fresh),
                        Err(error) => active_alert.set(Some(alerts::fetch_failed(&error))),
                    }
                    back_to_list();
                }
                Err(error) => {
                    // Entered data stays in the form for retry
                    active_alert.set(Some(alerts::submission_failed(&error)));
                }
            }

            submitting.set(false);
            release_input_focus().await;
        });
    };

    let on_toggle_dictation = move |_| match dictation_state() {
        DictationState::Idle => {
            dictation_state.set(DictationState::Starting);

            spawn(async move {
                match speech::request_speech_permission().await {
                    Ok(true) => {}
                    Ok(false) => {
                        active_alert.set(Some(alerts::speech_failed(
                            &speech::SpeechError::NotAuthorized,
                        )));
                        dictation_state.set(DictationState::Idle);
                        return;
                    }
                    Err(error) => {
                        active_alert.set(Some(alerts::speech_failed(&error)));
                        dictation_state.set(DictationState::Idle);
                        return;
                    }
                }

                if let Err(error) = speech::start_dictation().await {
                    active_alert.set(Some(alerts::speech_failed(&error)));
                    dictation_state.set(DictationState::Idle);
                    return;
                }
                dictation_state.set(DictationState::Listening);

                loop {
                    tokio::time::sleep(Duration::from_millis(TRANSCRIPT_POLL_MS)).await;
                    if dictation_state() != DictationState::Listening {
                        break;
                    }

                    match speech::drain_transcripts().await {
                        Ok(segments) => {
                            for segment in segments {
                                let merged = merge_transcript(&draft_description(), &segment);
                                draft_description.set(merged);
                            }
                        }
                        Err(error) => {
                            active_alert.set(Some(alerts::speech_failed(&error)));
                            dictation_state.set(DictationState::Idle);
                            break;
                        }
                    }
                }
            });
        }
        DictationState::Listening => {
            dictation_state.set(DictationState::Stopping);

            spawn(async move {
                match speech::stop_dictation().await {
                    Ok(residual) => {
                        for segment in residual {
                            let merged = merge_transcript(&draft_description(), &segment);
                            draft_description.set(merged);
                        }
                    }
                    Err(error) => active_alert.set(Some(alerts::speech_failed(&error))),
                }
                dictation_state.set(DictationState::Idle);
            });
        }
        // Ignore taps mid-transition
        DictationState::Starting | DictationState::Stopping => {}
    };

    let mut on_archive = move |id: CravingId| {
        if archiving() {
            return;
        }
        let Some(craving_store) = store.read().clone() else {
            return;
        };

        archiving.set(true);

        spawn(async move {
            match craving_store.archive_craving(&id).await {
                Ok(()) => match craving_store.list_cravings().await {
                    Ok(fresh) => cravings.set(fresh),
                    Err(error) => active_alert.set(Some(alerts::fetch_failed(&error))),
                },
                Err(error) => active_alert.set(Some(alerts::archive_failed(&error))),
            }
            archiving.set(false);
        });
    };

    let all_cravings = cravings();
    let search_query_value = search_query();
    let filter_value = active_filter();
    let visible_cravings = select_cravings_now(&all_cravings, &search_query_value, filter_value);
    let list_state = classify_list_state(all_cravings.len(), visible_cravings.len());
    let narrowed = has_active_narrowing(&search_query_value, filter_value);
    let caption = shown_caption(visible_cravings.len(), all_cravings.len());

    let heading = match screen() {
        MobileScreen::List => "Cravings",
        MobileScreen::Log => "Log craving",
    };
    let intensity_value = draft_intensity();
    let resistance_value = draft_resistance();
    let dictation_label = match dictation_state() {
        DictationState::Idle => "Dictate",
        DictationState::Starting => "Starting...",
        DictationState::Listening => "Stop dictation",
        DictationState::Stopping => "Stopping...",
    };

    rsx! {
        div {
            style: "
                height: 100vh;
                display: flex;
                flex-direction: column;
                background: #f6f8fb;
                color: #111827;
                font-family: system-ui, sans-serif;
            ",

            div {
                style: "
                    padding: 14px 16px;
                    display: flex;
                    justify-content: space-between;
                    align-items: center;
                    background: #ffffff;
                ",
                h1 {
                    style: "margin: 0; font-size: 22px;",
                    "{heading}"
                }
                if screen() == MobileScreen::Log {
                    button {
                        type: "button",
                        style: "
                            border: 1px solid #d1d5db;
                            border-radius: 8px;
                            padding: 6px 10px;
                            background: #ffffff;
                            color: #111827;
                            font-size: 12px;
                            font-weight: 600;
                        ",
                        onclick: move |_| back_to_list(),
                        "Back"
                    }
                }
            }

            Separator {
                decorative: true,
                style: "height: 1px; background: #e5e7eb;",
            }

            if loading() {
                div {
                    style: "
                        flex: 1;
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        color: #6b7280;
                    ",
                    "Loading cravings..."
                }
            } else if screen() == MobileScreen::List {
                if store.read().is_none() {
                    div {
                        style: "
                            flex: 1;
                            display: flex;
                            align-items: center;
                            justify-content: center;
                            padding: 20px;
                        ",
                        div {
                            style: "
                                width: 100%;
                                max-width: 360px;
                                background: #ffffff;
                                border: 1px solid #e5e7eb;
                                border-radius: 12px;
                                padding: 16px;
                                display: flex;
                                flex-direction: column;
                                gap: 10px;
                                color: #374151;
                            ",
                            p {
                                style: "margin: 0; font-size: 14px; font-weight: 600; color: #111827;",
                                "Database initialization failed"
                            }
                            p {
                                style: "margin: 0; font-size: 12px; color: #6b7280;",
                                "Retry initialization to continue."
                            }
                            button {
                                type: "button",
                                style: "
                                    border: 0;
                                    border-radius: 8px;
                                    padding: 10px 12px;
                                    background: #2563eb;
                                    color: #ffffff;
                                    font-weight: 600;
                                ",
                                onclick: on_retry_db_init,
                                disabled: loading(),
                                "Retry"
                            }
                        }
                    }
                } else {
                    div {
                        style: "padding: 12px 16px; display: flex; gap: 8px;",
                        button {
                            type: "button",
                            style: "
                                flex: 1;
                                border: 0;
                                border-radius: 10px;
                                padding: 12px;
                                background: #111827;
                                color: #ffffff;
                                font-weight: 600;
                                font-size: 14px;
                            ",
                            onclick: on_open_log,
                            "Log craving"
                        }
                    }

                    div {
                        style: "padding: 0 16px 12px 16px; display: flex; flex-direction: column; gap: 8px;",
                        input {
                            r#type: "search",
                            placeholder: "Search cravings...",
                            value: "{search_query_value}",
                            style: "
                                border: 1px solid #d1d5db;
                                border-radius: 8px;
                                padding: 10px;
                                font-size: 13px;
                            ",
                            oninput: move |event: Event<FormData>| {
                                search_query.set(event.value());
                            },
                        }

                        div {
                            style: "display: flex; gap: 6px; flex-wrap: wrap;",
                            for filter in CravingFilter::ALL {
                                {
                                    let is_active = filter_value == filter;
                                    let chip_style = if is_active {
                                        "padding: 6px 10px; font-size: 12px; border: 0; border-radius: 8px; background: #111827; color: #ffffff; font-weight: 600;"
                                    } else {
                                        "padding: 6px 10px; font-size: 12px; border: 1px solid #d1d5db; border-radius: 8px; background: #ffffff; color: #374151;"
                                    };

                                    rsx! {
                                        button {
                                            key: "{filter.label()}",
                                            type: "button",
                                            style: "{chip_style}",
                                            onclick: move |_| active_filter.set(filter),
                                            "{filter.label()}"
                                        }
                                    }
                                }
                            }
                        }

                        if narrowed {
                            div {
                                style: "display: flex; align-items: center; justify-content: space-between; gap: 8px;",
                                p {
                                    style: "margin: 0; font-size: 12px; color: #6b7280;",
                                    "{caption}"
                                }
                                button {
                                    type: "button",
                                    style: "
                                        padding: 6px 10px;
                                        font-size: 12px;
                                        border: 1px solid #d1d5db;
                                        border-radius: 8px;
                                        background: #ffffff;
                                        color: #374151;
                                    ",
                                    onclick: move |_| {
                                        search_query.set(String::new());
                                        active_filter.set(CravingFilter::All);
                                    },
                                    "Clear"
                                }
                            }
                        }
                    }

                    ScrollArea {
                        direction: ScrollDirection::Vertical,
                        scroll_type: ScrollType::Auto,
                        tabindex: "0",
                        style: "flex: 1; padding: 0 12px 16px 12px;",

                        if let Some(message) = empty_state_message(list_state) {
                            div {
                                style: "
                                    margin-top: 24px;
                                    padding: 20px;
                                    background: #ffffff;
                                    border: 1px solid #e5e7eb;
                                    border-radius: 12px;
                                    text-align: center;
                                    color: #6b7280;
                                ",
                                "{message}"
                            }
                        } else {
                            for craving in visible_cravings {
                                {
                                    let craving_id = craving.id;
                                    let title = craving_title(&craving);
                                    let ratings = ratings_line(&craving);
                                    let emotions = emotions_line(&craving);
                                    let logged = relative_time(craving.logged_at);

                                    rsx! {
                                        div {
                                            key: "{craving_id}",
                                            style: "
                                                margin-bottom: 10px;
                                                border: 1px solid #e5e7eb;
                                                background: #ffffff;
                                                border-radius: 12px;
                                                padding: 12px;
                                                display: flex;
                                                flex-direction: column;
                                                gap: 6px;
                                            ",
                                            p {
                                                style: "margin: 0; font-size: 15px; font-weight: 600; color: #111827;",
                                                "{title}"
                                            }
                                            p {
                                                style: "margin: 0; font-size: 13px; color: #6b7280;",
                                                "{ratings}"
                                            }
                                            if !emotions.is_empty() {
                                                p {
                                                    style: "margin: 0; font-size: 12px; color: #6b7280;",
                                                    "{emotions}"
                                                }
                                            }
                                            div {
                                                style: "display: flex; justify-content: space-between; align-items: center;",
                                                p {
                                                    style: "margin: 0; font-size: 12px; color: #9ca3af;",
                                                    "Logged {logged}"
                                                }
                                                button {
                                                    type: "button",
                                                    style: "
                                                        border: 1px solid #d1d5db;
                                                        border-radius: 8px;
                                                        padding: 6px 10px;
                                                        background: #ffffff;
                                                        color: #374151;
                                                        font-size: 12px;
                                                    ",
                                                    disabled: archiving(),
                                                    onclick: move |_| on_archive(craving_id),
                                                    "Archive"
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            } else {
                ScrollArea {
                    direction: ScrollDirection::Vertical,
                    scroll_type: ScrollType::Auto,
                    tabindex: "0",
                    style: "flex: 1; padding: 12px;",

                    div {
                        style: "
                            padding: 12px;
                            border: 1px solid #e5e7eb;
                            border-radius: 12px;
                            background: #ffffff;
                            display: flex;
                            flex-direction: column;
                            gap: 8px;
                            margin-bottom: 10px;
                        ",
                        p {
                            style: "
                                margin: 0;
                                font-size: 12px;
                                font-weight: 700;
                                color: #6b7280;
                                text-transform: uppercase;
                                letter-spacing: 0.04em;
                            ",
                            "What are you craving?"
                        }
                        textarea {
                            style: "
                                border: 1px solid #d1d5db;
                                border-radius: 10px;
                                padding: 12px;
                                min-height: 110px;
                                line-height: 1.5;
                                font-size: 15px;
                                resize: none;
                                background: #ffffff;
                            ",
                            value: "{draft_description}",
                            placeholder: "Describe the craving...",
                            maxlength: "{DESCRIPTION_MAX_CHARS}",
                            oninput: move |event: Event<FormData>| {
                                draft_description.set(event.value());
                            },
                        }
                        button {
                            type: "button",
                            style: "
                                border: 1px solid #d1d5db;
                                border-radius: 8px;
                                padding: 8px 12px;
                                background: #ffffff;
                                color: #374151;
                                font-size: 13px;
                                font-weight: 600;
                                align-self: flex-start;
                            ",
                            onclick: on_toggle_dictation,
                            "{dictation_label}"
                        }
                    }

                    div {
                        style: "
                            padding: 12px;
                            border: 1px solid #e5e7eb;
                            border-radius: 12px;
                            background: #ffffff;
                            display: flex;
                            flex-direction: column;
                            gap: 10px;
                            margin-bottom: 10px;
                        ",
                        p {
                            style: "margin: 0; font-size: 13px; color: #111827;",
                            "Intensity: {intensity_value:.0}"
                        }
                        input {
                            r#type: "range",
                            min: "1",
                            max: "10",
                            step: "1",
                            value: "{intensity_value}",
                            oninput: move |event: Event<FormData>| {
                                draft_intensity
                                    .set(event.value().parse().unwrap_or(DEFAULT_SLIDER_VALUE));
                            },
                        }
                        p {
                            style: "margin: 0; font-size: 13px; color: #111827;",
                            "Confidence to resist: {resistance_value:.0}"
                        }
                        input {
                            r#type: "range",
                            min: "1",
                            max: "10",
                            step: "1",
                            value: "{resistance_value}",
                            oninput: move |event: Event<FormData>| {
                                draft_resistance
                                    .set(event.value().parse().unwrap_or(DEFAULT_SLIDER_VALUE));
                            },
                        }
                    }

                    div {
                        style: "
                            padding: 12px;
                            border: 1px solid #e5e7eb;
                            border-radius: 12px;
                            background: #ffffff;
                            display: flex;
                            flex-direction: column;
                            gap: 8px;
                            margin-bottom: 10px;
                        ",
                        p {
                            style: "
                                margin: 0;
                                font-size: 12px;
                                font-weight: 700;
                                color: #6b7280;
                                text-transform: uppercase;
                                letter-spacing: 0.04em;
                            ",
                            "How do you feel?"
                        }
                        div {
                            style: "display: flex; gap: 6px; flex-wrap: wrap;",
                            for emotion in EMOTION_PRESETS {
                                {
                                    let emotion = (*emotion).to_string();
                                    let is_selected = draft_emotions().contains(&emotion);
                                    let chip_style = if is_selected {
                                        "padding: 6px 10px; font-size: 12px; border: 0; border-radius: 8px; background: #2563eb; color: #ffffff; font-weight: 600;"
                                    } else {
                                        "padding: 6px 10px; font-size: 12px; border: 1px solid #d1d5db; border-radius: 8px; background: #ffffff; color: #374151;"
                                    };
                                    let toggle_value = emotion.clone();

                                    rsx! {
                                        button {
                                            key: "{emotion}",
                                            type: "button",
                                            style: "{chip_style}",
                                            onclick: move |_| {
                                                let mut selected = draft_emotions();
                                                if let Some(position) =
                                                    selected.iter().position(|e| e == &toggle_value)
                                                {
                                                    selected.remove(position);
                                                } else {
                                                    selected.push(toggle_value.clone());
                                                }
                                                draft_emotions.set(selected);
                                            },
                                            "{emotion}"
                                        }
                                    }
                                }
                            }
                        }
                    }

                    button {
                        type: "button",
                        style: "
                            border: 0;
                            border-radius: 10px;
                            padding: 12px;
                            background: #111827;
                            color: #ffffff;
                            font-weight: 600;
                            font-size: 14px;
                            width: 100%;
                        ",
                        disabled: submitting(),
                        onclick: on_submit,
                        if submitting() { "Logging..." } else { "Log craving" }
                    }
                }
            }

            if let Some(alert) = active_alert() {
                div {
                    style: "
                        position: fixed;
                        inset: 0;
                        background: rgba(17, 24, 39, 0.45);
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        padding: 24px;
                    ",
                    div {
                        style: "
                            width: 100%;
                            max-width: 320px;
                            background: #ffffff;
                            border-radius: 12px;
                            padding: 16px;
                            display: flex;
                            flex-direction: column;
                            gap: 10px;
                        ",
                        p {
                            style: "margin: 0; font-size: 15px; font-weight: 700; color: #111827;",
                            "{alert.title}"
                        }
                        p {
                            style: "margin: 0; font-size: 13px; color: #374151;",
                            "{alert.message}"
                        }
                        button {
                            type: "button",
                            style: "
                                border: 0;
                                border-radius: 8px;
                                padding: 10px;
                                background: #2563eb;
                                color: #ffffff;
                                font-weight: 600;
                            ",
                            onclick: on_dismiss_alert,
                            "OK"
                        }
                    }
                }
            }
        }
    }
}

/// Drop focus from whichever input is active once a submission settles.
async fn release_input_focus() {
    let result: Result<bool, _> = document::eval(BLUR_ACTIVE_INPUT_SCRIPT).join().await;
    if let Err(error) = result {
        tracing::debug!("Failed to release input focus: {}", error);
    }
}

fn craving_title(craving: &Craving) -> String {
    let title = craving.title_preview(64);
    if title.trim().is_empty() {
        "Untitled craving".to_string()
    } else {
        title
    }
}

fn ratings_line(craving: &Craving) -> String {
    format!(
        "Intensity {:.0} - Resistance {:.0}",
        craving.intensity, craving.resistance
    )
}

fn emotions_line(craving: &Craving) -> String {
    craving.emotions.join(", ")
}

fn relative_time(logged_at_ms: i64) -> String {
    let now = chrono::Utc::now().timestamp_millis();
    let delta = (now - logged_at_ms).max(0);

    if delta < 60_000 {
        "just now".to_string()
    } else if delta < 3_600_000 {
        format!("{}m ago", delta / 60_000)
    } else if delta < 86_400_000 {
        format!("{}h ago", delta / 3_600_000)
    } else {
        format!("{}d ago", delta / 86_400_000)
    }
}
