use crate::components::overlay::SelectionOverlay;
use crate::components::{Counter, CounterAction, Shared};
use crate::error::EditorError;
use crate::layout::{self, LayoutObserver};
use crate::loader;
use crate::session::{InitOutcome, LoadTarget, SceneSession, SessionState};
use crate::surface::CanvasHost;
use crate::types::ViewportHint;
use crate::uploads::PendingUploads;
use crate::utils::client_to_element_coords;
use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, File, KeyboardEvent, PointerEvent};
use yew::prelude::*;

pub type EditorSession = SceneSession<CanvasHost>;

/// Props for the canvas editor component
#[derive(Properties, Clone, PartialEq)]
pub struct CanvasEditorProps {
    pub session: Shared<EditorSession>,

    /// The `<canvas>` the session's host draws into
    pub canvas_ref: NodeRef,

    /// Region the surface is sized to fit
    pub viewport_ref: NodeRef,

    /// Uploads waiting to be placed
    pub pending: Shared<PendingUploads<File>>,

    /// Bumped whenever something is posted to `pending`
    #[prop_or(0)]
    pub pending_seq: u32,

    /// Called after the scene changed in a way other views show
    #[prop_or_default]
    pub on_change: Callback<()>,

    #[prop_or_default]
    pub on_error: Callback<EditorError>,
}

/// Canvas with a selection overlay, bound to a scene session.
///
/// Mounting wires the layout observer and keyboard shortcuts; unmounting
/// tears the session down.
#[function_component(CanvasEditor)]
pub fn canvas_editor(props: &CanvasEditorProps) -> Html {
    let ready = use_state(|| props.session.borrow().is_ready());
    let loading = use_reducer(Counter::default);
    let refresh = use_force_update();
    let hover_cursor = use_state(|| "default");

    // Lifecycle: initialize once layout is measurable, tear down on unmount
    {
        let session = props.session.clone();
        let viewport_ref = props.viewport_ref.clone();
        let ready = ready.clone();
        let on_error = props.on_error.clone();
        let on_change = props.on_change.clone();

        use_effect_with((), move |_| {
            let observer = match viewport_ref.cast::<Element>() {
                Some(viewport) => {
                    let start = {
                        let session = session.clone();
                        let on_error = on_error.clone();
                        move |hint| try_initialize(&session, hint, &ready, &on_error)
                    };
                    start(layout::measure(&viewport));
                    match LayoutObserver::observe(&viewport, start) {
                        Ok(observer) => Some(observer),
                        Err(e) => {
                            on_error.emit(e);
                            None
                        }
                    }
                }
                None => {
                    on_error.emit(EditorError::Environment(
                        "editor container is not mounted".to_string(),
                    ));
                    None
                }
            };

            let listener = {
                let session = session.clone();
                EventListener::new(&gloo_utils::document(), "keydown", move |event| {
                    let Some(keyboard_event) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    if !matches!(keyboard_event.key().as_str(), "Delete" | "Backspace")
                        || is_form_target(event)
                    {
                        return;
                    }
                    let removed = session.borrow_mut().remove_active_layer();
                    if removed.is_some() {
                        keyboard_event.prevent_default();
                        on_change.emit(());
                    }
                })
            };
            session.borrow_mut().register_listener(Box::new(listener));

            move || {
                drop(observer);
                session.borrow_mut().teardown();
            }
        });
    }

    // Place whatever was posted since the last delivery
    {
        let session = props.session.clone();
        let pending = props.pending.clone();
        let loading = loading.dispatcher();
        let on_change = props.on_change.clone();
        let on_error = props.on_error.clone();

        use_effect_with((props.pending_seq, *ready), move |(_, ready)| {
            if *ready {
                let delivery = pending.borrow_mut().take();
                if let Some(delivery) = delivery {
                    let loads = delivery
                        .background
                        .map(|file| (file, LoadTarget::Background))
                        .into_iter()
                        .chain(delivery.assets.into_iter().map(|file| (file, LoadTarget::Sticker)));
                    for (file, target) in loads {
                        spawn_load(
                            session.clone(),
                            file,
                            target,
                            loading.clone(),
                            on_change.clone(),
                            on_error.clone(),
                        );
                    }
                }
            }
            || ()
        });
    }

    // Pointer event handlers
    let onpointerdown = {
        let session = props.session.clone();
        let canvas_ref = props.canvas_ref.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: PointerEvent| {
            let Some(canvas) = canvas_ref.cast::<Element>() else {
                return;
            };
            if let Err(err) = canvas.set_pointer_capture(e.pointer_id()) {
                log::debug!("pointer capture failed: {:?}", err);
            }
            let point = client_to_element_coords(&e, &canvas);
            if session.borrow_mut().pointer_down(point) {
                on_change.emit(());
            }
        })
    };

    let onpointermove = {
        let session = props.session.clone();
        let canvas_ref = props.canvas_ref.clone();
        let refresh = refresh.clone();
        let hover_cursor = hover_cursor.clone();
        Callback::from(move |e: PointerEvent| {
            let Some(canvas) = canvas_ref.cast::<Element>() else {
                return;
            };
            let point = client_to_element_coords(&e, &canvas);
            let changed = session.borrow_mut().pointer_move(point);
            let cursor = session.borrow().cursor_at(point);
            if *hover_cursor != cursor {
                hover_cursor.set(cursor);
            } else if changed {
                refresh.force_update();
            }
        })
    };

    let onpointerup = {
        let session = props.session.clone();
        let canvas_ref = props.canvas_ref.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: PointerEvent| {
            let Some(canvas) = canvas_ref.cast::<Element>() else {
                return;
            };
            // Capture may already be gone if the pointer was cancelled
            let _ = canvas.release_pointer_capture(e.pointer_id());
            let point = client_to_element_coords(&e, &canvas);
            if session.borrow_mut().pointer_up(point) {
                on_change.emit(());
            }
        })
    };

    let (width, height, outline, drawing) = {
        let session = props.session.borrow();
        let limits = &session.config().surface;
        let (width, height) = session
            .size()
            .map(|s| (s.width as f64, s.height as f64))
            .unwrap_or((limits.min_width as f64, limits.min_height as f64));
        (width, height, session.selection_outline(), session.tools().is_drawing())
    };
    let cursor = if drawing { "crosshair" } else { *hover_cursor };

    html! {
        <div
            class="relative rounded-lg shadow-md bg-white"
            style={format!("width: {}px; height: {}px;", width, height)}
        >
            <canvas
                ref={props.canvas_ref.clone()}
                style={format!("display: block; touch-action: none; cursor: {};", cursor)}
                onpointerdown={onpointerdown}
                onpointermove={onpointermove}
                onpointerup={onpointerup.clone()}
                onpointercancel={onpointerup}
            />

            <SelectionOverlay {outline} {width} {height} />

            if !*ready {
                <div class="absolute inset-0 flex items-center justify-center text-sm text-gray-500">
                    {"Initializing canvas..."}
                </div>
            }
            if loading.0 > 0 {
                <div class="absolute top-2 right-2 px-2 py-1 rounded bg-pink-100 text-xs text-pink-700">
                    {"Loading image..."}
                </div>
            }
        </div>
    }
}

fn try_initialize(
    session: &Shared<EditorSession>,
    hint: ViewportHint,
    ready: &UseStateHandle<bool>,
    on_error: &Callback<EditorError>,
) {
    let outcome = {
        let mut session = session.borrow_mut();
        // A failure has already been reported
        if matches!(session.state(), SessionState::Failed | SessionState::TornDown) {
            return;
        }
        session.initialize(hint)
    };
    match outcome {
        Ok(InitOutcome::Created(_)) => ready.set(true),
        Ok(InitOutcome::Deferred | InitOutcome::AlreadyReady) => {}
        Err(e) => on_error.emit(e),
    }
}

fn spawn_load(
    session: Shared<EditorSession>,
    file: File,
    target: LoadTarget,
    loading: UseReducerDispatcher<Counter>,
    on_change: Callback<()>,
    on_error: Callback<EditorError>,
) {
    let ticket = match session.borrow().ticket() {
        Ok(ticket) => ticket,
        Err(e) => {
            log::warn!("not loading {}: {}", file.name(), e);
            return;
        }
    };
    let name = file.name();
    loading.dispatch(CounterAction::Increment);

    wasm_bindgen_futures::spawn_local(async move {
        let loaded = loader::read_file(file).await;
        let result = session.borrow_mut().place(ticket, target, loaded);
        loading.dispatch(CounterAction::Decrement);

        match result {
            Ok(id) => {
                log::debug!("placed {} as {:?} layer {}", name, target, id);
                on_change.emit(());
            }
            Err(EditorError::Stale | EditorError::Closed) => {
                log::debug!("dropped late load of {}", name);
            }
            Err(EditorError::Decode(reason)) => {
                log::warn!("could not decode {}: {}", name, reason);
                on_error.emit(EditorError::Decode(format!("{} ({})", name, reason)));
            }
            Err(e) => {
                log::warn!("could not place {}: {}", name, e);
                on_error.emit(e);
            }
        }
    });
}

/// Whether the event came from a form control, where Delete edits text
fn is_form_target(event: &Event) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .is_some_and(|element| {
            matches!(element.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
        })
}
