use std::rc::Rc;

use yew::prelude::*;
use web_sys::File;

use crate::components::canvas_editor::{CanvasEditor, EditorSession};
use crate::components::{Counter, CounterAction, Shared};
use crate::config::EditorConfig;
use crate::download;
use crate::error::EditorError;
use crate::layers_panel::{LayersPanel, ZOrder};
use crate::scene::{Color, FrameKind, LayerId};
use crate::surface::CanvasHost;
use crate::toolbar::Toolbar;
use crate::uploads::{PendingUploads, UploadId, UploadRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoticeKind {
    Decode,
    Export,
}

#[derive(Debug, Clone, PartialEq)]
struct Notice {
    kind: NoticeKind,
    message: String,
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: Rc<EditorConfig>,
}

const QUICK_TIPS: [&str; 5] = [
    "Pick a background photo, then add stickers on top.",
    "Drag a sticker to move it; use the corner handles to resize and the top knob to rotate.",
    "Press Delete or Backspace to remove the selected sticker.",
    "Turn on Draw to doodle with the brush colour and width.",
    "Save downloads the collage as a PNG.",
];

/// Root view: owns the upload hand-off and the recent uploads list, and
/// wires the toolbar to the canvas session.
#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let canvas_ref = use_node_ref();
    let viewport_ref = use_node_ref();

    let session: Shared<EditorSession> = {
        let canvas_ref = canvas_ref.clone();
        let config = props.config.clone();
        Shared::new(use_mut_ref(move || {
            EditorSession::new(CanvasHost::new(canvas_ref), (*config).clone())
        }))
    };
    let pending: Shared<PendingUploads<File>> = Shared::new(use_mut_ref(PendingUploads::new));
    let registry = use_mut_ref(UploadRegistry::<File>::new);
    let pending_seq = use_reducer(Counter::default);
    let revision = use_reducer(Counter::default);

    let notice = use_state(|| None::<Notice>);
    let fatal = use_state(|| None::<String>);

    let on_change = {
        let revision = revision.dispatcher();
        Callback::from(move |_| revision.dispatch(CounterAction::Increment))
    };

    let on_error = {
        let notice = notice.clone();
        let fatal = fatal.clone();
        Callback::from(move |err: EditorError| match err {
            EditorError::Environment(_) => fatal.set(Some(err.to_string())),
            EditorError::Export(_) => notice.set(Some(Notice {
                kind: NoticeKind::Export,
                message: err.to_string(),
            })),
            EditorError::Stale | EditorError::Closed => {
                log::debug!("ignoring {}", err);
            }
            _ => notice.set(Some(Notice {
                kind: NoticeKind::Decode,
                message: err.to_string(),
            })),
        })
    };

    // === Uploads ===

    let on_background = {
        let pending = pending.clone();
        let pending_seq = pending_seq.dispatcher();
        Callback::from(move |file: File| {
            log::debug!("background picked: {}", file.name());
            pending.borrow_mut().post_background(file);
            pending_seq.dispatch(CounterAction::Increment);
        })
    };

    let on_stickers = {
        let pending = pending.clone();
        let registry = registry.clone();
        let pending_seq = pending_seq.dispatcher();
        Callback::from(move |files: Vec<File>| {
            {
                let mut registry = registry.borrow_mut();
                for file in &files {
                    registry.register(file.name(), file.clone());
                }
            }
            pending.borrow_mut().post_assets(files);
            pending_seq.dispatch(CounterAction::Increment);
        })
    };

    let on_reuse = {
        let pending = pending.clone();
        let registry = registry.clone();
        let pending_seq = pending_seq.dispatcher();
        Callback::from(move |id: UploadId| {
            let file = registry.borrow().get(id).map(|entry| entry.file.clone());
            if let Some(file) = file {
                pending.borrow_mut().post_assets([file]);
                pending_seq.dispatch(CounterAction::Increment);
            }
        })
    };

    // === Tools ===

    let on_draw_mode = {
        let session = session.clone();
        let on_change = on_change.clone();
        Callback::from(move |enabled: bool| {
            session.borrow_mut().set_draw_mode(enabled);
            on_change.emit(());
        })
    };

    let on_brush_color = {
        let session = session.clone();
        let on_change = on_change.clone();
        Callback::from(move |hex: String| match Color::from_hex(&hex) {
            Some(color) => {
                session.borrow_mut().set_brush_color(color);
                on_change.emit(());
            }
            None => log::warn!("ignoring brush colour {:?}", hex),
        })
    };

    let on_brush_width = {
        let session = session.clone();
        let on_change = on_change.clone();
        Callback::from(move |width: f32| {
            session.borrow_mut().set_brush_width(width);
            on_change.emit(());
        })
    };

    let on_frame = {
        let session = session.clone();
        let on_change = on_change.clone();
        let on_error = on_error.clone();
        Callback::from(move |kind: FrameKind| {
            let result = session.borrow_mut().add_decorative_frame(kind);
            match result {
                Ok(_) => on_change.emit(()),
                Err(e) => on_error.emit(e),
            }
        })
    };

    // === Save / Clear ===

    let on_save = {
        let session = session.clone();
        let on_change = on_change.clone();
        let on_error = on_error.clone();
        let notice = notice.clone();
        Callback::from(move |_| {
            let exported = session.borrow_mut().export_merged_image();
            on_change.emit(());
            match exported.and_then(|image| download::offer_download(&image)) {
                Ok(()) => notice.set(None),
                Err(e) => {
                    log::error!("export failed: {}", e);
                    on_error.emit(e);
                }
            }
        })
    };

    let on_clear = {
        let session = session.clone();
        let pending = pending.clone();
        let on_change = on_change.clone();
        let notice = notice.clone();
        Callback::from(move |_| {
            pending.borrow_mut().clear();
            session.borrow_mut().reset();
            notice.set(None);
            on_change.emit(());
        })
    };

    // === Layers ===

    let on_select = {
        let session = session.clone();
        let on_change = on_change.clone();
        Callback::from(move |id: LayerId| {
            if session.borrow_mut().select(id) {
                on_change.emit(());
            }
        })
    };

    let on_reorder = {
        let session = session.clone();
        let on_change = on_change.clone();
        Callback::from(move |(id, order): (LayerId, ZOrder)| {
            {
                let mut session = session.borrow_mut();
                match order {
                    ZOrder::Front => session.bring_to_front(id),
                    ZOrder::Forward => session.bring_forward(id),
                    ZOrder::Backward => session.send_backward(id),
                    ZOrder::Back => session.send_to_back(id),
                }
            }
            on_change.emit(());
        })
    };

    let notice_element = match &*notice {
        Some(current) => {
            let dismiss = {
                let notice = notice.clone();
                Callback::from(move |_| notice.set(None))
            };
            let retry = (current.kind == NoticeKind::Export).then(|| {
                let on_save = on_save.clone();
                Callback::from(move |_| on_save.emit(()))
            });
            html! {
                <div class="flex items-center gap-3 mb-4 px-4 py-2 rounded border border-amber-300 bg-amber-50 text-sm text-amber-900">
                    <span class="flex-1">{current.message.clone()}</span>
                    if let Some(retry) = retry {
                        <button class="underline" onclick={retry}>{"Retry"}</button>
                    }
                    <button class="text-amber-700" title="Dismiss" onclick={dismiss}>{"✕"}</button>
                </div>
            }
        }
        None => html! {},
    };

    let (toolbar_state, layers) = {
        let session = session.borrow();
        let tools = session.tools();
        let brush = tools.brush();
        (
            (tools.is_drawing(), brush.color.to_hex(), brush.width, tools.width_range()),
            session.layer_summaries(),
        )
    };
    let (draw_mode, brush_color, brush_width, width_range) = toolbar_state;
    let uploads: Vec<(UploadId, String)> = registry
        .borrow()
        .entries()
        .iter()
        .map(|entry| (entry.id, entry.name.clone()))
        .collect();

    html! {
        <main ref={viewport_ref.clone()} class="min-h-screen w-full bg-pink-50 p-6 flex flex-col items-center">
            <header class="mb-4 text-center">
                <h1 class="text-3xl font-bold text-pink-600">{"Artsy Capture"}</h1>
                <p class="text-sm text-gray-600">{"Make a collage from your photos, stickers and doodles."}</p>
            </header>

            if let Some(message) = &*fatal {
                <div class="max-w-lg p-6 rounded-lg border border-red-300 bg-red-50 text-red-800">
                    <h2 class="font-semibold mb-2">{"Something went wrong"}</h2>
                    <p class="text-sm">{message.clone()}</p>
                </div>
            } else {
                <Toolbar
                    {uploads}
                    {draw_mode}
                    {brush_color}
                    {brush_width}
                    {width_range}
                    {on_background}
                    {on_stickers}
                    {on_reuse}
                    {on_draw_mode}
                    {on_brush_color}
                    {on_brush_width}
                    {on_frame}
                    {on_save}
                    {on_clear}
                />
                {notice_element}
                <div class="flex items-start gap-4">
                    <CanvasEditor
                        session={session.clone()}
                        canvas_ref={canvas_ref.clone()}
                        viewport_ref={viewport_ref.clone()}
                        pending={pending.clone()}
                        pending_seq={pending_seq.0}
                        on_change={on_change.clone()}
                        on_error={on_error.clone()}
                    />
                    <LayersPanel {layers} {on_select} {on_reorder} />
                </div>
                <section class="mt-6 max-w-xl text-sm text-gray-600">
                    <h2 class="font-semibold mb-1">{"Quick tips"}</h2>
                    <ul class="list-disc pl-5 space-y-0.5">
                        { for QUICK_TIPS.iter().map(|tip| html! { <li>{*tip}</li> }) }
                    </ul>
                </section>
            }
        </main>
    }
}
