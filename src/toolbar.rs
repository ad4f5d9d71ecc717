use yew::prelude::*;
use web_sys::{File, HtmlInputElement};
use crate::scene::FrameKind;
use crate::uploads::UploadId;

#[derive(Properties, PartialEq)]
pub struct ToolbarProps {
    /// Previously uploaded stickers, oldest first
    pub uploads: Vec<(UploadId, String)>,
    pub draw_mode: bool,
    /// Brush colour as `#rrggbb`
    pub brush_color: String,
    pub brush_width: f32,
    pub width_range: (f32, f32),
    pub on_background: Callback<File>,
    pub on_stickers: Callback<Vec<File>>,
    pub on_reuse: Callback<UploadId>,
    pub on_draw_mode: Callback<bool>,
    pub on_brush_color: Callback<String>,
    pub on_brush_width: Callback<f32>,
    pub on_frame: Callback<FrameKind>,
    pub on_save: Callback<()>,
    pub on_clear: Callback<()>,
}

/// Files picked in an `<input type="file">`. The input is cleared so the
/// same file can be picked again.
fn take_files(e: &Event) -> Vec<File> {
    let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
        return Vec::new();
    };
    let files = input
        .files()
        .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
        .unwrap_or_default();
    input.set_value("");
    files
}

const BUTTON: &str = "px-3 py-1.5 rounded border border-gray-300 bg-white text-sm text-gray-800 hover:bg-gray-100 cursor-pointer";

#[function_component(Toolbar)]
pub fn toolbar(props: &ToolbarProps) -> Html {
    let recent_open = use_state(|| false);

    let on_background = {
        let on_background = props.on_background.clone();
        Callback::from(move |e: Event| {
            if let Some(file) = take_files(&e).into_iter().next() {
                on_background.emit(file);
            }
        })
    };

    let on_stickers = {
        let on_stickers = props.on_stickers.clone();
        Callback::from(move |e: Event| {
            let files = take_files(&e);
            if !files.is_empty() {
                on_stickers.emit(files);
            }
        })
    };

    let recent = if *recent_open {
        html! {
            <div class="absolute z-20 mt-1 w-56 max-h-64 overflow-y-auto rounded border border-gray-200 bg-white shadow-lg">
                if props.uploads.is_empty() {
                    <p class="px-3 py-2 text-sm text-gray-500">{"No stickers uploaded yet"}</p>
                }
                {
                    props.uploads.iter().map(|(id, name)| {
                        let id = *id;
                        let on_reuse = props.on_reuse.clone();
                        let recent_open = recent_open.clone();
                        let onclick = Callback::from(move |_| {
                            recent_open.set(false);
                            on_reuse.emit(id);
                        });
                        html! {
                            <button
                                key={id}
                                {onclick}
                                class="block w-full text-left px-3 py-2 text-sm hover:bg-pink-50 truncate"
                            >
                                {name.clone()}
                            </button>
                        }
                    }).collect::<Html>()
                }
            </div>
        }
    } else {
        html! {}
    };

    let (min_width, max_width) = props.width_range;

    html! {
        <div class="flex flex-wrap items-center gap-3 p-3 mb-4 rounded-lg bg-white shadow-sm border border-gray-200">
            // Uploads
            <label class={BUTTON}>
                {"Background"}
                <input type="file" accept="image/*" class="hidden" onchange={on_background} />
            </label>
            <label class={BUTTON}>
                {"Stickers"}
                <input type="file" accept="image/png,image/svg+xml,image/*" multiple=true class="hidden" onchange={on_stickers} />
            </label>
            <div class="relative">
                <button
                    class={BUTTON}
                    onclick={
                        let recent_open = recent_open.clone();
                        Callback::from(move |_| recent_open.set(!*recent_open))
                    }
                >
                    {format!("Recent ({})", props.uploads.len())}
                </button>
                {recent}
            </div>

            <div class="w-px h-6 bg-gray-200" />

            // Drawing
            <button
                class={classes!(
                    "px-3", "py-1.5", "rounded", "border", "text-sm", "cursor-pointer",
                    if props.draw_mode { "bg-pink-500 border-pink-600 text-white" } else { "bg-white border-gray-300 text-gray-800 hover:bg-gray-100" }
                )}
                onclick={
                    let on_draw_mode = props.on_draw_mode.clone();
                    let draw_mode = props.draw_mode;
                    Callback::from(move |_| on_draw_mode.emit(!draw_mode))
                }
            >
                {if props.draw_mode { "Drawing" } else { "Draw" }}
            </button>
            <input
                type="color"
                title="Brush colour"
                value={props.brush_color.clone()}
                oninput={
                    let on_update = props.on_brush_color.clone();
                    Callback::from(move |e: InputEvent| {
                        if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                            on_update.emit(input.value());
                        }
                    })
                }
                class="w-10 h-8 rounded border border-gray-300 bg-white cursor-pointer"
            />
            <label class="flex items-center gap-2 text-sm text-gray-700">
                {"Width"}
                <input
                    type="range"
                    min={min_width.to_string()}
                    max={max_width.to_string()}
                    value={props.brush_width.to_string()}
                    oninput={
                        let on_update = props.on_brush_width.clone();
                        Callback::from(move |e: InputEvent| {
                            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                                if let Ok(width) = input.value().parse::<f32>() {
                                    on_update.emit(width);
                                }
                            }
                        })
                    }
                />
                <span class="w-6 text-right tabular-nums">{format!("{}", props.brush_width.round())}</span>
            </label>

            <div class="w-px h-6 bg-gray-200" />

            // Frames
            {
                FrameKind::ALL.iter().map(|&kind| {
                    let on_frame = props.on_frame.clone();
                    html! {
                        <button
                            key={kind.label()}
                            class={BUTTON}
                            onclick={Callback::from(move |_| on_frame.emit(kind))}
                        >
                            {kind.label()}
                        </button>
                    }
                }).collect::<Html>()
            }

            <div class="flex-1" />

            <button
                class="px-3 py-1.5 rounded bg-pink-500 text-white text-sm hover:bg-pink-600 cursor-pointer"
                onclick={
                    let on_save = props.on_save.clone();
                    Callback::from(move |_| on_save.emit(()))
                }
            >
                {"Save"}
            </button>
            <button
                class={BUTTON}
                onclick={
                    let on_clear = props.on_clear.clone();
                    Callback::from(move |_| on_clear.emit(()))
                }
            >
                {"Clear"}
            </button>
        </div>
    }
}
