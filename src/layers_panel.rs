use yew::prelude::*;
use crate::scene::LayerId;
use crate::session::LayerSummary;

/// Reordering requests within the interactive band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    Front,
    Forward,
    Backward,
    Back,
}

impl ZOrder {
    const ALL: [ZOrder; 4] = [ZOrder::Front, ZOrder::Forward, ZOrder::Backward, ZOrder::Back];

    fn symbol(&self) -> &'static str {
        match self {
            ZOrder::Front => "⤒",
            ZOrder::Forward => "↑",
            ZOrder::Backward => "↓",
            ZOrder::Back => "⤓",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ZOrder::Front => "Bring to front",
            ZOrder::Forward => "Bring forward",
            ZOrder::Backward => "Send backward",
            ZOrder::Back => "Send to back",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct LayersPanelProps {
    /// Interactive layers, topmost first
    pub layers: Vec<LayerSummary>,
    pub on_select: Callback<LayerId>,
    pub on_reorder: Callback<(LayerId, ZOrder)>,
}

#[function_component(LayersPanel)]
pub fn layers_panel(props: &LayersPanelProps) -> Html {
    html! {
        <div class="w-56 flex-none bg-white rounded-lg border border-gray-200 p-4 overflow-y-auto">
            <h2 class="text-lg font-semibold pb-3 mb-4 border-b border-gray-200">{"Layers"}</h2>
            if props.layers.is_empty() {
                <p class="text-sm text-gray-500">{"Stickers and doodles show up here"}</p>
            }
            <div class="space-y-2">
                {
                    props.layers.iter().map(|layer| {
                        let id = layer.id;
                        let on_select = props.on_select.clone();
                        let onclick = Callback::from(move |_| {
                            on_select.emit(id);
                        });

                        let buttons = ZOrder::ALL.iter().map(|&order| {
                            let on_reorder = props.on_reorder.clone();
                            let onclick = Callback::from(move |e: MouseEvent| {
                                e.stop_propagation();
                                on_reorder.emit((id, order));
                            });
                            html! {
                                <button
                                    key={order.title()}
                                    title={order.title()}
                                    {onclick}
                                    class="w-6 h-6 rounded text-xs text-gray-600 hover:bg-gray-200"
                                >
                                    {order.symbol()}
                                </button>
                            }
                        }).collect::<Html>();

                        html! {
                            <div
                                key={id}
                                {onclick}
                                class={classes!(
                                    "flex",
                                    "items-center",
                                    "justify-between",
                                    "gap-2",
                                    "p-2",
                                    "rounded",
                                    "cursor-pointer",
                                    "border",
                                    "border-gray-200",
                                    "hover:bg-gray-100",
                                    "hover:border-gray-300",
                                    if layer.active { "bg-pink-100 border-pink-300" } else { "bg-white" }
                                )}
                            >
                                <span class="text-sm truncate">
                                    {layer.label.clone()}
                                </span>
                                <div class="flex gap-0.5">
                                    {buttons}
                                </div>
                            </div>
                        }
                    }).collect::<Html>()
                }
            </div>
        </div>
    }
}
