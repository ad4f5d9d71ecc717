use crate::interaction::SelectionOutline;
use crate::types::HandleName;
use yew::prelude::*;

/// Props for the canvas overlay component
#[derive(Properties, Clone, PartialEq)]
pub struct OverlayProps {
    /// Outline of the active layer, if any
    #[prop_or_default]
    pub outline: Option<SelectionOutline>,

    /// Canvas width
    pub width: f64,

    /// Canvas height
    pub height: f64,
}

/// SVG overlay for selection chrome. Sits on top of the canvas and never
/// takes pointer events; the session hit-tests handles itself.
#[function_component(SelectionOverlay)]
pub fn selection_overlay(props: &OverlayProps) -> Html {
    let handle_size = 9.0;
    let edge_handle_size = 7.0;

    let Some(outline) = &props.outline else {
        return html! {
            <svg
                style="position: absolute; top: 0; left: 0; pointer-events: none;"
                width={format!("{}", props.width)}
                height={format!("{}", props.height)}
            />
        };
    };

    let points = outline
        .corners
        .iter()
        .map(|c| format!("{},{}", c.x, c.y))
        .collect::<Vec<_>>()
        .join(" ");

    let stem = match outline.rotate_stem() {
        Some((from, to)) => html! {
            <line
                x1={format!("{}", from.x)}
                y1={format!("{}", from.y)}
                x2={format!("{}", to.x)}
                y2={format!("{}", to.y)}
                stroke="#ff85a1"
                stroke-width="1"
            />
        },
        None => html! {},
    };

    let handle_elements: Html = outline
        .handles
        .iter()
        .map(|(handle, pos)| {
            if *handle == HandleName::Rotate {
                return html! {
                    <circle
                        key={handle.to_kebab_case()}
                        cx={format!("{}", pos.x)}
                        cy={format!("{}", pos.y)}
                        r={format!("{}", handle_size / 2.0)}
                        fill="white"
                        stroke="#ff85a1"
                        stroke-width="1.5"
                    />
                };
            }
            let size = if handle.is_corner() {
                handle_size
            } else {
                edge_handle_size
            };
            let half = size / 2.0;
            html! {
                <rect
                    key={handle.to_kebab_case()}
                    x={format!("{}", pos.x - half)}
                    y={format!("{}", pos.y - half)}
                    width={format!("{}", size)}
                    height={format!("{}", size)}
                    fill="white"
                    stroke="#ff85a1"
                    stroke-width="1"
                />
            }
        })
        .collect();

    html! {
        <svg
            style="position: absolute; top: 0; left: 0; z-index: 10; pointer-events: none;"
            width={format!("{}", props.width)}
            height={format!("{}", props.height)}
            viewBox={format!("0 0 {} {}", props.width, props.height)}
        >
            <polygon
                points={points}
                fill="none"
                stroke="#ff85a1"
                stroke-width="1"
                stroke-dasharray="4,3"
            />
            {stem}
            {handle_elements}
        </svg>
    }
}
