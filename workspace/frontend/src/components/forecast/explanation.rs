use compute::chart::SELECT_PROMPT;
use compute::ExplanationLayout;
use web_sys::HtmlElement;
use yew::prelude::*;

use super::figure;
use crate::settings::get_settings;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub title: Option<String>,
    pub layout: Option<ExplanationLayout>,
    pub id: AttrValue,
}

/// Feature importance of the selected prediction, or the click prompt.
#[function_component(ExplanationPanel)]
pub fn explanation_panel(props: &Props) -> Html {
    let container_ref = use_node_ref();
    let height = get_settings().explanation_height;

    {
        let div_id = props.id.to_string();
        use_effect_with((container_ref.clone(), props.layout.clone()), move |(container_ref, layout)| {
            if let (Some(element), Some(layout)) = (container_ref.cast::<HtmlElement>(), layout) {
                if !layout.is_empty() {
                    element.set_id(&div_id);
                    let traces = figure::explanation_traces(layout);
                    let figure_layout = figure::explanation_figure_layout(layout, height);
                    if let Err(error) = figure::draw(&div_id, &traces, &figure_layout) {
                        log::error!("Failed to draw explanation chart: {}", error);
                    }
                }
            }
            || ()
        });
    }

    let body = match (&props.title, &props.layout) {
        (Some(title), Some(layout)) => html! {
            <>
                <h3 class="card-title text-base">{ title }</h3>
                if layout.is_empty() {
                    <p class="text-gray-500">{"No feature importance recorded for this prediction."}</p>
                } else {
                    <div ref={container_ref} style={format!("width:100%; height:{}px;", height)}></div>
                }
                if !layout.skipped.is_empty() {
                    <p class="text-xs text-warning">
                        { format!("Skipped (not a number): {}", layout.skipped.join(", ")) }
                    </p>
                }
            </>
        },
        _ => html! { <p class="text-gray-500">{ SELECT_PROMPT }</p> },
    };

    html! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">{ body }</div>
        </div>
    }
}
