use compute::chart::HOVER_PROMPT;
use compute::Tooltip;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub tooltip: Option<Tooltip>,
}

#[function_component(ForecastTooltip)]
pub fn forecast_tooltip(props: &Props) -> Html {
    let Some(tooltip) = &props.tooltip else {
        return html! { <p class="text-sm text-gray-500">{ HOVER_PROMPT }</p> };
    };

    html! {
        <div class="bg-base-100 border border-base-300 rounded-lg shadow p-3 text-sm">
            <p class="font-semibold">{ &tooltip.title }</p>
            { for tooltip.lines.iter().map(|line| html! {
                <p key={line.label.clone()}>{ &line.text }</p>
            }) }
            if let Some(confidence) = &tooltip.confidence {
                <p class="text-gray-600">{ confidence }</p>
            }
        </div>
    }
}
