use common::ForecastPayload;
use compute::timeline::resolve_series_key;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub payload: ForecastPayload,
}

#[function_component(ForecastStats)]
pub fn forecast_stats(props: &Props) -> Html {
    let payload = &props.payload;
    let unit = payload.unit();
    let peak = resolve_series_key(payload).ok().and_then(|key| {
        payload
            .future_data
            .iter()
            .filter_map(|point| point.value(&key).map(|value| (point.timestamp, value)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    });

    html! {
        <div class="grid grid-cols-1 md:grid-cols-3 gap-4 mb-6">
            <div class="stats shadow bg-base-100">
                <div class="stat">
                    <div class="stat-title">{"History"}</div>
                    <div class="stat-value">{ payload.past_data.len() }</div>
                    <div class="stat-desc">{ format!("points per {}", payload.time_unit) }</div>
                </div>
            </div>
            <div class="stats shadow bg-base-100">
                <div class="stat">
                    <div class="stat-title">{"Predictions"}</div>
                    <div class="stat-value text-primary">{ payload.future_data.len() }</div>
                    <div class="stat-desc">{ format!("{} explanation sets", payload.explanation_data.len()) }</div>
                </div>
            </div>
            <div class="stats shadow bg-base-100">
                <div class="stat">
                    <div class="stat-title">{"Peak Forecast"}</div>
                    { match peak {
                        Some((timestamp, value)) => html! {
                            <>
                                <div class="stat-value text-warning">{ format!("{:.2} {}", value, unit) }</div>
                                <div class="stat-desc">{ payload.time_unit.format(&timestamp) }</div>
                            </>
                        },
                        None => html! { <div class="stat-value text-gray-400">{"-"}</div> },
                    } }
                </div>
            </div>
        </div>
    }
}
