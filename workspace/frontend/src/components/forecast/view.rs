use common::TimeUnit;
use compute::ExplanationAlignment;
use yew::prelude::*;

use super::chart::ForecastChart;
use super::stats::ForecastStats;
use crate::mock_data::generate_forecast_payload;
use crate::settings::{get_settings, update_settings};

const UNITS: [TimeUnit; 3] = [TimeUnit::Hour, TimeUnit::Day, TimeUnit::Week];

#[function_component(Forecast)]
pub fn forecast() -> Html {
    let time_unit = use_state(|| TimeUnit::Day);
    let show_data = use_state(|| true);
    let alignment = use_state(|| get_settings().alignment);

    let payload = use_memo((*time_unit, *show_data), |(time_unit, show_data)| {
        if *show_data {
            generate_forecast_payload(*time_unit)
        } else {
            Default::default()
        }
    });

    let toggle_data = {
        let show_data = show_data.clone();
        Callback::from(move |_| {
            log::debug!("Demo data toggled: {}", !*show_data);
            show_data.set(!*show_data);
        })
    };

    let toggle_alignment = {
        let alignment = alignment.clone();
        Callback::from(move |_| {
            let next = match *alignment {
                ExplanationAlignment::Breakpoint => ExplanationAlignment::FirstPrediction,
                ExplanationAlignment::FirstPrediction => ExplanationAlignment::Breakpoint,
            };
            log::info!("Explanation alignment set to {}", next);
            update_settings(|settings| settings.alignment = next);
            alignment.set(next);
        })
    };

    html! {
        <>
            <div class="flex justify-between items-center mb-6 gap-2">
                <div class="join">
                    { for UNITS.iter().map(|unit| {
                        let unit = *unit;
                        let selected = *time_unit == unit;
                        let onclick = {
                            let time_unit = time_unit.clone();
                            Callback::from(move |_| {
                                log::debug!("Switching forecast time unit to {}", unit);
                                time_unit.set(unit);
                            })
                        };
                        html! {
                            <button class={classes!("btn", "join-item", selected.then_some("btn-active"))} {onclick}>
                                { unit.as_str() }
                            </button>
                        }
                    }) }
                </div>
                <button class="btn btn-ghost btn-sm ml-auto" onclick={toggle_alignment}>
                    { format!("Explain from: {}", *alignment) }
                </button>
                <button class="btn btn-primary" onclick={toggle_data}>
                    { if *show_data { "Clear Data" } else { "Generate Chart" } }
                </button>
            </div>
            <ForecastStats payload={(*payload).clone()} />
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h3 class="card-title">{ payload.kpi.as_ref().and_then(|kpi| kpi.name.clone()).unwrap_or_else(|| "Forecast".to_string()) }</h3>
                    <ForecastChart
                        key={alignment.to_string()}
                        past_data={payload.past_data.clone()}
                        future_data={payload.future_data.clone()}
                        kpi={payload.kpi.clone()}
                        time_unit={payload.time_unit}
                        explanation_data={payload.explanation_data.clone()}
                        series_key={payload.series_key.clone()}
                    />
                </div>
            </div>
        </>
    }
}
