use std::rc::Rc;

use common::{ExplanationSet, ForecastPayload, Kpi, SeriesPoint, TimeUnit};
use compute::chart::EMPTY_MESSAGE;
use compute::{ChartError, ChartInput, ChartState, ExplanationAlignment, ForecastChart as ChartModel};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;
use yew::prelude::*;

use super::explanation::ExplanationPanel;
use super::figure::{self, PlotElement};
use super::tooltip::ForecastTooltip;
use crate::components::error::ErrorDisplay;
use crate::settings::get_settings;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub past_data: Vec<SeriesPoint>,
    pub future_data: Vec<SeriesPoint>,
    #[prop_or_default]
    pub kpi: Option<Kpi>,
    #[prop_or_default]
    pub time_unit: TimeUnit,
    #[prop_or_default]
    pub explanation_data: Vec<ExplanationSet>,
    /// Series to plot. Taken from the first point when not given.
    #[prop_or_default]
    pub series_key: Option<String>,
    #[prop_or(AttrValue::from("forecast-chart"))]
    pub id: AttrValue,
}

impl Props {
    fn payload(&self) -> ForecastPayload {
        ForecastPayload {
            series_key: self.series_key.clone(),
            past_data: self.past_data.clone(),
            future_data: self.future_data.clone(),
            kpi: self.kpi.clone(),
            time_unit: self.time_unit,
            explanation_data: self.explanation_data.clone(),
        }
    }
}

pub enum ChartAction {
    Load(ForecastPayload),
    Click(usize),
}

/// Chart model shared by the plot and its explanation panel.
#[derive(Clone, PartialEq)]
struct ChartStore {
    alignment: ExplanationAlignment,
    chart: Result<ChartModel, ChartError>,
}

impl ChartStore {
    fn new(payload: &ForecastPayload, alignment: ExplanationAlignment) -> Self {
        Self {
            alignment,
            chart: ChartModel::from_payload(payload, alignment),
        }
    }
}

impl Reducible for ChartStore {
    type Action = ChartAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ChartAction::Load(payload) => {
                match ChartInput::from_payload(&payload) {
                    Ok(input) => match &mut next.chart {
                        Ok(chart) => {
                            if chart.update(input) {
                                log::debug!("Forecast timeline re-derived ({} points)", chart.timeline().len());
                            }
                        }
                        Err(_) => next.chart = Ok(ChartModel::new(input, next.alignment)),
                    },
                    Err(error) => {
                        log::warn!("Rejected forecast payload: {}", error);
                        next.chart = Err(error);
                    }
                }
            }
            ChartAction::Click(index) => {
                if let Ok(chart) = &mut next.chart {
                    match chart.click(index) {
                        Some(selected) => log::debug!("Point {} selected explanation set {}", index, selected),
                        None => log::trace!("Point {} has no explanation", index),
                    }
                }
            }
        }
        next.into()
    }
}

#[function_component(ForecastChart)]
pub fn forecast_chart(props: &Props) -> Html {
    let settings = get_settings();
    let payload = props.payload();
    let store = {
        let payload = payload.clone();
        let alignment = settings.alignment;
        use_reducer(move || ChartStore::new(&payload, alignment))
    };

    // Hover moves often; kept apart so it never copies the chart model.
    let hovered = use_state(|| None::<usize>);

    {
        let dispatcher = store.dispatcher();
        let hovered = hovered.setter();
        use_effect_with(payload, move |payload| {
            dispatcher.dispatch(ChartAction::Load(payload.clone()));
            hovered.set(None);
            || ()
        });
    }

    let plot_data = match &store.chart {
        Ok(chart) if chart.state() != ChartState::Empty => match figure::forecast_traces(chart) {
            Ok(traces) => Some((traces, figure::forecast_layout(chart, settings.chart_height))),
            Err(error) => {
                log::error!("Failed to serialize forecast traces: {}", error);
                None
            }
        },
        _ => None,
    };

    let container_ref = use_node_ref();
    {
        let dispatcher = store.dispatcher();
        let hovered = hovered.setter();
        let div_id = props.id.to_string();
        use_effect_with((container_ref.clone(), plot_data), move |(container_ref, plot_data)| {
            let mut listeners = None;
            if let (Some(element), Some((traces, layout))) = (container_ref.cast::<HtmlElement>(), plot_data) {
                element.set_id(&div_id);
                match figure::draw(&div_id, traces, layout) {
                    Ok(()) => {
                        let plot = element.unchecked_into::<PlotElement>();

                        let on_click = {
                            let dispatcher = dispatcher.clone();
                            Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
                                if let Some(index) = figure::point_index(&event) {
                                    dispatcher.dispatch(ChartAction::Click(index));
                                }
                            })
                        };
                        let on_hover = {
                            let hovered = hovered.clone();
                            Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
                                hovered.set(figure::point_index(&event));
                            })
                        };
                        let on_unhover = Closure::<dyn FnMut(JsValue)>::new(move |_: JsValue| {
                            hovered.set(None);
                        });

                        plot.on("plotly_click", on_click.as_ref().unchecked_ref());
                        plot.on("plotly_hover", on_hover.as_ref().unchecked_ref());
                        plot.on("plotly_unhover", on_unhover.as_ref().unchecked_ref());
                        listeners = Some((plot, on_click, on_hover, on_unhover));
                    }
                    Err(error) => log::error!("Failed to hand the forecast figure to plotly: {}", error),
                }
            }

            move || {
                if let Some((plot, ..)) = listeners {
                    for event in ["plotly_click", "plotly_hover", "plotly_unhover"] {
                        plot.remove_all_listeners(event);
                    }
                }
            }
        });
    }

    match &store.chart {
        Err(error) => html! { <ErrorDisplay message={error.to_string()} /> },
        Ok(chart) if chart.state() == ChartState::Empty => html! {
            <div class="flex items-center justify-center py-12">
                <p class="text-gray-500">{ EMPTY_MESSAGE }</p>
            </div>
        },
        Ok(chart) => {
            let tooltip = (*hovered).and_then(|index| chart.tooltip(index));
            html! {
                <div class="flex flex-col gap-4">
                    <div ref={container_ref} style={format!("width:100%; height:{}px;", settings.chart_height)}></div>
                    <ForecastTooltip tooltip={tooltip} />
                    <ExplanationPanel
                        title={chart.explanation_title()}
                        layout={chart.explanation_layout()}
                        id={format!("{}-explanation", props.id)}
                    />
                </div>
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data::generate_forecast_payload_at;
    use chrono::{TimeZone, Utc};

    fn store(payload: &ForecastPayload) -> Rc<ChartStore> {
        Rc::new(ChartStore::new(payload, ExplanationAlignment::Breakpoint))
    }

    fn selection(store: &ChartStore) -> Option<usize> {
        store.chart.as_ref().ok().and_then(ChartModel::selection)
    }

    #[test]
    fn test_click_selects_and_reload_of_same_payload_keeps_it() {
        let today = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let payload = generate_forecast_payload_at(today, TimeUnit::Day);
        let breakpoint = payload.past_data.len() - 1;

        let clicked = store(&payload).reduce(ChartAction::Click(breakpoint + 2));
        assert_eq!(selection(&clicked), Some(2));

        let reloaded = clicked.reduce(ChartAction::Load(payload));
        assert_eq!(selection(&reloaded), Some(2));
    }

    #[test]
    fn test_data_change_clears_selection() {
        let today = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let payload = generate_forecast_payload_at(today, TimeUnit::Day);
        let breakpoint = payload.past_data.len() - 1;

        let clicked = store(&payload).reduce(ChartAction::Click(breakpoint));
        assert_eq!(selection(&clicked), Some(0));

        let changed = clicked.reduce(ChartAction::Load(generate_forecast_payload_at(today, TimeUnit::Week)));
        assert_eq!(selection(&changed), None);
    }

    #[test]
    fn test_rejected_payload_recovers_on_next_load() {
        let today = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let mut broken = generate_forecast_payload_at(today, TimeUnit::Day);
        broken.series_key = Some("missing".to_string());

        let rejected = store(&broken);
        assert!(rejected.chart.is_err());

        let recovered = rejected.reduce(ChartAction::Load(generate_forecast_payload_at(today, TimeUnit::Day)));
        assert!(recovered.chart.is_ok());
    }
}
