use compute::chart::TODAY_LABEL;
use compute::{ExplanationLayout, ForecastChart};
use plotly::common::{DashType, Line, Mode};
use plotly::Scatter;
use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;

pub const MAIN_COLOR: &str = "#8884d8";
pub const BOUND_COLOR: &str = "#82ca9d";
pub const TODAY_COLOR: &str = "#ef4444";

/// Timestamp format understood by plotly's date axis.
const PLOTLY_DATE: &str = "%Y-%m-%d %H:%M:%S";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Plotly, js_name = newPlot)]
    fn new_plot(div_id: &str, data: JsValue, layout: JsValue, config: JsValue);

    /// A plot container after `Plotly.newPlot` attached its event emitter to it.
    pub type PlotElement;

    #[wasm_bindgen(method)]
    pub fn on(this: &PlotElement, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method, js_name = removeAllListeners)]
    pub fn remove_all_listeners(this: &PlotElement, event: &str);
}

fn to_js(value: &Value) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

/// Draws `traces` with `layout` into the element with id `div_id`.
pub fn draw(div_id: &str, traces: &Value, layout: &Value) -> Result<(), serde_wasm_bindgen::Error> {
    new_plot(div_id, to_js(traces)?, to_js(layout)?, to_js(&plot_config())?);
    Ok(())
}

/// Timeline position of the first point of a plotly click or hover event.
pub fn point_index(event: &JsValue) -> Option<usize> {
    let points = js_sys::Reflect::get(event, &JsValue::from_str("points")).ok()?;
    let first = js_sys::Reflect::get(&points, &JsValue::from_f64(0.0)).ok()?;
    let index = js_sys::Reflect::get(&first, &JsValue::from_str("pointIndex")).ok()?.as_f64()?;
    (index >= 0.0).then_some(index as usize)
}

pub fn plot_config() -> Value {
    json!({"responsive": true, "displayModeBar": false})
}

fn line_trace(trace: Box<Scatter<String, Option<f64>>>) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(&trace)?;
    if let Some(object) = value.as_object_mut() {
        // The tooltip is drawn by the page, plotly only reports the position.
        object.insert("hoverinfo".into(), json!("none"));
        object.insert("connectgaps".into(), json!(false));
    }
    Ok(value)
}

/// Main series plus the dashed upper and lower envelope, sharing one x axis.
pub fn forecast_traces(chart: &ForecastChart) -> serde_json::Result<Value> {
    let points = chart.timeline().points();
    let labels = chart.labels();
    let dates: Vec<String> = points.iter().map(|p| p.timestamp.format(PLOTLY_DATE).to_string()).collect();

    let main = Scatter::new(dates.clone(), points.iter().map(|p| Some(p.value)).collect())
        .mode(Mode::LinesMarkers)
        .name(&labels.main)
        .line(Line::new().color(MAIN_COLOR).width(2.0));
    let upper = Scatter::new(dates.clone(), points.iter().map(|p| p.upper_bound).collect())
        .mode(Mode::Lines)
        .name(&labels.upper)
        .line(Line::new().color(BOUND_COLOR).width(1.5).dash(DashType::Dash));
    let lower = Scatter::new(dates, points.iter().map(|p| p.lower_bound).collect())
        .mode(Mode::Lines)
        .name(&labels.lower)
        .line(Line::new().color(BOUND_COLOR).width(1.5).dash(DashType::Dash));

    Ok(Value::Array(vec![line_trace(main)?, line_trace(upper)?, line_trace(lower)?]))
}

pub fn forecast_layout(chart: &ForecastChart, height: u32) -> Value {
    let points = chart.timeline().points();
    let tick_values: Vec<String> = points.iter().map(|p| p.timestamp.format(PLOTLY_DATE).to_string()).collect();

    let (shapes, annotations) = match chart.today_marker() {
        Some(marker) => {
            let x = marker.timestamp.format(PLOTLY_DATE).to_string();
            (
                json!([{
                    "type": "line",
                    "x0": x, "x1": x,
                    "y0": 0, "y1": 1,
                    "xref": "x", "yref": "paper",
                    "line": {"color": TODAY_COLOR, "width": 2}
                }]),
                json!([{
                    "x": x, "y": 1,
                    "xref": "x", "yref": "paper",
                    "text": TODAY_LABEL,
                    "showarrow": false,
                    "yanchor": "bottom",
                    "font": {"color": TODAY_COLOR}
                }]),
            )
        }
        None => (json!([]), json!([])),
    };

    let unit = chart.unit();
    let y_title = if unit.is_empty() { chart.labels().main } else { format!("{} ({})", chart.labels().main, unit) };

    json!({
        "height": height,
        "margin": {"t": 30, "r": 30, "l": 60, "b": 50},
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
        "hovermode": "closest",
        "showlegend": true,
        "legend": {"orientation": "h", "y": -0.2},
        "xaxis": {
            "type": "date",
            "showgrid": false,
            "tickvals": tick_values,
            "ticktext": chart.axis_labels()
        },
        "yaxis": {"title": {"text": y_title}, "showgrid": true, "gridcolor": "#eee"},
        "shapes": shapes,
        "annotations": annotations
    })
}

pub fn explanation_traces(layout: &ExplanationLayout) -> Value {
    let features: Vec<&str> = layout.bars.iter().map(|b| b.feature.as_str()).collect();
    let importances: Vec<f64> = layout.bars.iter().map(|b| b.importance).collect();
    json!([{
        "type": "bar",
        "orientation": "h",
        "x": importances,
        "y": features,
        "name": "Importance",
        "marker": {"color": MAIN_COLOR},
        "hovertemplate": "%{y}: %{x:.3f}<extra></extra>"
    }])
}

/// Horizontal bar layout on the symmetric importance axis with a line at zero.
pub fn explanation_figure_layout(layout: &ExplanationLayout, height: u32) -> Value {
    // plotly cannot draw a zero-width range
    let range = if layout.domain.is_flat() {
        [-1.0, 1.0]
    } else {
        [layout.domain.min, layout.domain.max]
    };

    json!({
        "height": height,
        "margin": {"t": 10, "r": 30, "l": 120, "b": 40},
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
        "showlegend": false,
        "xaxis": {"range": range, "zeroline": false, "title": {"text": "Importance"}},
        "yaxis": {"type": "category", "automargin": true, "autorange": "reversed"},
        "shapes": [{
            "type": "line",
            "x0": layout.reference, "x1": layout.reference,
            "y0": 0, "y1": 1,
            "xref": "x", "yref": "paper",
            "line": {"color": "#000", "width": 1}
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::{ExplanationEntry, ForecastPayload, Kpi, SeriesPoint};
    use compute::{ExplanationAlignment, ExplanationView};

    fn chart() -> ForecastChart {
        let ts = |day| Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        let payload = ForecastPayload {
            past_data: vec![SeriesPoint::new(ts(1), "machine_1", 10.0), SeriesPoint::new(ts(2), "machine_1", 12.0)],
            future_data: vec![SeriesPoint::new(ts(3), "machine_1", 14.0), SeriesPoint::new(ts(4), "machine_1", 16.0)],
            kpi: Some(Kpi::with_unit("kWh")),
            ..Default::default()
        };
        ForecastChart::from_payload(&payload, ExplanationAlignment::Breakpoint).unwrap()
    }

    #[test]
    fn test_forecast_traces_keep_missing_bounds_as_null() {
        let traces = forecast_traces(&chart()).unwrap();
        let traces = traces.as_array().unwrap();
        assert_eq!(traces.len(), 3);
        assert!(traces.iter().all(Value::is_object));

        assert_eq!(traces[0]["name"], "machine_1");
        assert_eq!(traces[1]["name"], "Upper Bound");
        assert_eq!(traces[2]["name"], "Lower Bound");
        assert_eq!(traces[1]["line"]["dash"], "dash");

        let upper = traces[1]["y"].as_array().unwrap();
        assert!(upper[0].is_null());
        assert!((upper[2].as_f64().unwrap() - 16.8).abs() < 1e-9);
        assert!(traces.iter().all(|t| t["hoverinfo"] == "none"));
    }

    #[test]
    fn test_forecast_layout_marks_today_at_breakpoint() {
        let layout = forecast_layout(&chart(), 400);
        assert_eq!(layout["shapes"][0]["x0"], "2024-01-02 00:00:00");
        assert_eq!(layout["annotations"][0]["text"], "Today");
        assert_eq!(layout["xaxis"]["ticktext"][0], "2024-01-01");
        assert_eq!(layout["yaxis"]["title"]["text"], "machine_1 (kWh)");
    }

    #[test]
    fn test_forecast_layout_without_history_has_no_marker() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        let payload = ForecastPayload {
            future_data: vec![SeriesPoint::new(ts, "v", 14.0)],
            ..Default::default()
        };
        let chart = ForecastChart::from_payload(&payload, ExplanationAlignment::Breakpoint).unwrap();
        let layout = forecast_layout(&chart, 400);
        assert!(layout["shapes"].as_array().unwrap().is_empty());
        assert_eq!(layout["yaxis"]["title"]["text"], "v");
    }

    #[test]
    fn test_explanation_figure_uses_symmetric_range() {
        let layout = ExplanationView::layout(&[ExplanationEntry::new("temp", 5.0), ExplanationEntry::new("load", -8.0)]);
        let figure = explanation_figure_layout(&layout, 300);
        let range = figure["xaxis"]["range"].as_array().unwrap();
        assert!((range[0].as_f64().unwrap() + 8.8).abs() < 1e-9);
        assert!((range[1].as_f64().unwrap() - 8.8).abs() < 1e-9);
        assert_eq!(figure["shapes"][0]["x0"], 0.0);

        let traces = explanation_traces(&layout);
        assert_eq!(traces[0]["orientation"], "h");
        assert_eq!(traces[0]["y"], json!(["temp", "load"]));
    }

    #[test]
    fn test_flat_explanation_axis_gets_a_drawable_range() {
        let layout = ExplanationView::layout(&[ExplanationEntry::new("temp", 0.0)]);
        let figure = explanation_figure_layout(&layout, 300);
        assert_eq!(figure["xaxis"]["range"], json!([-1.0, 1.0]));
    }
}
