use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{
    uniform_grid_spacer, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, PlotUi, Points,
};

use crate::color::{metric_color, SectionColors};
use crate::data::chart::{ChartSpec, Metric};
use crate::data::view::ChartOutcome;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Chart area (central panel)
// ---------------------------------------------------------------------------

/// Render one chart per selected section, or the reason there are none.
pub fn chart_panel(ui: &mut Ui, state: &AppState) {
    let charts = match &state.view().charts {
        ChartOutcome::Charts(charts) => charts,
        ChartOutcome::NoSelection => {
            placeholder(ui, "Please select a course and at least one section to view charts");
            return;
        }
        ChartOutcome::NoMatchingData => {
            placeholder(ui, "No data available for the selected filters");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if state.compare_sections && charts.len() > 1 {
                ui.heading("All sections – Median Bid");
                compare_plot(ui, charts);
                ui.separator();
            }
            for (i, chart) in charts.iter().enumerate() {
                ui.push_id(i, |ui: &mut Ui| section_chart(ui, chart));
                ui.add_space(12.0);
            }
        });
}

fn placeholder(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(RichText::new(text).heading().color(Color32::GRAY));
    });
}

// ---------------------------------------------------------------------------
// Term-indexed plots
// ---------------------------------------------------------------------------

/// Show a plot with the term labels of `chart` on the x-axis (one tick per term).
fn show_term_plot(
    ui: &mut Ui,
    id: impl std::hash::Hash,
    chart: &ChartSpec,
    add_contents: impl FnOnce(&mut PlotUi),
) {
    let tick_labels: Vec<String> = chart.points.iter().map(|p| p.term.clone()).collect();
    let hover_labels = tick_labels.clone();
    let last = tick_labels.len().saturating_sub(1) as f64;

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Term")
        .y_axis_label("Bid Amount")
        .include_x(-0.5)
        .include_x(last + 0.5)
        .include_y(0.0)
        .allow_scroll(false)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 2.0, 10.0]))
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            term_at(&tick_labels, mark.value).unwrap_or_default()
        })
        .label_formatter(move |name: &str, point: &PlotPoint| {
            let term = term_at(&hover_labels, point.x).unwrap_or_default();
            if name.is_empty() {
                term
            } else {
                format!("{name}\n{term}: {:.2}", point.y)
            }
        })
        .show(ui, |plot_ui| add_contents(plot_ui));
}

/// Label of the term at an integral x position.
fn term_at(labels: &[String], x: f64) -> Option<String> {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return None;
    }
    labels.get(idx as usize).cloned()
}

/// Draw one metric as disjoint line segments plus markers; gaps stay open.
fn draw_series(
    plot_ui: &mut PlotUi,
    chart: &ChartSpec,
    metric: Metric,
    name: &str,
    color: Color32,
) {
    for segment in chart.segments(metric) {
        let points: Vec<[f64; 2]> = segment.iter().map(|&(i, v)| [i as f64, v]).collect();
        let line_points: PlotPoints = points.clone().into();
        plot_ui.line(Line::new(line_points).name(name).color(color).width(2.0));
        let marker_points: PlotPoints = points.into();
        plot_ui.points(Points::new(marker_points).name(name).color(color).radius(3.0));
    }
}

fn section_chart(ui: &mut Ui, chart: &ChartSpec) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(&chart.title);
        ui.label(
            RichText::new(format!(
                "{} of {} terms with data",
                chart.observed_terms(),
                chart.points.len()
            ))
            .weak(),
        );
    });
    show_term_plot(ui, "section_chart", chart, |plot_ui| {
        for metric in Metric::ALL {
            draw_series(plot_ui, chart, metric, metric.label(), metric_color(metric));
        }
    });

    egui::CollapsingHeader::new("Values per term")
        .default_open(false)
        .show(ui, |ui: &mut Ui| term_table(ui, chart));
}

fn compare_plot(ui: &mut Ui, charts: &[ChartSpec]) {
    let sections: Vec<&str> = charts.iter().map(|c| c.section.as_str()).collect();
    let colors = SectionColors::new(&sections);
    show_term_plot(ui, "compare_chart", &charts[0], |plot_ui| {
        for chart in charts {
            let name = format!("Section {}", chart.section);
            let color = colors.color_for(&chart.section);
            draw_series(plot_ui, chart, Metric::MedianBid, &name, color);
        }
    });
}

// ---------------------------------------------------------------------------
// Value table
// ---------------------------------------------------------------------------

fn fmt_bid(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "–".to_string())
}

fn term_table(ui: &mut Ui, chart: &ChartSpec) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(120.0))
        .columns(Column::auto().at_least(90.0), 2)
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Term");
            });
            for metric in Metric::ALL {
                header.col(|ui: &mut Ui| {
                    ui.strong(metric.label());
                });
            }
        })
        .body(|mut body| {
            for point in &chart.points {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(&point.term);
                    });
                    for metric in Metric::ALL {
                        row.col(|ui: &mut Ui| {
                            ui.label(fmt_bid(point.value(metric)));
                        });
                    }
                });
            }
        });
}
