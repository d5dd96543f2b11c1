use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoint, PlotPoints, PlotUi,
    Points, Polygon, Text,
};

use crate::color::{correlation_color, generate_palette, risk_color, smoker_color, GREEN};
use crate::data::aggregate::{
    CorrelationMatrix, RegionCount, RegionMean, RiskDistribution, ScatterPoint,
};
use crate::data::model::Smoker;

/// Chart title above a plot.
pub fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong());
}

/// Static plot: the dashboard charts are not meant to be panned.
fn static_plot(id: &str) -> Plot {
    Plot::new(id.to_owned())
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
}

fn no_data(plot_ui: &mut PlotUi, at: PlotPoint) {
    plot_ui.text(Text::new(at, RichText::new("No data").color(Color32::GRAY)));
}

// ---------------------------------------------------------------------------
// Bar: average charges by region
// ---------------------------------------------------------------------------

pub fn charges_by_region(ui: &mut Ui, data: &[RegionMean]) {
    chart_title(ui, "Average Charges by Region");
    static_plot("charges_by_region")
        .show_axes([false, true])
        .y_axis_label("charges")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            if data.is_empty() {
                no_data(plot_ui, PlotPoint::new(0.0, 0.0));
                return;
            }
            let bars: Vec<Bar> = data
                .iter()
                .enumerate()
                .map(|(i, m)| {
                    Bar::new(i as f64, m.mean_charges)
                        .name(&m.region)
                        .width(0.6)
                        .fill(GREEN)
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).color(GREEN).name("Average charges"));

            for (i, m) in data.iter().enumerate() {
                plot_ui.text(Text::new(
                    PlotPoint::new(i as f64, m.mean_charges * 1.06),
                    format!("{}\n{:.0}", m.region, m.mean_charges),
                ));
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter: age vs charges, coloured by smoker flag
// ---------------------------------------------------------------------------

pub fn age_vs_charges(ui: &mut Ui, data: &[ScatterPoint]) {
    chart_title(ui, "Age vs Insurance Charges (Smoker vs Non-Smoker)");
    static_plot("age_vs_charges")
        .legend(Legend::default())
        .x_axis_label("age")
        .y_axis_label("charges")
        .show(ui, |plot_ui| {
            if data.is_empty() {
                no_data(plot_ui, PlotPoint::new(0.0, 0.0));
                return;
            }
            for smoker in Smoker::ALL {
                let points: PlotPoints = data
                    .iter()
                    .filter(|p| p.smoker == smoker)
                    .map(|p| [f64::from(p.age), p.charges])
                    .collect();
                plot_ui.points(
                    Points::new(points)
                        .name(smoker.label())
                        .color(smoker_color(smoker))
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Box: charges by risk category
// ---------------------------------------------------------------------------

pub fn charges_by_risk(ui: &mut Ui, data: &[RiskDistribution]) {
    chart_title(ui, "Insurance Charges by Risk Category");
    static_plot("charges_by_risk")
        .legend(Legend::default())
        .show_axes([false, true])
        .y_axis_label("charges")
        .show(ui, |plot_ui| {
            if data.is_empty() {
                no_data(plot_ui, PlotPoint::new(0.0, 0.0));
                return;
            }
            for (i, dist) in data.iter().enumerate() {
                let x = i as f64;
                let s = &dist.summary;
                let color = risk_color(dist.risk);

                let elem = BoxElem::new(
                    x,
                    BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
                )
                .name(dist.risk.as_str())
                .box_width(0.5)
                .fill(color.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(dist.risk.as_str()).color(color));

                if !s.outliers.is_empty() {
                    let outliers: PlotPoints = s.outliers.iter().map(|&v| [x, v]).collect();
                    plot_ui.points(Points::new(outliers).color(color).radius(2.5));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Pie: customer distribution by region
// ---------------------------------------------------------------------------

/// Arc segments per full turn.
const PIE_RESOLUTION: f64 = 120.0;

pub fn customer_distribution(ui: &mut Ui, data: &[RegionCount]) {
    chart_title(ui, "Customer Distribution by Region");
    let palette = generate_palette(data.len());

    static_plot("customer_distribution")
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .include_x(-1.3)
        .include_x(1.3)
        .include_y(-1.1)
        .include_y(1.1)
        .show(ui, |plot_ui| {
            if data.is_empty() {
                no_data(plot_ui, PlotPoint::new(0.0, 0.0));
                return;
            }
            // Start at twelve o'clock, go clockwise.
            let mut start = FRAC_PI_2;
            for (slice, &color) in data.iter().zip(palette.iter()) {
                let sweep = TAU * slice.share / 100.0;
                for wedge in pie_wedges(start, sweep) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(wedge))
                            .name(&slice.region)
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                }
                let mid = start - sweep / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.62 * mid.cos(), 0.62 * mid.sin()),
                    format!("{}\n{:.1}%", slice.region, slice.share),
                ));
                start -= sweep;
            }
        });
}

/// Polygons covering one slice. Each piece spans at most a quarter turn
/// so it stays convex.
fn pie_wedges(start: f64, sweep: f64) -> Vec<Vec<[f64; 2]>> {
    let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
    let piece_sweep = sweep / pieces as f64;
    (0..pieces)
        .map(|p| {
            let a0 = start - piece_sweep * p as f64;
            let steps = ((piece_sweep / TAU) * PIE_RESOLUTION).ceil().max(1.0) as usize;
            let mut pts = Vec::with_capacity(steps + 2);
            pts.push([0.0, 0.0]);
            for k in 0..=steps {
                let a = a0 - piece_sweep * k as f64 / steps as f64;
                pts.push([a.cos(), a.sin()]);
            }
            pts
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Heatmap: correlation matrix
// ---------------------------------------------------------------------------

pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    chart_title(ui, "Correlation Matrix");
    let n = matrix.columns.len();

    static_plot("correlation_heatmap")
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .include_x(-1.6)
        .include_y(-1.0)
        .show(ui, |plot_ui| {
            for (i, row) in matrix.values.iter().enumerate() {
                // Row 0 on top, like a printed matrix.
                let y = (n - 1 - i) as f64;
                for (j, &value) in row.iter().enumerate() {
                    let x = j as f64;
                    let cell = vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(cell))
                            .fill_color(correlation_color(value))
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                    let label = value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
                    plot_ui.text(Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(label).color(Color32::BLACK),
                    ));
                }
                plot_ui.text(Text::new(PlotPoint::new(-1.1, y), matrix.columns[i]));
            }
            for (j, name) in matrix.columns.iter().enumerate() {
                plot_ui.text(Text::new(PlotPoint::new(j as f64, -0.85), *name));
            }
        });
}
