use eframe::egui;
use egui_extras::{Size, StripBuilder};

use crate::state::{AppState, Phase};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LifeSureApp {
    pub state: AppState,
}

impl LifeSureApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LifeSureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // All inputs for this frame are in; swap artifacts before drawing.
        self.state.sync();
        debug_assert_eq!(self.state.phase(), Phase::Idle);
        let artifacts = self.state.artifacts();

        // ---- Central panel: metrics and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            StripBuilder::new(ui)
                .size(Size::exact(90.0))
                .size(Size::relative(0.32).at_least(200.0))
                .size(Size::relative(0.32).at_least(200.0))
                .size(Size::remainder().at_least(220.0))
                .vertical(|mut strip| {
                    strip.cell(|ui| panels::metrics_row(ui, &self.state));
                    strip.strip(|builder| {
                        builder.sizes(Size::remainder(), 2).horizontal(|mut strip| {
                            strip.cell(|ui| {
                                plot::charges_by_region(ui, &artifacts.charges_by_region)
                            });
                            strip.cell(|ui| plot::age_vs_charges(ui, &artifacts.age_vs_charges));
                        });
                    });
                    strip.strip(|builder| {
                        builder.sizes(Size::remainder(), 2).horizontal(|mut strip| {
                            strip.cell(|ui| {
                                plot::charges_by_risk(ui, &artifacts.charges_by_risk)
                            });
                            strip.cell(|ui| {
                                plot::customer_distribution(ui, &artifacts.customer_distribution)
                            });
                        });
                    });
                    strip.cell(|ui| plot::correlation_heatmap(ui, &artifacts.correlation));
                });
        });
    }
}
