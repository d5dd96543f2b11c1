use eframe::egui::{self, Color32, Frame, RichText, Slider, Ui};

use crate::color::TITLE;
use crate::data::model::Smoker;
use crate::state::AppState;
use crate::ui::format::metric_cards;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Widgets only edit `state.criteria`; the
/// recompute happens in `AppState::sync` once the frame's input is in.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // ---- Region (single-select) ----
    ui.strong("Select Region:");
    let regions = state.dataset.regions().to_vec();
    egui::ComboBox::from_id_salt("region")
        .selected_text(&state.criteria.region)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for region in &regions {
                ui.selectable_value(&mut state.criteria.region, region.clone(), region);
            }
        });
    ui.add_space(12.0);

    // ---- Age range: two handles kept ordered ----
    ui.strong("Select Age Range:");
    let (lo, hi) = state.dataset.age_bounds();
    let min_moved = ui
        .add(Slider::new(&mut state.criteria.age_min, lo..=hi).text("from"))
        .changed();
    if min_moved {
        state.clamp_age_range(true);
    }
    let max_moved = ui
        .add(Slider::new(&mut state.criteria.age_max, lo..=hi).text("to"))
        .changed();
    if max_moved {
        state.clamp_age_range(false);
    }
    ui.add_space(12.0);

    // ---- Smoker status ----
    ui.strong("Filter by Smoker Status:");
    ui.horizontal(|ui: &mut Ui| {
        for smoker in Smoker::ALL {
            let mut checked = state.criteria.smokers.contains(&smoker);
            if ui.checkbox(&mut checked, smoker.label()).changed() {
                state.criteria.toggle_smoker(smoker);
            }
        }
    });
    ui.add_space(12.0);
    ui.separator();

    if ui.button("Reset filters").clicked() {
        state.reset_filters();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(RichText::new("LifeSure Insurance Dashboard").color(TITLE).strong());
        ui.separator();
        ui.label(format!(
            "{} customers loaded, {} matching",
            state.dataset.len(),
            state.artifacts().metrics.total_customers
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    let cards = metric_cards(&state.artifacts().metrics);
    ui.columns(cards.len(), |columns| {
        for (ui, card) in columns.iter_mut().zip(cards.iter()) {
            Frame::group(ui.style())
                .fill(ui.visuals().faint_bg_color)
                .show(ui, |ui: &mut Ui| {
                    ui.set_min_width(ui.available_width());
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.label(RichText::new(card.title).strong());
                        ui.label(RichText::new(&card.value).size(24.0).color(TITLE));
                    });
                });
        }
    });
}
