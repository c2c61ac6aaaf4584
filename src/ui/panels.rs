use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Left side panel – series list
// ---------------------------------------------------------------------------

/// Render the left panel: one entry per line with its colour and y range.
pub fn side_panel(ui: &mut Ui, state: &ViewerState) {
    ui.heading("Series");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for line in state.chart.lines() {
                let color = Color32::from_rgb(line.color.red, line.color.green, line.color.blue);
                ui.label(RichText::new(format!("■ {}", line.label)).color(color).strong());

                let range = match line.y_bounds() {
                    Some((lo, hi)) => format!("{lo:.3e} – {hi:.3e}"),
                    None => "no points".to_string(),
                };
                ui.label(RichText::new(range).small());
                ui.add_space(4.0);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Save image…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{}: {} rows, {} series",
            state.source.display(),
            state.rows,
            state.chart.lines().len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut ViewerState) {
    let file = rfd::FileDialog::new()
        .set_title("Open shower table")
        .add_filter("Tables", &["txt", "dat", "csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        state.open(path);
    }
}

pub fn save_file_dialog(state: &mut ViewerState) {
    let file = rfd::FileDialog::new()
        .set_title("Save chart")
        .add_filter("PNG", &["png"])
        .add_filter("SVG", &["svg"])
        .set_file_name("chart.png")
        .save_file();

    if let Some(path) = file {
        state.save(&path);
    }
}
