use eframe::egui;

use crate::state::ViewerState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ShowerPlotApp {
    pub state: ViewerState,
}

impl ShowerPlotApp {
    pub fn new(state: ViewerState) -> Self {
        Self { state }
    }
}

impl eframe::App for ShowerPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: series list ----
        egui::SidePanel::left("series_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart_plot(ui, &self.state);
        });
    }
}

/// Open the viewer window and block until it is closed.
pub fn run(state: ViewerState) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let title = format!("Shower Plot – {}", state.source.display());
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(ShowerPlotApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer window failed: {e}"))
}
