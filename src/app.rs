use fltk::{app, prelude::FltkError};
use tracing::info;

use crate::chat::backend_from_config;
use crate::ui::{ChatWindow, TranscriptFonts};
use crate::utils::AppConfig;

pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new() -> Self {
        let config = AppConfig::load();
        Self { config }
    }

    pub fn run(&self) -> Result<(), FltkError> {
        let app = app::App::default().with_scheme(app::Scheme::Gtk);
        app::background(45, 45, 48);
        app::background2(30, 30, 30);
        app::foreground(220, 220, 220);

        let backend = backend_from_config(&self.config);
        let mut window = ChatWindow::new(
            self.config.window_width,
            self.config.window_height,
            backend,
            &self.config.system_prompt,
            TranscriptFonts::from_config(&self.config),
        );
        window.show();
        info!("chat window opened");

        app.run()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
