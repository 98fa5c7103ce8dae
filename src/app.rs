//! Main application UI.
//! Selection screen, study screen, and the background card fetch feeding the
//! session controller.

use eframe::egui;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tarjetas_app::api::{CardSource, StatReporter};
use tarjetas_app::config::Config;
use tarjetas_app::controller::{Notice, SessionController};
use tarjetas_app::error::{ApiError, SessionError};
use tarjetas_app::models::{Card, SessionRequest, StudyMode};

/// Card batch being fetched on a worker thread.
struct PendingFetch {
    request: SessionRequest,
    receiver: Receiver<Result<Vec<Card>, ApiError>>,
}

/// Buttons on the study screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StudyAction {
    Back,
    Flip,
    Answer(bool),
    Exit,
}

pub struct FlashcardsApp {
    config: Config,
    source: Arc<dyn CardSource + Send + Sync>,
    controller: SessionController<StatReporter>,

    selected_category: usize,
    count_input: String,
    pending_fetch: Option<PendingFetch>,

    notice: Option<Notice>,
    error_message: Option<String>,
}

/// Adds the configured CJK font as a fallback after egui's own fonts.
pub fn install_cjk_font(ctx: &egui::Context, config: &Config) {
    let Some(path) = &config.cjk_font_path else {
        log::warn!("no cjk_font_path configured, kanji may not render");
        return;
    };

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("failed to load font {}: {}", path.display(), e);
            return;
        }
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("cjk".to_owned(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push("cjk".to_owned());
    }
    ctx.set_fonts(fonts);
}

impl eframe::App for FlashcardsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_fetch();

        if self.controller.is_studying() {
            self.render_study_screen(ctx);
        } else {
            self.render_selection_screen(ctx);
        }

        if let Some(notice) = &self.notice {
            let mut close = false;
            egui::Window::new(notice.title())
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(notice.message());
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                });
            if close {
                self.notice = None;
            }
        }

        if let Some(message) = &self.error_message {
            let mut close = false;
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                });
            if close {
                self.error_message = None;
            }
        }
    }
}

impl FlashcardsApp {
    pub fn new(
        config: Config,
        source: Arc<dyn CardSource + Send + Sync>,
        reporter: StatReporter,
    ) -> Self {
        let count_input = config.default_count.to_string();
        Self {
            config,
            source,
            controller: SessionController::new(reporter),
            selected_category: 0,
            count_input,
            pending_fetch: None,
            notice: None,
            error_message: None,
        }
    }

    /// Renders the category / count / mode picker
    fn render_selection_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("¿Qué tarjetas deseas repasar?");
            ui.separator();

            let selected_label = self
                .config
                .categories
                .get(self.selected_category)
                .map(|c| c.label.clone())
                .unwrap_or_default();
            egui::ComboBox::from_label("Categoría")
                .selected_text(selected_label)
                .show_ui(ui, |ui| {
                    for (i, category) in self.config.categories.iter().enumerate() {
                        ui.selectable_value(
                            &mut self.selected_category,
                            i,
                            category.label.as_str(),
                        );
                    }
                });

            ui.horizontal(|ui| {
                ui.label("¿Cuántas tarjetas quieres practicar hoy?");
                ui.add(egui::TextEdit::singleline(&mut self.count_input).desired_width(60.0));
            });

            ui.add_space(20.0);

            let loading = self.pending_fetch.is_some();
            let mut action_start: Option<StudyMode> = None;

            ui.add_enabled_ui(!loading, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Iniciar").clicked() {
                        action_start = Some(StudyMode::Normal);
                    }
                    if ui.button("Modo inteligente").clicked() {
                        action_start = Some(StudyMode::Smart);
                    }
                    if ui.button("Iniciar todas las tarjetas").clicked() {
                        action_start = Some(StudyMode::All);
                    }
                });
            });

            if loading {
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Cargando tarjetas...");
                });
            }

            if let Some(mode) = action_start {
                self.start_fetch(mode, ctx);
            }
        });
    }

    /// Renders the current card and the study buttons
    fn render_study_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(view) = self.controller.view() else {
                return;
            };

            ui.label(&view.counter);
            ui.add_space(10.0);

            ui.group(|ui| {
                ui.set_min_height(240.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.label(egui::RichText::new(&view.primary).size(48.0));

                    if let Some(reading) = &view.reading {
                        ui.label(egui::RichText::new(reading).size(24.0));
                    }

                    ui.add_space(20.0);

                    if let Some(translation) = &view.translation {
                        ui.label(
                            egui::RichText::new(translation)
                                .size(22.0)
                                .color(egui::Color32::LIGHT_BLUE),
                        );
                    }
                });
            });

            ui.add_space(20.0);

            // Applied after the UI pass so the controller isn't borrowed twice
            let mut action: Option<StudyAction> = None;

            ui.horizontal(|ui| {
                if ui.button("Anterior").clicked() {
                    action = Some(StudyAction::Back);
                }
                if ui.button(view.flip_label).clicked() {
                    action = Some(StudyAction::Flip);
                }
                if ui.button("No lo sabía").clicked() {
                    action = Some(StudyAction::Answer(false));
                }
                if ui.button("Lo sabía").clicked() {
                    action = Some(StudyAction::Answer(true));
                }
            });

            ui.add_space(20.0);

            if ui.button("Regresar").clicked() {
                action = Some(StudyAction::Exit);
            }

            if let Some(action) = action {
                self.handle_action(action);
            }
        });
    }

    fn handle_action(&mut self, action: StudyAction) {
        let result = match action {
            StudyAction::Back => self.controller.go_back(),
            StudyAction::Flip => self.controller.toggle_flip().map(|()| None),
            StudyAction::Answer(knew) => self.controller.answer(knew),
            StudyAction::Exit => {
                self.controller.exit();
                Ok(None)
            }
        };

        match result {
            Ok(Some(notice)) => self.notice = Some(notice),
            Ok(None) => {}
            Err(e) => log::warn!("ignoring {:?}: {}", action, e),
        }
    }

    /// Requests a card batch on a worker thread. One fetch at a time.
    fn start_fetch(&mut self, mode: StudyMode, ctx: &egui::Context) {
        if self.pending_fetch.is_some() {
            return;
        }
        let Some(category) = self.config.categories.get(self.selected_category) else {
            return;
        };

        let count = SessionRequest::parse_count(&self.count_input, self.config.default_count);
        let request = SessionRequest::new(category.key.clone(), mode, count);

        let (sender, receiver) = mpsc::channel();
        let source = Arc::clone(&self.source);
        let thread_request = request.clone();
        let ctx_clone = ctx.clone();

        thread::spawn(move || {
            let _ = sender.send(source.fetch_cards(&thread_request));
            ctx_clone.request_repaint();
        });

        self.pending_fetch = Some(PendingFetch { request, receiver });
    }

    /// Starts the session once the fetched batch arrives.
    fn poll_fetch(&mut self) {
        let Some(pending) = self.pending_fetch.take() else {
            return;
        };

        match pending.receiver.try_recv() {
            Err(TryRecvError::Empty) => self.pending_fetch = Some(pending),
            Err(TryRecvError::Disconnected) => {
                log::error!("card fetch thread exited without a result");
                self.error_message = Some("No se pudieron cargar las tarjetas.".to_string());
            }
            Ok(Err(e)) => {
                log::error!("failed to fetch cards for {}: {}", pending.request.category, e);
                self.error_message = Some(format!("No se pudieron cargar las tarjetas: {}", e));
            }
            Ok(Ok(cards)) => {
                if let Err(e) = self.controller.start(pending.request, cards) {
                    log::warn!("not starting session: {}", e);
                    self.error_message = Some(match e {
                        SessionError::EmptyBatch => "No hay tarjetas disponibles.".to_string(),
                        other => other.to_string(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;
    use tarjetas_app::models::{CardId, StatDelta};

    /// Hands out a canned batch and remembers what was asked for.
    struct FakeSource {
        cards: Result<Vec<serde_json::Value>, u16>,
        requests: Mutex<Vec<SessionRequest>>,
    }

    impl CardSource for FakeSource {
        fn fetch_cards(&self, request: &SessionRequest) -> Result<Vec<Card>, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.cards {
                Ok(values) => Ok(values
                    .iter()
                    .map(|v| serde_json::from_value(v.clone()).unwrap())
                    .collect()),
                Err(code) => Err(ApiError::HttpStatus(
                    reqwest::StatusCode::from_u16(*code).unwrap(),
                )),
            }
        }
    }

    fn app_with(
        cards: Result<Vec<serde_json::Value>, u16>,
    ) -> (FlashcardsApp, Arc<FakeSource>, Arc<Mutex<Vec<StatDelta>>>) {
        let source = Arc::new(FakeSource {
            cards,
            requests: Mutex::new(Vec::new()),
        });
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&delivered);
        let reporter = StatReporter::spawn(move |delta| {
            sink.lock().unwrap().push(delta.clone());
            Ok(())
        });

        let app = FlashcardsApp::new(Config::default(), source.clone(), reporter);
        (app, source, delivered)
    }

    fn wait_for_fetch(app: &mut FlashcardsApp) {
        for _ in 0..500 {
            app.poll_fetch();
            if app.pending_fetch.is_none() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("fetch did not finish");
    }

    #[test]
    fn test_fetch_starts_session() {
        let (mut app, source, _) = app_with(Ok(vec![
            serde_json::json!({ "id": 1, "kanji": "食べる", "grupo": "2", "español": "comer" }),
            serde_json::json!({ "id": 2, "kanji": "飲む", "grupo": "1", "español": "beber" }),
        ]));
        app.selected_category = 2;
        app.count_input = "".to_string();

        app.start_fetch(StudyMode::Smart, &egui::Context::default());
        wait_for_fetch(&mut app);

        assert!(app.controller.is_studying());
        assert_eq!(
            source.requests.lock().unwrap()[0],
            SessionRequest::new("adverbio", StudyMode::Smart, 10)
        );
        assert_eq!(app.controller.view().unwrap().counter, "Tarjeta 1 de 2");
    }

    #[test]
    fn test_fetch_error_stays_on_selection() {
        let (mut app, _, _) = app_with(Err(500));

        app.start_fetch(StudyMode::Normal, &egui::Context::default());
        wait_for_fetch(&mut app);

        assert!(!app.controller.is_studying());
        assert!(app.error_message.is_some());
    }

    #[test]
    fn test_empty_batch_reports_error() {
        let (mut app, _, _) = app_with(Ok(vec![]));

        app.start_fetch(StudyMode::Normal, &egui::Context::default());
        wait_for_fetch(&mut app);

        assert!(!app.controller.is_studying());
        assert_eq!(app.error_message.as_deref(), Some("No hay tarjetas disponibles."));
    }

    #[test]
    fn test_study_actions_and_session_end() {
        let (mut app, _, _) = app_with(Ok(vec![
            serde_json::json!({ "id": 1, "kanji": "食べる", "grupo": "2", "español": "comer" }),
        ]));
        app.start_fetch(StudyMode::Normal, &egui::Context::default());
        wait_for_fetch(&mut app);

        app.handle_action(StudyAction::Back);
        assert_eq!(app.notice, Some(Notice::FirstCard));

        app.handle_action(StudyAction::Flip);
        assert!(app.controller.view().unwrap().translation.is_some());

        app.handle_action(StudyAction::Answer(true));
        assert!(!app.controller.is_studying());
        assert!(matches!(app.notice, Some(Notice::SessionEnded(_))));
    }

    #[test]
    fn test_exit_returns_to_selection() {
        let (mut app, _, _) = app_with(Ok(vec![
            serde_json::json!({ "id": "a", "adverbio": "もう", "español": "ya" }),
            serde_json::json!({ "id": "b", "adverbio": "まだ", "español": "todavía" }),
        ]));
        app.start_fetch(StudyMode::All, &egui::Context::default());
        wait_for_fetch(&mut app);

        app.handle_action(StudyAction::Exit);
        assert!(!app.controller.is_studying());
        assert_eq!(app.notice, None);

        // Actions after exit are ignored
        app.handle_action(StudyAction::Answer(true));
        assert_eq!(app.notice, None);
    }

    #[test]
    fn test_closing_app_flushes_queued_stats() {
        let (mut app, _, delivered) = app_with(Ok(vec![
            serde_json::json!({ "id": 5, "kanji": "書く", "grupo": "1", "español": "escribir" }),
            serde_json::json!({ "id": 6, "kanji": "読む", "grupo": "1", "español": "leer" }),
        ]));
        app.start_fetch(StudyMode::Normal, &egui::Context::default());
        wait_for_fetch(&mut app);
        app.handle_action(StudyAction::Answer(true));

        // The reporter drains its queue when the app goes away
        drop(app);

        assert_eq!(
            *delivered.lock().unwrap(),
            vec![
                StatDelta::shown(CardId::Number(5)),
                StatDelta::correct(CardId::Number(5)),
                StatDelta::shown(CardId::Number(6)),
            ]
        );
    }
}
