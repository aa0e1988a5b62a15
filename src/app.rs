//! Main application UI and state management.
//! Handles group browsing, group creation and editing, and study sessions.

use crate::export::json::{export_group_to_path, import_group};
use crate::models::study_session::format_elapsed;
use crate::models::{AnswerOutcome, Flashcard, Group, StudySession};
use crate::store::FlashcardStore;
use eframe::egui;
use std::path::Path;

/// Application screen states
#[derive(Clone, Copy, Default, PartialEq, Eq)]
enum AppScreen {
    #[default]
    Menu,
    Create,
    Flashcards,
    Study,
}

/// A dialog waiting to be dismissed with OK
struct Message {
    title: String,
    text: String,
}

/// Drops rows where both fields were left empty
fn filled_cards(cards: &[Flashcard]) -> Vec<Flashcard> {
    cards
        .iter()
        .filter(|c| !c.question.is_empty() || !c.answer.is_empty())
        .cloned()
        .collect()
}

/// Main application state
pub struct MyApp {
    store: FlashcardStore,
    current_screen: AppScreen,
    groups: Vec<Group>,

    new_group_name: String,
    new_cards: Vec<Flashcard>,

    selected_group: Option<Group>,
    edit_cards: Vec<Flashcard>,
    show_delete_dialog: bool,

    study_session: Option<StudySession>,
    answer_input: String,
    /// Moves keyboard focus to the answer field on the next frame
    focus_answer: bool,

    messages: Vec<Message>,
    show_export_dialog: bool,
    show_confirmation_dialog: bool,
    allowed_to_close: bool,
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_screens(ctx);
    }
}

impl MyApp {
    /// Draws the current screen and any open dialogs
    fn update_screens(&mut self, ctx: &egui::Context) {
        match self.current_screen {
            AppScreen::Menu => self.render_menu_screen(ctx),
            AppScreen::Create => self.render_create_screen(ctx),
            AppScreen::Flashcards => self.render_flashcards_screen(ctx),
            AppScreen::Study => self.render_study_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_export_dialog {
            self.render_export_dialog(ctx);
        }

        if self.show_delete_dialog {
            self.render_delete_dialog(ctx);
        }

        if let Some(message) = self.messages.first() {
            let mut dismissed = false;
            egui::Window::new(message.title.as_str())
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message.text.as_str());
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            if dismissed {
                self.messages.remove(0);
            }
        }
    }

    /// Creates a new application instance with groups loaded from the store
    pub fn new(store: FlashcardStore) -> Self {
        let mut app = Self {
            store,
            current_screen: AppScreen::Menu,
            groups: Vec::new(),
            new_group_name: String::new(),
            new_cards: Vec::new(),
            selected_group: None,
            edit_cards: Vec::new(),
            show_delete_dialog: false,
            study_session: None,
            answer_input: String::new(),
            focus_answer: false,
            messages: Vec::new(),
            show_export_dialog: false,
            show_confirmation_dialog: false,
            allowed_to_close: false,
        };
        app.reload_groups();
        app
    }

    fn show_message(&mut self, title: &str, text: impl Into<String>) {
        self.messages.push(Message {
            title: title.to_string(),
            text: text.into(),
        });
    }

    fn show_error(&mut self, context: &str, error: &dyn std::error::Error) {
        tracing::error!("{}: {}", context, error);
        self.show_message("Error", format!("{}: {}", context, error));
    }

    fn reload_groups(&mut self) {
        match self.store.list_groups() {
            Ok(groups) => self.groups = groups,
            Err(e) => {
                self.groups.clear();
                self.show_error("Could not load flashcards", &e);
            }
        }
    }

    /// Switches screens. Entering the menu re-reads the document, entering study
    /// starts a fresh session and leaving study reports its stats.
    fn go_to(&mut self, screen: AppScreen) {
        if self.current_screen == AppScreen::Study && screen != AppScreen::Study {
            if let Some(session) = self.study_session.take() {
                self.show_stats(&session);
            }
        }

        match screen {
            AppScreen::Menu => self.reload_groups(),
            AppScreen::Study => self.start_study_session(),
            AppScreen::Create | AppScreen::Flashcards => {}
        }

        self.current_screen = screen;
    }

    /// Groups that can be listed, with their index in the document.
    /// Entries without a name are kept on disk but never shown.
    fn named_groups(&self) -> impl Iterator<Item = (usize, &Group)> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| !g.name.is_empty())
    }

    /// Renders the main screen with the list of groups
    fn render_menu_screen(&mut self, ctx: &egui::Context) {
        let mut action_open: Option<usize> = None;
        let mut action_create = false;
        let mut action_import = false;
        let mut action_export = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("New Group").clicked() {
                    action_create = true;
                }
                if ui.button("Import Group").clicked() {
                    action_import = true;
                }
                if ui.button("Export Group").clicked() {
                    action_export = true;
                }
            });

            ui.separator();

            ui.heading(format!("Groups ({})", self.named_groups().count()));

            egui::ScrollArea::vertical()
                .id_salt("groups_list")
                .show(ui, |ui| {
                    for (i, group) in self.named_groups() {
                        ui.group(|ui| {
                            ui.set_min_width(ui.available_width());
                            let label = format!("{} ({} cards)", group.name, group.flashcards.len());
                            if ui
                                .add(egui::Label::new(label).sense(egui::Sense::click()))
                                .clicked()
                            {
                                action_open = Some(i);
                            }
                        });
                    }
                });
        });

        if let Some(i) = action_open {
            self.open_group(i);
        }
        if action_create {
            self.new_group_name.clear();
            self.new_cards = vec![Flashcard::default()];
            self.go_to(AppScreen::Create);
        }
        if action_import {
            self.handle_import();
        }
        if action_export {
            self.show_export_dialog = true;
        }
    }

    fn open_group(&mut self, index: usize) {
        if let Some(group) = self.groups.get(index) {
            self.edit_cards = group.flashcards.clone();
            self.selected_group = Some(group.clone());
            self.go_to(AppScreen::Flashcards);
        }
    }

    /// Renders the group creation form
    fn render_create_screen(&mut self, ctx: &egui::Context) {
        let mut action_save = false;
        let mut action_back = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Back").clicked() {
                    action_back = true;
                }
                ui.heading("Create New Group");
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Group name:");
                ui.text_edit_singleline(&mut self.new_group_name);
            });

            ui.separator();

            Self::card_editor(ui, "new_cards_list", &mut self.new_cards);

            ui.add_space(10.0);

            if ui.button("Save Group").clicked() {
                action_save = true;
            }
        });

        if action_save {
            self.save_new_group();
        }
        if action_back {
            self.go_to(AppScreen::Menu);
        }
    }

    /// Editable question/answer rows with add and remove buttons
    fn card_editor(ui: &mut egui::Ui, id: &str, cards: &mut Vec<Flashcard>) {
        let mut action_remove: Option<usize> = None;

        ui.heading(format!("Flashcards ({})", cards.len()));

        egui::ScrollArea::vertical()
            .id_salt(id)
            .max_height((ui.available_height() - 60.0).max(120.0))
            .show(ui, |ui| {
                for (i, card) in cards.iter_mut().enumerate() {
                    ui.horizontal(|ui| {
                        ui.add(
                            egui::TextEdit::singleline(&mut card.question)
                                .hint_text("Question")
                                .desired_width(180.0),
                        );
                        ui.add(
                            egui::TextEdit::singleline(&mut card.answer)
                                .hint_text("Answer")
                                .desired_width(180.0),
                        );
                        if ui.button("✖").clicked() {
                            action_remove = Some(i);
                        }
                    });
                }
            });

        if ui.button("Add Flashcard").clicked() {
            cards.push(Flashcard::default());
        }

        if let Some(i) = action_remove {
            cards.remove(i);
        }
    }

    fn save_new_group(&mut self) {
        let name = self.new_group_name.clone();
        let cards = filled_cards(&self.new_cards);

        match self.store.append_group(&name, cards) {
            Ok(()) => {
                self.show_message("Success", "Flashcards saved successfully!");
                self.new_group_name.clear();
                self.new_cards.clear();
                self.go_to(AppScreen::Menu);
            }
            Err(e) => self.show_error("Could not save group", &e),
        }
    }

    /// Renders the editor for the selected group
    fn render_flashcards_screen(&mut self, ctx: &egui::Context) {
        let Some(group_name) = self.selected_group.as_ref().map(|g| g.name.clone()) else {
            self.go_to(AppScreen::Menu);
            return;
        };

        let mut action_save = false;
        let mut action_study = false;
        let mut action_back = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Back").clicked() {
                    action_back = true;
                }
                ui.heading(group_name.as_str());
            });

            ui.horizontal(|ui| {
                if ui.button("Study").clicked() {
                    action_study = true;
                }
                if ui.button("Delete Group").clicked() {
                    self.show_delete_dialog = true;
                }
            });

            ui.separator();

            Self::card_editor(ui, "edit_cards_list", &mut self.edit_cards);

            ui.add_space(10.0);

            if ui.button("Save Changes").clicked() {
                action_save = true;
            }
        });

        if action_save {
            self.save_group_changes(&group_name);
        }
        if action_study {
            self.go_to(AppScreen::Study);
        }
        if action_back {
            self.go_to(AppScreen::Menu);
        }
    }

    fn save_group_changes(&mut self, group_name: &str) {
        let cards = filled_cards(&self.edit_cards);

        match self.store.replace_flashcards(group_name, cards.clone()) {
            Ok(true) => {
                if let Some(group) = self.selected_group.as_mut() {
                    group.flashcards = cards;
                }
                self.show_message("Success", "Flashcards saved successfully!");
            }
            Ok(false) => {
                self.show_message(
                    "Not Saved",
                    format!("Group '{}' no longer exists.", group_name),
                );
            }
            Err(e) => self.show_error("Could not save flashcards", &e),
        }
    }

    fn render_delete_dialog(&mut self, ctx: &egui::Context) {
        let mut confirmed = false;
        let mut cancelled = false;

        egui::Window::new("Delete Group")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Are you sure you want to delete this group?");
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                    if ui.button("Delete").clicked() {
                        confirmed = true;
                    }
                });
            });

        if cancelled {
            self.show_delete_dialog = false;
        }
        if confirmed {
            self.show_delete_dialog = false;
            self.delete_selected_group();
        }
    }

    fn delete_selected_group(&mut self) {
        let Some(group) = self.selected_group.take() else {
            return;
        };

        match self.store.delete_group(&group.name) {
            Ok(_) => self.go_to(AppScreen::Menu),
            Err(e) => {
                self.selected_group = Some(group);
                self.show_error("Could not delete group", &e);
            }
        }
    }

    fn start_study_session(&mut self) {
        if let Some(group) = &self.selected_group {
            tracing::info!(
                "Starting study session for '{}' with {} cards",
                group.name,
                group.flashcards.len()
            );
            self.study_session = Some(StudySession::start(group.name.clone(), &group.flashcards));
            self.answer_input.clear();
            self.focus_answer = true;
        }
    }

    /// Renders the study screen with the current question
    fn render_study_screen(&mut self, ctx: &egui::Context) {
        let mut submitted: Option<String> = None;
        let mut action_back = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            if ui.button("Back").clicked() {
                action_back = true;
            }

            let Some(session) = &self.study_session else {
                return;
            };

            ui.heading(format!("Study: {}", session.group_name));
            ui.label(session.progress_message());
            let stats = session.stats();
            ui.label(format!(
                "Correct: {}   Incorrect: {}",
                stats.correct, stats.incorrect
            ));

            ui.add_space(20.0);

            let card = session.current_card();
            let active = card.is_some();
            let question = card
                .map(|c| c.question.as_str())
                .unwrap_or("No more flashcards available.");

            ui.group(|ui| {
                ui.set_min_height(120.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.heading(question);
                    ui.add_space(20.0);
                });
            });

            ui.add_space(20.0);

            let response = ui.add_enabled(
                active,
                egui::TextEdit::singleline(&mut self.answer_input).hint_text("Answer"),
            );
            let enter_pressed =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if ui.add_enabled(active, egui::Button::new("Check")).clicked()
                || (active && enter_pressed)
            {
                submitted = Some(self.answer_input.clone());
            }

            if active && self.focus_answer {
                response.request_focus();
                self.focus_answer = false;
            }
        });

        if let Some(answer) = submitted {
            self.check_answer(&answer);
        }
        if action_back {
            self.go_to(AppScreen::Menu);
        }
    }

    fn check_answer(&mut self, answer: &str) {
        let Some(session) = self.study_session.as_mut() else {
            return;
        };

        if let Some(AnswerOutcome::Incorrect { expected }) = session.submit_answer(answer) {
            self.show_message(
                "Incorrect Answer",
                format!(
                    "Sorry, your answer is incorrect. The correct answer is:\n{}",
                    expected
                ),
            );
        }
        self.answer_input.clear();
        self.focus_answer = true;
    }

    fn show_stats(&mut self, session: &StudySession) {
        let stats = session.stats();
        tracing::info!(
            "Study session for '{}' finished: {} correct, {} incorrect",
            session.group_name,
            stats.correct,
            stats.incorrect
        );
        self.show_message(
            "Study Stats",
            format!(
                "Correct Answers: {}\nIncorrect Answers: {}\nStarted at {}, studied for {}",
                stats.correct,
                stats.incorrect,
                session.started_at().format("%H:%M"),
                format_elapsed(session.elapsed())
            ),
        );
    }

    fn render_export_dialog(&mut self, ctx: &egui::Context) {
        let mut export_group_index: Option<usize> = None;
        let mut should_cancel = false;

        egui::Window::new("Export Group")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Select a group to export:");
                ui.separator();

                for (i, group) in self.named_groups() {
                    if ui
                        .button(format!("{} ({} cards)", group.name, group.flashcards.len()))
                        .clicked()
                    {
                        export_group_index = Some(i);
                    }
                }

                ui.separator();

                if ui.button("Cancel").clicked() {
                    should_cancel = true;
                }
            });

        if let Some(i) = export_group_index {
            self.handle_export(i);
        }
        if should_cancel {
            self.show_export_dialog = false;
        }
    }

    /// Handles group export to a JSON file
    fn handle_export(&mut self, group_index: usize) {
        self.show_export_dialog = false;

        let Some(group) = self.groups.get(group_index).cloned() else {
            return;
        };

        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(format!("{}.json", group.name))
            .add_filter("JSON files", &["json"])
            .save_file()
        {
            match export_group_to_path(&group, &path) {
                Ok(()) => self.show_message(
                    "Export",
                    format!("Group '{}' exported successfully!", group.name),
                ),
                Err(e) => self.show_error("Export failed", &e),
            }
        }
    }

    /// Handles group import from a JSON file
    fn handle_import(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        self.import_from_path(&path);
    }

    /// Appends the group stored at `path` unless its name is already taken
    fn import_from_path(&mut self, path: &Path) {
        let group = match import_group(path) {
            Ok(group) => group,
            Err(e) => {
                self.show_error("Import failed", &e);
                return;
            }
        };

        if self.groups.iter().any(|g| g.name == group.name) {
            self.show_message(
                "Import",
                format!(
                    "Group '{}' already exists! Please rename it in the JSON file.",
                    group.name
                ),
            );
            return;
        }

        let count = group.flashcards.len();
        match self.store.append_group(&group.name, group.flashcards) {
            Ok(()) => {
                self.show_message(
                    "Import",
                    format!(
                        "Group '{}' imported successfully with {} cards!",
                        group.name, count
                    ),
                );
                self.reload_groups();
            }
            Err(e) => self.show_error("Import failed", &e),
        }
    }
}
