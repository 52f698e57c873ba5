use crate::config::Config;
use crate::gradebook::GradeBook;
use crate::grading::{Aggregate, GradeEntry};
use crate::tui::theme::ThemeColors;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

const MAX_UNDO: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EntryForm,
    ConfirmDelete,
    ConfirmClear,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Subject,
    Coefficient,
    ContinuousAssessment,
    PracticalWork,
    Exam,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Subject,
        FormField::Coefficient,
        FormField::ContinuousAssessment,
        FormField::PracticalWork,
        FormField::Exam,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Subject => "Subject",
            FormField::Coefficient => "Coefficient",
            FormField::ContinuousAssessment => "CC (optional)",
            FormField::PracticalWork => "TP (optional)",
            FormField::Exam => "Exam",
        }
    }

    fn is_numeric(&self) -> bool {
        !matches!(self, FormField::Subject)
    }
}

/// State of the "add entry" popup
#[derive(Debug, Clone, PartialEq)]
pub struct EntryForm {
    pub values: [String; 5],
    pub focus: usize,
    pub error: Option<String>,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            values: [
                String::new(),
                "1".to_string(),
                String::new(),
                String::new(),
                String::new(),
            ],
            focus: 0,
            error: None,
        }
    }
}

impl EntryForm {
    pub fn focused(&self) -> FormField {
        FormField::ALL[self.focus]
    }

    pub fn value(&self, field: FormField) -> &str {
        let idx = FormField::ALL.iter().position(|f| *f == field).unwrap_or(0);
        &self.values[idx]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % FormField::ALL.len();
    }

    pub fn previous_field(&mut self) {
        self.focus = if self.focus == 0 {
            FormField::ALL.len() - 1
        } else {
            self.focus - 1
        };
    }

    /// Type a character into the focused field.
    /// Numeric fields only accept digits, separators and a sign.
    pub fn push_char(&mut self, c: char) {
        let accepted = if self.focused().is_numeric() {
            c.is_ascii_digit() || matches!(c, '.' | ',' | '-')
        } else {
            !c.is_control()
        };
        if accepted {
            self.values[self.focus].push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.values[self.focus].pop();
    }

    /// Validate the fields into an entry
    pub fn to_entry(&self) -> Result<GradeEntry, crate::gradebook::EntryError> {
        GradeEntry::from_fields(
            self.value(FormField::Subject),
            self.value(FormField::Coefficient),
            self.value(FormField::ContinuousAssessment),
            self.value(FormField::PracticalWork),
            self.value(FormField::Exam),
        )
    }
}

#[derive(Debug, Clone)]
pub enum UndoAction {
    Added {
        index: usize,
    },
    Removed {
        index: usize,
        entry: GradeEntry,
    },
    Cleared {
        entries: Vec<GradeEntry>,
    },
}

pub struct App {
    pub book: GradeBook,
    pub book_path: PathBuf,
    pub config: Config,
    pub theme: ThemeColors,
    pub summary: Aggregate,
    pub table_state: ratatui::widgets::TableState,
    pub input_mode: InputMode,
    pub form: EntryForm,
    pub flash_message: Option<(String, Instant)>,
    pub undo_stack: VecDeque<UndoAction>,
    pub should_quit: bool,
}

impl App {
    pub fn new(book: GradeBook, book_path: PathBuf, config: Config, theme: ThemeColors) -> Self {
        let mut table_state = ratatui::widgets::TableState::default();
        if !book.is_empty() {
            table_state.select(Some(0));
        }
        let summary = book.summary();

        Self {
            book,
            book_path,
            config,
            theme,
            summary,
            table_state,
            input_mode: InputMode::Normal,
            form: EntryForm::default(),
            flash_message: None,
            undo_stack: VecDeque::new(),
            should_quit: false,
        }
    }

    pub fn next_row(&mut self) {
        let len = self.book.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.book.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_entry(&self) -> Option<&GradeEntry> {
        self.table_state.selected().and_then(|i| self.book.get(i))
    }

    pub fn push_undo(&mut self, action: UndoAction) {
        self.undo_stack.push_front(action);
        if self.undo_stack.len() > MAX_UNDO {
            self.undo_stack.pop_back();
        }
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Recompute the aggregate and keep the selection within bounds.
    /// Called after every change to the gradebook.
    fn refresh(&mut self) {
        self.summary = self.book.summary();

        let len = self.book.len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            match self.table_state.selected() {
                Some(selected) if selected >= len => self.table_state.select(Some(len - 1)),
                None => self.table_state.select(Some(0)),
                _ => {}
            }
        }
    }

    /// Save to disk. Shows a flash message and returns false on failure.
    fn persist(&mut self) -> bool {
        match crate::gradebook::save_gradebook(&self.book_path, &self.book) {
            Ok(()) => true,
            Err(e) => {
                self.show_flash(format!("Failed to save gradebook: {}", e));
                false
            }
        }
    }

    /// Open the add-entry form
    pub fn start_add(&mut self) {
        self.form = EntryForm::default();
        self.input_mode = InputMode::EntryForm;
    }

    pub fn cancel_form(&mut self) {
        self.form = EntryForm::default();
        self.input_mode = InputMode::Normal;
    }

    /// Validate the form and append the entry.
    /// On a validation or save error the form stays open with the message.
    pub fn submit_form(&mut self) {
        let entry = match self.form.to_entry() {
            Ok(entry) => entry,
            Err(e) => {
                self.form.error = Some(e.to_string());
                return;
            }
        };

        let subject = entry.subject.clone();
        let average = entry.average();
        let index = self.book.add(entry);

        if !self.persist() {
            self.book.remove(index);
            self.form.error = self.flash_message.as_ref().map(|(msg, _)| msg.clone());
            return;
        }
        info!(subject = %subject, average, "Added entry");

        self.table_state.select(Some(index));
        self.refresh();
        self.input_mode = InputMode::Normal;
        self.form = EntryForm::default();

        self.push_undo(UndoAction::Added { index });
        let sep = self.config.export.decimal_char();
        self.show_flash(format!(
            "Added: {} ({}) (z to undo)",
            subject,
            crate::output::format_decimal(average, sep)
        ));
    }

    /// Ask to delete the selected entry, or delete right away when
    /// confirmation is turned off
    pub fn request_delete(&mut self) {
        if self.selected_entry().is_none() {
            return;
        }
        if self.config.display.confirm_destructive {
            self.input_mode = InputMode::ConfirmDelete;
        } else {
            self.delete_selected();
        }
    }

    /// Ask to clear every entry, or clear right away when
    /// confirmation is turned off
    pub fn request_clear(&mut self) {
        if self.book.is_empty() {
            self.show_flash("Nothing to clear".to_string());
            return;
        }
        if self.config.display.confirm_destructive {
            self.input_mode = InputMode::ConfirmClear;
        } else {
            self.clear_all();
        }
    }

    /// Confirm whichever destructive action is pending
    pub fn confirm(&mut self) {
        match self.input_mode {
            InputMode::ConfirmDelete => {
                self.input_mode = InputMode::Normal;
                self.delete_selected();
            }
            InputMode::ConfirmClear => {
                self.input_mode = InputMode::Normal;
                self.clear_all();
            }
            _ => {}
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Delete the selected entry.
    /// The book is left untouched if the change cannot be saved.
    pub fn delete_selected(&mut self) {
        let Some(index) = self.table_state.selected() else {
            return;
        };
        let Some(entry) = self.book.remove(index) else {
            return;
        };

        if !self.persist() {
            self.book.insert(index, entry);
            return;
        }
        info!(subject = %entry.subject, index, "Deleted entry");
        self.refresh();

        let subject = entry.subject.clone();
        self.push_undo(UndoAction::Removed { index, entry });
        self.show_flash(format!("Deleted: {} (z to undo)", subject));
    }

    /// Remove every entry.
    /// The book is left untouched if the change cannot be saved.
    pub fn clear_all(&mut self) {
        let entries = self.book.clear();
        let count = entries.len();

        if !self.persist() {
            self.book.restore(entries);
            return;
        }
        info!(count, "Cleared gradebook");
        self.refresh();

        self.push_undo(UndoAction::Cleared { entries });
        self.show_flash(format!("Cleared {} entries (z to undo)", count));
    }

    /// Undo the last add, delete or clear.
    /// If the undone state cannot be saved, the change is reverted and the
    /// action stays on the stack.
    pub fn undo_last(&mut self) {
        let Some(action) = self.undo_stack.pop_front() else {
            self.show_flash("Nothing to undo".to_string());
            return;
        };

        let message = match action {
            UndoAction::Added { index } => {
                let Some(entry) = self.book.remove(index) else {
                    self.show_flash("Nothing to undo".to_string());
                    return;
                };
                if !self.persist() {
                    self.book.insert(index, entry);
                    self.undo_stack.push_front(UndoAction::Added { index });
                    return;
                }
                format!("Undid add: {}", entry.subject)
            }
            UndoAction::Removed { index, entry } => {
                let subject = entry.subject.clone();
                self.book.insert(index, entry);
                if !self.persist() {
                    let index = index.min(self.book.len() - 1);
                    if let Some(entry) = self.book.remove(index) {
                        self.undo_stack.push_front(UndoAction::Removed { index, entry });
                    }
                    return;
                }
                self.table_state.select(Some(index.min(self.book.len() - 1)));
                format!("Undid delete: {}", subject)
            }
            UndoAction::Cleared { entries } => {
                let count = entries.len();
                let current = self.book.clear();
                self.book.restore(entries);
                if !self.persist() {
                    let entries = self.book.clear();
                    self.book.restore(current);
                    self.undo_stack.push_front(UndoAction::Cleared { entries });
                    return;
                }
                format!("Undid clear: {} entries restored", count)
            }
        };
        self.refresh();

        debug!(message = %message, "Undo");
        self.show_flash(message);
    }

    /// Export the gradebook as CSV to `path`
    pub fn export_to(&mut self, path: &Path) {
        match crate::output::export_to_path(path, &self.book, &self.config.export) {
            Ok(()) => self.show_flash(format!("Exported: {}", path.display())),
            Err(e) => self.show_flash(format!("Failed to export: {}", e)),
        }
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    /// Dismiss help overlay
    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_book_path(name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("moyenne_test_app_{}_{}.json", std::process::id(), name));
        let _ = fs::remove_file(&path);
        path
    }

    fn sample_book() -> GradeBook {
        GradeBook::from_entries(vec![
            GradeEntry::new("Maths", 2.0, 10.0)
                .with_continuous_assessment(12.0)
                .with_practical_work(14.0),
            GradeEntry::new("Histoire", 1.0, 16.0),
            GradeEntry::new("Chimie", 1.0, 4.0).with_practical_work(6.0),
        ])
    }

    fn app_with(book: GradeBook, name: &str) -> App {
        App::new(book, temp_book_path(name), Config::default(), ThemeColors::dark())
    }

    fn type_into(form: &mut EntryForm, text: &str) {
        for c in text.chars() {
            form.push_char(c);
        }
    }

    #[test]
    fn test_new_app_selects_first_row() {
        let app = app_with(sample_book(), "select");
        assert_eq!(app.table_state.selected(), Some(0));
        assert_eq!(app.summary.validated_count, 2);

        let empty = app_with(GradeBook::new(), "select_empty");
        assert_eq!(empty.table_state.selected(), None);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app_with(sample_book(), "nav");
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(2));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
        app.next_row();
        assert_eq!(app.selected_entry().unwrap().subject, "Histoire");
    }

    #[test]
    fn test_form_field_cycle_and_filtering() {
        let mut form = EntryForm::default();
        assert_eq!(form.focused(), FormField::Subject);
        type_into(&mut form, "Arts plastiques");
        form.next_field();
        form.backspace();
        type_into(&mut form, "2a");
        form.previous_field();
        form.previous_field();
        assert_eq!(form.focused(), FormField::Exam);

        assert_eq!(form.value(FormField::Subject), "Arts plastiques");
        assert_eq!(form.value(FormField::Coefficient), "2");
    }

    #[test]
    fn test_submit_form_adds_entry_and_recomputes() {
        let mut app = app_with(GradeBook::new(), "submit");
        app.start_add();
        type_into(&mut app.form, "Physique");
        app.form.focus = 4;
        type_into(&mut app.form, "14");
        app.submit_form();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.book.len(), 1);
        assert_eq!(app.summary.general_average, 14.0);
        assert_eq!(app.table_state.selected(), Some(0));

        // Saved to disk
        let saved = crate::gradebook::load_gradebook(&app.book_path).unwrap();
        assert_eq!(saved.len(), 1);

        let _ = fs::remove_file(&app.book_path);
    }

    #[test]
    fn test_submit_form_validation_error_keeps_form_open() {
        let mut app = app_with(GradeBook::new(), "invalid");
        app.start_add();
        type_into(&mut app.form, "Physique");
        app.submit_form();

        assert_eq!(app.input_mode, InputMode::EntryForm);
        assert_eq!(app.form.error.as_deref(), Some("Exam mark is required"));
        assert!(app.book.is_empty());
    }

    #[test]
    fn test_delete_with_confirmation_and_undo() {
        let mut app = app_with(sample_book(), "delete");
        app.next_row();
        app.request_delete();
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        assert_eq!(app.book.len(), 3);

        app.confirm();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.book.len(), 2);
        assert!(app.book.entries().iter().all(|e| e.subject != "Histoire"));
        assert_eq!(app.summary.validated_count, 1);

        app.undo_last();
        assert_eq!(app.book.len(), 3);
        assert_eq!(app.book.get(1).unwrap().subject, "Histoire");
        assert_eq!(app.summary.validated_count, 2);

        let _ = fs::remove_file(&app.book_path);
    }

    #[test]
    fn test_cancel_delete_keeps_entry() {
        let mut app = app_with(sample_book(), "cancel");
        app.request_delete();
        app.cancel_confirm();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.book.len(), 3);
    }

    #[test]
    fn test_delete_without_confirmation() {
        let mut config = Config::default();
        config.display.confirm_destructive = false;
        let mut app = App::new(sample_book(), temp_book_path("noconfirm"), config, ThemeColors::dark());

        app.previous_row();
        app.request_delete();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.book.len(), 2);
        // Selection clamped to the new last row
        assert_eq!(app.table_state.selected(), Some(1));

        let _ = fs::remove_file(&app.book_path);
    }

    #[test]
    fn test_clear_and_undo() {
        let mut app = app_with(sample_book(), "clear");
        app.request_clear();
        assert_eq!(app.input_mode, InputMode::ConfirmClear);
        app.confirm();

        assert!(app.book.is_empty());
        assert_eq!(app.summary, Aggregate::default());
        assert_eq!(app.table_state.selected(), None);

        app.undo_last();
        assert_eq!(app.book.len(), 3);
        assert_eq!(app.table_state.selected(), Some(0));

        let _ = fs::remove_file(&app.book_path);
    }

    #[test]
    fn test_clear_empty_book_is_noop() {
        let mut app = app_with(GradeBook::new(), "clear_empty");
        app.request_clear();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.flash_message.as_ref().unwrap().0, "Nothing to clear");
    }

    #[test]
    fn test_undo_add() {
        let mut app = app_with(GradeBook::new(), "undo_add");
        app.start_add();
        type_into(&mut app.form, "Musique");
        app.form.focus = 4;
        type_into(&mut app.form, "18");
        app.submit_form();
        assert_eq!(app.book.len(), 1);

        app.undo_last();
        assert!(app.book.is_empty());

        app.undo_last();
        assert_eq!(app.flash_message.as_ref().unwrap().0, "Nothing to undo");

        let _ = fs::remove_file(&app.book_path);
    }

    #[test]
    fn test_undo_stack_is_bounded() {
        let mut app = app_with(GradeBook::new(), "bounded");
        for index in 0..(MAX_UNDO + 10) {
            app.push_undo(UndoAction::Added { index });
        }
        assert_eq!(app.undo_stack.len(), MAX_UNDO);
    }

    /// App whose gradebook path is a directory, so every save fails
    fn app_with_failing_save(book: GradeBook, name: &str) -> App {
        let dir = env::temp_dir().join(format!("moyenne_test_app_{}_{}_dir", std::process::id(), name));
        fs::create_dir_all(&dir).unwrap();
        let mut config = Config::default();
        config.display.confirm_destructive = false;
        App::new(book, dir, config, ThemeColors::dark())
    }

    fn flash_text(app: &App) -> &str {
        app.flash_message.as_ref().map(|(msg, _)| msg.as_str()).unwrap_or("")
    }

    #[test]
    fn test_failed_save_keeps_cleared_entries() {
        let mut app = app_with_failing_save(sample_book(), "clear_fail");
        app.request_clear();

        assert!(flash_text(&app).starts_with("Failed to save gradebook"));
        assert_eq!(app.book.len(), 3);
        assert_eq!(app.summary.validated_count, 2);
        assert!(app.undo_stack.is_empty());

        let _ = fs::remove_dir_all(&app.book_path);
    }

    #[test]
    fn test_failed_save_keeps_deleted_entry() {
        let mut app = app_with_failing_save(sample_book(), "delete_fail");
        app.request_delete();

        assert!(flash_text(&app).starts_with("Failed to save gradebook"));
        assert_eq!(app.book.len(), 3);
        assert_eq!(app.book.get(0).unwrap().subject, "Maths");
        assert_eq!(app.table_state.selected(), Some(0));

        let _ = fs::remove_dir_all(&app.book_path);
    }

    #[test]
    fn test_failed_save_keeps_form_open() {
        let mut app = app_with_failing_save(GradeBook::new(), "submit_fail");
        app.start_add();
        type_into(&mut app.form, "Physique");
        app.form.focus = 4;
        type_into(&mut app.form, "14");
        app.submit_form();

        assert_eq!(app.input_mode, InputMode::EntryForm);
        assert_eq!(app.form.value(FormField::Subject), "Physique");
        assert!(app
            .form
            .error
            .as_deref()
            .unwrap()
            .starts_with("Failed to save gradebook"));
        assert!(app.book.is_empty());
        assert!(app.undo_stack.is_empty());

        let _ = fs::remove_dir_all(&app.book_path);
    }

    #[test]
    fn test_failed_save_during_undo_keeps_action() {
        let mut app = app_with(sample_book(), "undo_fail");
        let good_path = app.book_path.clone();
        app.request_clear();
        app.confirm();
        assert!(app.book.is_empty());

        let failing = app_with_failing_save(GradeBook::new(), "undo_fail");
        app.book_path = failing.book_path.clone();
        app.undo_last();
        assert!(app.book.is_empty());
        assert_eq!(app.undo_stack.len(), 1);

        app.book_path = good_path;
        app.undo_last();
        assert_eq!(app.book.len(), 3);
        assert!(app.undo_stack.is_empty());

        let _ = fs::remove_dir_all(&failing.book_path);
        let _ = fs::remove_file(&app.book_path);
    }

    #[test]
    fn test_export_to() {
        let mut app = app_with(sample_book(), "export");
        let path = env::temp_dir().join(format!("moyenne_test_app_export_{}.csv", std::process::id()));
        app.export_to(&path);

        assert!(app.flash_message.as_ref().unwrap().0.starts_with("Exported:"));
        assert!(fs::read_to_string(&path).unwrap().contains("Chimie"));

        let _ = fs::remove_file(&path);
    }
}
