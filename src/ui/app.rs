use std::cmp::min;
use std::mem;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use crossterm::event::KeyCode;
use open::that as open_path;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{error, info};

use crate::book::BoatBook;
use crate::export::{export_certificate, export_spreadsheet};
use crate::listing::SortKey;
use crate::models::BoatField;

use super::forms::{ConfirmBoatDelete, FormMode, RecordForm};
use super::helpers::{build_boat_card_lines, centered_rect, scroll_start, surface_error};
use super::screens::RecordListScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Title bar with the record count, sort key and search term.
const HEADER_HEIGHT: u16 = 3;
/// Five text rows plus the card border.
const BOAT_CARD_HEIGHT: u16 = 7;
/// Rows skipped by PageUp / PageDown.
const PAGE_STEP: isize = 5;
const APP_TITLE: &str = "Boat Admeasurement Records";

/// Startup options the UI needs from configuration.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub export_dir: PathBuf,
    pub open_after_export: bool,
    pub default_sort: SortKey,
}

/// Modal state layered over the record list.
enum Mode {
    Normal,
    Editing(RecordForm),
    ConfirmDelete(ConfirmBoatDelete),
    Searching(SearchState),
}

/// State for an active inline search.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    book: BoatBook,
    list: RecordListScreen,
    mode: Mode,
    status: Option<StatusMessage>,
    settings: AppSettings,
    last_export: Option<PathBuf>,
}

impl App {
    pub fn new(book: BoatBook, settings: AppSettings) -> Self {
        let list = RecordListScreen::new(settings.default_sort, book.boats());
        Self {
            book,
            list,
            mode: Mode::Normal,
            status: None,
            settings,
            last_export: None,
        }
    }

    pub fn book(&self) -> &BoatBook {
        &self.book
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Editing(form) => self.handle_form(code, form)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
            Mode::Searching(state) => self.handle_search(code, state)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    /// Ctrl+S submits an open form; it is a no-op elsewhere.
    pub(crate) fn handle_ctrl_s(&mut self) -> Result<()> {
        let mode = mem::replace(&mut self.mode, Mode::Normal);
        self.mode = match mode {
            Mode::Editing(form) => self.submit_form(form)?,
            other => other,
        };
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc => {
                if self.list.has_search() {
                    self.list.set_search(String::new(), self.book.boats());
                    self.set_status("Search cleared.", StatusKind::Info);
                } else {
                    *exit = true;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.list.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.list.move_selection(1),
            KeyCode::PageUp => self.list.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.list.move_selection(PAGE_STEP),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End => self.list.select_last(),
            KeyCode::Char('n') | KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::Editing(RecordForm::new(FormMode::Create)));
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(boat) = self.list.current_boat(self.book.boats()).cloned() {
                    self.clear_status();
                    return Ok(Mode::Editing(RecordForm::new(FormMode::Edit(boat))));
                }
                self.set_status("No record selected.", StatusKind::Error);
            }
            KeyCode::Char('d') | KeyCode::Char('-') | KeyCode::Delete => {
                if let Some(boat) = self.list.current_boat(self.book.boats()) {
                    let confirm = ConfirmBoatDelete::for_boat(boat);
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(confirm));
                }
                self.set_status("No record selected.", StatusKind::Error);
            }
            KeyCode::Char('p') => self.export_selected_certificate(),
            KeyCode::Char('x') => self.export_all_to_spreadsheet(),
            KeyCode::Char('o') => self.open_last_export(),
            KeyCode::Char('s') => {
                let sort = self.list.cycle_sort(self.book.boats());
                self.set_status(format!("{sort}."), StatusKind::Info);
            }
            KeyCode::Char('f') | KeyCode::Char('/') => {
                self.clear_status();
                return Ok(Mode::Searching(SearchState {
                    query: self.list.search.clone(),
                }));
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_form(&mut self, code: KeyCode, mut form: RecordForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Changes discarded.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => {
                form.backspace();
                form.error = None;
            }
            KeyCode::Enter => return self.submit_form(form),
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::Editing(form))
    }

    fn submit_form(&mut self, mut form: RecordForm) -> Result<Mode> {
        let submission = match form.submit(Local::now().date_naive()) {
            Ok(submission) => submission,
            Err(err) => {
                self.set_status(surface_error(&err), StatusKind::Error);
                return Ok(Mode::Editing(form));
            }
        };

        let saved = match &form.mode {
            FormMode::Create => self.book.create(submission, Local::now()),
            FormMode::Edit(existing) => self.book.update(&existing.id, submission),
        };

        match saved {
            Ok(record) => {
                self.list.refresh(self.book.boats(), Some(&record.id));
                let verb = match form.mode {
                    FormMode::Create => "Added",
                    FormMode::Edit(_) => "Updated",
                };
                self.set_status(format!("{verb} {record}."), StatusKind::Info);
                Ok(Mode::Normal)
            }
            Err(err) => {
                let err = anyhow::Error::from(err);
                error!(error = %err, "failed to save boat record");
                let message = format!("Could not save: {}", surface_error(&err));
                form.error = Some(message.clone());
                self.set_status(message, StatusKind::Error);
                Ok(Mode::Editing(form))
            }
        }
    }

    fn handle_confirm_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmBoatDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                match self.book.delete(&confirm.id) {
                    Ok(_) => {
                        self.list.refresh(self.book.boats(), None);
                        self.set_status(
                            format!("Deleted record for {}.", confirm.owner_name),
                            StatusKind::Info,
                        );
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        let err = anyhow::Error::from(err);
                        error!(error = %err, id = %confirm.id, "failed to delete boat record");
                        self.set_status(
                            format!("Could not delete: {}", surface_error(&err)),
                            StatusKind::Error,
                        );
                        Ok(Mode::ConfirmDelete(confirm))
                    }
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.set_status("Delete cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.list.set_search(String::new(), self.book.boats());
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => {
                let shown = self.list.visible.len();
                self.set_status(
                    format!("{shown} of {} records match.", self.book.len()),
                    StatusKind::Info,
                );
                return Ok(Mode::Normal);
            }
            KeyCode::Up => self.list.move_selection(-1),
            KeyCode::Down => self.list.move_selection(1),
            KeyCode::Backspace => {
                state.query.pop();
                self.list.set_search(state.query.clone(), self.book.boats());
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                state.query.push(ch);
                self.list.set_search(state.query.clone(), self.book.boats());
            }
            _ => {}
        }
        Ok(Mode::Searching(state))
    }

    fn export_selected_certificate(&mut self) {
        let Some(boat) = self.list.current_boat(self.book.boats()).cloned() else {
            self.set_status("No record selected.", StatusKind::Error);
            return;
        };
        match export_certificate(&boat, &self.settings.export_dir) {
            Ok(path) => self.finish_export(path, "certificate"),
            Err(err) => {
                let err = anyhow::Error::from(err);
                error!(error = %err, id = %boat.id, "certificate export failed");
                self.set_status(
                    format!("Certificate export failed: {}", surface_error(&err)),
                    StatusKind::Error,
                );
            }
        }
    }

    fn export_all_to_spreadsheet(&mut self) {
        match export_spreadsheet(self.book.boats(), &self.settings.export_dir) {
            Ok(path) => self.finish_export(path, "spreadsheet"),
            Err(err) => {
                let err = anyhow::Error::from(err);
                error!(error = %err, "spreadsheet export failed");
                self.set_status(
                    format!("Spreadsheet export failed: {}", surface_error(&err)),
                    StatusKind::Error,
                );
            }
        }
    }

    fn finish_export(&mut self, path: PathBuf, what: &str) {
        self.set_status(
            format!("Saved {what} to {}.", path.display()),
            StatusKind::Info,
        );
        if self.settings.open_after_export {
            self.open_file(&path);
        }
        self.last_export = Some(path);
    }

    fn open_last_export(&mut self) {
        match self.last_export.clone() {
            Some(path) => {
                self.open_file(&path);
            }
            None => self.set_status("Nothing has been exported yet.", StatusKind::Error),
        }
    }

    fn open_file(&mut self, path: &Path) {
        match open_path(path) {
            Ok(()) => {
                info!(path = %path.display(), "opened export");
                self.set_status(format!("Opened {}.", path.display()), StatusKind::Info);
            }
            Err(err) => {
                error!(error = %err, path = %path.display(), "failed to open export");
                self.set_status(format!("Failed to open file: {err}"), StatusKind::Error);
            }
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let header_height = HEADER_HEIGHT.min(content_area.height);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(header_height), Constraint::Min(0)])
            .split(content_area);
        self.draw_header(frame, chunks[0]);
        self.draw_record_list(frame, chunks[1]);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Editing(form) => self.draw_record_form(frame, area, form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(APP_TITLE);
        let count = self.book.len();
        let mut spans = vec![
            Span::styled(
                format!("{count} record{}", if count == 1 { "" } else { "s" }),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled(self.list.sort.label(), Style::default().fg(Color::Cyan)),
        ];
        if self.list.has_search() {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                format!("Search: \"{}\"", self.list.search),
                Style::default().fg(Color::Yellow),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn draw_record_list(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }

        let boats = self.book.boats();
        if self.list.visible.is_empty() {
            let message = if boats.is_empty() {
                "No boat records yet. Press n to add one.".to_string()
            } else {
                format!("No records match \"{}\".", self.list.search)
            };
            let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(Color::Gray)))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(paragraph, area);
            return;
        }

        let card_height = BOAT_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = self.list.visible.len();
        let selected = self.list.selected;
        let start = scroll_start(selected, capacity, len);
        let end = min(start + capacity, len);

        let constraints: Vec<Constraint> = (start..end)
            .map(|_| Constraint::Length(BOAT_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (offset, chunk) in rows.iter().enumerate() {
            if chunk.height == 0 {
                continue;
            }
            let position = start + offset;
            let Some(boat) = self.list.visible.get(position).and_then(|idx| boats.get(*idx))
            else {
                break;
            };
            let is_selected = position == selected;

            let mut block = Block::default().borders(Borders::ALL);
            let mut paragraph_style = Style::default();
            if is_selected {
                block = block.style(Style::default().fg(Color::Yellow));
                paragraph_style = Style::default().fg(Color::Yellow);
            }

            let paragraph = Paragraph::new(build_boat_card_lines(boat, is_selected))
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left)
                .style(paragraph_style);
            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let pairs: &[(&'static str, &'static str)] = match &self.mode {
            Mode::Editing(_) => &[
                ("[Tab/↓]", " Next   "),
                ("[Shift+Tab/↑]", " Previous   "),
                ("[Enter/Ctrl+S]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmDelete(_) => &[("[Y/Enter]", " Delete   "), ("[N/Esc]", " Cancel")],
            Mode::Searching(_) => &[
                ("[Type]", " Filter   "),
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Keep   "),
                ("[Esc]", " Clear"),
            ],
            Mode::Normal => &[
                ("[↑↓]", " Navigate   "),
                ("[n]", " New   "),
                ("[e]", " Edit   "),
                ("[d]", " Delete   "),
                ("[p]", " Certificate   "),
                ("[x]", " Spreadsheet   "),
                ("[f]", " Search   "),
                ("[s]", " Sort   "),
                ("[o]", " Open Export   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = pairs
            .iter()
            .flat_map(|(key, action)| {
                [
                    Span::styled(*key, key_style),
                    Span::raw(*action),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_record_form(&self, frame: &mut Frame, area: Rect, form: &RecordForm) {
        let popup_area = centered_rect(80, 90, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(form.title()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let message_height = 2u16.min(inner.height);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(message_height)])
            .split(inner);
        let fields_area = chunks[0];

        let heading_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut lines = Vec::new();
        let mut active_line = 0usize;
        let mut section = None;
        for field in BoatField::FORM_ORDER {
            if section != Some(field.section()) {
                if section.is_some() {
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(Span::styled(
                    field.section().title(),
                    heading_style,
                )));
                section = Some(field.section());
            }
            if field == form.active {
                active_line = lines.len();
            }
            lines.push(form.build_line(field));
        }

        let visible_rows = fields_area.height.max(1) as usize;
        let scroll = if active_line >= visible_rows {
            active_line + 1 - visible_rows
        } else {
            0
        };
        frame.render_widget(
            Paragraph::new(lines).scroll((scroll as u16, 0)),
            fields_area,
        );

        let message = match &form.error {
            Some(error) => Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(Span::styled(
                "All fields are required. Enter to save, Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        };
        frame.render_widget(
            Paragraph::new(vec![Line::from(""), message]).wrap(Wrap { trim: true }),
            chunks[1],
        );

        if fields_area.height > 0 {
            let prefix = RecordForm::prefix(form.active).chars().count() as u16;
            let cursor_x = fields_area.x + prefix + form.value_len(form.active) as u16;
            let cursor_y = fields_area.y + (active_line - scroll) as u16;
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBoatDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete the boat record for {}?",
                confirm.owner_name
            )),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}
