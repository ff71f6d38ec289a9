//! Terminal screens: home/list, new-entry form, detail/edit, stats.
//!
//! Presentation only. Each screen is a blocking method that draws, reads
//! keys, and eventually returns an action; `main` owns the navigation and
//! dispatches the resulting mutations through the state container.

use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Terminal,
};
use std::io::{stdout, Stdout};
use unicode_width::UnicodeWidthChar;

use crate::entry::{DiaryEntry, CATEGORIES};
use crate::state::DiaryState;
use crate::stats::{month_label, Stats};

const PREVIEW_WIDTH: usize = 100;

pub enum HomeAction {
    Compose,
    Open(String),
    Stats,
    Quit,
}

pub enum DetailAction {
    Save { id: String, content: String },
    Delete { id: String },
    Back,
}

enum DetailMode {
    View,
    Edit,
    ConfirmDelete,
}

enum ComposeFocus {
    Content,
    Category,
    Image,
}

pub struct Ui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    search_query: String,
    cursor_position: usize,
}

impl Ui {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Ui {
            terminal,
            search_query: String::new(),
            cursor_position: 0,
        })
    }

    /// Home/list screen: search bar plus the filtered entry list. The
    /// filter is recomputed on every keystroke.
    pub fn home(&mut self, state: &DiaryState) -> Result<HomeAction> {
        let mut selected = 0usize;
        let mut searching = false;

        loop {
            let filtered = state.filter(&self.search_query);
            if selected >= filtered.len() {
                selected = filtered.len().saturating_sub(1);
            }

            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints(
                        [
                            Constraint::Length(3),
                            Constraint::Length(3),
                            Constraint::Min(0),
                            Constraint::Length(3),
                        ]
                        .as_ref(),
                    )
                    .split(f.area());

                f.render_widget(screen_title("My Diary"), chunks[0]);

                let search_style = if searching {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                let search_bar = Paragraph::new(self.search_query.clone()).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Search entries")
                        .border_style(search_style),
                );
                f.render_widget(search_bar, chunks[1]);

                if state.loading() {
                    let loading = Paragraph::new("Loading entries...")
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL));
                    f.render_widget(loading, chunks[2]);
                } else if let Some(error) = state.error() {
                    let message = Paragraph::new(error.to_string())
                        .style(Style::default().fg(Color::Red))
                        .wrap(Wrap { trim: true })
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL).title("Error"));
                    f.render_widget(message, chunks[2]);
                } else if filtered.is_empty() {
                    let empty = Paragraph::new("No entries found")
                        .style(Style::default().fg(Color::DarkGray))
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL).title("Entries"));
                    f.render_widget(empty, chunks[2]);
                } else {
                    let items: Vec<ListItem> = filtered.iter().map(|e| entry_row(e)).collect();
                    let list = List::new(items)
                        .block(Block::default().borders(Borders::ALL).title("Entries"))
                        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
                        .highlight_symbol("> ");
                    f.render_stateful_widget(
                        list,
                        chunks[2],
                        &mut ListState::default().with_selected(Some(selected)),
                    );
                }

                let controls = if searching {
                    "Type to filter entries, Enter/Esc: done"
                } else {
                    "n: new, Enter: open, /: search, Esc: clear search, s: stats, q: quit"
                };
                f.render_widget(controls_line(controls), chunks[3]);
            })?;

            if let Event::Key(key) = event::read()? {
                if searching {
                    match key.code {
                        KeyCode::Enter | KeyCode::Esc => searching = false,
                        KeyCode::Char(c) => {
                            self.search_query.push(c);
                            selected = 0;
                        }
                        KeyCode::Backspace => {
                            self.search_query.pop();
                        }
                        _ => {}
                    }
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') => return Ok(HomeAction::Quit),
                    KeyCode::Char('n') => return Ok(HomeAction::Compose),
                    KeyCode::Char('s') => return Ok(HomeAction::Stats),
                    KeyCode::Char('/') => searching = true,
                    KeyCode::Esc => self.search_query.clear(),
                    KeyCode::Up => selected = selected.saturating_sub(1),
                    KeyCode::Down => {
                        if selected + 1 < filtered.len() {
                            selected += 1;
                        }
                    }
                    KeyCode::Enter => {
                        if let Some(entry) = filtered.get(selected) {
                            return Ok(HomeAction::Open(entry.id.clone()));
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// New-entry form. Returns the minted entry on save, `None` on cancel.
    /// Saving is rejected while the content is blank.
    pub fn compose(&mut self) -> Result<Option<DiaryEntry>> {
        let mut content = String::new();
        let mut image = String::new();
        let mut category_index = 0usize;
        let mut focus = ComposeFocus::Content;
        self.cursor_position = 0;

        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints(
                        [
                            Constraint::Length(3),
                            Constraint::Min(8),
                            Constraint::Length(3),
                            Constraint::Length(3),
                            Constraint::Length(3),
                        ]
                        .as_ref(),
                    )
                    .split(f.area());

                f.render_widget(screen_title("New Entry"), chunks[0]);

                let content_text = if matches!(focus, ComposeFocus::Content) {
                    with_cursor(&content, self.cursor_position)
                } else {
                    content.clone()
                };
                let content_input = Paragraph::new(content_text)
                    .wrap(Wrap { trim: false })
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title("What's on your mind?")
                            .border_style(focus_style(matches!(focus, ComposeFocus::Content))),
                    );
                f.render_widget(content_input, chunks[1]);

                let category_input = Paragraph::new(format!("< {} >", CATEGORIES[category_index]))
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title("Category")
                            .border_style(focus_style(matches!(focus, ComposeFocus::Category))),
                    );
                f.render_widget(category_input, chunks[2]);

                let image_input = Paragraph::new(image.clone()).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Image path (optional)")
                        .border_style(focus_style(matches!(focus, ComposeFocus::Image))),
                );
                f.render_widget(image_input, chunks[3]);

                let instructions = if content.trim().is_empty() {
                    Line::from(Span::styled(
                        "Entry content cannot be empty",
                        Style::default().fg(Color::Red),
                    ))
                } else {
                    Line::from("Tab: next field, Ctrl+s: save, Esc: cancel")
                };
                f.render_widget(
                    Paragraph::new(instructions)
                        .style(Style::default().fg(Color::Yellow))
                        .alignment(Alignment::Center),
                    chunks[4],
                );
            })?;

            if let Event::Key(key) = event::read()? {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s')
                {
                    if content.trim().is_empty() {
                        continue;
                    }
                    let image_uri = match image.trim() {
                        "" => None,
                        path => Some(path.to_string()),
                    };
                    return Ok(Some(DiaryEntry::new(
                        content,
                        CATEGORIES[category_index].to_string(),
                        image_uri,
                    )));
                }

                match key.code {
                    KeyCode::Esc => return Ok(None),
                    KeyCode::Tab => {
                        focus = match focus {
                            ComposeFocus::Content => ComposeFocus::Category,
                            ComposeFocus::Category => ComposeFocus::Image,
                            ComposeFocus::Image => ComposeFocus::Content,
                        };
                    }
                    code => match focus {
                        ComposeFocus::Content => {
                            self.edit_buffer(&mut content, code);
                        }
                        ComposeFocus::Category => match code {
                            KeyCode::Left | KeyCode::Up => {
                                category_index =
                                    (category_index + CATEGORIES.len() - 1) % CATEGORIES.len();
                            }
                            KeyCode::Right | KeyCode::Down => {
                                category_index = (category_index + 1) % CATEGORIES.len();
                            }
                            _ => {}
                        },
                        ComposeFocus::Image => match code {
                            KeyCode::Char(c) => image.push(c),
                            KeyCode::Backspace => {
                                image.pop();
                            }
                            _ => {}
                        },
                    },
                }
            }
        }
    }

    /// Detail screen for one entry: view, content-only edit with explicit
    /// save/cancel, and delete behind a confirmation.
    pub fn detail(&mut self, state: &DiaryState, id: &str) -> Result<DetailAction> {
        let Some(entry) = state.get(id).cloned() else {
            self.message_frame("Entry not found", Color::Red)?;
            event::read()?;
            return Ok(DetailAction::Back);
        };

        let mut mode = DetailMode::View;
        let mut buffer = String::new();

        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints(
                        [
                            Constraint::Length(3),
                            Constraint::Length(4),
                            Constraint::Min(8),
                            Constraint::Length(3),
                        ]
                        .as_ref(),
                    )
                    .split(f.area());

                f.render_widget(screen_title("Entry Details"), chunks[0]);

                let mut meta = vec![Line::from(vec![
                    Span::styled(
                        entry.date.format("%Y-%m-%d %H:%M").to_string(),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw("  ·  "),
                    Span::styled(
                        entry.category.clone(),
                        Style::default().add_modifier(Modifier::ITALIC),
                    ),
                ])];
                if let Some(image) = &entry.image_uri {
                    meta.push(Line::from(format!("Image: {image}")));
                }
                f.render_widget(
                    Paragraph::new(meta).block(Block::default().borders(Borders::ALL)),
                    chunks[1],
                );

                let (body, title) = match mode {
                    DetailMode::Edit => (
                        with_cursor(&buffer, self.cursor_position),
                        "Content (editing)",
                    ),
                    _ => (entry.content.clone(), "Content"),
                };
                let content = Paragraph::new(body)
                    .wrap(Wrap { trim: false })
                    .block(Block::default().borders(Borders::ALL).title(title));
                f.render_widget(content, chunks[2]);

                let controls = match mode {
                    DetailMode::View => "e: edit, d: delete, Esc: back",
                    DetailMode::Edit => "Ctrl+s: save, Esc: cancel",
                    DetailMode::ConfirmDelete => "Delete this entry? y: yes, n: no",
                };
                let style = match mode {
                    DetailMode::ConfirmDelete => Style::default().fg(Color::Red),
                    _ => Style::default().fg(Color::Yellow),
                };
                f.render_widget(
                    Paragraph::new(controls)
                        .style(style)
                        .alignment(Alignment::Center),
                    chunks[3],
                );
            })?;

            if let Event::Key(key) = event::read()? {
                match mode {
                    DetailMode::View => match key.code {
                        KeyCode::Char('e') => {
                            buffer = entry.content.clone();
                            self.cursor_position = buffer.len();
                            mode = DetailMode::Edit;
                        }
                        KeyCode::Char('d') => mode = DetailMode::ConfirmDelete,
                        KeyCode::Esc => return Ok(DetailAction::Back),
                        _ => {}
                    },
                    DetailMode::Edit => {
                        if key.modifiers.contains(KeyModifiers::CONTROL)
                            && key.code == KeyCode::Char('s')
                        {
                            if buffer.trim().is_empty() {
                                continue;
                            }
                            return Ok(DetailAction::Save {
                                id: entry.id.clone(),
                                content: buffer,
                            });
                        }
                        match key.code {
                            KeyCode::Esc => mode = DetailMode::View,
                            code => self.edit_buffer(&mut buffer, code),
                        }
                    }
                    DetailMode::ConfirmDelete => match key.code {
                        KeyCode::Char('y') => {
                            self.message_frame("Deleting entry...", Color::Yellow)?;
                            return Ok(DetailAction::Delete {
                                id: entry.id.clone(),
                            });
                        }
                        KeyCode::Char('n') | KeyCode::Esc => mode = DetailMode::View,
                        _ => {}
                    },
                }
            }
        }
    }

    /// Read-only statistics: tallies by category and calendar month plus
    /// the overall block, computed in one pass over the in-memory list.
    pub fn stats(&mut self, state: &DiaryState) -> Result<()> {
        let stats = Stats::collect(state.entries());

        let mut lines = vec![section_header("Entries by Category")];
        for (category, count) in &stats.by_category {
            lines.push(stat_row(category, *count));
        }
        lines.push(Line::from(""));
        lines.push(section_header("Entries by Month"));
        for (&(year, month), count) in &stats.by_month {
            lines.push(stat_row(&month_label(year, month), *count));
        }
        lines.push(Line::from(""));
        lines.push(section_header("Overall"));
        lines.push(stat_row("Total entries", stats.total));
        lines.push(stat_row("Categories used", stats.categories_used()));
        lines.push(stat_row("Months active", stats.months_active()));

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints(
                    [
                        Constraint::Length(3),
                        Constraint::Min(0),
                        Constraint::Length(3),
                    ]
                    .as_ref(),
                )
                .split(f.area());

            f.render_widget(screen_title("Statistics"), chunks[0]);
            f.render_widget(
                Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
                chunks[1],
            );
            f.render_widget(controls_line("Press any key to go back"), chunks[2]);
        })?;

        event::read()?;
        Ok(())
    }

    /// Transient alert for a failed save/delete; any key dismisses it.
    pub fn alert(&mut self, message: &str) -> Result<()> {
        self.message_frame(message, Color::Red)?;
        event::read()?;
        Ok(())
    }

    fn message_frame(&mut self, message: &str, color: Color) -> Result<()> {
        let text = message.to_string();
        self.terminal.draw(|f| {
            let area = centered_band(f.area());
            let paragraph = Paragraph::new(text)
                .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(paragraph, area);
        })?;
        Ok(())
    }

    /// Shared cursor editing for multiline text fields.
    fn edit_buffer(&mut self, buffer: &mut String, code: KeyCode) {
        if self.cursor_position > buffer.len() {
            self.cursor_position = buffer.len();
        }
        match code {
            KeyCode::Char(c) => {
                buffer.insert(self.cursor_position, c);
                self.cursor_position += c.len_utf8();
            }
            KeyCode::Enter => {
                buffer.insert(self.cursor_position, '\n');
                self.cursor_position += 1;
            }
            KeyCode::Backspace => {
                if let Some(prev) = previous_char_boundary(buffer, self.cursor_position) {
                    buffer.remove(prev);
                    self.cursor_position = prev;
                }
            }
            KeyCode::Delete => {
                if self.cursor_position < buffer.len() {
                    buffer.remove(self.cursor_position);
                }
            }
            KeyCode::Left => {
                if let Some(prev) = previous_char_boundary(buffer, self.cursor_position) {
                    self.cursor_position = prev;
                }
            }
            KeyCode::Right => {
                if self.cursor_position < buffer.len() {
                    let step = buffer[self.cursor_position..]
                        .chars()
                        .next()
                        .map(|c| c.len_utf8())
                        .unwrap_or(0);
                    self.cursor_position += step;
                }
            }
            _ => {}
        }
    }
}

impl Drop for Ui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

fn screen_title(title: &str) -> Paragraph<'_> {
    Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
}

fn controls_line(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn section_header(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn stat_row(label: &str, count: usize) -> Line<'static> {
    Line::from(format!(
        "{label}: {count} {}",
        if count == 1 { "entry" } else { "entries" }
    ))
}

/// Two-line list row: formatted date plus a first-line preview, then the
/// category, matching the original home screen cards.
fn entry_row(entry: &DiaryEntry) -> ListItem<'static> {
    let preview = truncate_to_width(entry.content.lines().next().unwrap_or(""), PREVIEW_WIDTH);
    ListItem::new(vec![
        Line::from(format!(
            "[{}] {}",
            entry.date.format("%Y-%m-%d %H:%M"),
            preview
        )),
        Line::from(Span::styled(
            format!("  {}", entry.category),
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

/// Middle band of the frame, for blocking status/alert messages.
fn centered_band(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);
    chunks[1]
}

fn with_cursor(text: &str, position: usize) -> String {
    let position = position.min(text.len());
    let mut out = String::with_capacity(text.len() + 1);
    out.push_str(&text[..position]);
    out.push('|');
    out.push_str(&text[position..]);
    out
}

fn previous_char_boundary(text: &str, position: usize) -> Option<usize> {
    text[..position.min(text.len())]
        .char_indices()
        .last()
        .map(|(i, _)| i)
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let char_width = c.width().unwrap_or(0);
        if width + char_width > max_width {
            out.push('…');
            break;
        }
        width += char_width;
        out.push(c);
    }
    out
}
