use fltk::{
    app, draw,
    enums::{Align, Event, Font, FrameType},
    menu::MenuButton,
    prelude::*,
    table::{Table, TableContext},
};
use std::borrow::Cow;
use std::cell::RefCell;
use std::ops::RangeInclusive;
use std::rc::Rc;

use crate::content::ResultRow;
use crate::ui::constants::{TABLE_MAX_VISIBLE_ROWS, TABLE_ROW_HEIGHT};
use crate::ui::theme;

const MAX_CELL_CHARS: usize = 50;
const MIN_COL_WIDTH: i32 = 80;
const MAX_COL_WIDTH: i32 = 300;

/// Plain-text view of a result table: header, display rows and column widths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<i32>,
}

impl TableData {
    /// Lays out `rows` under `columns`; keys a row does not have become empty cells.
    pub fn from_result(columns: &[String], rows: &[ResultRow]) -> Self {
        let headers = columns.to_vec();
        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                row.display_cells(columns)
                    .into_iter()
                    .map(Option::unwrap_or_default)
                    .collect()
            })
            .collect();

        // Calculate column widths based on content
        let mut col_widths: Vec<i32> = headers
            .iter()
            .map(|h| ((h.chars().count() * 10) as i32).max(MIN_COL_WIDTH))
            .collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                let cell_width =
                    ((cell.chars().count() * 8) as i32).clamp(MIN_COL_WIDTH, MAX_COL_WIDTH);
                col_widths[i] = col_widths[i].max(cell_width);
            }
        }

        Self {
            headers,
            rows,
            col_widths,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn col_widths(&self) -> &[i32] {
        &self.col_widths
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Tab-separated text of a rectangular selection, rows joined by `\n`.
    pub fn selection_text(
        &self,
        rows: RangeInclusive<usize>,
        cols: RangeInclusive<usize>,
        with_headers: bool,
    ) -> String {
        let mut lines = Vec::new();
        if with_headers {
            let header: Vec<&str> = cols
                .clone()
                .filter_map(|col| self.headers.get(col).map(String::as_str))
                .collect();
            lines.push(header.join("\t"));
        }
        for row in rows {
            let Some(row_data) = self.rows.get(row) else {
                continue;
            };
            let cells: Vec<&str> = cols
                .clone()
                .filter_map(|col| row_data.get(col).map(String::as_str))
                .collect();
            lines.push(cells.join("\t"));
        }
        lines.join("\n")
    }

    /// Header plus every row, tab separated.
    pub fn all_text(&self) -> String {
        if self.headers.is_empty() {
            return String::new();
        }
        let last_row = self.rows.len().saturating_sub(1);
        let last_col = self.headers.len() - 1;
        if self.rows.is_empty() {
            return self.headers.join("\t");
        }
        self.selection_text(0..=last_row, 0..=last_col, true)
    }

    /// Export all data to CSV format
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str(&csv_row(&self.headers));
        csv.push('\n');
        for row in &self.rows {
            csv.push_str(&csv_row(row));
            csv.push('\n');
        }
        csv
    }
}

fn csv_row(values: &[String]) -> String {
    values
        .iter()
        .map(|value| escape_csv_field(value))
        .collect::<Vec<_>>()
        .join(",")
}

/// Escape a CSV field (add quotes if needed)
fn escape_csv_field(field: &str) -> Cow<'_, str> {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Shortens long cell text for drawing, cutting on a char boundary.
pub fn display_cell(cell: &str) -> Cow<'_, str> {
    match cell.char_indices().nth(MAX_CELL_CHARS) {
        Some(_) => {
            let cut = cell
                .char_indices()
                .nth(MAX_CELL_CHARS - 3)
                .map_or(cell.len(), |(idx, _)| idx);
            Cow::Owned(format!("{}...", &cell[..cut]))
        }
        None => Cow::Borrowed(cell),
    }
}

#[derive(Clone)]
pub struct ResultTableWidget {
    table: Table,
}

impl ResultTableWidget {
    /// Height that shows every row up to the visible-row cap, header included.
    pub fn preferred_height(row_count: usize) -> i32 {
        let visible = (row_count as i32).clamp(1, TABLE_MAX_VISIBLE_ROWS);
        (visible + 1) * TABLE_ROW_HEIGHT + 4
    }

    pub fn new(data: TableData, font_size: i32) -> Self {
        let row_count = data.rows.len() as i32;
        let col_count = data.headers.len() as i32;
        let col_widths = data.col_widths.clone();
        let data = Rc::new(RefCell::new(data));

        let mut table = Table::default();
        table.set_rows(row_count);
        table.set_cols(col_count);
        table.set_row_header(true);
        table.set_row_header_width(45);
        table.set_col_header(true);
        table.set_col_header_height(TABLE_ROW_HEIGHT);
        table.set_row_height_all(TABLE_ROW_HEIGHT);
        table.set_color(theme::table_cell_bg());
        table.set_selection_color(theme::selection_strong());
        for (i, width) in col_widths.iter().enumerate() {
            table.set_col_width(i as i32, *width);
        }
        table.end();

        let data_clone = data.clone();
        table.draw_cell(move |t, ctx, row, col, x, y, w, h| {
            let data = data_clone.borrow();

            match ctx {
                TableContext::StartPage => {
                    draw::set_font(Font::Helvetica, font_size);
                }
                TableContext::ColHeader => {
                    draw::push_clip(x, y, w, h);
                    draw::draw_box(FrameType::FlatBox, x, y, w, h, theme::table_header_bg());
                    draw::set_draw_color(theme::text_secondary());
                    draw::set_font(Font::HelveticaBold, font_size - 2);
                    if let Some(header) = data.headers.get(col as usize) {
                        draw::draw_text2(&header.to_uppercase(), x, y, w, h, Align::Center);
                    }
                    draw::pop_clip();
                }
                TableContext::RowHeader => {
                    draw::push_clip(x, y, w, h);
                    draw::draw_box(FrameType::FlatBox, x, y, w, h, theme::table_header_bg());
                    draw::set_draw_color(theme::text_muted());
                    draw::set_font(Font::Helvetica, font_size - 2);
                    draw::draw_text2(&format!("{}", row + 1), x, y, w, h, Align::Center);
                    draw::pop_clip();
                }
                TableContext::Cell => {
                    draw::push_clip(x, y, w, h);

                    let (row_top, row_bot, col_left, col_right) = t.get_selection();
                    let is_selected = row >= row_top
                        && row <= row_bot
                        && col >= col_left
                        && col <= col_right;

                    // Alternate row colors
                    let bg = if is_selected {
                        theme::selection_strong()
                    } else if row % 2 == 0 {
                        theme::table_cell_bg()
                    } else {
                        theme::table_cell_alt_bg()
                    };
                    draw::draw_box(FrameType::FlatBox, x, y, w, h, bg);

                    draw::set_draw_color(theme::table_border());
                    draw::draw_rect(x, y, w, h);

                    draw::set_draw_color(theme::text_primary());
                    draw::set_font(Font::Courier, font_size - 1);
                    if let Some(cell) = data.cell(row as usize, col as usize) {
                        draw::draw_text2(&display_cell(cell), x + 5, y, w - 10, h, Align::Left);
                    }
                    draw::pop_clip();
                }
                _ => {}
            }
        });

        // Right-click context menu and Ctrl+C for copy
        let data_for_handle = data.clone();
        table.handle(move |t, ev| match ev {
            Event::Push => {
                if app::event_mouse_button() == app::MouseButton::Right {
                    Self::show_context_menu(t, &data_for_handle);
                    return true;
                }
                false
            }
            Event::KeyDown => {
                if app::event_state().contains(fltk::enums::Shortcut::Ctrl)
                    && app::event_key() == fltk::enums::Key::from_char('c')
                {
                    Self::copy_selection(t, &data_for_handle, false);
                    return true;
                }
                false
            }
            _ => false,
        });

        Self { table }
    }

    fn show_context_menu(table: &Table, data: &Rc<RefCell<TableData>>) {
        let mut menu = MenuButton::default();
        menu.set_color(theme::panel_alt());
        menu.set_text_color(theme::text_primary());
        menu.add_choice("Copy|Copy with Headers|Copy Cell|Copy All|Copy as CSV");

        if let Some(choice) = menu.popup() {
            let choice_label = choice.label().unwrap_or_default();
            match choice_label.as_str() {
                "Copy" => Self::copy_selection(table, data, false),
                "Copy with Headers" => Self::copy_selection(table, data, true),
                "Copy Cell" => Self::copy_current_cell(table, data),
                "Copy All" => copy_if_not_empty(&data.borrow().all_text()),
                "Copy as CSV" => copy_if_not_empty(&data.borrow().to_csv()),
                _ => {}
            }
        }
    }

    fn copy_selection(table: &Table, data: &Rc<RefCell<TableData>>, with_headers: bool) {
        let (row_top, row_bot, col_left, col_right) = table.get_selection();
        if row_top < 0 || col_left < 0 {
            return;
        }
        let text = data.borrow().selection_text(
            row_top as usize..=row_bot as usize,
            col_left as usize..=col_right as usize,
            with_headers,
        );
        copy_if_not_empty(&text);
    }

    fn copy_current_cell(table: &Table, data: &Rc<RefCell<TableData>>) {
        let (row_top, _, col_left, _) = table.get_selection();
        if row_top < 0 || col_left < 0 {
            return;
        }
        if let Some(cell) = data.borrow().cell(row_top as usize, col_left as usize) {
            app::copy(cell);
        }
    }

    /// Get the table widget
    pub fn get_widget(&self) -> Table {
        self.table.clone()
    }
}

fn copy_if_not_empty(text: &str) {
    if !text.is_empty() {
        app::copy(text);
    }
}
