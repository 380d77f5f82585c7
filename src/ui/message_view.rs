use fltk::{
    app,
    button::Button,
    enums::{Align, Color, Font, FrameType},
    frame::Frame,
    group::{Flex, FlexType},
    prelude::*,
    text::{TextBuffer, TextDisplay, WrapMode},
};

use crate::chat::{ChatMessage, Role};
use crate::content::Segment;
use crate::ui::constants::*;
use crate::ui::font_settings::TranscriptFonts;
use crate::ui::result_table::{ResultTableWidget, TableData};
use crate::ui::syntax_highlight::{create_style_table, render_sql_lines, StyledText};
use crate::ui::theme;

const BLOCK_SPACING: i32 = 4;

/// Widget plan for one segment, with the height it will occupy.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockPlan {
    Text { text: String, height: i32 },
    Sql { raw: String, styled: StyledText, height: i32 },
    ResultTable { data: TableData, height: i32 },
    ResultText { text: String, height: i32 },
}

impl BlockPlan {
    pub fn height(&self) -> i32 {
        match self {
            BlockPlan::Text { height, .. }
            | BlockPlan::Sql { height, .. }
            | BlockPlan::ResultTable { height, .. }
            | BlockPlan::ResultText { height, .. } => *height,
        }
    }
}

/// Rough character capacity of a row at `width` pixels.
fn chars_per_row(width: i32, font_size: i32) -> usize {
    let usable = (width - 2 * TEXT_PADDING).max(0) as f32;
    let glyph = font_size as f32 * 0.6;
    ((usable / glyph) as usize).max(10)
}

/// Number of display rows `text` needs once wrapped at `per_row` chars.
pub fn wrapped_rows(text: &str, per_row: usize) -> i32 {
    text.split('\n')
        .map(|line| line.chars().count().div_ceil(per_row.max(1)).max(1) as i32)
        .sum()
}

fn line_height(font_size: i32) -> i32 {
    font_size + 6
}

fn wrapped_text_height(text: &str, width: i32, font_size: i32) -> i32 {
    let rows = wrapped_rows(text, chars_per_row(width, font_size));
    rows * line_height(font_size) + 2 * TEXT_PADDING
}

/// Turns segments into widget plans sized for a bubble `width` pixels wide.
pub fn plan_blocks(segments: &[Segment], width: i32, fonts: &TranscriptFonts) -> Vec<BlockPlan> {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::PlainText { text } => BlockPlan::Text {
                text: text.clone(),
                height: wrapped_text_height(text, width, fonts.text_size),
            },
            Segment::SqlBlock { raw_text, lines } => {
                let styled = render_sql_lines(lines);
                let widest = styled
                    .text
                    .split('\n')
                    .map(|line| line.chars().count())
                    .max()
                    .unwrap_or(0);
                let mut height = BLOCK_CAPTION_HEIGHT
                    + lines.len().max(1) as i32 * line_height(fonts.code_size)
                    + 2 * TEXT_PADDING;
                if widest > chars_per_row(width, fonts.code_size) {
                    height += SCROLLBAR_ALLOWANCE;
                }
                BlockPlan::Sql {
                    raw: raw_text.clone(),
                    styled,
                    height,
                }
            }
            Segment::ResultTable { columns, rows } => BlockPlan::ResultTable {
                data: TableData::from_result(columns, rows),
                height: BLOCK_CAPTION_HEIGHT + ResultTableWidget::preferred_height(rows.len()),
            },
            Segment::ResultText { text } => BlockPlan::ResultText {
                text: text.clone(),
                height: BLOCK_CAPTION_HEIGHT + wrapped_text_height(text, width, fonts.text_size),
            },
        })
        .collect()
}

/// Total bubble height for a set of plans.
pub fn message_height(plans: &[BlockPlan]) -> i32 {
    let blocks: i32 = plans.iter().map(BlockPlan::height).sum();
    MESSAGE_HEADER_HEIGHT + blocks + BLOCK_SPACING * plans.len() as i32 + TEXT_PADDING
}

/// One rendered chat message: avatar header followed by its segment widgets.
pub struct MessageView {
    group: Flex,
    height: i32,
}

impl MessageView {
    /// Builds the widgets for `message` in the current group.
    pub fn build(message: &ChatMessage, width: i32, fonts: &TranscriptFonts) -> Self {
        let plans = plan_blocks(&message.segments(), width, fonts);
        let height = message_height(&plans);
        let bubble = match message.role {
            Role::Assistant => theme::assistant_bubble(),
            Role::User | Role::System => theme::user_bubble(),
        };

        let mut group = Flex::default().with_size(width, height);
        group.set_type(FlexType::Column);
        group.set_margin(TEXT_PADDING / 2);
        group.set_spacing(BLOCK_SPACING);
        group.set_frame(FrameType::FlatBox);
        group.set_color(bubble);

        let header = Self::header(message);
        group.fixed(&header, MESSAGE_HEADER_HEIGHT);

        for plan in &plans {
            match plan {
                BlockPlan::Text { text, .. } => {
                    let display = text_display(text, fonts.text.normal, fonts.text_size, bubble);
                    group.fixed(&display, plan.height());
                }
                BlockPlan::Sql { raw, styled, .. } => {
                    let block = Self::sql_block(raw, styled, fonts);
                    group.fixed(&block, plan.height());
                }
                BlockPlan::ResultTable { data, .. } => {
                    let block = Self::result_table_block(data.clone(), fonts);
                    group.fixed(&block, plan.height());
                }
                BlockPlan::ResultText { text, .. } => {
                    let block = Self::result_text_block(text, fonts);
                    group.fixed(&block, plan.height());
                }
            }
        }

        group.end();
        Self { group, height }
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn get_widget(&self) -> Flex {
        self.group.clone()
    }

    fn header(message: &ChatMessage) -> Frame {
        let avatar = match message.role {
            Role::Assistant => theme::assistant_avatar(),
            Role::User | Role::System => theme::user_avatar(),
        };
        let mut header = Frame::default().with_label(&format!(
            "{}   {}",
            message.role.avatar(),
            message.time_label()
        ));
        header.set_align(Align::Left | Align::Inside);
        header.set_label_color(avatar);
        header.set_label_font(Font::HelveticaBold);
        header.set_label_size(12);
        header
    }

    fn sql_block(raw: &str, styled: &StyledText, fonts: &TranscriptFonts) -> Flex {
        let mut block = column();

        let mut caption = caption_row("SQL Query");
        let mut copy_btn = Button::default().with_label("Copy");
        copy_btn.set_color(theme::button_secondary());
        copy_btn.set_label_color(theme::text_primary());
        copy_btn.set_label_size(11);
        caption.fixed(&copy_btn, BUTTON_WIDTH_SMALL);
        caption.end();
        block.fixed(&caption, BLOCK_CAPTION_HEIGHT);

        let raw = raw.to_string();
        copy_btn.set_callback(move |b| {
            app::copy(&raw);
            b.set_label("Copied");
        });

        let mut buffer = TextBuffer::default();
        buffer.set_text(&styled.text);
        let mut style_buffer = TextBuffer::default();
        style_buffer.set_text(&styled.styles);

        let mut display = TextDisplay::default();
        display.set_buffer(buffer);
        display.set_frame(FrameType::FlatBox);
        display.set_color(theme::code_bg());
        display.set_text_font(fonts.code.normal);
        display.set_text_size(fonts.code_size);
        display.wrap_mode(WrapMode::None, 0);
        display.set_highlight_data(
            style_buffer,
            create_style_table(fonts.code.normal, fonts.code.bold, fonts.code_size),
        );

        block.end();
        block
    }

    fn result_table_block(data: TableData, fonts: &TranscriptFonts) -> Flex {
        let mut block = column();
        let caption = result_caption();
        block.fixed(&caption, BLOCK_CAPTION_HEIGHT);
        let mut table = ResultTableWidget::new(data, fonts.text_size).get_widget();
        table.set_frame(FrameType::ThinDownBox);
        block.end();
        block
    }

    fn result_text_block(text: &str, fonts: &TranscriptFonts) -> Flex {
        let mut block = column();
        let caption = result_caption();
        block.fixed(&caption, BLOCK_CAPTION_HEIGHT);
        text_display(text, fonts.text.normal, fonts.text_size, theme::panel_alt());
        block.end();
        block
    }
}

fn column() -> Flex {
    let mut flex = Flex::default();
    flex.set_type(FlexType::Column);
    flex.set_spacing(0);
    flex
}

/// Caption bar with a left-aligned title. Left open so callers can add buttons.
fn caption_row(title: &str) -> Flex {
    let mut row = Flex::default();
    row.set_type(FlexType::Row);
    row.set_frame(FrameType::FlatBox);
    row.set_color(theme::code_header_bg());

    let mut label = Frame::default().with_label(title);
    label.set_align(Align::Left | Align::Inside);
    label.set_label_color(theme::text_secondary());
    label.set_label_size(11);
    row
}

fn result_caption() -> Flex {
    let mut row = caption_row("Query Result");
    row.end();
    row
}

fn text_display(text: &str, font: Font, size: i32, bg: Color) -> TextDisplay {
    let mut buffer = TextBuffer::default();
    buffer.set_text(text);

    let mut display = TextDisplay::default();
    display.set_buffer(buffer);
    display.set_frame(FrameType::FlatBox);
    display.set_color(bg);
    display.set_text_color(theme::text_primary());
    display.set_text_font(font);
    display.set_text_size(size);
    display.wrap_mode(WrapMode::AtBounds, 0);
    display
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_assistant_message;

    #[test]
    fn test_wrapped_rows_counts_blank_lines() {
        assert_eq!(wrapped_rows("", 10), 1);
        assert_eq!(wrapped_rows("a\n\nb", 10), 3);
        assert_eq!(wrapped_rows(&"x".repeat(25), 10), 3);
    }

    #[test]
    fn test_plans_follow_segment_order() {
        let segments = parse_assistant_message(
            "Here you go:\n```sql\nSELECT \"id\"\nFROM \"users\"\n```\nResult: [{\"id\":1}]",
        );
        let plans = plan_blocks(&segments, 600, &TranscriptFonts::default());

        assert_eq!(plans.len(), 3);
        assert!(matches!(plans[0], BlockPlan::Text { .. }));
        assert!(matches!(plans[1], BlockPlan::Sql { .. }));
        assert!(matches!(plans[2], BlockPlan::ResultTable { .. }));
    }

    #[test]
    fn test_sql_plan_carries_gutter_and_raw_text() {
        let segments = parse_assistant_message("SELECT 1;");
        let plans = plan_blocks(&segments, 600, &TranscriptFonts::default());

        let BlockPlan::Sql { raw, styled, .. } = &plans[0] else {
            panic!("expected sql plan, got {:?}", plans[0]);
        };
        assert_eq!(raw, "SELECT 1;");
        assert_eq!(styled.text, " 1  SELECT 1;");
    }

    #[test]
    fn test_message_height_grows_with_blocks() {
        let fonts = TranscriptFonts::default();
        let short = plan_blocks(&parse_assistant_message("Hi"), 600, &fonts);
        let long = plan_blocks(
            &parse_assistant_message("Hi\nSELECT 1;\nResult: no rows found"),
            600,
            &fonts,
        );

        assert!(message_height(&long) > message_height(&short));
        assert!(long
            .iter()
            .all(|plan| plan.height() >= BLOCK_CAPTION_HEIGHT.min(plan.height())));
    }

    #[test]
    fn test_narrow_sql_gets_scrollbar_room() {
        let fonts = TranscriptFonts::default();
        let segments = parse_assistant_message(&format!("SELECT {};", "x, ".repeat(60)));
        let wide = plan_blocks(&segments, 2000, &fonts);
        let narrow = plan_blocks(&segments, 200, &fonts);

        assert_eq!(narrow[0].height(), wide[0].height() + SCROLLBAR_ALLOWANCE);
    }
}
