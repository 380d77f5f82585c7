// Unified UI sizing constants for the chat window and transcript.

// -- Button sizing --

/// Standard button width (e.g. "Send").
pub const BUTTON_WIDTH: i32 = 90;

/// Compact button width for block actions (e.g. "Copy").
pub const BUTTON_WIDTH_SMALL: i32 = 60;

// -- Layout constants --

/// Height of the title bar above the transcript.
pub const HEADER_HEIGHT: i32 = 40;

/// Height of the row holding the message input and the send button.
pub const INPUT_ROW_HEIGHT: i32 = 36;

/// Height of the application status bar.
pub const STATUS_BAR_HEIGHT: i32 = 25;

/// Outer margin of the main window content.
pub const WINDOW_MARGIN: i32 = 8;

// -- Transcript --

/// Vertical gap between messages.
pub const MESSAGE_SPACING: i32 = 12;

/// Height of the avatar row heading each message.
pub const MESSAGE_HEADER_HEIGHT: i32 = 22;

/// Height of the "SQL Query" / "Query Result" caption bars.
pub const BLOCK_CAPTION_HEIGHT: i32 = 24;

/// Padding added around every text display.
pub const TEXT_PADDING: i32 = 10;

/// Room reserved for a scrollbar next to or under a widget.
pub const SCROLLBAR_ALLOWANCE: i32 = 20;

/// Row height of result tables.
pub const TABLE_ROW_HEIGHT: i32 = 25;

/// Result tables grow with their rows up to this many before scrolling.
pub const TABLE_MAX_VISIBLE_ROWS: i32 = 12;
