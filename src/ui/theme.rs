use fltk::enums::Color;

// Dark palette tuned for FLTK widgets.

pub fn window_bg() -> Color {
    Color::from_rgb(32, 32, 32)
}

pub fn panel_bg() -> Color {
    Color::from_rgb(38, 38, 38)
}

pub fn panel_alt() -> Color {
    Color::from_rgb(45, 45, 45)
}

pub fn input_bg() -> Color {
    Color::from_rgb(46, 46, 46)
}

pub fn border() -> Color {
    Color::from_rgb(64, 64, 64)
}

pub fn text_primary() -> Color {
    Color::from_rgb(243, 243, 243)
}

pub fn text_secondary() -> Color {
    Color::from_rgb(210, 210, 210)
}

pub fn text_muted() -> Color {
    Color::from_rgb(168, 168, 168)
}

pub fn accent() -> Color {
    Color::from_rgb(0, 120, 212)
}

pub fn selection_strong() -> Color {
    accent()
}

pub fn button_secondary() -> Color {
    Color::from_rgb(58, 58, 58)
}

// -- Transcript --

pub fn user_bubble() -> Color {
    Color::from_rgb(52, 52, 52)
}

pub fn assistant_bubble() -> Color {
    Color::from_rgb(40, 44, 64)
}

pub fn user_avatar() -> Color {
    Color::from_rgb(251, 146, 60)
}

pub fn assistant_avatar() -> Color {
    Color::from_rgb(74, 222, 128)
}

pub fn code_header_bg() -> Color {
    Color::from_rgb(31, 41, 55)
}

pub fn code_bg() -> Color {
    Color::from_rgb(24, 24, 24)
}

pub fn table_header_bg() -> Color {
    panel_alt()
}

pub fn table_cell_bg() -> Color {
    panel_bg()
}

pub fn table_cell_alt_bg() -> Color {
    Color::from_rgb(44, 44, 47)
}

pub fn table_border() -> Color {
    border()
}
