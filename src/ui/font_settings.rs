use fltk::enums::Font;

use crate::utils::AppConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontProfile {
    pub name: &'static str,
    pub normal: Font,
    pub bold: Font,
    pub italic: Font,
}

pub const FONT_PROFILES: &[FontProfile] = &[
    FontProfile {
        name: "Courier",
        normal: Font::Courier,
        bold: Font::CourierBold,
        italic: Font::CourierItalic,
    },
    FontProfile {
        name: "Helvetica",
        normal: Font::Helvetica,
        bold: Font::HelveticaBold,
        italic: Font::HelveticaItalic,
    },
    FontProfile {
        name: "Times",
        normal: Font::Times,
        bold: Font::TimesBold,
        italic: Font::TimesItalic,
    },
];

/// Looks up a built-in profile by name (case-insensitive), or `fallback`.
pub fn profile_by_name(name: &str, fallback: FontProfile) -> FontProfile {
    FONT_PROFILES
        .iter()
        .copied()
        .find(|profile| profile.name.eq_ignore_ascii_case(name.trim()))
        .unwrap_or(fallback)
}

/// Fonts used by the transcript: prose and SQL blocks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TranscriptFonts {
    pub text: FontProfile,
    pub text_size: i32,
    pub code: FontProfile,
    pub code_size: i32,
}

impl TranscriptFonts {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            text: profile_by_name(&config.transcript_font, FONT_PROFILES[1]),
            text_size: clamp_size(config.transcript_font_size),
            code: profile_by_name(&config.code_font, FONT_PROFILES[0]),
            code_size: clamp_size(config.code_font_size),
        }
    }
}

impl Default for TranscriptFonts {
    fn default() -> Self {
        Self::from_config(&AppConfig::new())
    }
}

fn clamp_size(size: u32) -> i32 {
    size.clamp(8, 32) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_lookup_ignores_case() {
        let profile = profile_by_name(" helvetica ", FONT_PROFILES[0]);
        assert_eq!(profile.normal, Font::Helvetica);
    }

    #[test]
    fn test_unknown_font_uses_fallback() {
        let profile = profile_by_name("Comic Sans", FONT_PROFILES[2]);
        assert_eq!(profile.name, "Times");
    }

    #[test]
    fn test_sizes_are_clamped() {
        let mut config = AppConfig::new();
        config.transcript_font_size = 200;
        config.code_font_size = 0;
        let fonts = TranscriptFonts::from_config(&config);
        assert_eq!(fonts.text_size, 32);
        assert_eq!(fonts.code_size, 8);
    }
}
