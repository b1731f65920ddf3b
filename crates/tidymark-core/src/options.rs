//! Style configuration for Markdown serialization

use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// Use ATX-style headings (prefixed with #)
    #[default]
    Atx,
    /// Use setext-style headings (underlined with = or -)
    /// Only works for h1 and h2, falls back to ATX for h3-h6
    Setext,
}

/// Bullet list marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletMarker {
    #[default]
    Dash,
    Asterisk,
    Plus,
}

impl BulletMarker {
    pub fn as_char(self) -> char {
        match self {
            BulletMarker::Dash => '-',
            BulletMarker::Asterisk => '*',
            BulletMarker::Plus => '+',
        }
    }
}

/// Code block style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    /// Use fenced code blocks (```)
    #[default]
    Fenced,
    /// Use indented code blocks (4 spaces)
    Indented,
}

/// Emphasis delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmDelimiter {
    #[default]
    Underscore,
    Asterisk,
}

impl EmDelimiter {
    pub fn as_str(self) -> &'static str {
        match self {
            EmDelimiter::Underscore => "_",
            EmDelimiter::Asterisk => "*",
        }
    }
}

/// Strong delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrongDelimiter {
    #[default]
    DoubleAsterisk,
    DoubleUnderscore,
    /// Single asterisk, the bold marker of chat tools such as Slack
    Asterisk,
}

impl StrongDelimiter {
    pub fn as_str(self) -> &'static str {
        match self {
            StrongDelimiter::DoubleAsterisk => "**",
            StrongDelimiter::DoubleUnderscore => "__",
            StrongDelimiter::Asterisk => "*",
        }
    }
}

/// Link style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// Use inline links [text](url)
    #[default]
    Inlined,
    /// Use numbered reference links [text][1] with definitions at the end
    Referenced,
}

/// Options for Markdown serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleConfig {
    pub heading_style: HeadingStyle,
    pub bullet_marker: BulletMarker,
    pub code_block_style: CodeBlockStyle,
    pub em_delimiter: EmDelimiter,
    pub strong_delimiter: StrongDelimiter,
    pub link_style: LinkStyle,
    /// Render headings as strong text, for targets without heading support
    pub flatten_headings: bool,
}

/// Named flavors, each mapping to a fixed [`StyleConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    #[default]
    Default,
    Gfm,
    Slack,
    Notion,
    Discord,
    Reddit,
    Quip,
    Coda,
}

const BASE: StyleConfig = StyleConfig {
    heading_style: HeadingStyle::Atx,
    bullet_marker: BulletMarker::Dash,
    code_block_style: CodeBlockStyle::Fenced,
    em_delimiter: EmDelimiter::Underscore,
    strong_delimiter: StrongDelimiter::DoubleAsterisk,
    link_style: LinkStyle::Inlined,
    flatten_headings: false,
};

const PRESETS: &[(Preset, StyleConfig)] = &[
    (Preset::Default, BASE),
    (Preset::Gfm, BASE),
    (
        Preset::Slack,
        StyleConfig {
            strong_delimiter: StrongDelimiter::Asterisk,
            em_delimiter: EmDelimiter::Underscore,
            flatten_headings: true,
            ..BASE
        },
    ),
    (Preset::Notion, BASE),
    (
        Preset::Discord,
        StyleConfig {
            em_delimiter: EmDelimiter::Asterisk,
            ..BASE
        },
    ),
    (
        Preset::Reddit,
        StyleConfig {
            bullet_marker: BulletMarker::Asterisk,
            ..BASE
        },
    ),
    (Preset::Quip, BASE),
    (Preset::Coda, BASE),
];

impl Preset {
    pub const ALL: [Preset; 8] = [
        Preset::Default,
        Preset::Gfm,
        Preset::Slack,
        Preset::Notion,
        Preset::Discord,
        Preset::Reddit,
        Preset::Quip,
        Preset::Coda,
    ];

    /// The fixed style for this preset
    pub fn style(self) -> StyleConfig {
        PRESETS
            .iter()
            .find(|(preset, _)| *preset == self)
            .map(|(_, style)| *style)
            .unwrap_or(BASE)
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Gfm => "gfm",
            Preset::Slack => "slack",
            Preset::Notion => "notion",
            Preset::Discord => "discord",
            Preset::Reddit => "reddit",
            Preset::Quip => "quip",
            Preset::Coda => "coda",
        }
    }
}

impl From<Preset> for StyleConfig {
    fn from(preset: Preset) -> Self {
        preset.style()
    }
}

/// The active preset plus any hand-edited options layered on top of it.
///
/// Selecting a preset replaces the whole style; [`Settings::set`] edits a
/// single option and the edit lasts until the next preset selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    preset: Preset,
    style: StyleConfig,
}

impl Settings {
    pub fn new(preset: Preset) -> Self {
        Self {
            preset,
            style: preset.style(),
        }
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn select_preset(&mut self, preset: Preset) {
        self.preset = preset;
        self.style = preset.style();
    }

    /// Hand-edit one option by key, e.g. `set("heading", "setext")`
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "heading" | "heading_style" => self.style.heading_style = value.parse()?,
            "bullet" | "bullet_marker" => self.style.bullet_marker = value.parse()?,
            "code" | "code_block_style" => self.style.code_block_style = value.parse()?,
            "em" | "em_delimiter" => self.style.em_delimiter = value.parse()?,
            "strong" | "strong_delimiter" => self.style.strong_delimiter = value.parse()?,
            "links" | "link_style" => self.style.link_style = value.parse()?,
            "flatten_headings" => {
                self.style.flatten_headings = match value {
                    "true" => true,
                    "false" => false,
                    _ => return Err(ConfigError::unsupported("flatten_headings", value)),
                }
            }
            _ => return Err(ConfigError::UnknownOption(key.to_string())),
        }
        Ok(())
    }
}

macro_rules! textual_option {
    ($ty:ty, $option:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ConfigError::unsupported($option, s)),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let text = match self {
                    $(Self::$variant => $text,)+
                };
                f.write_str(text)
            }
        }
    };
}

textual_option!(HeadingStyle, "heading_style", {
    Atx => "atx",
    Setext => "setext",
});

textual_option!(BulletMarker, "bullet_marker", {
    Dash => "-",
    Asterisk => "*",
    Plus => "+",
});

textual_option!(CodeBlockStyle, "code_block_style", {
    Fenced => "fenced",
    Indented => "indented",
});

textual_option!(EmDelimiter, "em_delimiter", {
    Underscore => "_",
    Asterisk => "*",
});

textual_option!(StrongDelimiter, "strong_delimiter", {
    DoubleAsterisk => "**",
    DoubleUnderscore => "__",
    Asterisk => "*",
});

textual_option!(LinkStyle, "link_style", {
    Inlined => "inlined",
    Referenced => "referenced",
});

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
