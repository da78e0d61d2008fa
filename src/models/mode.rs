//! Plain-text vs markup editing mode, with prompted transitions.

use super::buffer::EditBuffer;

/// Recognized content extensions; `txt` is the primary one appended to
/// extensionless names on rename.
pub const TEXT_EXTENSION: &str = "txt";
pub const MARKUP_EXTENSION: &str = "html";

pub const MARKUP_HEADER_MARKER: &str = "<!DOCTYPE html>";
const MARKUP_HEADER: &str = "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n<body>\n";
const MARKUP_FOOTER: &str = "\n</body>\n</html>\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Text,
    Markup,
}

impl EditMode {
    pub fn extension(self) -> &'static str {
        match self {
            EditMode::Text => TEXT_EXTENSION,
            EditMode::Markup => MARKUP_EXTENSION,
        }
    }

    /// Picks the mode a file opens in from its extension.
    pub fn for_file_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(&format!(".{}", MARKUP_EXTENSION)) {
            EditMode::Markup
        } else {
            EditMode::Text
        }
    }

    pub fn other(self) -> Self {
        match self {
            EditMode::Text => EditMode::Markup,
            EditMode::Markup => EditMode::Text,
        }
    }
}

/// The question the shell must put to the user before a switch proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPrompt {
    /// Markup -> Text: formatting will be dropped.
    DiscardFormatting,
    /// Text -> Markup: interpret the text as markup (yes) or escape it into
    /// markup as literal text (no).
    InterpretAsMarkup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAnswer {
    Yes,
    No,
    Cancel,
}

#[derive(Debug)]
pub struct ModeMachine {
    mode: EditMode,
}

impl ModeMachine {
    pub fn new(mode: EditMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
    }

    pub fn prompt_for(&self, target: EditMode) -> Option<SwitchPrompt> {
        if target == self.mode {
            return None;
        }
        Some(match target {
            EditMode::Text => SwitchPrompt::DiscardFormatting,
            EditMode::Markup => SwitchPrompt::InterpretAsMarkup,
        })
    }

    /// Applies an answered switch. On success the inactive buffer form is
    /// regenerated from the active one and the buffer is marked dirty; a
    /// cancelled switch changes nothing. Returns whether the mode changed.
    pub fn apply(
        &mut self,
        target: EditMode,
        answer: SwitchAnswer,
        buffer: &mut EditBuffer,
    ) -> bool {
        if target == self.mode {
            return false;
        }

        match (target, answer) {
            (EditMode::Text, SwitchAnswer::Yes) => {
                let text = markup_to_text(buffer.markup());
                buffer.refresh_text(text);
            }
            (EditMode::Markup, SwitchAnswer::Yes) => {
                let markup = buffer.text().to_string();
                buffer.refresh_markup(markup);
            }
            (EditMode::Markup, SwitchAnswer::No) => {
                let markup = escape_to_markup(buffer.text());
                buffer.refresh_markup(markup);
            }
            _ => return false,
        }

        self.mode = target;
        buffer.mark_dirty();
        true
    }
}

/// Wraps markup content in the fixed document header, unless the header
/// marker is already present (repeated saves must not double-wrap).
pub fn wrap_markup(content: &str) -> String {
    if content.contains(MARKUP_HEADER_MARKER) {
        content.to_string()
    } else {
        format!("{MARKUP_HEADER}{content}{MARKUP_FOOTER}")
    }
}

/// Minimal markup-to-plain-text conversion: line breaks for `<br>` and
/// closing block tags, all other tags dropped, basic entities decoded.
pub fn markup_to_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let Some(close) = tail.find('>') else {
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let tag = tail[..close].trim().to_ascii_lowercase();
        let tag = tag.trim_end_matches('/').trim_end();
        if matches!(tag, "br" | "/p" | "/div" | "/li" | "/h1" | "/h2" | "/h3") {
            out.push('\n');
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);

    decode_entities(&out).trim().to_string()
}

/// Escapes plain text into markup as literal content; newlines become `<br>`.
pub fn escape_to_markup(text: &str) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    escaped.split('\n').collect::<Vec<_>>().join("<br>\n")
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
#[path = "../../tests/unit/models/mode.rs"]
mod tests;
