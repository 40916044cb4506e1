//! Prompt templates.
//!
//! Templates are plain text with two kinds of slot:
//!
//! - `{{{field}}}` inserts the field's text verbatim;
//! - `{{media url=field}}` attaches the field, a `data:<mime>;base64,<data>`
//!   URI, as an inline media part.
//!
//! Rendering splits the template at media slots, so a rendered prompt is a
//! sequence of text and media parts in template order.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{AiError, Result};

/// Inline media decoded from a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMedia {
    pub mime_type: String,
    /// Base64 payload, as given.
    pub data: String,
}

impl InlineMedia {
    /// Parse `data:<mime>;base64,<data>`.
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.trim().strip_prefix("data:")?;
        let (header, data) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;
        let valid_mime = mime_type.contains('/') && !mime_type.contains(char::is_whitespace);
        let valid_data = !data.is_empty()
            && data
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='));
        (valid_mime && valid_data).then(|| Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }
}

/// One piece of a rendered prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    Media(InlineMedia),
}

/// A prompt ready to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub parts: Vec<PromptPart>,
}

impl RenderedPrompt {
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(PromptPart::Text(last)) = self.parts.last_mut() {
            last.push_str(text);
        } else {
            self.parts.push(PromptPart::Text(text.to_string()));
        }
    }

    pub fn media(&self) -> impl Iterator<Item = &InlineMedia> {
        self.parts.iter().filter_map(|part| match part {
            PromptPart::Media(media) => Some(media),
            PromptPart::Text(_) => None,
        })
    }
}

/// Media parts render as a `[media: <mime>]` placeholder.
impl fmt::Display for RenderedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                PromptPart::Text(text) => f.write_str(text)?,
                PromptPart::Media(media) => write!(f, "[media: {}]", media.mime_type)?,
            }
        }
        Ok(())
    }
}

/// Named prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub source: &'static str,
}

enum Slot<'a> {
    Text(&'a str),
    Media(&'a str),
}

impl PromptTemplate {
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }

    /// Field names referenced by the template, in order of first use.
    pub fn fields(&self) -> Result<Vec<&'static str>> {
        let mut names = Vec::new();
        let mut rest = self.source;
        while let Some((_, slot, after)) = self.next_slot(rest)? {
            let name = match slot {
                Slot::Text(name) | Slot::Media(name) => name,
            };
            if !names.contains(&name) {
                names.push(name);
            }
            rest = after;
        }
        Ok(names)
    }

    /// Fill every slot from `fields`.
    pub fn render(&self, fields: &BTreeMap<&str, String>) -> Result<RenderedPrompt> {
        let mut prompt = RenderedPrompt::default();
        let mut rest = self.source;
        while let Some((before, slot, after)) = self.next_slot(rest)? {
            prompt.push_text(before);
            match slot {
                Slot::Text(name) => prompt.push_text(self.lookup(fields, name)?),
                Slot::Media(name) => {
                    let uri = self.lookup(fields, name)?;
                    let media = InlineMedia::from_data_uri(uri).ok_or_else(|| {
                        self.error(format!("field {name} is not a base64 data URI"))
                    })?;
                    prompt.parts.push(PromptPart::Media(media));
                }
            }
            rest = after;
        }
        prompt.push_text(rest);
        Ok(prompt)
    }

    fn lookup<'f>(&self, fields: &'f BTreeMap<&str, String>, name: &str) -> Result<&'f str> {
        fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| self.error(format!("no value for field {name}")))
    }

    /// Split `input` at its first slot.
    fn next_slot<'a>(&self, input: &'a str) -> Result<Option<(&'a str, Slot<'a>, &'a str)>> {
        let Some(start) = input.find("{{") else {
            return Ok(None);
        };
        let before = &input[..start];
        let tail = &input[start..];

        if let Some(body) = tail.strip_prefix("{{{") {
            let end = body
                .find("}}}")
                .ok_or_else(|| self.error("unterminated {{{ slot".to_string()))?;
            let name = body[..end].trim();
            return Ok(Some((before, Slot::Text(name), &body[end + 3..])));
        }

        let body = &tail[2..];
        let end = body
            .find("}}")
            .ok_or_else(|| self.error("unterminated {{ slot".to_string()))?;
        let directive = body[..end].trim();
        let name = directive
            .strip_prefix("media")
            .map(str::trim_start)
            .and_then(|args| args.strip_prefix("url="))
            .map(str::trim)
            .ok_or_else(|| self.error(format!("unsupported slot {{{{{directive}}}}}")))?;
        Ok(Some((before, Slot::Media(name), &body[end + 2..])))
    }

    fn error(&self, reason: String) -> AiError {
        AiError::Template {
            template: self.name,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXEL: &str = "data:image/png;base64,iVBORw0KGgo=";

    fn fields(pairs: &[(&'static str, &str)]) -> BTreeMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, (*v).to_string())).collect()
    }

    #[test]
    fn text_slots_are_substituted() {
        let template = PromptTemplate::new("t", "Crop: {{{cropType}}} in {{{ location }}}.");
        let prompt = template
            .render(&fields(&[("cropType", "Cotton"), ("location", "Nagpur")]))
            .unwrap();
        assert_eq!(prompt.to_string(), "Crop: Cotton in Nagpur.");
        assert_eq!(prompt.parts.len(), 1);
    }

    #[test]
    fn media_slot_splits_the_prompt() {
        let template = PromptTemplate::new("t", "Image: {{media url=img}} end");
        let prompt = template.render(&fields(&[("img", PIXEL)])).unwrap();
        assert_eq!(
            prompt.parts,
            vec![
                PromptPart::Text("Image: ".to_string()),
                PromptPart::Media(InlineMedia {
                    mime_type: "image/png".to_string(),
                    data: "iVBORw0KGgo=".to_string(),
                }),
                PromptPart::Text(" end".to_string()),
            ]
        );
        assert_eq!(prompt.to_string(), "Image: [media: image/png] end");
    }

    #[test]
    fn missing_field_is_a_template_error() {
        let template = PromptTemplate::new("crop", "{{{region}}}");
        let err = template.render(&BTreeMap::new()).unwrap_err();
        assert_eq!(err.to_string(), "template crop: no value for field region");
    }

    #[test]
    fn media_must_be_a_data_uri() {
        let template = PromptTemplate::new("t", "{{media url=img}}");
        assert!(template.render(&fields(&[("img", "https://x/y.png")])).is_err());
        assert!(InlineMedia::from_data_uri("data:image/png,abc").is_none());
        assert!(InlineMedia::from_data_uri("data:image/png;base64,").is_none());
    }

    #[test]
    fn fields_are_listed_once_in_order() {
        let template = PromptTemplate::new("t", "{{{b}}} {{media url=a}} {{{b}}}");
        assert_eq!(template.fields().unwrap(), vec!["b", "a"]);
    }

    #[test]
    fn unknown_directive_is_rejected() {
        let template = PromptTemplate::new("t", "{{#if x}}");
        assert!(template.fields().is_err());
    }
}
