//! Presentation-ready output handed to the chat layer.

use std::fmt;

use serde::Serialize;

use crate::value_objects::Rgb;

/// One titled block of a projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub body: String,
    /// Whether the block may sit beside its neighbours.
    pub inline: bool,
}

impl Section {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            inline: false,
        }
    }

    pub fn inline(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            inline: true,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.body.lines()
    }
}

/// Metadata shared by every section of a projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionMeta {
    pub title: String,
    pub character_name: String,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub color: Rgb,
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub meta: ProjectionMeta,
    pub sections: Vec<Section>,
}

impl Projection {
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn sections_titled<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a Section> {
        self.sections.iter().filter(move |s| s.title == title)
    }
}

/// Plain-text rendering, used by the command-line entry point and logs.
impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.meta.title)?;
        if let Some(url) = &self.meta.url {
            writeln!(f, "{url}")?;
        }
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "[{}]", section.title)?;
            writeln!(f, "{}", section.body.trim_end())?;
        }
        if let Some(footer) = &self.meta.footer {
            writeln!(f)?;
            writeln!(f, "{footer}")?;
        }
        Ok(())
    }
}
