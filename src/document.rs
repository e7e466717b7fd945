use std::fmt::{self, Write as _};
use std::io::Read;
use std::slice;
use std::str::FromStr;

use crate::error::{Error, ParseError, Result};
use crate::parser::Parser;
use crate::section::Section;
use crate::{Encoding, KEY_SEPARATOR, SECTION_END, SECTION_START};

/// An ordered list of sections.
///
/// Section names are not required to be unique. Lookups by name ignore case and return the
/// first match; [`Document::replace`] replaces every match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse INI text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Syntax`] for the first key line without a `=`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Parser::new(text).into_sections().map(|sections| Self { sections })
    }

    /// Decode `data` and parse it. A byte order mark takes precedence over `encoding`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Syntax`] for the first key line without a `=`.
    pub fn from_bytes(data: &[u8], encoding: Encoding) -> Result<Self, ParseError> {
        Self::parse(&encoding.decode(data))
    }

    /// # Errors
    ///
    /// Fails if `reader` fails or the data does not parse.
    pub fn from_reader<R: Read>(mut reader: R, encoding: Encoding) -> Result<Self> {
        let mut data = Vec::with_capacity(4096);
        reader
            .read_to_end(&mut data)
            .map_err(|source| Error::ReadInput { source })?;

        Ok(Self::from_bytes(&data, encoding)?)
    }

    #[must_use]
    pub fn to_bytes(&self, encoding: Encoding) -> Vec<u8> {
        encoding.encode(&self.to_string())
    }

    /// Return the first section whose name matches `name`, ignoring case.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.is_named(name))
    }

    #[must_use]
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|section| section.is_named(name))
    }

    /// Return the first section without a name, which holds keys written before any header.
    #[must_use]
    pub fn preamble(&self) -> Option<&Section> {
        self.sections.iter().find(|section| section.name().is_none())
    }

    /// Replace every section whose name matches `name` with a copy of `section`, returning how
    /// many were replaced.
    pub fn replace(&mut self, name: &str, section: &Section) -> usize {
        let mut replaced = 0;

        for slot in self.sections.iter_mut().filter(|s| s.is_named(name)) {
            slot.clone_from(section);
            replaced += 1;
        }

        replaced
    }

    /// Insert `key = value` into the first section named `section_name`, appending a new section
    /// if none matches. An existing key is overwritten.
    pub fn add_entry(
        &mut self,
        section_name: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        let index = match self.sections.iter().position(|s| s.is_named(section_name)) {
            Some(i) => i,
            None => {
                self.sections.push(Section::new(section_name));
                self.sections.len() - 1
            }
        };

        self.sections[index].insert(key, value)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Section> {
        self.sections.get_mut(index)
    }

    /// Replace the section at `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn set(&mut self, index: usize, section: Section) -> Result<Section> {
        let len = self.sections.len();
        let slot = self
            .sections
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;

        Ok(std::mem::replace(slot, section))
    }

    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index > len`.
    pub fn insert(&mut self, index: usize, section: Section) -> Result<()> {
        let len = self.sections.len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }

        self.sections.insert(index, section);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> Result<Section> {
        let len = self.sections.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }

        Ok(self.sections.remove(index))
    }

    /// Remove the first section equal to `section`.
    pub fn remove(&mut self, section: &Section) -> bool {
        self.position(section)
            .map(|i| self.sections.remove(i))
            .is_some()
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    #[must_use]
    pub fn contains(&self, section: &Section) -> bool {
        self.sections.contains(section)
    }

    #[must_use]
    pub fn position(&self, section: &Section) -> Option<usize> {
        self.sections.iter().position(|s| s == section)
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Section> {
        self.sections.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Section> {
        self.sections.iter_mut()
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

/// Writes one line per header and key. Values are written verbatim.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            if let Some(name) = section.name().filter(|name| !name.is_empty()) {
                f.write_char(SECTION_START)?;
                f.write_str(name)?;
                f.write_char(SECTION_END)?;
                f.write_char('\n')?;
            }

            for (key, value) in section {
                f.write_str(key)?;
                f.write_char(KEY_SEPARATOR)?;
                f.write_str(value)?;
                f.write_char('\n')?;
            }
        }

        Ok(())
    }
}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromIterator<Section> for Document {
    fn from_iter<I: IntoIterator<Item = Section>>(iter: I) -> Self {
        Self {
            sections: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = Section;
    type IntoIter = std::vec::IntoIter<Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Section;
    type IntoIter = slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}
