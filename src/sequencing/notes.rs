/*
Note Library
============

Maps note names to the frequency each pluck is tuned to. The default set is
the pentatonic minor scale the player has always shipped with:

  C4   262 Hz
  Eb   311 Hz
  F    349 Hz
  G    391 Hz
  B    466 Hz

Frequencies are whole hertz on purpose; they are the targets the rendered
samples were tuned to, not equal-temperament values.

A custom mapping can be built from pairs or parsed from text:

  "C4=262,Eb=311,F=349"

Entries keep their insertion order. Re-inserting a name replaces the earlier
frequency in place.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::{fmt, str::FromStr};

/// A named target pitch.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    name: String,
    frequency: f32,
}

impl Note {
    pub fn new(name: impl Into<String>, frequency: f32) -> Result<Self, NoteError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(NoteError::EmptyName);
        }
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(NoteError::InvalidFrequency { name, frequency });
        }
        Ok(Self { name, frequency })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target frequency in Hz
    pub fn frequency(&self) -> f32 {
        self.frequency
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.frequency)
    }
}

/// Parses `NAME=HZ`.
impl FromStr for Note {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, freq) = s
            .split_once('=')
            .ok_or_else(|| NoteError::Malformed(s.to_string()))?;
        let frequency = freq
            .trim()
            .parse::<f32>()
            .map_err(|_| NoteError::Malformed(s.to_string()))?;
        Note::new(name.trim(), frequency)
    }
}

/// Ordered name -> frequency mapping.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteLibrary {
    notes: Vec<Note>,
}

impl NoteLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// C4, Eb, F, G, B.
    pub fn pentatonic_minor() -> Self {
        let notes = [
            ("C4", 262.0),
            ("Eb", 311.0),
            ("F", 349.0),
            ("G", 391.0),
            ("B", 466.0),
        ]
        .into_iter()
        .map(|(name, frequency)| Note {
            name: name.to_string(),
            frequency,
        })
        .collect();
        Self { notes }
    }

    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, NoteError>
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        let mut library = Self::new();
        for (name, frequency) in pairs {
            library.insert(Note::new(name, frequency)?);
        }
        Ok(library)
    }

    /// Add a note, replacing any entry with the same name.
    pub fn insert(&mut self, note: Note) {
        match self.notes.iter_mut().find(|n| n.name == note.name) {
            Some(existing) => *existing = note,
            None => self.notes.push(note),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.notes.iter().map(|n| n.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl FromIterator<Note> for NoteLibrary {
    fn from_iter<T: IntoIterator<Item = Note>>(iter: T) -> Self {
        let mut library = Self::new();
        for note in iter {
            library.insert(note);
        }
        library
    }
}

/// Parses a comma-separated list of `NAME=HZ` entries.
impl FromStr for NoteLibrary {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(Note::from_str)
            .collect()
    }
}

/// Errors that can occur when defining notes
#[derive(Debug, Clone, PartialEq)]
pub enum NoteError {
    /// Note name is blank
    EmptyName,
    /// Frequency is zero, negative or not finite
    InvalidFrequency { name: String, frequency: f32 },
    /// Text is not of the form `NAME=HZ`
    Malformed(String),
}

impl fmt::Display for NoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteError::EmptyName => write!(f, "Note name must not be empty"),
            NoteError::InvalidFrequency { name, frequency } => {
                write!(f, "Note {} has invalid frequency {} Hz", name, frequency)
            }
            NoteError::Malformed(text) => {
                write!(f, "Expected NAME=HZ, got '{}'", text)
            }
        }
    }
}

impl std::error::Error for NoteError {}
