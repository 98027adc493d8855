//! Loading labelled mail corpora and splitting them for evaluation.
//!
//! Two layouts are understood:
//!
//! * a directory tree in which every message is a `*.txt` file whose parent
//!   directory is called `spam` or `ham` (the Enron-Spam layout);
//! * a headered CSV file with `content` and `category` columns, where
//!   `category == 1` marks spam.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Spam,
    Ham,
}

impl Label {
    fn from_dir_name(name: &str) -> Option<Self> {
        match name {
            "spam" => Some(Label::Spam),
            "ham" => Some(Label::Ham),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
pub struct Email {
    content: String,
    category: u8,
}

impl Email {
    pub fn is_spam(&self) -> bool {
        self.category == 1
    }

    pub fn label(&self) -> Label {
        if self.is_spam() { Label::Spam } else { Label::Ham }
    }
}

/// Message texts grouped by label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    pub spam: Vec<String>,
    pub ham: Vec<String>,
}

impl Corpus {
    pub fn push(&mut self, label: Label, text: String) {
        match label {
            Label::Spam => self.spam.push(text),
            Label::Ham => self.ham.push(text),
        }
    }

    pub fn len(&self) -> usize {
        self.spam.len() + self.ham.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads every `spam/*.txt` and `ham/*.txt` file below `root`.
///
/// Files are decoded as latin-1 and their line feeds removed. Messages are
/// ordered by path.
pub fn load_dir<P: AsRef<Path>>(root: P) -> Result<Corpus> {
    let root = root.as_ref();
    let mut files = Vec::new();
    collect_files(root, &mut files)?;
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut corpus = Corpus::default();
    for (path, label) in files {
        let bytes = fs::read(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        debug!("Read {} ({} bytes)", path.display(), bytes.len());
        corpus.push(label, strip_newlines(&decode_latin1(&bytes)));
    }

    info!(
        spam = corpus.spam.len(),
        ham = corpus.ham.len(),
        "Loaded {}",
        root.display()
    );
    Ok(corpus)
}

fn collect_files(dir: &Path, files: &mut Vec<(PathBuf, Label)>) -> Result<()> {
    let io_error = |source: std::io::Error| Error::Io {
        path: dir.to_path_buf(),
        source,
    };

    let label = dir
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(Label::from_dir_name);

    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
            continue;
        }

        let is_txt = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with("txt"));
        match label {
            Some(label) if is_txt => files.push((path, label)),
            _ => debug!("Skipping {}", path.display()),
        }
    }
    Ok(())
}

/// Latin-1 maps every byte to the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Removes line feeds and carriage returns, joining the lines.
fn strip_newlines(text: &str) -> String {
    text.replace(['\r', '\n'], "")
}

/// Reads a headered `content,category` CSV file.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let mut corpus = Corpus::default();
    for record in reader.deserialize() {
        let email: Email = record?;
        corpus.push(email.label(), strip_newlines(&email.content));
    }

    info!(
        spam = corpus.spam.len(),
        ham = corpus.ham.len(),
        "Loaded {}",
        path.display()
    );
    Ok(corpus)
}

/// Shuffles `messages` and splits off the first `floor(len * ratio)` of them
/// as the training set. The remainder is the test set.
pub fn split<T, R>(mut messages: Vec<T>, ratio: f64, rng: &mut R) -> Result<(Vec<T>, Vec<T>)>
where
    R: Rng + ?Sized,
{
    if !(0. ..=1.).contains(&ratio) {
        return Err(Error::InvalidRatio(ratio));
    }

    messages.shuffle(rng);
    let index = (messages.len() as f64 * ratio) as usize;
    let test = messages.split_off(index);
    Ok((messages, test))
}
