/// Consumes typed characters one at a time and reports completed words.
pub trait WordDetector: Send {
    fn push(&mut self, character: char) -> Option<String>;
}

const DEFAULT_WORDS: &[&str] = &[
    "mom", "mommy", "dad", "daddy", "baby", "cat", "dog", "cow", "pig", "duck", "ball", "car",
    "sun", "moon", "star", "love", "hi", "bye", "yes", "no",
];

/// Rolling-buffer detector over a fixed vocabulary.
///
/// The buffer only holds letters; anything else clears it. When the buffer
/// ends with a known word the longest such word wins and the buffer resets.
/// A match that could still grow into a longer word ("mom" on the way to
/// "mommy") is held back until the next character either extends it or
/// breaks it off.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
    buffer: String,
    pending: Option<String>,
    max_len: usize,
}

impl WordList {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        let max_len = words
            .iter()
            .map(|word| word.chars().count())
            .max()
            .unwrap_or(0);

        Self {
            words,
            buffer: String::new(),
            pending: None,
            max_len,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    fn trim_buffer(&mut self) {
        let len = self.buffer.chars().count();
        if len > self.max_len {
            let skip = len - self.max_len;
            self.buffer = self.buffer.chars().skip(skip).collect();
        }
    }

    fn longest_match(&self) -> Option<String> {
        self.words
            .iter()
            .filter(|word| self.buffer.ends_with(word.as_str()))
            .max_by_key(|word| word.len())
            .cloned()
    }

    /// Whether a buffer suffix of at least `min_len` bytes is a strict prefix
    /// of some vocabulary word.
    fn can_grow(&self, min_len: usize) -> bool {
        self.buffer
            .char_indices()
            .map(|(start, _)| &self.buffer[start..])
            .filter(|tail| tail.len() >= min_len)
            .any(|tail| {
                self.words
                    .iter()
                    .any(|word| word.len() > tail.len() && word.starts_with(tail))
            })
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS)
    }
}

impl WordDetector for WordList {
    fn push(&mut self, character: char) -> Option<String> {
        if !character.is_alphabetic() {
            self.buffer.clear();
            return self.pending.take();
        }

        self.buffer.extend(character.to_lowercase());
        self.trim_buffer();

        if let Some(found) = self.longest_match() {
            if self.can_grow(found.len()) {
                self.pending = Some(found);
                return None;
            }
            self.pending = None;
            self.buffer.clear();
            return Some(found);
        }

        match self.pending.take() {
            Some(pending) if self.can_grow(pending.len()) => {
                self.pending = Some(pending);
                None
            }
            Some(pending) => {
                self.buffer.clear();
                self.buffer.extend(character.to_lowercase());
                Some(pending)
            }
            None => None,
        }
    }
}
