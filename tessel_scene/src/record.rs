// record.rs - untyped field tree shared by the parser, decoder and writer

#[derive(Debug, Clone, PartialEq)]
pub enum TextValue {
    Str(String),
    Number(f32),
    /// Bare word: enum literals and `true`/`false`.
    Ident(String),
    Block(TextRecord),
}

impl TextValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Number(_) => "number",
            Self::Ident(_) => "identifier",
            Self::Block(_) => "block",
        }
    }
}

/// Ordered `key: value` / `key { ... }` fields. Keys may repeat.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextRecord {
    pub fields: Vec<(String, TextValue)>,
}

impl TextRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: TextValue) {
        self.fields.push((key.into(), value));
    }

    pub fn with(mut self, key: impl Into<String>, value: TextValue) -> Self {
        self.push(key, value);
        self
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&TextValue> {
        self.get_all(key).next()
    }

    pub fn get_all<'a, 'k>(&'a self, key: &'k str) -> impl Iterator<Item = &'a TextValue> {
        self.fields
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
