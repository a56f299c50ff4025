//! Short identifier sequence

use rustc_hash::FxHashSet;
use sb_model::RUNTIME_MODULE_NAME;

/// Identifiers the generated script can never use as names
pub const RESERVED_WORDS: &[&str] = &[
    "arguments",
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "eval",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "Infinity",
    "instanceof",
    "interface",
    "let",
    "NaN",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "undefined",
    "var",
    "void",
    "while",
    "with",
    "yield",
    RUNTIME_MODULE_NAME,
];

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The `index`-th identifier of `a..z, A..Z, aa, ab, ...`
fn sequence_name(mut index: usize) -> String {
    let radix = ALPHABET.len();
    let mut chars = Vec::new();
    loop {
        chars.push(char::from(ALPHABET[index % radix]));
        if index < radix {
            break;
        }
        index = index / radix - 1;
    }
    chars.iter().rev().collect()
}

/// Positional short names that skip a reserved set
///
/// Position `n` always maps to the same name for a given reserved set, so
/// parameters and locals named by position agree across passes.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    reserved: FxHashSet<String>,
    names: Vec<String>,
    next: usize,
}

impl NameGenerator {
    /// Generator reserving only [`RESERVED_WORDS`]
    pub fn new() -> Self {
        Self {
            reserved: RESERVED_WORDS.iter().map(|word| (*word).to_string()).collect(),
            names: Vec::new(),
            next: 0,
        }
    }

    /// Keep `name` out of the sequence
    ///
    /// # Panics
    ///
    /// Panics once names have been handed out; positions must stay stable.
    pub fn reserve(&mut self, name: &str) {
        assert!(
            self.names.is_empty(),
            "cannot reserve '{name}' after names were generated"
        );
        self.reserved.insert(name.to_string());
    }

    /// Whether `name` is reserved
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    /// Name at `position` in the sequence
    pub fn name_at(&mut self, position: usize) -> String {
        while self.names.len() <= position {
            let candidate = sequence_name(self.next);
            self.next += 1;
            if !self.reserved.contains(&candidate) {
                self.names.push(candidate);
            }
        }
        self.names[position].clone()
    }

    /// First name of the sequence not in `used`
    pub fn first_unused(&mut self, used: &FxHashSet<String>) -> String {
        let mut position = 0;
        loop {
            let name = self.name_at(position);
            if !used.contains(&name) {
                return name;
            }
            position += 1;
        }
    }
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new()
    }
}
