//! Shared types for tag parsing.
//!
//! This module defines the symbol records produced by an external tag
//! extractor and the fixed table of tag kinds they can carry.

use serde::Serialize;
use std::fmt;

/// The kind of symbol a tag line describes.
///
/// ctags emits a single kind letter per line. Letters outside the known
/// table map to [`TagKind::Unknown`] rather than failing the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    /// Class name (`c`)
    Class,
    /// `#define` macro (`d`)
    Define,
    /// Enumerator value (`e`)
    Enumerator,
    /// Function or method definition (`f`)
    Function,
    /// File name (`F`)
    File,
    /// Enumeration name (`g`)
    EnumName,
    /// Structure, class or union member (`m`)
    Member,
    /// Function prototype (`p`)
    Prototype,
    /// Structure tag (`s`)
    StructTag,
    /// Typedef (`t`)
    Typedef,
    /// Union name (`u`)
    Union,
    /// Variable definition (`v`)
    Variable,
    /// Any kind letter not in the table.
    Unknown,
}

impl TagKind {
    /// Maps a ctags kind letter to its kind. Total: never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use headerprobe::parser::TagKind;
    ///
    /// assert_eq!(TagKind::from_letter('d'), TagKind::Define);
    /// assert_eq!(TagKind::from_letter('F'), TagKind::File);
    /// assert_eq!(TagKind::from_letter('x'), TagKind::Unknown);
    /// ```
    pub fn from_letter(letter: char) -> Self {
        match letter {
            'c' => TagKind::Class,
            'd' => TagKind::Define,
            'e' => TagKind::Enumerator,
            'f' => TagKind::Function,
            'F' => TagKind::File,
            'g' => TagKind::EnumName,
            'm' => TagKind::Member,
            'p' => TagKind::Prototype,
            's' => TagKind::StructTag,
            't' => TagKind::Typedef,
            'u' => TagKind::Union,
            'v' => TagKind::Variable,
            _ => TagKind::Unknown,
        }
    }

    /// Maps a kind field as written in a tags file.
    ///
    /// Accepts the single letter form (`f`), the `kind:` prefixed form
    /// (`kind:f`) and the long names ctags writes with `--fields=+K`
    /// (`function`, `macro`, `struct`, ...).
    pub fn from_field(field: &str) -> Self {
        let field = field.strip_prefix("kind:").unwrap_or(field);

        let mut chars = field.chars();
        if let (Some(letter), None) = (chars.next(), chars.next()) {
            return Self::from_letter(letter);
        }

        match field {
            "class" => TagKind::Class,
            "define" | "macro" => TagKind::Define,
            "enumerator" => TagKind::Enumerator,
            "function" => TagKind::Function,
            "file" => TagKind::File,
            "enum" | "enum_name" => TagKind::EnumName,
            "member" => TagKind::Member,
            "prototype" => TagKind::Prototype,
            "struct" | "struct_tag" => TagKind::StructTag,
            "typedef" => TagKind::Typedef,
            "union" => TagKind::Union,
            "variable" => TagKind::Variable,
            _ => TagKind::Unknown,
        }
    }

    /// Returns true if symbols of this kind count towards a header's
    /// identifier set.
    pub fn is_identifier_kind(&self) -> bool {
        matches!(
            self,
            TagKind::Define | TagKind::Enumerator | TagKind::Function | TagKind::Typedef
        )
    }

    /// Returns the label used in reports and logs.
    pub fn label(&self) -> &'static str {
        match self {
            TagKind::Class => "class",
            TagKind::Define => "define",
            TagKind::Enumerator => "enumerator",
            TagKind::Function => "function",
            TagKind::File => "file",
            TagKind::EnumName => "enum_name",
            TagKind::Member => "member",
            TagKind::Prototype => "prototype",
            TagKind::StructTag => "struct_tag",
            TagKind::Typedef => "typedef",
            TagKind::Union => "union",
            TagKind::Variable => "variable",
            TagKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One symbol reported by the tag extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolRecord {
    /// The symbol name (e.g., "MAX_LEN", "list_push").
    pub name: String,

    /// What kind of symbol this is.
    pub kind: TagKind,

    /// File name part of the declaring file (e.g., "list.h").
    pub file: String,

    /// Directory part of the declaring file, empty when the tag names a
    /// bare file.
    pub path: String,

    /// Location within the file, usually a line number.
    pub address: String,
}

impl SymbolRecord {
    /// Creates a new SymbolRecord.
    pub fn new(
        name: impl Into<String>,
        kind: TagKind,
        file: impl Into<String>,
        path: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            file: file.into(),
            path: path.into(),
            address: address.into(),
        }
    }
}

impl fmt::Display for SymbolRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {}:{}", self.name, self.kind, self.file, self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_letter_covers_table() {
        let table = [
            ('c', TagKind::Class),
            ('d', TagKind::Define),
            ('e', TagKind::Enumerator),
            ('f', TagKind::Function),
            ('F', TagKind::File),
            ('g', TagKind::EnumName),
            ('m', TagKind::Member),
            ('p', TagKind::Prototype),
            ('s', TagKind::StructTag),
            ('t', TagKind::Typedef),
            ('u', TagKind::Union),
            ('v', TagKind::Variable),
        ];
        for (letter, kind) in table {
            assert_eq!(TagKind::from_letter(letter), kind);
        }
        assert_eq!(TagKind::from_letter('z'), TagKind::Unknown);
        assert_eq!(TagKind::from_letter('D'), TagKind::Unknown);
    }

    #[test]
    fn test_from_field_forms() {
        assert_eq!(TagKind::from_field("f"), TagKind::Function);
        assert_eq!(TagKind::from_field("kind:t"), TagKind::Typedef);
        assert_eq!(TagKind::from_field("macro"), TagKind::Define);
        assert_eq!(TagKind::from_field("kind:enumerator"), TagKind::Enumerator);
        assert_eq!(TagKind::from_field(""), TagKind::Unknown);
        assert_eq!(TagKind::from_field("namespace"), TagKind::Unknown);
    }

    #[test]
    fn test_identifier_kinds() {
        assert!(TagKind::Define.is_identifier_kind());
        assert!(TagKind::Enumerator.is_identifier_kind());
        assert!(TagKind::Function.is_identifier_kind());
        assert!(TagKind::Typedef.is_identifier_kind());
        assert!(!TagKind::Prototype.is_identifier_kind());
        assert!(!TagKind::Member.is_identifier_kind());
        assert!(!TagKind::Unknown.is_identifier_kind());
    }

    #[test]
    fn test_symbol_record_display() {
        let rec = SymbolRecord::new("MAX_LEN", TagKind::Define, "list.h", "inc", "12");
        assert_eq!(format!("{}", rec), "MAX_LEN (define) list.h:12");
    }
}
