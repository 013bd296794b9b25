//! Parser configuration.

use cxxparse_core::lang::registry::Dialect;

/// Source language of a translation unit.
///
/// The language decides which spellings the lexer reserves as keywords; the grammar itself is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    C,
    #[default]
    Cpp,
}

impl Language {
    pub fn dialect(self) -> Dialect {
        match self {
            Language::C => Dialect::C,
            Language::Cpp => Dialect::Cpp,
        }
    }
}

/// How much of a translation unit the parser reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParseMode {
    /// Skip function bodies by brace matching; only declarations are reported.
    Quick,
    /// Parse function bodies into statements.
    #[default]
    Complete,
}

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserConfig {
    pub language: Language,
    pub mode: ParseMode,
}

impl ParserConfig {
    /// Create a new config with default settings (C++, complete)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source language
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Set the parse mode
    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_complete_cpp() {
        let config = ParserConfig::default();
        assert_eq!(config.language, Language::Cpp);
        assert_eq!(config.mode, ParseMode::Complete);
    }

    #[test]
    fn test_builder_methods() {
        let config = ParserConfig::new()
            .with_language(Language::C)
            .with_mode(ParseMode::Quick);
        assert_eq!(config.language, Language::C);
        assert_eq!(config.mode, ParseMode::Quick);
        assert_eq!(config.language.dialect(), Dialect::C);
    }
}
