//! Assembly syntax configuration handed to expression rendering.

/// How a relocation variant is attached to a symbol name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VariantSyntax {
    /// `hi:sym`, the TriCore assembler style.
    #[default]
    Prefix,
    /// `sym@hi`
    At,
    /// `sym(hi)`
    Parens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsmInfo {
    /// Starts a comment that runs to the end of the line.
    pub comment_string: &'static str,
    pub variant_syntax: VariantSyntax,
    /// Accept `@` inside unquoted symbol names.
    pub allow_at_in_name: bool,
}

impl AsmInfo {
    pub const TRICORE: Self = Self {
        comment_string: "#",
        variant_syntax: VariantSyntax::Prefix,
        allow_at_in_name: false,
    };

    /// Whether `name` can be emitted without surrounding quotes.
    pub fn is_valid_unquoted_name(&self, name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            None => return false,
            Some(c) if c.is_ascii_digit() => return false,
            Some(c) if !self.is_name_char(c) => return false,
            Some(_) => {}
        }
        chars.all(|c| self.is_name_char(c))
    }

    fn is_name_char(&self, c: char) -> bool {
        c.is_ascii_alphanumeric()
            || matches!(c, '_' | '.' | '$')
            || (c == '@' && self.allow_at_in_name)
    }
}

impl Default for AsmInfo {
    fn default() -> Self {
        Self::TRICORE
    }
}
