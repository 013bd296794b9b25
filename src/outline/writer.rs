//! Output writer with indentation tracking
//!
//! Outlines are line-oriented: one construct per line, nested constructs indented under their scope.

/// Writer that tracks indentation and builds outline text
pub struct OutlineWriter {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Spaces per indentation level
    indent_width: usize,
    /// Whether we're at the start of a line
    at_line_start: bool,
}

impl OutlineWriter {
    /// Create a new writer indenting by `indent_width` spaces per level
    pub fn new(indent_width: usize) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_width,
            at_line_start: true,
        }
    }

    /// Get the rendered output
    pub fn finish(self) -> String {
        self.output
    }

    /// Increase indentation level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation level
    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        if self.at_line_start {
            self.output.push_str(&" ".repeat(self.indent_level * self.indent_width));
            self.at_line_start = false;
        }
    }

    /// Write a string (with auto-indent)
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    /// Write a string and newline
    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    /// Write just a newline
    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation_applies_at_line_start_only() {
        let mut w = OutlineWriter::new(2);
        w.writeln("a");
        w.indent();
        w.write("b");
        w.write("c");
        w.newline();
        w.dedent();
        w.dedent();
        w.writeln("d");
        assert_eq!(w.finish(), "a\n  bc\nd\n");
    }
}
