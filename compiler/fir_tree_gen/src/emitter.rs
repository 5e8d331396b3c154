//! Indentation-aware source buffer.

/// Builds generated source line by line, four spaces per level.
#[derive(Default)]
pub struct SourceEmitter {
    buffer: String,
    indent: usize,
}

impl SourceEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit one line at the current indentation. Empty text emits a blank line.
    pub fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.indent * 4 {
                self.buffer.push(' ');
            }
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
    }

    pub fn blank(&mut self) {
        self.buffer.push('\n');
    }

    /// Emit `header {` and indent.
    pub fn open(&mut self, header: &str) {
        self.line(&format!("{header} {{"));
        self.indent += 1;
    }

    /// Dedent and emit the closing brace.
    pub fn close(&mut self) {
        self.close_with("}");
    }

    /// Dedent and emit `text` (for `})` or `},`).
    pub fn close_with(&mut self, text: &str) {
        debug_assert!(self.indent > 0, "unbalanced close");
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }

    /// The generated source, ending in exactly one newline.
    pub fn output(mut self) -> String {
        while self.buffer.ends_with("\n\n") {
            self.buffer.pop();
        }
        if !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
        self.buffer
    }
}
