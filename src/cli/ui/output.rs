use console::style;

/// Styled status lines; everything goes to stderr so stdout stays pipeable.
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        eprintln!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow(), message);
    }

    /// Separator printed between Telegram-sized chunks
    pub fn chunk_header(&self, index: usize, total: usize) {
        eprintln!("{}", style(format!("── chunk {}/{} ──", index, total)).dim());
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
