//! Live preview rendering boundary.
//!
//! Markup interpretation is delegated to a `MarkupRenderer`; this module only
//! guarantees that raw input is HTML-escaped before it reaches the renderer.

/// Syntax highlighting callback for fenced code blocks.
pub trait Highlighter {
    fn highlight(&self, code: &str, lang: Option<&str>) -> String;
}

/// Leaves code untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHighlight;

impl Highlighter for NoHighlight {
    fn highlight(&self, code: &str, _lang: Option<&str>) -> String {
        code.to_string()
    }
}

/// Renderer flags forwarded to the markup engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// GitHub-flavored extensions (fenced code blocks, tables).
    pub gfm: bool,
    pub pedantic: bool,
    /// Drop raw HTML embedded in the source.
    pub sanitize: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            pedantic: true,
            sanitize: true,
        }
    }
}

/// External markup engine.
pub trait MarkupRenderer {
    /// Renders already-escaped source into an HTML fragment.
    ///
    /// Fenced code blocks are passed through `highlighter`.
    fn render(&self, source: &str, options: &RenderOptions, highlighter: &dyn Highlighter)
        -> String;
}

/// Shows escaped source verbatim inside `<pre>`, treating the whole text as
/// one code block.
///
/// Used when no markup engine is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreformattedRenderer;

impl MarkupRenderer for PreformattedRenderer {
    fn render(
        &self,
        source: &str,
        _options: &RenderOptions,
        highlighter: &dyn Highlighter,
    ) -> String {
        format!("<pre>{}</pre>", highlighter.highlight(source, None))
    }
}

/// Renderer plus its configuration, as wired by the editor view.
pub struct PreviewPipeline {
    renderer: Box<dyn MarkupRenderer>,
    highlighter: Box<dyn Highlighter>,
    options: RenderOptions,
}

impl Default for PreviewPipeline {
    fn default() -> Self {
        Self::new(Box::new(PreformattedRenderer))
    }
}

impl PreviewPipeline {
    pub fn new(renderer: Box<dyn MarkupRenderer>) -> Self {
        Self {
            renderer,
            highlighter: Box::new(NoHighlight),
            options: RenderOptions::default(),
        }
    }

    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Escapes raw editor text, then renders it.
    pub fn render(&self, raw: &str) -> String {
        self.renderer
            .render(&escape_html(raw), &self.options, self.highlighter.as_ref())
    }
}

/// Escapes `& < > " '` for safe embedding in HTML text.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
