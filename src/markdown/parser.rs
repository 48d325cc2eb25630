//! Markdown parser implementation using comrak
//!
//! Wraps comrak for the two consumers in the app: the native preview walks
//! an owned AST ([`MarkdownDocument`]), the printable page takes HTML.
//! Neither path fails; malformed markdown just renders as text.

use comrak::{
    markdown_to_html,
    nodes::{AstNode, ListDelimType, ListType as ComrakListType, NodeValue, TableAlignment as ComrakTableAlignment},
    parse_document, Arena, Options,
};

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown extensions enabled for parsing and HTML output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// GitHub Flavored Markdown tables
    pub tables: bool,
    /// Strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Bare URLs and emails become links
    pub autolink: bool,
    /// Task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Footnotes
    pub footnotes: bool,
    /// Front matter delimiter; front matter is skipped in the preview
    pub front_matter_delimiter: Option<String>,
    /// Pass raw HTML through to the page instead of escaping it
    pub allow_raw_html: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            footnotes: true,
            front_matter_delimiter: Some("---".to_string()),
            allow_raw_html: false,
        }
    }
}

impl MarkdownOptions {
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.footnotes = self.footnotes;
        options.extension.front_matter_delimiter = self.front_matter_delimiter.clone();
        options.extension.header_ids = Some(String::new());

        options.render.unsafe_ = self.allow_raw_html;

        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AST
// ─────────────────────────────────────────────────────────────────────────────

/// List type (ordered or unordered)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Bullet,
    Ordered { start: usize, delimiter: char },
}

/// Table cell alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl From<ComrakTableAlignment> for TableAlignment {
    fn from(align: ComrakTableAlignment) -> Self {
        match align {
            ComrakTableAlignment::None => TableAlignment::None,
            ComrakTableAlignment::Left => TableAlignment::Left,
            ComrakTableAlignment::Center => TableAlignment::Center,
            ComrakTableAlignment::Right => TableAlignment::Right,
        }
    }
}

/// Type of a node in the preview AST.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkdownNodeType {
    Document,
    BlockQuote,
    List { list_type: ListType, tight: bool },
    Item,
    /// Fenced or indented code; `language` is the first word of the info string
    CodeBlock { language: String, literal: String },
    HtmlBlock(String),
    Paragraph,
    /// Heading with level 1-6
    Heading { level: u8 },
    ThematicBreak,
    Table { alignments: Vec<TableAlignment> },
    TableRow { header: bool },
    TableCell,
    Text(String),
    TaskItem { checked: bool },
    SoftBreak,
    LineBreak,
    Code(String),
    HtmlInline(String),
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String },
    Image { url: String, title: String },
    FootnoteReference(String),
    FootnoteDefinition(String),
    /// Front matter and node kinds the preview does not draw
    Skipped,
}

/// A node in the preview AST.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownNode {
    pub node_type: MarkdownNodeType,
    pub children: Vec<MarkdownNode>,
    /// Start line in source (1-indexed)
    pub start_line: usize,
}

impl MarkdownNode {
    /// All text content of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, output: &mut String) {
        match &self.node_type {
            MarkdownNodeType::Text(t) | MarkdownNodeType::Code(t) => output.push_str(t),
            MarkdownNodeType::SoftBreak => output.push(' '),
            MarkdownNodeType::LineBreak => output.push('\n'),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(output);
        }
    }

    /// Whether this node is a block (as opposed to inline content).
    pub fn is_block(&self) -> bool {
        matches!(
            self.node_type,
            MarkdownNodeType::Document
                | MarkdownNodeType::BlockQuote
                | MarkdownNodeType::List { .. }
                | MarkdownNodeType::Item
                | MarkdownNodeType::CodeBlock { .. }
                | MarkdownNodeType::HtmlBlock(_)
                | MarkdownNodeType::Paragraph
                | MarkdownNodeType::Heading { .. }
                | MarkdownNodeType::ThematicBreak
                | MarkdownNodeType::Table { .. }
                | MarkdownNodeType::TableRow { .. }
                | MarkdownNodeType::TableCell
                | MarkdownNodeType::FootnoteDefinition(_)
        )
    }
}

/// A parsed markdown document.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownDocument {
    pub root: MarkdownNode,
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Parse markdown with the default extensions.
pub fn parse_markdown(markdown: &str) -> MarkdownDocument {
    parse_markdown_with_options(markdown, &MarkdownOptions::default())
}

/// Parse markdown into an owned AST.
pub fn parse_markdown_with_options(markdown: &str, options: &MarkdownOptions) -> MarkdownDocument {
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &options.to_comrak_options());
    MarkdownDocument {
        root: convert_node(root),
    }
}

/// Render markdown to an HTML fragment.
pub fn render_to_html(markdown: &str, options: &MarkdownOptions) -> String {
    markdown_to_html(markdown, &options.to_comrak_options())
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal Conversion Functions
// ─────────────────────────────────────────────────────────────────────────────

fn convert_node<'a>(node: &'a AstNode<'a>) -> MarkdownNode {
    let ast = node.data.borrow();
    MarkdownNode {
        node_type: convert_node_value(&ast.value),
        children: node.children().map(convert_node).collect(),
        start_line: ast.sourcepos.start.line,
    }
}

fn convert_node_value(value: &NodeValue) -> MarkdownNodeType {
    match value {
        NodeValue::Document => MarkdownNodeType::Document,
        NodeValue::BlockQuote => MarkdownNodeType::BlockQuote,
        NodeValue::List(list) => {
            let list_type = match list.list_type {
                ComrakListType::Bullet => ListType::Bullet,
                ComrakListType::Ordered => ListType::Ordered {
                    start: list.start,
                    delimiter: if list.delimiter == ListDelimType::Period {
                        '.'
                    } else {
                        ')'
                    },
                },
            };
            MarkdownNodeType::List {
                list_type,
                tight: list.tight,
            }
        }
        NodeValue::Item(_) => MarkdownNodeType::Item,
        NodeValue::CodeBlock(code) => MarkdownNodeType::CodeBlock {
            language: code.info.split_whitespace().next().unwrap_or("").to_string(),
            literal: code.literal.clone(),
        },
        NodeValue::HtmlBlock(html) => MarkdownNodeType::HtmlBlock(html.literal.clone()),
        NodeValue::Paragraph => MarkdownNodeType::Paragraph,
        NodeValue::Heading(heading) => MarkdownNodeType::Heading {
            level: heading.level.clamp(1, 6),
        },
        NodeValue::ThematicBreak => MarkdownNodeType::ThematicBreak,
        NodeValue::Table(table) => MarkdownNodeType::Table {
            alignments: table.alignments.iter().map(|a| TableAlignment::from(*a)).collect(),
        },
        NodeValue::TableRow(header) => MarkdownNodeType::TableRow { header: *header },
        NodeValue::TableCell => MarkdownNodeType::TableCell,
        NodeValue::Text(text) => MarkdownNodeType::Text(text.clone()),
        NodeValue::TaskItem(checked) => MarkdownNodeType::TaskItem {
            checked: checked.map(|c| c == 'x' || c == 'X').unwrap_or(false),
        },
        NodeValue::SoftBreak => MarkdownNodeType::SoftBreak,
        NodeValue::LineBreak => MarkdownNodeType::LineBreak,
        NodeValue::Code(code) => MarkdownNodeType::Code(code.literal.clone()),
        NodeValue::HtmlInline(html) => MarkdownNodeType::HtmlInline(html.clone()),
        NodeValue::Emph => MarkdownNodeType::Emphasis,
        NodeValue::Strong => MarkdownNodeType::Strong,
        NodeValue::Strikethrough => MarkdownNodeType::Strikethrough,
        NodeValue::Link(link) => MarkdownNodeType::Link {
            url: link.url.clone(),
        },
        NodeValue::Image(image) => MarkdownNodeType::Image {
            url: image.url.clone(),
            title: image.title.clone(),
        },
        NodeValue::FootnoteReference(reference) => {
            MarkdownNodeType::FootnoteReference(reference.name.clone())
        }
        NodeValue::FootnoteDefinition(def) => MarkdownNodeType::FootnoteDefinition(def.name.clone()),
        _ => MarkdownNodeType::Skipped,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
