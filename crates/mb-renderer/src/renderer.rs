//! Event-stream HTML renderer.
//!
//! Walks the pulldown-cmark event stream and writes semantic HTML5.
//! Headings get a slug `id` and a prepended self-link anchor; everything
//! else renders to the usual tags. Serialization failures propagate so the
//! pipeline can surface them instead of panicking mid-render.

use std::fmt::Write;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Tag, TagEnd};

use crate::heading::HeadingState;

/// HTML renderer over a markdown event stream.
pub(crate) struct HtmlRenderer {
    output: String,
    heading: HeadingState,
    /// Code block capture (language, buffered content).
    code: Option<(Option<String>, String)>,
    /// Image alt-text capture.
    image_alt: Option<String>,
    pending_image: Option<(String, String)>,
    /// Column alignments for the current table.
    table_alignments: Vec<Alignment>,
    table_in_head: bool,
    table_cell: usize,
}

impl HtmlRenderer {
    pub(crate) fn new() -> Self {
        Self {
            output: String::with_capacity(1024),
            heading: HeadingState::new(),
            code: None,
            image_alt: None,
            pending_image: None,
            table_alignments: Vec::new(),
            table_in_head: false,
            table_cell: 0,
        }
    }

    /// Render the event stream to an HTML string.
    pub(crate) fn render<'a, I>(mut self, events: I) -> Result<String, std::fmt::Error>
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.event(event)?;
        }
        Ok(self.output)
    }

    fn event(&mut self, event: Event<'_>) -> std::fmt::Result {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => {
                self.text(&text);
                Ok(())
            }
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => {
                self.output.push_str(&html);
                Ok(())
            }
            Event::SoftBreak => {
                self.soft_break();
                Ok(())
            }
            Event::HardBreak => {
                self.push_inline("<br>");
                Ok(())
            }
            Event::Rule => {
                self.output.push_str("<hr>");
                Ok(())
            }
            Event::TaskListMarker(checked) => {
                self.output.push_str(if checked {
                    r#"<input type="checkbox" checked disabled>"#
                } else {
                    r#"<input type="checkbox" disabled>"#
                });
                Ok(())
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
                Ok(())
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) -> std::fmt::Result {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the slug id is known
                self.heading.start(heading_level_to_num(level));
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(ref info) if !info.is_empty() => {
                        // Fence info may carry attributes after the language
                        info.split_whitespace().next().map(str::to_owned)
                    }
                    _ => None,
                };
                self.code = Some((lang, String::new()));
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#)?,
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table_alignments = alignments;
                self.table_in_head = false;
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table_in_head = true;
                self.table_cell = 0;
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table_cell = 0;
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.current_alignment_style();
                let tag = if self.table_in_head { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>")?;
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link { dest_url, .. } => {
                let link_tag = format!(r#"<a href="{}">"#, escape_html(&dest_url));
                self.push_inline(&link_tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Collect alt text; the tag is written in end_tag
                self.image_alt = Some(String::new());
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
        }
        Ok(())
    }

    fn end_tag(&mut self, tag: TagEnd) -> std::fmt::Result {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some((level, id, html)) = self.heading.complete() {
                    write!(
                        self.output,
                        r##"<h{level} id="{id}"><a class="anchor" aria-hidden="true" href="#{id}"></a>{}</h{level}>"##,
                        html.trim()
                    )?;
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                if let Some((lang, content)) = self.code.take() {
                    if let Some(lang) = lang {
                        write!(
                            self.output,
                            r#"<pre><code class="language-{}">{}</code></pre>"#,
                            escape_html(&lang),
                            escape_html(&content)
                        )?;
                    } else {
                        write!(
                            self.output,
                            "<pre><code>{}</code></pre>",
                            escape_html(&content)
                        )?;
                    }
                }
            }
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::Image => {
                let alt = self.image_alt.take().unwrap_or_default();
                if let Some((src, title)) = self.pending_image.take() {
                    let title_attr = if title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, escape_html(&title))
                    };
                    write!(
                        self.output,
                        r#"<img src="{}"{title_attr} alt="{}">"#,
                        escape_html(&src),
                        escape_html(&alt)
                    )?;
                }
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table_in_head = false;
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table_in_head {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table_cell += 1;
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if let Some((_, buffer)) = self.code.as_mut() {
            buffer.push_str(text);
        } else if let Some(alt) = self.image_alt.as_mut() {
            alt.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) -> std::fmt::Result {
        if self.heading.is_active() {
            self.heading.push_text(code);
            write!(
                self.heading.html_buffer(),
                "<code>{}</code>",
                escape_html(code)
            )
        } else {
            write!(self.output, "<code>{}</code>", escape_html(code))
        }
    }

    fn soft_break(&mut self) {
        if let Some((_, buffer)) = self.code.as_mut() {
            buffer.push('\n');
        } else if self.heading.is_active() {
            self.heading.push_text(" ");
            self.heading.push_html(" ");
        } else {
            self.output.push('\n');
        }
    }

    /// Push content to output or heading buffer based on context.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    /// Alignment style for the current table cell.
    fn current_alignment_style(&self) -> &'static str {
        match self.table_alignments.get(self.table_cell) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Convert a pulldown heading level to its numeric value.
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Escape HTML special characters.
pub(crate) fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
