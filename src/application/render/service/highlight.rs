use syntect::{
    html::{ClassStyle, ClassedHTMLGenerator},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

use crate::application::render::types::RenderError;

use super::html::{escape_attribute, escape_text};

/// Language token used when a snippet carries none.
pub(crate) const PLAIN_LANGUAGE: &str = "text";

/// Syntax set and class naming shared by every code block of a render.
pub(crate) struct Highlighter<'a> {
    pub(crate) syntax_set: &'a SyntaxSet,
    pub(crate) class_style: &'a ClassStyle,
}

impl Highlighter<'_> {
    /// Highlight `code` into a `<pre><code>` pair. Falls back to escaped plain
    /// text when the grammar fails on this input.
    pub(crate) fn highlight(&self, language: Option<&str>, code: &str, element_id: &str) -> String {
        match highlight_code(language, code, element_id, self.syntax_set, self.class_style) {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!(
                    target = "application::render::highlight",
                    error = %err,
                    "falling back to plain code block"
                );
                build_plain_code_block(language, code, element_id)
            }
        }
    }
}

pub(crate) fn highlight_code(
    language: Option<&str>,
    code: &str,
    element_id: &str,
    syntax_set: &SyntaxSet,
    class_style: &ClassStyle,
) -> Result<String, RenderError> {
    let lang_token = language_token(language);
    let syntax =
        find_syntax(syntax_set, &lang_token).unwrap_or_else(|| syntax_set.find_syntax_plain_text());

    let appended_newline = !code.ends_with('\n');
    let mut code_with_newline = code.to_string();
    if appended_newline {
        code_with_newline.push('\n');
    }

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set, *class_style);

    for line in LinesWithEndings::from(code_with_newline.as_str()) {
        generator
            .parse_html_for_line_which_includes_newline(line)
            .map_err(|err| RenderError::Highlighting {
                language: lang_token.clone(),
                message: err.to_string(),
            })?;
    }

    let mut highlighted = generator.finalize();
    // Only closing tags follow the last newline, so dropping it restores the
    // snippet text exactly.
    if appended_newline && let Some(index) = highlighted.rfind('\n') {
        highlighted.remove(index);
    }
    Ok(wrap_code(&lang_token, element_id, &highlighted))
}

pub(crate) fn build_plain_code_block(language: Option<&str>, code: &str, element_id: &str) -> String {
    let lang_token = language_token(language);
    wrap_code(&lang_token, element_id, &escape_text(code))
}

fn wrap_code(lang_token: &str, element_id: &str, body: &str) -> String {
    let lang = escape_attribute(lang_token);
    format!(
        "<pre class=\"syntax-highlight syntax-lang-{lang}\" data-language=\"{lang}\" id=\"{id}\"><code class=\"language-{lang} syntax-code\">{body}</code></pre>",
        id = escape_attribute(element_id),
    )
}

fn language_token(language: Option<&str>) -> String {
    language
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .unwrap_or(PLAIN_LANGUAGE)
        .to_ascii_lowercase()
        .replace(char::is_whitespace, "-")
}

fn find_syntax<'a>(syntax_set: &'a SyntaxSet, token: &str) -> Option<&'a SyntaxReference> {
    syntax_set
        .find_syntax_by_token(token)
        .or_else(|| syntax_set.find_syntax_by_name(token))
        .or_else(|| syntax_set.find_syntax_by_extension(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_block_escapes_markup() {
        let html = build_plain_code_block(Some("HTML"), "<b>&</b>", "code-block--0");
        assert_eq!(
            html,
            "<pre class=\"syntax-highlight syntax-lang-html\" data-language=\"html\" id=\"code-block--0\"><code class=\"language-html syntax-code\">&lt;b&gt;&amp;&lt;/b&gt;</code></pre>"
        );
    }

    #[test]
    fn missing_language_reads_as_text() {
        assert_eq!(language_token(None), "text");
        assert_eq!(language_token(Some("  ")), "text");
        assert_eq!(language_token(Some("Objective C")), "objective-c");
    }
}
