use std::collections::HashSet;

use ammonia::Builder as AmmoniaBuilder;

/// Allow-list sanitiser for rendered documents. Everything the dispatcher and
/// block renderers emit survives; anything else is stripped.
pub(crate) fn build_document_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    let tags: HashSet<&'static str> = HashSet::from([
        "a",
        "aside",
        "blockquote",
        "br",
        "button",
        "code",
        "div",
        "em",
        "figcaption",
        "figure",
        "h1",
        "h2",
        "h3",
        "h4",
        "hr",
        "iframe",
        "li",
        "ol",
        "p",
        "pre",
        "s",
        "span",
        "strong",
        "u",
        "ul",
    ]);
    builder.tags(tags);

    let generic: HashSet<&'static str> =
        HashSet::from(["class", "id", "title", "lang", "dir", "role"]);
    builder.generic_attributes(generic);
    builder.add_generic_attribute_prefixes(&["data-", "aria-"]);

    builder.add_tag_attributes("a", &["target"]);
    builder.add_tag_attributes("ol", &["start"]);
    builder.add_tag_attributes("button", &["type", "disabled"]);
    builder.add_tag_attributes(
        "iframe",
        &[
            "src",
            "width",
            "height",
            "loading",
            "sandbox",
            "referrerpolicy",
            "allow",
            "allowfullscreen",
        ],
    );

    builder.add_url_schemes(["http", "https", "mailto", "tel"].iter().copied());
    builder
}
