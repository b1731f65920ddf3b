//! Tracking-parameter cleanup for links already written as Markdown.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::url_clean::clean_url;

/// `[text](destination rest)` where `rest` is an optional title
static INLINE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]*)\]\((<[^>\n]*>|[^)\s]+)([^)]*)\)").expect("INLINE_LINK should compile")
});

/// `[label]: destination` reference definitions
static REFERENCE_DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^( {0,3}\[[^\]]+\]:[ \t]*)(<[^>\n]*>|\S+)")
        .expect("REFERENCE_DEFINITION should compile")
});

/// Clean the destination of every Markdown link in `markdown`.
///
/// Returns the rewritten text and the number of destinations that changed.
/// Link text, titles and everything outside links are left untouched.
///
/// # Example
///
/// ```rust
/// use tidymark::rewrite_markdown_links;
///
/// let (md, count) = rewrite_markdown_links("[a](https://x.com?gclid=1) [b](https://x.com)");
/// assert_eq!(md, "[a](https://x.com) [b](https://x.com)");
/// assert_eq!(count, 1);
/// ```
pub fn rewrite_markdown_links(markdown: &str) -> (String, usize) {
    let mut cleaned = 0;

    let rewritten = INLINE_LINK.replace_all(markdown, |caps: &Captures| {
        let destination = clean_destination(&caps[2], &mut cleaned);
        format!("[{}]({}{})", &caps[1], destination, &caps[3])
    });

    let rewritten = REFERENCE_DEFINITION.replace_all(&rewritten, |caps: &Captures| {
        let destination = clean_destination(&caps[2], &mut cleaned);
        format!("{}{}", &caps[1], destination)
    });

    (rewritten.into_owned(), cleaned)
}

fn clean_destination(destination: &str, cleaned: &mut usize) -> String {
    let (url, bracketed) = match destination
        .strip_prefix('<')
        .and_then(|d| d.strip_suffix('>'))
    {
        Some(inner) => (inner, true),
        None => (destination, false),
    };

    let result = clean_url(url);
    if result == url {
        return destination.to_string();
    }

    *cleaned += 1;
    if bracketed {
        format!("<{}>", result)
    } else {
        result
    }
}
