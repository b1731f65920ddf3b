use tidymark::{
    clean_url, convert, emit_markdown, extract_text, parse_html, rewrite_markdown_links,
    ConversionDirection, Preset, StyleConfig, TidyService,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn reformat(markdown: &str, style: &StyleConfig) -> String {
    convert(markdown, ConversionDirection::MarkdownToMarkdown, false, style)
        .unwrap()
        .output
}

#[test]
fn cleaning_removes_tracking_parameters() {
    init_logging();
    assert_eq!(
        clean_url("https://x.com/a?utm_source=g&id=1"),
        "https://x.com/a?id=1"
    );
    assert_eq!(clean_url("https://x.com/a?id=1"), "https://x.com/a?id=1");
    assert_eq!(clean_url("/rel?fbclid=abc"), "/rel");
}

#[test]
fn cleaning_is_idempotent() {
    let urls = [
        "https://x.com/a?utm_source=g&id=1",
        "https://x.com/?ref&x=1#frag",
        "//cdn.example/p?_hsenc=1&&b=2",
        "/rel?fbclid=abc&x=y&",
        "?gclid=1",
        "#only-fragment",
        "not a url at all ?? & ref=1",
        "https://example.com/search?q=a%20b&UTM_Medium=mail",
        "",
    ];
    for url in urls {
        let once = clean_url(url);
        assert_eq!(clean_url(&once), once, "cleaning {url:?} twice");
    }
}

#[test]
fn rewritten_links_are_counted_once() {
    let (markdown, count) = rewrite_markdown_links("[a](https://x.com?gclid=1) [b](https://x.com)");
    assert_eq!(count, 1);
    assert_eq!(markdown, "[a](https://x.com) [b](https://x.com)");
}

#[test]
fn reformatting_reaches_a_fixed_point() {
    init_logging();
    let documents = [
        "# Title\n\nSome *emphasis*, **strong** and `code`.\n\n* one\n* two\n    1. nested\n    2. list",
        "Setext\n======\n\n> quoted *text*\n> over lines\n\n```rust\nfn main() {}\n```",
        "| A | B |\n|:--|--:|\n| 1 | 2 |\n| 3 | 4 |\n\nA [link](https://x.com/a \"T\") and ![img](/i.png).",
        "1. first\n\n   second paragraph\n\n2. third\n\n---\n\nLine with trailing  \nbreak and 1 * 2 _ 3 # 4",
    ];

    for preset in [Preset::Default, Preset::Gfm, Preset::Discord] {
        let style = preset.style();
        for document in documents {
            let once = reformat(document, &style);
            let twice = reformat(&once, &style);
            assert_eq!(twice, once, "{preset} preset, input {document:?}");
        }
    }
}

#[test]
fn table_shape_is_preserved() {
    let html = "<table><thead><tr><th>Name</th><th>Qty</th></tr></thead>\
                <tbody><tr><td>Apple</td><td>3</td></tr><tr><td>Pear</td><td>5</td></tr></tbody></table>";
    let markdown = emit_markdown(&parse_html(html), &StyleConfig::default(), true).markdown;

    let rows: Vec<&str> = markdown.lines().filter(|line| line.starts_with('|')).collect();
    assert_eq!(rows.len(), 4, "{markdown}");
    for row in rows {
        assert_eq!(row.matches('|').count(), 3, "{row}");
        assert!(row.ends_with('|'));
    }
}

#[test]
fn headings_flatten_to_strong_text() {
    let style = StyleConfig {
        flatten_headings: true,
        ..StyleConfig::default()
    };
    let markdown = emit_markdown(&parse_html("<h2>Title</h2><p>body</p>"), &style, false).markdown;
    assert_eq!(markdown, "**Title**\n\nbody");
    assert!(markdown.lines().all(|line| !line.starts_with('#')));

    let slack = TidyService::with_preset(Preset::Slack)
        .html_to_markdown("<h1>News</h1>")
        .unwrap();
    assert_eq!(slack, "*News*");
}

#[test]
fn text_extraction_breaks_blocks() {
    assert_eq!(extract_text(&parse_html("<p>A</p><p>B</p>")), "A\nB");
}

#[test]
fn empty_input_is_a_no_op() {
    for preset in Preset::ALL {
        for direction in ConversionDirection::ALL {
            for input in ["", "   ", "\n\t\n"] {
                let result = convert(input, direction, true, &preset.style()).unwrap();
                assert_eq!(result.output, "");
                assert_eq!(result.links_cleaned, 0);
            }
        }
    }
}

#[test]
fn malformed_input_never_fails() {
    let inputs = [
        "<div><p>unclosed <b>bold <i>both</div>",
        "a < b > c &notanentity; <<>>",
        "**unmatched *delims _ ` [link](",
        "> > > - - - 1. ```",
        "| a |\n| - |\n| b | c | d |",
    ];
    for input in inputs {
        for direction in ConversionDirection::ALL {
            assert!(convert(input, direction, true, &StyleConfig::default()).is_ok());
        }
    }
}

#[test]
fn deep_nesting_is_handled() {
    let html = format!("{}deep{}", "<div>".repeat(2000), "</div>".repeat(2000));
    let result = convert(&html, ConversionDirection::HtmlToMarkdown, false, &StyleConfig::default()).unwrap();
    assert_eq!(result.output, "deep");

    let markdown = format!("{}quote", "> ".repeat(500));
    let html = convert(&markdown, ConversionDirection::MarkdownToHtml, false, &StyleConfig::default()).unwrap();
    assert!(html.output.contains("quote"));
}

#[test]
fn links_are_cleaned_in_every_markdown_direction() {
    let style = StyleConfig::default();
    let html = "<p><a href=\"https://x.com/p?utm_campaign=z&page=2\" title=\"Next\">next</a> \
                <img src=\"https://cdn.x.com/i.png?fbclid=9\" alt=\"pic\"></p>";
    let result = convert(html, ConversionDirection::HtmlToMarkdown, true, &style).unwrap();
    assert_eq!(
        result.output,
        "[next](https://x.com/p?page=2 \"Next\") ![pic](https://cdn.x.com/i.png)"
    );
    assert_eq!(result.links_cleaned, 2);

    let result = convert(
        "See [docs](https://x.com/d?ref=nav).",
        ConversionDirection::MarkdownToMarkdown,
        true,
        &style,
    )
    .unwrap();
    assert_eq!(result.output, "See [docs](https://x.com/d).");
    assert_eq!(result.links_cleaned, 1);
}
