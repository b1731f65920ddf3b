//! Inline Markdown: emphasis, code spans, links, images and line breaks.

use std::collections::HashMap;
use std::iter;

use once_cell::sync::Lazy;
use regex::Regex;
use tidymark_core::{inlines_plain_text, Inline};

use super::block::{normalize_label, LinkTarget, References};

/// Spans nested deeper than this are left as literal text
const MAX_INLINE_DEPTH: usize = 32;

static AUTOLINK_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]{1,31}:[^\s<>]*$").expect("AUTOLINK_URI should compile")
});

static AUTOLINK_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("AUTOLINK_EMAIL should compile")
});

pub(crate) fn parse_inlines(text: &str, references: &References) -> Vec<Inline> {
    let chars: Vec<char> = text.chars().collect();
    let mut parser = InlineParser {
        chars: &chars,
        references,
        no_closer: HashMap::new(),
        brackets: HashMap::new(),
    };
    parser.parse_range(0, chars.len(), 0)
}

struct InlineParser<'a> {
    chars: &'a [char],
    references: &'a References,
    /// Smallest start position known to have no closer for
    /// (delimiter, run length, range end)
    no_closer: HashMap<(char, usize, usize), usize>,
    /// Matching `]` for every `[` of a parsed range, keyed by the range
    brackets: HashMap<(usize, usize), HashMap<usize, usize>>,
}

impl InlineParser<'_> {
    fn parse_range(&mut self, start: usize, end: usize, depth: usize) -> Vec<Inline> {
        let mut out = Vec::new();
        let mut text = String::new();
        let mut i = start;
        let nest = depth < MAX_INLINE_DEPTH;

        while i < end {
            let c = self.chars[i];
            match c {
                '\\' => {
                    let next = (i + 1 < end).then(|| self.chars[i + 1]);
                    match next {
                        Some('\n') => {
                            flush_text(&mut text, &mut out);
                            out.push(Inline::LineBreak);
                            i = self.skip_spaces(i + 2, end);
                        }
                        Some(next) if next.is_ascii_punctuation() => {
                            text.push(next);
                            i += 2;
                        }
                        _ => {
                            text.push('\\');
                            i += 1;
                        }
                    }
                }

                '\n' => {
                    let kept = text.trim_end_matches(' ').len();
                    let hard = text.len() - kept >= 2;
                    text.truncate(kept);
                    if hard {
                        flush_text(&mut text, &mut out);
                        out.push(Inline::LineBreak);
                    } else {
                        text.push('\n');
                    }
                    i = self.skip_spaces(i + 1, end);
                }

                '`' => {
                    let run = self.run_length(i, end, '`');
                    match self.code_span(i, run, end) {
                        Some((code, next)) => {
                            flush_text(&mut text, &mut out);
                            out.push(Inline::Code(code));
                            i = next;
                        }
                        None => {
                            text.extend(iter::repeat('`').take(run));
                            i += run;
                        }
                    }
                }

                '!' if nest && i + 1 < end && self.chars[i + 1] == '[' => {
                    match self.link(i + 1, (start, end), depth, true) {
                        Some((image, next)) => {
                            flush_text(&mut text, &mut out);
                            out.push(image);
                            i = next;
                        }
                        None => {
                            text.push('!');
                            i += 1;
                        }
                    }
                }

                '[' if nest => match self.link(i, (start, end), depth, false) {
                    Some((link, next)) => {
                        flush_text(&mut text, &mut out);
                        out.push(link);
                        i = next;
                    }
                    None => {
                        text.push('[');
                        i += 1;
                    }
                },

                '<' => match self.autolink(i, end) {
                    Some((link, next)) => {
                        flush_text(&mut text, &mut out);
                        out.push(link);
                        i = next;
                    }
                    None => {
                        text.push('<');
                        i += 1;
                    }
                },

                '*' | '_' if nest => {
                    let run = self.run_length(i, end, c);
                    match self.emphasis(i, run, end, depth) {
                        Some((literal, span, next)) => {
                            text.extend(iter::repeat(c).take(literal));
                            flush_text(&mut text, &mut out);
                            out.push(span);
                            i = next;
                        }
                        None => {
                            text.extend(iter::repeat(c).take(run));
                            i += run;
                        }
                    }
                }

                _ => {
                    text.push(c);
                    i += 1;
                }
            }
        }

        flush_text(&mut text, &mut out);
        out
    }

    /// Try to open emphasis on the delimiter run at `i`. Returns how many
    /// delimiters stay literal, the span, and where parsing resumes.
    fn emphasis(
        &mut self,
        i: usize,
        run: usize,
        end: usize,
        depth: usize,
    ) -> Option<(usize, Inline, usize)> {
        let c = self.chars[i];
        if !self.left_flanking(i, run, end, c) {
            return None;
        }

        if run >= 2 {
            if let Some(close) = self.find_closer(i + 2, end, c, 2) {
                let inner = self.parse_range(i + 2, close, depth + 1);
                return Some((0, Inline::Strong(inner), close + 2));
            }
        }

        let open = i + run - 1;
        let close = self.find_closer(open + 1, end, c, 1)?;
        let inner = self.parse_range(open + 1, close, depth + 1);
        Some((run - 1, Inline::Emphasis(inner), close + 1))
    }

    fn left_flanking(&self, i: usize, run: usize, end: usize, c: char) -> bool {
        if i + run >= end || self.chars[i + run].is_whitespace() {
            return false;
        }
        // Underscores never open inside a word
        !(c == '_' && i > 0 && self.chars[i - 1].is_alphanumeric())
    }

    /// Position of the `n` delimiters closing a span opened before `from`
    fn find_closer(&mut self, from: usize, end: usize, c: char, n: usize) -> Option<usize> {
        let key = (c, n, end);
        if self.no_closer.get(&key).is_some_and(|&failed| from >= failed) {
            return None;
        }

        let mut k = from;
        while k < end {
            let ch = self.chars[k];
            if ch == '\\' {
                k += 2;
                continue;
            }
            if ch == '`' {
                let run = self.run_length(k, end, '`');
                k = self.code_span_close(k, run, end).map_or(k + run, |close| close + run);
                continue;
            }
            if ch != c {
                k += 1;
                continue;
            }

            let run = self.run_length(k, end, c);
            let intraword = c == '_'
                && self
                    .chars
                    .get(k + run)
                    .is_some_and(|next| next.is_alphanumeric());
            let right_flanking = k > from && !self.chars[k - 1].is_whitespace() && !intraword;
            if right_flanking {
                if n == 2 && run >= 2 {
                    return Some(k + run - 2);
                }
                // A run of exactly two belongs to a nested strong span
                if n == 1 && run != 2 {
                    return Some(k + run - 1);
                }
            }
            k += run;
        }

        let failed = self.no_closer.entry(key).or_insert(from);
        *failed = (*failed).min(from);
        None
    }

    fn code_span(&mut self, i: usize, run: usize, end: usize) -> Option<(String, usize)> {
        let close = self.code_span_close(i, run, end)?;
        let content: String = self.chars[i + run..close]
            .iter()
            .map(|&c| if c == '\n' { ' ' } else { c })
            .collect();

        let strip = content.len() >= 2
            && content.starts_with(' ')
            && content.ends_with(' ')
            && !content.trim().is_empty();
        let content = if strip {
            content[1..content.len() - 1].to_string()
        } else {
            content
        };
        Some((content, close + run))
    }

    /// Start of the backtick run of exactly `run` that closes the span at `i`
    fn code_span_close(&mut self, i: usize, run: usize, end: usize) -> Option<usize> {
        let key = ('`', run, end);
        if self.no_closer.get(&key).is_some_and(|&failed| i >= failed) {
            return None;
        }

        let mut k = i + run;
        while k < end {
            if self.chars[k] == '`' {
                let closing = self.run_length(k, end, '`');
                if closing == run {
                    return Some(k);
                }
                k += closing;
            } else {
                k += 1;
            }
        }

        let failed = self.no_closer.entry(key).or_insert(i);
        *failed = (*failed).min(i);
        None
    }

    /// Parse a link or image whose label opens at `i`
    fn link(
        &mut self,
        i: usize,
        range: (usize, usize),
        depth: usize,
        image: bool,
    ) -> Option<(Inline, usize)> {
        let end = range.1;
        let close = self.bracket_close(i, range)?;
        let after = close + 1;

        if after < end && self.chars[after] == '(' {
            if let Some((url, title, next)) = self.inline_destination(after + 1, end) {
                let target = LinkTarget { url, title };
                return Some((self.make_link(i + 1, close, target, depth, image), next));
            }
        }

        if after < end && self.chars[after] == '[' {
            let reference_close = self.bracket_close(after, range)?;
            let mut label: String = self.chars[after + 1..reference_close].iter().collect();
            if label.trim().is_empty() {
                label = self.chars[i + 1..close].iter().collect();
            }
            let target = self.references.get(&normalize_label(&label))?.clone();
            return Some((
                self.make_link(i + 1, close, target, depth, image),
                reference_close + 1,
            ));
        }

        let label: String = self.chars[i + 1..close].iter().collect();
        let target = self.references.get(&normalize_label(&label))?.clone();
        Some((self.make_link(i + 1, close, target, depth, image), after))
    }

    fn make_link(
        &mut self,
        start: usize,
        end: usize,
        target: LinkTarget,
        depth: usize,
        image: bool,
    ) -> Inline {
        let content = self.parse_range(start, end, depth + 1);
        let title = target.title.filter(|t| !t.is_empty());
        if image {
            Inline::Image {
                alt: inlines_plain_text(&content),
                url: target.url,
                title,
            }
        } else {
            Inline::Link {
                content,
                url: target.url,
                title,
            }
        }
    }

    /// Matching `]` for the `[` at `i` within `range`
    fn bracket_close(&mut self, i: usize, range: (usize, usize)) -> Option<usize> {
        if !self.brackets.contains_key(&range) {
            let matches = self.match_brackets(range.0, range.1);
            self.brackets.insert(range, matches);
        }
        self.brackets.get(&range)?.get(&i).copied()
    }

    /// Pair brackets across a range in one pass, skipping escapes and code spans
    fn match_brackets(&mut self, start: usize, end: usize) -> HashMap<usize, usize> {
        let mut matches = HashMap::new();
        let mut open = Vec::new();
        let mut k = start;
        while k < end {
            match self.chars[k] {
                '\\' => {
                    k += 2;
                    continue;
                }
                '`' => {
                    let run = self.run_length(k, end, '`');
                    k = self.code_span_close(k, run, end).map_or(k + run, |close| close + run);
                    continue;
                }
                '[' => open.push(k),
                ']' => {
                    if let Some(opener) = open.pop() {
                        matches.insert(opener, k);
                    }
                }
                _ => {}
            }
            k += 1;
        }
        matches
    }

    /// `(destination "title")` body starting just after the `(`
    fn inline_destination(
        &self,
        start: usize,
        end: usize,
    ) -> Option<(String, Option<String>, usize)> {
        let mut k = self.skip_whitespace(start, end);
        let mut url = String::new();

        if k < end && self.chars[k] == '<' {
            k += 1;
            loop {
                let c = *self.chars.get(k).filter(|_| k < end)?;
                match c {
                    '>' => {
                        k += 1;
                        break;
                    }
                    '\n' | '<' => return None,
                    '\\' if self.escapable(k, end) => {
                        url.push(self.chars[k + 1]);
                        k += 2;
                    }
                    _ => {
                        url.push(c);
                        k += 1;
                    }
                }
            }
        } else {
            let mut parens = 0usize;
            while k < end {
                let c = self.chars[k];
                if c.is_whitespace() {
                    break;
                }
                match c {
                    '\\' if self.escapable(k, end) => {
                        url.push(self.chars[k + 1]);
                        k += 2;
                        continue;
                    }
                    '(' => parens += 1,
                    ')' if parens == 0 => break,
                    ')' => parens -= 1,
                    _ => {}
                }
                url.push(c);
                k += 1;
            }
        }

        let before_title = k;
        k = self.skip_whitespace(k, end);
        let mut title = None;
        let opens_title = k < end && k > before_title && matches!(self.chars[k], '"' | '\'' | '(');
        if opens_title {
            let closer = if self.chars[k] == '(' { ')' } else { self.chars[k] };
            let mut value = String::new();
            let mut m = k + 1;
            loop {
                let c = *self.chars.get(m).filter(|_| m < end)?;
                if c == '\\' && self.escapable(m, end) {
                    value.push(self.chars[m + 1]);
                    m += 2;
                    continue;
                }
                m += 1;
                if c == closer {
                    break;
                }
                value.push(c);
            }
            title = Some(value);
            k = self.skip_whitespace(m, end);
        }

        if k < end && self.chars[k] == ')' {
            Some((url, title, k + 1))
        } else {
            None
        }
    }

    fn autolink(&self, i: usize, end: usize) -> Option<(Inline, usize)> {
        let close = (i + 1..end).find(|&k| matches!(self.chars[k], '>' | '<') || self.chars[k].is_whitespace())?;
        if self.chars[close] != '>' {
            return None;
        }

        let inner: String = self.chars[i + 1..close].iter().collect();
        let url = if AUTOLINK_URI.is_match(&inner) {
            inner.clone()
        } else if AUTOLINK_EMAIL.is_match(&inner) {
            format!("mailto:{inner}")
        } else {
            return None;
        };

        let link = Inline::Link {
            content: vec![Inline::Text(inner)],
            url,
            title: None,
        };
        Some((link, close + 1))
    }

    fn escapable(&self, k: usize, end: usize) -> bool {
        k + 1 < end && self.chars[k + 1].is_ascii_punctuation()
    }

    fn run_length(&self, i: usize, end: usize, c: char) -> usize {
        self.chars[i..end].iter().take_while(|&&ch| ch == c).count()
    }

    fn skip_spaces(&self, mut i: usize, end: usize) -> usize {
        while i < end && matches!(self.chars[i], ' ' | '\t') {
            i += 1;
        }
        i
    }

    fn skip_whitespace(&self, mut i: usize, end: usize) -> usize {
        while i < end && self.chars[i].is_whitespace() {
            i += 1;
        }
        i
    }
}

fn flush_text(text: &mut String, out: &mut Vec<Inline>) {
    if !text.is_empty() {
        out.push(Inline::Text(std::mem::take(text)));
    }
}
