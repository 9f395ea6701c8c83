use regex::Regex;

/// Minimal fixed-grammar transform for the coaching text the service
/// returns: paired double asterisks mark bold, paired single asterisks mark
/// italic, newlines separate lines. Anything unpaired stays literal. Kept
/// free of rendering types so the text content is testable on its own.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Plain,
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

impl Span {
    fn new(text: &str, style: SpanStyle) -> Self {
        Self { text: text.to_string(), style }
    }
}

/// Splits the text into lines of styled spans, one inner vec per line.
/// Blank lines come through as empty vecs so vertical spacing survives.
pub fn parse_lines(text: &str) -> Vec<Vec<Span>> {
    let marker = Regex::new(r"\*\*([^*]+)\*\*|\*([^*]+)\*").unwrap();

    text.split('\n')
        .map(|line| {
            let mut spans = Vec::new();
            let mut cursor = 0;

            for caps in marker.captures_iter(line) {
                let m = caps.get(0).unwrap();
                if m.start() > cursor {
                    spans.push(Span::new(&line[cursor..m.start()], SpanStyle::Plain));
                }
                if let Some(bold) = caps.get(1) {
                    spans.push(Span::new(bold.as_str(), SpanStyle::Bold));
                } else if let Some(italic) = caps.get(2) {
                    spans.push(Span::new(italic.as_str(), SpanStyle::Italic));
                }
                cursor = m.end();
            }

            if cursor < line.len() {
                spans.push(Span::new(&line[cursor..], SpanStyle::Plain));
            }
            spans
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_span() {
        let lines = parse_lines("just text");
        assert_eq!(lines, vec![vec![Span::new("just text", SpanStyle::Plain)]]);
    }

    #[test]
    fn bold_and_italic_markers() {
        let lines = parse_lines("eat **less** rice, *more* greens");
        assert_eq!(
            lines[0],
            vec![
                Span::new("eat ", SpanStyle::Plain),
                Span::new("less", SpanStyle::Bold),
                Span::new(" rice, ", SpanStyle::Plain),
                Span::new("more", SpanStyle::Italic),
                Span::new(" greens", SpanStyle::Plain),
            ]
        );
    }

    #[test]
    fn newlines_split_lines_and_keep_blanks() {
        let lines = parse_lines("**Lunch**\n\nSalad");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], vec![Span::new("Lunch", SpanStyle::Bold)]);
        assert!(lines[1].is_empty());
        assert_eq!(lines[2], vec![Span::new("Salad", SpanStyle::Plain)]);
    }

    #[test]
    fn unterminated_markers_stay_literal() {
        let lines = parse_lines("a **dangling marker");
        assert_eq!(lines[0], vec![Span::new("a **dangling marker", SpanStyle::Plain)]);
    }

    #[test]
    fn bold_wins_over_italic_at_the_same_position() {
        let lines = parse_lines("**bold**");
        assert_eq!(lines[0], vec![Span::new("bold", SpanStyle::Bold)]);
    }
}
