//! Paragraph reflow.

/// Greedily fill every line of `text` to at most `width` columns.
///
/// Each input line is filled on its own, so the extract's paragraph breaks
/// and blank lines survive. Runs of whitespace collapse to one space. A word
/// wider than `width` gets a line to itself. A `width` of 0 disables wrapping.
pub fn fill(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| fill_line(line, width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn fill_line(line: &str, width: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;

    for word in line.split_whitespace() {
        let len = word.chars().count();
        if column == 0 {
            out.push_str(word);
            column = len;
        } else if width == 0 || column + 1 + len <= width {
            out.push(' ');
            out.push_str(word);
            column += 1 + len;
        } else {
            out.push('\n');
            out.push_str(word);
            column = len;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_the_fill_column() {
        let filled = fill("aaa bbb ccc ddd", 7);
        assert_eq!(filled, "aaa bbb\nccc ddd");
    }

    #[test]
    fn no_line_exceeds_width_unless_a_single_word_does() {
        let text = "Emacs is an extensible, customizable, free/libre text editor \
                    and more. At its core is an interpreter for Emacs Lisp.";
        for line in fill(text, 20).lines() {
            assert!(line.chars().count() <= 20, "line too long: {line:?}");
        }

        assert_eq!(fill("a supercalifragilistic b", 5), "a\nsupercalifragilistic\nb");
    }

    #[test]
    fn keeps_paragraph_breaks() {
        let filled = fill("first para\n\nsecond para", 80);
        assert_eq!(filled, "first para\n\nsecond para");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(fill("  lots   of\tspace  ", 80), "lots of space");
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(fill("Zürich Genève", 13), "Zürich Genève");
    }

    #[test]
    fn zero_width_disables_wrapping() {
        assert_eq!(fill("one two three", 0), "one two three");
    }
}
