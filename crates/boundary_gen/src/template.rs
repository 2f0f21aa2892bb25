//! Message templates: how a line is rendered from its sequence index.

use std::ops::Range;

/// Renders one line of the batch from its index.
///
/// The generator assumes every index it asks for renders to the same number
/// of bytes. Templates that can't keep that promise are caught at generation
/// time rather than silently producing a shorter or longer batch.
pub trait MessageTemplate {
    fn render(&self, index: usize) -> String;
}

impl<F> MessageTemplate for F
where
    F: Fn(usize) -> String,
{
    fn render(&self, index: usize) -> String {
        self(index)
    }
}

/// `prefix` + zero-padded index + `suffix`.
///
/// The rendered length is fixed only while the index fits in `width`
/// digits, i.e. for indices `0..=max_index()`. Past that the line grows by
/// a byte and generation fails with `InvalidInput::VariableLength`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedWidthTemplate {
    prefix: String,
    width: usize,
    suffix: String,
}

impl FixedWidthTemplate {
    /// A width of zero is bumped to one, since `{:00}` would not pad at all.
    pub fn new(prefix: impl Into<String>, width: usize, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            width: width.max(1),
            suffix: suffix.into(),
        }
    }

    /// The syslog-looking filler line used to cram the syslog-notify FIFO.
    pub fn syslog_filler() -> Self {
        Self::new(
            "Jan  1 00:00:00 test cram_buffer.py: This is a message to fill the buffer, number ",
            3,
            "\n",
        )
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Byte length of every line whose index fits the width.
    pub fn message_length(&self) -> usize {
        self.prefix.len() + self.width + self.suffix.len()
    }

    /// Largest index that still renders at `message_length()` bytes.
    pub fn max_index(&self) -> usize {
        u32::try_from(self.width)
            .ok()
            .and_then(|w| 10usize.checked_pow(w))
            .map_or(usize::MAX, |n| n - 1)
    }

    /// Pattern form accepted by `FromStr`, with escapes re-applied.
    pub fn to_pattern(&self) -> String {
        format!(
            "{}{{{}}}{}",
            escape(&self.prefix),
            self.width,
            escape(&self.suffix)
        )
    }
}

impl Default for FixedWidthTemplate {
    fn default() -> Self {
        Self::syslog_filler()
    }
}

impl MessageTemplate for FixedWidthTemplate {
    fn render(&self, index: usize) -> String {
        let mut line = String::with_capacity(self.message_length());
        line.push_str(&self.prefix);
        line.push_str(&format!("{:0width$}", index, width = self.width));
        line.push_str(&self.suffix);
        line
    }
}

impl std::str::FromStr for FixedWidthTemplate {
    type Err = String;

    /// Parses `"prefix {N} suffix"` where `N` is the digit width.
    /// `\n`, `\t` and `\\` escapes are expanded so patterns survive a shell,
    /// and `\{` / `\}` stand for literal braces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut width = None;
        let mut chars = s.chars();

        while let Some(c) = chars.next() {
            let out = if width.is_none() {
                &mut prefix
            } else {
                &mut suffix
            };
            match c {
                '\\' => match chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c @ ('\\' | '{' | '}')) => out.push(c),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => out.push('\\'),
                },
                '{' => {
                    if width.is_some() {
                        return Err(format!("Template has more than one placeholder: {}", s));
                    }
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(d) => digits.push(d),
                            None => {
                                return Err(format!("Unterminated placeholder in template: {}", s))
                            }
                        }
                    }
                    let w: usize = digits
                        .parse()
                        .map_err(|_| format!("Invalid placeholder width '{}' in template", digits))?;
                    if w == 0 {
                        return Err("Placeholder width must be at least 1".to_string());
                    }
                    width = Some(w);
                }
                _ => out.push(c),
            }
        }

        let width = width.ok_or_else(|| format!("Template has no {{N}} placeholder: {}", s))?;
        Ok(Self::new(prefix, width, suffix))
    }
}

impl std::fmt::Display for FixedWidthTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pattern())
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('{', "\\{")
        .replace('}', "\\}")
}

/// Lazily renders `range` through `template`. Clone it to replay the
/// remaining lines.
pub struct Messages<'a, T: ?Sized> {
    template: &'a T,
    range: Range<usize>,
}

impl<T: ?Sized> Clone for Messages<'_, T> {
    fn clone(&self) -> Self {
        Self {
            template: self.template,
            range: self.range.clone(),
        }
    }
}

pub fn messages<T: MessageTemplate + ?Sized>(template: &T, range: Range<usize>) -> Messages<'_, T> {
    Messages { template, range }
}

impl<T: MessageTemplate + ?Sized> Iterator for Messages<'_, T> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.range.next().map(|i| self.template.render(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl<T: MessageTemplate + ?Sized> ExactSizeIterator for Messages<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syslog_filler_render() {
        let t = FixedWidthTemplate::syslog_filler();
        assert_eq!(
            t.render(7),
            "Jan  1 00:00:00 test cram_buffer.py: This is a message to fill the buffer, number 007\n"
        );
        assert_eq!(t.render(7).len(), t.message_length());
        assert_eq!(t.message_length(), 86);
    }

    #[test]
    fn test_max_index() {
        assert_eq!(FixedWidthTemplate::new("", 1, "").max_index(), 9);
        assert_eq!(FixedWidthTemplate::new("", 3, "").max_index(), 999);
        assert_eq!(FixedWidthTemplate::new("", 40, "").max_index(), usize::MAX);
    }

    #[test]
    fn test_zero_width_bumped() {
        let t = FixedWidthTemplate::new("x", 0, "\n");
        assert_eq!(t.width(), 1);
        assert_eq!(t.render(0), "x0\n");
    }

    #[test]
    fn test_parse_pattern() {
        let t: FixedWidthTemplate = "line {4}\\n".parse().unwrap();
        assert_eq!(t.prefix(), "line ");
        assert_eq!(t.width(), 4);
        assert_eq!(t.suffix(), "\n");
        assert_eq!(t.render(12), "line 0012\n");
    }

    #[test]
    fn test_parse_rejects_bad_patterns() {
        assert!("no placeholder".parse::<FixedWidthTemplate>().is_err());
        assert!("open {3".parse::<FixedWidthTemplate>().is_err());
        assert!("width {x}".parse::<FixedWidthTemplate>().is_err());
        assert!("zero {0}".parse::<FixedWidthTemplate>().is_err());
        assert!("{2} and {2}".parse::<FixedWidthTemplate>().is_err());
    }

    #[test]
    fn test_pattern_roundtrip_keeps_escapes() {
        let t = FixedWidthTemplate::syslog_filler();
        let parsed: FixedWidthTemplate = t.to_pattern().parse().unwrap();
        assert_eq!(parsed, t);
    }

    #[test]
    fn test_pattern_roundtrip_with_literal_braces() {
        let t = FixedWidthTemplate::new("{\"seq\": ", 5, "}\n");
        assert_eq!(t.to_pattern(), "\\{\"seq\": {5}\\}\\n");
        let parsed: FixedWidthTemplate = t.to_string().parse().unwrap();
        assert_eq!(parsed, t);
        assert_eq!(parsed.render(42), "{\"seq\": 00042}\n");
    }

    #[test]
    fn test_closure_template() {
        let t = |i: usize| format!("{:02}|", i);
        assert_eq!(t.render(3), "03|");
    }

    #[test]
    fn test_messages_lazy_and_restartable() {
        let t = FixedWidthTemplate::new("m", 2, ";");
        let lines: Vec<String> = messages(&t, 0..3).collect();
        assert_eq!(lines, vec!["m00;", "m01;", "m02;"]);

        let again: Vec<String> = messages(&t, 0..3).collect();
        assert_eq!(lines, again);
        assert_eq!(messages(&t, 5..9).len(), 4);
    }
}
