use std::str::CharIndices;

/// Arguments of a macro-style call together with the byte offset just past its closing `)`
#[derive(Debug, PartialEq)]
pub struct CallSite<'a> {
    pub args: Vec<&'a str>,
    pub end: usize,
}

/// Splits the arguments of a call whose opening parenthesis is at `open` in `source`.
///
/// Only top-level commas separate arguments: commas inside nested parentheses, string literals
/// or character literals belong to the current argument. Once `arity - 1` commas were found the
/// rest of the call goes into the last argument.
pub struct ArgScanner<'a> {
    source: &'a str,
    // `chars` yields offsets relative to the byte after `open`
    open: usize,
    chars: CharIndices<'a>,
}

impl<'a> ArgScanner<'a> {
    pub fn new(source: &'a str, open: usize) -> Self {
        debug_assert_eq!(source[open..].chars().next(), Some('('));

        ArgScanner {
            source,
            open,
            chars: source[open + 1..].char_indices(),
        }
    }

    /// Returns `None` if the call is never closed or has fewer than `arity` arguments
    pub fn scan(mut self, arity: usize) -> Option<CallSite<'a>> {
        let mut args = Vec::with_capacity(arity);
        let mut depth = 0usize;
        let mut start = self.open + 1;

        while let Some((offset, c)) = self.chars.next() {
            let i = self.open + 1 + offset;
            match c {
                '(' => depth += 1,
                ')' if depth == 0 => {
                    args.push(&self.source[start..i]);

                    return (args.len() == arity).then_some(CallSite { args, end: i + 1 });
                }
                ')' => depth -= 1,
                ',' if depth == 0 && args.len() + 1 < arity => {
                    args.push(&self.source[start..i]);
                    start = i + 1;
                }
                '"' | '\'' => self.skip_literal(c),
                _ => (),
            }
        }
        None
    }

    // consumes up to and including the closing quote
    fn skip_literal(&mut self, quote: char) {
        while let Some((_, c)) = self.chars.next() {
            match c {
                '\\' => {
                    self.chars.next();
                }
                '\n' => break,
                _ if c == quote => break,
                _ => (),
            }
        }
    }
}
