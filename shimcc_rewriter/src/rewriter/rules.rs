use crate::rewriter::scanner::ArgScanner;

use regex::{Captures, Regex};
use std::borrow::Cow;

/// A single text transformation of the rewrite pipeline
pub trait Rule: Send + Sync {
    /// Short stable identifier, printed by `--list-rules`
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Rewrites every match in `source`, borrowing the input if nothing matched
    fn apply<'a>(&self, source: &'a str) -> Cow<'a, str>;

    /// Symbols the rewritten text refers to which have to be declared by the prologue
    fn references(&self) -> &'static [&'static str] {
        &[]
    }
}

/// What a [PatternRule] puts in place of a match
pub enum Replacement {
    /// Regex replacement string, `$1` etc. refer to capture groups
    Template(&'static str),
    /// Replaces the whole match by the value paired with the matched text
    Lookup(&'static [(&'static str, &'static str)]),
}

/// Rule that is a plain regex substitution
pub struct PatternRule {
    name: &'static str,
    description: &'static str,
    pattern: Regex,
    replacement: Replacement,
    references: &'static [&'static str],
}

impl PatternRule {
    fn new(
        name: &'static str,
        description: &'static str,
        pattern: &str,
        replacement: Replacement,
    ) -> Self {
        PatternRule {
            name,
            description,
            pattern: Regex::new(pattern).expect("rewrite patterns are valid regexes"),
            replacement,
            references: &[],
        }
    }
    fn referencing(mut self, references: &'static [&'static str]) -> Self {
        self.references = references;
        self
    }
}

impl Rule for PatternRule {
    fn name(&self) -> &'static str {
        self.name
    }
    fn description(&self) -> &'static str {
        self.description
    }
    fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
        match &self.replacement {
            Replacement::Template(template) => self.pattern.replace_all(source, *template),
            Replacement::Lookup(table) => self.pattern.replace_all(source, |caps: &Captures| {
                let matched = &caps[0];

                table
                    .iter()
                    .find(|(from, _)| *from == matched)
                    .map_or(matched, |(_, to)| *to)
                    .to_string()
            }),
        }
    }
    fn references(&self) -> &'static [&'static str] {
        self.references
    }
}

/// Rule replacing a macro-style call `NAME(arg1, ..., argN)` by a template.
///
/// The arguments are located by [ArgScanner] so commas nested in parentheses or literals don't
/// split them. Arguments are rewritten by the same rule before they are substituted, which
/// makes nested calls like `MIN(MIN(a, b), c)` expand completely.
pub struct CallRule {
    name: &'static str,
    description: &'static str,
    callee: Regex,
    arity: usize,
    template: &'static str,
    references: &'static [&'static str],
}

impl CallRule {
    fn new(
        name: &'static str,
        description: &'static str,
        callee: &str,
        arity: usize,
        template: &'static str,
    ) -> Self {
        CallRule {
            name,
            description,
            callee: Regex::new(&format!(r"\b{}\(", regex::escape(callee)))
                .expect("callee names are valid regexes"),
            arity,
            template,
            references: &[],
        }
    }
    fn referencing(mut self, references: &'static [&'static str]) -> Self {
        self.references = references;
        self
    }

    // substitutes `$N` by the N-th argument
    fn expand(&self, args: &[Cow<str>]) -> String {
        let mut result = String::with_capacity(self.template.len());
        let mut chars = self.template.char_indices().peekable();

        while let Some((_, c)) = chars.next() {
            let index = match chars.peek() {
                Some((_, d)) if c == '$' && d.is_ascii_digit() => d.to_digit(10),
                _ => None,
            };
            match index.and_then(|i| args.get((i as usize).wrapping_sub(1))) {
                Some(arg) => {
                    chars.next();
                    result.push_str(arg);
                }
                None => result.push(c),
            }
        }
        result
    }
}

impl Rule for CallRule {
    fn name(&self) -> &'static str {
        self.name
    }
    fn description(&self) -> &'static str {
        self.description
    }
    fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
        let mut result = String::new();
        let mut copied_until = 0;
        let mut search_from = 0;

        while let Some(m) = self.callee.find_at(source, search_from) {
            let open = m.end() - 1;

            let Some(call) = ArgScanner::new(source, open).scan(self.arity) else {
                log::warn!(
                    "{}: cannot split arguments of call at byte {}, leaving it unchanged",
                    self.name,
                    m.start()
                );
                search_from = m.end();
                continue;
            };

            let args = call
                .args
                .iter()
                .map(|arg| self.apply(arg))
                .collect::<Vec<_>>();

            result.push_str(&source[copied_until..m.start()]);
            result.push_str(&self.expand(&args));
            copied_until = call.end;
            search_from = call.end;
        }

        if copied_until == 0 {
            Cow::Borrowed(source)
        } else {
            result.push_str(&source[copied_until..]);
            Cow::Owned(result)
        }
    }
    fn references(&self) -> &'static [&'static str] {
        self.references
    }
}

/// The rules in the order they have to run.
///
/// Continuations have to be joined before the line-based rules run, and `NULL` has to be gone
/// before `va_arg` emits its own null pointer.
pub fn standard_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(PatternRule::new(
            "line-continuation",
            "join lines ending in a backslash",
            r"\\\n",
            Replacement::Template(""),
        )),
        Box::new(PatternRule::new(
            "hash-comment",
            "remove lines starting with '#'",
            r"(?m)^[^\S\n]*#.*",
            Replacement::Template(""),
        )),
        Box::new(PatternRule::new(
            "string-concat",
            "merge string literals separated by a line break",
            r#""\n\s*""#,
            Replacement::Template(""),
        )),
        Box::new(
            PatternRule::new(
                "errno",
                "replace errno by a call to its accessor",
                r"\berrno\b",
                Replacement::Template("*__errno_location()"),
            )
            .referencing(&["__errno_location"]),
        ),
        Box::new(PatternRule::new(
            "bool-null",
            "replace true, false and NULL by integer literals",
            r"\b(?:true|false|NULL)\b",
            Replacement::Lookup(&[("true", "1"), ("false", "0"), ("NULL", "0")]),
        )),
        Box::new(
            CallRule::new(
                "va-start",
                "lower va_start to the builtin",
                "va_start",
                2,
                "__builtin_va_start(&($1), ($2))",
            )
            .referencing(&["__builtin_va_start", "va_list"]),
        ),
        Box::new(
            CallRule::new(
                "va-arg",
                "lower va_arg to the builtin",
                "va_arg",
                2,
                "(*(($2 *)__builtin_va_arg(&($1), ($2 *)0)))",
            )
            .referencing(&["__builtin_va_arg", "va_list"]),
        ),
        Box::new(PatternRule::new(
            "unreachable",
            "report unreachable() through error()",
            r"\bunreachable\(\)",
            Replacement::Template(r#"error("unreachable")"#),
        )),
        Box::new(CallRule::new(
            "min",
            "expand MIN(a, b) to a conditional",
            "MIN",
            2,
            "(($1)<($2)?($1):($2))",
        )),
    ]
}
