//! Ordered text rewrites turning corpus C into input the downstream compiler accepts

pub mod rules;
pub mod scanner;

use rules::{standard_rules, Rule};

use std::borrow::Cow;
use std::sync::LazyLock;

static STANDARD: LazyLock<Pipeline> = LazyLock::new(Pipeline::default);

/// An ordered list of [Rule]s where the output of one rule is the input of the next
pub struct Pipeline {
    rules: Vec<Box<dyn Rule>>,
}

impl Pipeline {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Pipeline { rules }
    }

    /// The shared pipeline made of [standard_rules]
    pub fn standard() -> &'static Pipeline {
        &STANDARD
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Runs every rule over the whole `source` in order
    pub fn rewrite(&self, source: &str) -> String {
        let mut text = Cow::Borrowed(source);

        for rule in &self.rules {
            let rewritten = match rule.apply(&text) {
                Cow::Owned(rewritten) => rewritten,
                Cow::Borrowed(_) => continue,
            };
            log::trace!("rule '{}' rewrote {} bytes", rule.name(), text.len());
            text = Cow::Owned(rewritten);
        }
        text.into_owned()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::new(standard_rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prologue::Prologue;

    const CORPUS: &str = r#"#include "chibicc.h"

#define MAX_LEN 16 \
  + 1

static int depth;

static void verror_at(char *loc, char *fmt, va_list ap) {
  fprintf(stderr, "%s: "
          "error: ", loc);
  vfprintf(stderr, fmt, ap);
}

void error_at(char *loc, char *fmt, ...) {
  va_list ap;
  va_start(ap, fmt);
  verror_at(loc, fmt, ap);
}

int next_arg(va_list ap) {
  return va_arg(ap, int) + MIN(depth, MAX_LEN);
}

bool consume(Token **rest, Token *tok) {
  if (tok == NULL) {
    *rest = NULL;
    return false;
  }
  if (errno)
    fprintf(stderr, "%s\n", strerror(errno));
  switch (tok->kind) {
  case TK_EOF:
    return true;
  }
  unreachable();
}
"#;

    const EXPECTED: &str = r#"



static int depth;

static void verror_at(char *loc, char *fmt, va_list ap) {
  fprintf(stderr, "%s: error: ", loc);
  vfprintf(stderr, fmt, ap);
}

void error_at(char *loc, char *fmt, ...) {
  va_list ap;
  __builtin_va_start(&(ap), ( fmt));
  verror_at(loc, fmt, ap);
}

int next_arg(va_list ap) {
  return (*(( int *)__builtin_va_arg(&(ap), ( int *)0))) + ((depth)<( MAX_LEN)?(depth):( MAX_LEN));
}

bool consume(Token **rest, Token *tok) {
  if (tok == 0) {
    *rest = 0;
    return 0;
  }
  if (*__errno_location())
    fprintf(stderr, "%s\n", strerror(*__errno_location()));
  switch (tok->kind) {
  case TK_EOF:
    return 1;
  }
  error("unreachable");
}
"#;

    #[test]
    fn rule_order() {
        let names = Pipeline::standard()
            .rules()
            .map(|rule| rule.name())
            .collect::<Vec<_>>();

        assert_eq!(
            names,
            vec![
                "line-continuation",
                "hash-comment",
                "string-concat",
                "errno",
                "bool-null",
                "va-start",
                "va-arg",
                "unreachable",
                "min",
            ]
        );
    }

    #[test]
    fn rewrites_corpus() {
        assert_eq!(Pipeline::standard().rewrite(CORPUS), EXPECTED);
    }

    #[test]
    fn idempotent() {
        let once = Pipeline::standard().rewrite(CORPUS);

        assert_eq!(Pipeline::standard().rewrite(&once), once);
    }

    #[test]
    fn no_rule_retriggers_on_rewritten_text() {
        // holds for every order of the rules if none of them changes already rewritten text
        let rewritten = Pipeline::standard().rewrite(CORPUS);

        for rule in Pipeline::standard().rules() {
            assert_eq!(rule.apply(&rewritten), rewritten, "rule '{}'", rule.name());
        }
    }

    #[test]
    fn continuation_before_hash_comment() {
        // a continued directive is removed as a whole
        let actual = Pipeline::standard().rewrite("#define F(a, b) \\\n  MIN(a, b)\nint x;\n");

        assert_eq!(actual, "\nint x;\n");
    }

    #[test]
    fn null_before_va_arg() {
        let actual = Pipeline::standard().rewrite("p = va_arg(ap, void *) ?: NULL;");

        assert_eq!(
            actual,
            "p = (*(( void * *)__builtin_va_arg(&(ap), ( void * *)0))) ?: 0;"
        );
    }

    #[test]
    fn rewrites_inside_call_arguments() {
        let actual = Pipeline::standard().rewrite("MIN(errno, va_arg(ap, int))");

        assert_eq!(
            actual,
            "((*__errno_location())<( (*(( int *)__builtin_va_arg(&(ap), ( int *)0))))?(*__errno_location()):( (*(( int *)__builtin_va_arg(&(ap), ( int *)0)))))"
        );
    }

    #[test]
    fn referenced_symbols_are_declared() {
        for prologue in [Prologue::hosted(), Prologue::minimal()] {
            for rule in Pipeline::standard().rules() {
                for symbol in rule.references() {
                    assert!(
                        prologue.declares(symbol),
                        "'{}' needs '{}' which is not declared",
                        rule.name(),
                        symbol
                    );
                }
            }
        }
    }

    #[test]
    fn empty_pipeline_is_identity() {
        assert_eq!(Pipeline::new(Vec::new()).rewrite(CORPUS), CORPUS);
    }
}
