//! Conformance test framework for ridl.
//!
//! Runs IDL snippets and whole files through the parser and checks each
//! against an expected outcome: a successful parse, or a failure at a given
//! line and column. A panic is always a failure.

use ridl_parser::{parse_with_options, ParserOptions};
use std::collections::BTreeMap;

/// IDL files shipped with the suite.
pub mod corpus {
    pub const NAMING: &str = include_str!("../corpus/naming.idl");
    pub const BANK: &str = include_str!("../corpus/bank.idl");
    pub const EVENTS: &str = include_str!("../corpus/events.idl");

    pub const ALL: &[(&str, &str)] = &[("naming.idl", NAMING), ("bank.idl", BANK), ("events.idl", EVENTS)];
}

/// What a test case should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Parses,
    /// Any error, lexical or syntactic, at this 1-based position.
    FailsAt { line: u32, column: u32 },
}

/// Result of a single conformance test case.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub category: String,
    pub expectation: Expectation,
    /// Node count of the tree, when the parse succeeded.
    pub nodes: Option<usize>,
    /// Error message and position, when the parse failed.
    pub error: Option<(String, Option<(u32, u32)>)>,
    /// Panic payload, if the parser panicked.
    pub panic: Option<String>,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        if self.panic.is_some() {
            return false;
        }
        match self.expectation {
            Expectation::Parses => self.nodes.is_some(),
            Expectation::FailsAt { line, column } => {
                matches!(&self.error, Some((_, Some(at))) if *at == (line, column))
            }
        }
    }

    fn describe_failure(&self) -> String {
        if let Some(panic) = &self.panic {
            return format!("panicked: {}", panic);
        }
        match (&self.expectation, &self.error) {
            (Expectation::Parses, Some((message, _))) => message.clone(),
            (Expectation::FailsAt { line, column }, Some((message, _))) => {
                format!("expected an error at {}:{}, got: {}", line, column, message)
            }
            (Expectation::FailsAt { line, column }, None) => {
                format!("expected an error at {}:{}, but it parsed", line, column)
            }
            (Expectation::Parses, None) => "unknown error".to_string(),
        }
    }
}

/// Run a single conformance test case.
pub fn run_test(
    name: &str,
    category: &str,
    source: &str,
    expectation: Expectation,
    options: &ParserOptions,
) -> TestResult {
    let parse_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        parse_with_options(source, options.clone())
    }));

    let mut result = TestResult {
        name: name.to_string(),
        category: category.to_string(),
        expectation,
        nodes: None,
        error: None,
        panic: None,
    };
    match parse_result {
        Ok(Ok(ast)) => result.nodes = Some(ast.node_count()),
        Ok(Err(err)) => {
            let position = err.position().map(|p| (p.line, p.column));
            result.error = Some((err.to_string(), position));
        }
        Err(payload) => {
            let msg = if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = payload.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "Unknown panic".to_string()
            };
            result.panic = Some(msg);
        }
    }
    result
}

/// Conformance test suite runner.
#[derive(Default)]
pub struct ConformanceTestSuite {
    pub tests: Vec<TestResult>,
    options: ParserOptions,
}

impl ConformanceTestSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect `source` to parse.
    pub fn add_test(&mut self, name: &str, category: &str, source: &str) {
        self.add_case(name, category, source, Expectation::Parses);
    }

    /// Expect `source` to fail at `line`:`column`.
    pub fn add_failure(&mut self, name: &str, category: &str, source: &str, line: u32, column: u32) {
        self.add_case(name, category, source, Expectation::FailsAt { line, column });
    }

    pub fn add_case(&mut self, name: &str, category: &str, source: &str, expectation: Expectation) {
        let result = run_test(name, category, source, expectation, &self.options);
        self.tests.push(result);
    }

    /// Run the cases added inside `f` with different parser options.
    pub fn with_options(&mut self, options: ParserOptions, f: impl FnOnce(&mut Self)) {
        let saved = std::mem::replace(&mut self.options, options);
        f(self);
        self.options = saved;
    }

    pub fn failures(&self) -> Vec<&TestResult> {
        self.tests.iter().filter(|t| !t.passed()).collect()
    }

    pub fn print_summary(&self) {
        let total = self.tests.len();
        let passed = self.tests.iter().filter(|t| t.passed()).count();
        let pass_rate = if total > 0 {
            (passed as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        println!("\n=== IDL Conformance Test Summary ===");
        println!("Total tests: {}", total);
        println!("Passed: {}", passed);
        println!("Failed: {}", total - passed);
        println!("Pass rate: {:.2}%", pass_rate);

        let mut categories: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for test in &self.tests {
            let entry = categories.entry(test.category.as_str()).or_insert((0, 0));
            if test.passed() {
                entry.0 += 1;
            }
            entry.1 += 1;
        }

        println!("\n--- Results by Category ---");
        for (category, (passed_count, total_count)) in categories {
            println!("  {}: {}/{}", category, passed_count, total_count);
        }

        let failures = self.failures();
        if !failures.is_empty() {
            println!("\n--- Failed Tests ---");
            for failure in failures.iter().take(10) {
                println!("  [{}] {}: {}", failure.category, failure.name, failure.describe_failure());
            }
            if failures.len() > 10 {
                println!("  ... and {} more failures", failures.len() - 10);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expectations() {
        let options = ParserOptions::default();
        assert!(run_test("ok", "unit", "interface I;", Expectation::Parses, &options).passed());

        let missing = run_test("missing", "unit", "interface I", Expectation::Parses, &options);
        assert!(!missing.passed());
        assert!(missing.describe_failure().contains("';'"));

        let located = Expectation::FailsAt { line: 1, column: 12 };
        assert!(run_test("located", "unit", "interface I", located, &options).passed());
        let elsewhere = Expectation::FailsAt { line: 1, column: 1 };
        assert!(!run_test("elsewhere", "unit", "interface I", elsewhere, &options).passed());
    }

    #[test]
    fn test_scoped_options() {
        let mut suite = ConformanceTestSuite::new();
        suite.with_options(ParserOptions::default().with_max_depth(1), |s| {
            s.add_failure("too_deep", "unit", "module A { module B { const long X = 1; }; };", 1, 12);
        });
        suite.add_test("default_depth", "unit", "module A { module B { const long X = 1; }; };");
        assert!(suite.failures().is_empty());
    }
}
