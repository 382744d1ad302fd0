//! Conversion of a TAP [`Case`] into a JUnit report

use crate::junit::{DurationSec, Failure, Suite, TestCase, Testsuites};
use crate::tap::{Case, Status, TestResult};
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Failure type recorded for `not ok` results.
pub const FAILURE_TYPE: &str = "TestFailed";

/// Stable identifier for a name: lowercase hex SHA-256.
pub fn str_hash(s: &str) -> String {
    hex::encode(Sha256::digest(s.as_bytes()))
}

/// Convert a TAP test run into a JUnit report with a single suite.
///
/// Every result slot becomes a test case, including tests that were declared
/// by the plan but never reported. Only [`Status::Failed`] results count as
/// failures; skipped and TODO tests are reported as plain test cases.
pub fn from_tap(case: &Case) -> Testsuites {
    let testcases: Vec<TestCase> = case.results.iter().map(testcase).collect();
    let tests = testcases.len();
    let failures = case.count(Status::Failed);
    let time = DurationSec(case.results.iter().map(|r| r.duration).sum::<Duration>());

    let suite = Suite {
        id: str_hash(&case.name),
        name: case.name.clone(),
        tests,
        failures,
        time,
        testcases,
    };

    Testsuites {
        id: String::new(),
        name: String::new(),
        tests,
        failures,
        time,
        suites: vec![suite],
    }
}

fn testcase(result: &TestResult) -> TestCase {
    let failures = if result.status == Status::Failed {
        vec![Failure {
            message: result.header.clone(),
            kind: FAILURE_TYPE.to_string(),
            text: result.raw.clone(),
        }]
    } else {
        Vec::new()
    };

    TestCase {
        id: str_hash(&result.header),
        name: result.header.clone(),
        time: DurationSec(result.duration),
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_hash() {
        assert_eq!(
            str_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(str_hash("Header0"), str_hash("Header0"));
        assert_ne!(str_hash("Header0"), str_hash("Header1"));
    }

    #[test]
    fn test_conversion() {
        let mut case = Case::new("test_name_here");
        case.raw = "Raw string".to_string();
        case.results = vec![
            TestResult {
                status: Status::Passed,
                duration: Duration::from_secs(2),
                raw: "Some string here".to_string(),
                header: "Header0".to_string(),
            },
            TestResult {
                status: Status::Failed,
                duration: Duration::from_secs(3),
                raw: "not ok 2 Test failed\n# Some failure message\n".to_string(),
                header: "Header1".to_string(),
            },
            TestResult {
                status: Status::Skipped,
                header: "Header2".to_string(),
                ..Default::default()
            },
            TestResult::default(),
        ];

        let five = DurationSec(Duration::from_secs(5));
        let expected = Testsuites {
            tests: 4,
            failures: 1,
            time: five,
            suites: vec![Suite {
                id: str_hash("test_name_here"),
                name: "test_name_here".to_string(),
                tests: 4,
                failures: 1,
                time: five,
                testcases: vec![
                    TestCase {
                        id: str_hash("Header0"),
                        name: "Header0".to_string(),
                        time: DurationSec(Duration::from_secs(2)),
                        failures: vec![],
                    },
                    TestCase {
                        id: str_hash("Header1"),
                        name: "Header1".to_string(),
                        time: DurationSec(Duration::from_secs(3)),
                        failures: vec![Failure {
                            message: "Header1".to_string(),
                            kind: "TestFailed".to_string(),
                            text: "not ok 2 Test failed\n# Some failure message\n".to_string(),
                        }],
                    },
                    TestCase {
                        id: str_hash("Header2"),
                        name: "Header2".to_string(),
                        ..Default::default()
                    },
                    TestCase {
                        id: str_hash(""),
                        ..Default::default()
                    },
                ],
            }],
            ..Default::default()
        };

        assert_eq!(from_tap(&case), expected);
    }

    #[test]
    fn test_conversion_of_empty_case() {
        let suites = from_tap(&Case::new("nothing"));
        assert_eq!(suites.tests, 0);
        assert_eq!(suites.failures, 0);
        assert_eq!(suites.suites.len(), 1);
        assert!(suites.suites[0].testcases.is_empty());
    }

    #[test]
    fn test_todo_failure_is_not_counted() {
        let mut case = Case::new("todo");
        case.results = vec![TestResult {
            status: Status::Todo,
            header: "later".to_string(),
            ..Default::default()
        }];
        let suites = from_tap(&case);
        assert_eq!(suites.failures, 0);
        assert!(suites.suites[0].testcases[0].failures.is_empty());
    }
}
