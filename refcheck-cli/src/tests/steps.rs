//! Behaviour-driven step definitions driving whole CLI invocations.

use super::helpers::ReferenceWorkspace;
use camino::Utf8PathBuf;
use super::*;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use std::cell::RefCell;

/// Holds the workspace plus the imported list and the outcome of the last
/// invocation so each step takes a single world argument.
#[derive(Debug)]
struct CommandWorld {
    workspace: ReferenceWorkspace,
    imported: RefCell<Option<Utf8PathBuf>>,
    outcome: RefCell<Option<Result<Value, CliError>>>,
}

impl CommandWorld {
    fn imported(&self) -> Utf8PathBuf {
        self.imported
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("imported list should be written"))
    }

    fn invoke(&self, arguments: &[&str]) {
        let mut invocation = vec!["refcheck".to_owned()];
        invocation.extend(arguments.iter().map(|argument| (*argument).to_owned()));
        let mut output = Vec::new();
        let outcome = Cli::try_parse_from(invocation)
            .map_err(CliError::ArgumentParsing)
            .and_then(|cli| run_command(cli.command, &mut output))
            .map(|()| {
                serde_json::from_slice(&output)
                    .unwrap_or_else(|err| panic!("command output should be JSON: {err}"))
            });
        self.outcome.replace(Some(outcome));
    }

    fn report(&self) -> Value {
        let borrowed = self.outcome.borrow();
        match borrowed.as_ref() {
            Some(Ok(report)) => report.clone(),
            Some(Err(err)) => panic!("expected success, found {err:?}"),
            None => panic!("a command should have run"),
        }
    }
}

#[fixture]
fn world() -> CommandWorld {
    CommandWorld {
        workspace: ReferenceWorkspace::new(),
        imported: RefCell::new(None),
        outcome: RefCell::new(None),
    }
}

fn strings(report: &Value, pointer: &str) -> Vec<String> {
    report
        .pointer(pointer)
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("report should contain {pointer}: {report}"))
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .collect()
}

#[given("a reference workspace with street and house-number extracts")]
fn workspace_exists(#[from(world)] world: &CommandWorld) {
    assert!(world.workspace.streets().is_file());
    assert!(world.workspace.house_numbers().is_file());
}

#[given("an imported house-number list containing 2, 4 and 9")]
fn imported_house_numbers(#[from(world)] world: &CommandWorld) {
    let path = world
        .workspace
        .imported("house-numbers.txt", &["2", "4", "9"]);
    world.imported.replace(Some(path));
}

#[given("an imported street list containing Kossuth utca and Petőfi utca")]
fn imported_streets(#[from(world)] world: &CommandWorld) {
    let path = world
        .workspace
        .imported("streets.txt", &["Kossuth utca", "Petőfi utca"]);
    world.imported.replace(Some(path));
}

#[when("I run missing-house-numbers for Kossuth utca")]
fn run_missing_house_numbers(#[from(world)] world: &CommandWorld) {
    let reference = world.workspace.house_numbers();
    let imported = world.imported();
    world.invoke(&[
        "missing-house-numbers",
        "--reference",
        reference.as_str(),
        "--region",
        "01",
        "--settlement",
        "011",
        "--street",
        "Kossuth utca",
        "--imported",
        imported.as_str(),
    ]);
}

#[when("I run missing-streets for settlement 011")]
fn run_missing_streets(#[from(world)] world: &CommandWorld) {
    let reference = world.workspace.streets();
    let imported = world.imported();
    world.invoke(&[
        "missing-streets",
        "--reference",
        reference.as_str(),
        "--region",
        "01",
        "--settlement",
        "011",
        "--imported",
        imported.as_str(),
    ]);
}

#[when("I run missing-streets without a reference extract")]
fn run_missing_streets_without_reference(#[from(world)] world: &CommandWorld) {
    let imported = world.imported();
    world.invoke(&[
        "missing-streets",
        "--region",
        "01",
        "--settlement",
        "011",
        "--imported",
        imported.as_str(),
    ]);
}

#[then("the JSON report lists 6 and 8 as missing even numbers")]
fn reports_missing_even(#[from(world)] world: &CommandWorld) {
    let report = world.report();
    assert_eq!(strings(&report, "/only_in_reference/even"), ["6", "8"]);
    assert_eq!(strings(&report, "/only_in_reference/odd"), ["1"]);
    assert_eq!(
        report.get("street").and_then(Value::as_str),
        Some("Kossuth utca")
    );
}

#[then("the JSON report lists 9 as an import-only odd number")]
fn reports_extra_odd(#[from(world)] world: &CommandWorld) {
    let report = world.report();
    assert_eq!(strings(&report, "/only_in_imported/odd"), ["9"]);
    assert!(strings(&report, "/only_in_imported/even").is_empty());
}

#[then("the JSON report lists Árpád utca, Cukor utca and Csokonai utca as missing")]
fn reports_missing_streets(#[from(world)] world: &CommandWorld) {
    let report = world.report();
    assert_eq!(
        strings(&report, "/only_in_reference"),
        ["Árpád utca", "Cukor utca", "Csokonai utca"]
    );
    assert_eq!(strings(&report, "/only_in_imported"), ["Petőfi utca"]);
}

#[then("the CLI reports that the \"reference\" flag is missing")]
fn reports_missing_reference(#[from(world)] world: &CommandWorld) {
    let borrowed = world.outcome.borrow();
    match borrowed.as_ref() {
        Some(Err(CliError::MissingArgument { field, env })) => {
            assert_eq!(*field, ARG_REFERENCE);
            assert_eq!(*env, ENV_STREETS_REFERENCE);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[scenario(path = "tests/features/commands.feature", index = 0)]
fn reporting_missing_house_numbers(#[from(world)] world: CommandWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/commands.feature", index = 1)]
fn reporting_missing_streets(#[from(world)] world: CommandWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/commands.feature", index = 2)]
fn rejecting_missing_reference(#[from(world)] world: CommandWorld) {
    let _ = world;
}
