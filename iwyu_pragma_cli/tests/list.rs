mod common;

use iwyu_pragma_core::AnyEmptyResult;
use serde_json::Value;

#[test]
fn list_prints_directives_in_order() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("a.h"),
		format!(
			"{}#include \"x.h\"  // IWYU pragma: keep\n{}/** @headername{{vector}} */\n// IWYU \
			 pragma: frobnicate\n",
			common::BEGIN,
			common::END
		),
	)?;

	let output = common::iwyu_pragma_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	insta::assert_snapshot!(String::from_utf8(output)?, @r"
	a.h:1:4 begin_exports
	a.h:2:20 keep
	a.h:3:4 end_exports
	a.h:4:5 @headername{vector}
	a.h:5:4 unknown (frobnicate)

	5 directive(s) in 1 file(s)
	");

	Ok(())
}

#[test]
fn list_json_marks_malformed_directives() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("b.h"), "/* @headername{map */\n// IWYU pragma: keep\n")?;

	let output = common::iwyu_pragma_cmd()
		.arg("list")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let value: Value = serde_json::from_slice(&output)?;
	similar_asserts::assert_eq!(
		value,
		serde_json::json!([
			{ "file": "b.h", "line": 1, "column": 4, "directive": "@headername{map", "ok": false },
			{ "file": "b.h", "line": 2, "column": 4, "directive": "keep", "ok": true },
		])
	);

	Ok(())
}

#[test]
fn list_without_directives() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("c.h"), "int x;\n")?;

	common::iwyu_pragma_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No directives found."));

	Ok(())
}
