mod common;

use iwyu_pragma_core::AnyEmptyResult;

const FAULTY_PRAGMAS: &str = include_str!("../../iwyu_pragma_core/fixtures/comment_pragmas-d7.h");

#[test]
fn verify_passes_when_expectations_match() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("comment_pragmas-d7.h"), FAULTY_PRAGMAS)?;

	common::iwyu_pragma_cmd()
		.arg("verify")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Verify passed: 5 expectation(s) matched in 1 file(s).",
		));

	Ok(())
}

#[test]
fn verify_reports_mismatches() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("mismatch.h"),
		format!(
			"// IWYU: begin_exports without an end_exports\nint x;\n{}",
			common::END
		),
	)?;

	common::iwyu_pragma_cmd()
		.arg("verify")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains(
			"mismatch.h:2: unsatisfied: no diagnostic matches `begin_exports without an \
			 end_exports`",
		))
		.stdout(predicates::str::contains(
			"mismatch.h:3:4: unexpected: end_exports without a begin_exports",
		))
		.stderr(predicates::str::contains("Verify failed: 2 mismatch(es)"));

	Ok(())
}

#[test]
fn verify_rejects_invalid_expectations() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("broken.h"),
		"// IWYU: Unknown or malformed pragma (foo\n// IWYU pragma: foo\n",
	)?;

	common::iwyu_pragma_cmd()
		.arg("verify")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("invalid expectation regex"));

	Ok(())
}
