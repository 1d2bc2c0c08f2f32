use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const BEGIN: &str = "// IWYU pragma: begin_exports\n";
pub const END: &str = "// IWYU pragma: end_exports\n";

pub fn iwyu_pragma_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("iwyu-pragma"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}
