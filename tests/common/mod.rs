use assert_cmd::Command;

pub fn metatags_cmd() -> Command {
    let mut cmd = Command::cargo_bin("metatags").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}
