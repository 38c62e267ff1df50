use std::env;
use std::process::Command;

fn main() {
    let opt_level = env::var("OPT_LEVEL").unwrap_or_else(|_| "0".to_string());
    let is_optimized = opt_level != "0";

    let version = if is_optimized {
        // Release builds are stamped with the commit they were built from.
        // Outside a git checkout we fall back to an unversioned stamp.
        match Command::new("git").arg("rev-parse").arg("HEAD").output() {
            Ok(output) if output.status.success() => {
                String::from_utf8(output.stdout).unwrap_or_else(|_| "Unknown release".into())
            }
            _ => "Unknown release".into(),
        }
    } else {
        "Development build".into()
    };

    println!("cargo:rustc-env=RELEASE={}", version.trim());
}
