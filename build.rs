// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: source RPM path
fn package_arg() -> Arg {
    Arg::new("package_path")
        .required(true)
        .value_name("PACKAGE")
        .help("Path to the source RPM")
}

fn build_cli() -> Command {
    Command::new("srpm-import")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Conary Contributors")
        .about("Import RPM source packages into git working trees")
        .subcommand_required(false)
        .subcommand(
            Command::new("import")
                .about("Import a source RPM into a git repository")
                .arg(package_arg())
                .arg(
                    Arg::new("dist_version")
                        .short('v')
                        .long("dist-version")
                        .required(true)
                        .help("Target distribution version (branch becomes <prefix><version>)"),
                )
                .arg(
                    Arg::new("dest")
                        .short('d')
                        .long("dest")
                        .required(true)
                        .help("Repository directory (created if missing)"),
                )
                .arg(Arg::new("config").short('c').long("config").help("TOML config file"))
                .arg(Arg::new("converter").long("converter").help("Converter program (default: rpm2cpio)"))
                .arg(Arg::new("branch_prefix").long("branch-prefix").help("Branch name prefix (default: rocky)"))
                .arg(
                    Arg::new("no_commit")
                        .long("no-commit")
                        .action(clap::ArgAction::SetTrue)
                        .help("Leave the result staged instead of committing"),
                )
                .arg(
                    Arg::new("no_lookaside")
                        .long("no-lookaside")
                        .action(clap::ArgAction::SetTrue)
                        .help("Skip the lookaside metadata file"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show declared sources and patches and how they would be handled")
                .arg(package_arg()),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("srpm-import.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
