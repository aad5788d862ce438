// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn numeric_arg() -> Arg {
    Arg::new("numeric")
        .short('n')
        .long("numeric")
        .action(ArgAction::SetTrue)
        .help("Compare all-digit version fields numerically")
}

fn format_arg(default: &'static str) -> Arg {
    Arg::new("format")
        .short('f')
        .long("format")
        .value_parser(["text", "json"])
        .default_value(default)
        .help("Output format")
}

fn build_cli() -> Command {
    Command::new("differ")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Differ Contributors")
        .about("Package-level diffs between image releases")
        .subcommand_required(false)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging (overridden by RUST_LOG)"),
        )
        .subcommand(
            Command::new("diff")
                .about("Diff two package-list JSON documents")
                .arg(Arg::new("baseline").required(true).help("Package list of the older release"))
                .arg(Arg::new("current").required(true).help("Package list of the newer release"))
                .arg(numeric_arg())
                .arg(format_arg("text")),
        )
        .subcommand(
            Command::new("release-diff")
                .about("Diff two releases of an image JSON document")
                .arg(Arg::new("image").required(true).help("Image document"))
                .arg(Arg::new("old_digest").required(true).help("Digest of the older release"))
                .arg(Arg::new("new_digest").required(true).help("Digest of the newer release"))
                .arg(numeric_arg())
                .arg(format_arg("json")),
        )
        .subcommand(
            Command::new("latest")
                .about("Show the most recent release of an image JSON document")
                .arg(Arg::new("image").required(true).help("Image document")),
        )
        .subcommand(
            Command::new("compare")
                .about("Compare two version strings")
                .arg(Arg::new("a").required(true))
                .arg(Arg::new("b").required(true))
                .arg(numeric_arg()),
        )
        .subcommand(
            Command::new("dpkg-import")
                .about("Convert dpkg output into a package-list JSON document")
                .arg(Arg::new("input").help("Input file (reads stdin if omitted)"))
                .arg(
                    Arg::new("status")
                        .short('s')
                        .long("status")
                        .action(ArgAction::SetTrue)
                        .help("Input is the dpkg status database instead of `dpkg -l` output"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    // Generate main man page
    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).expect("Failed to render man page");

    let man_path = man_dir.join("differ.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");
}
