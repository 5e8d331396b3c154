//! `fir-tree-gen`: print the FIR tree sources from the schema.

use std::path::Path;

use fir_tree_gen::{describe_leaves, fir_implementations, fir_tree_schema, generate, GeneratedFile};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let files = match fir_tree_schema()
        .and_then(|schema| fir_implementations(&schema).map(|config| (schema, config)))
    {
        Ok((schema, config)) => {
            if args[1] == "--list" {
                print!("{}", describe_leaves(&schema));
                return;
            }
            generate(&schema, &config)
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    match args[1].as_str() {
        "--out" | "--check" => {
            let Some(dir) = args.get(2) else {
                eprintln!("Usage: fir-tree-gen {} <dir>", args[1]);
                std::process::exit(1);
            };
            let dir = Path::new(dir);
            if args[1] == "--out" {
                write_files(dir, &files);
            } else {
                check_files(dir, &files);
            }
        }
        "--help" | "-h" => print_usage(),
        other => {
            eprintln!("error: unknown option '{other}'");
            print_usage();
            std::process::exit(1);
        }
    }
}

fn write_files(dir: &Path, files: &[GeneratedFile]) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("error: cannot create '{}': {e}", dir.display());
        std::process::exit(1);
    }
    for file in files {
        let path = dir.join(file.name);
        if let Err(e) = std::fs::write(&path, &file.contents) {
            eprintln!("error: cannot write '{}': {e}", path.display());
            std::process::exit(1);
        }
        println!("wrote {}", path.display());
    }
}

fn check_files(dir: &Path, files: &[GeneratedFile]) {
    let stale: Vec<&str> = files
        .iter()
        .filter(|file| {
            std::fs::read_to_string(dir.join(file.name)).map_or(true, |on_disk| on_disk != file.contents)
        })
        .map(|file| file.name)
        .collect();
    if stale.is_empty() {
        println!("generated sources are up to date");
        return;
    }
    for name in &stale {
        eprintln!("stale: {}", dir.join(name).display());
    }
    eprintln!("run `fir-tree-gen --out {}` to regenerate", dir.display());
    std::process::exit(1);
}

fn print_usage() {
    println!("fir-tree-gen: FIR tree source generator");
    println!();
    println!("Usage:");
    println!("  fir-tree-gen --out <dir>     Write elements.rs, visitor.rs, transformer.rs");
    println!("  fir-tree-gen --check <dir>   Fail if the files in <dir> are out of date");
    println!("  fir-tree-gen --list          Print every leaf kind with its fields");
}
