//! Ember compiler CLI.

use ember_diagnostic::emitter::render_issues;
use ember_diagnostic::Issues;
use ember_ir::{SourceMap, StringInterner};
use emberc::{compile, init_tracing, CompileOptions, Compiled, FsLoader};
use std::path::Path;

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        print_usage();
        std::process::exit(1);
    }

    let mut options = CompileOptions::default();
    let mut file = None;
    for arg in &args[2..] {
        match options.apply_flag(arg) {
            Ok(true) => {}
            Ok(false) if file.is_none() => file = Some(arg.as_str()),
            Ok(false) => {
                eprintln!("error: unexpected argument `{arg}`");
                std::process::exit(1);
            }
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }
    let Some(path) = file else {
        eprintln!("error: missing file path");
        print_usage();
        std::process::exit(1);
    };
    let source = read_file(path);

    let ok = match args[1].as_str() {
        "lex" => lex_file(path, &source, &options),
        "parse" => parse_file(path, &source, &options),
        "check" => build(path, &source, &options).is_some(),
        "emit" => build(path, &source, &options).is_some_and(|compiled| {
            print_outputs(&compiled);
            true
        }),
        "sig" => build(path, &source, &options).is_some_and(|compiled| {
            for sig in compiled.signatures() {
                println!("{sig}");
            }
            true
        }),
        other => {
            eprintln!("error: unknown command `{other}`");
            print_usage();
            false
        }
    };
    if !ok {
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: ember <command> <file.ember> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  lex     Print the token tree");
    eprintln!("  parse   Print the syntax tree");
    eprintln!("  check   Compile and report problems");
    eprintln!("  emit    Print the generated code");
    eprintln!("  sig     Print every declared function signature");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --target=<js|glsl|both>   Backends to emit (default: both)");
    eprintln!("  --error-limit=<n>         Issues shown before summarising");
    eprintln!("  --no-header               Omit the GLSL version header");
}

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: cannot read `{path}`: {err}");
            std::process::exit(1);
        }
    }
}

/// Print issues; returns whether there were none.
fn report(sources: &SourceMap, issues: &Issues, options: &CompileOptions) -> bool {
    if issues.is_ok() {
        return true;
    }
    eprint!("{}", render_issues(sources, issues, options.diagnostic_config()));
    false
}

fn lex_file(path: &str, source: &str, options: &CompileOptions) -> bool {
    let mut sources = SourceMap::new();
    let chunk = sources.add(path, source);
    let mut issues = Issues::new();
    let tree = ember_lexer::lex(source, chunk, &mut issues);
    print!("{}", tree.dump(&sources));
    report(&sources, &issues, options)
}

fn parse_file(path: &str, source: &str, options: &CompileOptions) -> bool {
    let mut sources = SourceMap::new();
    let chunk = sources.add(path, source);
    let interner = StringInterner::new();
    let mut issues = Issues::new();
    let script = ember_parse::parse_source(source, chunk, &interner, &mut issues);
    println!("{script:#?}");
    report(&sources, &issues, options)
}

fn build(path: &str, source: &str, options: &CompileOptions) -> Option<Compiled> {
    let root = Path::new(path).parent().unwrap_or_else(|| Path::new("."));
    let mut loader = FsLoader::new(root);
    match compile(path, source, &mut loader, options.clone()) {
        Ok(compiled) => Some(compiled),
        Err(failure) => {
            eprint!("{}", failure.render(options));
            None
        }
    }
}

fn print_outputs(compiled: &Compiled) {
    let targets: Vec<_> = compiled.targets().collect();
    for (i, &target) in targets.iter().enumerate() {
        let Some(text) = compiled.render(target) else {
            continue;
        };
        if targets.len() > 1 {
            if i > 0 {
                println!();
            }
            println!("// === {target} ===");
        }
        print!("{text}");
    }
}
