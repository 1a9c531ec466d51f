use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use debase::explain;
use debase::symbols;
use debase_common::{Abi, SymbolFeatures};
use debase_match::SymbolMatcher;

#[derive(Parser)]
#[command(
    name = "debase",
    about = "Strip base-class constructor/destructor calls — symbol matching front end"
)]
struct Cli {
    /// Show pattern and file resolution details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match symbols from input files against the configured patterns
    Scan {
        /// JSON config with files and ctor/dtor/all patterns
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pattern added to both the ctor and dtor sets (repeatable)
        #[arg(short, long = "pattern")]
        patterns: Vec<String>,

        /// Pattern added to the ctor set only (repeatable)
        #[arg(long = "ctor-pattern")]
        ctor_patterns: Vec<String>,

        /// Pattern added to the dtor set only (repeatable)
        #[arg(long = "dtor-pattern")]
        dtor_patterns: Vec<String>,

        /// Mangling scheme: itanium, msvc, or a target triple
        #[arg(long, default_value = "itanium")]
        abi: Abi,

        /// Downgrade pattern/config errors to warnings
        #[arg(long)]
        permissive: bool,

        /// Emit matches as a JSON array
        #[arg(long)]
        json: bool,

        /// Symbols files (llvm-nm output or one mangled name per line);
        /// `-` reads stdin
        #[arg(value_name = "FILE")]
        inputs: Vec<String>,
    },
    /// Validate a config file
    Check {
        /// Path to the JSON config
        config: PathBuf,

        /// Downgrade pattern/config errors to warnings
        #[arg(long)]
        permissive: bool,
    },
    /// Compile one pattern and print its tokens and node tree
    Explain {
        /// The pattern to compile
        pattern: String,

        /// Bind file properties against this input filename
        #[arg(long)]
        filename: Option<String>,
    },
    /// Print kind, scope chain, and variant for each symbol
    Classify {
        /// Mangling scheme: itanium, msvc, or a target triple
        #[arg(long, default_value = "itanium")]
        abi: Abi,

        /// Symbols files; `-` reads stdin
        #[arg(value_name = "FILE")]
        inputs: Vec<String>,
    },
}

/// Fill a matcher from config and command-line patterns. Returns the
/// input files the config contributed.
fn build_matcher(
    matcher: &mut SymbolMatcher,
    config: Option<&Path>,
    patterns: &[String],
    ctor_patterns: &[String],
    dtor_patterns: &[String],
    verbose: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut config_files = Vec::new();
    if let Some(path) = config {
        matcher.load_config(path, Some(&mut config_files))?;
        if verbose {
            eprintln!(
                "[debase] loaded config {} ({} file(s))",
                path.display(),
                config_files.len()
            );
        }
    }
    add_all(matcher, patterns, SymbolMatcher::add_pattern)?;
    add_all(matcher, ctor_patterns, SymbolMatcher::add_ctor_pattern)?;
    add_all(matcher, dtor_patterns, SymbolMatcher::add_dtor_pattern)?;
    Ok(config_files)
}

/// Compile command-line patterns into one of the matcher's sets. In
/// permissive mode a bad pattern is skipped with a warning, matching the
/// config loader's behavior.
fn add_all(
    matcher: &mut SymbolMatcher,
    patterns: &[String],
    add: fn(&mut SymbolMatcher, &str) -> Result<usize, debase_match::PatternError>,
) -> anyhow::Result<()> {
    for pattern in patterns {
        if let Err(e) = add(matcher, pattern) {
            if matcher.permissive() {
                eprintln!("[debase] warning: skipping pattern: {e}");
            } else {
                return Err(e.into());
            }
        }
    }
    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        return Ok(body);
    }
    std::fs::read_to_string(input)
        .map_err(|e| anyhow::anyhow!("failed to read {input}: {e}"))
}

#[allow(clippy::too_many_arguments)]
fn cmd_scan(
    config: Option<&Path>,
    patterns: &[String],
    ctor_patterns: &[String],
    dtor_patterns: &[String],
    abi: Abi,
    permissive: bool,
    json: bool,
    inputs: &[String],
    verbose: bool,
) -> anyhow::Result<i32> {
    let mut matcher = SymbolMatcher::new(permissive);
    let config_files = build_matcher(
        &mut matcher,
        config,
        patterns,
        ctor_patterns,
        dtor_patterns,
        verbose,
    )?;

    let mut all_inputs: Vec<String> = inputs.to_vec();
    all_inputs.extend(
        config_files
            .iter()
            .map(|p| p.to_string_lossy().into_owned()),
    );
    if all_inputs.is_empty() {
        anyhow::bail!("no input files (pass FILE arguments or a config with \"files\")");
    }

    let demangler = debase_demangle::demangler_for(abi);
    let mut features = SymbolFeatures::new();
    let mut matches = Vec::new();

    for input in &all_inputs {
        if verbose {
            eprintln!("[debase] scanning {input}");
        }
        matcher.set_filename(input)?;
        let body = read_input(input)?;
        for mangled in symbols::parse_symbol_lines(&body) {
            demangler.classify(&mangled, &mut features);
            if matcher.matches(&features) {
                matches.push((input.clone(), mangled, features.clone()));
            }
        }
    }

    if json {
        let entries: Vec<serde_json::Value> = matches
            .iter()
            .map(|(file, mangled, features)| {
                serde_json::json!({
                    "file": file,
                    "symbol": mangled,
                    "qualified": features.qualified_name(),
                    "kind": features.kind,
                    "variant": features.variant,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (file, mangled, features) in &matches {
            println!(
                "{file}: {} [{:?}] {mangled}",
                features.qualified_name(),
                features.kind
            );
        }
        if verbose {
            eprintln!("[debase] {} matching symbol(s)", matches.len());
        }
    }

    Ok(0)
}

fn cmd_check(config: &Path, permissive: bool) -> i32 {
    let mut matcher = SymbolMatcher::new(permissive);
    let mut files = Vec::new();
    match matcher.load_config(config, Some(&mut files)) {
        Ok(()) => {
            eprintln!(
                "[debase] {} is valid ({} ctor pattern(s), {} dtor pattern(s), {} file(s))",
                config.display(),
                matcher.ctor_patterns().len(),
                matcher.dtor_patterns().len(),
                files.len()
            );
            0
        }
        Err(e) => {
            eprintln!("[debase] error: {e}");
            1
        }
    }
}

fn cmd_explain(pattern: &str, filename: Option<&str>) -> i32 {
    let mut matcher = SymbolMatcher::new(false);
    if let Some(filename) = filename {
        if let Err(e) = matcher.set_filename(filename) {
            eprintln!("[debase] error: {e}");
            return 1;
        }
    }

    let tokens = match debase_match::lexer::lex(
        pattern,
        filename.map(debase_match::fileprops::FileProps::new).as_ref(),
    ) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("[debase] error: {e}");
            return 1;
        }
    };
    print!("{}", explain::render_tokens(&tokens));

    let id = match matcher.compile_pattern(pattern) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("[debase] error: {e}");
            return 1;
        }
    };
    // Late-bound leaves created by the compile are still placeholders;
    // re-binding shows them resolved.
    if let Some(filename) = filename {
        if let Err(e) = matcher.set_filename(filename) {
            eprintln!("[debase] error: {e}");
            return 1;
        }
    }
    println!();
    print!("{}", explain::render_node(matcher.arena(), id));
    0
}

fn cmd_classify(abi: Abi, inputs: &[String]) -> anyhow::Result<i32> {
    if inputs.is_empty() {
        anyhow::bail!("no input files");
    }
    let demangler = debase_demangle::demangler_for(abi);
    let mut features = SymbolFeatures::new();
    for input in inputs {
        let body = read_input(input)?;
        for mangled in symbols::parse_symbol_lines(&body) {
            let kind = demangler.classify(&mangled, &mut features);
            if features.scope_names.is_empty() {
                println!("{kind:?}\t{mangled}");
            } else {
                println!(
                    "{kind:?}\t{mangled}\t{}\tvariant {}",
                    features.qualified_name(),
                    features.variant
                );
            }
        }
    }
    Ok(0)
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match &cli.command {
        Commands::Scan {
            config,
            patterns,
            ctor_patterns,
            dtor_patterns,
            abi,
            permissive,
            json,
            inputs,
        } => cmd_scan(
            config.as_deref(),
            patterns,
            ctor_patterns,
            dtor_patterns,
            *abi,
            *permissive,
            *json,
            inputs,
            cli.verbose,
        )
        .unwrap_or_else(|e| {
            eprintln!("[debase] error: {e:#}");
            1
        }),
        Commands::Check { config, permissive } => cmd_check(config, *permissive),
        Commands::Explain { pattern, filename } => cmd_explain(pattern, filename.as_deref()),
        Commands::Classify { abi, inputs } => cmd_classify(*abi, inputs).unwrap_or_else(|e| {
            eprintln!("[debase] error: {e:#}");
            1
        }),
    };
    std::process::exit(exit_code);
}
