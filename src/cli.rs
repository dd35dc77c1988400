// ============================================================================
// MapLedsCraft CLI — headless design replay via command-line arguments
// ============================================================================
//
// Usage examples:
//   MapLedsCraft --catalog cores-mine.json --script castle.txt --output castle.png
//   MapLedsCraft -c cores-mine.json -s "designs/*.txt" --output-dir out/ --report
//   MapLedsCraft -c cores-mine.json -s logo.txt --block Dirt --background mapa.png
//   MapLedsCraft -c cores-mine.json -s logo.txt --lang pt --save-settings
//
// All processing runs synchronously on the current thread; only surface
// rendering fans out across rayon workers.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use image::RgbaImage;

use crate::i18n::Localized;
use crate::io::{compose, export_png, inventory_report, load_background};
use crate::ops::replay::run_script;
use crate::palette::Catalog;
use crate::project::Project;
use crate::settings::EditorSettings;

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// MapLedsCraft headless map-art planner.
///
/// Replays editor scripts against a block catalog and exports the design.
#[derive(Parser, Debug)]
#[command(
    name = "MapLedsCraft",
    about = "Plan block map-art from editor scripts",
    long_about = "Replay pixel-editor scripts on a 128x128 map grid, export the\n\
                  design as PNG and print the block list needed to build it.\n\n\
                  Example:\n  \
                  MapLedsCraft --catalog cores-mine.json --script castle.txt --output castle.png"
)]
pub struct CliArgs {
    /// Block catalog JSON: records with id, category, rgb and block names.
    #[arg(short, long, value_name = "FILE")]
    pub catalog: PathBuf,

    /// Editor script(s) to replay. Glob patterns accepted (e.g. "designs/*.txt").
    #[arg(short, long, required = true, num_args = 1..)]
    pub script: Vec<String>,

    /// Output PNG path. Only valid for single-script input.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output directory for batch processing; files keep the script's stem.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Block selected before the script runs.
    #[arg(short, long, value_name = "NAME")]
    pub block: Option<String>,

    /// Map image drawn underneath the design in the exported PNG.
    #[arg(long, value_name = "FILE")]
    pub background: Option<PathBuf>,

    /// Settings file to use instead of the per-user one.
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Language for block names and messages (en, pt).
    #[arg(long, value_name = "CODE")]
    pub lang: Option<String>,

    /// Print the block list for every design.
    #[arg(short, long)]
    pub report: bool,

    /// Print per-file timing information.
    #[arg(short, long)]
    pub verbose: bool,

    /// Store --lang as the default language in the settings file.
    #[arg(long)]
    pub save_settings: bool,
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run all CLI processing and return an OS exit code.
/// `0` = all scripts succeeded, `1` = one or more failed.
pub fn run(args: CliArgs) -> ExitCode {
    let settings = match &args.settings {
        Some(path) => EditorSettings::load_from(path),
        None => EditorSettings::load(),
    };
    let lang = args.lang.clone().unwrap_or_else(|| settings.effective_language());
    crate::i18n::set_language(&lang);

    if args.save_settings {
        save_settings(&settings, args.lang.as_deref(), args.settings.as_deref());
    }

    let inputs = resolve_inputs(&args.script);
    if inputs.is_empty() {
        eprintln!("{}", t!("cli.no_scripts"));
        return ExitCode::FAILURE;
    }

    // Multiple inputs require --output-dir, not --output
    if inputs.len() > 1 && args.output.is_some() && args.output_dir.is_none() {
        eprintln!(
            "error: {} scripts given but --output only accepts a single file path.\n\
             Use --output-dir to specify a destination directory for batch processing.",
            inputs.len()
        );
        return ExitCode::FAILURE;
    }

    let catalog = Arc::new(Catalog::load_or_empty(&args.catalog));
    if catalog.is_empty() {
        eprintln!("{}", t!("cli.empty_catalog"));
    }

    let background = match &args.background {
        Some(path) => match load_background(path) {
            Ok(img) => Some(img),
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let total = inputs.len();
    let multi = total > 1;
    let mut any_failure = false;

    for (idx, input_path) in inputs.iter().enumerate() {
        if multi || args.verbose {
            println!("[{}/{}] {}", idx + 1, total, input_path.display());
        }

        let file_start = Instant::now();

        let Some(output_path) = build_output_path(input_path, args.output.as_deref(), args.output_dir.as_deref()) else {
            eprintln!("  error: cannot determine output path for '{}'.", input_path.display());
            any_failure = true;
            continue;
        };

        let job = Job {
            catalog: catalog.clone(),
            settings: &settings,
            block: args.block.as_deref(),
            background: background.as_ref(),
            report: args.report,
            lang: &lang,
        };
        match run_one(input_path, &output_path, &job) {
            Ok(()) => {
                println!("{}", t!("cli.exported", path = output_path.display()));
                if args.verbose {
                    println!("  ({:.0}ms)", file_start.elapsed().as_secs_f64() * 1000.0);
                }
            }
            Err(e) => {
                log_err!("{}: {}", input_path.display(), e);
                eprintln!("  error: {}", e);
                any_failure = true;
            }
        }
    }

    if any_failure { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

// ============================================================================
// Per-script processing pipeline
// ============================================================================

/// Settings shared by every script in one run.
struct Job<'a> {
    catalog: Arc<Catalog>,
    settings: &'a EditorSettings,
    block: Option<&'a str>,
    background: Option<&'a RgbaImage>,
    report: bool,
    lang: &'a str,
}

fn run_one(input: &Path, output: &Path, job: &Job<'_>) -> Result<(), String> {
    // -- Step 1: Load ----------------------------------------------------
    let source = std::fs::read_to_string(input)
        .map_err(|e| format!("could not read script '{}': {}", input.display(), e))?;
    let mut project = Project::from_script(input.to_path_buf(), job.catalog.clone(), job.settings);

    if let Some(name) = job.block
        && !project.editor.select_block(name)
    {
        return Err(t!("cli.block_not_found", name = name));
    }

    // -- Step 2: Replay --------------------------------------------------
    let summary = run_script(&mut project.editor, &source).map_err(|e| format!("script error: {}", e))?;
    for name in &summary.unknown_blocks {
        eprintln!("  warning: block '{}' is not in the catalog; its strokes were skipped.", name);
    }
    if summary.commands > 0 {
        project.mark_dirty();
    }
    log_info!(
        "Replayed {} commands from {} into {}",
        summary.commands,
        project.path.display(),
        project.display_title()
    );

    // -- Step 3: Export --------------------------------------------------
    let img = compose(
        project.editor.canvas(),
        project.editor.catalog(),
        project.editor.surface_size(),
        job.background,
    );
    export_png(&img, output)?;
    project.mark_clean();
    log_info!("{} saved as {}", project.display_title(), output.display());

    if job.report {
        let translator = Localized::new(job.lang);
        let editor = &project.editor;
        print!(
            "{}",
            inventory_report(editor.inventory(), editor.catalog(), &translator, job.settings.stack_size)
        );
    }

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Persist the loaded settings, with `lang` as the new default language.
fn save_settings(settings: &EditorSettings, lang: Option<&str>, path: Option<&Path>) {
    let mut updated = settings.clone();
    if let Some(lang) = lang {
        updated.language = lang.to_string();
    }
    let result = match path {
        Some(path) => updated.save_to(path),
        None => updated.save(),
    };
    match result {
        Ok(()) => log_info!("Saved settings (language '{}')", updated.language),
        Err(e) => {
            log_err!("Could not save settings: {}", e);
            eprintln!("warning: could not save settings: {}", e);
        }
    }
}

/// Expand glob patterns and literal paths into a deduplicated, ordered list.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let as_path = Path::new(pattern);

        if as_path.exists() {
            if !result.iter().any(|p| p.as_path() == as_path) {
                result.push(as_path.to_path_buf());
            }
            continue;
        }

        // Treat as glob pattern
        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = false;
                for entry in entries.flatten() {
                    if !result.contains(&entry) {
                        result.push(entry);
                    }
                    matched = true;
                }
                if !matched {
                    eprintln!("warning: pattern '{}' matched no files.", pattern);
                }
            }
            Err(e) => {
                eprintln!("warning: invalid glob '{}': {}", pattern, e);
            }
        }
    }

    result
}

/// Compute the output path for a single script.
///
/// Priority:
/// 1. `--output` (explicit path, used for single-script input)
/// 2. `--output-dir` (batch directory, derives filename from script stem)
/// 3. Fallback: next to the script, same stem, `.png`
fn build_output_path(input: &Path, output: Option<&Path>, output_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(out) = output {
        return Some(out.to_path_buf());
    }

    let stem = input.file_stem()?.to_string_lossy().into_owned();

    if let Some(dir) = output_dir {
        return Some(dir.join(format!("{}.png", stem)));
    }

    let parent = input.parent().unwrap_or(Path::new("."));
    let candidate = parent.join(format!("{}.png", stem));

    // Avoid silent overwrite of the input
    if candidate == input {
        Some(parent.join(format!("{}_out.png", stem)))
    } else {
        Some(candidate)
    }
}
