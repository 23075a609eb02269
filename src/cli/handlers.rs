// FILE: src/cli/handlers.rs
use crate::{
    apply_edits, cli::ListFormat, convert_file, convert_with_options, extract_properties,
    substitute_defaults, ConversionStats, ConverterError, ConverterOptions, Result,
};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Instant;

const TEMPLATE_EXTENSIONS: &[&str] = &["html", "htm", "tpl"];

fn read_input(input_path: &str) -> Result<String> {
    fs::read_to_string(input_path).map_err(|e| ConverterError::FileNotFound {
        path: format!("{}: {}", input_path, e),
    })
}

fn required<'a>(matches: &'a clap::ArgMatches, id: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(id)
        .ok_or_else(|| ConverterError::invalid_format(format!("Missing argument '{}'", id)))
}

// --- CONVERT ---
pub fn handle_convert_command(cli: &super::ConverterCli, matches: &clap::ArgMatches) -> Result<()> {
    let input_path = required(matches, "input")?;
    let output_path = matches
        .get_one::<String>("output")
        .map(|s| s.to_string())
        .unwrap_or_else(|| cli.default_output_path(input_path).to_string_lossy().into_owned());

    if let Some(parent) = Path::new(&output_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let options = cli.build_converter_options(matches)?;

    if matches.get_flag("watch") {
        watch_and_convert(input_path, &output_path, options)
    } else {
        convert_single_file(input_path, &output_path, &options, matches.get_flag("stats"))
    }
}

fn convert_single_file(
    input_path: &str,
    output_path: &str,
    options: &ConverterOptions,
    show_stats: bool,
) -> Result<()> {
    println!("🔨 Converting {} -> {}", input_path, output_path);

    let convert_start = Instant::now();
    let stats = convert_file(input_path, output_path, options)?;
    let convert_time = convert_start.elapsed();

    print_summary(&stats);
    println!("   Time: {}ms", convert_time.as_millis());

    if show_stats {
        print_detailed_stats(&stats);
    }

    Ok(())
}

fn print_summary(stats: &ConversionStats) {
    if stats.legacy_tag_count > 0 {
        println!(
            "✅ Converted {} tags → {} new tags",
            stats.legacy_tag_count, stats.canonical_tag_count
        );
    } else {
        println!("✅ No legacy tags found");
    }
    if stats.unrecognized_count > 0 {
        println!("⚠️  {} tag(s) could not be recognized and were left unchanged", stats.unrecognized_count);
    }
    if stats.renamed_count > 0 {
        println!("   Renamed duplicates: {}", stats.renamed_count);
    }
}

fn watch_and_convert(input_path: &str, output_path: &str, options: ConverterOptions) -> Result<()> {
    println!("👀 Watching {} for changes...", input_path);

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                if let Err(e) = tx.send(event) {
                    eprintln!("Watch error: {}", e);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| {
        ConverterError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to create file watcher: {}", e),
        ))
    })?;

    watcher
        .watch(Path::new(input_path), RecursiveMode::NonRecursive)
        .map_err(|e| {
            ConverterError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to watch file: {}", e),
            ))
        })?;

    match convert_file(input_path, output_path, &options) {
        Ok(stats) => print_summary(&stats),
        Err(e) => eprintln!("❌ Initial conversion failed: {}", e),
    }

    loop {
        match rx.recv() {
            Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                println!("🔄 File changed, reconverting...");
                match convert_file(input_path, output_path, &options) {
                    Ok(stats) => print_summary(&stats),
                    Err(e) => eprintln!("❌ Conversion failed: {}", e),
                }
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Watch error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

fn print_detailed_stats(stats: &ConversionStats) {
    println!("\n📊 Detailed Conversion Statistics:");
    println!("   Source size: {} bytes", stats.source_size);
    println!("   Output size: {} bytes", stats.output_size);
    println!("   Convert time: {}ms", stats.convert_time_ms);
    println!("\n   Tag breakdown:");
    println!("     Legacy markers: {}", stats.legacy_tag_count);
    println!("     Converted: {}", stats.converted_count);
    println!("     Unrecognized: {}", stats.unrecognized_count);
    println!("     Mapped names: {}", stats.mapped_count);
    println!("     Derived names: {}", stats.derived_count);
    println!("\n   Duplicates:");
    println!("     Groups: {}", stats.duplicate_group_count);
    println!("     Renamed: {}", stats.renamed_count);
    println!("     Positional suffixes: {}", stats.positional_fallback_count);
    if stats.correlation_miss_count > 0 {
        println!("     Without source tag: {}", stats.correlation_miss_count);
    }
}

// --- CHECK ---
pub fn handle_check_command(cli: &super::ConverterCli, matches: &clap::ArgMatches) -> Result<()> {
    let input_path = required(matches, "input")?;
    let recursive = matches.get_flag("recursive");
    let options = ConverterOptions {
        custom_mappings: cli.build_mapping_overrides(),
        ..Default::default()
    };

    if recursive && Path::new(input_path).is_dir() {
        check_directory_recursive(input_path, &options)
    } else if check_single_file(input_path, &options)? {
        Ok(())
    } else {
        Err(ConverterError::invalid_format(format!(
            "{} has unrecognized tags",
            input_path
        )))
    }
}

/// Returns whether the file converts cleanly.
fn check_single_file(input_path: &str, options: &ConverterOptions) -> Result<bool> {
    println!("🔍 Checking {}", input_path);
    let source = read_input(input_path)?;
    let report = convert_with_options(&source, options);
    let stats = &report.stats;

    println!(
        "   {} legacy tag(s), {} mapped, {} derived",
        stats.legacy_tag_count, stats.mapped_count, stats.derived_count
    );
    for rename in &report.renames {
        println!("   ↪ duplicate '{}' renamed to '{}'", rename.from, rename.to);
    }

    if stats.unrecognized_count > 0 {
        println!(
            "❌ {} - {} tag(s) not recognized",
            input_path, stats.unrecognized_count
        );
        Ok(false)
    } else {
        println!("✅ {} - No issues found", input_path);
        Ok(true)
    }
}

fn check_directory_recursive(dir_path: &str, options: &ConverterOptions) -> Result<()> {
    let mut total_files = 0;
    let mut error_files = 0;

    for entry in walkdir::WalkDir::new(dir_path) {
        let entry = entry.map_err(|e| {
            ConverterError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Directory traversal error: {}", e),
            ))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_template = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| TEMPLATE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if !is_template {
            continue;
        }

        total_files += 1;
        let path = entry.path().to_string_lossy();
        match check_single_file(&path, options) {
            Ok(true) => {}
            Ok(false) => error_files += 1,
            Err(e) => {
                println!("❌ {} - {}", path, e);
                error_files += 1;
            }
        }
    }

    println!("\n📊 Check Summary:");
    println!("   Total files: {}", total_files);
    println!("   Files with issues: {}", error_files);

    if error_files > 0 {
        Err(ConverterError::invalid_format(format!(
            "{} files have unrecognized tags",
            error_files
        )))
    } else {
        Ok(())
    }
}

// --- PROPERTIES ---
pub fn handle_properties_command(matches: &clap::ArgMatches) -> Result<()> {
    let input_path = required(matches, "input")?;
    let format = matches
        .get_one::<ListFormat>("format")
        .cloned()
        .unwrap_or(ListFormat::Table);

    let properties = extract_properties(&read_input(input_path)?);

    match format {
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(&properties).map_err(|e| {
                ConverterError::invalid_format(format!("JSON serialization error: {}", e))
            })?;
            println!("{}", json);
        }
        ListFormat::Table => {
            let width = properties
                .iter()
                .map(|p| p.property_id.len())
                .max()
                .unwrap_or(0)
                .max("PROPERTY".len());
            println!("{:<width$}  {:<5}  DEFAULT", "PROPERTY", "COLOR", width = width);
            for property in &properties {
                println!(
                    "{:<width$}  {:<5}  {}",
                    property.property_id,
                    if property.is_color { "yes" } else { "" },
                    property.default_value,
                    width = width
                );
            }
        }
    }
    Ok(())
}

// --- PREVIEW ---
pub fn handle_preview_command(matches: &clap::ArgMatches) -> Result<()> {
    let input_path = required(matches, "input")?;
    let preview = substitute_defaults(&read_input(input_path)?);
    write_or_print(matches.get_one::<String>("output"), &preview)
}

// --- EDIT ---
pub fn handle_edit_command(matches: &clap::ArgMatches) -> Result<()> {
    let input_path = required(matches, "input")?;
    let assignments: Vec<&str> = matches
        .get_many::<String>("set")
        .map(|values| values.map(String::as_str).collect())
        .unwrap_or_default();

    let edits = super::parse_assignments(assignments)?;
    for (id, value) in &edits {
        if value.contains('"') {
            return Err(ConverterError::invalid_edit(
                format!("{}={}", id, value),
                "default values cannot contain a double quote",
            ));
        }
    }

    let edited = apply_edits(&read_input(input_path)?, &edits);
    write_or_print(matches.get_one::<String>("output"), &edited)
}

fn write_or_print(output_path: Option<&String>, content: &str) -> Result<()> {
    match output_path {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("✅ Saved to {}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}
