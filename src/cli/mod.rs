// FILE: src/cli/mod.rs

mod config;
mod handlers;

use crate::error::{ConverterError, Result};
use crate::ConverterOptions;
use clap::{Arg, ArgAction, Command, ValueEnum};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, ValueEnum)]
pub enum ListFormat {
    Table,
    Json,
}

pub struct ConverterCli {
    config: config::ConfigFile,
}

impl ConverterCli {
    pub fn new() -> Self {
        Self {
            config: config::ConfigFile::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let matches = self.build_cli().get_matches();

        self.setup_logging(matches.get_count("verbose"));

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        match matches.subcommand() {
            Some(("convert", sub_matches)) => handlers::handle_convert_command(self, sub_matches),
            Some(("check", sub_matches)) => handlers::handle_check_command(self, sub_matches),
            Some(("properties", sub_matches)) => handlers::handle_properties_command(sub_matches),
            Some(("preview", sub_matches)) => handlers::handle_preview_command(sub_matches),
            Some(("edit", sub_matches)) => handlers::handle_edit_command(sub_matches),
            _ => {
                println!("No subcommand specified. Use --help for usage information.");
                Ok(())
            }
        }
    }

    fn build_cli(&self) -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path (.json or .toml)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
            .subcommand(
                Command::new("convert")
                    .about("Convert legacy tagd:style markup to theme_prop tags")
                    .arg(Arg::new("input").help("Input HTML file").required(true).index(1))
                    .arg(Arg::new("output").short('o').long("output").value_name("FILE").help("Output file"))
                    .arg(Arg::new("mapping").short('m').long("mapping").value_name("NAME_TYPE=ID").help("Add a custom mapping").action(ArgAction::Append))
                    .arg(Arg::new("debug").short('d').long("debug").help("Log every conversion stage").action(ArgAction::SetTrue))
                    .arg(Arg::new("stats").long("stats").help("Show detailed conversion statistics").action(ArgAction::SetTrue))
                    .arg(Arg::new("watch").short('w').long("watch").help("Watch for file changes and reconvert").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("check")
                    .about("Report legacy tags, derived names and collisions without writing output")
                    .arg(Arg::new("input").help("Input file or directory").required(true).index(1))
                    .arg(Arg::new("recursive").short('r').long("recursive").help("Check all template files in directory recursively").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("properties")
                    .about("List the theme properties of a converted document")
                    .arg(Arg::new("input").help("Converted HTML file").required(true).index(1))
                    .arg(Arg::new("format").short('f').long("format").value_parser(clap::value_parser!(ListFormat)).default_value("table").help("Listing format")),
            )
            .subcommand(
                Command::new("preview")
                    .about("Render a converted document with default values in place of tags")
                    .arg(Arg::new("input").help("Converted HTML file").required(true).index(1))
                    .arg(Arg::new("output").short('o').long("output").value_name("FILE").help("Write the preview to a file")),
            )
            .subcommand(
                Command::new("edit")
                    .about("Change default values of theme properties")
                    .arg(Arg::new("input").help("Converted HTML file").required(true).index(1))
                    .arg(Arg::new("set").short('s').long("set").value_name("ID=VALUE").help("New default value for a property").action(ArgAction::Append).required(true))
                    .arg(Arg::new("output").short('o').long("output").value_name("FILE").help("Output file (defaults to stdout)")),
            )
    }

    fn setup_logging(&self, verbose_count: u8) {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .init();
    }

    pub fn build_converter_options(&self, matches: &clap::ArgMatches) -> Result<ConverterOptions> {
        let mut options = ConverterOptions {
            debug_mode: matches.get_flag("debug"),
            ..Default::default()
        };
        if let Some(mappings) = matches.get_many::<String>("mapping") {
            options.custom_mappings = parse_assignments(mappings.map(String::as_str))?;
        }
        for (key, id) in self.build_mapping_overrides() {
            options.custom_mappings.entry(key).or_insert(id);
        }
        Ok(options)
    }

    /// Mappings from the configuration file, if any.
    pub fn build_mapping_overrides(&self) -> HashMap<String, String> {
        self.config.custom_mappings.clone().unwrap_or_default()
    }

    /// Default output path: `<stem>.converted.<ext>` next to the input, or
    /// in the configured output directory.
    pub fn default_output_path(&self, input_path: &str) -> PathBuf {
        let input = Path::new(input_path);
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let extension = self.config.output_extension.as_deref().unwrap_or("html");
        let file_name = format!("{}.converted.{}", stem, extension);
        match &self.config.output_directory {
            Some(dir) => Path::new(dir).join(file_name),
            None => input.with_file_name(file_name),
        }
    }
}

impl Default for ConverterCli {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `KEY=VALUE` arguments. The value may itself contain `=`.
pub fn parse_assignments<'a, I>(assignments: I) -> Result<HashMap<String, String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parsed = HashMap::new();
    for assignment in assignments {
        match assignment.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                parsed.insert(key.trim().to_string(), value.to_string());
            }
            _ => {
                return Err(ConverterError::invalid_format(format!(
                    "Invalid assignment '{}': expected KEY=VALUE format",
                    assignment
                )))
            }
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignments() {
        let parsed = parse_assignments(vec!["body_background=#fff", "cta_text=a=b"]).unwrap();
        assert_eq!(parsed["body_background"], "#fff");
        assert_eq!(parsed["cta_text"], "a=b");

        assert!(parse_assignments(vec!["missing_value"]).is_err());
        assert!(parse_assignments(vec!["=value"]).is_err());
    }

    #[test]
    fn test_default_output_path() {
        let mut cli = ConverterCli::new();
        assert_eq!(
            cli.default_output_path("templates/ad.html"),
            PathBuf::from("templates/ad.converted.html")
        );

        cli.config.output_directory = Some("out".to_string());
        cli.config.output_extension = Some("tpl".to_string());
        assert_eq!(cli.default_output_path("templates/ad.html"), PathBuf::from("out/ad.converted.tpl"));
    }

    #[test]
    fn test_cli_definition() {
        ConverterCli::new().build_cli().debug_assert();
    }

    #[test]
    fn test_options_merge_config_mappings() {
        let mut cli = ConverterCli::new();
        let mut config_mappings = HashMap::new();
        config_mappings.insert("A_color".to_string(), "from_config".to_string());
        config_mappings.insert("B_color".to_string(), "b".to_string());
        cli.config.custom_mappings = Some(config_mappings);

        let matches = cli
            .build_cli()
            .try_get_matches_from(["stlconv", "convert", "in.html", "-m", "A_color=from_cli"])
            .unwrap();
        let (_, sub_matches) = matches.subcommand().unwrap();
        let options = cli.build_converter_options(sub_matches).unwrap();

        assert_eq!(options.custom_mappings["A_color"], "from_cli");
        assert_eq!(options.custom_mappings["B_color"], "b");
    }
}
