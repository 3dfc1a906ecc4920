// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use stagecast_config::ConfigManager;
use std::path::PathBuf;

mod commands;
mod session;

fn build_cli() -> Command {
    Command::new("stagecast")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Stagecast contributors")
        .about("Staged/live presentation controller for images, video, slideshows and scripture")
        .arg(
            Arg::new("config-dir")
                .short('c')
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml and presets.json")
                .global(true),
        )
        .subcommand(
            Command::new("config")
                .about("Manage the settings file")
                .subcommand_required(true)
                .subcommand(Command::new("init").about("Write a default config file if none exists"))
                .subcommand(Command::new("show").about("Print the effective settings as TOML"))
                .subcommand(Command::new("validate").about("Check the settings file for invalid values"))
                .subcommand(Command::new("path").about("Print the settings file location")),
        )
        .subcommand(
            Command::new("presets")
                .about("Manage saved slideshow presets")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List saved presets"))
                .subcommand(
                    Command::new("delete")
                        .about("Delete a preset")
                        .arg(Arg::new("id").required(true).value_name("PRESET_ID").help("Preset ID")),
                )
                .subcommand(
                    Command::new("rename")
                        .about("Rename a preset")
                        .arg(Arg::new("id").required(true).value_name("PRESET_ID").help("Preset ID"))
                        .arg(Arg::new("name").required(true).value_name("NAME").help("New name")),
                ),
        )
        .subcommand(
            Command::new("verse")
                .about("Look up a single verse")
                .arg(
                    Arg::new("reference")
                        .required(true)
                        .num_args(1..)
                        .value_name("REFERENCE")
                        .help("Verse reference, e.g. \"John 3:16\""),
                )
                .arg(
                    Arg::new("translation")
                        .short('t')
                        .long("translation")
                        .value_name("ID")
                        .help("Translation ID (defaults to the configured one)"),
                )
                .arg(
                    Arg::new("compare")
                        .long("compare")
                        .value_name("ID")
                        .help("Second translation shown alongside"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Report media files that do not exist")
                .arg(
                    Arg::new("paths")
                        .required(true)
                        .num_args(1..)
                        .value_name("FILE")
                        .help("Media files to check"),
                ),
        )
        .subcommand(
            Command::new("console")
                .about("Interactive operator console")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print effects as raw JSON lines only")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn config_manager(matches: &clap::ArgMatches) -> Result<ConfigManager> {
    let manager = match matches.get_one::<String>("config-dir") {
        Some(dir) => ConfigManager::with_directory(PathBuf::from(dir)),
        None => ConfigManager::new(),
    };
    manager.context("Failed to resolve config directory")
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let manager = config_manager(&matches)?;
    let config = manager.load_with_env_overrides().unwrap_or_else(|e| {
        eprintln!("Config error: {}, using defaults", e);
        stagecast_config::Config::default()
    });

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.log_level.as_str()),
    )
    .init();

    match matches.subcommand() {
        Some(("config", sub_matches)) => match sub_matches.subcommand() {
            Some(("init", _)) => commands::config_init(&manager),
            Some(("show", _)) => commands::config_show(&config),
            Some(("validate", _)) => commands::config_validate(&manager),
            Some(("path", _)) => commands::config_path(&manager),
            _ => Ok(()),
        },
        Some(("presets", sub_matches)) => match sub_matches.subcommand() {
            Some(("list", _)) => commands::list_presets(&manager),
            Some(("delete", args)) => commands::delete_preset(&manager, args),
            Some(("rename", args)) => commands::rename_preset(&manager, args),
            _ => Ok(()),
        },
        Some(("verse", sub_matches)) => commands::show_verse(&config, sub_matches),
        Some(("check", sub_matches)) => commands::check_paths(sub_matches),
        Some(("console", sub_matches)) => {
            let json_only = sub_matches.get_flag("json");
            session::run(&config, &manager, json_only)
        }
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_verse_reference_words_are_collected() {
        let matches = build_cli()
            .try_get_matches_from(["stagecast", "verse", "1", "John", "4:8", "--compare", "eng_bsb"])
            .expect("valid arguments");
        let (_, sub) = matches.subcommand().expect("subcommand");
        let words: Vec<&String> = sub.get_many::<String>("reference").expect("reference").collect();
        assert_eq!(words, ["1", "John", "4:8"]);
        assert_eq!(sub.get_one::<String>("compare").map(String::as_str), Some("eng_bsb"));
    }

    #[test]
    fn test_presets_requires_subcommand() {
        assert!(build_cli().try_get_matches_from(["stagecast", "presets"]).is_err());
    }
}
