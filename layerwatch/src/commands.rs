use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("layerwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("layerwatch")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Writes a starter configuration file to your filesystem")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location to store the layerwatch configuration")
                        .default_value("~/.config/layerwatch/"),
                )
                .arg(
                    arg!(-f - -"force")
                        .help("Forces the overwriting of any existing configuration at the specified location.")
                        .required(false),
                ),
        )
        .subcommand(
            command!("check")
                .about(
                    "Check every configured map: fetch each map document, walk its \
                layer trees and report unreachable layers.",
                )
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(false)
                        .help("Path to the configuration file")
                        .default_value("~/.config/layerwatch/layerwatch.json"),
                )
                .arg(
                    arg!(-m --"map" <MAP_ID>)
                        .required(false)
                        .help("Check only the configured map with this id"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds (overrides the configuration)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
}
