pub mod check;
pub mod config;
pub mod layer;
pub mod report;
pub mod sink;
pub mod walker;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
 _                                       _       _
| | __ _ _   _  ___ _ ____      ____ _ _| |_ ___| |__
| |/ _` | | | |/ _ \ '__\ \ /\ / / _` |_  __/ __| '_ \
| | (_| | |_| |  __/ |   \ V  V / (_| | | || (__| | | |
|_|\__,_|\__, |\___|_|    \_/\_/ \__,_|  \__\___|_| |_|
         |___/
"#;
    println!("{}", banner.bright_blue());
    println!(
        "{} {}\n",
        "layerwatch".bright_white().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
}
