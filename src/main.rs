pub mod cli;
pub mod codegen;
pub mod error;
pub mod ir;
pub mod lower;
pub mod model;
pub mod normalize;

use colored::Colorize;

fn main() {
    let command_line_interface = cli::CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
