use std::process;

use clap::{Parser as ClapParser, Subcommand};
use colored::Colorize;

use hostscript::manager::{Diagnostic, ScriptManager};
use hostscript::value::{ops, Value};

#[derive(ClapParser)]
#[command(name = "hostscript", about = "Embeddable procedural scripting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a script file and report diagnostics without loading it
    Check { file: String },
    /// Load a script file and invoke a zero-argument procedure
    Run {
        file: String,
        /// Procedure to invoke
        #[arg(long, default_value = "main")]
        invoke: String,
    },
}

fn report(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        eprintln!("{}", diag.to_string().red());
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file } => {
            let manager = ScriptManager::new();
            let diagnostics = manager.check_file(&file);
            if diagnostics.is_empty() {
                println!("{}", format!("{}: ok", file).green());
            } else {
                report(&diagnostics);
                process::exit(1);
            }
        }
        Commands::Run { file, invoke } => {
            let mut manager = ScriptManager::new();
            let diagnostics = manager.load_file(&file);
            if !diagnostics.is_empty() {
                report(&diagnostics);
                process::exit(1);
            }

            match manager.invoke(&invoke, &[]) {
                Ok(Value::Void) => {}
                Ok(value) => println!("{}", ops::repr(&value)),
                Err(err) => {
                    eprintln!("{}", err.to_string().red());
                    process::exit(1);
                }
            }
        }
    }
}
