//! `rgui` entry point.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use remote_gui::components::kind_by_name;
use remote_gui_script::Procedure;
use remote_gui_storage::Id;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Env => println!("{}", Procedure::StorageEnv.render()),
        Command::Template {
            shape,
            method,
            id,
            wire,
        } => {
            let procedure = Procedure::Method {
                target: Id::new(id),
                method,
                shape: shape.call_shape(),
            };
            if wire {
                match serde_json::to_string_pretty(&procedure.to_wire()) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Error encoding script: {e}");
                        std::process::exit(1);
                    }
                }
            } else {
                println!("{}", procedure.render());
            }
        }
        Command::Methods { kind } => {
            let Some(kind) = kind_by_name(&kind) else {
                eprintln!("Unknown element kind: {kind}");
                std::process::exit(1);
            };
            let ancestry: Vec<_> = kind.ancestry().map(|k| k.name).collect();
            println!("{}", ancestry.join(" < "));
            println!("events: {}", kind.events().join(", "));
            for decl in kind.methods() {
                println!("  {}{}", decl.name, cli::describe(&decl.shape));
            }
        }
        Command::Probe => println!("{}", Procedure::VersionProbe.render()),
    }
}
