//! Command-line interface for inspecting the generated scripts.

use clap::{Parser, Subcommand, ValueEnum};
use remote_gui_script::CallShape;

#[derive(Parser)]
#[command(name = "rgui")]
#[command(about = "Inspect the scripts exchanged with a remote GUI runtime", long_about = None)]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the storage environment bootstrap
    Env,
    /// Print the script generated for one method call
    Template {
        shape: Shape,
        method: String,
        /// Id of the target object
        #[arg(long, default_value = "00000000-0000-4000-8000-000000000000")]
        id: String,
        /// Print the wire form (source and parameter names) as JSON
        #[arg(long)]
        wire: bool,
    },
    /// List the events and methods of an element kind
    Methods { kind: String },
    /// Print the library version probe
    Probe,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Shape {
    Getter,
    Action,
    RefSetter,
    RefGetter,
    RefInsert,
    RefAt,
    RefArray,
    ColorSetter,
    ClipboardSetter,
}

impl Shape {
    /// Plain calls take no parameters here.
    pub fn call_shape(self) -> CallShape {
        match self {
            Shape::Getter => CallShape::Plain {
                params: &[],
                returns: true,
            },
            Shape::Action => CallShape::Plain {
                params: &[],
                returns: false,
            },
            Shape::RefSetter => CallShape::RefSetter,
            Shape::RefGetter => CallShape::RefGetter,
            Shape::RefInsert => CallShape::RefInsert,
            Shape::RefAt => CallShape::RefAt,
            Shape::RefArray => CallShape::RefArray,
            Shape::ColorSetter => CallShape::ColorSetter,
            Shape::ClipboardSetter => CallShape::ClipboardSetter,
        }
    }
}

/// One-line description of a call shape for `rgui methods`.
pub fn describe(shape: &CallShape) -> String {
    match shape {
        CallShape::Plain { params, returns } => {
            let arrow = if *returns { " -> value" } else { "" };
            format!("({}){arrow}", params.join(", "))
        }
        CallShape::MultiGet { names } => format!("() -> {{{}}}", names.join(", ")),
        CallShape::RefGetter | CallShape::RefAt => format!("({}) -> ref", shape.params().join(", ")),
        CallShape::RefArray => "() -> [ref]".to_string(),
        other => format!("({})", other.params().join(", ")),
    }
}
