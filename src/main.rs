use std::fs;
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use hotwatch::notify::Event;
use hotwatch::{
    blocking::{Flow, Hotwatch},
    EventKind,
};
use miette::{bail, miette, IntoDiagnostic, Result};

use weft::{
    compile, decompile, Assembler, Code, Dialect, Disassembler, Executable, Processor, TermIo,
};

/// Weft is a complete toolchain for the Whitespace programming language.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a `.ws` or `.wsa` file to run
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a whitespace `.ws` or assembly `.wsa` file and output to terminal
    Run {
        /// `.ws` or `.wsa` file to run
        name: PathBuf,
        /// Assembly dialect to read `.wsa` sources in
        #[arg(short, long, default_value = "v2")]
        dialect: String,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
    },
    /// Assemble a `.wsa` file into a whitespace `.ws` binary
    Compile {
        /// `.wsa` file to assemble
        name: PathBuf,
        /// Destination to output the .ws file
        dest: Option<PathBuf>,
        /// Assembly dialect of the source
        #[arg(short, long, default_value = "v2")]
        dialect: String,
    },
    /// Disassemble a `.ws` binary into assembly for a chosen dialect
    Disasm {
        /// `.ws` file to disassemble
        name: PathBuf,
        /// Destination to output the .wsa file
        dest: Option<PathBuf>,
        /// Assembly dialect to write
        #[arg(short, long, default_value = "v2")]
        dialect: String,
    },
    /// Translate assembly between two dialects
    Translate {
        /// `.wsa` file to translate
        name: PathBuf,
        /// Destination to output the translated file
        dest: Option<PathBuf>,
        /// Dialect of the source
        #[arg(long, default_value = "v1")]
        from: String,
        /// Dialect to write
        #[arg(long, default_value = "v2")]
        to: String,
    },
    /// Check a source file without running or writing output
    Check {
        /// File to check
        name: PathBuf,
        /// Assembly dialect to read `.wsa` sources in
        #[arg(short, long, default_value = "v2")]
        dialect: String,
    },
    /// Place a watch on a source file to receive constant toolchain updates
    Watch {
        /// File to watch
        name: PathBuf,
        /// Assembly dialect to read `.wsa` sources in
        #[arg(short, long, default_value = "v2")]
        dialect: String,
    },
}

fn main() -> miette::Result<()> {
    use MsgColor::*;
    let args = Args::parse();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(weft::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    if let Some(command) = args.command {
        match command {
            Command::Run {
                name,
                dialect,
                minimal,
            } => run(&name, &dialect, minimal),
            Command::Compile {
                name,
                dest,
                dialect,
            } => {
                file_message(Green, "Assembling", &name);
                let code = load_code(&name, &dialect)?;
                let out_file_name =
                    dest.unwrap_or(name.with_extension("ws").file_name().unwrap().into());
                fs::write(&out_file_name, decompile(&code)?).into_diagnostic()?;
                message(Green, "Finished", "emit binary");
                file_message(Green, "Saved", &out_file_name);
                Ok(())
            }
            Command::Disasm {
                name,
                dest,
                dialect,
            } => {
                file_message(Green, "Disassembling", &name);
                let contents = fs::read_to_string(&name).into_diagnostic()?;
                let code = compile(&contents)?;
                let text = Disassembler::new(&dialect_named(&dialect)?).disassemble(&code);
                let out_file_name =
                    dest.unwrap_or(name.with_extension("wsa").file_name().unwrap().into());
                fs::write(&out_file_name, text + "\n").into_diagnostic()?;
                file_message(Green, "Saved", &out_file_name);
                Ok(())
            }
            Command::Translate {
                name,
                dest,
                from,
                to,
            } => {
                file_message(Green, "Translating", &name);
                let contents = fs::read_to_string(&name).into_diagnostic()?;
                let code = Assembler::new(&dialect_named(&from)?)?.assemble(&contents)?;
                let text = Disassembler::new(&dialect_named(&to)?).disassemble(&code);
                let out_file_name = dest.unwrap_or(name.clone());
                fs::write(&out_file_name, text + "\n").into_diagnostic()?;
                file_message(Green, "Saved", &out_file_name);
                Ok(())
            }
            Command::Check { name, dialect } => {
                file_message(Green, "Checking", &name);
                check(&name, &dialect)?;
                message(Green, "Success", "no errors found!");
                Ok(())
            }
            Command::Watch { name, dialect } => {
                if !name.exists() {
                    bail!("File does not exist. Exiting...")
                }
                // Vim breaks if watching a single file
                let folder_path = match name.parent() {
                    Some(pth) if pth.is_dir() => pth.to_path_buf(),
                    _ => Path::new(".").to_path_buf(),
                };

                // Clear screen and move cursor to top left
                print!("\x1B[2J\x1B[2;1H");
                file_message(Green, "Watching", &name);
                message(Cyan, "Help", "press CTRL+C to exit");

                let mut watcher = Hotwatch::new_with_custom_delay(Duration::from_millis(500))
                    .into_diagnostic()?;

                watcher
                    .watch(folder_path, move |event: Event| match event.kind {
                        // Watch remove for vim changes
                        EventKind::Modify(_) | EventKind::Remove(_) => {
                            // Clear screen
                            print!("\x1B[2J\x1B[2;1H");
                            file_message(Green, "Watching", &name);
                            message(Green, "Re-checking", "file change detected");
                            message(Cyan, "Help", "press CTRL+C to exit");

                            // Now we are developing software (makes reruns more obvious)
                            sleep(Duration::from_millis(50));

                            match check(&name, &dialect) {
                                Ok(_) => {
                                    message(Green, "Success", "no errors found!");
                                }
                                Err(e) => {
                                    println!("\n{:?}", e);
                                }
                            };
                            Flow::Continue
                        }
                        _ => Flow::Continue,
                    })
                    .into_diagnostic()?;
                watcher.run();
                Ok(())
            }
        }
    } else {
        if let Some(path) = args.path {
            run(&path, "v2", false)
        } else {
            println!("\n~ weft v{VERSION} ~");
            println!("{}", LOGO.truecolor(183, 201, 226).bold());
            println!("{SHORT_INFO}");
            std::process::exit(0);
        }
    }
}

#[allow(unused)]
enum MsgColor {
    Green,
    Cyan,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &PathBuf) {
    let right = format!("target {}", right.to_str().unwrap());
    message(color, left, &right);
}

fn message<S>(color: MsgColor, left: S, right: S)
where
    S: Colorize + std::fmt::Display,
{
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    println!("{left:>12} {right}");
}

fn dialect_named(name: &str) -> Result<Dialect> {
    Dialect::by_name(name).ok_or_else(|| {
        miette!(
            help = format!("known dialects are {}.", Dialect::NAMES.join(", ")),
            "Unknown dialect '{name}'"
        )
    })
}

/// Load either program representation into an instruction sequence.
fn load_code(name: &Path, dialect: &str) -> Result<Code> {
    let Some(ext) = name.extension() else {
        bail!("File has no extension. Exiting...");
    };
    let contents = fs::read_to_string(name).into_diagnostic()?;
    match ext.to_str().unwrap() {
        "ws" => compile(&contents),
        "wsa" | "asm" => Assembler::new(&dialect_named(dialect)?)?.assemble(&contents),
        _ => bail!("File has unknown extension. Exiting..."),
    }
}

fn check(name: &Path, dialect: &str) -> Result<Executable> {
    let code = load_code(name, dialect)?;
    Executable::resolve(&code)
}

fn run(name: &Path, dialect: &str, minimal: bool) -> Result<()> {
    if !minimal {
        file_message(MsgColor::Green, "Assembling", &name.to_path_buf());
    }
    let exe = check(name, dialect)?;
    let mut processor = Processor::new(exe, TermIo);

    if !minimal {
        message(MsgColor::Green, "Running", "resolved program");
    }
    processor.run()?;

    if !minimal {
        println!();
        file_message(MsgColor::Green, "Completed", &name.to_path_buf());
    }
    Ok(())
}

const LOGO: &str = r#"
                     .I)
 ...  ..  ...   .totoxoto:
 :%: .%: :%:   .%:  :%.
  %t.%t%.t%    t%ototo.
  .%t% t%t.   .%:  .%.
   :%:  %:    t%otox.  t.
    "    "     "    "   "#;

const SHORT_INFO: &str = r"
Welcome to weft, an all-in-one toolchain for working with programs woven
out of whitespace: run them, assemble them in several mnemonic dialects,
and convert between text and binary forms.
Please use `-h` or `--help` to access the usage instructions and documentation.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
