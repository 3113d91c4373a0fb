use clap::Parser as CParser;
use colored::Colorize;
use log::error;

#[derive(CParser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Sunaba source file to tokenise/parse.
    file: std::path::PathBuf,

    /// Print the tokeniser output as JSON instead of parsing it.
    #[arg(long)]
    dump_tokens: bool,

    /// Print the parsed AST as JSON.
    #[arg(long)]
    dump_ast: bool,

    /// Increase log verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn level_for(verbosity: u8) -> log::Level {
    match verbosity {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    }
}

fn main() {
    let args = Cli::parse();
    simple_logger::init_with_level(level_for(args.verbose)).unwrap();

    let file_content = match std::fs::read_to_string(&args.file) {
        Ok(content) => content,
        Err(err) => {
            error!("could not read file '{}': {err}", args.file.to_string_lossy());
            std::process::exit(1);
        }
    };

    let tokens = match sunaba::tokenise(&file_content) {
        Ok(tokens) => tokens,
        Err(err) => fail(&err),
    };

    if args.dump_tokens {
        println!("{}", sunaba::tokens_to_json(&tokens).unwrap());
        return;
    }

    let program = match sunaba::parse(&tokens) {
        Ok(program) => program,
        Err(err) => fail(&err),
    };

    if args.dump_ast {
        println!("{}", sunaba::program_to_json(&program).unwrap());
    }
}

fn fail(err: &sunaba::ParseError) -> ! {
    let message = err.message();
    let (prefix, rest) = message.split_once(':').unwrap_or((message, ""));
    eprintln!("{}:{rest}", prefix.red().bold());
    std::process::exit(1);
}
