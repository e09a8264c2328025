extern crate structopt;

use failure::Error;
use slog::{o, Drain, Level, LevelFilter, Logger};
use structopt::StructOpt;

use std::path::PathBuf;
use std::process;

use ledgerkv::{open_store, EngineKind, Store, StoreConfig};

#[derive(StructOpt)]
#[structopt(
    name = "ledgerkv",
    about = "Inspect and edit a ledger key-value store.",
    raw(setting = "structopt::clap::AppSettings::ColoredHelp"),
    raw(setting = "structopt::clap::AppSettings::VersionlessSubcommands"),
    raw(setting = "structopt::clap::AppSettings::DisableHelpSubcommand")
)]
struct Opt {
    #[structopt(
        name = "FILE",
        long = "config",
        help = "Store configuration (RON, or JSON with a .json extension). Overrides --engine and --dir.",
        parse(from_os_str),
    )]
    config: Option<PathBuf>,
    #[structopt(
        name = "ENGINE-NAME",
        short = "e",
        long = "engine",
        help = "The storage engine.",
        default_value = "sled",
        raw(possible_values = "EngineKind::NAMES"),
    )]
    engine: EngineKind,
    #[structopt(
        name = "PATH",
        long = "dir",
        help = "The data directory.",
        default_value = "./",
        parse(from_os_str),
    )]
    dir: PathBuf,
    #[structopt(short = "v", long = "verbose", help = "Log engine events.")]
    verbose: bool,
    #[structopt(subcommand)]
    op: Operation,
}

#[derive(StructOpt)]
enum Operation {
    #[structopt(name = "put", about = "Set the value of a key")]
    Put {
        #[structopt(name = "KEY", help = "The key you want to change.")]
        key: String,
        #[structopt(name = "VALUE", help = "The value you want to set to the key.")]
        val: String,
    },
    #[structopt(name = "get", about = "Get the value of a key")]
    Get {
        #[structopt(name = "KEY", help = "The key you want to query.")]
        key: String,
    },
    #[structopt(name = "rm", about = "Remove a key")]
    Rmv {
        #[structopt(name = "KEY", help = "The key you want to remove.")]
        key: String,
    },
    #[structopt(name = "seek", about = "List the keys starting with a prefix")]
    Seek {
        #[structopt(name = "PREFIX", help = "The key prefix. List every key if omitted.")]
        prefix: Option<String>,
    },
}

fn logger(verbose: bool) -> Logger {
    let level = if verbose { Level::Debug } else { Level::Warning };
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(LevelFilter::new(drain, level).fuse(), o!())
}

fn run(opt: Opt, log: Logger) -> Result<(), Error> {
    let cfg = match opt.config {
        Some(ref path) => StoreConfig::load(path)?,
        None => StoreConfig::new(opt.engine, &opt.dir),
    };
    let store = open_store(&cfg, log)?;

    match opt.op {
        Operation::Put { key, val } => store.put(key.as_bytes(), val.as_bytes())?,
        Operation::Get { key } => match store.get(key.as_bytes()) {
            Ok(val) => println!("{}", String::from_utf8_lossy(&val)),
            Err(ref e) if e.is_not_found() => println!("Key not found"),
            Err(e) => return Err(e.into()),
        },
        Operation::Rmv { key } => store.delete(key.as_bytes())?,
        Operation::Seek { prefix } => {
            let prefix = prefix.unwrap_or_default();
            store.seek(prefix.as_bytes(), &mut |k, v| {
                println!(
                    "{} = {}",
                    String::from_utf8_lossy(k),
                    String::from_utf8_lossy(v)
                )
            })?
        }
    }

    store.close()?;
    Ok(())
}

fn main() {
    let opt = Opt::from_args();
    let log = logger(opt.verbose);

    let code = match run(opt, log.clone()) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}.", e);
            1
        }
    };
    // Flush the async drain before exiting.
    drop(log);
    process::exit(code);
}
