//! Purpose: `chainview` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Commands emit stable JSON on stdout.
//! Invariants: Errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use chainview::api::{
    Error, ErrorKind, ObjectId, ObjectStore, ParseObjectIdError, Scanner, StoreLayout,
    decode_record, load_shard, to_exit_code,
};

#[derive(Parser)]
#[command(
    name = "chainview",
    version,
    about = "Read-only scanner and index for object-database shard files"
)]
struct Cli {
    /// Witness data directory containing blockchain/object_database.
    #[arg(long, global = true, value_name = "DIR", default_value = "witness_node_data_dir")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print record counts and per-shard scan statistics.
    Stats,
    /// Look up one account by name or canonical id, with its balances.
    Account {
        /// Account name, or a canonical id such as 1.2.7.
        target: String,
    },
    /// List all balances owned by an account id.
    Balances {
        /// Canonical owner id such as 1.2.42.
        id: String,
    },
    /// Dump the first decoded records of one shard as JSON lines.
    Objects {
        shard: ShardKind,
        /// Maximum number of records to print.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShardKind {
    Accounts,
    Names,
    Balances,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Stats => run_stats(&cli.data_dir),
        Command::Account { target } => run_account(&cli.data_dir, &target),
        Command::Balances { id } => run_balances(&cli.data_dir, &id),
        Command::Objects { shard, limit } => run_objects(&cli.data_dir, shard, limit),
    }
}

fn run_stats(data_dir: &PathBuf) -> Result<(), Error> {
    let store = ObjectStore::open(data_dir)?;
    let index = store.snapshot();
    let report = json!({
        "data_dir": store.layout().root().display().to_string(),
        "accounts": index.account_count(),
        "names": index.name_count(),
        "balances": index.balance_count(),
        "scan": index.stats(),
    });
    print_json(&report)
}

fn run_account(data_dir: &PathBuf, target: &str) -> Result<(), Error> {
    let store = ObjectStore::open(data_dir)?;
    let index = store.snapshot();

    let account = index
        .account_by_name(target)
        .or_else(|| {
            target
                .parse::<ObjectId>()
                .ok()
                .and_then(|id| index.account_by_id(&id))
        })
        .ok_or_else(|| {
            Error::new(ErrorKind::NotFound)
                .with_message(format!("account not found: {target}"))
                .with_hint("Pass an account name or a canonical id such as 1.2.7.")
        })?;

    let report = json!({
        "account": account,
        "balances": index.balances(&account.id),
    });
    print_json(&report)
}

fn run_balances(data_dir: &PathBuf, id: &str) -> Result<(), Error> {
    let owner: ObjectId = id.parse().map_err(|err: ParseObjectIdError| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("invalid owner id: {id}"))
            .with_hint("Owner ids have the form space.type.instance, for example 1.2.42.")
            .with_source(err)
    })?;

    let store = ObjectStore::open(data_dir)?;
    let index = store.snapshot();
    let report = json!({
        "owner_id": owner,
        "balances": index.balances(&owner),
    });
    print_json(&report)
}

fn run_objects(data_dir: &PathBuf, shard: ShardKind, limit: usize) -> Result<(), Error> {
    let layout = StoreLayout::new(data_dir);
    let path = match shard {
        ShardKind::Accounts => layout.accounts_path(),
        ShardKind::Names => layout.name_mappings_path(),
        ShardKind::Balances => layout.balances_path(),
    };

    let data = load_shard(&path)?;
    let records = Scanner::new(data.bytes())
        .filter_map(|frame| decode_record(&frame).map(|record| (frame.offset, record)));
    for (offset, record) in records.take(limit) {
        let line = json!({
            "offset": offset,
            "marker": record.marker().as_str(),
            "record": record,
        });
        // One compact line per record so the output pipes cleanly.
        println!("{line}");
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<(), Error> {
    let text = serde_json::to_string_pretty(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode output")
            .with_source(err)
    })?;
    println!("{text}");
    Ok(())
}

fn emit_error(err: &Error) {
    let mut body = json!({
        "error": {
            "kind": err.kind().as_str(),
            "message": err.to_string(),
        }
    });
    if let Some(hint) = err.hint() {
        body["error"]["hint"] = json!(hint);
    }
    eprintln!("{body}");
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
