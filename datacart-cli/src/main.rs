use std::{path::PathBuf, process};

use clap::{Parser, Subcommand};
use datacart::{
    cart_key,
    rollup::{count_under, CollectionIndex},
    storage::FileStorage,
    CartEntry, CartError, DataCart, DEFAULT_CART,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
enum Error {
    #[error("Cart operation failed")]
    Cart(#[from] CartError),
    #[error("Initialization error")]
    Initialization,
    #[error("No such file in the cart: {0}")]
    UnknownEntry(String),
}

#[derive(Parser, Debug)]
#[command(name = "dcart")]
#[command(about = "review and manipulate persisted data carts", long_about = None)]
struct Args {
    /// Name of the cart slot to operate on
    #[arg(short = 'c', long = "cart", default_value = DEFAULT_CART)]
    cart: String,

    /// Directory holding the persisted carts instead of the default store
    #[arg(long = "store-dir")]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the files in the cart
    List,
    /// Add a file to the cart
    Add {
        resource: String,
        path: String,

        /// Source location for the file's bytes
        #[arg(long = "url")]
        url: Option<String>,

        /// Descriptive title carried along with the file
        #[arg(long = "title")]
        title: Option<String>,

        /// File size in bytes carried along with the file
        #[arg(long = "size")]
        size: Option<u64>,
    },
    /// Remove a file from the cart
    Remove { resource: String, path: String },
    /// Mark a file as downloaded
    Mark {
        resource: String,
        path: String,

        /// Clear the downloaded mark instead
        #[arg(long = "undo")]
        undo: bool,
    },
    /// Show totals and per-collection counts
    Status,
    /// Empty the cart
    Clear,
    /// Delete the cart from the store entirely
    Forget,
}

fn main() {
    if let Ok(logpath) = get_logging_path() {
        let logfile = tracing_appender::rolling::daily(logpath, "log");
        tracing_subscriber::fmt()
            .compact()
            .with_writer(logfile)
            .init();
    }

    debug!("starting dcart");

    match run(Args::parse()) {
        Ok(()) => {
            debug!("closing dcart");
        }
        Err(err) => {
            error!("closing dcart with error: {:?}", err);
            eprintln!("dcart: {}", err);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let store = match &args.store_dir {
        Some(root) => FileStorage::new(root)?,
        None => FileStorage::durable()?,
    };

    match args.cmd {
        Command::List => {
            list(&DataCart::open(&args.cart, store));
            Ok(())
        }
        Command::Add {
            resource,
            path,
            url,
            title,
            size,
        } => {
            let mut entry = match url {
                Some(url) => CartEntry::with_url(&resource, &path, &url),
                None => CartEntry::new(&resource, &path),
            };
            if let Some(title) = title {
                entry.extra.insert("title".to_string(), Value::from(title));
            }
            if let Some(size) = size {
                entry.extra.insert("size".to_string(), Value::from(size));
            }

            let mut cart = DataCart::open(&args.cart, store);
            cart.add_item(entry);
            println!("{} file(s) in cart '{}'", cart.len(), cart.name());
            Ok(())
        }
        Command::Remove { resource, path } => {
            let mut cart = DataCart::open(&args.cart, store);
            if !cart.remove_item(&resource, &path) {
                return Err(Error::UnknownEntry(cart_key(&resource, &path)));
            }

            println!("{} file(s) in cart '{}'", cart.len(), cart.name());
            Ok(())
        }
        Command::Mark {
            resource,
            path,
            undo,
        } => {
            let mut cart = DataCart::open(&args.cart, store);
            if !cart.mark_downloaded(&resource, &path, !undo) {
                return Err(Error::UnknownEntry(cart_key(&resource, &path)));
            }

            println!(
                "{}/{} file(s) downloaded",
                cart.count_downloaded(),
                cart.len()
            );
            Ok(())
        }
        Command::Status => {
            status(&DataCart::open(&args.cart, store));
            Ok(())
        }
        Command::Clear => {
            DataCart::create(&args.cart, store);
            println!("cart '{}' emptied", args.cart);
            Ok(())
        }
        Command::Forget => {
            DataCart::open(&args.cart, store).forget();
            println!("cart '{}' forgotten", args.cart);
            Ok(())
        }
    }
}

fn list(cart: &DataCart) {
    let mut entries: Vec<_> = cart.entries().collect();
    entries.sort_by_key(|entry| entry.key());

    for entry in entries {
        let marker = if entry.is_downloaded() { "x" } else { " " };
        match &entry.download_url {
            Some(url) => println!("[{}] {}  <{}>", marker, entry.key(), url),
            None => println!("[{}] {}", marker, entry.key()),
        }
    }
}

fn status(cart: &DataCart) {
    println!(
        "cart '{}': {} file(s), {} downloaded",
        cart.name(),
        cart.len(),
        cart.count_downloaded()
    );

    let index = CollectionIndex::build(cart.entries());
    for collection in index.collections() {
        let counts = count_under(cart.entries(), collection);
        println!(
            "  {}: {}/{} downloaded",
            collection, counts.downloaded_count, counts.file_count
        );
    }
}

fn get_logging_path() -> Result<String, Error> {
    let cache_dir = match dirs::cache_dir() {
        Some(cache_dir) => match cache_dir.to_str() {
            Some(cache_dir_string) => cache_dir_string.to_string(),
            None => return Err(Error::Initialization),
        },
        None => return Err(Error::Initialization),
    };

    Ok(format!("{}{}", cache_dir, "/datacart/logs"))
}
