use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "phup",
    version,
    about = "Manage installed PHP versions on Debian-based systems"
)]
pub struct Cli {
    /// Print debug logging to the terminal.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Stop an operation at the first failing command instead of running
    /// the remaining commands (the default keeps going).
    #[arg(long, global = true)]
    pub abort_on_error: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List installed PHP versions
    List {
        /// Emit the inventory as JSON
        #[arg(long)]
        json: bool,
    },
    /// Switch the system-wide php alternative to an installed version
    Use {
        /// Version identifier as shown by `phup list`, e.g. php8.3
        version: String,
    },
    /// Install a PHP version from ppa:ondrej/php
    Install {
        /// Version number, e.g. 8.3
        version: String,
    },
    /// Install extension packages for an installed version
    Extensions {
        /// Version identifier as shown by `phup list`
        version: String,
        /// Comma-separated extension names, e.g. curl,xml,mysql
        extensions: String,
    },
    /// Install Composer from getcomposer.org
    Composer,
    /// Remove PHP, Composer, and Laravel Herd from the system
    Uninstall {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
