//! services/storefront/src/cli/mod.rs
//!
//! Command line surface of the `robokit` binary.

pub mod catalog;
pub mod course;
pub mod manifest;
pub mod render;
pub mod session;

use crate::context::AppContext;
use crate::error::CliError;
use clap::{Parser, Subcommand};
use robokit_core::catalog::SortKey;
use robokit_core::domain::{CourseListQuery, CourseStatus, Difficulty};
use std::path::PathBuf;

/// Browse and administer the educational robotics kit catalog
#[derive(Parser, Debug)]
#[clap(name = "robokit", version)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the backend is reachable
    Health,

    /// Sign in and remember the session
    Login {
        #[clap(long)]
        user: String,

        #[clap(long)]
        password: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in account, if the backend still accepts it
    Whoami,

    /// List the catalog the way the storefront grid shows it
    Catalog(CatalogArgs),

    /// Administer courses
    Course {
        #[clap(subcommand)]
        command: CourseCommand,
    },
}

#[derive(Parser, Debug, Default)]
pub struct CatalogArgs {
    /// Category name (substring match); "Todos" means any
    #[clap(long)]
    pub category: Option<String>,

    /// Difficulty label, e.g. "Principiante" or "advanced"
    #[clap(long)]
    pub level: Option<String>,

    /// Age range such as "8-12 años"
    #[clap(long)]
    pub age: Option<String>,

    /// Text to look for in title, description, category and objective
    #[clap(long)]
    pub search: Option<String>,

    /// Upper bound on the price
    #[clap(long)]
    pub max_price: Option<f64>,

    /// most-recent, price-asc, price-desc or most-active
    #[clap(long, default_value = "most-recent")]
    pub sort: SortKey,
}

/// Server-side filters for the admin course table.
#[derive(Parser, Debug, Default)]
pub struct CourseListArgs {
    #[clap(long)]
    pub category: Option<String>,

    /// beginner, intermediate or advanced (Spanish labels work too)
    #[clap(long)]
    pub level: Option<Difficulty>,

    #[clap(long)]
    pub search: Option<String>,

    #[clap(long)]
    pub min_price: Option<f64>,

    #[clap(long)]
    pub max_price: Option<f64>,

    /// Include deactivated courses
    #[clap(long)]
    pub all: bool,
}

impl CourseListArgs {
    pub fn to_query(&self) -> CourseListQuery {
        CourseListQuery {
            category: self.category.clone(),
            difficulty: self.level,
            search: self.search.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            include_inactive: self.all,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CourseCommand {
    /// List courses with their status and active flag
    List(CourseListArgs),

    /// Show a course and its lessons
    Show { id: i64 },

    /// Delete a course
    Delete { id: i64 },

    /// Change the publication status of a course
    Status { id: i64, status: CourseStatus },

    /// Make a course visible again
    Activate { id: i64 },

    /// Hide a course without deleting it
    Deactivate { id: i64 },

    /// Summarize every course, including inactive ones
    Stats,

    /// List the categories known to the backend
    Categories,

    /// Create a course and its lessons from a JSON manifest
    Create {
        /// Path to the manifest; file paths inside it are relative to it
        manifest: PathBuf,
    },
}

/// Runs one parsed command to completion.
pub async fn run(ctx: &AppContext, cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Health => session::health(ctx).await,
        Command::Login { user, password } => session::login(ctx, user, password).await,
        Command::Logout => session::logout(ctx).await,
        Command::Whoami => session::whoami(ctx).await,
        Command::Catalog(args) => catalog::list(ctx, &args).await,
        Command::Course { command } => match command {
            CourseCommand::List(args) => course::list(ctx, &args).await,
            CourseCommand::Show { id } => course::show(ctx, id).await,
            CourseCommand::Delete { id } => course::delete(ctx, id).await,
            CourseCommand::Status { id, status } => course::set_status(ctx, id, status).await,
            CourseCommand::Activate { id } => course::set_active(ctx, id, true).await,
            CourseCommand::Deactivate { id } => course::set_active(ctx, id, false).await,
            CourseCommand::Stats => course::stats(ctx).await,
            CourseCommand::Categories => course::categories(ctx).await,
            CourseCommand::Create { manifest } => course::create(ctx, &manifest).await,
        },
    }
}
