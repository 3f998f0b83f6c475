use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use mongodb::bson::Bson;
use std::time::Instant;
use tracing::info;

use aggregations::{CatalogQuery, IndexBuilder, QueryReport, QueryRunner, standard_queries};
use catalog::DEFAULT_DATABASE;
use extract::{DEFAULT_PORT, MovieScope, PostgresConfig, SchemaChange};
use migrator::{
    ConflictPolicy, DEFAULT_MONGO_PORT, LoadOptions, LoadSummary, MigrateConfig, Migrator,
    MongoConfig, connect_mongo,
};

/// reel-migrate - move the IMDB catalog from Postgres into MongoDB
#[derive(Parser)]
#[command(name = "reel-migrate")]
#[command(about = "Migrate the IMDB catalog into MongoDB and query it", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Connection settings; every flag falls back to an environment variable
/// (a `.env` file in the working directory is read first).
#[derive(Args)]
struct ConnectionArgs {
    /// Host shared by MongoDB and Postgres
    #[arg(long, env = "REEL_HOST", default_value = "localhost")]
    host: String,

    /// Port MongoDB is listening on
    #[arg(long, env = "REEL_MONGO_PORT", default_value_t = DEFAULT_MONGO_PORT)]
    mongo_port: u16,

    /// MongoDB database holding the Members and Movies collections
    #[arg(long, env = "REEL_MONGO_DB", default_value = DEFAULT_DATABASE)]
    mongo_db: String,

    /// Postgres host, when it differs from --host
    #[arg(long, env = "REEL_PG_HOST")]
    pg_host: Option<String>,

    /// Port Postgres is listening on
    #[arg(long, env = "REEL_PG_PORT", default_value_t = DEFAULT_PORT)]
    pg_port: u16,

    /// Postgres database name
    #[arg(long, env = "REEL_PG_DATABASE")]
    pg_database: Option<String>,

    /// Postgres user name
    #[arg(long, env = "REEL_PG_USER")]
    pg_user: Option<String>,

    /// Postgres password
    #[arg(long, env = "REEL_PG_PASSWORD", hide_env_values = true, default_value = "")]
    pg_password: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy members and movies from Postgres into MongoDB
    Load(LoadArgs),

    /// Run the catalog queries and print their results with timings
    Query {
        /// Run only query N (1-5)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        only: Option<u8>,

        /// Print rows as relaxed extended JSON
        #[arg(long)]
        json: bool,
    },

    /// Create the secondary indexes used by the queries
    Index,

    /// Load, query, index, then query again
    Run {
        #[command(flatten)]
        load: LoadArgs,

        /// Print rows as relaxed extended JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct LoadArgs {
    /// What to do when a document id already exists in the target
    #[arg(long, value_enum, default_value_t = OnConflict::Fail)]
    on_conflict: OnConflict,

    /// Drop the Members and Movies collections before loading
    #[arg(long)]
    drop_existing: bool,

    /// Also copy movies missing a genre, director, writer, producer or cast
    #[arg(long)]
    all_movies: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OnConflict {
    /// Abort on the first duplicate id
    Fail,
    /// Replace existing documents
    Upsert,
}

impl From<&LoadArgs> for LoadOptions {
    fn from(args: &LoadArgs) -> Self {
        LoadOptions {
            conflict: match args.on_conflict {
                OnConflict::Fail => ConflictPolicy::Fail,
                OnConflict::Upsert => ConflictPolicy::Upsert,
            },
            drop_existing: args.drop_existing,
            movies: if args.all_movies {
                MovieScope::All
            } else {
                MovieScope::Complete
            },
        }
    }
}

impl ConnectionArgs {
    fn mongo(&self) -> MongoConfig {
        MongoConfig {
            host: self.host.clone(),
            port: self.mongo_port,
            database: self.mongo_db.clone(),
        }
    }

    /// Full configuration; fails when the Postgres settings are missing.
    fn migrate_config(&self) -> Result<MigrateConfig> {
        let database = self
            .pg_database
            .clone()
            .ok_or_else(|| anyhow!("--pg-database (or REEL_PG_DATABASE) is required"))?;
        let user = self
            .pg_user
            .clone()
            .ok_or_else(|| anyhow!("--pg-user (or REEL_PG_USER) is required"))?;

        let config = MigrateConfig {
            mongo: self.mongo(),
            postgres: PostgresConfig {
                host: self.pg_host.clone().unwrap_or_else(|| self.host.clone()),
                port: self.pg_port,
                database,
                user,
                password: self.pg_password.clone(),
            },
        };
        config.validate().context("Invalid connection settings")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; flags and the process environment still apply
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match &cli.command {
        Commands::Load(args) => handle_load(&cli.connection, args).await?,
        Commands::Query { only, json } => handle_query(&cli.connection, *only, *json).await?,
        Commands::Index => handle_index(&cli.connection).await?,
        Commands::Run { load, json } => handle_run(&cli.connection, load, *json).await?,
    }

    Ok(())
}

/// Handle the 'load' command
async fn handle_load(connection: &ConnectionArgs, args: &LoadArgs) -> Result<()> {
    let config = connection.migrate_config()?;
    let mut migrator = Migrator::connect(&config, LoadOptions::from(args))
        .await
        .context("Failed to connect")?;

    let summary = migrator.run().await.context("Load aborted")?;
    print_summary(&summary);

    migrator.close().await?;
    Ok(())
}

/// Handle the 'query' command
async fn handle_query(connection: &ConnectionArgs, only: Option<u8>, json: bool) -> Result<()> {
    let database = connect_mongo(&connection.mongo())
        .await
        .context("Failed to connect to MongoDB")?;

    let mut queries = standard_queries();
    if let Some(n) = only {
        queries = vec![queries.swap_remove(usize::from(n) - 1)];
    }

    run_queries(&QueryRunner::new(database), &queries, json).await
}

/// Handle the 'index' command
async fn handle_index(connection: &ConnectionArgs) -> Result<()> {
    let database = connect_mongo(&connection.mongo())
        .await
        .context("Failed to connect to MongoDB")?;

    let names = IndexBuilder::new(database).create_all().await?;
    println!("{}", "Indexes:".bold().blue());
    for name in names {
        println!("{}{}", "• ".green(), name);
    }
    Ok(())
}

/// Handle the 'run' command
async fn handle_run(connection: &ConnectionArgs, load: &LoadArgs, json: bool) -> Result<()> {
    let start = Instant::now();
    let config = connection.migrate_config()?;
    let mut migrator = Migrator::connect(&config, LoadOptions::from(load))
        .await
        .context("Failed to connect")?;

    let summary = migrator.run().await.context("Load aborted")?;
    print_summary(&summary);

    let database = migrator.database().clone();
    migrator.close().await?;

    let runner = QueryRunner::new(database.clone());
    let queries = standard_queries();

    println!("{}", "Before indexing...".bold().yellow());
    run_queries(&runner, &queries, json).await?;

    IndexBuilder::new(database).create_all().await?;

    println!("{}", "After indexing...".bold().yellow());
    run_queries(&runner, &queries, json).await?;

    info!("Finished in {:.2?}", start.elapsed());
    Ok(())
}

async fn run_queries(
    runner: &QueryRunner,
    queries: &[Box<dyn CatalogQuery>],
    json: bool,
) -> Result<()> {
    for report in runner.run_all(queries).await? {
        print_report(&report, json)?;
    }
    Ok(())
}

/// Print every row, then the timing line
fn print_report(report: &QueryReport, json: bool) -> Result<()> {
    println!(
        "{} {}",
        format!("Query {} results", report.name).bold().blue(),
        format!("({})", report.description).dimmed()
    );
    for row in &report.rows {
        if json {
            let value = Bson::Document(row.clone()).into_relaxed_extjson();
            println!("{}", serde_json::to_string(&value)?);
        } else {
            println!("{}", row);
        }
    }
    println!(
        "--- {} seconds for {} ---",
        report.elapsed.as_secs_f64(),
        report.name
    );
    Ok(())
}

fn print_summary(summary: &LoadSummary) {
    println!("{}", "Load complete:".bold().blue());
    println!("{}Members: {}", "• ".green(), summary.members);
    println!("{}Movies: {}", "• ".green(), summary.movies);
    let schema = match summary.schema {
        SchemaChange::Altered => "movie.avgrating converted to float",
        SchemaChange::AlreadyFloat => "movie.avgrating already float",
    };
    println!("{}Schema: {}", "• ".green(), schema);
}
