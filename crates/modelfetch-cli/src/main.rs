//! CLI entry point - the composition root.
//!
//! Commands that talk to the hub get a `CliContext` from bootstrap; the
//! rest only need the parsed arguments.

use clap::{CommandFactory, Parser};

use modelfetch_cli::handlers::{self, download::DownloadArgs};
use modelfetch_cli::{Cli, CliConfig, CliError, Commands, bootstrap, init_tracing};

#[tokio::main]
async fn main() {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(err) => {
            if !matches!(err.downcast_ref::<CliError>(), Some(CliError::Incomplete)) {
                eprintln!("Error: {err:#}");
            }
            CliError::exit_code_for(&err)
        }
    };

    // Exit without dropping the runtime: a snapshot abandoned by Ctrl-C may
    // still be running on a blocking thread.
    std::process::exit(i32::from(code));
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Download {
            identifier,
            files,
            exclude,
            category,
            dest,
            snapshot,
            token,
            collection,
            public,
            cli_flavor,
        } => {
            let ctx = bootstrap(CliConfig {
                download_root: cli.download_root,
                endpoint: cli.endpoint,
                cli_flavor,
            })?;
            let args = DownloadArgs {
                identifier,
                files,
                exclude,
                category,
                dest,
                snapshot,
                token,
                collection,
                public,
            };
            handlers::download::execute(&ctx, args).await?;
        }
        Commands::Collection { source, public } => {
            let ctx = bootstrap(CliConfig {
                download_root: cli.download_root,
                endpoint: cli.endpoint,
                ..CliConfig::default()
            })?;
            handlers::collection::execute(&ctx, &source, public).await?;
        }
        Commands::Categories => handlers::categories::execute(),
        Commands::Paths => handlers::paths::execute(cli.download_root.as_deref())?,
    }

    Ok(())
}
