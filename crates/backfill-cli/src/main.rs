mod backfill;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::backfill::{run_backfill, BackfillOptions};

#[derive(Debug, Parser)]
#[command(name = "engagement-backfill")]
#[command(about = "Backfill inferred post engagements from people's creation times")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    /// The subcommand to execute; a bare invocation runs the backfill with
    /// configured defaults.
    fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Run {
            tenant: None,
            dry_run: false,
        })
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Pair engaged people with their nearest post and insert missing engagements
    Run {
        /// Tenant to backfill; overrides BACKFILL_TENANT_ID
        #[arg(long)]
        tenant: Option<Uuid>,

        /// Fetch, match and check for existing engagements without inserting
        #[arg(long)]
        dry_run: bool,
    },
    /// Verify the store URL and credentials with a single read
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let command = Cli::parse().into_command();

    let config = backfill_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = backfill_rest::RestClient::new(
        &config.supabase_url,
        &config.supabase_service_key,
        &config.supabase_bearer_token,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build store client: {e}"))?;

    match command {
        Commands::Run { tenant, dry_run } => {
            let options = BackfillOptions {
                tenant_id: tenant.unwrap_or(config.tenant_id),
                dry_run,
                progress_every: config.progress_every,
            };
            let mut stdout = std::io::stdout().lock();
            run_backfill(&client, &options, &mut stdout).await?;
        }
        Commands::Ping => {
            client.ping().await?;
            println!("store reachable at {}", config.supabase_url);
        }
    }

    Ok(())
}
