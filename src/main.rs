use clap::Parser;
use ragkit::cli::commands::{Cli, Commands};
use ragkit::config::Config;
use ragkit::RagKit;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let kit = match RagKit::new(&config).await {
        Ok(kit) => kit,
        Err(e) => {
            eprintln!("Error initializing ragkit: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(&kit, &config, cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(
    kit: &RagKit,
    config: &Config,
    cli: Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Analyze {
            text,
            instruction,
            collection,
            n_context,
        } => {
            kit.admit(&cli.key).await?;
            let result = kit
                .analyze_with_context(
                    &text,
                    &collection,
                    &instruction,
                    n_context.unwrap_or(config.default_n_context),
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Recommend {
            input,
            max_products,
        } => {
            kit.admit(&cli.key).await?;
            let result = kit.recommend_products(&input, max_products).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Ingest {
            document,
            collection,
            metadata,
        } => {
            kit.admit(&cli.key).await?;
            let metadata = metadata
                .map(|m| serde_json::from_str(&m))
                .transpose()
                .map_err(|e| format!("invalid metadata JSON: {e}"))?;
            let result = kit.ingest_document(&document, metadata, &collection).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Search {
            query,
            collection,
            n_results,
            no_rerank,
        } => {
            kit.admit(&cli.key).await?;
            let results = kit
                .semantic_search(
                    &query,
                    &collection,
                    n_results.unwrap_or(config.default_n_results),
                    !no_rerank,
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Item { id } => {
            let item = kit.item_details(&id).await?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        Commands::Collections => {
            let names = kit.list_collections().await?;
            for name in names {
                println!("{name}");
            }
        }
        Commands::CollectionInfo { name } => {
            let info = kit.collection_info(&name).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::DeleteCollection { name } => {
            kit.delete_collection(&name).await?;
            println!("Deleted collection {name}");
        }
    }
    Ok(())
}
