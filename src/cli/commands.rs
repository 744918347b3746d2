use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ragkit", about = "Retrieval-augmented orchestration core")]
pub struct Cli {
    /// Caller key used for rate limiting
    #[arg(long, global = true, default_value = "cli")]
    pub key: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze text with context retrieved from a collection
    Analyze {
        text: String,
        /// Instruction for the analysis
        instruction: String,
        #[arg(long, default_value = "documents")]
        collection: String,
        /// Number of context documents to retrieve
        #[arg(long)]
        n_context: Option<usize>,
    },
    /// Generate product recommendations from free-form input
    Recommend {
        input: String,
        #[arg(long, default_value = "5")]
        max_products: usize,
    },
    /// Store a document and analyze it
    Ingest {
        document: String,
        #[arg(long, default_value = "documents")]
        collection: String,
        /// Optional JSON metadata for the stored document
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Semantic search with optional rerank
    Search {
        query: String,
        #[arg(long, default_value = "documents")]
        collection: String,
        #[arg(long)]
        n_results: Option<usize>,
        /// Skip the generation-backed rerank pass
        #[arg(long)]
        no_rerank: bool,
    },
    /// Look up one catalog item by id
    Item { id: String },
    /// List collections in the vector store
    Collections,
    /// Show one collection's name, metadata, and document count
    CollectionInfo { name: String },
    /// Delete a collection
    DeleteCollection { name: String },
}
