use hive_nodes_directory::DirectoryResolver;
use hive_nodes_sdk::{HiveClient, DEFAULT_API_NODE};
use hive_nodes_types::AccountName;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api = std::env::var("HIVE_API_URL").unwrap_or_else(|_| DEFAULT_API_NODE.to_string());
    let account: AccountName = std::env::var("HIVE_NODES_ACCOUNT")
        .unwrap_or_else(|_| "flowerengine".to_string())
        .parse()?;

    let client = HiveClient::new(api)?;
    let resolver = DirectoryResolver::new(Arc::new(client));

    let directory = resolver.resolve(&account).await?;
    println!("Available nodes for {account}:");
    for (idx, node) in directory.nodes.iter().enumerate() {
        println!("{}. {node}", idx + 1);
    }
    if !directory.failing_nodes.is_empty() {
        println!("Failing nodes:");
        for (node, reason) in &directory.failing_nodes {
            println!("- {node}: {reason}");
        }
    }

    Ok(())
}
