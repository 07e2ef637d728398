use std::process::exit;

use anyhow::Result;
use cafe_client::CafeClient;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        println!(
            "Please provide 2 arguments.
The first one for the API origin such as http://localhost:8000.
The second one is what to fetch: health, menu, additions, config, stop_list or catalog
Example: cafe-client http://localhost:8000 menu"
        );
        exit(1);
    }
    let client = CafeClient::new(args[1].as_str());
    match args[2].as_str() {
        "health" => println!("healthy: {}", client.is_healthy().await),
        "catalog" => println!("{:#?}", client.load_catalog().await?),
        resource => {
            let value: serde_json::Value = client.get_json(&format!("/{}", resource)).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}
