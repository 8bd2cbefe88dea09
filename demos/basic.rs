//! Basic example demonstrating the Travis API client.
//!
//! Run with:
//! ```
//! TRAVIS_TOKEN=your-token cargo run --example basic
//! ```

use travisapi::TravisClient;

#[tokio::main]
async fn main() -> travisapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Travis client...");
    let client = TravisClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // List the first page of repositories
    println!("\n--- Listing Repositories (first page) ---");
    let repos = client.repositories().await?;
    println!("Status: {}", repos.status());

    let listing = repos.get("repositories").into_document();
    let Some(listing) = listing else {
        println!("No repository listing in response: {}", repos.body());
        return Ok(());
    };

    for repo in listing.items() {
        println!(
            "  - {} (id {})",
            repo.get("slug").as_str().unwrap_or("?"),
            repo.get("id").as_i64().unwrap_or(0),
        );
    }

    // Follow the first repository's link to the full resource
    if !listing.is_empty() {
        println!("\n--- Following First Repository ---");
        let repo = repos.get("repositories").follow_entry(0).await?;
        println!("Slug: {:?}", repo.get("slug").as_str());
        println!("Active: {:?}", repo.get("active").as_bool());
        println!(
            "Default branch: {:?}",
            repo.dig(["default_branch", "name"]).as_str()
        );

        // List its builds and walk one page of pagination
        if let Some(slug) = repo.get("slug").as_str() {
            client.set_repository(slug)?;
            println!("\n--- Listing Builds ---");
            let builds = client.builds().await?;
            if let Some(page) = builds.get("builds").into_document() {
                println!("Found {} builds on this page", page.len());
                for build in page.items().iter().take(5) {
                    println!(
                        "  #{} {}",
                        build.get("number").as_str().unwrap_or("?"),
                        build.get("state").as_str().unwrap_or("?"),
                    );
                }
            }

            if builds.pager().has_next() {
                let next = builds.pager().next().await?;
                println!(
                    "Next page has {} builds",
                    next.get("builds").into_document().map(|d| d.len()).unwrap_or(0)
                );
            }
        }
    }

    Ok(())
}
