//! Example: fetch an article and print its Markdown
//!
//! Run with: cargo run -p zhihu-md --example fetch_article -- <article-id>
//!
//! Pass --download-image to localize embedded images into ./assets.

use zhihu_md::{Article, Config, ZhihuClient};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(id) = args.next().and_then(|a| a.parse::<u64>().ok()) else {
        eprintln!("usage: fetch_article <article-id> [--download-image]");
        std::process::exit(2);
    };
    let download_image = args.any(|a| a == "--download-image");

    let config = Config::builder()
        .download_image(download_image)
        .asset_path("./assets")
        .build();

    if download_image {
        if let Err(e) = std::fs::create_dir_all(&config.asset_path) {
            eprintln!("cannot create asset directory: {}", e);
            std::process::exit(1);
        }
    }

    let client = match ZhihuClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("client error: {}", e);
            std::process::exit(1);
        }
    };

    match Article::fetch(&client, &config, id).await {
        Ok(article) => {
            println!("# {}\n", article.title);
            println!("{}", article.markdown);
        }
        Err(e) => {
            eprintln!("fetch failed: {}", e);
            std::process::exit(1);
        }
    }
}
