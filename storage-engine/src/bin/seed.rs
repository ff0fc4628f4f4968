//! Recreates the `feeds` and `items` tables and fills them with fake data.
//!
//! FEEDCACHE_SEED_FEEDS (default 100) feeds, each with
//! FEEDCACHE_SEED_ITEMS_PER_FEED (default 1000) items.

use fake::Fake;
use fake::faker::company::en::{Bs, CatchPhrase};
use fake::faker::internet::en::DomainSuffix;
use fake::faker::lorem::en::{Sentence, Word};
use rand::Rng;
use shared::config::Config;
use storage_engine::PostgresStore;
use tracing::{info, Level};

const SCHEMA: &str = "
    DROP TABLE IF EXISTS items;
    DROP TABLE IF EXISTS feeds;
    CREATE TABLE feeds (
        id INTEGER PRIMARY KEY,
        type VARCHAR(50) NOT NULL,
        name VARCHAR(255) NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        status VARCHAR(50) DEFAULT 'active'
    );
    CREATE TABLE items (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        feed_id INTEGER NOT NULL REFERENCES feeds(id),
        price NUMERIC(10, 2) NOT NULL,
        description TEXT NOT NULL,
        name VARCHAR(255) NOT NULL,
        cta VARCHAR(50) NOT NULL,
        click_url TEXT NOT NULL,
        item_id_ref UUID NOT NULL DEFAULT gen_random_uuid()
    );
    CREATE INDEX items_feed_id_idx ON items (feed_id);
";

const INSERT_FEED: &str = "INSERT INTO feeds (id, type, name) VALUES ($1, $2, $3)";
const INSERT_ITEM: &str = "INSERT INTO items (feed_id, price, description, name, cta, click_url) \
                           VALUES ($1, ($2::float8)::numeric(10, 2), $3, $4, $5, $6)";

const FEED_TYPES: [&str; 4] = ["product", "article", "service", "event"];
const CTAS: [&str; 4] = ["Buy Now", "Learn More", "Register", "View Details"];
const MAX_DESCRIPTION_CHARS: usize = 200;

struct FeedSeed {
    kind: String,
    name: String,
}

struct ItemSeed {
    price: f64,
    description: String,
    name: String,
    cta: String,
    click_url: String,
}

fn env_or<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn fake_feed() -> FeedSeed {
    let mut rng = rand::rng();
    let kind = FEED_TYPES[rng.random_range(0..FEED_TYPES.len())];
    let name = if kind == "product" {
        title_case(&Bs().fake::<String>())
    } else {
        CatchPhrase().fake()
    };

    FeedSeed {
        kind: kind.to_string(),
        name,
    }
}

fn fake_item(feed_id: i32) -> ItemSeed {
    let mut rng = rand::rng();
    let cents: i64 = rng.random_range(199..=99_999);
    let description: String = Sentence(8..30).fake();
    let word: String = Word().fake();
    let suffix: String = DomainSuffix().fake();

    ItemSeed {
        price: cents as f64 / 100.0,
        description: description.chars().take(MAX_DESCRIPTION_CHARS).collect(),
        name: if feed_id % 4 == 0 {
            title_case(&Bs().fake::<String>())
        } else {
            CatchPhrase().fake()
        },
        cta: CTAS[rng.random_range(0..CTAS.len())].to_string(),
        click_url: format!("https://www.{}.{}/", word.to_lowercase(), suffix),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    match dotenvy::dotenv() {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let config = Config::from_env()?;
    let feeds: i32 = env_or("FEEDCACHE_SEED_FEEDS", 100);
    let items_per_feed: usize = env_or("FEEDCACHE_SEED_ITEMS_PER_FEED", 1000);

    let store = PostgresStore::from_config(&config.database)?;
    store.ping().await?;
    let mut client = store.pool().get().await?;

    info!("Recreating tables...");
    client.batch_execute(SCHEMA).await?;

    for feed_id in 1..=feeds {
        let feed = fake_feed();
        let items: Vec<ItemSeed> = (0..items_per_feed).map(|_| fake_item(feed_id)).collect();

        let tx = client.transaction().await?;
        tx.execute(INSERT_FEED, &[&feed_id, &feed.kind, &feed.name])
            .await?;

        let insert = tx.prepare_cached(INSERT_ITEM).await?;
        for item in &items {
            tx.execute(
                &insert,
                &[
                    &feed_id,
                    &item.price,
                    &item.description,
                    &item.name,
                    &item.cta,
                    &item.click_url,
                ],
            )
            .await?;
        }
        tx.commit().await?;

        info!("Feed {} ({}) seeded with {} items", feed_id, feed.kind, items.len());
    }

    info!("Database seeding completed successfully.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("synergize robust schemas"), "Synergize Robust Schemas");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_fake_item_respects_column_limits() {
        for feed_id in 1..=8 {
            let item = fake_item(feed_id);
            assert!(item.price >= 1.99 && item.price <= 999.99);
            assert!(item.description.chars().count() <= MAX_DESCRIPTION_CHARS);
            assert!(CTAS.contains(&item.cta.as_str()));
            assert!(item.click_url.starts_with("https://"));
        }
    }

    #[test]
    fn test_fake_feed_type_is_known() {
        let feed = fake_feed();
        assert!(FEED_TYPES.contains(&feed.kind.as_str()));
        assert!(!feed.name.is_empty());
    }
}
