// ============================================================================
// pandaroux — terminal front end for the PandaRoux wardrobe
// ============================================================================
// Usage:
//   pandaroux categories                         List clothing categories
//   pandaroux search <category> <query...>       Run the mock marketplace search
//   pandaroux wardrobe list [--category C]       Show the saved wardrobe
//   pandaroux wardrobe add <listing-id>          Save a listing to the wardrobe
//   pandaroux wardrobe remove <listing-id>       Remove a saved listing
//   pandaroux wardrobe stats|export|clear
//   pandaroux walk <category> <query> <listing-id>
// ============================================================================

use anyhow::{anyhow, Result};
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use pandaroux_core::search::mock_listings;
use pandaroux_core::{
    catalog, AppConfig, CategoryId, Item, ItemId, MockSearchProvider, Screen, SearchFailure,
    SearchState, Session, SessionSnapshot, SharedSession, WardrobeDb, WardrobeGroup,
};
use tracing::info;

/// PandaRoux second-hand wardrobe
#[derive(Parser)]
#[command(name = "pandaroux", version, about = "Browse second-hand listings and manage your wardrobe")]
struct Cli {
    /// Path to the wardrobe database (default: ~/.pandaroux/wardrobe.redb)
    #[arg(long, global = true)]
    db_path: Option<String>,

    /// Simulated search latency in milliseconds
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the clothing categories
    Categories,

    /// Search the mock marketplace within a category
    Search {
        /// Category: tops, headwear, bottoms, shoes, accessories
        category: String,

        /// Free-text query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Make the mock backend reject the search
        #[arg(long)]
        fail: bool,
    },

    /// Manage the saved wardrobe
    Wardrobe {
        #[command(subcommand)]
        action: WardrobeAction,
    },

    /// Walk the screens: pick a category, search, open a listing, add it
    Walk {
        category: String,
        query: String,
        /// Listing to open from the results
        listing_id: u64,
    },
}

#[derive(Subcommand)]
enum WardrobeAction {
    /// List saved items grouped by category
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Save a listing (by id) from the marketplace
    Add { listing_id: u64 },
    /// Remove a saved item
    Remove { listing_id: u64 },
    /// Show totals
    Stats,
    /// Export the wardrobe as JSON
    Export,
    /// Remove every saved item
    Clear,
}

fn parse_category(s: &str) -> Result<CategoryId> {
    CategoryId::from_str(s).ok_or_else(|| {
        anyhow!(
            "Unknown category '{}'. Valid values: tops, headwear, bottoms, shoes, accessories",
            s
        )
    })
}

fn find_listing(id: u64) -> Result<&'static Item> {
    mock_listings()
        .iter()
        .find(|item| item.id == ItemId(id))
        .ok_or_else(|| anyhow!("Listing {} not found", id))
}

fn format_timestamp(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("(invalid: {})", ts))
}

fn format_price(item: &Item) -> String {
    match item.price.to_eur() {
        Some(eur) if item.price.currency_code.to_uppercase() != "EUR" => format!(
            "{:.2} {} (~{:.2} EUR)",
            item.price.amount, item.price.currency_code, eur
        ),
        _ => format!("{:.2} {}", item.price.amount, item.price.currency_code),
    }
}

fn print_item_row(item: &Item) {
    let title = item.title.chars().take(40).collect::<String>();
    let savings = item
        .price_difference
        .map(|d| format!("-{:.2} EUR", d))
        .unwrap_or_else(|| "-".into());
    let carbon = item
        .carbon_impact_kg
        .map(|kg| format!("{:.1} kg CO2", kg))
        .unwrap_or_else(|| "-".into());
    println!(
        "{:<12}  {:<40}  {:<28}  {:<12}  {}",
        item.id,
        title,
        format_price(item),
        savings,
        carbon
    );
}

fn print_item_header() {
    println!(
        "{:<12}  {:<40}  {:<28}  {:<12}  {}",
        "ID", "TITLE", "PRICE", "SAVINGS", "CARBON"
    );
    println!("{}", "-".repeat(110));
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pandaroux=info,pandaroux_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        // A missing .env file is normal
        if !e.not_found() {
            eprintln!("Warning: Could not load .env file: {}", e);
        }
    }
    init_tracing();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(path) = cli.db_path {
        config.db_path = Some(path);
    }
    if let Some(ms) = cli.delay_ms {
        config.search_delay_ms = ms;
    }

    match cli.command {
        Commands::Categories => cmd_categories(),
        Commands::Search {
            category,
            query,
            fail,
        } => cmd_search(&config, &category, &query.join(" "), fail).await,
        Commands::Wardrobe { action } => {
            let db = WardrobeDb::open(config.db_path.as_deref())?;
            match action {
                WardrobeAction::List { category } => cmd_wardrobe_list(&db, category),
                WardrobeAction::Add { listing_id } => cmd_wardrobe_add(&db, listing_id),
                WardrobeAction::Remove { listing_id } => cmd_wardrobe_remove(&db, listing_id),
                WardrobeAction::Stats => cmd_wardrobe_stats(&db),
                WardrobeAction::Export => cmd_wardrobe_export(&db),
                WardrobeAction::Clear => cmd_wardrobe_clear(&db),
            }
        }
        Commands::Walk {
            category,
            query,
            listing_id,
        } => cmd_walk(&config, &category, &query, listing_id).await,
    }
}

fn cmd_categories() -> Result<()> {
    println!("{:<12}  {:<14}  {:<12}  {}", "ID", "NAME", "ICON", "COLOR");
    println!("{}", "-".repeat(50));
    for category in catalog::all() {
        println!(
            "{:<12}  {:<14}  {:<12}  {}",
            category.id, category.display_name, category.icon_ref, category.accent_color
        );
    }
    Ok(())
}

async fn cmd_search(config: &AppConfig, category: &str, query: &str, fail: bool) -> Result<()> {
    let category = catalog::get(parse_category(category)?).clone();
    let provider = if fail {
        MockSearchProvider::failing(
            config.search_delay(),
            SearchFailure::Unavailable("mock backend asked to fail".into()),
        )
    } else {
        MockSearchProvider::new(config.search_delay())
    };

    let shared = SharedSession::default();
    {
        let mut session = shared.write().await;
        session.go_to_category_pick();
        session.select_category(category);
    }

    println!("Searching...");
    shared.run_search(&provider, query).await?;
    print_search_state(&shared.snapshot().await.search);
    Ok(())
}

fn print_search_state(state: &SearchState) {
    match state {
        SearchState::Loaded { query, items } if items.is_empty() => {
            println!("No results for \"{}\".", query);
        }
        SearchState::Loaded { query, items } => {
            println!("{} results for \"{}\":\n", items.len(), query);
            print_item_header();
            for item in items {
                print_item_row(item);
            }
        }
        SearchState::Failed { query, failure } => {
            println!("Search for \"{}\" failed: {}. Try again.", query, failure);
        }
        SearchState::Pending { .. } | SearchState::Idle => {
            println!("No search results.");
        }
    }
}

fn cmd_wardrobe_list(db: &WardrobeDb, category: Option<String>) -> Result<()> {
    let filter = category.as_deref().map(parse_category).transpose()?;
    let session = Session::with_wardrobe(db.load_store()?);

    if session.wardrobe().is_empty() {
        println!("Your wardrobe is empty.");
        return Ok(());
    }

    let groups = groups_to_list(session.snapshot().wardrobe, filter);
    if groups.is_empty() {
        if let Some(category_id) = filter {
            println!("No items in {}.", catalog::get(category_id).display_name);
        }
        return Ok(());
    }

    for group in groups {
        let name = &catalog::get(group.category_id).display_name;
        println!("\n{} ({})", name, group.items.len());
        print_item_header();
        for item in &group.items {
            print_item_row(item);
        }
    }
    Ok(())
}

/// Keep only the group matching `filter`, or every group when unfiltered
fn groups_to_list(groups: Vec<WardrobeGroup>, filter: Option<CategoryId>) -> Vec<WardrobeGroup> {
    groups
        .into_iter()
        .filter(|g| filter.map_or(true, |c| c == g.category_id))
        .collect()
}

fn cmd_wardrobe_add(db: &WardrobeDb, listing_id: u64) -> Result<()> {
    let item = find_listing(listing_id)?;
    if db.save_item(item)? {
        println!("Added \"{}\" to your wardrobe.", item.title);
    } else {
        println!("\"{}\" is already in your wardrobe.", item.title);
    }
    Ok(())
}

fn cmd_wardrobe_remove(db: &WardrobeDb, listing_id: u64) -> Result<()> {
    if db.remove_item(ItemId(listing_id))? {
        println!("Removed {} from your wardrobe.", listing_id);
    } else {
        println!("{} was not in your wardrobe.", listing_id);
    }
    Ok(())
}

fn cmd_wardrobe_stats(db: &WardrobeDb) -> Result<()> {
    let stats = db.stats()?;
    let summary = db.load_store()?.summary();

    println!("=== PandaRoux Wardrobe ===");
    println!("Database: {}", db.path().display());
    println!();
    println!("Items:    {} total", stats.total_items);
    for (category, count) in &summary.per_category {
        println!("  {:12} {}", category.as_str(), count);
    }
    println!("Savings:  {:.2} EUR", summary.total_savings);
    println!("Carbon:   {:.1} kg CO2", summary.total_carbon_kg);
    if let (Some(oldest), Some(newest)) = (stats.oldest_added_at, stats.newest_added_at) {
        println!("First added: {}", format_timestamp(oldest));
        println!("Last added:  {}", format_timestamp(newest));
    }
    Ok(())
}

fn cmd_wardrobe_export(db: &WardrobeDb) -> Result<()> {
    let store = db.load_store()?;
    let export = serde_json::json!({
        "exported_at": Utc::now().to_rfc3339(),
        "summary": store.summary(),
        "items": store.items(),
    });
    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}

fn cmd_wardrobe_clear(db: &WardrobeDb) -> Result<()> {
    let mut store = db.load_store()?;
    let count = store.count();
    store.clear();
    db.replace_all(&store)?;
    println!("Removed {} items.", count);
    Ok(())
}

fn print_snapshot(step: &str, snapshot: &SessionSnapshot) {
    let category = snapshot
        .selected_category
        .as_ref()
        .map(|c| c.id.as_str())
        .unwrap_or("-");
    let item = snapshot
        .selected_item
        .as_ref()
        .map(|i| i.id.to_string())
        .unwrap_or_else(|| "-".into());
    println!(
        "{:<22} screen={:<14} category={:<12} item={:<12} results={:<3} wardrobe={}",
        step,
        snapshot.screen,
        category,
        item,
        snapshot.search.results().len(),
        snapshot.summary.item_count
    );
}

async fn cmd_walk(config: &AppConfig, category: &str, query: &str, listing_id: u64) -> Result<()> {
    let category = catalog::get(parse_category(category)?).clone();
    let db = WardrobeDb::open(config.db_path.as_deref())?;
    let provider = MockSearchProvider::new(config.search_delay());
    let shared = SharedSession::new(Session::with_wardrobe(db.load_store()?));

    print_snapshot("start", &shared.snapshot().await);

    {
        let mut session = shared.write().await;
        session.go_to_category_pick();
        session.expect_screen(Screen::CategoryPick, "go_to_category_pick")?;
    }
    print_snapshot("go_to_category_pick", &shared.snapshot().await);

    {
        let mut session = shared.write().await;
        session.select_category(category);
        session.expect_screen(Screen::Search, "select_category")?;
    }
    print_snapshot("select_category", &shared.snapshot().await);

    shared.run_search(&provider, query).await?;
    print_snapshot("search", &shared.snapshot().await);

    {
        let mut session = shared.write().await;
        let item = session
            .search_state()
            .results()
            .iter()
            .find(|i| i.id == ItemId(listing_id))
            .cloned()
            .ok_or_else(|| anyhow!("Listing {} is not among the results", listing_id))?;
        session.select_item(item);
        session.expect_screen(Screen::Details, "select_item")?;
    }
    print_snapshot("select_item", &shared.snapshot().await);

    let added = shared.write().await.add_selected_to_wardrobe();
    print_snapshot("add_to_wardrobe", &shared.snapshot().await);

    shared.write().await.go_home();
    print_snapshot("go_home", &shared.snapshot().await);

    if let Some(item) = added {
        db.replace_all(shared.read().await.wardrobe())?;
        info!("Persisted wardrobe after adding {}", item.id);
    }
    Ok(())
}
