use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use stockdesk::client::{CatalogApi, CatalogClient, EmployeeApi, EmployeeClient};
use stockdesk::config::{Config, ConfigStore};
use stockdesk::logging;
use stockdesk::paginate::Paginator;
use stockdesk::query::QueryParams;
use stockdesk::server::ApiServer;

/// Inventory and employee administration dashboard
#[derive(Parser)]
#[command(name = "stockdesk", version, long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/stockdesk/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal dashboard (default)
    Dashboard {
        /// Initial address-bar query, e.g. "q=phone&category=smartphones"
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Serve the employee HTTP API
    Serve,
    /// Print one page of products
    Products {
        /// Search text
        #[arg(long, default_value = "")]
        q: String,
        /// Category slug
        #[arg(long, default_value = "")]
        category: String,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Print one page of employees
    Employees {
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Dashboard {
        query: String::new(),
    });

    match command {
        Commands::Dashboard { .. } => logging::init_file(),
        _ => logging::init_stderr(),
    }

    let path = cli.config.unwrap_or_else(Config::config_path);
    let store = ConfigStore::open(path.clone())
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    let config = store.get();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    match command {
        Commands::Dashboard { query } => {
            let catalog: Arc<dyn CatalogApi> = Arc::new(CatalogClient::new(&config)?);
            let employees: Arc<dyn EmployeeApi> = Arc::new(EmployeeClient::new(&config)?);
            stockdesk::ui::runtime::run(
                &config,
                QueryParams::from_query_str(&query),
                catalog,
                employees,
                runtime.handle(),
            )?;
        }
        Commands::Serve => runtime.block_on(serve(&store))?,
        Commands::Products { q, category, page } => {
            runtime.block_on(print_products(&config, QueryParams::new(q, category), page))?
        }
        Commands::Employees { page } => runtime.block_on(print_employees(&config, page))?,
    }

    Ok(())
}

async fn serve(store: &ConfigStore) -> anyhow::Result<()> {
    let employees: Arc<dyn EmployeeApi> = Arc::new(EmployeeClient::new(&store.get())?);
    let mut server = ApiServer::new(store, employees)?;
    server.bind().await?;
    server.run().await?;
    Ok(())
}

async fn print_products(config: &Config, params: QueryParams, page: usize) -> anyhow::Result<()> {
    let client = CatalogClient::new(config)?;
    let items = client.list_items(&params.q, &params.category).await?;

    let (header, rows) = page_view("products", &items, config.dashboard.catalog_page_size, page);
    println!("{header}");
    for item in rows {
        println!(
            "{:>6}  {:<40}  {:<20}  ${:>9.2}",
            item.id, item.title, item.category, item.price
        );
    }
    Ok(())
}

async fn print_employees(config: &Config, page: usize) -> anyhow::Result<()> {
    let client = EmployeeClient::new(config)?;
    let records = client.list(0, usize::MAX).await?.employees;

    let (header, rows) = page_view("employees", &records, config.dashboard.employee_page_size, page);
    println!("{header}");
    for record in rows {
        println!(
            "{:<4}{:<32}  {:<16}  {}",
            record.initials(),
            record.full_name(),
            record.profile.mobile_no,
            record.id
        );
    }
    Ok(())
}

/// Clamps the 1-based `page` to the collection and returns the summary line
/// with the rows on that page.
fn page_view<'a, T>(noun: &str, items: &'a [T], page_size: usize, page: usize) -> (String, &'a [T]) {
    let mut pager = Paginator::new(page_size);
    let current = pager.go_to(page.saturating_sub(1), items.len());
    let header = format!(
        "{} {}, page {} of {}",
        items.len(),
        noun,
        current + 1,
        pager.page_count(items.len()).max(1)
    );
    (header, pager.slice(items))
}
