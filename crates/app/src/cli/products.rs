use std::sync::Arc;

use clap::{Args, Subcommand};
use modedz::catalog::{
    CatalogBrowser, DEFAULT_PAGE_SIZE, ListingQuery, ListingState, ProductFilters, ProductSort,
};
use modedz_app::{context::AppContext, links::ListingLinkExt, money::format_dzd};
use reqwest::Url;
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List products matching filters or a shared link
    List(ListArgs),
    /// Show a single product
    Show(ShowArgs),
    /// List categories
    Categories,
    /// List brands
    Brands,
}

#[derive(Debug, Args)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "independent listing flags from the command line."
)]
struct ListArgs {
    /// Open a shared listing link instead of using filter flags
    #[arg(long, conflicts_with_all = ["category", "search", "sort", "page"])]
    link: Option<Url>,

    /// Category slug
    #[arg(long)]
    category: Option<String>,

    /// Subcategory
    #[arg(long)]
    subcategory: Option<String>,

    /// Boutique identifier
    #[arg(long)]
    boutique_id: Option<String>,

    /// Brand name
    #[arg(long)]
    brand: Option<String>,

    /// Minimum price in DZD
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Maximum price in DZD
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Color
    #[arg(long)]
    color: Option<String>,

    /// Size
    #[arg(long)]
    size: Option<String>,

    /// Condition (new, used, ...)
    #[arg(long)]
    condition: Option<String>,

    /// Free-text search
    #[arg(long)]
    search: Option<String>,

    /// Only products in stock
    #[arg(long)]
    in_stock_only: bool,

    /// Only featured products
    #[arg(long)]
    featured: bool,

    /// Only trending products
    #[arg(long)]
    trending: bool,

    /// Sort order (relevance, price_asc, price_desc, newest, oldest, popularity, rating, sales)
    #[arg(long, default_value = "relevance")]
    sort: ProductSort,

    /// Page number
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Products per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Storefront listing URL used for shareable links
    #[arg(long, env = "MODEDZ_SHARE_URL", default_value = "https://mode.dz/products")]
    share_base: Url,
}

impl ListArgs {
    fn query(&self) -> ListingQuery {
        if let Some(link) = &self.link {
            return ListingQuery::from_url(link);
        }

        let mut query = ListingQuery::new(
            ProductFilters {
                category: self.category.clone(),
                subcategory: self.subcategory.clone(),
                boutique_id: self.boutique_id.clone(),
                brand: self.brand.clone(),
                min_price: self.min_price,
                max_price: self.max_price,
                color: self.color.clone(),
                size: self.size.clone(),
                condition: self.condition.clone(),
                search: self.search.clone(),
                in_stock_only: self.in_stock_only,
                is_featured: self.featured,
                is_trending: self.trending,
            },
            self.sort,
        );

        query.set_page(self.page);
        query
    }
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Product identifier
    product_id: String,
}

pub(crate) async fn run(context: &AppContext, command: ProductsCommand) -> Result<(), String> {
    match command.command {
        ProductsSubcommand::List(args) => list(context, &args).await,
        ProductsSubcommand::Show(args) => show(context, &args).await,
        ProductsSubcommand::Categories => {
            let categories = context
                .catalog
                .categories()
                .await
                .map_err(|error| format!("failed to list categories: {error}"))?;

            for category in categories {
                println!("{} ({}): {} products", category.name, category.slug, category.product_count);

                if !category.subcategories.is_empty() {
                    println!("  {}", category.subcategories.join(", "));
                }
            }

            Ok(())
        }
        ProductsSubcommand::Brands => {
            let brands = context
                .catalog
                .brands()
                .await
                .map_err(|error| format!("failed to list brands: {error}"))?;

            for brand in brands {
                println!("{}: {} products", brand.name, brand.product_count);
            }

            Ok(())
        }
    }
}

async fn list(context: &AppContext, args: &ListArgs) -> Result<(), String> {
    let browser = CatalogBrowser::with_query(Arc::clone(&context.catalog), args.query())
        .page_size(args.page_size);

    let page = match browser.load().await {
        ListingState::Loaded(page) => page,
        ListingState::Failed(error) => return Err(format!("failed to list products: {error}")),
        ListingState::Idle | ListingState::Loading { .. } => {
            return Err("listing did not complete".to_string());
        }
    };

    if page.products.is_empty() {
        println!("no products match these filters");
    }

    for product in &page.products {
        let sale = if product.is_on_sale() {
            format!(" (was {})", format_dzd(product.base_price))
        } else {
            String::new()
        };

        println!(
            "{}  {}  {}{sale}  [{}]",
            product.id,
            product.name,
            format_dzd(product.current_price),
            product.boutique_name
        );
    }

    println!();
    println!(
        "page {} of {} ({} products)",
        page.page,
        page.total_pages.max(1),
        page.total
    );
    println!("share: {}", browser.query().share_url(&args.share_base));

    Ok(())
}

async fn show(context: &AppContext, args: &ShowArgs) -> Result<(), String> {
    let detail = context
        .catalog
        .get_product(&args.product_id)
        .await
        .map_err(|error| format!("failed to load product {}: {error}", args.product_id))?;

    let product = &detail.product;

    println!("{} ({})", product.name, product.id);
    println!("boutique: {}", product.boutique_name);
    println!("price: {}", format_dzd(product.current_price));
    println!(
        "stock: {}",
        if product.is_in_stock {
            product.total_stock.to_string()
        } else {
            "out of stock".to_string()
        }
    );

    if !detail.available_colors.is_empty() {
        println!("colors: {}", detail.available_colors.join(", "));
    }

    if !detail.available_sizes.is_empty() {
        println!("sizes: {}", detail.available_sizes.join(", "));
    }

    if !detail.description.is_empty() {
        println!();
        println!("{}", detail.description);
    }

    Ok(())
}
