//! Kapee CLI - shop account, cart, checkout and back-office tools.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the session is kept in KAPEE_STORAGE_PATH)
//! kapee login -e ada@example.com -p hunter22
//!
//! # Show the demo catalog, or search it
//! kapee catalog
//! kapee catalog --search phone
//!
//! # Check out two headphones and a phone
//! kapee checkout -i p1:2 -i p3 --address "1 Main St"
//!
//! # Back-office (uses the stored session token)
//! kapee admin users list
//! kapee admin orders status 65f0c1 completed
//! ```
//!
//! # Commands
//!
//! - `login`, `register`, `logout`, `whoami` - Account session
//! - `subscribe` - Newsletter signup
//! - `catalog` - List products
//! - `cart`, `checkout` - Cart view and order placement
//! - `admin` - Users, orders, products, messages and admin profile

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kapee_core::{
    Catalog, Inbox, MessageId, NewProduct, OrderId, OrderStatus, Price, ProductId, ProductPatch,
    UserId, UserRole,
};
use kapee_storefront::config::ShopConfig;

mod commands;

use commands::CartLine;

#[derive(Parser)]
#[command(name = "kapee")]
#[command(author, version, about = "Kapee shop CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "KAPEE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log into it
    Register {
        /// Full name
        #[arg(short = 'n', long)]
        fullname: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Password confirmation
        #[arg(short = 'c', long)]
        confirm_password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Subscribe an email address to the newsletter
    Subscribe { email: String },
    /// List the product catalog
    Catalog {
        /// Only show products whose name or description contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a cart built from the given items (requires login)
    Cart {
        /// Item as `<product-id>[:<quantity>]`, repeatable
        #[arg(short, long = "item", value_parser = commands::parse_cart_line)]
        items: Vec<CartLine>,
    },
    /// Place an order for the given items (requires login)
    Checkout {
        /// Item as `<product-id>[:<quantity>]`, repeatable
        #[arg(short, long = "item", value_parser = commands::parse_cart_line)]
        items: Vec<CartLine>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        address: Option<String>,
    },
    /// Back-office tools
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Show the admin's display name
    Me,
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Edit the product catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Read and answer customer messages
    Messages {
        #[command(subcommand)]
        action: MessageAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List accounts
    List,
    /// Create an account
    Create {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Account role (`user`, `admin`)
        #[arg(short, long, default_value = "user")]
        role: UserRole,
    },
    /// Replace an account's fields
    Update {
        id: UserId,

        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        /// New password; omit to keep the current one
        #[arg(short, long)]
        password: Option<String>,

        #[arg(short, long, default_value = "user")]
        role: UserRole,
    },
    /// Delete an account
    Delete { id: UserId },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders
    List,
    /// Change an order's status
    Status { id: OrderId, status: OrderStatus },
    /// Delete an order
    Delete { id: OrderId },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List,
    /// Add a product
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(long)]
        price: Price,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short, long)]
        image: Option<String>,
    },
    /// Change a product's fields; omitted fields are kept
    Update {
        id: ProductId,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<Price>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        image: Option<String>,
    },
    /// Delete a product
    Delete { id: ProductId },
}

#[derive(Subcommand)]
enum MessageAction {
    /// List messages
    List,
    /// Show a message
    Show { id: MessageId },
    /// Flip a message between read and unread
    Toggle { id: MessageId },
    /// Delete a message
    Delete { id: MessageId },
    /// Reply to a message's sender
    Reply { id: MessageId, body: String },
}

fn init_sentry(config: &ShopConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ShopConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Sentry before the subscriber so the tracing layer has a client.
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kapee=info,kapee_storefront=info,kapee_admin=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ShopConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Login { email, password } => {
            commands::account::login(config, &email, password).await?;
        }
        Commands::Register {
            fullname,
            email,
            password,
            confirm_password,
        } => {
            commands::account::register(config, fullname, email, password, confirm_password)
                .await?;
        }
        Commands::Logout => commands::account::logout(config)?,
        Commands::Whoami => commands::account::whoami(config)?,
        Commands::Subscribe { email } => commands::shop::subscribe(config, &email).await?,
        Commands::Catalog { search } => commands::shop::catalog(config, search.as_deref())?,
        Commands::Cart { items } => commands::shop::cart(config, &items)?,
        Commands::Checkout {
            items,
            phone,
            address,
        } => commands::shop::checkout(config, &items, phone, address).await?,
        Commands::Admin {
            action: AdminAction::Products { action },
        } => products(action)?,
        Commands::Admin {
            action: AdminAction::Messages { action },
        } => messages(action)?,
        Commands::Admin { action } => {
            let client = commands::admin::client(config)?;
            match action {
                AdminAction::Me => commands::admin::me(&client).await,
                AdminAction::Users { action } => match action {
                    UserAction::List => commands::admin::list_users(&client).await?,
                    UserAction::Create {
                        username,
                        email,
                        password,
                        role,
                    } => {
                        commands::admin::create_user(&client, username, email, Some(password), role)
                            .await?;
                    }
                    UserAction::Update {
                        id,
                        username,
                        email,
                        password,
                        role,
                    } => {
                        commands::admin::update_user(&client, &id, username, email, password, role)
                            .await?;
                    }
                    UserAction::Delete { id } => commands::admin::delete_user(&client, &id).await?,
                },
                AdminAction::Orders { action } => match action {
                    OrderAction::List => commands::admin::list_orders(&client).await?,
                    OrderAction::Status { id, status } => {
                        commands::admin::set_order_status(&client, &id, status).await?;
                    }
                    OrderAction::Delete { id } => {
                        commands::admin::delete_order(&client, &id).await?;
                    }
                },
                AdminAction::Products { .. } | AdminAction::Messages { .. } => {}
            }
        }
    }
    Ok(())
}

fn products(action: ProductAction) -> Result<(), commands::CommandError> {
    let mut catalog = Catalog::seeded();
    match action {
        ProductAction::List => commands::backoffice::list_products(&catalog),
        ProductAction::Add {
            name,
            price,
            description,
            image,
        } => {
            let mut product = NewProduct::new(name, price, description);
            product.image = image;
            commands::backoffice::add_product(&mut catalog, product);
        }
        ProductAction::Update {
            id,
            name,
            price,
            description,
            image,
        } => {
            let patch = ProductPatch {
                name,
                price,
                description,
                image,
                ..ProductPatch::default()
            };
            commands::backoffice::update_product(&mut catalog, &id, patch)?;
        }
        ProductAction::Delete { id } => commands::backoffice::delete_product(&mut catalog, &id)?,
    }
    Ok(())
}

fn messages(action: MessageAction) -> Result<(), commands::CommandError> {
    let mut inbox = Inbox::seeded();
    match action {
        MessageAction::List => commands::backoffice::list_messages(&inbox),
        MessageAction::Show { id } => commands::backoffice::show_message(&inbox, id)?,
        MessageAction::Toggle { id } => commands::backoffice::toggle_message(&mut inbox, id)?,
        MessageAction::Delete { id } => commands::backoffice::delete_message(&mut inbox, id)?,
        MessageAction::Reply { id, body } => {
            commands::backoffice::reply_message(&inbox, id, &body)?;
        }
    }
    Ok(())
}
