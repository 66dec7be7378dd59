//! Content Service - administrative CLI for menus, users and roles.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::Menu;
use content_service_lib::config::ContentServiceConfig;
use content_service_lib::service::UsersQuery;
use content_service_lib::{ContentServices, MigrateAction};

#[derive(Parser)]
#[command(name = "content-service")]
#[command(about = "Content management administration")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// User administration
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Role administration
    Roles {
        #[command(subcommand)]
        command: RoleCommands,
    },
    /// Menu administration
    Menus {
        #[command(subcommand)]
        command: MenuCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Subcommand)]
enum UserCommands {
    /// List users ordered by email
    List {
        /// Number of users to skip
        #[arg(long, default_value_t = 0)]
        start: u64,
        /// Users per page (0 lists everyone)
        #[arg(long, default_value_t = 0)]
        count: u64,
    },
    /// Create a user whose user name is its email
    Create { email: String },
    /// Add a user to a role
    Grant { id: Uuid, role: String },
    /// Remove a user from a role
    Revoke { id: Uuid, role: String },
    /// Permanently delete a user
    Delete { id: Uuid },
}

#[derive(Subcommand)]
enum RoleCommands {
    /// Create an assignable role
    Create { name: String },
}

#[derive(Subcommand)]
enum MenuCommands {
    /// List the menus of a site with their active items
    List { site_id: Uuid },
    /// Create an empty menu
    Create { site_id: Uuid, name: String },
    /// Rename a menu
    Rename {
        site_id: Uuid,
        id: Uuid,
        name: String,
    },
    /// Soft delete a menu
    Delete { site_id: Uuid, id: Uuid },
}

#[tokio::main]
async fn main() {
    // Loads .env as well
    let config = ContentServiceConfig::from_env();
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
    tracing::debug!(
        service = %config.service.service_name,
        database = ?config.database,
        "Configuration loaded"
    );

    if let Err(e) = run(&config, cli.command).await {
        tracing::debug!(error = ?e, "Command failed");
        match e.downcast_ref::<AppError>() {
            Some(app_error) => eprintln!("[{}] {}", app_error.code(), app_error.user_message()),
            None => eprintln!("{}", e),
        }
        std::process::exit(1);
    }
}

async fn run(
    config: &ContentServiceConfig,
    command: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            content_service_lib::run_migrations(config, migrate_action).await?;
        }
        Commands::Users { command } => {
            let services = ContentServices::connect(config).await?;
            run_user_command(&services, command).await?;
        }
        Commands::Roles { command } => {
            let services = ContentServices::connect(config).await?;
            match command {
                RoleCommands::Create { name } => {
                    let result = services.roles.create_role(&name).await?;
                    if !result.succeeded() {
                        return Err(AppError::Identity(result.into_errors()).into());
                    }
                    println!("Created role {}", name.trim());
                }
            }
        }
        Commands::Menus { command } => {
            let services = ContentServices::connect(config).await?;
            run_menu_command(&services, command).await?;
        }
    }

    Ok(())
}

async fn run_menu_command(services: &ContentServices, command: MenuCommands) -> AppResult<()> {
    match command {
        MenuCommands::List { site_id } => {
            for menu in services.menus.get_all(site_id).await? {
                println!("{}  {}", menu.id, menu.name);
                for item in &menu.menu_items {
                    println!("    {}  {}", item.id, item.text);
                }
            }
        }
        MenuCommands::Create { site_id, name } => {
            let menu = Menu::new(site_id, Uuid::new_v4(), name)?;
            services.menus.create(&menu).await?;
            println!("Created menu {}", menu.id);
        }
        MenuCommands::Rename { site_id, id, name } => {
            let mut menu = services
                .menus
                .get_by_site_and_id(site_id, id)
                .await?
                .ok_or_not_found()?;
            menu.rename(name)?;
            services.menus.update(&menu).await?;
            println!("Renamed menu {}", id);
        }
        MenuCommands::Delete { site_id, id } => {
            let mut menu = services
                .menus
                .get_by_site_and_id(site_id, id)
                .await?
                .ok_or_not_found()?;
            menu.delete()?;
            services.menus.update(&menu).await?;
            println!("Deleted menu {}", id);
        }
    }

    Ok(())
}

async fn run_user_command(
    services: &ContentServices,
    command: UserCommands,
) -> AppResult<()> {
    match command {
        UserCommands::List { start, count } => {
            let view = services
                .users
                .get_users_view(&UsersQuery {
                    start_index: start,
                    number_of_users: count,
                })
                .await?;

            for user in &view.users {
                println!("{}  {}", user.id, user.email);
            }
            println!(
                "{} users, {} page(s)",
                view.total_records, view.number_of_pages
            );
        }
        UserCommands::Create { email } => {
            services.users.create_user(&email).await?;
            println!("Created user {}", email);
        }
        UserCommands::Grant { id, role } => {
            services.users.add_user_to_role(id, &role).await?;
            println!("Added {} to {}", id, role);
        }
        UserCommands::Revoke { id, role } => {
            services.users.remove_user_from_role(id, &role).await?;
            println!("Removed {} from {}", id, role);
        }
        UserCommands::Delete { id } => {
            services.users.delete_user(id).await?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}
