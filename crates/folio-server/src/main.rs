use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use folio_auth::AuthService;
use folio_core::Settings;
use folio_server::{AppContext, HttpServer, build_router};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio", about = "Personal portfolio and blog server")]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Run the HTTP server
	Runserver {
		/// Address to bind, overrides FOLIO_BIND
		#[arg(long)]
		bind: Option<String>,
	},
	/// Create an active user holding the admin role
	Createadmin {
		email: String,
		password: String,
	},
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
		.init();

	let cli = Cli::parse();
	let settings = Settings::from_env()?;

	match cli.command {
		Command::Runserver { bind } => {
			let ctx = AppContext::from_settings(settings).await?;
			let addr: SocketAddr = bind.unwrap_or_else(|| ctx.settings.bind.clone()).parse()?;
			let router = build_router(&ctx);
			HttpServer::new(Arc::new(router)).listen(addr).await
		}
		Command::Createadmin { email, password } => {
			let pool = folio_db::connect(&settings.database_url).await?;
			let auth = AuthService::new(pool);
			let user = auth.create_admin(&email, &password).await?;
			println!("created admin {} (id {})", user.email, user.id);
			Ok(())
		}
	}
}
