use clap::{Parser, Subcommand, ValueEnum};
use krishi_core::application::payment::{PaymentTiming, PaymentWorkflow};
use krishi_core::application::session::SessionService;
use krishi_core::domain::account::RegisterMetadata;
use krishi_core::domain::payment::{PaymentContext, PaymentDetails, PaymentMethod};
use krishi_core::domain::ports::{AccountStoreBox, ProfileStoreBox, SessionStoreBox};
use krishi_core::domain::profile::ProfileUpdate;
use krishi_core::infrastructure::json_file::JsonFileStore;
use miette::{IntoDiagnostic, Result, miette};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON state file
    #[arg(long, default_value = "krishi-state.json")]
    data_path: PathBuf,

    /// Path to a persistent RocksDB database (requires the storage-rocksdb
    /// feature). Takes precedence over --data-path.
    #[arg(long)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out of the current session
    Logout,
    /// Show the currently signed-in user
    Whoami,
    /// Update the current account's profile
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        farm_size: Option<f64>,
        #[arg(long)]
        soil_type: Option<String>,
        /// May be given multiple times; replaces the language list
        #[arg(long = "language")]
        languages: Vec<String>,
        #[arg(long)]
        avatar_url: Option<String>,
    },
    /// Run the simulated payment wizard end to end
    Pay {
        /// Amount in minor units (paise)
        #[arg(long)]
        amount: u64,
        #[arg(long, default_value = "Demo payment")]
        description: String,
        #[arg(long)]
        method: MethodArg,
        #[arg(long, default_value = "")]
        card_number: String,
        /// Collected but not validated
        #[arg(long, default_value = "")]
        expiry_month: String,
        /// Collected but not validated
        #[arg(long, default_value = "")]
        expiry_year: String,
        #[arg(long, default_value = "")]
        cvv: String,
        #[arg(long, default_value = "")]
        holder_name: String,
        #[arg(long, default_value = "")]
        upi_id: String,
        #[arg(long)]
        otp: String,
    },
}

#[derive(ValueEnum, Clone, Copy)]
enum MethodArg {
    Card,
    Upi,
}

impl From<MethodArg> for PaymentMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Card => PaymentMethod::Card,
            MethodArg::Upi => PaymentMethod::Upi,
        }
    }
}

fn open_stores(cli: &Cli) -> Result<(AccountStoreBox, SessionStoreBox, ProfileStoreBox)> {
    if let Some(db_path) = &cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            let store =
                krishi_core::infrastructure::rocksdb::RocksDbStore::open(db_path).into_diagnostic()?;
            return Ok((
                Box::new(store.clone()),
                Box::new(store.clone()),
                Box::new(store),
            ));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        {
            let _ = db_path;
            return Err(miette!(
                "--db-path requires this binary to be built with the storage-rocksdb feature"
            ));
        }
    }
    let store = JsonFileStore::open(&cli.data_path);
    Ok((
        Box::new(store.clone()),
        Box::new(store.clone()),
        Box::new(store),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (accounts, sessions, profiles) = open_stores(&cli)?;
    let service = SessionService::initialize(accounts, sessions, profiles)
        .await
        .into_diagnostic()?;

    match cli.command {
        Command::Register {
            email,
            password,
            name,
            phone,
            location,
        } => {
            let session = service
                .register(
                    &email,
                    &password,
                    RegisterMetadata {
                        name,
                        phone,
                        location,
                    },
                )
                .await
                .into_diagnostic()?;
            println!("Registered and signed in as {}", session.user.email);
        }
        Command::Login { email, password } => {
            let session = service
                .authenticate(&email, &password)
                .await
                .into_diagnostic()?;
            println!("Signed in as {}", session.user.email);
        }
        Command::Logout => {
            service.sign_out().await.into_diagnostic()?;
            println!("Signed out");
        }
        Command::Whoami => match service.current_session() {
            Some(session) => {
                let name = session.user.name.as_deref().unwrap_or("-");
                println!("{} ({})", session.user.email, name);
            }
            None => println!("Not signed in"),
        },
        Command::UpdateProfile {
            name,
            phone,
            location,
            farm_size,
            soil_type,
            languages,
            avatar_url,
        } => {
            let updates = ProfileUpdate {
                name,
                phone,
                location,
                farm_size,
                soil_type,
                languages: if languages.is_empty() {
                    None
                } else {
                    Some(languages)
                },
                avatar_url,
            };
            let profile = service.update_profile(updates).await.into_diagnostic()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&profile).into_diagnostic()?
            );
        }
        Command::Pay {
            amount,
            description,
            method,
            card_number,
            expiry_month,
            expiry_year,
            cvv,
            holder_name,
            upi_id,
            otp,
        } => {
            let mut context = PaymentContext::new(amount, description);
            if let Some(session) = service.current_session() {
                context = context.with_payer(session.user);
            }

            let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel();
            let workflow = PaymentWorkflow::new(context, PaymentTiming::instant(), move || {
                let _ = done_tx.send(());
            });

            workflow.select_method(method.into()).into_diagnostic()?;
            workflow
                .enter_details(PaymentDetails {
                    card_number,
                    expiry_month,
                    expiry_year,
                    cvv,
                    holder_name,
                    upi_id,
                })
                .into_diagnostic()?;
            workflow.submit_otp(&otp).into_diagnostic()?;
            println!("Processing payment...");

            done_rx
                .recv()
                .await
                .ok_or_else(|| miette!("payment workflow ended without completing"))?;
            println!("Payment successful! Amount: {amount} paise");
        }
    }

    Ok(())
}
