//! Braintree CLI
//!
//! Runs pay system operations against a Braintree gateway from the command line.

mod config;
mod resolver;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pay_braintree::BraintreeSystem;
use pay_http::HttpTransport;
use pay_types::{
    Account, Amount, BillingAddress, CaptureRequest, ChargeRequest, OrderContext, PaySystem,
    RefundRequest, Transaction, TransactionContext,
};

use crate::config::Config;
use crate::resolver::FlagResolver;

#[derive(Parser)]
#[command(name = "braintree")]
#[command(author, version, about = "Braintree pay system CLI", long_about = None)]
struct Cli {
    /// Gateway base URI
    #[arg(long, env = "BRAINTREE_API_URI")]
    api_uri: Option<String>,

    /// Merchant id
    #[arg(long, env = "BRAINTREE_MERCHANT_ID")]
    merchant_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a client token for a hosted payment form
    ClientToken,
    /// Charge a payment method
    Charge(ChargeArgs),
    /// Capture an authorized charge
    Capture {
        /// Transaction JSON file written by `charge`
        #[arg(long)]
        transaction: PathBuf,
        /// Amount to settle, in the charge's currency
        #[arg(long)]
        amount: Option<String>,
    },
    /// Refund a charge
    Refund {
        /// Transaction JSON file written by `charge`
        #[arg(long)]
        transaction: PathBuf,
    },
}

#[derive(Args)]
struct ChargeArgs {
    /// One-time payment method nonce from the browser
    #[arg(long, required_unless_present = "token", conflicts_with = "token")]
    nonce: Option<String>,
    /// Vaulted payment method token
    #[arg(long)]
    token: Option<String>,
    #[arg(long)]
    amount: String,
    #[arg(long, default_value = "USD")]
    currency: String,
    #[arg(long, requires = "customer_id")]
    order_id: Option<String>,
    #[arg(long, requires = "order_id")]
    customer_id: Option<String>,
    /// The customer does not exist at the gateway yet
    #[arg(long, requires = "order_id")]
    new_customer: bool,
    /// Authorize only; settle later with `capture`
    #[arg(long)]
    no_capture: bool,
    #[command(flatten)]
    billing: BillingArgs,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args)]
struct BillingArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    street: Option<String>,
    #[arg(long)]
    extended: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    region: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    /// ISO 3166 alpha-3 country code
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    company: Option<String>,
}

impl BillingArgs {
    fn into_resolver(self) -> FlagResolver {
        let address = BillingAddress {
            street: self.street,
            extended: self.extended,
            city: self.city,
            region: self.region,
            postal_code: self.postal_code,
            country: self.country,
            company: self.company,
        };
        FlagResolver::new(self.first_name, self.last_name, address)
    }
}

fn pay_system(config: &Config, resolver: FlagResolver) -> Result<BraintreeSystem<HttpTransport>> {
    Ok(
        BraintreeSystem::new(HttpTransport::new(), Arc::new(resolver))
            .with_default_params(config.connection_parameters()?),
    )
}

fn no_billing() -> FlagResolver {
    FlagResolver::new(None, None, BillingAddress::default())
}

fn read_transaction(path: &Path) -> Result<Transaction> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("{} is not a transaction", path.display()))
}

async fn charge(config: &Config, args: ChargeArgs) -> Result<Transaction> {
    let identity = args.customer_id.clone().unwrap_or_else(|| "cli".to_string());
    let from = match (args.nonce, args.token) {
        (Some(nonce), _) => Account::web_nonce(identity, nonce)?,
        (None, Some(token)) => Account::vaulted(identity, token)?,
        (None, None) => anyhow::bail!("either --nonce or --token is required"),
    };
    let to = Account::vaulted("merchant", config.merchant_id.clone())?;
    let amount = Amount::parse(&args.currency, &args.amount)?;

    let mut request = ChargeRequest::new(from, to, amount);
    if let (Some(order_id), Some(customer_id)) = (args.order_id, args.customer_id) {
        let order = OrderContext::new(order_id, customer_id, args.new_customer)?;
        request = request.with_context(order);
    }
    if args.no_capture {
        request = request.authorize_only();
    }
    if let Some(description) = args.description {
        request = request.with_description(description);
    }

    let system = pay_system(config, args.billing.into_resolver())?;
    let session = system.start_session(None)?;
    Ok(system.charge(&session, request).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pay_braintree=debug,pay_cli=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env(cli.api_uri, cli.merchant_id)?;

    tracing::debug!(
        api_uri = %config.api_uri,
        merchant_id = %config.merchant_id,
        "loaded configuration"
    );

    match cli.command {
        Commands::ClientToken => {
            let system = pay_system(&config, no_billing())?;
            let session = system.start_session(None)?;
            println!("{}", system.generate_client_token(&session).await?);
        }

        Commands::Charge(args) => {
            let tx = charge(&config, args).await?;
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }

        Commands::Capture {
            transaction,
            amount,
        } => {
            let charge = read_transaction(&transaction)?;
            let mut request = CaptureRequest::new(charge);
            if let Some(value) = amount {
                let currency = request.charge.amount.currency().as_str().to_string();
                request = request.with_amount(Amount::parse(&currency, &value)?);
            }

            let system = pay_system(&config, no_billing())?;
            let session = system.start_session(None)?;
            let tx = system.capture(&session, request).await?;
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }

        Commands::Refund { transaction } => {
            let charge = read_transaction(&transaction)?;
            let request = RefundRequest {
                context: TransactionContext::default(),
                amount: None,
                description: None,
                charge,
            };

            let system = pay_system(&config, no_billing())?;
            let session = system.start_session(None)?;
            let tx = system.refund(&session, request).await?;
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }
    }

    Ok(())
}
