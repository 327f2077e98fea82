use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::{Address, Bytes, U256};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use k256::ecdsa::SigningKey;
use regex::Regex;
use relay_refund_module::RelayConfig;
use relay_refund_types::{AccountTransaction, CallKind, RefundTerms};
use relay_terms_encoder::{
    encoder::{
        encode_exec_transaction, max_refund, refund_terms_digest, sign_account_transaction,
        sign_refund_terms, signer_address, transaction_digest,
    },
    types::{TermsEnvelope, TransactionEnvelope},
};
use serde::Serialize;
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Digest, sign and size relay-and-refund payloads, printing machine-readable JSON.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// JSON file holding a module config (`chain_id`, `module_address`, `gas`).
    #[arg(long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides the config's chain id.
    #[arg(long, env = "RELAY_CHAIN_ID")]
    chain_id: Option<u64>,

    /// Overrides the config's module address.
    #[arg(long, env = "RELAY_MODULE_ADDRESS")]
    module: Option<Address>,

    /// Also write the JSON output to this file.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Log filter, eg `debug` or `relay_cli=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the refund terms digest a single owner signs.
    TermsDigest(TermsArgs),
    /// Sign refund terms with one owner key.
    SignTerms {
        #[command(flatten)]
        terms: TermsArgs,
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Print the owner transaction digest.
    TxDigest(TransactionArgs),
    /// Sign an owner transaction with every given key and encode the `execTransaction` call.
    SignTransaction {
        #[command(flatten)]
        tx: TransactionArgs,
        /// Owner private keys (hex string, 0x...). Repeat for each owner.
        #[arg(long = "private-key", required = true)]
        private_keys: Vec<String>,
    },
    /// Upper bound a set of terms can pay out.
    MaxRefund {
        #[arg(long)]
        work_limit: U256,
        #[arg(long)]
        fee_rate: U256,
    },
}

#[derive(Args, Debug)]
struct TermsArgs {
    #[arg(long)]
    account: Address,
    #[arg(long)]
    nonce: U256,
    /// Zero address for the native currency.
    #[arg(long, default_value_t = Address::ZERO)]
    currency: Address,
    #[arg(long)]
    work_limit: U256,
    #[arg(long)]
    fee_rate: U256,
    /// Zero address pays whoever submits the relay.
    #[arg(long, default_value_t = Address::ZERO)]
    recipient: Address,
}

impl TermsArgs {
    fn terms(&self) -> RefundTerms {
        RefundTerms {
            account: self.account,
            nonce: self.nonce,
            currency: self.currency,
            workLimit: self.work_limit,
            feeRate: self.fee_rate,
            recipient: self.recipient,
        }
    }
}

#[derive(Args, Debug)]
struct TransactionArgs {
    #[arg(long)]
    account: Address,
    #[arg(long)]
    to: Address,
    #[arg(long, default_value_t = U256::ZERO)]
    value: U256,
    /// Call data (hex string, 0x...).
    #[arg(long, default_value = "0x")]
    data: Bytes,
    /// 0 = call, 1 = delegatecall.
    #[arg(long, default_value_t = 0)]
    operation: u8,
    #[arg(long)]
    nonce: U256,
}

impl TransactionArgs {
    fn transaction(&self) -> Result<AccountTransaction> {
        let operation = CallKind::try_from(self.operation)
            .map_err(|()| anyhow!("operation must be 0 (call) or 1 (delegatecall), got {}", self.operation))?;
        Ok(AccountTransaction {
            account: self.account,
            to: self.to,
            value: self.value,
            data: self.data.clone(),
            operation: operation.into(),
            nonce: self.nonce,
        })
    }
}

#[derive(Args, Debug)]
struct KeyArgs {
    /// Path to a file containing the owner private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    private_key_path: Option<PathBuf>,

    /// Owner private key (hex string, 0x...).
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    private_key: Option<String>,
}

impl KeyArgs {
    fn signing_key(&self) -> Result<SigningKey> {
        if let Some(ref path) = self.private_key_path {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed reading {}", path.display()))?;
            parse_private_key(&raw)
        } else if let Some(ref raw) = self.private_key {
            parse_private_key(raw)
        } else {
            Err(anyhow!(
                "missing owner key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)"
            ))
        }
    }
}

#[derive(Serialize)]
struct Output {
    command: &'static str,
    chain_id: u64,
    module: Address,
    generated_at: String,
    result: Value,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli)?;
    debug!(chain_id = config.chain_id, module = %config.module_address, "config loaded");

    let (command, result) = run(&cli.command, &config)?;
    let output = Output {
        command,
        chain_id: config.chain_id,
        module: config.module_address,
        generated_at: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string()),
        result,
    };
    let rendered = serde_json::to_string_pretty(&output).context("failed serialising output")?;

    if let Some(ref path) = cli.out {
        write_atomic(path, &rendered)?;
        info!(path = %path.display(), "output written");
    }
    println!("{rendered}");
    Ok(())
}

fn load_config(cli: &Cli) -> Result<RelayConfig> {
    let mut config = match cli.config {
        Some(ref path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed reading {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed parsing JSON in {}", path.display()))?
        }
        None => RelayConfig::default(),
    };
    if let Some(chain_id) = cli.chain_id {
        config.chain_id = chain_id;
    }
    if let Some(module) = cli.module {
        config.module_address = module;
    }
    Ok(config)
}

fn run(command: &Command, config: &RelayConfig) -> Result<(&'static str, Value)> {
    match command {
        Command::TermsDigest(args) => {
            let envelope = TermsEnvelope::new(args.terms(), config.chain_id, config.module_address);
            Ok((
                "terms-digest",
                json!({ "digest": refund_terms_digest(&envelope).to_string() }),
            ))
        }
        Command::SignTerms { terms, key } => {
            if config.module_address == Address::ZERO {
                bail!("module address is unset: pass --module or set it in the config");
            }
            let key = key.signing_key()?;
            let mut envelope = TermsEnvelope::new(terms.terms(), config.chain_id, config.module_address);
            sign_refund_terms(&mut envelope, &key).context("failed signing refund terms")?;
            Ok((
                "sign-terms",
                json!({
                    "signer": signer_address(&key).to_string(),
                    "digest": refund_terms_digest(&envelope).to_string(),
                    "signature": hex_string(&envelope.signature),
                    "max_refund": max_refund(&envelope.terms).map(|v| v.to_string()),
                }),
            ))
        }
        Command::TxDigest(args) => {
            let envelope = TransactionEnvelope::new(args.transaction()?, config.chain_id);
            Ok((
                "tx-digest",
                json!({ "digest": transaction_digest(&envelope).to_string() }),
            ))
        }
        Command::SignTransaction { tx, private_keys } => {
            let keys = private_keys
                .iter()
                .map(|raw| parse_private_key(raw))
                .collect::<Result<Vec<_>>>()?;
            let mut envelope = TransactionEnvelope::new(tx.transaction()?, config.chain_id);
            sign_account_transaction(&mut envelope, &keys).context("failed signing transaction")?;
            let signers: Vec<String> = keys.iter().map(|k| signer_address(k).to_string()).collect();
            Ok((
                "sign-transaction",
                json!({
                    "signers": signers,
                    "digest": transaction_digest(&envelope).to_string(),
                    "signatures": hex_string(&envelope.signatures),
                    "exec_transaction_call_data": hex_string(&encode_exec_transaction(&envelope)),
                }),
            ))
        }
        Command::MaxRefund { work_limit, fee_rate } => {
            let terms = RefundTerms {
                account: Address::ZERO,
                nonce: U256::ZERO,
                currency: Address::ZERO,
                workLimit: *work_limit,
                feeRate: *fee_rate,
                recipient: Address::ZERO,
            };
            let max = max_refund(&terms).ok_or_else(|| anyhow!("work limit times fee rate overflows"))?;
            Ok(("max-refund", json!({ "max_refund": max.to_string() })))
        }
    }
}

fn parse_private_key(raw: &str) -> Result<SigningKey> {
    let re = Regex::new(r"^(0x)?[0-9a-fA-F]{64}$")?;
    let trimmed = raw.trim();
    if !re.is_match(trimmed) {
        bail!("private key must be 32 bytes of hex");
    }
    let bytes = hex::decode(trimmed.trim_start_matches("0x")).context("failed decoding private key")?;
    SigningKey::from_slice(&bytes).context("invalid secp256k1 private key")
}

fn hex_string(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() && !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }

    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, contents.as_bytes())
        .with_context(|| format!("failed writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
