use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use ledger::{
    AccountDetails, Ledger, PaymentMethodKind, PaymentMethodNewCmd, RejectCmd, TransactionKind,
    ValidateCmd,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

mod users {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub username: String,
        pub password: String,
        pub is_admin: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Parser, Debug)]
#[command(name = "cauris_admin")]
#[command(about = "Admin utilities for Cauris (bootstrap users, payment methods, review queue)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./cauris.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    PaymentMethod(PaymentMethod),
    Review(Review),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    /// Grant the operator flag (may validate/reject transactions).
    #[arg(long)]
    admin: bool,
}

#[derive(Args, Debug)]
struct PaymentMethod {
    #[command(subcommand)]
    command: PaymentMethodCommand,
}

#[derive(Subcommand, Debug)]
enum PaymentMethodCommand {
    Create(PaymentMethodCreateArgs),
    SetActive(PaymentMethodSetActiveArgs),
    List,
}

#[derive(Args, Debug)]
struct PaymentMethodCreateArgs {
    #[arg(long)]
    name: String,
    /// mobile_money, mpesa, crypto, bank_transfer or other.
    #[arg(long)]
    kind: String,
    #[arg(long)]
    instructions: Option<String>,
    #[arg(long)]
    account_name: Option<String>,
    #[arg(long)]
    account_number: Option<String>,
    #[arg(long)]
    bank_name: Option<String>,
    #[arg(long)]
    wallet_address: Option<String>,
    #[arg(long)]
    network: Option<String>,
}

#[derive(Args, Debug)]
struct PaymentMethodSetActiveArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    active: bool,
}

#[derive(Args, Debug)]
struct Review {
    #[command(subcommand)]
    command: ReviewCommand,
}

#[derive(Subcommand, Debug)]
enum ReviewCommand {
    /// List pending deposits/withdrawals, oldest first.
    Pending(PendingArgs),
    Validate(ValidateArgs),
    Reject(RejectArgs),
}

#[derive(Args, Debug)]
struct PendingArgs {
    /// deposit or withdrawal.
    #[arg(long)]
    kind: Option<String>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    actor: String,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args, Debug)]
struct RejectArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    actor: String,
    #[arg(long)]
    reason: String,
}

fn parse_method_kind(raw: &str) -> Result<PaymentMethodKind, String> {
    match raw {
        "mobile_money" => Ok(PaymentMethodKind::MobileMoney),
        "mpesa" => Ok(PaymentMethodKind::Mpesa),
        "crypto" => Ok(PaymentMethodKind::Crypto),
        "bank_transfer" => Ok(PaymentMethodKind::BankTransfer),
        "other" => Ok(PaymentMethodKind::Other),
        other => Err(format!("unsupported payment method kind: {other}")),
    }
}

fn parse_txn_kind(raw: &str) -> Result<TransactionKind, String> {
    match raw {
        "deposit" => Ok(TransactionKind::Deposit),
        "withdrawal" => Ok(TransactionKind::Withdrawal),
        "transfer" => Ok(TransactionKind::Transfer),
        other => Err(format!("unsupported transaction kind: {other}")),
    }
}

fn parse_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw).map_err(|_| format!("invalid transaction id: {raw}"))
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;

            if users::Entity::find_by_id(args.username.clone())
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("user already exists: {}", args.username);
                std::process::exit(1);
            }

            let user = users::ActiveModel {
                username: Set(args.username.clone()),
                password: Set(password),
                is_admin: Set(args.admin),
            };
            users::Entity::insert(user).exec(&db).await?;

            println!("created user: {}", args.username);
        }
        Command::PaymentMethod(PaymentMethod { command }) => {
            let ledger = Ledger::builder().database(db.clone()).build().await?;
            match command {
                PaymentMethodCommand::Create(args) => {
                    let kind = match parse_method_kind(&args.kind) {
                        Ok(v) => v,
                        Err(err) => {
                            eprintln!("{err}");
                            std::process::exit(2);
                        }
                    };

                    let id = ledger
                        .new_payment_method(PaymentMethodNewCmd {
                            name: args.name.clone(),
                            kind,
                            instructions: args.instructions,
                            account_details: AccountDetails {
                                account_name: args.account_name,
                                account_number: args.account_number,
                                bank_name: args.bank_name,
                                wallet_address: args.wallet_address,
                                network: args.network,
                            },
                        })
                        .await?;
                    println!("created payment method: {} ({id})", args.name);
                }
                PaymentMethodCommand::SetActive(args) => {
                    let id = match parse_id(&args.id) {
                        Ok(v) => v,
                        Err(err) => {
                            eprintln!("{err}");
                            std::process::exit(2);
                        }
                    };
                    ledger.set_payment_method_active(id, args.active).await?;
                    println!("payment method {} active={}", args.id, args.active);
                }
                PaymentMethodCommand::List => {
                    for method in ledger.payment_methods(false).await? {
                        println!(
                            "{}  {}  {}  active={}",
                            method.id,
                            method.kind.as_str(),
                            method.name,
                            method.is_active
                        );
                    }
                }
            }
        }
        Command::Review(Review { command }) => {
            let ledger = Ledger::builder().database(db.clone()).build().await?;
            match command {
                ReviewCommand::Pending(args) => {
                    let kind = match args.kind.as_deref().map(parse_txn_kind).transpose() {
                        Ok(v) => v,
                        Err(err) => {
                            eprintln!("{err}");
                            std::process::exit(2);
                        }
                    };
                    for tx in ledger.pending_transactions(kind).await? {
                        println!(
                            "{}  {}  {}  user={}  amount={}  fee={}",
                            tx.id,
                            tx.reference,
                            tx.kind.as_str(),
                            tx.user_id,
                            tx.amount_minor,
                            tx.fee_minor
                        );
                    }
                }
                ReviewCommand::Validate(args) => {
                    let id = match parse_id(&args.id) {
                        Ok(v) => v,
                        Err(err) => {
                            eprintln!("{err}");
                            std::process::exit(2);
                        }
                    };
                    let tx = ledger
                        .validate_transaction(ValidateCmd {
                            transaction_id: id,
                            actor_id: args.actor,
                            note: args.note,
                        })
                        .await?;
                    println!("validated {} ({})", tx.reference, tx.status.as_str());
                }
                ReviewCommand::Reject(args) => {
                    let id = match parse_id(&args.id) {
                        Ok(v) => v,
                        Err(err) => {
                            eprintln!("{err}");
                            std::process::exit(2);
                        }
                    };
                    let tx = ledger
                        .reject_transaction(RejectCmd {
                            transaction_id: id,
                            actor_id: args.actor,
                            reason: args.reason,
                        })
                        .await?;
                    println!("rejected {} ({})", tx.reference, tx.status.as_str());
                }
            }
        }
    }

    Ok(())
}
