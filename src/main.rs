use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use stylist_desk::api::{HttpStylistApi, StylistApi};
use stylist_desk::config::ClientConfig;
use stylist_desk::invitation::{
    AcceptForm, AcceptOutcome, AcceptPhase, ApplicationOutcome, InviteAcceptor, InviteForm,
    Redirect, ValidationReport, apply_as_stylist,
};
use stylist_desk::stylists::{
    LocalPager, PaginationMetadata, PendingTransition, QueueRow, ReviewQueue, SortOrder,
    StylistQuery, StylistStatus, ThunkOutcome, Transition,
};

/// Admin and candidate tooling for the salon stylist onboarding workflow.
#[derive(Parser)]
#[command(name = "stylist-desk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show one server-side page of stylists with stage and actions.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size; defaults to STYLIST_PAGE_SIZE.
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "createdAt")]
        sort_by: String,
        #[arg(long, default_value = "desc")]
        sort_order: SortOrder,
        #[arg(long)]
        blocked: Option<bool>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        status: Option<StylistStatus>,
    },
    /// Legacy directory: download everyone, search and page locally.
    Directory {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        per_page: u32,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Invite a stylist by email.
    Invite {
        #[arg(long)]
        email: String,
        #[arg(long)]
        specialization: String,
        #[arg(long, allow_negative_numbers = true)]
        experience: i64,
    },
    /// Send (or resend) an invite to an existing applicant.
    SendInvite { user_id: String },
    /// Approve a stylist who accepted their invite.
    Approve {
        user_id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Reject a stylist who accepted their invite.
    Reject {
        user_id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Block an active stylist.
    Block {
        user_id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Unblock a stylist.
    Unblock {
        user_id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Show what an invite token is for.
    Preview { token: String },
    /// Register through an invite token.
    Accept {
        token: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, env = "STYLIST_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, env = "STYLIST_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm_password: String,
    },
    /// Submit a public stylist application.
    Apply {
        #[arg(long)]
        email: String,
        #[arg(long)]
        specialization: String,
        #[arg(long, allow_negative_numbers = true)]
        experience: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("loading configuration")?;
    let api: Arc<dyn StylistApi> =
        Arc::new(HttpStylistApi::new(&config).context("building API client")?);
    let queue = ReviewQueue::new(Arc::clone(&api), &config);

    match cli.command {
        Command::List {
            page,
            limit,
            search,
            sort_by,
            sort_order,
            blocked,
            active,
            status,
        } => {
            let query = StylistQuery {
                page: page.max(1),
                limit: limit.unwrap_or(config.page_size).max(1),
                search,
                sort_by,
                sort_order,
                is_blocked: blocked,
                is_active: active,
                status,
            };
            let page = outcome(queue.fetch_paginated_stylists(query).await)?;
            print_rows(&queue.rows().await);
            print_pagination(&page.pagination);
        }
        Command::Directory {
            page,
            per_page,
            search,
        } => {
            outcome(queue.fetch_stylists().await)?;
            let mut pager = LocalPager::new(per_page);
            pager.search(search);
            pager.page = page.max(1);
            let page = queue.directory_page(&pager).await;
            print_rows(&page.rows);
            print_pagination(&page.pagination);
        }
        Command::Invite {
            email,
            specialization,
            experience,
        } => {
            let request = InviteForm::new(email, specialization, experience)
                .validate()
                .map_err(report_error)?;
            let created = outcome(queue.create_invite(request).await)?;
            println!("Invite link: {}", created.invite_link);
            if let Some(user_id) = created.user_id {
                println!("User id:     {user_id}");
            }
            if let Some(expires_at) = created.expires_at {
                println!("Expires:     {expires_at}");
            }
        }
        Command::SendInvite { user_id } => {
            let created = outcome(queue.send_invite_to_applied(&user_id).await)?;
            println!("Invite link: {}", created.invite_link);
        }
        Command::Approve { user_id, yes } => {
            transition(&queue, PendingTransition::new(user_id, Transition::Approve), yes).await?
        }
        Command::Reject { user_id, yes } => {
            transition(&queue, PendingTransition::new(user_id, Transition::Reject), yes).await?
        }
        Command::Block { user_id, yes } => {
            transition(&queue, PendingTransition::new(user_id, Transition::Block), yes).await?
        }
        Command::Unblock { user_id, yes } => {
            transition(&queue, PendingTransition::new(user_id, Transition::Unblock), yes).await?
        }
        Command::Preview { token } => {
            let mut acceptor = InviteAcceptor::new(api, token);
            match acceptor.load().await {
                AcceptPhase::Ready { preview, .. } => {
                    println!("Email:          {}", preview.email);
                    println!("Specialization: {}", preview.specialization);
                    println!("Experience:     {} years", preview.experience);
                    println!("Expires:        {}", preview.expires_at);
                }
                AcceptPhase::Invalid { message } => bail!("{message}"),
                other => bail!("unexpected invite state: {other:?}"),
            }
        }
        Command::Accept {
            token,
            name,
            phone,
            password,
            confirm_password,
        } => {
            let mut acceptor = InviteAcceptor::new(api, token);
            if let AcceptPhase::Invalid { message } = acceptor.load().await {
                bail!("{message}");
            }
            let form = AcceptForm {
                name,
                phone,
                password,
                confirm_password,
            };
            match acceptor.submit(&form).await {
                AcceptOutcome::Submitted => {
                    println!("Registration complete. An admin will review your profile.");
                    if acceptor.wait_for_redirect().await == Some(Redirect::Login) {
                        println!("You can now sign in once approved.");
                    }
                }
                AcceptOutcome::Invalid(report) => return Err(report_error(report)),
                AcceptOutcome::Failed(message) => bail!("{message}"),
                AcceptOutcome::NotReady => bail!("invite is not ready for registration"),
            }
        }
        Command::Apply {
            email,
            specialization,
            experience,
        } => {
            let form = InviteForm::new(email, specialization, experience);
            match apply_as_stylist(api.as_ref(), &form).await {
                ApplicationOutcome::Submitted => println!("Application submitted."),
                ApplicationOutcome::Invalid(report) => return Err(report_error(report)),
                ApplicationOutcome::Failed(message) => bail!("{message}"),
            }
        }
    }

    Ok(())
}

fn outcome<T>(outcome: ThunkOutcome<T>) -> anyhow::Result<T> {
    outcome.into_result().map_err(anyhow::Error::msg)
}

fn report_error(report: ValidationReport) -> anyhow::Error {
    for error in &report.errors {
        eprintln!("  {}: {}", error.field, error.message);
    }
    anyhow::Error::new(report).context("invalid input")
}

async fn transition(queue: &ReviewQueue, pending: PendingTransition, yes: bool) -> anyhow::Result<()> {
    if !yes && !confirm(&pending.prompt()).await? {
        println!("Cancelled.");
        return Ok(());
    }
    let user_id = pending.user_id().to_string();
    outcome(queue.execute(pending.confirm()).await)?;
    println!("Done: {user_id}");
    Ok(())
}

async fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{prompt} [y/N] ");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("reading confirmation")?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_rows(rows: &[QueueRow]) {
    if rows.is_empty() {
        println!("No stylists found.");
        return;
    }
    for row in rows {
        let actions: Vec<&str> = row.actions.iter().map(|a| a.label()).collect();
        println!(
            "{:<24} {:<28} {:<18} {:<8} {}",
            row.record.user_id,
            row.record.display_name(),
            row.stage.label(),
            if row.record.is_blocked { "blocked" } else { "" },
            actions.join(", ")
        );
    }
}

fn print_pagination(pagination: &PaginationMetadata) {
    println!(
        "Page {} of {} ({} stylists)",
        pagination.current_page, pagination.total_pages, pagination.total_items
    );
}
