//! Subcommand handlers

use anyhow::Context;
use approval_core::{
    ApprovalWorkflow, FeedFilter, FileProfileStore, MediaResolver, Notice, NoticeLevel, PlatformConfig,
    RecoveryAction, RecoverySweep, ReviewDesk, ReviewFeed, SubmissionService,
};
use approval_types::{
    ActionPayload, Actor, ApprovalStatus, ProfileFields, ProfileId, ReviewAction, Role, SortOrder, UserId,
};
use clap::ArgMatches;
use std::sync::Arc;

type Store = Arc<FileProfileStore>;

/// Route the selected subcommand
pub async fn dispatch(store: &Store, config: &PlatformConfig, matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("feed", sub)) => feed(store, config, sub).await,
        Some(("stats", _)) => stats(store, config).await,
        Some(("submit", sub)) => submit(store, config, sub).await,
        Some(("review", sub)) => review(store, config, sub).await,
        Some(("withdraw", sub)) => withdraw(store, config, sub).await,
        Some(("recover", _)) => recover(store).await,
        Some((other, _)) => anyhow::bail!("Unknown command: {}", other),
        None => anyhow::bail!("No action specified. Use --help for options."),
    }
}

fn review_feed(store: &Store, config: &PlatformConfig) -> ReviewFeed<FileProfileStore> {
    ReviewFeed::new(store.clone(), MediaResolver::from_config(&config.media))
}

/// Resolve an account id into an actor using the configured admin list
fn actor_for(config: &PlatformConfig, id: &str) -> Actor {
    let id = UserId::new(id);
    Actor {
        role: config.actor_role(&id),
        id,
    }
}

fn parse_role(matches: &ArgMatches) -> anyhow::Result<Option<Role>> {
    matches
        .get_one::<String>("role")
        .map(|r| r.parse::<Role>())
        .transpose()
        .context("Invalid --role")
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("--{} is required", name))
}

pub fn parse_filter(matches: &ArgMatches) -> anyhow::Result<FeedFilter> {
    let status = match matches.get_one::<String>("status") {
        Some(s) => s.parse::<ApprovalStatus>().context("Invalid --status")?,
        None => ApprovalStatus::Pending,
    };

    Ok(FeedFilter {
        role: parse_role(matches)?,
        status,
    })
}

pub async fn feed(store: &Store, config: &PlatformConfig, matches: &ArgMatches) -> anyhow::Result<()> {
    let filter = parse_filter(matches)?;
    let order = if matches.get_flag("oldest-first") {
        SortOrder::OldestFirst
    } else {
        config.review.default_order
    };

    let entries = review_feed(store, config).load(filter, order).await?;
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

pub async fn stats(store: &Store, config: &PlatformConfig) -> anyhow::Result<()> {
    let counts = review_feed(store, config).counts().await?;

    for role in Role::ALL {
        let line: Vec<String> = ApprovalStatus::ALL
            .iter()
            .map(|status| format!("{}={}", status, counts.get(role, *status)))
            .collect();
        println!("{:<11} {}", role, line.join(" "));
    }
    Ok(())
}

pub async fn submit(store: &Store, config: &PlatformConfig, matches: &ArgMatches) -> anyhow::Result<()> {
    let owner = actor_for(config, required(matches, "user")?);
    let path = required(matches, "file")?;

    let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let fields: ProfileFields = serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path))?;

    let record = SubmissionService::new(store.clone()).save_draft(&owner, fields).await?;
    println!("Submitted {} profile {} ({})", record.role(), record.id, record.status);
    Ok(())
}

pub async fn review(store: &Store, config: &PlatformConfig, matches: &ArgMatches) -> anyhow::Result<()> {
    let actor = actor_for(config, required(matches, "actor")?);
    let role = parse_role(matches)?.context("--role is required")?;
    let profile_id = ProfileId::from_string(required(matches, "id")?)?;
    let action: ReviewAction = required(matches, "action")?.parse()?;
    let payload = ActionPayload {
        reason: matches.get_one::<String>("reason").cloned(),
        rating: matches.get_one::<u8>("rating").copied(),
    };

    let desk = ReviewDesk::new(
        actor,
        ApprovalWorkflow::new(store.clone()),
        review_feed(store, config),
        config.review.default_order,
    );
    desk.set_filter(FeedFilter { role: Some(role), status: ApprovalStatus::Pending }).await?;

    let result = desk.act(role, &profile_id, action, &payload).await;

    let notices = desk.take_notices();
    for notice in &notices {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.message),
            NoticeLevel::Error => eprintln!("error: {}", notice.message),
        }
    }
    result?;

    // A failed refresh leaves the previous list in place
    if list_refreshed(&notices) {
        println!("{} {} profiles still pending", desk.entries().await.len(), role);
    }
    Ok(())
}

/// Whether the refresh after a successful action went through
fn list_refreshed(notices: &[Notice]) -> bool {
    !notices.iter().any(|n| n.level == NoticeLevel::Error)
}

pub async fn withdraw(store: &Store, config: &PlatformConfig, matches: &ArgMatches) -> anyhow::Result<()> {
    let owner = actor_for(config, required(matches, "user")?);
    let role = parse_role(matches)?.context("--role is required")?;

    let id = SubmissionService::new(store.clone()).withdraw(&owner, role).await?;
    println!("Withdrew {} profile {}", role, id);
    Ok(())
}

/// Finish or roll back promotions left behind by an interrupted run
pub async fn recover(store: &Store) -> anyhow::Result<()> {
    let report = RecoverySweep::new(store.clone()).run().await?;
    if !report.is_empty() {
        log::warn!(
            "Recovery sweep: {} completed, {} rolled back, {} stale",
            report.count(RecoveryAction::CompletedPromotion),
            report.count(RecoveryAction::RolledBack),
            report.count(RecoveryAction::ClearedStale)
        );
    }

    println!("{} dangling promotion intents reconciled", report.entries.len());
    Ok(())
}
