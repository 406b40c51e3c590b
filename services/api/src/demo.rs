use crate::infra::in_memory_marketplace;
use clap::Args;
use lenslink::config::StoreConfig;
use lenslink::error::AppError;
use lenslink::marketplace::domain::{
    ApprovalStatus, PortfolioDraft, ProfileDraft, Registration, ReportReason, ReportSubmission,
    ReviewSubmission, Role,
};
use lenslink::marketplace::{Marketplace, Principal};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Moderation verdict to apply: restrict, delete, or dismiss.
    #[arg(long, default_value = "restrict")]
    pub(crate) action: String,
    /// Report reason label filed against the demo photographer.
    #[arg(long, default_value = "Spam or Scam")]
    pub(crate) reason: String,
    /// Print the published report reasons before running the walkthrough.
    #[arg(long)]
    pub(crate) list_reasons: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        action,
        reason,
        list_reasons,
    } = args;

    if list_reasons {
        println!("Report reasons");
        for label in ReportReason::labels() {
            println!("  - {label}");
        }
        println!();
    }

    let market = in_memory_marketplace(&StoreConfig::default());

    println!("Marketplace moderation demo");
    let admin = enrol(&market, "admin@lenslink.demo", "Avery Admin", Role::Admin).await?;
    let client = enrol(&market, "client@lenslink.demo", "Casey Client", Role::User).await?;
    let second = enrol(&market, "second@lenslink.demo", "Sam Second", Role::User).await?;
    let photographer = enrol(
        &market,
        "studio@lenslink.demo",
        "Harbour Light Studio",
        Role::Photographer,
    )
    .await?;

    market
        .profiles
        .create(
            &photographer,
            ProfileDraft {
                bio: "Weddings, elopements, and family portraits".to_string(),
                specialties: vec!["wedding".to_string(), "family".to_string()],
                experience_years: 8,
                phone: "555-0142".to_string(),
                location: "Wellington".to_string(),
                profile_image: None,
                cover_image: None,
            },
        )
        .await?;
    market
        .profiles
        .set_approval(&admin, &photographer.id, ApprovalStatus::Approved)
        .await?;
    market
        .catalog
        .add_portfolio_item(
            &photographer,
            PortfolioDraft {
                category: "wedding".to_string(),
                title: "Cliffside vows".to_string(),
                description: "Sunset ceremony".to_string(),
                image_url: "https://cdn.lenslink.demo/cliffside.jpg".to_string(),
            },
        )
        .await?;
    println!("- Approved photographer {} with one portfolio item", photographer.id);

    for (reviewer, rating) in [(&client, 2), (&second, 5)] {
        let receipt = market
            .reviews
            .submit(ReviewSubmission {
                photographer_id: photographer.id.clone(),
                user_id: reviewer.id.clone(),
                rating,
                review_text: None,
            })
            .await?;
        println!(
            "- {} ({rating} stars) -> average {:.2}",
            receipt.message, receipt.average_rating
        );
    }

    let report = match market
        .reports
        .submit(ReportSubmission {
            user_id: client.id.clone(),
            photographer_id: photographer.id.clone(),
            reason,
            description: Some("Asked to pay outside the platform".to_string()),
        })
        .await
    {
        Ok(report) => report,
        Err(err) => {
            println!("  Report rejected: {err}");
            return Ok(());
        }
    };
    println!("- Report {} filed for \"{}\"", report.id, report.reason.label());

    let queue = market.reports.pending(&admin).await?;
    println!("\nPending queue ({} report)", queue.len());
    for entry in &queue {
        println!(
            "  - {} against {} (reporter: {})",
            entry.report.reason.label(),
            entry
                .photographer_user
                .as_ref()
                .map(|user| user.full_name.as_str())
                .unwrap_or("unknown photographer"),
            entry
                .reporter
                .as_ref()
                .map(|user| user.full_name.as_str())
                .unwrap_or("unknown reporter"),
        );
    }

    let outcome = match market.reports.moderate(&report.id, &action, &admin.id).await {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("  Moderation failed: {err}");
            return Ok(());
        }
    };
    println!("\n{}", outcome.message);

    println!("Notifications");
    for notification in market.notifications.for_reporter(&client.id).await? {
        println!(
            "  - [{}] {} ({})",
            notification.admin_action.label(),
            notification.message,
            notification.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    match market.guard.ensure_not_restricted(&photographer.id).await {
        Ok(()) => println!("Photographer may keep publishing"),
        Err(err) => println!("Photographer blocked: {err}"),
    }

    match market.profiles.get(&photographer.id).await {
        Ok(profile) => println!("Current average rating: {:.2}", profile.average_rating),
        Err(err) => println!("Profile unavailable: {err}"),
    }

    if let Err(err) = market.reports.moderate(&report.id, "dismiss", &admin.id).await {
        println!("Second decision on the same report: {err}");
    }

    Ok(())
}

async fn enrol(
    market: &Marketplace,
    email: &str,
    full_name: &str,
    role: Role,
) -> Result<Principal, AppError> {
    let user = market
        .accounts
        .register(Registration {
            email: email.to_string(),
            full_name: full_name.to_string(),
            role: role.label().to_string(),
            password_hash: String::new(),
        })
        .await?;
    Ok(market.accounts.principal(&user.id).await?)
}
