use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use clap::Args;
use job_board::error::AppError;
use job_board::postings::{
    ApplicationForm, CommentForm, ExpirationSweep, FixedClock, Gender, InMemoryJobPostRepository,
    InMemoryMemberDirectory, InMemoryNotificationPublisher, JobPostService, Member, MemberId,
    ModifyPostForm, RegisterPostForm, Role,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date the demo starts on (YYYY-MM-DD). Defaults to today (UTC).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Days until the demo posting's deadline.
    #[arg(long, default_value_t = 7)]
    pub(crate) deadline_days: i64,
}

const AUTHOR: &str = "kim";
const SENIOR: &str = "lee";
const JUNIOR: &str = "park";

fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, 0, 0).unwrap_or_default()
}

fn born(year: i32) -> NaiveDate {
    NaiveDate::from_yo_opt(year, 1).unwrap_or(NaiveDate::MIN)
}

fn demo_members(today: NaiveDate) -> Vec<Member> {
    let year = today.year();
    vec![
        Member {
            id: MemberId(1),
            username: AUTHOR.to_string(),
            role: Role::User,
            birth: born(year - 40),
            gender: Gender::Undefined,
        },
        Member {
            id: MemberId(2),
            username: SENIOR.to_string(),
            role: Role::User,
            birth: born(year - 25),
            gender: Gender::Female,
        },
        Member {
            id: MemberId(3),
            username: JUNIOR.to_string(),
            role: Role::User,
            birth: born(year - 18),
            gender: Gender::Male,
        },
    ]
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        deadline_days,
    } = args;

    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    let deadline = today + Duration::days(deadline_days.max(0));
    let clock = Arc::new(FixedClock::new(at(today, 9)));
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let service = Arc::new(JobPostService::with_clock(
        Arc::new(InMemoryJobPostRepository::default()),
        Arc::new(InMemoryMemberDirectory::with_members(demo_members(today))),
        notifications.clone(),
        clock.clone(),
    ));

    println!("Job board lifecycle demo ({today})");

    let post_id = service.write_post(
        AUTHOR,
        RegisterPostForm {
            title: "Weekend cafe staff".to_string(),
            location: "Seoul, Mapo-gu".to_string(),
            deadline,
            body: "Saturday and Sunday shifts, 10:00 to 18:00.".to_string(),
            min_age: 0,
            gender: Gender::Undefined,
        },
    )?;
    println!("- {AUTHOR} posted #{post_id} (deadline {deadline})");

    service.increase_view_count(post_id)?;
    service.express_interest(SENIOR, post_id)?;
    service.express_interest(JUNIOR, post_id)?;
    println!("- {SENIOR} and {JUNIOR} bookmarked the posting");

    for applicant in [SENIOR, JUNIOR] {
        let application_id = service.apply(
            applicant,
            post_id,
            ApplicationForm {
                body: format!("{applicant} is available every weekend."),
            },
        )?;
        println!("- {applicant} applied (application #{application_id})");
    }

    service.write_comment(
        SENIOR,
        post_id,
        CommentForm {
            content: "Is the uniform provided?".to_string(),
        },
    )?;

    service.modify_post(
        AUTHOR,
        post_id,
        ModifyPostForm {
            title: "Weekend cafe staff (20+)".to_string(),
            deadline,
            body: "Saturday and Sunday shifts. Late closing duties included.".to_string(),
            min_age: 20,
            gender: Gender::Undefined,
        },
    )?;
    println!("- {AUTHOR} raised the minimum age to 20");
    for notification in notifications.events() {
        println!("  notified: {notification:?}");
    }

    let remaining = service.find_applications(AUTHOR, post_id)?;
    println!("  {} application(s) remain", remaining.len());
    if let Some(application) = remaining.first() {
        let status = service.decide_application(AUTHOR, post_id, application.id, true)?;
        println!(
            "- {AUTHOR} decided application #{} -> {}",
            application.id,
            status.label()
        );
    }

    let detail = service.find_by_id(post_id)?;
    println!(
        "  #{} \"{}\": {} view(s), {} interest(s), {} application(s), {} comment(s), employed: {}",
        detail.summary.id,
        detail.summary.title,
        detail.summary.view_count,
        detail.summary.interests_count,
        detail.summary.application_count,
        detail.summary.comments_count,
        detail.summary.employed
    );

    let after_deadline = deadline + Duration::days(1);
    clock.set(at(after_deadline, 0));
    let sweep = ExpirationSweep::new(service.clone());
    let report = sweep.run_expiration_sweep()?;
    println!(
        "\nExpiration sweep on {after_deadline}: {} closed, {} failed",
        report.closed.len(),
        report.failed.len()
    );
    for failure in &report.failed {
        println!("  - #{}: {}", failure.post_id, failure.error);
    }

    let closed = service.find_by_id(post_id)?;
    println!("  #{} closed: {}", closed.summary.id, closed.summary.closed);

    Ok(())
}
