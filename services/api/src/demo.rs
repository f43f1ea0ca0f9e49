use crate::infra::{
    default_review_schedule, default_scoring_thresholds, parse_date, InMemoryAssessmentRepository,
    InMemoryRecordStore,
};
use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use advisory_compliance::error::AppError;
use advisory_compliance::workflows::assessment::{Answer, AssessmentService, QuestionnaireKind};
use advisory_compliance::workflows::records::{
    BreachStatus, ComplianceOverview, RecordId, RecordMaterializer, RecordPatch, RecordType,
    Subject, SubjectId,
};
use advisory_compliance::workflows::roster::ClientRosterImporter;

#[derive(Args, Debug)]
pub(crate) struct OverviewArgs {
    /// Client roster CSV export to build the subject list from
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
    /// Reporting date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional client roster CSV export to hydrate the subject list
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
    /// Override the reporting date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the wizard walkthrough and only print the reconciled dashboard
    #[arg(long)]
    pub(crate) skip_wizards: bool,
}

fn sample_subjects() -> Vec<Subject> {
    [
        ("CL-1001", "Margaret Holt"),
        ("CL-1002", "Devonshire Partners LLP"),
        ("CL-1003", "Bellwether Trustees Ltd"),
    ]
    .into_iter()
    .map(|(reference, name)| Subject {
        id: SubjectId(reference.to_string()),
        name: name.to_string(),
        onboarded_on: None,
    })
    .collect()
}

fn load_subjects(roster_csv: Option<PathBuf>) -> Result<Vec<Subject>, AppError> {
    match roster_csv {
        Some(path) => Ok(ClientRosterImporter::from_path(path)?),
        None => Ok(sample_subjects()),
    }
}

fn render_overview(overview: &ComplianceOverview) {
    println!("\nCompliance overview as of {}", overview.today);
    println!(
        "- AML: {} assessed | {} awaiting first assessment",
        overview.aml.assessed, overview.aml.unassessed
    );
    for (tier, count) in &overview.aml.by_tier {
        println!("  - {} risk: {} client(s)", tier.label(), count);
    }
    for due in &overview.aml.overdue_reviews {
        println!(
            "  - OVERDUE: {} ({} risk) was due {}",
            due.subject_id.0,
            due.tier.label(),
            due.next_review_on
        );
    }
    for due in &overview.aml.upcoming_reminders {
        println!(
            "  - reminder: {} ({} risk) due {}",
            due.subject_id.0,
            due.tier.label(),
            due.next_review_on
        );
    }

    println!("- Consumer Duty:");
    for (overall, count) in &overview.consumer_duty.by_overall {
        println!("  - {}: {} client(s)", overall.label(), count);
    }

    println!("- Breaches: {} unresolved", overview.breaches.unresolved);
    for (status, count) in &overview.breaches.by_status {
        println!("  - {}: {}", status.label(), count);
    }
}

fn print_overview(materializer: &RecordMaterializer<InMemoryRecordStore>, today: NaiveDate) {
    let now = Utc::now();
    let aml = materializer.dashboard(RecordType::Aml, now);
    let duty = materializer.dashboard(RecordType::ConsumerDuty, now);
    let breaches = materializer.dashboard(RecordType::Breach, now);

    match (aml, duty, breaches) {
        (Ok(aml), Ok(duty), Ok(breaches)) => {
            let overview = ComplianceOverview::build(
                &aml,
                &duty,
                &breaches,
                &default_review_schedule(),
                today,
            );
            render_overview(&overview);
        }
        (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => {
            println!("  Overview unavailable: {err}");
        }
    }
}

pub(crate) fn run_overview(args: OverviewArgs) -> Result<(), AppError> {
    let OverviewArgs { roster_csv, today } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let subjects = load_subjects(roster_csv)?;
    println!("Tracking {} client(s)", subjects.len());

    let store = Arc::new(InMemoryRecordStore::with_subjects(subjects));
    let materializer = RecordMaterializer::new(store);
    print_overview(&materializer, today);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        roster_csv,
        today,
        skip_wizards,
    } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("Advisory compliance desk demo");
    let subjects = load_subjects(roster_csv)?;
    println!("- {} client(s) on the roster", subjects.len());

    let store = Arc::new(InMemoryRecordStore::with_subjects(subjects.clone()));
    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let service = AssessmentService::new(
        repository,
        store.clone(),
        default_scoring_thresholds(),
        default_review_schedule(),
    );
    let materializer = RecordMaterializer::new(store);

    if !skip_wizards {
        if let Some(first) = subjects.first() {
            run_aml_walkthrough(&service, &first.id, today);
        }
        if let Some(second) = subjects.get(1) {
            run_duty_walkthrough(&service, &second.id, today);
        }
        if let Some(third) = subjects.get(2) {
            println!("\nBreach log walkthrough for {}", third.id.0);
            let first_edit = materializer.update_field(
                RecordType::Breach,
                &RecordId::virtual_for(&third.id),
                RecordPatch::BreachStatus(BreachStatus::Investigating),
                Utc::now(),
            );
            match first_edit {
                Ok(record) => println!(
                    "- first edit materialized record {} -> investigating",
                    record.id.0
                ),
                Err(err) => println!("  Breach edit failed: {err}"),
            }
        }
    }

    print_overview(&materializer, today);

    Ok(())
}

fn run_aml_walkthrough(
    service: &AssessmentService<InMemoryAssessmentRepository, InMemoryRecordStore>,
    subject: &SubjectId,
    today: NaiveDate,
) {
    println!("\nAML risk wizard for {}", subject.0);

    let assessment = match service.begin(subject.clone(), QuestionnaireKind::AmlRisk, today) {
        Ok(assessment) => assessment,
        Err(err) => {
            println!("  Wizard failed to start: {err}");
            return;
        }
    };

    for (question, value) in [
        ("client_jurisdiction", 2),
        ("pep_status", 0),
        ("sanctions_screening", 0),
        ("business_profile", 1),
    ] {
        let answer = Answer {
            question: question.to_string(),
            value,
            note: None,
            evidence: None,
        };
        if let Err(err) = service.record_answer(&assessment.id, answer) {
            println!("  Answer rejected: {err}");
            return;
        }
    }

    match service.complete(&assessment.id, today, Utc::now()) {
        Ok(evaluation) => {
            println!(
                "- scored {} -> {} risk | next review {}",
                evaluation.total,
                evaluation.tier.label(),
                evaluation.next_review_on
            );
            for component in &evaluation.components {
                println!(
                    "  - {}: {} ({})",
                    component.question, component.score, component.notes
                );
            }
        }
        Err(err) => println!("  Completion failed: {err}"),
    }
}

fn run_duty_walkthrough(
    service: &AssessmentService<InMemoryAssessmentRepository, InMemoryRecordStore>,
    subject: &SubjectId,
    today: NaiveDate,
) {
    println!("\nConsumer Duty wizard for {}", subject.0);

    let assessment = match service.begin(subject.clone(), QuestionnaireKind::ConsumerDuty, today) {
        Ok(assessment) => assessment,
        Err(err) => {
            println!("  Wizard failed to start: {err}");
            return;
        }
    };

    for (question, value) in [
        ("products_and_services", 0),
        ("price_and_value", 1),
        ("consumer_understanding", 0),
        ("consumer_support", 0),
    ] {
        let answer = Answer {
            question: question.to_string(),
            value,
            note: None,
            evidence: None,
        };
        if let Err(err) = service.record_answer(&assessment.id, answer) {
            println!("  Answer rejected: {err}");
            return;
        }
    }

    match service.complete(&assessment.id, today, Utc::now()) {
        Ok(evaluation) => println!(
            "- scored {} -> outcome statuses written to the record",
            evaluation.total
        ),
        Err(err) => println!("  Completion failed: {err}"),
    }
}
